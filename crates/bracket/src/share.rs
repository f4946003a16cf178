//! Shareable-link codec.
//!
//! Two formats are understood:
//! - compressed: raw DEFLATE of the state JSON, URL-safe base64 without padding
//! - legacy: standard base64 of the state JSON, optionally percent-encoded
//!
//! `encode` always writes the compressed format. `decode` tries compressed
//! first and falls back to legacy. Decoded state is validated with the same
//! rules applied to anything loaded from outside the session.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use bracket_core::{BracketState, MAX_COMPETITION_NAME};
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use percent_encoding::percent_decode_str;
use serde_json::Value;
use std::io::{Read, Write};
use thiserror::Error;

/// Query parameter carrying the encoded bracket
pub const SHARE_PARAM: &str = "share";

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("could not encode bracket: {0}")]
    Encode(String),

    #[error("could not decode shared bracket: {0}")]
    Decode(String),

    #[error("invalid shared bracket: {0}")]
    Invalid(String),
}

/// Encodes a bracket into a URL-safe string
pub fn encode(state: &BracketState) -> Result<String, ShareError> {
    let json = serde_json::to_vec(state).map_err(|e| ShareError::Encode(e.to_string()))?;

    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(&json)
        .map_err(|e| ShareError::Encode(e.to_string()))?;
    let compressed = encoder
        .finish()
        .map_err(|e| ShareError::Encode(e.to_string()))?;

    Ok(URL_SAFE_NO_PAD.encode(compressed))
}

/// Encodes the legacy plain-base64 format, percent-encoded for URLs
pub fn encode_legacy(state: &BracketState) -> Result<String, ShareError> {
    let json = serde_json::to_vec(state).map_err(|e| ShareError::Encode(e.to_string()))?;
    let encoded = STANDARD.encode(json);
    Ok(encoded
        .replace('+', "%2B")
        .replace('/', "%2F")
        .replace('=', "%3D"))
}

/// Decodes either share format into a validated bracket
pub fn decode(code: &str) -> Result<BracketState, ShareError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(ShareError::Decode("empty share code".to_string()));
    }

    let value = match decode_compressed(code) {
        Ok(value) => value,
        Err(compressed_err) => {
            tracing::debug!(error = %compressed_err, "not a compressed share code, trying legacy");
            decode_legacy(code).map_err(|legacy_err| {
                ShareError::Decode(format!(
                    "compressed: {}; legacy: {}",
                    compressed_err, legacy_err
                ))
            })?
        }
    };

    parse_state(value)
}

fn decode_compressed(code: &str) -> Result<Value, String> {
    let bytes = URL_SAFE_NO_PAD.decode(code).map_err(|e| e.to_string())?;
    let mut json = Vec::new();
    DeflateDecoder::new(bytes.as_slice())
        .read_to_end(&mut json)
        .map_err(|e| e.to_string())?;
    serde_json::from_slice(&json).map_err(|e| e.to_string())
}

fn decode_legacy(code: &str) -> Result<Value, String> {
    let unescaped = percent_decode_str(code)
        .decode_utf8()
        .map_err(|e| e.to_string())?;
    let bytes = STANDARD
        .decode(unescaped.trim().as_bytes())
        .map_err(|e| e.to_string())?;
    // Older links were produced from Latin-1 text rather than UTF-8
    let text = String::from_utf8(bytes)
        .unwrap_or_else(|e| e.into_bytes().iter().map(|&b| b as char).collect());
    serde_json::from_str(&text).map_err(|e| e.to_string())
}

/// Checks the shape of externally supplied state before it is trusted
pub fn validate(value: &Value) -> Result<(), ShareError> {
    let invalid = |msg: &str| Err(ShareError::Invalid(msg.to_string()));

    let Some(object) = value.as_object() else {
        return invalid("not an object");
    };

    match object.get("competitionName").and_then(Value::as_str) {
        None => return invalid("competitionName must be a string"),
        Some(name) if name.chars().count() > MAX_COMPETITION_NAME => {
            return invalid("competitionName is too long");
        }
        Some(_) => {}
    }

    let slots = object.get("slots").or_else(|| object.get("drivers"));
    if !slots.is_some_and(Value::is_object) {
        return invalid("slots must be an object");
    }
    if !object.get("winners").is_some_and(Value::is_object) {
        return invalid("winners must be an object");
    }
    if !object.get("bracketSize").is_some_and(Value::is_number) {
        return invalid("bracketSize must be a number");
    }

    Ok(())
}

/// Validates, deserializes and normalizes external state
pub fn parse_state(value: Value) -> Result<BracketState, ShareError> {
    validate(&value)?;
    let mut state: BracketState =
        serde_json::from_value(value).map_err(|e| ShareError::Invalid(e.to_string()))?;
    state.normalize();
    Ok(state)
}

/// Full link for a bracket under `base_url`
pub fn share_url(base_url: &str, state: &BracketState) -> Result<String, ShareError> {
    let code = encode(state)?;
    let separator = if base_url.contains('?') { '&' } else { '?' };
    Ok(format!("{}{}{}={}", base_url, separator, SHARE_PARAM, code))
}

/// Pulls the share code out of a link, or returns the input if it is a bare code
pub fn extract_share_param(input: &str) -> &str {
    let input = input.trim();
    let Some((_, query)) = input.split_once('?') else {
        return input;
    };
    let query = query.split('#').next().unwrap_or("");
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == SHARE_PARAM)
        .map(|(_, value)| value)
        .unwrap_or("")
}

#[cfg(test)]
#[path = "share_tests.rs"]
mod share_tests;
