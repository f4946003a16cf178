//! Bracket manager configuration

use bracket_core::Placement;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name looked up in the working directory
pub const CONFIG_FILE: &str = "bracket.toml";

/// Settings loaded from TOML, every field optional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BracketConfig {
    /// Title used when a new bracket is created without one
    pub default_competition_name: String,
    /// Where the current bracket is saved between runs
    pub store_path: PathBuf,
    /// Page that share links point at
    pub share_base_url: String,
    /// Directory used when an export cannot be written to its target
    pub export_fallback_dir: PathBuf,
    /// How entrants are placed into first-round slots
    pub placement: Placement,
    /// Advance entrants drawn against a BYE as soon as the bracket is created
    pub auto_advance_byes: bool,
}

impl Default for BracketConfig {
    fn default() -> Self {
        Self {
            default_competition_name: "Drift Top 32 Bracket".to_string(),
            store_path: PathBuf::from("bracket_state.json"),
            share_base_url: "https://bracket.local/".to_string(),
            export_fallback_dir: std::env::temp_dir(),
            placement: Placement::Sequential,
            auto_advance_byes: false,
        }
    }
}

impl BracketConfig {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| format!("Failed to read config: {}", e))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// Load `path`, falling back to defaults when it is absent or invalid
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "using default config");
                Self::default()
            }
        }
    }
}
