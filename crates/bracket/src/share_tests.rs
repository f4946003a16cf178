use super::*;
use bracket_core::{record_winner, BracketSize, MatchId, NullRender, Placement};
use serde_json::json;

fn sample_state() -> BracketState {
    let text = "Alice\nBob, 7\nCarol\nDave\nÉmile";
    let mut state = BracketState::create("Spring <Cup>", text, Placement::Sequential).unwrap();
    record_winner(&mut state, MatchId::new(1, 1), "Alice", &mut NullRender);
    record_winner(&mut state, MatchId::new(1, 2), "Dave", &mut NullRender);
    record_winner(&mut state, MatchId::new(2, 1), "Dave", &mut NullRender);
    state
}

#[test]
fn test_round_trip_compressed() {
    let state = sample_state();
    let code = encode(&state).unwrap();

    assert!(code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    assert_eq!(decode(&code).unwrap(), state);
}

#[test]
fn test_round_trip_legacy() {
    let state = sample_state();
    let code = encode_legacy(&state).unwrap();
    assert_eq!(decode(&code).unwrap(), state);
}

#[test]
fn test_legacy_browser_payload() {
    // Shape written by the browser version: positions under "drivers"
    let legacy = json!({
        "competitionName": "Drift Night",
        "drivers": {
            "1": {"name": "Alice", "seed": 1, "isBye": false},
            "2": {"name": "Bob", "seed": 2, "isBye": false}
        },
        "winners": {"r1_m1": "Bob"},
        "bracketSize": 16,
        "driverListText": "Alice\nBob"
    });
    let code = STANDARD.encode(legacy.to_string());

    let state = decode(&code).unwrap();
    assert_eq!(state.competition_name, "Drift Night");
    assert_eq!(state.bracket_size, BracketSize::Top16);
    assert_eq!(state.slots.len(), 16);
    assert_eq!(state.winner(MatchId::new(1, 1)), Some("Bob"));
    assert_eq!(state.raw_entrant_text, "Alice\nBob");
    assert_eq!(state.entrants.len(), 2);
}

#[test]
fn test_legacy_latin1_bytes() {
    let json = r#"{"competitionName":"Caf\xE9","drivers":{},"winners":{},"bracketSize":16}"#;
    let mut bytes = json.as_bytes().to_vec();
    // Swap the escaped marker for a raw Latin-1 e-acute
    let marker = bytes.windows(4).position(|w| w == b"\\xE9").unwrap();
    bytes.splice(marker..marker + 4, [0xE9]);

    let state = decode(&STANDARD.encode(bytes)).unwrap();
    assert_eq!(state.competition_name, "Café");
}

#[test]
fn test_decode_garbage() {
    assert!(matches!(decode(""), Err(ShareError::Decode(_))));
    assert!(matches!(decode("!!not base64!!"), Err(ShareError::Decode(_))));
    let not_json = URL_SAFE_NO_PAD.encode(b"hello");
    assert!(matches!(decode(&not_json), Err(ShareError::Decode(_))));
}

#[test]
fn test_validate_rules() {
    let good = json!({
        "competitionName": "Cup",
        "slots": {},
        "winners": {},
        "bracketSize": 32
    });
    assert!(validate(&good).is_ok());

    let mut long_name = good.clone();
    long_name["competitionName"] = json!("x".repeat(101));
    assert!(matches!(validate(&long_name), Err(ShareError::Invalid(_))));

    let mut exactly_max = good.clone();
    exactly_max["competitionName"] = json!("x".repeat(100));
    assert!(validate(&exactly_max).is_ok());

    let mut numeric_name = good.clone();
    numeric_name["competitionName"] = json!(5);
    assert!(validate(&numeric_name).is_err());

    let mut no_winners = good.clone();
    no_winners.as_object_mut().unwrap().remove("winners");
    assert!(validate(&no_winners).is_err());

    let mut list_slots = good.clone();
    list_slots["slots"] = json!([]);
    assert!(validate(&list_slots).is_err());

    let mut text_size = good.clone();
    text_size["bracketSize"] = json!("32");
    assert!(validate(&text_size).is_err());

    assert!(validate(&json!([1, 2])).is_err());
}

#[test]
fn test_unsupported_size_is_invalid() {
    let value = json!({
        "competitionName": "Cup",
        "slots": {},
        "winners": {},
        "bracketSize": 24
    });
    assert!(matches!(parse_state(value), Err(ShareError::Invalid(_))));
}

#[test]
fn test_share_url_and_extract() {
    let state = sample_state();
    let url = share_url("https://example.com/bracket/", &state).unwrap();
    assert!(url.starts_with("https://example.com/bracket/?share="));

    let code = extract_share_param(&url);
    assert_eq!(decode(code).unwrap(), state);

    let with_query = share_url("https://example.com/?theme=dark", &state).unwrap();
    assert!(with_query.contains("?theme=dark&share="));
    assert_eq!(extract_share_param(&with_query), code);
}

#[test]
fn test_extract_bare_code_and_missing_param() {
    assert_eq!(extract_share_param("  abc123 "), "abc123");
    assert_eq!(extract_share_param("https://example.com/?x=1#top"), "");
    assert_eq!(
        extract_share_param("https://example.com/?share=abc#frag"),
        "abc"
    );
}
