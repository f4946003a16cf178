//! Session behaviour across persistence, sharing and export

use bracket::{
    encode, BracketConfig, BracketStore, ExportFormat, FileStore, MemoryStore, Session,
    StatusLevel,
};
use bracket_core::{
    BracketSize, BracketState, MatchId, Placement, Side, SlotRef, MAX_COMPETITION_NAME,
};
use std::fs;
use std::rc::Rc;
use tempfile::TempDir;

/// Lets a test keep a handle on the store it gave to a session
struct Shared(Rc<dyn BracketStore>);

impl BracketStore for Shared {
    fn save(&self, state: &BracketState) -> bracket::StoreResult<()> {
        self.0.save(state)
    }

    fn load(&self) -> bracket::StoreResult<Option<BracketState>> {
        self.0.load()
    }

    fn clear(&self) -> bracket::StoreResult<()> {
        self.0.clear()
    }

    fn last_modified(&self) -> bracket::StoreResult<Option<chrono::DateTime<chrono::Utc>>> {
        self.0.last_modified()
    }
}

fn names(count: usize) -> String {
    (1..=count)
        .map(|i| format!("#{} Racer", i))
        .collect::<Vec<_>>()
        .join("\n")
}

fn memory_session() -> (Session, Rc<dyn BracketStore>) {
    let store: Rc<dyn BracketStore> = Rc::new(MemoryStore::new());
    let session = Session::new(BracketConfig::default(), Box::new(Shared(store.clone())));
    (session, store)
}

fn last_level(session: &Session) -> Option<StatusLevel> {
    session.status().last().map(|m| m.level)
}

// =============================================================================
// Creating brackets
// =============================================================================

#[test]
fn test_submit_entrants_saves() {
    let (mut session, store) = memory_session();
    assert!(session.submit_entrants(Some("Spring Cup"), &names(12)));

    let state = session.state().unwrap();
    assert_eq!(state.competition_name, "Spring Cup");
    assert_eq!(state.bracket_size, BracketSize::Top16);
    assert_eq!(store.load().unwrap().as_ref(), Some(state));
    assert!(session
        .status()
        .messages()
        .iter()
        .any(|m| m.text == "Loaded 12 entrants into a Top 16 bracket"));
}

#[test]
fn test_submit_empty_list_reports_error() {
    let (mut session, store) = memory_session();
    assert!(!session.submit_entrants(None, "  \n \n"));
    assert!(session.state().is_none());
    assert_eq!(last_level(&session), Some(StatusLevel::Error));
    assert!(store.load().unwrap().is_none());
}

#[test]
fn test_default_competition_name() {
    let (mut session, _store) = memory_session();
    session.submit_entrants(Some("   "), "Alice\nBob");
    assert_eq!(
        session.state().unwrap().competition_name,
        "Drift Top 32 Bracket"
    );
}

#[test]
fn test_too_many_entrants_reported() {
    let (mut session, _store) = memory_session();
    session.submit_entrants(None, &names(35));
    assert!(session
        .status()
        .messages()
        .iter()
        .any(|m| m.text == "3 entrants did not fit and were left out"));
}

#[test]
fn test_auto_advance_byes() {
    let config = BracketConfig {
        auto_advance_byes: true,
        ..BracketConfig::default()
    };
    let mut session = Session::new(config, Box::new(MemoryStore::new()));
    session.submit_entrants(None, "Alice\nBob\nCarol");

    let state = session.state().unwrap();
    // Carol is drawn against a BYE in r1_m2
    assert_eq!(state.winner(MatchId::new(1, 2)), Some("Carol"));
    assert_eq!(state.winner(MatchId::new(1, 1)), None);
}

#[test]
fn test_seeded_placement_config() {
    let config = BracketConfig {
        placement: Placement::Seeded,
        ..BracketConfig::default()
    };
    let mut session = Session::new(config, Box::new(MemoryStore::new()));
    session.submit_entrants(None, &names(16));

    let state = session.state().unwrap();
    let top = state.occupant(SlotRef::new(MatchId::new(1, 1), Side::Top));
    let bottom = state.occupant(SlotRef::new(MatchId::new(1, 1), Side::Bottom));
    assert_eq!(top, Some("#1 Racer"));
    assert_eq!(bottom, Some("#16 Racer"));
}

// =============================================================================
// Picking winners
// =============================================================================

#[test]
fn test_pick_and_click() {
    let (mut session, store) = memory_session();
    session.submit_entrants(None, "Alice\nBob\nCarol\nDave");

    assert!(session.record_winner("r1_m1", "Bob"));
    assert!(session.click(SlotRef::new(MatchId::new(1, 2), Side::Top)));
    assert!(session.click(SlotRef::new(MatchId::new(2, 1), Side::Bottom)));

    let state = session.state().unwrap();
    assert_eq!(state.winner(MatchId::new(1, 1)), Some("Bob"));
    assert_eq!(state.winner(MatchId::new(2, 1)), Some("Carol"));
    assert_eq!(store.load().unwrap().as_ref(), Some(state));

    let r3_top = SlotRef::new(MatchId::new(3, 1), Side::Top);
    assert_eq!(session.view().slot_text(r3_top), Some("Carol"));
}

#[test]
fn test_pick_rejects_bad_input() {
    let (mut session, _store) = memory_session();
    assert!(!session.record_winner("r1_m1", "Alice"));

    session.submit_entrants(None, "Alice\nBob");
    assert!(!session.record_winner("round one", "Alice"));
    assert!(!session.record_winner("r5_m1", "Alice"));
    assert!(!session.record_winner("r1_m1", "Zed"));
    assert!(!session.record_winner("r2_m1", "Alice"));
    assert!(session.state().unwrap().winners.is_empty());
    assert_eq!(last_level(&session), Some(StatusLevel::Error));
}

#[test]
fn test_click_empty_slot() {
    let (mut session, _store) = memory_session();
    session.submit_entrants(None, "Alice\nBob");
    assert!(!session.click(SlotRef::new(MatchId::new(2, 1), Side::Top)));
    assert!(session.state().unwrap().winners.is_empty());
}

#[test]
fn test_changing_pick_cascades() {
    let (mut session, _store) = memory_session();
    session.submit_entrants(None, &names(32));
    session.record_winner("r1_m1", "#1 Racer");
    session.record_winner("r1_m2", "#3 Racer");
    session.record_winner("r2_m1", "#1 Racer");

    session.record_winner("r1_m1", "#2 Racer");

    let state = session.state().unwrap();
    assert_eq!(state.winner(MatchId::new(2, 1)), None);
    assert_eq!(state.winner(MatchId::new(1, 2)), Some("#3 Racer"));
    let r2_top = SlotRef::new(MatchId::new(2, 1), Side::Top);
    assert_eq!(session.view().slot_text(r2_top), Some("#2 Racer"));
    assert_eq!(
        session.view().selected(MatchId::new(2, 1)),
        None,
        "stale selection should be cleared"
    );
}

#[test]
fn test_reset_keeps_entrants() {
    let (mut session, store) = memory_session();
    session.submit_entrants(None, "Alice\nBob");
    session.record_winner("r1_m1", "Alice");
    assert!(session.reset());

    let state = session.state().unwrap();
    assert!(state.winners.is_empty());
    assert_eq!(state.entrants.len(), 2);
    assert!(store.load().unwrap().unwrap().winners.is_empty());
}

#[test]
fn test_clear_removes_saved_bracket() {
    let (mut session, store) = memory_session();
    session.submit_entrants(None, "Alice\nBob");
    session.clear();
    assert!(session.state().is_none());
    assert!(store.load().unwrap().is_none());
}

// =============================================================================
// Startup, sharing and export
// =============================================================================

#[test]
fn test_startup_restores_saved_bracket() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("state.json");

    let config = BracketConfig::default();
    let mut first = Session::new(config.clone(), Box::new(FileStore::new(&path)));
    first.submit_entrants(Some("Cup"), "Alice\nBob\nCarol\nDave");
    first.record_winner("r1_m1", "Alice");

    let mut second = Session::new(config, Box::new(FileStore::new(&path)));
    assert!(second.load_startup(None));
    assert_eq!(second.state(), first.state());
    assert_eq!(second.view(), first.view());
    let message = second.status().last().unwrap();
    assert!(message.text.starts_with("Loaded saved bracket from "));
}

#[test]
fn test_startup_with_nothing_saved() {
    let (mut session, _store) = memory_session();
    assert!(!session.load_startup(None));
    assert!(session.status().messages().is_empty());
}

#[test]
fn test_share_link_opens_elsewhere() {
    let (mut session, _store) = memory_session();
    session.submit_entrants(Some("Shared Cup"), &names(20));
    session.record_winner("r1_m1", "#1 Racer");
    let url = session.share_url().unwrap();
    assert!(url.starts_with("https://bracket.local/?share="));

    let (mut other, other_store) = memory_session();
    assert!(other.load_startup(Some(url.as_str())));
    assert_eq!(other.state(), session.state());
    // Opening a share link replaces the saved bracket
    assert_eq!(other_store.load().unwrap().as_ref(), session.state());
}

#[test]
fn test_invalid_share_falls_back_to_saved() {
    let (mut session, store) = memory_session();
    session.submit_entrants(Some("Saved"), "Alice\nBob");
    let saved = session.state().cloned();

    let mut other = Session::new(BracketConfig::default(), Box::new(Shared(store)));
    assert!(other.load_startup(Some("https://bracket.local/?share=%%%garbage")));
    assert_eq!(other.state().cloned(), saved);
    assert!(other.status().has_errors());
}

#[test]
fn test_share_code_with_long_name_rejected() {
    // Built by hand, as another tool might have written it
    let mut state = BracketState::create("Cup", "Alice\nBob", Placement::Sequential).unwrap();
    state.competition_name = "x".repeat(MAX_COMPETITION_NAME + 50);
    let code = encode(&state).unwrap();

    let (mut other, _) = memory_session();
    assert!(!other.load_startup(Some(code.as_str())));
    assert!(other.state().is_none());
}

#[test]
fn test_long_competition_name_rejected_at_creation() {
    let (mut session, store) = memory_session();
    session.submit_entrants(Some("Saved"), "Alice\nBob");
    let saved = session.state().cloned();

    let long_name = "X".repeat(MAX_COMPETITION_NAME + 50);
    assert!(!session.submit_entrants(Some(long_name.as_str()), "Carol\nDave"));
    assert_eq!(last_level(&session), Some(StatusLevel::Error));

    // The existing bracket is kept, in memory and on disk
    assert_eq!(session.state().cloned(), saved);
    assert_eq!(store.load().unwrap(), saved);
}

#[test]
fn test_longest_name_survives_reload_and_share() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("state.json");
    let name = "X".repeat(MAX_COMPETITION_NAME);

    let config = BracketConfig::default();
    let mut first = Session::new(config.clone(), Box::new(FileStore::new(&path)));
    assert!(first.submit_entrants(Some(name.as_str()), "Alice\nBob"));
    let url = first.share_url().unwrap();

    let mut reloaded = Session::new(config, Box::new(FileStore::new(&path)));
    assert!(reloaded.load_startup(None));
    assert_eq!(reloaded.state(), first.state());
    assert!(!reloaded.status().has_errors());

    let (mut opened, _) = memory_session();
    assert!(opened.load_startup(Some(url.as_str())));
    assert_eq!(opened.state().unwrap().competition_name, name);
}

#[test]
fn test_export_html() {
    let tmp = TempDir::new().unwrap();
    let (mut session, _store) = memory_session();
    session.submit_entrants(Some("A & B"), "Alice\nBob");

    let path = tmp.path().join("bracket.html");
    let written = session.export(Some(&path), ExportFormat::Html).unwrap();
    assert_eq!(written, path);
    let html = fs::read_to_string(&path).unwrap();
    assert!(html.contains("A &amp; B"));
    assert_eq!(last_level(&session), Some(StatusLevel::Success));
}

#[test]
fn test_export_retry_is_reported() {
    let tmp = TempDir::new().unwrap();
    let blocker = tmp.path().join("blocker");
    fs::write(&blocker, "").unwrap();
    let fallback_dir = tmp.path().join("fallback");

    let config = BracketConfig {
        export_fallback_dir: fallback_dir.clone(),
        ..BracketConfig::default()
    };
    let mut session = Session::new(config, Box::new(MemoryStore::new()));
    session.submit_entrants(None, "Alice\nBob");

    let written = session
        .export(Some(&blocker.join("bracket.txt")), ExportFormat::Text)
        .unwrap();
    assert_eq!(written, fallback_dir.join("bracket.txt"));

    let messages = session.status().messages();
    let retry = messages
        .iter()
        .position(|m| m.text.starts_with("Trying alternative approach"))
        .unwrap();
    assert_eq!(messages[retry].level, StatusLevel::Processing);
    assert_eq!(messages[retry + 1].level, StatusLevel::Success);
}

#[test]
fn test_export_without_bracket() {
    let (mut session, _store) = memory_session();
    assert!(session.export(None, ExportFormat::Text).is_none());
    assert!(session.status().has_errors());
}
