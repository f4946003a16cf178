//! A bracket session: the live state plus everything it talks to.
//!
//! Each user action goes through a `Session` method. Failures are reported on
//! the status log and the method returns normally; the in-memory state is
//! never rolled back because persistence failed.

use bracket_core::{
    advance_byes, clean_name, record_winner, same_entrant, select_slot, BracketError,
    BracketSize, BracketState, MatchId, Side, SlotRef,
};
use std::path::{Path, PathBuf};

use crate::config::BracketConfig;
use crate::export::{export, export_file_name, ExportFormat};
use crate::share::{decode, extract_share_param, share_url};
use crate::status::StatusLog;
use crate::store::BracketStore;
use crate::view::BracketView;

pub struct Session {
    config: BracketConfig,
    store: Box<dyn BracketStore>,
    state: Option<BracketState>,
    view: BracketView,
    status: StatusLog,
}

impl Session {
    pub fn new(config: BracketConfig, store: Box<dyn BracketStore>) -> Self {
        let view = BracketView::new(&config.default_competition_name, BracketSize::default());
        Self {
            config,
            store,
            state: None,
            view,
            status: StatusLog::new(),
        }
    }

    pub fn config(&self) -> &BracketConfig {
        &self.config
    }

    pub fn state(&self) -> Option<&BracketState> {
        self.state.as_ref()
    }

    pub fn view(&self) -> &BracketView {
        &self.view
    }

    pub fn status(&self) -> &StatusLog {
        &self.status
    }

    pub fn status_mut(&mut self) -> &mut StatusLog {
        &mut self.status
    }

    /// Loads the bracket to start from.
    ///
    /// A share code wins over the saved bracket. An invalid code is reported
    /// and the saved bracket is used instead. Returns whether a bracket is
    /// loaded afterwards.
    pub fn load_startup(&mut self, share: Option<&str>) -> bool {
        if let Some(input) = share {
            self.status.processing("Loading shared bracket...");
            match decode(extract_share_param(input)) {
                Ok(state) => {
                    self.status
                        .success(format!("Loaded shared bracket \"{}\"", state.competition_name));
                    self.install(state);
                    self.persist();
                    return true;
                }
                Err(e) => self.status.error(format!("Invalid shared bracket: {}", e)),
            }
        }

        match self.store.load() {
            Ok(Some(state)) => {
                let saved_at = self
                    .store
                    .last_modified()
                    .ok()
                    .flatten()
                    .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string());
                match saved_at {
                    Some(date) => self.status.info(format!("Loaded saved bracket from {}", date)),
                    None => self.status.info("Loaded saved bracket"),
                }
                self.install(state);
                true
            }
            Ok(None) => false,
            Err(e) => {
                self.status
                    .error(format!("Could not load saved bracket: {}", e));
                false
            }
        }
    }

    /// Builds a new bracket from entrant text, replacing the current one
    pub fn submit_entrants(&mut self, competition_name: Option<&str>, text: &str) -> bool {
        let name = competition_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(self.config.default_competition_name.as_str())
            .to_string();

        let state = match BracketState::create(&name, text, self.config.placement) {
            Ok(state) => state,
            Err(e) => {
                self.status.error(format!("Could not create bracket: {}", e));
                return false;
            }
        };

        let count = state.entrants.len();
        let capacity = state.bracket_size.slots();
        self.install(state);
        self.status.success(format!(
            "Loaded {} entrants into a Top {} bracket",
            count, self.view.size
        ));
        if count > capacity {
            self.status.info(format!(
                "{} entrants did not fit and were left out",
                count - capacity
            ));
        }

        if self.config.auto_advance_byes {
            if let Some(state) = self.state.as_mut() {
                let advanced = advance_byes(state, &mut self.view);
                if advanced > 0 {
                    self.status
                        .info(format!("Advanced {} entrants past a BYE", advanced));
                }
            }
        }

        self.persist();
        true
    }

    /// Records `winner` for the match named by `match_id`.
    ///
    /// The winner must be one of the two entrants currently in the match.
    pub fn record_winner(&mut self, match_id: &str, winner: &str) -> bool {
        let Some(state) = self.state.as_mut() else {
            self.status.error("No bracket loaded");
            return false;
        };
        let id: MatchId = match match_id.parse() {
            Ok(id) => id,
            Err(e) => {
                self.status.error(e.to_string());
                return false;
            }
        };
        if !id.is_valid(state.bracket_size) {
            self.status.error(BracketError::AddressingMiss(id).to_string());
            return false;
        }

        let occupant = [Side::Top, Side::Bottom]
            .into_iter()
            .filter_map(|side| state.occupant(SlotRef::new(id, side)))
            .find(|shown| same_entrant(shown, winner))
            .map(clean_name);
        let Some(name) = occupant else {
            self.status
                .error(format!("{} is not competing in {}", winner.trim(), id));
            return false;
        };

        record_winner(state, id, &name, &mut self.view);
        self.report_pick(id, &name);
        self.persist();
        true
    }

    /// Picks whoever occupies `slot` as the winner of its match
    pub fn click(&mut self, slot: SlotRef) -> bool {
        let Some(state) = self.state.as_mut() else {
            self.status.error("No bracket loaded");
            return false;
        };
        if !slot.match_id.is_valid(state.bracket_size) {
            self.status
                .error(BracketError::AddressingMiss(slot.match_id).to_string());
            return false;
        }
        let Some(name) = state
            .occupant(slot)
            .map(clean_name)
            .filter(|n| !n.is_empty())
        else {
            self.status.error(format!("No entrant in {} yet", slot));
            return false;
        };

        select_slot(state, slot, &mut self.view);
        self.report_pick(slot.match_id, &name);
        self.persist();
        true
    }

    /// Clears every recorded winner
    pub fn reset(&mut self) -> bool {
        let Some(state) = self.state.as_mut() else {
            self.status.error("No bracket loaded");
            return false;
        };
        state.reset_winners();
        self.view = BracketView::from_state(state);
        self.status.success("Bracket reset");
        self.persist();
        true
    }

    /// Forgets the current bracket and removes the saved copy
    pub fn clear(&mut self) {
        self.state = None;
        self.view = BracketView::new(&self.config.default_competition_name, BracketSize::default());
        match self.store.clear() {
            Ok(()) => self.status.success("Saved bracket cleared"),
            Err(e) => self
                .status
                .error(format!("Could not clear saved bracket: {}", e)),
        }
    }

    /// Link that reopens the current bracket
    pub fn share_url(&mut self) -> Option<String> {
        let Some(state) = self.state.as_ref() else {
            self.status.error("No bracket loaded");
            return None;
        };
        match share_url(&self.config.share_base_url, state) {
            Ok(url) => {
                self.status.success("Share link created");
                Some(url)
            }
            Err(e) => {
                self.status.error(format!("Could not create share link: {}", e));
                None
            }
        }
    }

    /// Writes the rendered bracket, returning where it ended up
    pub fn export(&mut self, path: Option<&Path>, format: ExportFormat) -> Option<PathBuf> {
        if self.state.is_none() {
            self.status.error("No bracket loaded");
            return None;
        }
        let content = match format {
            ExportFormat::Text => self.view.render_text(),
            ExportFormat::Html => self.view.render_html(),
        };
        let target = match path {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(export_file_name(&self.view.competition_name, format)),
        };

        self.status.processing("Exporting bracket...");
        let status = &mut self.status;
        let result = export(&content, &target, &self.config.export_fallback_dir, |fallback| {
            status.processing(format!(
                "Trying alternative approach: saving to {}",
                fallback.display()
            ))
        });
        match result {
            Ok(written) => {
                self.status
                    .success(format!("Exported bracket to {}", written.display()));
                Some(written)
            }
            Err(e) => {
                self.status.error(format!("Export failed: {}", e));
                None
            }
        }
    }

    fn install(&mut self, state: BracketState) {
        self.view = BracketView::from_state(&state);
        self.state = Some(state);
    }

    fn report_pick(&mut self, match_id: MatchId, name: &str) {
        if match_id == MatchId::Championship {
            self.status.success(format!("{} is the champion", name));
        } else {
            self.status
                .success(format!("{} wins {} and advances", name, match_id));
        }
    }

    fn persist(&mut self) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        if let Err(e) = self.store.save(state) {
            self.status.error(format!("Could not save bracket: {}", e));
        }
    }
}
