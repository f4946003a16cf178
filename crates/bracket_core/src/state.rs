//! Bracket data model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entrant::{parse_entrants, Entrant};
use crate::error::BracketError;
use crate::match_id::{BracketSize, BracketType, Feed, MatchId, SlotRef};
use crate::seed_table::seed_order;

/// Longest accepted competition name, in characters
pub const MAX_COMPETITION_NAME: usize = 100;

/// Recorded winner name per decided match
pub type WinnersMap = BTreeMap<MatchId, String>;

/// How entrants are placed into first-round slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Slot `i + 1` takes the `i`-th entrant as typed
    #[default]
    Sequential,
    /// Slots follow the standard seeding table, ranked by seed
    Seeded,
}

/// Entrant for every first-round position, keyed 1..=size
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotAssignment(BTreeMap<u8, Entrant>);

impl SlotAssignment {
    pub fn get(&self, position: u8) -> Option<&Entrant> {
        self.0.get(&position)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &Entrant)> {
        self.0.iter().map(|(&pos, entrant)| (pos, entrant))
    }

    /// Fills any missing position with a BYE and drops positions outside the bracket
    pub fn pad(&mut self, size: BracketSize) {
        let slots = size.slots() as u8;
        self.0.retain(|&pos, _| pos >= 1 && pos <= slots);
        for pos in 1..=slots {
            self.0
                .entry(pos)
                .or_insert_with(|| Entrant::bye(pos as u32));
        }
    }
}

impl FromIterator<(u8, Entrant)> for SlotAssignment {
    fn from_iter<I: IntoIterator<Item = (u8, Entrant)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Places entrants into slots in input order, padding with BYEs
pub fn assign_slots(entrants: &[Entrant], size: BracketSize) -> SlotAssignment {
    let slots = size.slots();
    if entrants.len() > slots {
        tracing::warn!(
            supplied = entrants.len(),
            slots,
            "more entrants than bracket slots, extras dropped"
        );
    }

    let mut assignment: SlotAssignment = entrants
        .iter()
        .take(slots)
        .enumerate()
        .map(|(i, entrant)| (i as u8 + 1, entrant.clone()))
        .collect();
    assignment.pad(size);
    assignment
}

/// Places entrants by seed rank using the standard seeding table
pub fn assign_seeded_slots(entrants: &[Entrant], size: BracketSize) -> SlotAssignment {
    if entrants.len() > size.slots() {
        tracing::warn!(
            supplied = entrants.len(),
            slots = size.slots(),
            "more entrants than bracket slots, lowest seeds dropped"
        );
    }

    let mut ranked: Vec<&Entrant> = entrants.iter().collect();
    ranked.sort_by_key(|e| e.seed);

    let mut assignment: SlotAssignment = seed_order(size)
        .iter()
        .enumerate()
        .filter_map(|(i, &rank)| {
            let entrant = ranked.get(rank as usize - 1)?;
            Some((i as u8 + 1, (*entrant).clone()))
        })
        .collect();
    assignment.pad(size);
    assignment
}

/// Complete state of one bracket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketState {
    pub competition_name: String,
    /// Entrants in input order
    #[serde(default)]
    pub entrants: Vec<Entrant>,
    #[serde(alias = "drivers")]
    pub slots: SlotAssignment,
    #[serde(default)]
    pub winners: WinnersMap,
    pub bracket_size: BracketSize,
    #[serde(default)]
    pub bracket_type: Option<BracketType>,
    #[serde(default, alias = "driverListText")]
    pub raw_entrant_text: String,
}

impl BracketState {
    /// Builds a fresh bracket from entrant text
    pub fn create(
        competition_name: &str,
        text: &str,
        placement: Placement,
    ) -> Result<Self, BracketError> {
        if competition_name.chars().count() > MAX_COMPETITION_NAME {
            return Err(BracketError::MalformedInput(format!(
                "competition name is longer than {} characters",
                MAX_COMPETITION_NAME
            )));
        }
        if text.trim().is_empty() {
            return Err(BracketError::MalformedInput(
                "entrant list is empty".to_string(),
            ));
        }
        let entrants = parse_entrants(text);
        if entrants.is_empty() {
            return Err(BracketError::MalformedInput(
                "no valid entrants found".to_string(),
            ));
        }

        let bracket_size = BracketSize::for_entrant_count(entrants.len());
        let slots = match placement {
            Placement::Sequential => assign_slots(&entrants, bracket_size),
            Placement::Seeded => assign_seeded_slots(&entrants, bracket_size),
        };

        Ok(Self {
            competition_name: competition_name.to_string(),
            entrants,
            slots,
            winners: WinnersMap::new(),
            bracket_size,
            bracket_type: Some(bracket_size.bracket_type()),
            raw_entrant_text: text.to_string(),
        })
    }

    pub fn bracket_type(&self) -> BracketType {
        self.bracket_type
            .unwrap_or_else(|| self.bracket_size.bracket_type())
    }

    /// Clears every recorded winner, keeping entrants and slots
    pub fn reset_winners(&mut self) {
        self.winners.clear();
    }

    /// Repairs externally loaded state so the slot invariant holds
    pub fn normalize(&mut self) {
        self.slots.pad(self.bracket_size);
        self.bracket_type = Some(self.bracket_size.bracket_type());
        self.winners.retain(|id, _| id.is_valid(self.bracket_size));

        if self.entrants.is_empty() {
            self.entrants = if self.raw_entrant_text.trim().is_empty() {
                self.slots
                    .iter()
                    .filter(|(_, e)| !e.is_bye)
                    .map(|(_, e)| e.clone())
                    .collect()
            } else {
                parse_entrants(&self.raw_entrant_text)
            };
        }
    }

    pub fn winner(&self, match_id: MatchId) -> Option<&str> {
        self.winners.get(&match_id).map(String::as_str)
    }

    pub fn champion(&self) -> Option<&str> {
        self.winner(MatchId::Championship)
    }

    /// Name currently feeding a match slot, if decided
    pub fn occupant(&self, slot: SlotRef) -> Option<&str> {
        match slot.feed(self.bracket_size)? {
            Feed::Position(pos) => self.slots.get(pos).map(|e| e.name.as_str()),
            Feed::Winner(id) => self.winner(id),
        }
    }

    /// Entrant at a first-round position
    pub fn entrant_at(&self, position: u8) -> Option<&Entrant> {
        self.slots.get(position)
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod state_tests;
