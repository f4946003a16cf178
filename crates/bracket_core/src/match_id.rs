//! Bracket geometry and match addressing.
//!
//! A bracket of `n` slots has `n / 2` first-round matches, halving each round
//! until the final round, which holds the two half-bracket finals. The
//! championship is a separate virtual match fed by those two winners.
//!
//! Match numbers are global within a round: the left half holds the low
//! numbers and the right half the high ones. The right-half offset for round
//! `r` is `n / 4 >> (r - 1)` (8, 4, 2, 1 for a Top 32 bracket).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::BracketError;

/// Supported bracket sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum BracketSize {
    Top16,
    #[default]
    Top32,
}

impl BracketSize {
    /// Number of first-round slots
    pub fn slots(self) -> usize {
        match self {
            BracketSize::Top16 => 16,
            BracketSize::Top32 => 32,
        }
    }

    /// 16 or fewer entrants fit a Top 16 bracket, anything more needs Top 32
    pub fn for_entrant_count(count: usize) -> Self {
        if count <= 16 {
            BracketSize::Top16
        } else {
            BracketSize::Top32
        }
    }

    /// Last numbered round (the half-bracket finals)
    pub fn final_round(self) -> u8 {
        match self {
            BracketSize::Top16 => 3,
            BracketSize::Top32 => 4,
        }
    }

    /// Matches in a numbered round, 0 for rounds outside the bracket
    pub fn matches_in_round(self, round: u8) -> u8 {
        if round == 0 || round > self.final_round() {
            return 0;
        }
        (self.slots() / 2) as u8 >> (round - 1)
    }

    /// Number added to a right-half local index to get the global match number
    pub fn half_offset(self, round: u8) -> u8 {
        self.matches_in_round(round) / 2
    }

    pub fn bracket_type(self) -> BracketType {
        match self {
            BracketSize::Top16 => BracketType::Top16,
            BracketSize::Top32 => BracketType::Top32,
        }
    }

    /// Every match in dependency order, championship last
    pub fn all_matches(self) -> Vec<MatchId> {
        let mut ids = Vec::with_capacity(self.slots());
        for round in 1..=self.final_round() {
            for number in 1..=self.matches_in_round(round) {
                ids.push(MatchId::Round { round, number });
            }
        }
        ids.push(MatchId::Championship);
        ids
    }
}

impl TryFrom<u32> for BracketSize {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            16 => Ok(BracketSize::Top16),
            32 => Ok(BracketSize::Top32),
            other => Err(format!("unsupported bracket size {}", other)),
        }
    }
}

impl From<BracketSize> for u32 {
    fn from(size: BracketSize) -> Self {
        size.slots() as u32
    }
}

impl fmt::Display for BracketSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slots())
    }
}

/// Label persisted next to the size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BracketType {
    #[serde(rename = "top16")]
    Top16,
    #[default]
    #[serde(rename = "top32")]
    Top32,
}

impl fmt::Display for BracketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketType::Top16 => write!(f, "top16"),
            BracketType::Top32 => write!(f, "top32"),
        }
    }
}

/// Left or right half of the bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Half {
    Left,
    Right,
}

/// Position of a competitor within a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Top,
    Bottom,
}

impl Side {
    /// Odd match numbers feed the top slot, even ones the bottom slot
    pub fn for_feeder(number: u8) -> Side {
        if number % 2 == 1 {
            Side::Top
        } else {
            Side::Bottom
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Top => write!(f, "top"),
            Side::Bottom => write!(f, "bottom"),
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" | "t" => Ok(Side::Top),
            "bottom" | "b" => Ok(Side::Bottom),
            other => Err(format!("unknown side: {}", other)),
        }
    }
}

/// Identifier of a single match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchId {
    Round { round: u8, number: u8 },
    Championship,
}

impl MatchId {
    pub fn new(round: u8, number: u8) -> Self {
        MatchId::Round { round, number }
    }

    pub fn round(self) -> Option<u8> {
        match self {
            MatchId::Round { round, .. } => Some(round),
            MatchId::Championship => None,
        }
    }

    pub fn number(self) -> Option<u8> {
        match self {
            MatchId::Round { number, .. } => Some(number),
            MatchId::Championship => None,
        }
    }

    /// Whether the id names a real match in a bracket of this size
    pub fn is_valid(self, size: BracketSize) -> bool {
        match self {
            MatchId::Round { round, number } => {
                number >= 1 && number <= size.matches_in_round(round)
            }
            MatchId::Championship => true,
        }
    }

    /// Global id for the `local_index`-th (0-based) match of a half in `round`
    pub fn for_slot_pair(
        size: BracketSize,
        round: u8,
        local_index: u8,
        half: Half,
    ) -> Option<MatchId> {
        let offset = size.half_offset(round);
        if offset == 0 || local_index >= offset {
            return None;
        }
        let number = match half {
            Half::Left => local_index + 1,
            Half::Right => local_index + 1 + offset,
        };
        Some(MatchId::Round { round, number })
    }

    /// Half of the bracket the match belongs to (None for the championship)
    pub fn half(self, size: BracketSize) -> Option<Half> {
        let MatchId::Round { round, number } = self else {
            return None;
        };
        if !self.is_valid(size) {
            return None;
        }
        if number > size.half_offset(round) {
            Some(Half::Right)
        } else {
            Some(Half::Left)
        }
    }

    /// 0-based position of the match within its half
    pub fn local_index(self, size: BracketSize) -> Option<u8> {
        let MatchId::Round { round, number } = self else {
            return None;
        };
        match self.half(size)? {
            Half::Left => Some(number - 1),
            Half::Right => Some(number - 1 - size.half_offset(round)),
        }
    }

    /// The slot this match's winner advances into
    pub fn downstream(self, size: BracketSize) -> Option<SlotRef> {
        let MatchId::Round { round, number } = self else {
            return None;
        };
        if !self.is_valid(size) {
            return None;
        }
        let side = Side::for_feeder(number);
        if round == size.final_round() {
            return Some(SlotRef::new(MatchId::Championship, side));
        }
        let next = MatchId::Round {
            round: round + 1,
            number: (number - 1) / 2 + 1,
        };
        Some(SlotRef::new(next, side))
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchId::Round { round, number } => write!(f, "r{}_m{}", round, number),
            MatchId::Championship => write!(f, "championship"),
        }
    }
}

impl FromStr for MatchId {
    type Err = BracketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.eq_ignore_ascii_case("championship") {
            return Ok(MatchId::Championship);
        }
        let unknown = || BracketError::UnknownMatch(s.to_string());
        let rest = text.strip_prefix('r').ok_or_else(unknown)?;
        let (round, number) = rest.split_once("_m").ok_or_else(unknown)?;
        let round: u8 = round.parse().map_err(|_| unknown())?;
        let number: u8 = number.parse().map_err(|_| unknown())?;
        if round == 0 || number == 0 {
            return Err(unknown());
        }
        Ok(MatchId::Round { round, number })
    }
}

impl Serialize for MatchId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MatchId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// One competitor position inside a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotRef {
    pub match_id: MatchId,
    pub side: Side,
}

/// What fills a match slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    /// A first-round bracket position (1-based)
    Position(u8),
    /// The winner of an earlier match
    Winner(MatchId),
}

impl SlotRef {
    pub fn new(match_id: MatchId, side: Side) -> Self {
        Self { match_id, side }
    }

    /// Where this slot's occupant comes from
    pub fn feed(self, size: BracketSize) -> Option<Feed> {
        let offset = match self.side {
            Side::Top => 1,
            Side::Bottom => 0,
        };
        match self.match_id {
            MatchId::Championship => {
                let number = 2 - offset;
                Some(Feed::Winner(MatchId::new(size.final_round(), number)))
            }
            MatchId::Round { round, number } => {
                if !self.match_id.is_valid(size) {
                    return None;
                }
                let feeder = number * 2 - offset;
                if round == 1 {
                    Some(Feed::Position(feeder))
                } else {
                    Some(Feed::Winner(MatchId::new(round - 1, feeder)))
                }
            }
        }
    }
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.match_id, self.side)
    }
}

#[cfg(test)]
#[path = "match_id_tests.rs"]
mod match_id_tests;
