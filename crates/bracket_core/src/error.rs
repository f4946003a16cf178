//! Error taxonomy for bracket construction and progression

use thiserror::Error;

use crate::match_id::MatchId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BracketError {
    /// Entrant text had no usable lines, or the competition name was too long
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A match id outside this bracket's geometry
    #[error("match {0} is not part of this bracket")]
    AddressingMiss(MatchId),

    /// Text did not name a match (`r{round}_m{number}` or `championship`)
    #[error("unknown match id: {0}")]
    UnknownMatch(String),
}
