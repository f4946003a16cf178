//! Projection interface the engine drives.
//!
//! Implementors hold whatever visual representation they like; the engine
//! only tells them what changed. Selection state is always derived from the
//! winners map and pushed through `mark_selected` / `clear_selection`.

use crate::entrant::Entrant;
use crate::match_id::{MatchId, Side, SlotRef};

pub trait RenderAdapter {
    /// Show an entrant at a first-round position
    fn project_slot(&mut self, position: u8, entrant: &Entrant);

    /// Show an advanced winner in a later-round slot
    fn project_winner(&mut self, slot: SlotRef, name: &str);

    /// Blank a slot if it currently shows `name`
    fn clear_slot_text(&mut self, slot: SlotRef, name: &str);

    /// Highlight one side of a match as its winner, un-highlighting the other
    fn mark_selected(&mut self, match_id: MatchId, side: Side);

    /// Remove any highlight from a match
    fn clear_selection(&mut self, _match_id: MatchId) {}
}

/// Adapter that discards every projection
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRender;

impl RenderAdapter for NullRender {
    fn project_slot(&mut self, _position: u8, _entrant: &Entrant) {}

    fn project_winner(&mut self, _slot: SlotRef, _name: &str) {}

    fn clear_slot_text(&mut self, _slot: SlotRef, _name: &str) {}

    fn mark_selected(&mut self, _match_id: MatchId, _side: Side) {}
}
