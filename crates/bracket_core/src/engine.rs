//! Winner recording, advancement and cascade invalidation.
//!
//! Every function takes the live `BracketState` explicitly. The winners map is
//! the only source of truth; render adapters are told what to show but are
//! never read back.

use tracing::{debug, warn};

use crate::entrant::is_bye_name;
use crate::match_id::{MatchId, Side, SlotRef};
use crate::names::{clean_name, same_entrant};
use crate::render::RenderAdapter;
use crate::state::BracketState;

/// Records `winner` for `match_id` and advances them one round.
///
/// A different previous winner is first removed from every later match it
/// had reached. Returns the slot the winner was advanced into, or `None` for
/// the championship and for ids outside the bracket. Out-of-bracket ids are
/// logged and leave the state untouched.
pub fn record_winner(
    state: &mut BracketState,
    match_id: MatchId,
    winner: &str,
    render: &mut dyn RenderAdapter,
) -> Option<SlotRef> {
    if !match_id.is_valid(state.bracket_size) {
        warn!(
            match_id = %match_id,
            size = %state.bracket_size,
            "match is outside the bracket, winner ignored"
        );
        return None;
    }

    if let Some(previous) = state.winners.get(&match_id).cloned() {
        if !same_entrant(&previous, winner) {
            cascade_invalidate(state, match_id, &previous, render);
        }
    }

    state.winners.insert(match_id, winner.to_string());
    project_selection(state, match_id, render);
    advance(state, match_id, winner, render)
}

/// Removes `winner` from the match downstream of `match_id`, recursively.
///
/// Only later matches whose recorded winner is the same entrant are cleared;
/// the slot fed by `match_id` is blanked if it still shows that entrant.
pub fn cascade_invalidate(
    state: &mut BracketState,
    match_id: MatchId,
    winner: &str,
    render: &mut dyn RenderAdapter,
) {
    let Some(target) = match_id.downstream(state.bracket_size) else {
        return;
    };
    let name = clean_name(winner);
    let next = target.match_id;

    if let Some(next_winner) = state.winners.get(&next).cloned() {
        if clean_name(&next_winner) == name {
            cascade_invalidate(state, next, &next_winner, render);
            state.winners.remove(&next);
            render.clear_selection(next);
            debug!(match_id = %next, name = %name, "cleared stale winner");
        }
    }

    render.clear_slot_text(target, &name);
}

/// Rebuilds every projection from a loaded state.
///
/// Slots are projected first, then recorded winners are advanced in round
/// order without cascading, then selection is marked from the winners map.
pub fn restore_all(state: &BracketState, render: &mut dyn RenderAdapter) {
    for (position, entrant) in state.slots.iter() {
        render.project_slot(position, entrant);
    }

    let snapshot: Vec<(MatchId, String)> = state
        .winners
        .iter()
        .filter(|(id, _)| **id != MatchId::Championship)
        .map(|(id, name)| (*id, name.clone()))
        .collect();
    for (match_id, winner) in &snapshot {
        advance(state, *match_id, winner, render);
    }

    for match_id in state.bracket_size.all_matches() {
        if match_id == MatchId::Championship {
            continue;
        }
        project_selection(state, match_id, render);
    }

    // The championship has no downstream, only a highlighted finalist
    project_selection(state, MatchId::Championship, render);
}

/// Records the occupant of `slot` as the winner of its match.
///
/// This is what a click on a displayed entrant translates into. An empty slot
/// is logged and ignored.
pub fn select_slot(
    state: &mut BracketState,
    slot: SlotRef,
    render: &mut dyn RenderAdapter,
) -> Option<SlotRef> {
    let name = match state.occupant(slot).map(clean_name) {
        Some(name) if !name.is_empty() => name,
        _ => {
            warn!(slot = %slot, "no entrant in selected slot");
            return None;
        }
    };
    record_winner(state, slot.match_id, &name, render)
}

/// Advances the real entrant of every undecided match against a BYE.
///
/// Matches are visited in round order, so a walkover can feed another
/// walkover in the same call. BYE against BYE stays undecided.
pub fn advance_byes(state: &mut BracketState, render: &mut dyn RenderAdapter) -> usize {
    let mut advanced = 0;
    for match_id in state.bracket_size.all_matches() {
        if state.winners.contains_key(&match_id) {
            continue;
        }
        let top = state.occupant(SlotRef::new(match_id, Side::Top));
        let bottom = state.occupant(SlotRef::new(match_id, Side::Bottom));
        let walkover = match (top, bottom) {
            (Some(t), Some(b)) if is_bye_name(b) && !is_bye_name(t) => t.to_string(),
            (Some(t), Some(b)) if is_bye_name(t) && !is_bye_name(b) => b.to_string(),
            _ => continue,
        };
        record_winner(state, match_id, &walkover, render);
        advanced += 1;
    }
    advanced
}

/// Side of `match_id` whose occupant is the recorded winner
pub fn selected_side(state: &BracketState, match_id: MatchId) -> Option<Side> {
    let winner = state.winner(match_id)?;
    let cleaned = clean_name(winner);
    [Side::Top, Side::Bottom].into_iter().find(|&side| {
        state
            .occupant(SlotRef::new(match_id, side))
            .is_some_and(|shown| shown == winner || clean_name(shown) == cleaned)
    })
}

fn advance(
    state: &BracketState,
    match_id: MatchId,
    winner: &str,
    render: &mut dyn RenderAdapter,
) -> Option<SlotRef> {
    if match_id == MatchId::Championship {
        return None;
    }
    let Some(target) = match_id.downstream(state.bracket_size) else {
        warn!(match_id = %match_id, "could not locate downstream slot");
        return None;
    };

    let name = clean_name(winner);
    render.project_winner(target, &name);
    debug!(
        name = %name,
        half = ?match_id.half(state.bracket_size),
        target = %target,
        "advanced winner"
    );
    Some(target)
}

fn project_selection(state: &BracketState, match_id: MatchId, render: &mut dyn RenderAdapter) {
    match selected_side(state, match_id) {
        Some(side) => render.mark_selected(match_id, side),
        None => render.clear_selection(match_id),
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
