//! In-memory bracket projection with text and HTML output

use bracket_core::{
    escape_html, restore_all, BracketSize, BracketState, Entrant, Feed, Half, MatchId,
    RenderAdapter, Side, SlotRef,
};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Display names for each round, championship last
pub fn round_names(size: BracketSize) -> &'static [&'static str] {
    match size {
        BracketSize::Top16 => &["Top 16", "Quarter Finals", "Semi Finals", "Final Battle"],
        BracketSize::Top32 => &["Top 32", "Top 16", "Great 8", "Final 4", "Final Battle"],
    }
}

/// What a page showing the bracket would currently display
#[derive(Debug, Clone, PartialEq)]
pub struct BracketView {
    pub competition_name: String,
    pub size: BracketSize,
    positions: BTreeMap<u8, Entrant>,
    slots: BTreeMap<SlotRef, String>,
    selected: BTreeMap<MatchId, Side>,
}

impl BracketView {
    pub fn new(competition_name: &str, size: BracketSize) -> Self {
        Self {
            competition_name: competition_name.to_string(),
            size,
            positions: BTreeMap::new(),
            slots: BTreeMap::new(),
            selected: BTreeMap::new(),
        }
    }

    /// Builds a view by replaying a whole state
    pub fn from_state(state: &BracketState) -> Self {
        let mut view = Self::new(&state.competition_name, state.bracket_size);
        restore_all(state, &mut view);
        view
    }

    /// Text shown in a match slot, if any
    pub fn slot_text(&self, slot: SlotRef) -> Option<&str> {
        match slot.feed(self.size)? {
            Feed::Position(pos) => self.positions.get(&pos).map(|e| e.name.as_str()),
            Feed::Winner(_) => self.slots.get(&slot).map(String::as_str),
        }
    }

    /// Seed label shown next to a first-round entrant
    fn seed_label(&self, slot: SlotRef) -> Option<u32> {
        match slot.feed(self.size)? {
            Feed::Position(pos) => self
                .positions
                .get(&pos)
                .filter(|e| !e.is_bye)
                .map(|e| e.seed),
            Feed::Winner(_) => None,
        }
    }

    pub fn selected(&self, match_id: MatchId) -> Option<Side> {
        self.selected.get(&match_id).copied()
    }

    pub fn champion(&self) -> Option<&str> {
        let side = self.selected(MatchId::Championship)?;
        self.slot_text(SlotRef::new(MatchId::Championship, side))
    }

    fn matches_in(&self, round: u8) -> impl Iterator<Item = MatchId> {
        (1..=self.size.matches_in_round(round)).map(move |number| MatchId::new(round, number))
    }

    /// Plain-text rendering, one line per match
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let names = round_names(self.size);
        let _ = writeln!(out, "=== {} ===", self.competition_name);
        let _ = writeln!(out, "{} bracket", names[0]);

        for round in 1..=self.size.final_round() {
            let _ = writeln!(out, "\n-- {} --", names[round as usize - 1]);
            for match_id in self.matches_in(round) {
                self.write_text_match(&mut out, match_id);
            }
        }

        let _ = writeln!(out, "\n-- {} --", names[names.len() - 1]);
        self.write_text_match(&mut out, MatchId::Championship);
        if let Some(champion) = self.champion() {
            let _ = writeln!(out, "\nChampion: {}", champion);
        }
        out
    }

    fn write_text_match(&self, out: &mut String, match_id: MatchId) {
        let cell = |side: Side| {
            let slot = SlotRef::new(match_id, side);
            let marker = if self.selected(match_id) == Some(side) {
                "*"
            } else {
                " "
            };
            let name = self.slot_text(slot).unwrap_or("-");
            match self.seed_label(slot) {
                Some(seed) => format!("{}{:>2} {}", marker, seed, name),
                None => format!("{}   {}", marker, name),
            }
        };
        let _ = writeln!(
            out,
            "{:<14} {:<28} vs {:<28}",
            match_id.to_string(),
            cell(Side::Top),
            cell(Side::Bottom)
        );
    }

    /// HTML rendering; every piece of free text is escaped
    pub fn render_html(&self) -> String {
        let mut out = String::new();
        let names = round_names(self.size);
        let class_prefix = self.size.bracket_type();

        let _ = writeln!(out, "<div id=\"bracket-container\" class=\"{}\">", class_prefix);
        let _ = writeln!(
            out,
            "  <div id=\"competition-name\">{}</div>",
            escape_html(&self.competition_name)
        );

        for (half, split) in [(Half::Left, "split-one"), (Half::Right, "split-two")] {
            let _ = writeln!(out, "  <section class=\"split {}\">", split);
            for round in 1..=self.size.final_round() {
                let _ = writeln!(
                    out,
                    "    <div class=\"round round-{}\" title=\"{}\">",
                    round_class(round),
                    escape_html(names[round as usize - 1])
                );
                for match_id in self.matches_in(round) {
                    if match_id.half(self.size) == Some(half) {
                        self.write_html_match(&mut out, match_id, "matchup");
                    }
                }
                let _ = writeln!(out, "    </div>");
            }
            let _ = writeln!(out, "  </section>");
        }

        let _ = writeln!(out, "  <div class=\"champion\">");
        self.write_html_match(&mut out, MatchId::Championship, "matchup championship");
        let _ = writeln!(out, "  </div>");
        let _ = writeln!(out, "</div>");
        out
    }

    fn write_html_match(&self, out: &mut String, match_id: MatchId, class: &str) {
        let _ = writeln!(out, "      <ul class=\"{}\" data-match=\"{}\">", class, match_id);
        for side in [Side::Top, Side::Bottom] {
            let slot = SlotRef::new(match_id, side);
            let selected = if self.selected(match_id) == Some(side) {
                " selected"
            } else {
                ""
            };
            let name = self.slot_text(slot).unwrap_or("");
            let seed = self
                .seed_label(slot)
                .map(|s| format!("<span class=\"qualif_num\">{}</span>", s))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "        <li class=\"{}{}\" title=\"{}\">{}{}</li>",
                side,
                selected,
                escape_html(name),
                seed,
                escape_html(name)
            );
        }
        let _ = writeln!(out, "      </ul>");
    }
}

fn round_class(round: u8) -> &'static str {
    match round {
        1 => "one",
        2 => "two",
        3 => "three",
        4 => "four",
        _ => "",
    }
}

impl RenderAdapter for BracketView {
    fn project_slot(&mut self, position: u8, entrant: &Entrant) {
        self.positions.insert(position, entrant.clone());
    }

    fn project_winner(&mut self, slot: SlotRef, name: &str) {
        self.slots.insert(slot, name.to_string());
    }

    fn clear_slot_text(&mut self, slot: SlotRef, name: &str) {
        if self.slots.get(&slot).is_some_and(|shown| shown == name) {
            self.slots.remove(&slot);
        }
    }

    fn mark_selected(&mut self, match_id: MatchId, side: Side) {
        self.selected.insert(match_id, side);
    }

    fn clear_selection(&mut self, match_id: MatchId) {
        self.selected.remove(&match_id);
    }
}
