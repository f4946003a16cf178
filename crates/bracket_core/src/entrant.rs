//! Entrants and entrant-list parsing

use serde::{Deserialize, Serialize};

/// A single bracket competitor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entrant {
    pub name: String,
    pub seed: u32,
    #[serde(default)]
    pub is_bye: bool,
}

impl Entrant {
    pub fn new(name: &str, seed: u32) -> Self {
        Self {
            name: name.to_string(),
            seed,
            is_bye: is_bye_name(name),
        }
    }

    /// Synthetic placeholder for an unfilled slot
    pub fn bye(position: u32) -> Self {
        Self {
            name: "BYE".to_string(),
            seed: position,
            is_bye: true,
        }
    }
}

pub fn is_bye_name(name: &str) -> bool {
    name.eq_ignore_ascii_case("bye")
}

/// Parses one entrant per non-blank line.
///
/// `Name, Seed` lines take an explicit seed; otherwise (or when the seed
/// field has no leading number or is zero) the seed is the 1-based line
/// number within the trimmed text, blank lines included.
pub fn parse_entrants(text: &str) -> Vec<Entrant> {
    let mut entrants = Vec::new();

    for (index, raw) in text.trim().split('\n').enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let line_seed = index as u32 + 1;

        let (name, seed) = match line.split_once(',') {
            Some((name, rest)) => {
                let field = rest.split(',').next().unwrap_or("");
                let seed = leading_number(field)
                    .filter(|&s| s > 0)
                    .unwrap_or(line_seed);
                (name.trim(), seed)
            }
            None => (line, line_seed),
        };

        if name.is_empty() {
            continue;
        }
        entrants.push(Entrant::new(name, seed));
    }

    entrants
}

/// Leading decimal digits of a trimmed field
fn leading_number(field: &str) -> Option<u32> {
    let field = field.trim();
    let end = field
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(field.len());
    field[..end].parse().ok()
}

#[cfg(test)]
#[path = "entrant_tests.rs"]
mod entrant_tests;
