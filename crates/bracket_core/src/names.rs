//! Entrant name normalization and escaping

const SEED_MARKUP_OPEN: &str = "<span class=\"qualif_num\">";
const SEED_MARKUP_CLOSE: &str = "</span>";

/// Reduces a displayed name to the bare entrant name.
///
/// Removes embedded seed markup (`<span class="qualif_num">N</span>`), a
/// leading number with its trailing whitespace, and a trailing number with
/// its leading whitespace. All engine comparisons use this form.
pub fn clean_name(name: &str) -> String {
    let stripped = strip_seed_markup(name);

    let mut text = stripped.as_str();
    let leading = text.len() - text.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if leading > 0 {
        text = text[leading..].trim_start();
    }

    let without_digits = text.trim_end_matches(|c: char| c.is_ascii_digit());
    if without_digits.len() < text.len() {
        text = without_digits.trim_end();
    }

    text.trim().to_string()
}

/// Equality on normalized names
pub fn same_entrant(a: &str, b: &str) -> bool {
    clean_name(a) == clean_name(b)
}

fn strip_seed_markup(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut rest = name;
    while let Some(start) = rest.find(SEED_MARKUP_OPEN) {
        let after_open = &rest[start + SEED_MARKUP_OPEN.len()..];
        let digits = after_open.len()
            - after_open
                .trim_start_matches(|c: char| c.is_ascii_digit())
                .len();
        if digits > 0 && after_open[digits..].starts_with(SEED_MARKUP_CLOSE) {
            out.push_str(&rest[..start]);
            rest = &after_open[digits + SEED_MARKUP_CLOSE.len()..];
        } else {
            out.push_str(&rest[..start + SEED_MARKUP_OPEN.len()]);
            rest = after_open;
        }
    }
    out.push_str(rest);
    out
}

/// Escapes text for inclusion in HTML element content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
