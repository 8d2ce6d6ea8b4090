//! Color vocabulary
//!
//! The set of color tokens the pipeline recognizes: a fixed table of common
//! named colors plus 3- and 6-digit hex codes. The table is shared between
//! the keyword interpreter (extraction) and the validator (stop checking).

use once_cell::sync::Lazy;
use regex::Regex;

/// Named colors the interpreter recognizes, with their hex equivalents.
///
/// The hex side is exposed for callers that need a concrete value (for
/// example a renderer); the pipeline itself preserves the name as written.
pub const NAMED_COLORS: &[(&str, &str)] = &[
    ("red", "#ff0000"),
    ("green", "#00ff00"),
    ("blue", "#0000ff"),
    ("white", "#ffffff"),
    ("black", "#000000"),
    ("yellow", "#ffff00"),
    ("purple", "#800080"),
    ("orange", "#ffa500"),
    ("gray", "#808080"),
    ("grey", "#808080"),
    ("cyan", "#00ffff"),
    ("magenta", "#ff00ff"),
    ("lime", "#00ff00"),
    ("maroon", "#800000"),
    ("navy", "#000080"),
    ("olive", "#808000"),
    ("teal", "#008080"),
    ("silver", "#c0c0c0"),
    ("gold", "#ffd700"),
    ("pink", "#ffc0cb"),
    ("brown", "#a52a2a"),
];

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:[0-9a-f]{3}|[0-9a-f]{6})$").unwrap());

/// Hex value for a named color, if the name is in the table.
#[must_use]
pub fn named_to_hex(name: &str) -> Option<&'static str> {
    let name = name.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, hex)| *hex)
}

/// Canonical form of a recognizable color token, or `None`.
///
/// Named colors come back lowercased as written; hex codes come back
/// lowercased. Unknown tokens are rejected.
#[must_use]
pub fn canonicalize(token: &str) -> Option<String> {
    let lower = token.trim().to_ascii_lowercase();
    if HEX_COLOR.is_match(&lower) {
        return Some(lower);
    }
    if named_to_hex(&lower).is_some() {
        return Some(lower);
    }
    None
}

/// Whether a value is acceptable as a `stop-color`.
///
/// Accepts the named table, hex codes, and `transparent` (used by the
/// single-color fallback).
#[must_use]
pub fn is_recognizable(value: &str) -> bool {
    let lower = value.trim().to_ascii_lowercase();
    lower == "transparent" || canonicalize(&lower).is_some()
}
