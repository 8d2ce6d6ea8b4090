//! Deterministic keyword interpreter
//!
//! Pattern matching over normalized (lower-cased, whitespace-collapsed)
//! instruction text. Pure function of the input string plus configuration;
//! always available as the fallback behind the LLM-backed variant.

use crate::color;
use crate::error::PromptError;
use crate::types::{
    Direction, EditPlan, FallbackColor, GradientEditRequest, GradientKind, GradientStop,
    PaintTarget, SelectorSpec,
};
use crate::PromptInterpreter;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

static CLAUSE_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*(?:,|\band\b|\bthen\b)\s+").unwrap());

static ID_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bid\s*[`'"]?([a-z_][a-z0-9_-]*)"#).unwrap());

static ID_HASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"#([a-z0-9_-]+)").unwrap());

static CLASS_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bclass\s*[`'"]?([a-z_][a-z0-9_-]*)"#).unwrap());

static CLASS_DOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.([a-z_][a-z0-9_-]*)").unwrap());

static TAG_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(circles?|rect(?:angle)?s?|ellipses?|polygons?|polylines?|paths?|lines?|texts?)\b",
    )
    .unwrap()
});

static ANGLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(-?\d+(?:\.\d+)?)\s*(?:degrees?\b|deg\b|°)").unwrap());

static PERCENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d+(?:\.\d+)?)\s*%").unwrap());

static COLOR_TOKEN: Lazy<Regex> = Lazy::new(|| {
    let names: Vec<&str> = color::NAMED_COLORS.iter().map(|(n, _)| *n).collect();
    let pattern = format!(r"#[0-9a-f]{{3,8}}\b|\b(?:{})\b", names.join("|"));
    Regex::new(&pattern).unwrap()
});

/// The deterministic prompt interpreter.
///
/// Configured only with the fallback color used when a prompt names a single
/// color; everything else is derived from the instruction text.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordInterpreter {
    fallback: FallbackColor,
}

impl KeywordInterpreter {
    /// Interpreter with the given single-color fallback.
    #[inline]
    #[must_use]
    pub fn new(fallback: FallbackColor) -> Self {
        Self { fallback }
    }

    /// Interpret an instruction without going through the async trait.
    ///
    /// Compound instructions split on `,` / `and` / `then` yield one request
    /// per clause. Clauses that fail to parse become plan warnings; the call
    /// fails only when no clause yields a request.
    pub fn interpret_str(&self, prompt: &str) -> Result<EditPlan, PromptError> {
        let normalized = normalize(prompt);
        if normalized.is_empty() {
            return Err(PromptError::unparsable("empty instruction"));
        }

        let mut requests = Vec::new();
        let mut warnings = Vec::new();
        let mut first_failure: Option<String> = None;

        for clause in CLAUSE_SPLIT.split(&normalized) {
            let clause = clause.trim();
            if clause.is_empty() {
                continue;
            }
            tracing::debug!(clause, "interpreting clause");
            match self.parse_clause(clause, &mut warnings) {
                Ok(request) => requests.push(request),
                Err(reason) => {
                    if first_failure.is_none() {
                        first_failure = Some(reason.clone());
                    }
                    warnings.push(format!("skipped clause \"{clause}\": {reason}"));
                }
            }
        }

        if requests.is_empty() {
            return Err(PromptError::unparsable(
                first_failure.unwrap_or_else(|| "no instruction clauses found".to_string()),
            ));
        }
        Ok(EditPlan { requests, warnings })
    }

    fn parse_clause(
        &self,
        clause: &str,
        warnings: &mut Vec<String>,
    ) -> Result<GradientEditRequest, String> {
        let target = extract_target(clause, warnings);
        let stops = self.extract_stops(clause, warnings);

        match (target, stops) {
            (Some(target), Some(stops)) => {
                let kind = if clause.contains("radial") {
                    GradientKind::Radial
                } else {
                    GradientKind::Linear
                };
                let mut request = GradientEditRequest {
                    target,
                    kind,
                    direction: extract_direction(clause),
                    paint: extract_paint(clause),
                    stops,
                };
                request.normalize_stops();
                Ok(request)
            }
            (None, None) => Err("no recognizable target or color".to_string()),
            (None, _) => Err("no recognizable target".to_string()),
            (_, None) => Err("no recognizable color".to_string()),
        }
    }

    /// Color stops for one clause, or `None` when the clause names no color.
    fn extract_stops(&self, clause: &str, warnings: &mut Vec<String>) -> Option<Vec<GradientStop>> {
        let mut colors: Vec<String> = COLOR_TOKEN
            .find_iter(clause)
            .filter_map(|m| color::canonicalize(m.as_str()))
            .collect();
        if colors.is_empty() {
            return None;
        }
        if colors.len() == 1 {
            colors.push(self.fallback.as_color().to_string());
        }

        let percents: Vec<f32> = PERCENT
            .captures_iter(clause)
            .filter_map(|c| c[1].parse::<f32>().ok())
            .collect();

        let stops = if percents.len() == colors.len() {
            colors
                .into_iter()
                .zip(percents)
                .map(|(color, pct)| GradientStop::new(pct / 100.0, color))
                .collect()
        } else {
            if !percents.is_empty() {
                warnings.push(format!(
                    "clause \"{clause}\": {} percentage(s) for {} color(s); distributing stops evenly",
                    percents.len(),
                    colors.len()
                ));
            }
            even_stops(colors)
        };
        Some(stops)
    }
}

#[async_trait]
impl PromptInterpreter for KeywordInterpreter {
    async fn interpret(&self, prompt: &str) -> Result<EditPlan, PromptError> {
        self.interpret_str(prompt)
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}

fn normalize(prompt: &str) -> String {
    prompt
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Distribute stops evenly across [0, 1].
fn even_stops(colors: Vec<String>) -> Vec<GradientStop> {
    let n = colors.len();
    colors
        .into_iter()
        .enumerate()
        .map(|(i, color)| {
            let offset = if n > 1 { i as f32 / (n - 1) as f32 } else { 0.0 };
            GradientStop::new(offset, color)
        })
        .collect()
}

/// Find the target selector for one clause.
///
/// All selector hints are collected in order of appearance; when more than
/// one distinct hint is present the first wins and the ambiguity is recorded
/// as a warning rather than silently guessed away.
fn extract_target(clause: &str, warnings: &mut Vec<String>) -> Option<SelectorSpec> {
    let mut hints: Vec<(usize, SelectorSpec)> = Vec::new();

    for cap in ID_ATTR.captures_iter(clause) {
        let m = cap.get(0).unwrap();
        hints.push((m.start(), SelectorSpec::id(&cap[1])));
    }
    for cap in ID_HASH.captures_iter(clause) {
        let m = cap.get(0).unwrap();
        // A hash token that reads as a hex code is a color, not an id.
        if color::canonicalize(m.as_str()).is_some() {
            continue;
        }
        hints.push((m.start(), SelectorSpec::id(&cap[1])));
    }
    for cap in CLASS_ATTR.captures_iter(clause) {
        let m = cap.get(0).unwrap();
        hints.push((m.start(), SelectorSpec::class(&cap[1])));
    }
    for cap in CLASS_DOT.captures_iter(clause) {
        let m = cap.get(0).unwrap();
        hints.push((m.start(), SelectorSpec::class(&cap[1])));
    }
    for cap in TAG_WORD.captures_iter(clause) {
        let m = cap.get(0).unwrap();
        hints.push((m.start(), SelectorSpec::tag(canonical_tag(&cap[1]))));
    }

    hints.sort_by_key(|(pos, _)| *pos);
    hints.dedup_by(|a, b| a.1 == b.1);

    let (_, first) = hints.first()?.clone();
    if hints.len() > 1 {
        let rest: Vec<String> = hints[1..].iter().map(|(_, s)| s.to_string()).collect();
        warnings.push(format!(
            "ambiguous target in \"{clause}\": using {first}, ignoring {}",
            rest.join(", ")
        ));
    }
    Some(first)
}

/// Map a matched tag word to its SVG tag name (plural stripped).
fn canonical_tag(word: &str) -> &'static str {
    let singular = word.strip_suffix('s').unwrap_or(word);
    match singular {
        "circle" => "circle",
        "ellipse" => "ellipse",
        "polygon" => "polygon",
        "polyline" => "polyline",
        "path" => "path",
        "line" => "line",
        "text" => "text",
        _ => "rect",
    }
}

fn extract_direction(clause: &str) -> Direction {
    if let Some(cap) = ANGLE.captures(clause) {
        if let Ok(deg) = cap[1].parse::<f32>() {
            return Direction::Angle(deg);
        }
    }
    if clause.contains("vertical") {
        Direction::Vertical
    } else if clause.contains("diagonal") {
        Direction::Diagonal
    } else {
        Direction::Horizontal
    }
}

fn extract_paint(clause: &str) -> PaintTarget {
    static STROKE_WORD: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\b(?:stroke|border|outline)\b").unwrap());
    if STROKE_WORD.is_match(clause) {
        PaintTarget::Stroke
    } else {
        PaintTarget::Fill
    }
}
