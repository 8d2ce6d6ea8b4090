//! Gradient edit request model
//!
//! Defines the structured form a prompt is interpreted into:
//! - Target selectors (id, class, tag)
//! - Gradient kind and direction
//! - Color stops
//! - The edit plan (one request per instruction clause)
//!
//! These types double as the wire format for the LLM-backed interpreter and
//! as the structured log output, so everything derives serde.

use serde::{Deserialize, Serialize};

/// How a selector identifies elements in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorKind {
    /// Exact match on the `id` attribute
    Id,
    /// Membership test on the whitespace-separated `class` attribute
    Class,
    /// Exact tag-name match
    Tag,
}

/// Identifies zero or more elements in an SVG document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectorSpec {
    /// Selection mechanism
    pub kind: SelectorKind,
    /// Id, class name, or tag name
    pub value: String,
}

impl SelectorSpec {
    /// Selector matching the element with the given id.
    #[inline]
    #[must_use]
    pub fn id(value: impl Into<String>) -> Self {
        Self {
            kind: SelectorKind::Id,
            value: value.into(),
        }
    }

    /// Selector matching all elements carrying the given class.
    #[inline]
    #[must_use]
    pub fn class(value: impl Into<String>) -> Self {
        Self {
            kind: SelectorKind::Class,
            value: value.into(),
        }
    }

    /// Selector matching all elements with the given tag name.
    #[inline]
    #[must_use]
    pub fn tag(value: impl Into<String>) -> Self {
        Self {
            kind: SelectorKind::Tag,
            value: value.into(),
        }
    }

    /// Identifier-safe rendering used when deriving gradient ids.
    ///
    /// Keeps ASCII alphanumerics, maps everything else to `-`.
    #[must_use]
    pub fn slug(&self) -> String {
        self.value
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect()
    }
}

impl std::fmt::Display for SelectorSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            SelectorKind::Id => write!(f, "#{}", self.value),
            SelectorKind::Class => write!(f, ".{}", self.value),
            SelectorKind::Tag => write!(f, "{}", self.value),
        }
    }
}

/// Gradient flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    /// `linearGradient`
    Linear,
    /// `radialGradient`
    Radial,
}

impl GradientKind {
    /// SVG element name for this kind.
    #[inline]
    #[must_use]
    pub fn element_name(self) -> &'static str {
        match self {
            Self::Linear => "linearGradient",
            Self::Radial => "radialGradient",
        }
    }
}

/// Direction of a linear gradient.
///
/// The three keyword directions are aliases for fixed angles; an explicit
/// angle expression in the prompt overrides them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Left to right (0°)
    Horizontal,
    /// Top to bottom (90°)
    Vertical,
    /// Top-left to bottom-right (45°)
    Diagonal,
    /// Explicit angle in degrees
    Angle(f32),
}

impl Direction {
    /// The angle in degrees this direction stands for.
    #[inline]
    #[must_use]
    pub fn degrees(self) -> f32 {
        match self {
            Self::Horizontal => 0.0,
            Self::Vertical => 90.0,
            Self::Diagonal => 45.0,
            Self::Angle(deg) => deg,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Horizontal => write!(f, "horizontal (0°)"),
            Self::Vertical => write!(f, "vertical (90°)"),
            Self::Diagonal => write!(f, "diagonal (45°)"),
            Self::Angle(deg) => write!(f, "{deg}°"),
        }
    }
}

/// A color transition point within a gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position in [0, 1]
    pub offset: f32,
    /// Color as written in the prompt (named color or hex code)
    pub color: String,
}

impl GradientStop {
    /// New stop; the offset is clamped into [0, 1].
    #[inline]
    #[must_use]
    pub fn new(offset: f32, color: impl Into<String>) -> Self {
        Self {
            offset: offset.clamp(0.0, 1.0),
            color: color.into(),
        }
    }
}

/// Which paint attribute of the targeted elements gets rewired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaintTarget {
    /// The `fill` attribute (default)
    #[default]
    Fill,
    /// The `stroke` attribute ("stroke"/"border"/"outline" in the prompt)
    Stroke,
}

impl PaintTarget {
    /// Attribute name on the target element.
    #[inline]
    #[must_use]
    pub fn attribute(self) -> &'static str {
        match self {
            Self::Fill => "fill",
            Self::Stroke => "stroke",
        }
    }
}

/// One structured gradient edit, immutable once built.
///
/// Invariants upheld by both interpreters: at least one stop, offsets
/// non-decreasing and within [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientEditRequest {
    /// Which element(s) to patch
    pub target: SelectorSpec,
    /// Linear or radial
    pub kind: GradientKind,
    /// Direction (meaningful for linear gradients)
    pub direction: Direction,
    /// Fill or stroke rewiring
    #[serde(default)]
    pub paint: PaintTarget,
    /// Ordered color stops
    pub stops: Vec<GradientStop>,
}

impl GradientEditRequest {
    /// Sort stops by offset and clamp them into [0, 1].
    ///
    /// Interpreters call this once before handing the request out, so
    /// consumers can rely on the ordering invariant.
    pub fn normalize_stops(&mut self) {
        for stop in &mut self.stops {
            stop.offset = stop.offset.clamp(0.0, 1.0);
        }
        self.stops
            .sort_by(|a, b| a.offset.partial_cmp(&b.offset).unwrap_or(std::cmp::Ordering::Equal));
    }
}

/// Output of a prompt interpreter: one request per instruction clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditPlan {
    /// Requests in the order the clauses appeared
    pub requests: Vec<GradientEditRequest>,
    /// Non-fatal interpretation notes (ambiguous targets, skipped clauses)
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl EditPlan {
    /// Plan holding a single request.
    #[inline]
    #[must_use]
    pub fn single(request: GradientEditRequest) -> Self {
        Self {
            requests: vec![request],
            warnings: Vec::new(),
        }
    }
}

/// Second stop synthesized when a prompt names exactly one color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackColor {
    /// Fade to white
    #[default]
    White,
    /// Fade to transparent
    Transparent,
}

impl FallbackColor {
    /// The color value written into the synthesized stop.
    #[inline]
    #[must_use]
    pub fn as_color(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Transparent => "transparent",
        }
    }
}
