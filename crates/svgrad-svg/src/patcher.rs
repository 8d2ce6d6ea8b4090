//! SVG Patcher
//!
//! Applies a gradient edit request to a parsed document:
//! - Resolves the target selector (fails on zero matches)
//! - Synthesizes the gradient definition with a deterministic id
//! - Inserts it into `<defs>` (creating the container when absent)
//! - Rewires each matched element's fill or stroke to `url(#id)`
//!
//! A gradient created earlier in the same session is rewritten in place when
//! a matched element still references it, so repeated edits do not pile up
//! orphaned definitions.

use crate::document::{Element, SvgDocument};
use crate::error::SvgError;
use crate::selector;
use std::collections::HashSet;
use svgrad_prompt::{Direction, GradientEditRequest, GradientKind, GradientStop};

/// What one [`GradientPatcher::apply`] call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchSummary {
    /// Id of the gradient definition written
    pub gradient_id: String,
    /// How many elements were rewired to it
    pub elements_patched: usize,
    /// Whether an existing session definition was rewritten instead of
    /// a new one being created
    pub reused_definition: bool,
}

/// Session state for gradient patching.
///
/// The id counter makes output reproducible across runs with identical
/// input; the issued-id set backs the rewrite-in-place rule.
#[derive(Debug, Default)]
pub struct GradientPatcher {
    counter: usize,
    issued: HashSet<String>,
}

impl GradientPatcher {
    /// Fresh session with no issued gradients.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one edit request to the document.
    ///
    /// Fails with [`SvgError::TargetNotFound`] when the selector matches
    /// nothing; the document is untouched in that case.
    pub fn apply(
        &mut self,
        doc: &mut SvgDocument,
        request: &GradientEditRequest,
    ) -> Result<PatchSummary, SvgError> {
        let paint_attr = request.paint.attribute();

        let matched = selector::find_all(doc, &request.target);
        if matched.is_empty() {
            return Err(SvgError::TargetNotFound {
                selector: request.target.to_string(),
            });
        }

        // Rewrite-in-place: the first matched element still pointing at a
        // gradient from this session decides the id to reuse.
        let reuse_id = matched
            .iter()
            .filter_map(|el| el.attr(paint_attr).and_then(url_ref))
            .find(|id| self.issued.contains(*id))
            .map(str::to_string);

        let (gradient_id, reused) = match reuse_id {
            Some(id) => (id, true),
            None => (self.next_id(doc, &request.target.slug()), false),
        };

        let gradient = build_gradient(&gradient_id, request);
        tracing::debug!(
            id = %gradient_id,
            kind = ?request.kind,
            reused,
            "writing gradient definition"
        );

        let defs = doc.defs_mut();
        if reused {
            let exists = defs
                .child_elements()
                .any(|el| el.attr("id") == Some(gradient_id.as_str()));
            if exists {
                let existing = defs
                    .child_elements_mut()
                    .find(|el| el.attr("id") == Some(gradient_id.as_str()))
                    .expect("definition just found");
                *existing = gradient;
            } else {
                defs.push_element(gradient);
            }
        } else {
            defs.push_element(gradient);
            self.issued.insert(gradient_id.clone());
        }

        let reference = format!("url(#{gradient_id})");
        let elements_patched = selector::for_each_matching(doc, &request.target, &mut |el| {
            el.set_attr(paint_attr, reference.clone());
        });

        tracing::info!(
            selector = %request.target,
            id = %gradient_id,
            elements_patched,
            "gradient applied"
        );
        Ok(PatchSummary {
            gradient_id,
            elements_patched,
            reused_definition: reused,
        })
    }

    /// Next free deterministic id for the selector.
    ///
    /// Skips ids already present in the document so pre-existing definitions
    /// are never clobbered.
    fn next_id(&mut self, doc: &SvgDocument, slug: &str) -> String {
        loop {
            self.counter += 1;
            let id = format!("grad-{slug}-{}", self.counter);
            if doc.element_by_id(&id).is_none() {
                return id;
            }
        }
    }
}

/// The gradient id referenced by a `url(#...)` paint value, if any.
fn url_ref(value: &str) -> Option<&str> {
    value
        .trim()
        .strip_prefix("url(#")
        .and_then(|rest| rest.strip_suffix(')'))
}

fn build_gradient(id: &str, request: &GradientEditRequest) -> Element {
    let mut gradient = Element::new(request.kind.element_name()).with_attr("id", id);
    match request.kind {
        GradientKind::Linear => {
            let (x1, y1, x2, y2) = linear_coords(request.direction);
            gradient.set_attr("x1", x1);
            gradient.set_attr("y1", y1);
            gradient.set_attr("x2", x2);
            gradient.set_attr("y2", y2);
        }
        GradientKind::Radial => {
            for (k, v) in [("cx", "50%"), ("cy", "50%"), ("r", "50%"), ("fx", "50%"), ("fy", "50%")] {
                gradient.set_attr(k, v);
            }
        }
    }
    for stop in &request.stops {
        gradient.push_element(build_stop(stop));
    }
    gradient
}

fn build_stop(stop: &GradientStop) -> Element {
    Element::new("stop")
        .with_attr("offset", fmt_percent(stop.offset * 100.0))
        .with_attr("stop-color", stop.color.clone())
}

/// Gradient vector endpoints as percentages of the element box.
fn linear_coords(direction: Direction) -> (String, String, String, String) {
    let fixed = |x1: &str, y1: &str, x2: &str, y2: &str| {
        (x1.to_string(), y1.to_string(), x2.to_string(), y2.to_string())
    };
    match direction {
        Direction::Horizontal => fixed("0%", "0%", "100%", "0%"),
        Direction::Vertical => fixed("0%", "0%", "0%", "100%"),
        Direction::Diagonal => fixed("0%", "0%", "100%", "100%"),
        Direction::Angle(deg) => {
            // Run the vector through the box center.
            let rad = deg.to_radians();
            let (dx, dy) = (rad.cos() * 50.0, rad.sin() * 50.0);
            (
                fmt_percent(50.0 - dx),
                fmt_percent(50.0 - dy),
                fmt_percent(50.0 + dx),
                fmt_percent(50.0 + dy),
            )
        }
    }
}

/// Percent string, dropping a trailing `.0`.
fn fmt_percent(value: f32) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{}%", rounded as i64)
    } else {
        format!("{rounded:.1}%")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use svgrad_prompt::{PaintTarget, SelectorSpec};

    const DOC: &str = r#"<svg width="300" height="300" xmlns="http://www.w3.org/2000/svg">
  <rect id="hero" x="50" y="50" width="200" height="100" fill="red"/>
  <circle cx="150" cy="200" r="40" fill="green"/>
  <rect x="20" y="20" width="50" height="50" fill="blue" class="small-box"/>
</svg>"#;

    fn request(target: SelectorSpec, kind: GradientKind) -> GradientEditRequest {
        GradientEditRequest {
            target,
            kind,
            direction: Direction::Horizontal,
            paint: PaintTarget::Fill,
            stops: vec![
                GradientStop::new(0.0, "red"),
                GradientStop::new(1.0, "yellow"),
            ],
        }
    }

    #[test]
    fn patches_circle_with_radial_gradient() {
        let mut doc = SvgDocument::parse(DOC).unwrap();
        let mut patcher = GradientPatcher::new();
        let summary = patcher
            .apply(&mut doc, &request(SelectorSpec::tag("circle"), GradientKind::Radial))
            .unwrap();

        assert_eq!(summary.gradient_id, "grad-circle-1");
        assert_eq!(summary.elements_patched, 1);
        assert!(!summary.reused_definition);

        let gradient = doc.element_by_id("grad-circle-1").unwrap();
        assert_eq!(gradient.name, "radialGradient");
        assert_eq!(gradient.attr("cx"), Some("50%"));
        let stops: Vec<&Element> = gradient.child_elements().collect();
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].attr("offset"), Some("0%"));
        assert_eq!(stops[0].attr("stop-color"), Some("red"));
        assert_eq!(stops[1].attr("offset"), Some("100%"));

        let xml = doc.to_xml();
        assert!(xml.contains(r#"<circle cx="150" cy="200" r="40" fill="url(#grad-circle-1)"/>"#));
    }

    #[test]
    fn tag_selector_rewires_every_match_to_one_definition() {
        let mut doc = SvgDocument::parse(DOC).unwrap();
        let mut patcher = GradientPatcher::new();
        let summary = patcher
            .apply(&mut doc, &request(SelectorSpec::tag("rect"), GradientKind::Linear))
            .unwrap();

        assert_eq!(summary.elements_patched, 2);
        let xml = doc.to_xml();
        assert_eq!(xml.matches("url(#grad-rect-1)").count(), 2);
        assert_eq!(xml.matches("<linearGradient").count(), 1);
    }

    #[test]
    fn missing_target_fails_without_mutation() {
        let mut doc = SvgDocument::parse(DOC).unwrap();
        let before = doc.clone();
        let err = GradientPatcher::new()
            .apply(&mut doc, &request(SelectorSpec::id("nope"), GradientKind::Linear))
            .unwrap_err();
        assert!(matches!(err, SvgError::TargetNotFound { .. }));
        assert_eq!(doc, before);
    }

    #[test]
    fn reapplying_rewrites_definition_in_place() {
        let mut doc = SvgDocument::parse(DOC).unwrap();
        let mut patcher = GradientPatcher::new();
        let req = request(SelectorSpec::id("hero"), GradientKind::Linear);

        let first = patcher.apply(&mut doc, &req).unwrap();
        let mut radial = req.clone();
        radial.kind = GradientKind::Radial;
        radial.stops = vec![GradientStop::new(0.0, "navy")];
        let second = patcher.apply(&mut doc, &radial).unwrap();

        assert!(second.reused_definition);
        assert_eq!(second.gradient_id, first.gradient_id);
        let xml = doc.to_xml();
        assert_eq!(xml.matches("Gradient id=").count(), 1);
        let gradient = doc.element_by_id(&first.gradient_id).unwrap();
        assert_eq!(gradient.name, "radialGradient");
        assert_eq!(gradient.child_elements().count(), 1);
    }

    #[test]
    fn separate_sessions_do_not_reuse() {
        let mut doc = SvgDocument::parse(DOC).unwrap();
        let req = request(SelectorSpec::id("hero"), GradientKind::Linear);
        GradientPatcher::new().apply(&mut doc, &req).unwrap();
        // New session: the existing grad-hero-1 is foreign, so the counter
        // skips past it instead of rewriting it.
        let summary = GradientPatcher::new().apply(&mut doc, &req).unwrap();
        assert_eq!(summary.gradient_id, "grad-hero-2");
        assert!(!summary.reused_definition);
    }

    #[test]
    fn stroke_request_leaves_fill_alone() {
        let mut doc = SvgDocument::parse(DOC).unwrap();
        let mut req = request(SelectorSpec::id("hero"), GradientKind::Linear);
        req.paint = PaintTarget::Stroke;
        GradientPatcher::new().apply(&mut doc, &req).unwrap();
        let hero = doc.element_by_id("hero").unwrap();
        assert_eq!(hero.attr("fill"), Some("red"));
        assert_eq!(hero.attr("stroke"), Some("url(#grad-hero-1)"));
    }

    #[test]
    fn direction_presets_and_angles_map_to_coordinates() {
        assert_eq!(
            linear_coords(Direction::Vertical),
            ("0%".into(), "0%".into(), "0%".into(), "100%".into())
        );
        assert_eq!(
            linear_coords(Direction::Diagonal),
            ("0%".into(), "0%".into(), "100%".into(), "100%".into())
        );
        let (x1, y1, x2, y2) = linear_coords(Direction::Angle(90.0));
        assert_eq!((x1.as_str(), y1.as_str()), ("50%", "0%"));
        assert_eq!((x2.as_str(), y2.as_str()), ("50%", "100%"));
    }

    #[test]
    fn percent_formatting_drops_trailing_zero() {
        assert_eq!(fmt_percent(0.0), "0%");
        assert_eq!(fmt_percent(100.0), "100%");
        assert_eq!(fmt_percent(33.33), "33.3%");
        assert_eq!(fmt_percent(50.0), "50%");
    }
}
