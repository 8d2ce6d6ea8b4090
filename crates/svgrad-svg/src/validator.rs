//! Validator
//!
//! Re-parses the patched document text and runs structural checks. Checks
//! accumulate into the report instead of short-circuiting; validation issues
//! are never fatal to the pipeline.

use serde::Serialize;
use svgrad_prompt::color;

/// Outcome of validating one document. Produced once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// True iff `issues` is empty
    pub ok: bool,
    /// Human-readable findings, in check order
    pub issues: Vec<String>,
}

impl ValidationReport {
    fn from_issues(issues: Vec<String>) -> Self {
        Self {
            ok: issues.is_empty(),
            issues,
        }
    }
}

/// Validate final SVG text.
///
/// Checks:
/// - the document re-parses and has an `<svg>` root
/// - every `fill`/`stroke` `url(#...)` reference resolves to an element
///   inside a `<defs>` container
/// - every gradient definition has at least one stop with an offset in
///   [0, 1] and a recognizable color
/// - no duplicate ids among definition elements
#[must_use]
pub fn validate(svg_text: &str) -> ValidationReport {
    let mut issues = Vec::new();

    let doc = match roxmltree::Document::parse(svg_text) {
        Ok(doc) => doc,
        Err(e) => {
            // Nothing left to inspect without a tree.
            issues.push(format!("document does not parse: {e}"));
            return ValidationReport::from_issues(issues);
        }
    };

    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        issues.push(format!(
            "root element is <{}>, expected <svg>",
            root.tag_name().name()
        ));
    }

    check_paint_references(&doc, &mut issues);
    check_gradient_definitions(&doc, &mut issues);
    check_duplicate_definition_ids(&doc, &mut issues);

    let report = ValidationReport::from_issues(issues);
    if report.ok {
        tracing::debug!("validation passed");
    } else {
        tracing::warn!(issues = report.issues.len(), "validation found issues");
    }
    report
}

/// Ids of elements living under a `<defs>` container, in document order.
fn definition_ids<'a>(doc: &'a roxmltree::Document<'a>) -> Vec<&'a str> {
    doc.descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "defs")
        .flat_map(|defs| {
            defs.descendants()
                .filter(move |n| n.is_element() && n.id() != defs.id())
                .filter_map(|n| n.attribute("id"))
        })
        .collect()
}

fn check_paint_references(doc: &roxmltree::Document<'_>, issues: &mut Vec<String>) {
    let defined = definition_ids(doc);
    for node in doc.descendants().filter(roxmltree::Node::is_element) {
        for attr in ["fill", "stroke"] {
            let Some(value) = node.attribute(attr) else {
                continue;
            };
            let Some(reference) = url_ref(value) else {
                continue;
            };
            if !defined.contains(&reference) {
                issues.push(format!(
                    "{attr} reference \"url(#{reference})\" on <{}> does not resolve to a definition",
                    node.tag_name().name()
                ));
            }
        }
    }
}

fn check_gradient_definitions(doc: &roxmltree::Document<'_>, issues: &mut Vec<String>) {
    let gradients = doc.descendants().filter(|n| {
        n.is_element()
            && matches!(n.tag_name().name(), "linearGradient" | "radialGradient")
    });
    for gradient in gradients {
        let label = gradient
            .attribute("id")
            .map_or_else(|| format!("<{}>", gradient.tag_name().name()), |id| format!("#{id}"));

        let stops: Vec<_> = gradient
            .children()
            .filter(|n| n.is_element() && n.tag_name().name() == "stop")
            .collect();
        if stops.is_empty() {
            issues.push(format!("gradient {label} has no stops"));
            continue;
        }
        for stop in stops {
            match stop.attribute("offset").map(parse_offset) {
                Some(Some(offset)) if (0.0..=1.0).contains(&offset) => {}
                Some(_) => issues.push(format!(
                    "gradient {label} has a stop with offset \"{}\" outside [0, 1]",
                    stop.attribute("offset").unwrap_or_default()
                )),
                None => issues.push(format!("gradient {label} has a stop without an offset")),
            }
            match stop.attribute("stop-color") {
                Some(value) if color::is_recognizable(value) => {}
                Some(value) => issues.push(format!(
                    "gradient {label} has a stop with unrecognizable color \"{value}\""
                )),
                None => issues.push(format!("gradient {label} has a stop without a stop-color")),
            }
        }
    }
}

fn check_duplicate_definition_ids(doc: &roxmltree::Document<'_>, issues: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    for id in definition_ids(doc) {
        if !seen.insert(id) {
            issues.push(format!("duplicate definition id \"{id}\""));
        }
    }
}

/// Offset in [0, 1] from a plain number or percentage.
fn parse_offset(value: &str) -> Option<f32> {
    let value = value.trim();
    if let Some(pct) = value.strip_suffix('%') {
        pct.trim().parse::<f32>().ok().map(|p| p / 100.0)
    } else {
        value.parse::<f32>().ok()
    }
}

/// The id referenced by a `url(#...)` paint value, if any.
fn url_ref(value: &str) -> Option<&str> {
    value
        .trim()
        .strip_prefix("url(#")
        .and_then(|rest| rest.strip_suffix(')'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VALID: &str = r#"<svg xmlns="http://www.w3.org/2000/svg">
  <defs>
    <radialGradient id="grad-c1-1" cx="50%" cy="50%" r="50%">
      <stop offset="0%" stop-color="red"/>
      <stop offset="100%" stop-color="yellow"/>
    </radialGradient>
  </defs>
  <circle id="c1" r="40" fill="url(#grad-c1-1)"/>
</svg>"#;

    #[test]
    fn well_formed_patched_document_passes() {
        let report = validate(VALID);
        assert_eq!(report.issues, Vec::<String>::new());
        assert!(report.ok);
    }

    #[test]
    fn broken_xml_reports_parse_issue_only() {
        let report = validate("<svg><defs></svg>");
        assert!(!report.ok);
        assert_eq!(report.issues.len(), 1);
        assert!(report.issues[0].contains("does not parse"));
    }

    #[test]
    fn dangling_paint_reference_is_reported() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
  <rect fill="url(#missing)"/>
</svg>"#;
        let report = validate(svg);
        assert!(report.issues.iter().any(|i| i.contains("url(#missing)")));
    }

    #[test]
    fn reference_to_id_outside_defs_is_reported() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
  <rect id="shape"/>
  <rect fill="url(#shape)"/>
</svg>"#;
        let report = validate(svg);
        assert!(!report.ok);
    }

    #[test]
    fn plain_color_paints_are_not_references() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg"><rect fill="red" stroke="#000000"/></svg>"##;
        assert!(validate(svg).ok);
    }

    #[test]
    fn stopless_gradient_is_reported() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
  <defs><linearGradient id="g1"/></defs>
</svg>"#;
        let report = validate(svg);
        assert!(report.issues.iter().any(|i| i.contains("no stops")));
    }

    #[test]
    fn out_of_range_offset_and_bad_color_accumulate() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
  <defs>
    <linearGradient id="g1">
      <stop offset="150%" stop-color="red"/>
      <stop offset="50%" stop-color="blurple"/>
    </linearGradient>
  </defs>
</svg>"#;
        let report = validate(svg);
        assert_eq!(report.issues.len(), 2);
        assert!(report.issues[0].contains("outside [0, 1]"));
        assert!(report.issues[1].contains("unrecognizable color"));
    }

    #[test]
    fn duplicate_definition_ids_are_reported() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
  <defs>
    <linearGradient id="g1"><stop offset="0" stop-color="red"/></linearGradient>
    <radialGradient id="g1"><stop offset="0" stop-color="blue"/></radialGradient>
  </defs>
</svg>"#;
        let report = validate(svg);
        assert!(report.issues.iter().any(|i| i.contains("duplicate definition id")));
    }

    #[test]
    fn fractional_offsets_are_accepted() {
        assert_eq!(parse_offset("0.5"), Some(0.5));
        assert_eq!(parse_offset("50%"), Some(0.5));
        assert_eq!(parse_offset("oops"), None);
    }
}
