//! End-to-end pipeline scenarios: interpret → patch → validate on real
//! documents, checking the externally observable behavior.

use svgrad_core::{GradientPipeline, PipelineConfig, PipelineError, SAMPLE_SVG};
use svgrad_prompt::{FallbackColor, PromptError};
use svgrad_svg::{SvgDocument, SvgError};

const CIRCLE_DOC: &str = r#"<svg width="100" height="100" xmlns="http://www.w3.org/2000/svg">
  <circle id="c1" cx="50" cy="50" r="40" fill="green"/>
</svg>"#;

const TWO_BOX_DOC: &str = r#"<svg width="100" height="100" xmlns="http://www.w3.org/2000/svg">
  <rect class="box" x="0" y="0" width="40" height="40" fill="red"/>
  <rect class="box big" x="50" y="0" width="40" height="40" fill="blue"/>
</svg>"#;

#[tokio::test]
async fn radial_gradient_on_circle_by_id_validates() {
    let outcome = GradientPipeline::deterministic()
        .run(
            "make the circle background a radial gradient from red to yellow",
            CIRCLE_DOC,
        )
        .await
        .unwrap();

    assert!(outcome.report.ok, "issues: {:?}", outcome.report.issues);

    let doc = SvgDocument::parse(&outcome.svg).unwrap();
    let gradient = doc.element_by_id("grad-circle-1").unwrap();
    assert_eq!(gradient.name, "radialGradient");
    let stops: Vec<_> = gradient.child_elements().collect();
    assert_eq!(stops[0].attr("offset"), Some("0%"));
    assert_eq!(stops[0].attr("stop-color"), Some("red"));
    assert_eq!(stops[1].attr("offset"), Some("100%"));
    assert_eq!(stops[1].attr("stop-color"), Some("yellow"));
    assert_eq!(
        doc.element_by_id("c1").unwrap().attr("fill"),
        Some("url(#grad-circle-1)")
    );
}

#[tokio::test]
async fn class_selector_rewires_both_elements_to_one_linear_gradient() {
    let outcome = GradientPipeline::deterministic()
        .run(
            "change .box to a horizontal linear gradient from #000000 to #ffffff",
            TWO_BOX_DOC,
        )
        .await
        .unwrap();

    assert!(outcome.report.ok);
    assert_eq!(outcome.edits.len(), 1);
    assert_eq!(outcome.edits[0].summary.elements_patched, 2);

    // Both fills reference the same definition; horizontal means 0°.
    assert_eq!(outcome.svg.matches("url(#grad-box-1)").count(), 2);
    let doc = SvgDocument::parse(&outcome.svg).unwrap();
    let gradient = doc.element_by_id("grad-box-1").unwrap();
    assert_eq!(gradient.name, "linearGradient");
    assert_eq!(gradient.attr("x1"), Some("0%"));
    assert_eq!(gradient.attr("y1"), Some("0%"));
    assert_eq!(gradient.attr("x2"), Some("100%"));
    assert_eq!(gradient.attr("y2"), Some("0%"));
}

#[tokio::test]
async fn prompt_without_color_is_unparsable() {
    let err = GradientPipeline::deterministic()
        .run("gradient the triangle", CIRCLE_DOC)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Prompt(PromptError::Unparsable { .. })
    ));
}

#[tokio::test]
async fn selector_matching_nothing_fails() {
    let err = GradientPipeline::deterministic()
        .run("gradient the ellipse from red to blue", CIRCLE_DOC)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Svg(SvgError::TargetNotFound { .. })
    ));
}

#[tokio::test]
async fn malformed_document_fails_before_patching() {
    let err = GradientPipeline::deterministic()
        .run("gradient the circle from red to blue", "<svg><circle></svg>")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Svg(SvgError::MalformedDocument(_))
    ));
}

#[tokio::test]
async fn repeating_an_edit_in_one_run_keeps_a_single_definition() {
    let outcome = GradientPipeline::deterministic()
        .run(
            "gradient the circle from red to blue, gradient the circle from red to blue",
            CIRCLE_DOC,
        )
        .await
        .unwrap();

    assert_eq!(outcome.edits.len(), 2);
    assert!(outcome.edits[1].summary.reused_definition);
    assert_eq!(outcome.svg.matches("<linearGradient").count(), 1);
    assert!(outcome.report.ok);
}

#[tokio::test]
async fn compound_prompt_patches_sample_document_twice() {
    let outcome = GradientPipeline::deterministic()
        .run(
            "apply a diagonal gradient from #123456 to #abcdef to all circles \
             and give the element with id 'hero' a radial gradient from red to white",
            SAMPLE_SVG,
        )
        .await
        .unwrap();

    assert!(outcome.report.ok, "issues: {:?}", outcome.report.issues);
    assert_eq!(outcome.edits.len(), 2);

    let doc = SvgDocument::parse(&outcome.svg).unwrap();
    let diagonal = doc.element_by_id("grad-circle-1").unwrap();
    assert_eq!(diagonal.name, "linearGradient");
    assert_eq!(diagonal.attr("x2"), Some("100%"));
    assert_eq!(diagonal.attr("y2"), Some("100%"));

    let radial = doc.element_by_id("grad-hero-2").unwrap();
    assert_eq!(radial.name, "radialGradient");
    assert_eq!(
        doc.element_by_id("hero").unwrap().attr("fill"),
        Some("url(#grad-hero-2)")
    );
}

#[tokio::test]
async fn single_color_prompt_uses_configured_fallback() {
    let pipeline = GradientPipeline::new(
        PipelineConfig::new().with_single_color_fallback(FallbackColor::Transparent),
    );
    let outcome = pipeline
        .run("give the circle a vertical gradient of navy", CIRCLE_DOC)
        .await
        .unwrap();

    assert!(outcome.report.ok, "issues: {:?}", outcome.report.issues);
    let doc = SvgDocument::parse(&outcome.svg).unwrap();
    let gradient = doc.element_by_id("grad-circle-1").unwrap();
    let stops: Vec<_> = gradient.child_elements().collect();
    assert_eq!(stops[0].attr("stop-color"), Some("navy"));
    assert_eq!(stops[1].attr("stop-color"), Some("transparent"));
    // Vertical direction points the gradient vector downward.
    assert_eq!(gradient.attr("y2"), Some("100%"));
}

#[tokio::test]
async fn stroke_prompt_leaves_fill_untouched() {
    let outcome = GradientPipeline::deterministic()
        .run("gradient the circle border from gold to maroon", CIRCLE_DOC)
        .await
        .unwrap();

    assert!(outcome.report.ok);
    let doc = SvgDocument::parse(&outcome.svg).unwrap();
    let circle = doc.element_by_id("c1").unwrap();
    assert_eq!(circle.attr("fill"), Some("green"));
    assert_eq!(circle.attr("stroke"), Some("url(#grad-circle-1)"));
}

#[tokio::test]
async fn before_and_after_snippets_show_the_rewiring() {
    let outcome = GradientPipeline::deterministic()
        .run("gradient the circle from red to blue", CIRCLE_DOC)
        .await
        .unwrap();

    let edit = &outcome.edits[0];
    assert_eq!(edit.before.len(), 1);
    assert!(edit.before[0].contains(r#"fill="green""#));
    assert!(edit.after[0].contains(r#"fill="url(#grad-circle-1)""#));

    let log = outcome.render_log();
    assert!(log.contains("- <circle"));
    assert!(log.contains("+ <circle"));
    assert!(log.contains("validation: ok"));
}
