//! Run outcome and its human-readable rendering
//!
//! The structured log a run produces: the original prompt, the parsed
//! request fields, before/after snippets of the affected elements, and the
//! validation report.

use svgrad_prompt::EditPlan;
use svgrad_svg::{PatchSummary, ValidationReport};

/// What one edit request did to the document.
#[derive(Debug, Clone)]
pub struct EditOutcome {
    /// Patch result (gradient id, match count, reuse flag)
    pub summary: PatchSummary,
    /// Affected element snippets before the patch
    pub before: Vec<String>,
    /// The same elements after the patch
    pub after: Vec<String>,
}

/// Result of one full pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// The instruction as given
    pub prompt: String,
    /// Parsed plan, including interpretation warnings
    pub plan: EditPlan,
    /// Per-request patch outcomes, in plan order
    pub edits: Vec<EditOutcome>,
    /// Patched document text
    pub svg: String,
    /// Validation findings on the patched text
    pub report: ValidationReport,
}

impl PipelineOutcome {
    /// Render the structured run log.
    #[must_use]
    pub fn render_log(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("prompt: {}\n", self.prompt));

        match serde_json::to_string_pretty(&self.plan) {
            Ok(json) => out.push_str(&format!("plan:\n{json}\n")),
            Err(e) => out.push_str(&format!("plan: <unserializable: {e}>\n")),
        }

        for edit in &self.edits {
            out.push_str(&format!(
                "\ngradient {} ({} element(s){}):\n",
                edit.summary.gradient_id,
                edit.summary.elements_patched,
                if edit.summary.reused_definition {
                    ", definition rewritten in place"
                } else {
                    ""
                }
            ));
            for line in &edit.before {
                out.push_str(&format!("- {line}\n"));
            }
            for line in &edit.after {
                out.push_str(&format!("+ {line}\n"));
            }
        }

        out.push('\n');
        if self.report.ok {
            out.push_str("validation: ok\n");
        } else {
            out.push_str("validation: FAILED\n");
            for issue in &self.report.issues {
                out.push_str(&format!("  - {issue}\n"));
            }
        }
        out
    }
}
