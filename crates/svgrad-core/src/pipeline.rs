//! The three-stage pipeline
//!
//! Runs Prompt Interpreter → SVG Patcher → Validator to completion for one
//! request before returning. Single-threaded and synchronous apart from the
//! optional LLM call, which sits behind the interpreter trait with the
//! deterministic variant as fallback.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::report::{EditOutcome, PipelineOutcome};
use svgrad_prompt::{EditPlan, KeywordInterpreter, LlmInterpreter, PromptInterpreter};
use svgrad_svg::{selector, validate, GradientPatcher, SvgDocument};

/// One-shot gradient editing pipeline.
#[derive(Debug, Clone)]
pub struct GradientPipeline {
    config: PipelineConfig,
}

impl GradientPipeline {
    /// Pipeline with the given configuration.
    #[inline]
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Pipeline with the default (deterministic) configuration.
    #[inline]
    #[must_use]
    pub fn deterministic() -> Self {
        Self::new(PipelineConfig::new())
    }

    /// Run the full pipeline on one instruction and one document.
    ///
    /// # Workflow
    /// 1. Interpret the instruction into an edit plan
    /// 2. Parse the document (fails before any mutation)
    /// 3. Patch each request in plan order, capturing before/after snippets
    /// 4. Serialize and validate the result
    ///
    /// Validation issues never fail the run; they come back in the outcome's
    /// report so the caller can still inspect the written document.
    pub async fn run(&self, prompt: &str, svg_text: &str) -> Result<PipelineOutcome, PipelineError> {
        tracing::info!(prompt, "running gradient pipeline");

        let plan = self.interpret(prompt).await?;
        for warning in &plan.warnings {
            tracing::warn!(warning = %warning, "interpretation note");
        }
        tracing::info!(requests = plan.requests.len(), "instruction interpreted");

        let mut doc = SvgDocument::parse(svg_text)?;
        let mut patcher = GradientPatcher::new();
        let mut edits = Vec::with_capacity(plan.requests.len());

        for request in &plan.requests {
            let before = snippets(&doc, request);
            let summary = patcher.apply(&mut doc, request)?;
            let after = snippets(&doc, request);
            edits.push(EditOutcome {
                summary,
                before,
                after,
            });
        }

        let svg = doc.to_xml();
        let report = validate(&svg);
        tracing::info!(ok = report.ok, issues = report.issues.len(), "pipeline finished");

        Ok(PipelineOutcome {
            prompt: prompt.to_string(),
            plan,
            edits,
            svg,
            report,
        })
    }

    /// Interpret with the configured collaborator, falling back to the
    /// deterministic interpreter when the LLM path fails.
    async fn interpret(&self, prompt: &str) -> Result<EditPlan, PipelineError> {
        let keyword = KeywordInterpreter::new(self.config.single_color_fallback);

        if let Some(llm_config) = &self.config.llm {
            let llm = LlmInterpreter::new(llm_config.clone());
            match llm.interpret(prompt).await {
                Ok(plan) => {
                    tracing::info!(interpreter = llm.name(), "instruction parsed");
                    return Ok(plan);
                }
                Err(e) if e.is_fallback_worthy() => {
                    tracing::warn!(error = %e, "llm interpreter failed, using keyword interpreter");
                }
                Err(e) => return Err(e.into()),
            }
        }

        let plan = keyword.interpret(prompt).await?;
        tracing::info!(interpreter = keyword.name(), "instruction parsed");
        Ok(plan)
    }
}

/// One-line snippets of the elements the request targets.
fn snippets(doc: &SvgDocument, request: &svgrad_prompt::GradientEditRequest) -> Vec<String> {
    selector::find_all(doc, &request.target)
        .iter()
        .map(|el| el.snippet())
        .collect()
}
