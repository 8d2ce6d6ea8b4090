//! Pipeline error type

use svgrad_prompt::PromptError;
use svgrad_svg::SvgError;

/// Fatal pipeline failures. No document is written when one of these
/// surfaces; validation findings are reported, never raised as errors.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Interpretation failed
    #[error("interpretation failed: {0}")]
    Prompt(#[from] PromptError),

    /// Parsing or patching the document failed
    #[error("patching failed: {0}")]
    Svg(#[from] SvgError),
}
