//! Prompt Interpreter
//!
//! Turns a free-text instruction into a structured gradient edit plan:
//! - Request model (selector, gradient kind, direction, color stops)
//! - Deterministic keyword/regex interpreter (always available)
//! - Optional LLM-backed interpreter behind the same trait

pub mod color;
pub mod error;
pub mod keyword;
pub mod llm;
pub mod types;

pub use error::PromptError;
pub use keyword::KeywordInterpreter;
pub use llm::{LlmConfig, LlmInterpreter};
pub use types::{
    Direction, EditPlan, FallbackColor, GradientEditRequest, GradientKind, GradientStop,
    PaintTarget, SelectorKind, SelectorSpec,
};

use async_trait::async_trait;

/// Interpreter seam: string in, edit plan or failure out.
///
/// Two variants exist: the deterministic [`KeywordInterpreter`] and the
/// [`LlmInterpreter`]. Callers select by configuration and must keep the
/// deterministic variant available as fallback.
#[async_trait]
pub trait PromptInterpreter: Send + Sync {
    /// Interpret one instruction string into an edit plan.
    async fn interpret(&self, prompt: &str) -> Result<EditPlan, PromptError>;

    /// Short name for logging.
    fn name(&self) -> &'static str;
}
