//! Pipeline configuration

use svgrad_prompt::{FallbackColor, LlmConfig};

/// Configuration for one [`GradientPipeline`](crate::GradientPipeline).
///
/// The LLM collaborator is off by default; when configured it is consulted
/// first and the deterministic interpreter remains the fallback.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// LLM collaborator settings; `None` keeps interpretation deterministic
    pub llm: Option<LlmConfig>,
    /// Second stop color when a prompt names exactly one color
    pub single_color_fallback: FallbackColor,
}

impl PipelineConfig {
    /// Default configuration: keyword interpreter only, white fallback.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable the LLM-backed interpreter.
    #[inline]
    #[must_use]
    pub fn with_llm(mut self, llm: LlmConfig) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Change the single-color fallback stop.
    #[inline]
    #[must_use]
    pub fn with_single_color_fallback(mut self, fallback: FallbackColor) -> Self {
        self.single_color_fallback = fallback;
        self
    }

    /// LLM config from the conventional environment variable, if present.
    #[must_use]
    pub fn llm_from_env() -> Option<LlmConfig> {
        std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .map(LlmConfig::openai)
    }
}
