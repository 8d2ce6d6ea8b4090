//! Error types for prompt interpretation

/// Errors produced by prompt interpreters.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// No actionable target, gradient kind, or color could be extracted.
    #[error(
        "unparsable prompt: {reason}; try phrasing like \
         \"make the circle a radial gradient from red to yellow\" or \
         \"change .box to a horizontal linear gradient from #000000 to #ffffff\""
    )]
    Unparsable {
        /// What was missing from the instruction
        reason: String,
    },

    /// The LLM collaborator could not be reached (after one retry).
    #[error("llm interpreter unavailable: {0}")]
    LlmUnavailable(String),

    /// The LLM replied, but not with a usable edit plan.
    #[error("llm reply did not contain a usable edit plan: {0}")]
    LlmMalformedReply(String),
}

impl PromptError {
    /// Convenience constructor for unparsable prompts.
    #[inline]
    #[must_use]
    pub fn unparsable(reason: impl Into<String>) -> Self {
        Self::Unparsable {
            reason: reason.into(),
        }
    }

    /// Whether falling back to the deterministic interpreter can help.
    ///
    /// Unparsable prompts fail the same way in every interpreter; transport
    /// and reply-shape failures are specific to the LLM path.
    #[inline]
    #[must_use]
    pub fn is_fallback_worthy(&self) -> bool {
        matches!(self, Self::LlmUnavailable(_) | Self::LlmMalformedReply(_))
    }
}
