//! LLM-backed interpreter
//!
//! Posts the instruction to an OpenAI-compatible chat-completions endpoint
//! and deserializes the reply into an [`EditPlan`]. Isolated behind the same
//! [`PromptInterpreter`] contract as the keyword variant, so the rest of the
//! pipeline never sees its latency or unavailability: a transport failure is
//! retried once, then surfaced for the caller to fall back on.

use crate::error::PromptError;
use crate::types::EditPlan;
use crate::PromptInterpreter;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

/// System prompt describing the wire format (the serde shape of [`EditPlan`]).
const SYSTEM_PROMPT: &str = r##"You convert SVG gradient instructions into JSON with this exact shape:
{
  "requests": [
    {
      "target": {"kind": "id|class|tag", "value": "name"},
      "kind": "linear|radial",
      "direction": "horizontal|vertical|diagonal" or {"angle": degrees},
      "paint": "fill|stroke",
      "stops": [{"offset": 0.0, "color": "red"}, {"offset": 1.0, "color": "#ffff00"}]
    }
  ]
}
Offsets are fractions in [0,1]. Reply with the JSON object only."##;

/// Connection settings for the LLM collaborator.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Chat-completions endpoint URL
    pub endpoint: String,
    /// Model name sent with each request
    pub model: String,
    /// Bearer token
    pub api_key: String,
}

impl LlmConfig {
    /// Config for the default OpenAI endpoint with the given key.
    #[inline]
    #[must_use]
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key: api_key.into(),
        }
    }

    /// Override the endpoint (for compatible local servers).
    #[inline]
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the model name.
    #[inline]
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Interpreter that delegates parsing to a chat-completions model.
#[derive(Debug, Clone)]
pub struct LlmInterpreter {
    config: LlmConfig,
    http_client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

static JSON_BLOB: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

impl LlmInterpreter {
    /// New interpreter with a fresh HTTP client.
    #[must_use]
    pub fn new(config: LlmConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String, PromptError> {
        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": prompt},
            ],
        });

        let response = self
            .http_client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PromptError::LlmUnavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| PromptError::LlmUnavailable(e.to_string()))?;

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| PromptError::LlmMalformedReply(e.to_string()))?;
        chat.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| PromptError::LlmMalformedReply("reply had no choices".to_string()))
    }

    /// Pull the first JSON object out of a chat reply and decode an edit plan.
    fn decode_plan(content: &str) -> Result<EditPlan, PromptError> {
        let blob = JSON_BLOB
            .find(content)
            .ok_or_else(|| PromptError::LlmMalformedReply("no JSON object in reply".to_string()))?;
        let mut plan: EditPlan = serde_json::from_str(blob.as_str())
            .map_err(|e| PromptError::LlmMalformedReply(e.to_string()))?;

        if plan.requests.is_empty() {
            return Err(PromptError::LlmMalformedReply(
                "plan contained no requests".to_string(),
            ));
        }
        for request in &mut plan.requests {
            if request.stops.is_empty() {
                return Err(PromptError::LlmMalformedReply(
                    "request contained no stops".to_string(),
                ));
            }
            request.normalize_stops();
        }
        Ok(plan)
    }
}

#[async_trait]
impl PromptInterpreter for LlmInterpreter {
    async fn interpret(&self, prompt: &str) -> Result<EditPlan, PromptError> {
        // One retry on transport failure; malformed replies are not retried
        // since the model is deterministic enough that a second identical
        // request rarely changes shape.
        let content = match self.complete(prompt).await {
            Ok(content) => content,
            Err(PromptError::LlmUnavailable(first)) => {
                tracing::warn!(error = %first, "llm request failed, retrying once");
                self.complete(prompt).await?
            }
            Err(e) => return Err(e),
        };
        Self::decode_plan(&content)
    }

    fn name(&self) -> &'static str {
        "llm"
    }
}
