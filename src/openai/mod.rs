//! Adapters for the OpenAI compatible chat completion providers.

mod core;
pub use self::core::{CompletionRequest, answer_text, completion, legacy_completion};

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::models::{AdapterError, ModelAdapter, PromptContext};

/// Provider invoked with a single options record per call.
pub struct Gpt4o {
    api_hostname: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl Gpt4o {
    pub fn new(api_hostname: &str, api_key: &str, model: &str, timeout: Duration) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl ModelAdapter for Gpt4o {
    async fn invoke(&self, context: &PromptContext) -> Result<String, AdapterError> {
        let request = CompletionRequest {
            messages: &context.messages,
            system_instruction: context.system_instruction.as_deref(),
            temperature: context.options.temperature,
            max_tokens: context.options.max_tokens,
        };
        let response = completion(
            request,
            &self.api_hostname,
            &self.api_key,
            &self.model,
            self.timeout,
        )
        .await?;
        reply_text(response)
    }
}

/// Provider invoked with positional arguments: the transcript and a
/// system instruction string. Falls back to the configured
/// instruction when the request carries none.
pub struct Gpt35 {
    api_hostname: String,
    api_key: String,
    model: String,
    fallback_instruction: String,
    timeout: Duration,
}

impl Gpt35 {
    pub fn new(
        api_hostname: &str,
        api_key: &str,
        model: &str,
        fallback_instruction: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            fallback_instruction: fallback_instruction.to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl ModelAdapter for Gpt35 {
    async fn invoke(&self, context: &PromptContext) -> Result<String, AdapterError> {
        let instruction = context
            .system_instruction
            .as_deref()
            .unwrap_or(&self.fallback_instruction);
        let response = legacy_completion(
            &context.messages,
            instruction,
            &self.api_hostname,
            &self.api_key,
            &self.model,
            self.timeout,
        )
        .await?;
        reply_text(response)
    }
}

// A well-formed HTTP reply can still be unusable: surface the
// provider's own error message when the answer is missing.
fn reply_text(response: Value) -> Result<String, AdapterError> {
    match answer_text(&response) {
        Some(text) => Ok(text.to_string()),
        None => {
            let reason = response["error"]["message"]
                .as_str()
                .unwrap_or("malformed completion response")
                .to_string();
            Err(AdapterError::rejected(reason))
        }
    }
}
