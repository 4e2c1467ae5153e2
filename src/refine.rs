//! Transcript segment refinement via chat completions.
//!
//! Each segment is rewritten independently, before concatenation, so
//! the chunk ordering cannot be disturbed by the rewrite pass.

use crate::error::{MurmureError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use tracing::{debug, instrument};

/// Rewrites one transcript segment at a time with a fixed instruction.
pub struct SegmentRefiner {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    instruction: String,
}

impl SegmentRefiner {
    /// Create a refiner with the given model and instruction text.
    pub fn new(model: &str, instruction: &str) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
            instruction: instruction.to_string(),
        }
    }

    /// Rewrite one segment's text according to the instruction.
    #[instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn refine(&self, text: &str) -> Result<String> {
        debug!("Refining segment with {}", self.model);

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.instruction.clone())
                .build()
                .map_err(|e| MurmureError::Refinement(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(text.to_string())
                .build()
                .map_err(|e| MurmureError::Refinement(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(0.0)
            .build()
            .map_err(|e| MurmureError::Refinement(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| MurmureError::Refinement(format!("{} API error: {}", self.model, e)))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| MurmureError::Refinement("Empty response".to_string()))?;

        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refiner_stores_configuration() {
        // Just verify construction (no API call).
        let refiner = SegmentRefiner::new("test-model", "Fix the punctuation.");
        assert_eq!(refiner.model, "test-model");
        assert_eq!(refiner.instruction, "Fix the punctuation.");
    }
}
