//! OpenAI Whisper transcription implementation.

use super::ChunkTranscriber;
use crate::error::{MurmureError, Result};
use crate::openai::create_client;
use async_openai::types::{AudioInput, AudioResponseFormat, CreateTranscriptionRequestArgs};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// OpenAI Whisper-based chunk transcriber.
pub struct WhisperTranscriber {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl WhisperTranscriber {
    /// Create a transcriber for the given model (e.g. `whisper-1`).
    pub fn new(model: &str) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl ChunkTranscriber for WhisperTranscriber {
    #[instrument(skip(self, audio), fields(file_name = %file_name, bytes = audio.len()))]
    async fn transcribe_chunk(&self, file_name: String, audio: Vec<u8>) -> Result<String> {
        debug!("Transcribing chunk with {}", self.model);

        let request = CreateTranscriptionRequestArgs::default()
            .file(AudioInput::from_vec_u8(file_name, audio))
            .model(&self.model)
            .response_format(AudioResponseFormat::Text)
            .build()
            .map_err(|e| MurmureError::Transcription(format!("Failed to build request: {}", e)))?;

        let body = self
            .client
            .audio()
            .transcribe_raw(request)
            .await
            .map_err(|e| MurmureError::Transcription(format!("Whisper API error: {}", e)))?;

        Ok(extract_text(&String::from_utf8_lossy(&body)))
    }
}

/// Normalize the backend's response body to plain text.
///
/// Depending on the requested format the API returns either the bare
/// transcript or a JSON object with the transcript in a `text` field.
/// Neither shape leaks past this boundary.
fn extract_text(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(text) = value.get("text").and_then(|t| t.as_str()) {
            return text.trim().to_string();
        }
    }

    body.trim().to_string()
}
