//! Transcription module for Murmure.
//!
//! Converts individual audio chunks to text using the OpenAI
//! transcription API and assembles the per-chunk results into an
//! ordered transcript.

mod models;
mod whisper;

pub use models::{Transcript, TranscriptSegment};
pub use whisper::WhisperTranscriber;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for chunk-level transcription services.
#[async_trait]
pub trait ChunkTranscriber: Send + Sync {
    /// Transcribe one chunk's audio bytes into plain text.
    ///
    /// Issues exactly one backend request per call; retry policy, if
    /// any, belongs to the caller.
    async fn transcribe_chunk(&self, file_name: String, audio: Vec<u8>) -> Result<String>;
}
