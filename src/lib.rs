//! Murmure - Batch Audio Transcription
//!
//! A CLI tool that converts a folder of local audio recordings into
//! plain-text transcripts using OpenAI Whisper, with an optional
//! language-model rewrite pass over each transcript segment.
//!
//! # Overview
//!
//! For every `.m4a`/`.mp3` recording in the source directory, Murmure:
//! - transcodes `.m4a` inputs to an MP3 sibling (skipped if present)
//! - splits the audio into fixed-duration chunks
//! - transcribes each chunk in order against the OpenAI audio API
//! - optionally refines each chunk's text with a chat completion
//! - writes the newline-joined segments to `<stem>.txt`
//!
//! # Architecture
//!
//! - `config` - Configuration management
//! - `audio` - ffmpeg/ffprobe probing, transcoding, chunk extraction
//! - `segment` - Fixed-duration chunk segmentation
//! - `transcription` - Chunk transcription and transcript assembly
//! - `refine` - Per-segment rewrite pass
//! - `orchestrator` - Pipeline coordination over the source directory
//!
//! # Example
//!
//! ```rust,no_run
//! use murmure::config::Settings;
//! use murmure::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(&settings, false)?;
//!
//!     let summary = orchestrator.run().await?;
//!     println!("Transcribed {} files", summary.transcribed);
//!
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod openai;
pub mod orchestrator;
pub mod refine;
pub mod segment;
pub mod transcription;

pub use error::{MurmureError, Result};
