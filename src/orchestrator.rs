//! Pipeline orchestrator for Murmure.
//!
//! Drives the per-file state machine (transcode, segment, transcribe,
//! optionally refine, persist) over every eligible file in the source
//! directory, strictly one file and one chunk at a time.

use crate::audio::{self, AudioStream};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::{MurmureError, Result};
use crate::refine::SegmentRefiner;
use crate::segment::segment;
use crate::transcription::{ChunkTranscriber, Transcript, WhisperTranscriber};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Immutable per-run pipeline settings.
///
/// Constructed once before processing begins and never mutated mid-run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Nominal chunk duration in milliseconds.
    pub chunk_length_ms: u64,
    /// Whether the rewrite pass runs on each segment.
    pub refine: bool,
    /// Transcription model name.
    pub transcription_model: String,
    /// Rewrite pass model name.
    pub refinement_model: String,
    /// Instruction given to the rewrite pass.
    pub refinement_instruction: String,
}

impl PipelineConfig {
    /// Build a pipeline configuration from loaded settings and the CLI
    /// refinement flag.
    pub fn from_settings(settings: &Settings, refine: bool) -> Result<Self> {
        if settings.transcription.chunk_length_seconds == 0 {
            return Err(MurmureError::Config(
                "transcription.chunk_length_seconds must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            chunk_length_ms: settings.transcription.chunk_length_seconds * 1000,
            refine,
            transcription_model: settings.transcription.model.clone(),
            refinement_model: settings.refinement.model.clone(),
            refinement_instruction: settings.refinement.instruction.clone(),
        })
    }
}

/// Outcome counts for one run over the source directory.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub transcribed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// The main orchestrator for the Murmure pipeline.
pub struct Orchestrator {
    config: PipelineConfig,
    source_dir: PathBuf,
    output_dir: PathBuf,
    transcription_enabled: bool,
    transcriber: Arc<dyn ChunkTranscriber>,
    refiner: Option<SegmentRefiner>,
}

impl Orchestrator {
    /// Create a new orchestrator from settings and the CLI refine flag.
    pub fn new(settings: &Settings, refine: bool) -> Result<Self> {
        let config = PipelineConfig::from_settings(settings, refine)?;
        let transcriber: Arc<dyn ChunkTranscriber> =
            Arc::new(WhisperTranscriber::new(&config.transcription_model));

        Ok(Self::with_components(settings, config, transcriber))
    }

    /// Create an orchestrator with a custom transcriber.
    pub fn with_components(
        settings: &Settings,
        config: PipelineConfig,
        transcriber: Arc<dyn ChunkTranscriber>,
    ) -> Self {
        let refiner = config
            .refine
            .then(|| SegmentRefiner::new(&config.refinement_model, &config.refinement_instruction));

        Self {
            config,
            source_dir: settings.source_dir(),
            output_dir: settings.transcript_dir(),
            transcription_enabled: settings.transcription.enabled,
            transcriber,
            refiner,
        }
    }

    /// Process every eligible file in the source directory.
    ///
    /// Individual file failures are reported and counted but never abort
    /// the run.
    pub async fn run(&self) -> Result<RunSummary> {
        if !self.source_dir.is_dir() {
            return Err(MurmureError::Config(format!(
                "Source directory not found: {}",
                self.source_dir.display()
            )));
        }

        std::fs::create_dir_all(&self.output_dir)?;

        let files = list_input_files(&self.source_dir)?;

        if files.is_empty() {
            Output::warning("No audio files found in source directory");
            return Ok(RunSummary::default());
        }

        Output::kv("Source", &self.source_dir.display().to_string());
        Output::kv("Output", &self.output_dir.display().to_string());
        Output::kv(
            "Refinement",
            if self.config.refine { "enabled" } else { "disabled" },
        );

        let total = files.len();
        Output::info(&format!("Found {} audio files", total));

        let mut summary = RunSummary::default();

        for (i, path) in files.iter().enumerate() {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("<unnamed>");
            Output::info(&format!("[{}/{}] Processing: {}", i + 1, total, name));

            let target = self.transcript_path(path);
            if target.exists() {
                Output::warning("  Transcript already exists, skipping");
                summary.skipped += 1;
                continue;
            }

            // Transcoding runs even when transcription is disabled.
            let audio_path = match self.prepare_audio(path).await {
                Ok(p) => p,
                Err(e) => {
                    Output::error(&format!("  Failed: {}", e));
                    summary.failed += 1;
                    continue;
                }
            };

            if !self.transcription_enabled {
                Output::warning("  Transcription is disabled, skipping");
                summary.skipped += 1;
                continue;
            }

            match self.process_file(&audio_path).await {
                Ok(transcript) => match std::fs::write(&target, transcript.render()) {
                    Ok(()) => {
                        Output::success(&format!(
                            "  Saved {} ({} segments)",
                            target.display(),
                            transcript.segment_count()
                        ));
                        summary.transcribed += 1;
                    }
                    Err(e) => {
                        Output::error(&format!("  Failed to write transcript: {}", e));
                        summary.failed += 1;
                    }
                },
                Err(e) => {
                    Output::error(&format!("  Failed: {}", e));
                    summary.failed += 1;
                }
            }
        }

        println!();
        Output::info(&format!(
            "Run complete: {} transcribed, {} skipped, {} failed",
            summary.transcribed, summary.skipped, summary.failed
        ));

        Ok(summary)
    }

    /// Transcribe one pipeline-native audio file into an ordered
    /// transcript.
    ///
    /// Chunks are processed strictly in start-time order; each chunk's
    /// text (refined when enabled) is appended before the next chunk is
    /// touched.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn process_file(&self, path: &Path) -> Result<Transcript> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("audio")
            .to_string();

        let stream = AudioStream::probe(path).await?;
        let chunks = segment(stream.duration_ms(), self.config.chunk_length_ms);
        debug!("Split into {} chunks", chunks.len());

        if chunks.is_empty() {
            warn!("Zero-duration input, producing empty transcript");
            return Ok(Transcript::from_segments(stem, Vec::new()));
        }

        // A single chunk covers the whole file; no extraction needed.
        if chunks.len() == 1 {
            let text = self.transcribe_from(stream.path()).await?;
            return Ok(Transcript::from_segments(stem, vec![text]));
        }

        info!("Processing {} audio chunks", chunks.len());
        let temp_dir = tempfile::tempdir()?;
        let pb = Output::chunk_progress(chunks.len() as u64);

        let mut texts = Vec::with_capacity(chunks.len());

        for chunk in &chunks {
            let chunk_path = stream.extract_chunk(chunk, temp_dir.path()).await?;
            let text = match self.transcribe_from(&chunk_path).await {
                Ok(text) => text,
                Err(e) => {
                    pb.finish_and_clear();
                    warn!(
                        "Chunk {} at {:.0}s failed, aborting file",
                        chunk.index,
                        chunk.start_seconds()
                    );
                    return Err(e);
                }
            };
            texts.push(text);
            pb.inc(1);
        }

        pb.finish_and_clear();
        drop(temp_dir);

        Ok(Transcript::from_segments(stem, texts))
    }

    /// Transcribe (and optionally refine) the audio at one path.
    async fn transcribe_from(&self, path: &Path) -> Result<String> {
        let audio = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.mp3")
            .to_string();

        let text = self.transcriber.transcribe_chunk(file_name, audio).await?;

        match &self.refiner {
            Some(refiner) => refiner.refine(&text).await,
            None => Ok(text),
        }
    }

    /// Transcode the input to the pipeline-native format if needed.
    async fn prepare_audio(&self, path: &Path) -> Result<PathBuf> {
        if audio::needs_transcode(path) {
            info!("Transcoding {} to MP3", path.display());
            let spinner = Output::spinner("  Converting to MP3...");
            let result = audio::transcode_to_mp3(path).await;
            spinner.finish_and_clear();
            result
        } else {
            Ok(path.to_path_buf())
        }
    }

    /// Output path for a given input: `<stem>.txt` in the output
    /// directory.
    fn transcript_path(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("transcript");
        self.output_dir.join(format!("{}.txt", stem))
    }
}

/// Enumerate supported audio files in a directory, sorted by name for
/// deterministic processing order.
fn list_input_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && audio::is_supported_input(p))
        .collect();

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StubTranscriber;

    #[async_trait]
    impl ChunkTranscriber for StubTranscriber {
        async fn transcribe_chunk(&self, _file_name: String, _audio: Vec<u8>) -> Result<String> {
            Ok("stub".to_string())
        }
    }

    fn test_orchestrator(settings: &Settings) -> Orchestrator {
        let config = PipelineConfig::from_settings(settings, false).unwrap();
        Orchestrator::with_components(settings, config, Arc::new(StubTranscriber))
    }

    #[test]
    fn test_pipeline_config_converts_chunk_length_to_ms() {
        let settings = Settings::default();
        let config = PipelineConfig::from_settings(&settings, true).unwrap();
        assert_eq!(config.chunk_length_ms, 600_000);
        assert!(config.refine);
    }

    #[test]
    fn test_pipeline_config_rejects_zero_chunk_length() {
        let mut settings = Settings::default();
        settings.transcription.chunk_length_seconds = 0;

        let err = PipelineConfig::from_settings(&settings, false).unwrap_err();
        assert!(matches!(err, MurmureError::Config(_)));
    }

    #[test]
    fn test_refiner_only_built_when_enabled() {
        let settings = Settings::default();

        let without = test_orchestrator(&settings);
        assert!(without.refiner.is_none());

        let config = PipelineConfig::from_settings(&settings, true).unwrap();
        let with = Orchestrator::with_components(&settings, config, Arc::new(StubTranscriber));
        assert!(with.refiner.is_some());
    }

    #[test]
    fn test_transcript_path_uses_input_stem() {
        let mut settings = Settings::default();
        settings.output.transcript_path = "/out".to_string();

        let orchestrator = test_orchestrator(&settings);
        assert_eq!(
            orchestrator.transcript_path(Path::new("/audios/standup.m4a")),
            PathBuf::from("/out/standup.txt")
        );
        assert_eq!(
            orchestrator.transcript_path(Path::new("/audios/memo.mp3")),
            PathBuf::from("/out/memo.txt")
        );
    }

    #[test]
    fn test_list_input_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.mp3"), b"x").unwrap();
        std::fs::write(dir.path().join("a.m4a"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::write(dir.path().join("c.wav"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("nested.mp3")).unwrap();

        let files = list_input_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.m4a", "b.mp3"]);
    }

    #[tokio::test]
    async fn test_transcribe_from_returns_backend_text() {
        let dir = tempfile::tempdir().unwrap();
        let chunk_path = dir.path().join("memo_0000.mp3");
        std::fs::write(&chunk_path, b"fake audio").unwrap();

        let settings = Settings::default();
        let orchestrator = test_orchestrator(&settings);

        let text = orchestrator.transcribe_from(&chunk_path).await.unwrap();
        assert_eq!(text, "stub");
    }

    #[tokio::test]
    async fn test_run_fails_on_missing_source_dir() {
        let mut settings = Settings::default();
        settings.input.source_path = "/definitely/not/a/real/dir".to_string();

        let orchestrator = test_orchestrator(&settings);
        let err = orchestrator.run().await.unwrap_err();
        assert!(matches!(err, MurmureError::Config(_)));
    }

    #[tokio::test]
    async fn test_run_skips_files_with_existing_transcripts() {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(source.path().join("memo.mp3"), b"x").unwrap();
        std::fs::write(output.path().join("memo.txt"), b"already done").unwrap();

        let mut settings = Settings::default();
        settings.input.source_path = source.path().to_string_lossy().into_owned();
        settings.output.transcript_path = output.path().to_string_lossy().into_owned();

        let orchestrator = test_orchestrator(&settings);
        let summary = orchestrator.run().await.unwrap();

        assert_eq!(summary, RunSummary { transcribed: 0, skipped: 1, failed: 0 });
        // The existing artifact is untouched.
        assert_eq!(
            std::fs::read(output.path().join("memo.txt")).unwrap(),
            b"already done"
        );
    }

    #[tokio::test]
    async fn test_run_with_transcription_disabled_writes_nothing() {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(source.path().join("memo.mp3"), b"x").unwrap();

        let mut settings = Settings::default();
        settings.input.source_path = source.path().to_string_lossy().into_owned();
        settings.output.transcript_path = output.path().to_string_lossy().into_owned();
        settings.transcription.enabled = false;

        let orchestrator = test_orchestrator(&settings);
        let summary = orchestrator.run().await.unwrap();

        assert_eq!(summary, RunSummary { transcribed: 0, skipped: 1, failed: 0 });
        assert!(!output.path().join("memo.txt").exists());
    }
}
