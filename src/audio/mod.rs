//! Audio probing, chunk extraction, and container transcoding.
//!
//! Thin wrappers around ffmpeg/ffprobe child processes. The pipeline's
//! native format is MP3; `.m4a` inputs are transcoded to an MP3 sibling
//! before anything else touches them.

use crate::error::{MurmureError, Result};
use crate::segment::Chunk;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// Input extensions the directory walk picks up.
const SUPPORTED_EXTENSIONS: &[&str] = &["m4a", "mp3"];

/// The format every stage downstream of transcoding can decode.
const NATIVE_EXTENSION: &str = "mp3";

/// Check if a path has a recognized audio container extension.
pub fn is_supported_input(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Check if a path needs container transcoding before processing.
pub fn needs_transcode(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| !ext.eq_ignore_ascii_case(NATIVE_EXTENSION))
        .unwrap_or(true)
}

/// The MP3 path a transcode of `source` would produce, in the same
/// directory as the input.
pub fn mp3_sibling(source: &Path) -> PathBuf {
    source.with_extension(NATIVE_EXTENSION)
}

/// Converts an audio file to an MP3 sibling using ffmpeg.
///
/// If the sibling already exists it is returned without re-transcoding.
#[instrument(skip_all, fields(source = %source.display()))]
pub async fn transcode_to_mp3(source: &Path) -> Result<PathBuf> {
    let target = mp3_sibling(source);

    if target.exists() {
        info!("MP3 sibling already exists, skipping transcode");
        return Ok(target);
    }

    debug!("Transcoding {:?} to MP3", source);

    let result = Command::new("ffmpeg")
        .arg("-i").arg(source)
        .arg("-vn")
        .arg("-codec:a").arg("libmp3lame")
        .arg("-qscale:a").arg("2")
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(&target)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Ok(out) if out.status.success() => Ok(target),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(MurmureError::Transcode(format!("ffmpeg failed: {err}")))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(MurmureError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(MurmureError::Transcode(format!("ffmpeg error: {e}"))),
    }
}

/// A decodable audio file with its probed duration.
///
/// Owned transiently by the orchestrator while one file is processed;
/// chunk audio is extracted by time offset on demand.
#[derive(Debug, Clone)]
pub struct AudioStream {
    path: PathBuf,
    duration_ms: u64,
}

impl AudioStream {
    /// Probe an audio file's duration with ffprobe.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub async fn probe(path: &Path) -> Result<Self> {
        let duration_ms = probe_duration_ms(path).await?;
        debug!("Probed duration: {}ms", duration_ms);

        Ok(Self {
            path: path.to_path_buf(),
            duration_ms,
        })
    }

    /// Total duration in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Path to the underlying audio file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Extract one chunk's audio into `output_dir` and return its path.
    pub async fn extract_chunk(&self, chunk: &Chunk, output_dir: &Path) -> Result<PathBuf> {
        let base_name = self
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("audio");
        let dest = output_dir.join(format!("{}_{:04}.mp3", base_name, chunk.index));

        extract_segment(&self.path, &dest, chunk.start_seconds(), chunk.duration_seconds()).await?;

        Ok(dest)
    }
}

/// Extracts a time segment from an audio file.
async fn extract_segment(source: &Path, dest: &Path, start: f64, length: f64) -> Result<()> {
    // First attempt: stream copy (fast, no quality loss)
    let copy_result = Command::new("ffmpeg")
        .arg("-ss").arg(format!("{:.3}", start))
        .arg("-i").arg(source)
        .arg("-t").arg(format!("{:.3}", length))
        .arg("-c").arg("copy")
        .arg("-y")
        .arg("-loglevel").arg("warning")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    if let Ok(status) = copy_result {
        if status.success() && dest.exists() {
            return Ok(());
        }
    }

    // Fallback: re-encode to MP3
    warn!("Stream copy failed, re-encoding segment");

    let encode_result = Command::new("ffmpeg")
        .arg("-ss").arg(format!("{:.3}", start))
        .arg("-i").arg(source)
        .arg("-t").arg(format!("{:.3}", length))
        .arg("-codec:a").arg("libmp3lame")
        .arg("-qscale:a").arg("2")
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match encode_result {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(MurmureError::Audio(format!("Chunk extraction failed: {err}")))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(MurmureError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(MurmureError::Audio(format!("ffmpeg error: {e}"))),
    }
}

/// Queries the duration of an audio file using ffprobe with JSON output.
async fn probe_duration_ms(path: &Path) -> Result<u64> {
    let result = Command::new("ffprobe")
        .arg("-v").arg("quiet")
        .arg("-print_format").arg("json")
        .arg("-show_format")
        .arg(path)
        .output()
        .await;

    let output = match result {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(MurmureError::ToolNotFound("ffprobe".into()));
        }
        Err(e) => {
            return Err(MurmureError::Audio(format!("ffprobe failed: {e}")));
        }
    };

    if !output.status.success() {
        return Err(MurmureError::Audio("ffprobe returned error".into()));
    }

    let json_str = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|_| MurmureError::Audio("Invalid ffprobe output".into()))?;

    let duration_seconds = parsed["format"]["duration"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| MurmureError::Audio("Could not determine audio duration".into()))?;

    Ok((duration_seconds * 1000.0).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_supported_input() {
        assert!(is_supported_input(Path::new("memo.m4a")));
        assert!(is_supported_input(Path::new("memo.M4A")));
        assert!(is_supported_input(Path::new("/path/to/memo.mp3")));
        assert!(!is_supported_input(Path::new("memo.wav")));
        assert!(!is_supported_input(Path::new("notes.txt")));
        assert!(!is_supported_input(Path::new("no_extension")));
    }

    #[test]
    fn test_needs_transcode() {
        assert!(needs_transcode(Path::new("memo.m4a")));
        assert!(!needs_transcode(Path::new("memo.mp3")));
        assert!(!needs_transcode(Path::new("memo.MP3")));
    }

    #[test]
    fn test_mp3_sibling_stays_in_source_directory() {
        assert_eq!(
            mp3_sibling(Path::new("/audios/standup.m4a")),
            PathBuf::from("/audios/standup.mp3")
        );
    }

    #[tokio::test]
    async fn test_transcode_skipped_when_sibling_exists() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("memo.m4a");
        let sibling = dir.path().join("memo.mp3");
        std::fs::write(&source, b"not really audio").unwrap();
        std::fs::write(&sibling, b"already converted").unwrap();

        // Returns the sibling without invoking ffmpeg at all.
        let result = transcode_to_mp3(&source).await.unwrap();
        assert_eq!(result, sibling);
        assert_eq!(std::fs::read(&sibling).unwrap(), b"already converted");
    }
}
