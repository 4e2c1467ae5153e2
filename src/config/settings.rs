//! Configuration settings for Murmure.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub input: InputSettings,
    pub output: OutputSettings,
    pub transcription: TranscriptionSettings,
    pub refinement: RefinementSettings,
}

/// Input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Directory holding the recordings to process.
    pub source_path: String,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            source_path: "./audios".to_string(),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory transcripts are written to.
    pub transcript_path: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            transcript_path: "./transcripts".to_string(),
        }
    }
}

/// Transcription service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Whether transcription runs at all. When disabled, inputs are
    /// still transcoded but no transcripts are produced.
    pub enabled: bool,
    /// Transcription model to use.
    pub model: String,
    /// Duration of each audio chunk, in seconds.
    pub chunk_length_seconds: u64,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "whisper-1".to_string(),
            chunk_length_seconds: 600, // 10 minutes
        }
    }
}

/// Refinement (rewrite pass) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinementSettings {
    /// Chat model used for the rewrite pass.
    pub model: String,
    /// Instruction given to the model for every segment.
    pub instruction: String,
}

impl Default for RefinementSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            instruction: "You are a transcription editor. Fix punctuation, casing, and \
                          obvious mis-transcriptions without changing the meaning or \
                          dropping content. Return only the corrected text."
                .to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or the default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("murmure")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded source directory path.
    pub fn source_dir(&self) -> PathBuf {
        Self::expand_path(&self.input.source_path)
    }

    /// Get the expanded transcript output directory path.
    pub fn transcript_dir(&self) -> PathBuf {
        Self::expand_path(&self.output.transcript_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.transcription.enabled);
        assert_eq!(settings.transcription.model, "whisper-1");
        assert_eq!(settings.transcription.chunk_length_seconds, 600);
        assert_eq!(settings.input.source_path, "./audios");
        assert_eq!(settings.output.transcript_path, "./transcripts");
    }

    #[test]
    fn test_parse_partial_toml_keeps_defaults() {
        let toml = r#"
            [input]
            source_path = "/data/recordings"

            [transcription]
            enabled = false
            chunk_length_seconds = 120
        "#;

        let settings: Settings = toml::from_str(toml).unwrap();
        assert_eq!(settings.input.source_path, "/data/recordings");
        assert!(!settings.transcription.enabled);
        assert_eq!(settings.transcription.chunk_length_seconds, 120);
        // Untouched sections fall back to defaults.
        assert_eq!(settings.transcription.model, "whisper-1");
        assert_eq!(settings.output.transcript_path, "./transcripts");
        assert_eq!(settings.refinement.model, "gpt-4o-mini");
    }

    #[test]
    fn test_expand_path_leaves_plain_paths_alone() {
        assert_eq!(
            Settings::expand_path("/data/recordings"),
            PathBuf::from("/data/recordings")
        );
    }

    #[test]
    fn test_expand_path_handles_tilde() {
        if dirs::home_dir().is_some() {
            let expanded = Settings::expand_path("~/recordings");
            assert!(!expanded.to_string_lossy().starts_with('~'));
        }
    }

    #[test]
    fn test_load_from_missing_file_yields_defaults() {
        let path = PathBuf::from("/nonexistent/murmure/config.toml");
        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.input.source_path, "./audios");
    }
}
