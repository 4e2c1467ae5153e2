//! Pre-flight checks before the run starts.
//!
//! Validates credentials and external tools up front so a run does not
//! fail midway through a directory of recordings.

use crate::error::{MurmureError, Result};
use std::process::Command;

/// Run all pre-flight checks.
///
/// Returns Ok(()) if the API key and required tools are available, or
/// an error describing what's missing.
pub fn check() -> Result<()> {
    check_api_key()?;
    check_tool("ffmpeg")?;
    check_tool("ffprobe")?;
    Ok(())
}

/// Check if the OpenAI API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(MurmureError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(MurmureError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check if an external tool is available.
fn check_tool(name: &str) -> Result<()> {
    // ffmpeg/ffprobe use -version (single dash)
    match Command::new(name).arg("-version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(MurmureError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(MurmureError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(MurmureError::ToolNotFound(format!("{}: {}", name, e))),
    }
}
