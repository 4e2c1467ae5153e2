//! CLI module for Murmure.

mod output;
pub mod preflight;

pub use output::Output;

use clap::Parser;

/// Murmure - batch audio transcription
///
/// Transcribes every recording in the configured source directory into
/// a plain-text transcript, one output file per input.
#[derive(Parser, Debug)]
#[command(name = "murmure")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Refine each transcript segment with a language-model rewrite pass
    #[arg(long)]
    pub refine: bool,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
