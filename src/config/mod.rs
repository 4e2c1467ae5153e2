//! Configuration module for Murmure.
//!
//! Handles loading application settings from a TOML file.

mod settings;

pub use settings::{
    InputSettings, OutputSettings, RefinementSettings, Settings, TranscriptionSettings,
};
