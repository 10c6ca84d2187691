//! Build errors for the assistant builder.

use crate::config::ConfigError;
use thiserror::Error;

/// Errors that can occur when building an assistant.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Frame source not specified. Call .frames(source) before .build()")]
    MissingFrameSource,

    #[error("Perception backend not specified. Call .perception(backend)")]
    MissingPerception,

    #[error("Text reader not specified. Call .text_reader(reader)")]
    MissingTextReader,

    #[error("Speaker not specified. Call .speaker(speaker)")]
    MissingSpeaker,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}
