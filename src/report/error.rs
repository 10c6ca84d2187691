//! Session report error types.

use thiserror::Error;

/// Errors that can occur while writing or reading a session report
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Report was written by an incompatible format version
    #[error("Unsupported report version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}
