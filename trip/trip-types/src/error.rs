//! Error types for the record model.

use thiserror::Error;

/// Errors that can occur when classifying record model values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// A recording-type token matched no known variant.
    #[error("unknown recording type: {0}")]
    UnknownRecordingType(String),

    /// A camera projection name matched no known variant.
    #[error("unknown camera projection: {0}")]
    UnknownProjection(String),
}

impl RecordError {
    /// Creates an unknown recording type error.
    #[must_use]
    pub fn unknown_recording_type(token: impl Into<String>) -> Self {
        Self::UnknownRecordingType(token.into())
    }

    /// Creates an unknown projection error.
    #[must_use]
    pub fn unknown_projection(name: impl Into<String>) -> Self {
        Self::UnknownProjection(name.into())
    }
}
