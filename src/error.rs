//! Error types for the ambient engine

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, AmbientError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AmbientError {
    /// Output device could not be opened, resumed, or fed
    #[error("audio unavailable: {0}")]
    AudioUnavailable(String),

    /// No preset with this id in the catalog
    #[error("unknown preset: {0}")]
    UnknownPreset(String),
}

impl AmbientError {
    pub fn audio(reason: impl Into<String>) -> Self {
        AmbientError::AudioUnavailable(reason.into())
    }

    /// True for failures the caller may log and ignore
    pub fn is_audio_unavailable(&self) -> bool {
        matches!(self, AmbientError::AudioUnavailable(_))
    }
}
