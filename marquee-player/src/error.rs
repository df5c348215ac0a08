//! Player error taxonomy
//!
//! Only [`PlayerError::SourceLoad`] is ever surfaced to the viewer. Progress,
//! subtitle and fullscreen failures are logged where they happen and playback
//! carries on.

use marquee_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlayerError {
    /// Bad or unreachable media URL, or a stream the decoder rejected
    #[error("Media source failed to load: {0}")]
    SourceLoad(String),

    #[error("Failed to persist watch progress: {0}")]
    ProgressPersist(String),

    /// Malformed source track; the track is dropped, the session continues
    #[error("Subtitle conversion failed: {0}")]
    SubtitleConversion(String),

    /// Platform refused or revoked exclusive presentation
    #[error("Fullscreen request denied: {0}")]
    FullscreenDenied(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API request failed: {0}")]
    Api(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type PlayerResult<T> = Result<T, PlayerError>;
