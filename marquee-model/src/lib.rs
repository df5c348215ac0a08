//! Core data model definitions shared across Marquee crates.
#![allow(missing_docs)]

pub use ::chrono;

pub mod error;
pub mod ids;
pub mod media_type;
pub mod playback;
pub mod subtitles;
pub mod watch;

// Intentionally curated re-exports for downstream consumers.
pub use error::{ModelError, Result as ModelResult};
pub use ids::ContentId;
pub use media_type::MediaKind;
pub use playback::{PlayState, PlaybackIntent, PlaybackSource};
pub use subtitles::{SubtitleFormat, SubtitleSource};
pub use watch::{
    MIN_PERSISTED_POSITION_SECS, ProgressRecord, UpdateProgressRequest,
};
