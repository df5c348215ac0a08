//! Test support for hosts and integration tests
//!
//! Deterministic stand-ins for the clock and the media element.

pub mod recorder;
pub mod time;

pub use recorder::{MediaRecording, RecordingMediaElement};
pub use time::ManualTimeProvider;
