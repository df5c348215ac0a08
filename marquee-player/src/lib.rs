//! Marquee player library
//!
//! Headless playback controller for a streaming catalog: the play/pause
//! state machine, watch-progress persistence, zoom gestures and subtitle
//! track handling. A host supplies a [`domains::player::MediaElement`] for
//! the actual decoder and feeds its notifications back in.
//!
//! Notes
//! - Public items are subject to change before 1.0.
//! - [`infra::testing`] is exported so hosts can drive the controller in
//!   their own tests without a real media element.

pub mod domains;
pub mod error;
pub mod infra;

pub use domains::player::{
    MediaCommand, MediaElement, MediaEvent, PlaybackController, PlayerMessage,
};
pub use error::{PlayerError, PlayerResult};
pub use infra::config::PlayerConfig;
