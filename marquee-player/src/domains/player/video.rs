//! Media element capability
//!
//! The decoder/renderer is opaque to the controller. It is driven through
//! [`MediaElement`] and reports back through
//! [`super::messages::MediaEvent`] values fed into the controller.

use crate::domains::subtitles::PreparedTrack;
use crate::error::PlayerResult;
use std::time::Duration;
use url::Url;

pub trait MediaElement: Send {
    fn load(&mut self, url: &Url) -> PlayerResult<()>;

    /// Release the current source
    fn unload(&mut self);

    fn play(&mut self) -> PlayerResult<()>;

    fn pause(&mut self);

    fn seek(&mut self, position: Duration) -> PlayerResult<()>;

    fn set_volume(&mut self, volume: f64);

    fn set_muted(&mut self, muted: bool);

    fn set_playback_rate(&mut self, rate: f64);

    /// Ask the platform for exclusive presentation. Success only means the
    /// request was accepted; the change arrives later as a notification.
    fn request_fullscreen(&mut self) -> PlayerResult<()>;

    fn exit_fullscreen(&mut self);

    fn request_picture_in_picture(&mut self) -> PlayerResult<()>;

    fn exit_picture_in_picture(&mut self);

    fn set_text_tracks(&mut self, tracks: &[PreparedTrack]);

    /// Show the track at `index` and hide all others; `None` hides all
    fn show_text_track(&mut self, index: Option<usize>);
}

/// Instruction for the media element produced by the update function
#[derive(Debug, Clone, PartialEq)]
pub enum MediaCommand {
    Load(Url),
    Unload,
    Play,
    Pause,
    Seek(f64),
    SetVolume(f64),
    SetMuted(bool),
    SetPlaybackRate(f64),
    RequestFullscreen,
    ExitFullscreen,
    RequestPictureInPicture,
    ExitPictureInPicture,
    SetTextTracks(Vec<PreparedTrack>),
    ShowTextTrack(Option<usize>),
}

impl MediaCommand {
    pub fn name(&self) -> &'static str {
        match self {
            MediaCommand::Load(_) => "Load",
            MediaCommand::Unload => "Unload",
            MediaCommand::Play => "Play",
            MediaCommand::Pause => "Pause",
            MediaCommand::Seek(_) => "Seek",
            MediaCommand::SetVolume(_) => "SetVolume",
            MediaCommand::SetMuted(_) => "SetMuted",
            MediaCommand::SetPlaybackRate(_) => "SetPlaybackRate",
            MediaCommand::RequestFullscreen => "RequestFullscreen",
            MediaCommand::ExitFullscreen => "ExitFullscreen",
            MediaCommand::RequestPictureInPicture => "RequestPictureInPicture",
            MediaCommand::ExitPictureInPicture => "ExitPictureInPicture",
            MediaCommand::SetTextTracks(_) => "SetTextTracks",
            MediaCommand::ShowTextTrack(_) => "ShowTextTrack",
        }
    }
}

pub fn seek_duration(position: f64) -> Duration {
    Duration::try_from_secs_f64(position.max(0.0)).unwrap_or_default()
}
