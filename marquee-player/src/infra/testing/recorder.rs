//! Media element fake that records every call as a [`MediaCommand`]

use crate::domains::player::{MediaCommand, MediaElement};
use crate::domains::subtitles::PreparedTrack;
use crate::error::{PlayerError, PlayerResult};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[derive(Debug, Default)]
struct RecordingInner {
    commands: Vec<MediaCommand>,
    fail_load: Option<String>,
    deny_fullscreen: bool,
    reject_play: bool,
}

/// Shared view of what a [`RecordingMediaElement`] was asked to do
#[derive(Debug, Clone, Default)]
pub struct MediaRecording {
    inner: Arc<Mutex<RecordingInner>>,
}

impl MediaRecording {
    pub fn commands(&self) -> Vec<MediaCommand> {
        self.inner.lock().commands.clone()
    }

    /// Drain the recorded commands
    pub fn take(&self) -> Vec<MediaCommand> {
        std::mem::take(&mut self.inner.lock().commands)
    }

    pub fn count(&self, name: &str) -> usize {
        self.inner
            .lock()
            .commands
            .iter()
            .filter(|command| command.name() == name)
            .count()
    }

    pub fn fail_next_load(&self, reason: impl Into<String>) {
        self.inner.lock().fail_load = Some(reason.into());
    }

    pub fn deny_fullscreen(&self, deny: bool) {
        self.inner.lock().deny_fullscreen = deny;
    }

    /// Simulate an autoplay policy that blocks `play()`
    pub fn reject_play(&self, reject: bool) {
        self.inner.lock().reject_play = reject;
    }

    fn record(&self, command: MediaCommand) {
        self.inner.lock().commands.push(command);
    }
}

/// A [`MediaElement`] that never decodes anything
#[derive(Debug, Default)]
pub struct RecordingMediaElement {
    recording: MediaRecording,
}

impl RecordingMediaElement {
    pub fn new() -> (Self, MediaRecording) {
        let element = Self::default();
        let recording = element.recording.clone();
        (element, recording)
    }
}

impl MediaElement for RecordingMediaElement {
    fn load(&mut self, url: &Url) -> PlayerResult<()> {
        self.recording.record(MediaCommand::Load(url.clone()));
        match self.recording.inner.lock().fail_load.take() {
            Some(reason) => Err(PlayerError::SourceLoad(reason)),
            None => Ok(()),
        }
    }

    fn unload(&mut self) {
        self.recording.record(MediaCommand::Unload);
    }

    fn play(&mut self) -> PlayerResult<()> {
        self.recording.record(MediaCommand::Play);
        if self.recording.inner.lock().reject_play {
            return Err(PlayerError::SourceLoad(
                "play() blocked by autoplay policy".to_string(),
            ));
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.recording.record(MediaCommand::Pause);
    }

    fn seek(&mut self, position: Duration) -> PlayerResult<()> {
        self.recording
            .record(MediaCommand::Seek(position.as_secs_f64()));
        Ok(())
    }

    fn set_volume(&mut self, volume: f64) {
        self.recording.record(MediaCommand::SetVolume(volume));
    }

    fn set_muted(&mut self, muted: bool) {
        self.recording.record(MediaCommand::SetMuted(muted));
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.recording.record(MediaCommand::SetPlaybackRate(rate));
    }

    fn request_fullscreen(&mut self) -> PlayerResult<()> {
        self.recording.record(MediaCommand::RequestFullscreen);
        if self.recording.inner.lock().deny_fullscreen {
            return Err(PlayerError::FullscreenDenied(
                "not triggered by user activation".to_string(),
            ));
        }
        Ok(())
    }

    fn exit_fullscreen(&mut self) {
        self.recording.record(MediaCommand::ExitFullscreen);
    }

    fn request_picture_in_picture(&mut self) -> PlayerResult<()> {
        self.recording.record(MediaCommand::RequestPictureInPicture);
        Ok(())
    }

    fn exit_picture_in_picture(&mut self) {
        self.recording.record(MediaCommand::ExitPictureInPicture);
    }

    fn set_text_tracks(&mut self, tracks: &[PreparedTrack]) {
        self.recording
            .record(MediaCommand::SetTextTracks(tracks.to_vec()));
    }

    fn show_text_track(&mut self, index: Option<usize>) {
        self.recording.record(MediaCommand::ShowTextTrack(index));
    }
}
