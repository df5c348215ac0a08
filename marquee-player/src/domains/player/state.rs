use super::timers::PlayerTimers;
use super::track_selection::SubtitleTrackList;
use super::zoom::{ZoomController, ZoomState};
use crate::infra::config::PlaybackTuning;
use marquee_model::{ContentId, MediaKind, PlayState, PlaybackIntent, PlaybackSource};
use std::time::Instant;
use url::Url;

/// Shown in place of the video after a load or decode failure
pub const PLAYBACK_ERROR_MESSAGE: &str = "This video could not be played.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerMenu {
    Speed,
    Settings,
    Subtitles,
}

/// Identity of the loaded source
#[derive(Debug, Clone, PartialEq)]
pub struct SessionInfo {
    pub content_id: ContentId,
    pub media_kind: MediaKind,
    pub source_url: Url,
    pub autoplay: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekIndicator {
    pub delta: f64,
}

impl SeekIndicator {
    pub fn label(&self) -> String {
        if self.delta >= 0.0 {
            format!("+{}s", self.delta.round())
        } else {
            format!("-{}s", self.delta.abs().round())
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlayerDomainState {
    pub tuning: PlaybackTuning,

    /// Bumped on every source assignment; async results from older sessions
    /// carry a stale value and are dropped
    pub generation: u64,
    pub session: Option<SessionInfo>,

    pub play_state: PlayState,
    pub intent: PlaybackIntent,
    pub position: f64,
    pub duration: f64,
    pub buffered_fraction: f64,
    /// Resume offset to hand the media element once metadata is known
    pub pending_resume: Option<f64>,
    /// Set while a seek is in flight so stale time updates don't snap back
    pub seeking: bool,

    pub volume: f64,
    pub muted: bool,
    pub playback_rate: f64,

    // Reflections of platform notifications
    pub is_fullscreen: bool,
    pub is_picture_in_picture: bool,

    pub controls_visible: bool,
    pub open_menu: Option<PlayerMenu>,
    pub seek_indicator: Option<SeekIndicator>,
    pub volume_indicator: Option<f64>,
    pub track_notification: Option<String>,
    pub error_message: Option<String>,

    pub subtitles: SubtitleTrackList,
    pub zoom: ZoomController,
    pub timers: PlayerTimers,
}

impl PlayerDomainState {
    pub fn new(tuning: PlaybackTuning, initial_volume: f64) -> Self {
        let volume = if initial_volume.is_finite() {
            initial_volume.clamp(0.0, 1.0)
        } else {
            1.0
        };
        Self {
            zoom: ZoomController::new(tuning.zoom_max_scale),
            tuning,
            generation: 0,
            session: None,
            play_state: PlayState::Idle,
            intent: PlaybackIntent::Pause,
            position: 0.0,
            duration: 0.0,
            buffered_fraction: 0.0,
            pending_resume: None,
            seeking: false,
            volume,
            muted: volume == 0.0,
            playback_rate: 1.0,
            is_fullscreen: false,
            is_picture_in_picture: false,
            controls_visible: true,
            open_menu: None,
            seek_indicator: None,
            volume_indicator: None,
            track_notification: None,
            error_message: None,
            subtitles: SubtitleTrackList::default(),
            timers: PlayerTimers::default(),
        }
    }

    /// Start a fresh session for `source`.
    ///
    /// Volume, mute, rate and the fullscreen/PiP reflections belong to the
    /// player instance and survive; everything else is per source.
    pub fn begin_session(&mut self, source: &PlaybackSource, resume: Option<f64>) {
        self.reset();
        self.generation += 1;
        self.session = Some(SessionInfo {
            content_id: source.content_id.clone(),
            media_kind: source.media_kind,
            source_url: source.url.clone(),
            autoplay: source.autoplay.unwrap_or(self.tuning.autoplay),
        });
        self.play_state = PlayState::Loading;
        self.intent = PlaybackIntent::Pause;
        if let Some(position) = resume {
            self.position = position;
            self.pending_resume = Some(position);
        }
    }

    /// Drop everything tied to the current source
    pub fn reset(&mut self) {
        self.session = None;
        self.play_state = PlayState::Idle;
        self.intent = PlaybackIntent::Pause;
        self.position = 0.0;
        self.duration = 0.0;
        self.buffered_fraction = 0.0;
        self.pending_resume = None;
        self.seeking = false;
        self.controls_visible = true;
        self.open_menu = None;
        self.seek_indicator = None;
        self.volume_indicator = None;
        self.track_notification = None;
        self.error_message = None;
        self.subtitles = SubtitleTrackList::default();
        self.zoom.reset();
        self.timers.cancel_all();
    }

    pub fn has_source(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.play_state == PlayState::Playing
    }

    /// Clamp to `[0, duration]`; the upper bound applies once duration is known
    pub fn clamp_position(&self, position: f64) -> f64 {
        let position = if position.is_finite() { position } else { 0.0 };
        if self.duration > 0.0 {
            position.clamp(0.0, self.duration)
        } else {
            position.max(0.0)
        }
    }

    pub fn set_duration(&mut self, duration: f64) {
        if duration.is_finite() && duration > 0.0 {
            self.duration = duration;
            self.position = self.clamp_position(self.position);
        }
    }

    pub fn zoom_state(&self) -> &ZoomState {
        self.zoom.state()
    }

    /// Volume the viewer actually hears
    pub fn effective_volume(&self) -> f64 {
        if self.muted { 0.0 } else { self.volume }
    }

    pub fn show_track_notification(&mut self, message: String, now: Instant) {
        self.track_notification = Some(message);
        self.timers
            .track_notification
            .schedule(now, self.tuning.track_notification_duration);
    }

    pub fn show_seek_indicator(&mut self, delta: f64, now: Instant) {
        self.seek_indicator = Some(SeekIndicator { delta });
        self.timers
            .seek_indicator
            .schedule(now, self.tuning.indicator_duration);
    }

    pub fn show_volume_indicator(&mut self, now: Instant) {
        self.volume_indicator = Some(self.effective_volume());
        self.timers
            .volume_indicator
            .schedule(now, self.tuning.indicator_duration);
    }

    /// Clear transient indicators whose deadline has passed
    pub fn expire_indicators(&mut self, now: Instant) {
        if self.timers.seek_indicator.fire(now) {
            self.seek_indicator = None;
        }
        if self.timers.volume_indicator.fire(now) {
            self.volume_indicator = None;
        }
        if self.timers.track_notification.fire(now) {
            self.track_notification = None;
        }
    }
}
