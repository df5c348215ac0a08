use crate::error::ModelError;
use crate::{ContentId, MediaKind, SubtitleSource};
use std::fmt::{Display, Formatter};
use url::Url;

/// Lifecycle state of a playback session.
///
/// `Buffering` is entered from the media element's starvation signal only;
/// the user's play/pause intent survives it in [`PlaybackIntent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PlayState {
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
    Buffering,
    Ended,
    Errored,
}

impl PlayState {
    /// States in which a play/pause toggle has no effect
    pub fn ignores_toggle(&self) -> bool {
        matches!(self, PlayState::Idle | PlayState::Loading | PlayState::Errored)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PlayState::Errored)
    }
}

impl Display for PlayState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PlayState::Idle => "idle",
            PlayState::Loading => "loading",
            PlayState::Playing => "playing",
            PlayState::Paused => "paused",
            PlayState::Buffering => "buffering",
            PlayState::Ended => "ended",
            PlayState::Errored => "errored",
        };
        f.write_str(label)
    }
}

/// What the user asked for, independent of transient buffering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PlaybackIntent {
    Play,
    #[default]
    Pause,
}

impl PlaybackIntent {
    pub fn as_state(&self) -> PlayState {
        match self {
            PlaybackIntent::Play => PlayState::Playing,
            PlaybackIntent::Pause => PlayState::Paused,
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            PlaybackIntent::Play => PlaybackIntent::Pause,
            PlaybackIntent::Pause => PlaybackIntent::Play,
        }
    }
}

/// Everything needed to start a session for one playable unit
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PlaybackSource {
    pub content_id: ContentId,
    pub media_kind: MediaKind,
    pub url: Url,
    #[cfg_attr(feature = "serde", serde(default))]
    pub subtitles: Vec<SubtitleSource>,
    /// Overrides the player's autoplay setting for this source
    #[cfg_attr(feature = "serde", serde(default))]
    pub autoplay: Option<bool>,
}

impl PlaybackSource {
    pub fn new(
        content_id: ContentId,
        media_kind: MediaKind,
        url: &str,
    ) -> Result<Self, ModelError> {
        Ok(Self {
            content_id,
            media_kind,
            url: Url::parse(url)?,
            subtitles: Vec::new(),
            autoplay: None,
        })
    }

    pub fn with_subtitles(mut self, subtitles: Vec<SubtitleSource>) -> Self {
        self.subtitles = subtitles;
        self
    }

    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = Some(autoplay);
        self
    }
}
