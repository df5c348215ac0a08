use super::zoom::GestureEvent;
use crate::domains::subtitles::PreparedTrack;
use marquee_model::PlaybackSource;
use marquee_model::ProgressRecord;
use std::fmt;

/// Notifications from the media element
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    LoadedMetadata { duration: f64 },
    DurationChanged(f64),
    CanPlay,
    TimeUpdate(f64),
    /// End of the buffered range that contains the playhead, in seconds
    Progress { buffered_end: f64 },
    Waiting,
    Playing,
    Paused,
    SeekCompleted,
    Ended,
    Error(String),
    FullscreenChanged(bool),
    FullscreenDenied(String),
    PictureInPictureChanged(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedKey {
    Space,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Escape,
    Home,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Named(NamedKey),
    Character(char),
}

#[derive(Clone)]
pub enum PlayerMessage {
    // Session
    SourceAssigned {
        source: PlaybackSource,
        resume: Option<ProgressRecord>,
    },
    Unmount,
    PageHidden,

    // Playback control
    PlayPause,
    Play,
    Pause,

    // Seeking
    Seek(f64),
    SeekRelative(f64),
    SeekToFraction(f64),

    // Volume
    SetVolume(f64),
    AdjustVolume(f64),
    ToggleMute,

    // Presentation
    ToggleFullscreen,
    TogglePictureInPicture,
    SetPlaybackSpeed(f64),
    ToggleSpeedMenu,
    ToggleSettings,
    ToggleSubtitleMenu,
    CloseMenus,

    // Subtitles
    SubtitleTracksReady {
        generation: u64,
        tracks: Vec<PreparedTrack>,
    },
    SubtitleTrackSelected(Option<usize>),
    CycleSubtitleTrack,

    // Input
    PointerActivity,
    KeyPressed(Key),
    VideoClicked,
    VideoDoubleClicked,
    Gesture(GestureEvent),
    RestoreZoom,
    ViewportResized { width: f64, height: f64 },

    Media(MediaEvent),
    Tick,
}

impl fmt::Debug for PlayerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerMessage::SourceAssigned { source, resume } => write!(
                f,
                "SourceAssigned({}, resume: {:?})",
                source.content_id,
                resume.as_ref().map(|r| r.position_seconds)
            ),
            PlayerMessage::Unmount => write!(f, "Unmount"),
            PlayerMessage::PageHidden => write!(f, "PageHidden"),

            PlayerMessage::PlayPause => write!(f, "PlayPause"),
            PlayerMessage::Play => write!(f, "Play"),
            PlayerMessage::Pause => write!(f, "Pause"),

            PlayerMessage::Seek(pos) => write!(f, "Seek({})", pos),
            PlayerMessage::SeekRelative(delta) => write!(f, "SeekRelative({})", delta),
            PlayerMessage::SeekToFraction(fraction) => {
                write!(f, "SeekToFraction({})", fraction)
            }

            PlayerMessage::SetVolume(vol) => write!(f, "SetVolume({})", vol),
            PlayerMessage::AdjustVolume(delta) => write!(f, "AdjustVolume({})", delta),
            PlayerMessage::ToggleMute => write!(f, "ToggleMute"),

            PlayerMessage::ToggleFullscreen => write!(f, "ToggleFullscreen"),
            PlayerMessage::TogglePictureInPicture => write!(f, "TogglePictureInPicture"),
            PlayerMessage::SetPlaybackSpeed(speed) => write!(f, "SetPlaybackSpeed({})", speed),
            PlayerMessage::ToggleSpeedMenu => write!(f, "ToggleSpeedMenu"),
            PlayerMessage::ToggleSettings => write!(f, "ToggleSettings"),
            PlayerMessage::ToggleSubtitleMenu => write!(f, "ToggleSubtitleMenu"),
            PlayerMessage::CloseMenus => write!(f, "CloseMenus"),

            // Track payloads can hold whole documents
            PlayerMessage::SubtitleTracksReady { generation, tracks } => write!(
                f,
                "SubtitleTracksReady(gen {}, {} tracks)",
                generation,
                tracks.len()
            ),
            PlayerMessage::SubtitleTrackSelected(index) => {
                write!(f, "SubtitleTrackSelected({:?})", index)
            }
            PlayerMessage::CycleSubtitleTrack => write!(f, "CycleSubtitleTrack"),

            PlayerMessage::PointerActivity => write!(f, "PointerActivity"),
            PlayerMessage::KeyPressed(key) => write!(f, "KeyPressed({:?})", key),
            PlayerMessage::VideoClicked => write!(f, "VideoClicked"),
            PlayerMessage::VideoDoubleClicked => write!(f, "VideoDoubleClicked"),
            PlayerMessage::Gesture(gesture) => write!(f, "Gesture({:?})", gesture),
            PlayerMessage::RestoreZoom => write!(f, "RestoreZoom"),
            PlayerMessage::ViewportResized { width, height } => {
                write!(f, "ViewportResized({}x{})", width, height)
            }

            PlayerMessage::Media(event) => write!(f, "Media({:?})", event),
            PlayerMessage::Tick => write!(f, "Tick"),
        }
    }
}

impl PlayerMessage {
    pub fn name(&self) -> &'static str {
        match self {
            PlayerMessage::SourceAssigned { .. } => "Player::SourceAssigned",
            PlayerMessage::Unmount => "Player::Unmount",
            PlayerMessage::PageHidden => "Player::PageHidden",
            PlayerMessage::PlayPause => "Player::PlayPause",
            PlayerMessage::Play => "Player::Play",
            PlayerMessage::Pause => "Player::Pause",
            PlayerMessage::Seek(_) => "Player::Seek",
            PlayerMessage::SeekRelative(_) => "Player::SeekRelative",
            PlayerMessage::SeekToFraction(_) => "Player::SeekToFraction",
            PlayerMessage::SetVolume(_) => "Player::SetVolume",
            PlayerMessage::AdjustVolume(_) => "Player::AdjustVolume",
            PlayerMessage::ToggleMute => "Player::ToggleMute",
            PlayerMessage::ToggleFullscreen => "Player::ToggleFullscreen",
            PlayerMessage::TogglePictureInPicture => "Player::TogglePictureInPicture",
            PlayerMessage::SetPlaybackSpeed(_) => "Player::SetPlaybackSpeed",
            PlayerMessage::ToggleSpeedMenu => "Player::ToggleSpeedMenu",
            PlayerMessage::ToggleSettings => "Player::ToggleSettings",
            PlayerMessage::ToggleSubtitleMenu => "Player::ToggleSubtitleMenu",
            PlayerMessage::CloseMenus => "Player::CloseMenus",
            PlayerMessage::SubtitleTracksReady { .. } => "Player::SubtitleTracksReady",
            PlayerMessage::SubtitleTrackSelected(_) => "Player::SubtitleTrackSelected",
            PlayerMessage::CycleSubtitleTrack => "Player::CycleSubtitleTrack",
            PlayerMessage::PointerActivity => "Player::PointerActivity",
            PlayerMessage::KeyPressed(_) => "Player::KeyPressed",
            PlayerMessage::VideoClicked => "Player::VideoClicked",
            PlayerMessage::VideoDoubleClicked => "Player::VideoDoubleClicked",
            PlayerMessage::Gesture(_) => "Player::Gesture",
            PlayerMessage::RestoreZoom => "Player::RestoreZoom",
            PlayerMessage::ViewportResized { .. } => "Player::ViewportResized",
            PlayerMessage::Media(_) => "Player::Media",
            PlayerMessage::Tick => "Player::Tick",
        }
    }

    /// Messages that count as viewer activity for the controls overlay
    pub fn is_user_activity(&self) -> bool {
        matches!(
            self,
            PlayerMessage::PlayPause
                | PlayerMessage::Play
                | PlayerMessage::Pause
                | PlayerMessage::Seek(_)
                | PlayerMessage::SeekRelative(_)
                | PlayerMessage::SeekToFraction(_)
                | PlayerMessage::SetVolume(_)
                | PlayerMessage::AdjustVolume(_)
                | PlayerMessage::ToggleMute
                | PlayerMessage::ToggleFullscreen
                | PlayerMessage::TogglePictureInPicture
                | PlayerMessage::SetPlaybackSpeed(_)
                | PlayerMessage::ToggleSpeedMenu
                | PlayerMessage::ToggleSettings
                | PlayerMessage::ToggleSubtitleMenu
                | PlayerMessage::CloseMenus
                | PlayerMessage::SubtitleTrackSelected(_)
                | PlayerMessage::CycleSubtitleTrack
                | PlayerMessage::PointerActivity
                | PlayerMessage::KeyPressed(_)
                | PlayerMessage::VideoClicked
                | PlayerMessage::VideoDoubleClicked
                | PlayerMessage::Gesture(_)
                | PlayerMessage::RestoreZoom
        )
    }
}
