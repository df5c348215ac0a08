//! Playback controller
//!
//! One controller per mounted player. Every input (viewer action, media
//! notification, timer tick, async completion) becomes a [`PlayerMessage`]
//! handled by [`update::update_player`]; the controller then carries out the
//! returned effects against the media element, the progress store and the
//! tokio runtime.

pub mod controls;
pub mod messages;
pub mod progress;
pub mod state;
pub mod timers;
pub mod track_selection;
pub mod update;
pub mod video;
pub mod zoom;

pub use messages::{Key, MediaEvent, NamedKey, PlayerMessage};
pub use progress::FlushKind;
pub use state::{PlayerDomainState, PlayerMenu};
pub use update::{PlayerEffect, PlayerUpdateResult, update_player};
pub use video::{MediaCommand, MediaElement};
pub use zoom::{GestureEvent, ZoomState};

use crate::domains::subtitles::{SubtitleFetcher, prepare_tracks};
use crate::error::PlayerError;
use crate::infra::config::PlayerConfig;
use crate::infra::services::ProgressStore;
use crate::infra::time::TimeProvider;
use log::{debug, warn};
use marquee_model::{ContentId, PlaybackSource, ProgressRecord, SubtitleSource, UpdateProgressRequest};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};

pub struct PlaybackController {
    state: PlayerDomainState,
    media: Box<dyn MediaElement>,
    progress_store: Arc<dyn ProgressStore>,
    subtitle_fetcher: Arc<dyn SubtitleFetcher>,
    clock: Arc<dyn TimeProvider>,
    /// Checkpoint flushes; aborted when the session is torn down
    checkpoints: JoinSet<()>,
    subtitle_task: Option<JoinHandle<()>>,
    last_final_flush: Option<JoinHandle<()>>,
    internal_tx: mpsc::UnboundedSender<PlayerMessage>,
    internal_rx: mpsc::UnboundedReceiver<PlayerMessage>,
    resume_fetch_timeout: Duration,
}

impl fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackController")
            .field("play_state", &self.state.play_state)
            .field("session", &self.state.session.as_ref().map(|s| &s.content_id))
            .field("position", &self.state.position)
            .field("checkpoints_in_flight", &self.checkpoints.len())
            .finish()
    }
}

/// Dropping a controller with a live session takes the same path as
/// [`PlaybackController::unmount`]; the final flush runs detached.
impl Drop for PlaybackController {
    fn drop(&mut self) {
        if self.state.has_source() {
            debug!("[Player] Dropped without unmount, flushing");
            drop(self.unmount());
        }
    }
}

impl PlaybackController {
    pub fn new(
        config: &PlayerConfig,
        media: Box<dyn MediaElement>,
        progress_store: Arc<dyn ProgressStore>,
        subtitle_fetcher: Arc<dyn SubtitleFetcher>,
        clock: Arc<dyn TimeProvider>,
    ) -> Self {
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();
        Self {
            state: PlayerDomainState::new(config.tuning(), config.volume),
            media,
            progress_store,
            subtitle_fetcher,
            clock,
            checkpoints: JoinSet::new(),
            subtitle_task: None,
            last_final_flush: None,
            internal_tx,
            internal_rx,
            resume_fetch_timeout: Duration::from_millis(config.resume_fetch_timeout_ms),
        }
    }

    pub fn state(&self) -> &PlayerDomainState {
        &self.state
    }

    /// Earliest timer deadline, for hosts that sleep between ticks
    pub fn next_deadline(&self) -> Option<Instant> {
        self.state.timers.next_deadline()
    }

    /// Start a session for `source`.
    ///
    /// The stored progress is read first so the resume position is seeded
    /// before the media element can start playing. A slow or failing store
    /// only costs the resume, never the playback.
    pub async fn open(&mut self, source: PlaybackSource) {
        let store = Arc::clone(&self.progress_store);
        let resume =
            fetch_resume(store, &source.content_id, self.resume_fetch_timeout).await;
        self.dispatch(PlayerMessage::SourceAssigned { source, resume });
    }

    /// Run one message through the update function and apply its effects
    pub fn dispatch(&mut self, message: PlayerMessage) {
        let now = self.clock.now();
        debug!("[Player] {:?}", message);
        let result = update_player(&mut self.state, message, now);
        self.apply(result);
    }

    /// Forward a media element notification
    pub fn handle_media_event(&mut self, event: MediaEvent) {
        self.dispatch(PlayerMessage::Media(event));
    }

    /// Deliver finished background work and fire due timers
    pub fn tick(&mut self) {
        self.process_pending();
        self.reap_checkpoints();
        self.dispatch(PlayerMessage::Tick);
    }

    /// Dispatch results posted by background tasks
    pub fn process_pending(&mut self) {
        while let Ok(message) = self.internal_rx.try_recv() {
            self.dispatch(message);
        }
    }

    /// Wait for subtitle preparation and outstanding flushes, then deliver
    /// their results
    pub async fn settle(&mut self) {
        if let Some(task) = self.subtitle_task.take()
            && let Err(err) = task.await
            && !err.is_cancelled()
        {
            warn!("[Subtitles] Preparation task failed: {}", err);
        }
        if let Some(task) = self.last_final_flush.take()
            && let Err(err) = task.await
        {
            warn!("[Progress] Final flush task failed: {}", err);
        }
        while let Some(joined) = self.checkpoints.join_next().await {
            if let Err(err) = joined
                && !err.is_cancelled()
            {
                warn!("[Progress] Flush task failed: {}", err);
            }
        }
        self.process_pending();
    }

    /// Tear the session down.
    ///
    /// Timers are cancelled and checkpoint flushes aborted before this
    /// returns. The final flush keeps running detached; its handle is
    /// returned for hosts that want to wait on it.
    pub fn unmount(&mut self) -> Option<JoinHandle<()>> {
        self.dispatch(PlayerMessage::Unmount);
        self.abort_background_work();
        self.last_final_flush.take()
    }

    /// The page or tab is going away; flush without ending the session
    pub fn page_hidden(&mut self) -> Option<JoinHandle<()>> {
        self.dispatch(PlayerMessage::PageHidden);
        self.last_final_flush.take()
    }

    pub fn toggle_play(&mut self) {
        self.dispatch(PlayerMessage::PlayPause);
    }

    pub fn seek(&mut self, position: f64) {
        self.dispatch(PlayerMessage::Seek(position));
    }

    pub fn skip(&mut self, delta: f64) {
        self.dispatch(PlayerMessage::SeekRelative(delta));
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.dispatch(PlayerMessage::SetVolume(volume));
    }

    pub fn toggle_mute(&mut self) {
        self.dispatch(PlayerMessage::ToggleMute);
    }

    pub fn toggle_fullscreen(&mut self) {
        self.dispatch(PlayerMessage::ToggleFullscreen);
    }

    pub fn restore_zoom(&mut self) {
        self.dispatch(PlayerMessage::RestoreZoom);
    }

    pub fn select_subtitle_track(&mut self, index: Option<usize>) {
        self.dispatch(PlayerMessage::SubtitleTrackSelected(index));
    }

    fn apply(&mut self, result: PlayerUpdateResult) {
        let mut feedback = Vec::new();
        for effect in result.effects {
            match effect {
                PlayerEffect::Media(command) => {
                    if let Some(message) = self.execute(command) {
                        feedback.push(message);
                    }
                }
                PlayerEffect::PersistProgress { request, kind } => {
                    self.spawn_flush(request, kind);
                }
                PlayerEffect::LoadSubtitles {
                    generation,
                    sources,
                } => self.spawn_subtitle_preparation(generation, sources),
                PlayerEffect::CancelBackgroundWork => self.abort_background_work(),
            }
        }
        for message in feedback {
            self.dispatch(message);
        }
    }

    /// Drive the media element; failures that change the session come back
    /// as media events
    fn execute(&mut self, command: MediaCommand) -> Option<PlayerMessage> {
        match command {
            MediaCommand::Load(url) => {
                if let Err(err) = self.media.load(&url) {
                    return Some(PlayerMessage::Media(MediaEvent::Error(err.to_string())));
                }
            }
            MediaCommand::Unload => self.media.unload(),
            MediaCommand::Play => {
                if let Err(err) = self.media.play() {
                    warn!("[Player] Play rejected: {}", err);
                    return Some(PlayerMessage::Media(MediaEvent::Paused));
                }
            }
            MediaCommand::Pause => self.media.pause(),
            MediaCommand::Seek(position) => {
                if let Err(err) = self.media.seek(video::seek_duration(position)) {
                    warn!("[Player] Seek to {:.1}s failed: {}", position, err);
                    return Some(PlayerMessage::Media(MediaEvent::SeekCompleted));
                }
            }
            MediaCommand::SetVolume(volume) => self.media.set_volume(volume),
            MediaCommand::SetMuted(muted) => self.media.set_muted(muted),
            MediaCommand::SetPlaybackRate(rate) => self.media.set_playback_rate(rate),
            MediaCommand::RequestFullscreen => match self.media.request_fullscreen() {
                Ok(()) => {}
                Err(err @ PlayerError::FullscreenDenied(_)) => debug!("[Player] {}", err),
                Err(err) => warn!("[Player] Fullscreen request failed: {}", err),
            },
            MediaCommand::ExitFullscreen => self.media.exit_fullscreen(),
            MediaCommand::RequestPictureInPicture => {
                if let Err(err) = self.media.request_picture_in_picture() {
                    debug!("[Player] Picture-in-picture unavailable: {}", err);
                }
            }
            MediaCommand::ExitPictureInPicture => self.media.exit_picture_in_picture(),
            MediaCommand::SetTextTracks(tracks) => self.media.set_text_tracks(&tracks),
            MediaCommand::ShowTextTrack(index) => self.media.show_text_track(index),
        }
        None
    }

    fn spawn_flush(&mut self, request: UpdateProgressRequest, kind: FlushKind) {
        let Ok(handle) = Handle::try_current() else {
            warn!(
                "[Progress] No async runtime, dropping {:?} flush for {}",
                kind, request.content_id
            );
            return;
        };

        let store = Arc::clone(&self.progress_store);
        let task = async move {
            let content_id = request.content_id.clone();
            match store.save_progress(request).await {
                Ok(()) => debug!("[Progress] Saved progress for {}", content_id),
                Err(err) => warn!("[Progress] {} (content {})", err, content_id),
            }
        };

        match kind {
            FlushKind::Checkpoint => {
                self.checkpoints.spawn_on(task, &handle);
            }
            FlushKind::Final => {
                self.last_final_flush = Some(handle.spawn(task));
            }
        }
    }

    fn spawn_subtitle_preparation(&mut self, generation: u64, sources: Vec<SubtitleSource>) {
        if let Some(previous) = self.subtitle_task.take() {
            previous.abort();
        }
        let Ok(handle) = Handle::try_current() else {
            warn!("[Subtitles] No async runtime, skipping {} tracks", sources.len());
            return;
        };

        let fetcher = Arc::clone(&self.subtitle_fetcher);
        let tx = self.internal_tx.clone();
        self.subtitle_task = Some(handle.spawn(async move {
            let tracks = prepare_tracks(fetcher.as_ref(), &sources).await;
            // The controller may be gone by now
            let _ = tx.send(PlayerMessage::SubtitleTracksReady { generation, tracks });
        }));
    }

    fn abort_background_work(&mut self) {
        if !self.checkpoints.is_empty() {
            debug!("[Progress] Aborting {} checkpoint flushes", self.checkpoints.len());
        }
        self.checkpoints.abort_all();
        if let Some(task) = self.subtitle_task.take() {
            task.abort();
        }
        // Drop results that were already queued for the old session
        while self.internal_rx.try_recv().is_ok() {}
    }

    fn reap_checkpoints(&mut self) {
        while self.checkpoints.try_join_next().is_some() {}
    }
}

async fn fetch_resume(
    store: Arc<dyn ProgressStore>,
    content_id: &ContentId,
    timeout: Duration,
) -> Option<ProgressRecord> {
    match tokio::time::timeout(timeout, store.load_progress(content_id)).await {
        Ok(Ok(record)) => record,
        Ok(Err(err)) => {
            warn!("[Progress] Could not read progress for {}: {}", content_id, err);
            None
        }
        Err(_) => {
            warn!(
                "[Progress] Progress lookup for {} timed out after {:?}",
                content_id, timeout
            );
            None
        }
    }
}
