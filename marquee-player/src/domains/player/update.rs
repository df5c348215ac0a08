use super::controls::shortcut_message;
use super::messages::{MediaEvent, PlayerMessage};
use super::progress::{FlushKind, flush_request, resume_position};
use super::state::{PLAYBACK_ERROR_MESSAGE, PlayerDomainState, PlayerMenu};
use super::track_selection::SubtitleTrackList;
use super::video::MediaCommand;
use crate::error::PlayerError;
use log::{debug, error, info, warn};
use marquee_model::{PlayState, PlaybackIntent, SubtitleSource, UpdateProgressRequest};
use std::time::Instant;

/// Side effect requested by the update function, executed by the controller
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEffect {
    Media(MediaCommand),
    PersistProgress {
        request: UpdateProgressRequest,
        kind: FlushKind,
    },
    LoadSubtitles {
        generation: u64,
        sources: Vec<SubtitleSource>,
    },
    /// Abort checkpoint flushes and subtitle work of the previous session
    CancelBackgroundWork,
}

#[derive(Debug, Default)]
pub struct PlayerUpdateResult {
    pub effects: Vec<PlayerEffect>,
}

impl PlayerUpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn push(&mut self, effect: PlayerEffect) {
        self.effects.push(effect);
    }

    pub fn media(&mut self, command: MediaCommand) {
        self.effects.push(PlayerEffect::Media(command));
    }

    pub fn extend(&mut self, other: PlayerUpdateResult) {
        self.effects.extend(other.effects);
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn media_commands(&self) -> impl Iterator<Item = &MediaCommand> {
        self.effects.iter().filter_map(|effect| match effect {
            PlayerEffect::Media(command) => Some(command),
            _ => None,
        })
    }

    pub fn flushes(&self) -> impl Iterator<Item = (&UpdateProgressRequest, FlushKind)> {
        self.effects.iter().filter_map(|effect| match effect {
            PlayerEffect::PersistProgress { request, kind } => Some((request, *kind)),
            _ => None,
        })
    }
}

/// Handle one player message. Every transition completes inside this call;
/// the returned effects are carried out afterwards by the caller.
pub fn update_player(
    state: &mut PlayerDomainState,
    message: PlayerMessage,
    now: Instant,
) -> PlayerUpdateResult {
    let mut result = PlayerUpdateResult::none();

    if message.is_user_activity() {
        state.show_controls(now);
    }

    match message {
        PlayerMessage::SourceAssigned { source, resume } => {
            if state.has_source() {
                info!("[Player] Source changed, closing previous session");
                flush_progress(state, FlushKind::Final, &mut result);
                result.media(MediaCommand::Unload);
            }
            result.push(PlayerEffect::CancelBackgroundWork);

            let resume_at = resume
                .as_ref()
                .and_then(|record| resume_position(record, &state.tuning));
            if let Some(position) = resume_at {
                info!(
                    "[Progress] Resuming {} at {:.1}s",
                    source.content_id, position
                );
            }

            state.begin_session(&source, resume_at);
            info!(
                "[Player] Loading {} ({}) from {}",
                source.content_id, source.media_kind, source.url
            );

            result.media(MediaCommand::Load(source.url.clone()));
            result.media(MediaCommand::SetVolume(state.volume));
            result.media(MediaCommand::SetMuted(state.muted));
            result.media(MediaCommand::SetPlaybackRate(state.playback_rate));
            if !source.subtitles.is_empty() {
                result.push(PlayerEffect::LoadSubtitles {
                    generation: state.generation,
                    sources: source.subtitles,
                });
            }
        }

        PlayerMessage::Unmount => {
            if state.has_source() {
                flush_progress(state, FlushKind::Final, &mut result);
                result.media(MediaCommand::Pause);
                result.media(MediaCommand::Unload);
            }
            result.push(PlayerEffect::CancelBackgroundWork);
            state.reset();
            debug!("[Player] Unmounted");
        }

        PlayerMessage::PageHidden => {
            flush_progress(state, FlushKind::Final, &mut result);
        }

        PlayerMessage::PlayPause => toggle_play(state, now, &mut result),

        PlayerMessage::Play => match state.play_state {
            PlayState::Paused | PlayState::Ended => toggle_play(state, now, &mut result),
            PlayState::Buffering if state.intent == PlaybackIntent::Pause => {
                toggle_play(state, now, &mut result)
            }
            _ => {}
        },

        PlayerMessage::Pause => match state.play_state {
            PlayState::Playing => toggle_play(state, now, &mut result),
            PlayState::Buffering if state.intent == PlaybackIntent::Play => {
                toggle_play(state, now, &mut result)
            }
            _ => {}
        },

        PlayerMessage::Seek(position) => {
            seek(state, position, &mut result);
        }

        PlayerMessage::SeekRelative(delta) => {
            if state.has_source() && delta.is_finite() {
                let target = state.position + delta;
                if seek(state, target, &mut result) {
                    state.show_seek_indicator(delta, now);
                }
            }
        }

        PlayerMessage::SeekToFraction(fraction) => {
            if state.duration > 0.0 && fraction.is_finite() {
                let target = state.duration * fraction.clamp(0.0, 1.0);
                seek(state, target, &mut result);
            }
        }

        PlayerMessage::SetVolume(volume) => {
            set_volume(state, volume, &mut result);
            state.show_volume_indicator(now);
        }

        PlayerMessage::AdjustVolume(delta) => {
            let target = state.volume + delta;
            set_volume(state, target, &mut result);
            state.show_volume_indicator(now);
        }

        PlayerMessage::ToggleMute => {
            if state.muted {
                if state.volume <= 0.0 {
                    state.volume = state.tuning.unmute_restore_volume;
                    result.media(MediaCommand::SetVolume(state.volume));
                }
                state.muted = false;
            } else {
                state.muted = true;
            }
            result.media(MediaCommand::SetMuted(state.muted));
            state.show_volume_indicator(now);
        }

        PlayerMessage::ToggleFullscreen => {
            // The flag follows the platform notification, not the request
            if state.is_fullscreen {
                result.media(MediaCommand::ExitFullscreen);
            } else {
                result.media(MediaCommand::RequestFullscreen);
            }
        }

        PlayerMessage::TogglePictureInPicture => {
            if state.is_picture_in_picture {
                result.media(MediaCommand::ExitPictureInPicture);
            } else {
                result.media(MediaCommand::RequestPictureInPicture);
            }
        }

        PlayerMessage::SetPlaybackSpeed(rate) => {
            if rate.is_finite() {
                state.playback_rate = rate
                    .clamp(state.tuning.min_playback_speed, state.tuning.max_playback_speed);
                result.media(MediaCommand::SetPlaybackRate(state.playback_rate));
                if state.open_menu == Some(PlayerMenu::Speed) {
                    state.close_menus(now);
                }
            }
        }

        PlayerMessage::ToggleSpeedMenu => state.toggle_menu(PlayerMenu::Speed, now),
        PlayerMessage::ToggleSettings => state.toggle_menu(PlayerMenu::Settings, now),
        PlayerMessage::ToggleSubtitleMenu => {
            state.toggle_menu(PlayerMenu::Subtitles, now)
        }
        PlayerMessage::CloseMenus => state.close_menus(now),

        PlayerMessage::SubtitleTracksReady { generation, tracks } => {
            if generation != state.generation || !state.has_source() {
                debug!(
                    "[Subtitles] Dropping {} tracks from stale session {}",
                    tracks.len(),
                    generation
                );
                return result;
            }

            state.subtitles = SubtitleTrackList::new(tracks.clone());
            result.media(MediaCommand::SetTextTracks(tracks));
            if let Some(index) = state.subtitles.default_index()
                && state.subtitles.select(Some(index)).is_ok()
            {
                result.media(MediaCommand::ShowTextTrack(Some(index)));
            }
        }

        PlayerMessage::SubtitleTrackSelected(index) => {
            select_subtitle(state, index, now, &mut result);
            if state.open_menu == Some(PlayerMenu::Subtitles) {
                state.close_menus(now);
            }
        }

        PlayerMessage::CycleSubtitleTrack => {
            if !state.subtitles.is_empty() {
                let next = state.subtitles.next_in_cycle();
                select_subtitle(state, next, now, &mut result);
            }
        }

        PlayerMessage::PointerActivity => {}

        PlayerMessage::KeyPressed(key) => {
            if let Some(action) = shortcut_message(key, state) {
                result.extend(update_player(state, action, now));
            }
        }

        PlayerMessage::VideoClicked => {
            if state.open_menu.is_some() {
                state.close_menus(now);
            } else {
                toggle_play(state, now, &mut result);
            }
        }

        PlayerMessage::VideoDoubleClicked => {
            result.extend(update_player(state, PlayerMessage::ToggleFullscreen, now));
        }

        PlayerMessage::Gesture(gesture) => state.zoom.handle(gesture),

        PlayerMessage::RestoreZoom => state.zoom.reset(),

        PlayerMessage::ViewportResized { width, height } => {
            state.zoom.set_viewport(width, height)
        }

        PlayerMessage::Media(event) => handle_media_event(state, event, now, &mut result),

        PlayerMessage::Tick => handle_tick(state, now, &mut result),
    }

    result
}

fn toggle_play(state: &mut PlayerDomainState, now: Instant, result: &mut PlayerUpdateResult) {
    if state.play_state.ignores_toggle() {
        debug!("[Player] Toggle ignored while {}", state.play_state);
        return;
    }
    match state.play_state {
        PlayState::Idle | PlayState::Loading | PlayState::Errored => {}
        PlayState::Playing => pause(state, result),
        PlayState::Paused => play(state, now, result),
        PlayState::Ended => {
            // Replay from the top unless the viewer seeked back after the end
            if state.duration <= 0.0 || state.position >= state.duration {
                seek(state, 0.0, result);
            }
            play(state, now, result);
        }
        PlayState::Buffering => {
            state.intent = state.intent.flipped();
            debug!("[Player] Intent while buffering is now {:?}", state.intent);
            match state.intent {
                PlaybackIntent::Play => {
                    result.media(MediaCommand::Play);
                    state
                        .timers
                        .progress_heartbeat
                        .schedule(now, state.tuning.progress_interval);
                }
                PlaybackIntent::Pause => {
                    result.media(MediaCommand::Pause);
                    state.timers.progress_heartbeat.cancel();
                    flush_progress(state, FlushKind::Checkpoint, result);
                }
            }
        }
    }
    state.show_controls(now);
}

fn play(state: &mut PlayerDomainState, now: Instant, result: &mut PlayerUpdateResult) {
    state.play_state = PlayState::Playing;
    state.intent = PlaybackIntent::Play;
    result.media(MediaCommand::Play);
    state
        .timers
        .progress_heartbeat
        .schedule(now, state.tuning.progress_interval);
    state.show_controls(now);
}

fn pause(state: &mut PlayerDomainState, result: &mut PlayerUpdateResult) {
    state.play_state = PlayState::Paused;
    state.intent = PlaybackIntent::Pause;
    result.media(MediaCommand::Pause);
    state.timers.progress_heartbeat.cancel();
    flush_progress(state, FlushKind::Checkpoint, result);
    state.controls_visible = true;
    state.timers.controls_hide.cancel();
}

/// Returns whether a seek was issued
fn seek(state: &mut PlayerDomainState, position: f64, result: &mut PlayerUpdateResult) -> bool {
    if !state.has_source() || state.play_state.is_terminal() {
        return false;
    }
    let target = state.clamp_position(position);
    state.position = target;
    state.seeking = true;
    // A manual seek supersedes a resume seek that hasn't been applied yet
    state.pending_resume = None;
    result.media(MediaCommand::Seek(target));
    true
}

fn set_volume(state: &mut PlayerDomainState, volume: f64, result: &mut PlayerUpdateResult) {
    if !volume.is_finite() {
        warn!("[Player] Ignoring non-finite volume {}", volume);
        return;
    }
    state.volume = volume.clamp(0.0, 1.0);
    state.muted = state.volume == 0.0;
    result.media(MediaCommand::SetVolume(state.volume));
    result.media(MediaCommand::SetMuted(state.muted));
}

fn select_subtitle(
    state: &mut PlayerDomainState,
    index: Option<usize>,
    now: Instant,
    result: &mut PlayerUpdateResult,
) {
    match state.subtitles.select(index) {
        Ok(()) => {
            result.media(MediaCommand::ShowTextTrack(index));
            let message = state.subtitles.describe_selection();
            state.show_track_notification(message, now);
        }
        Err(err) => warn!("[Subtitles] {}", err),
    }
}

fn flush_progress(state: &PlayerDomainState, kind: FlushKind, result: &mut PlayerUpdateResult) {
    match flush_request(state) {
        Some(request) => {
            debug!(
                "[Progress] {:?} flush for {} at {:.1}/{:.1}",
                kind, request.content_id, request.position_seconds, request.duration_seconds
            );
            result.push(PlayerEffect::PersistProgress { request, kind });
        }
        None => debug!(
            "[Progress] Skipping {:?} flush at {:.1}/{:.1}",
            kind, state.position, state.duration
        ),
    }
}

fn handle_media_event(
    state: &mut PlayerDomainState,
    event: MediaEvent,
    now: Instant,
    result: &mut PlayerUpdateResult,
) {
    if !state.has_source() {
        debug!("[Player] Media event without a source: {:?}", event);
        return;
    }

    // Presentation reflections are tracked even after a failure
    match &event {
        MediaEvent::FullscreenChanged(active) => {
            state.is_fullscreen = *active;
            return;
        }
        MediaEvent::PictureInPictureChanged(active) => {
            state.is_picture_in_picture = *active;
            return;
        }
        MediaEvent::FullscreenDenied(reason) => {
            debug!("[Player] {}", PlayerError::FullscreenDenied(reason.clone()));
            return;
        }
        _ if state.play_state.is_terminal() => {
            debug!("[Player] Ignoring {:?} after failure", event);
            return;
        }
        _ => {}
    }

    match event {
        MediaEvent::LoadedMetadata { duration } => {
            state.set_duration(duration);
            if let Some(resume) = state.pending_resume.take() {
                let target = state.clamp_position(resume);
                state.position = target;
                state.seeking = true;
                result.media(MediaCommand::Seek(target));
            }
        }

        MediaEvent::DurationChanged(duration) => state.set_duration(duration),

        MediaEvent::CanPlay => match state.play_state {
            PlayState::Loading => {
                let autoplay = state.session.as_ref().is_some_and(|s| s.autoplay);
                if autoplay {
                    play(state, now, result);
                } else {
                    state.play_state = PlayState::Paused;
                    state.intent = PlaybackIntent::Pause;
                    state.show_controls(now);
                }
            }
            PlayState::Buffering => resume_from_buffering(state, now, result),
            _ => {}
        },

        MediaEvent::TimeUpdate(position) => {
            if !state.seeking {
                state.position = state.clamp_position(position);
            }
        }

        MediaEvent::Progress { buffered_end } => {
            if state.duration > 0.0 && buffered_end.is_finite() {
                state.buffered_fraction = (buffered_end / state.duration).clamp(0.0, 1.0);
            }
        }

        MediaEvent::Waiting => {
            if matches!(state.play_state, PlayState::Playing | PlayState::Paused) {
                debug!("[Player] Buffering (intent {:?})", state.intent);
                state.play_state = PlayState::Buffering;
            }
        }

        MediaEvent::Playing => match state.play_state {
            PlayState::Buffering => resume_from_buffering(state, now, result),
            PlayState::Loading | PlayState::Paused | PlayState::Ended => {
                // Started outside the controller (autoplay policy, media keys)
                state.play_state = PlayState::Playing;
                state.intent = PlaybackIntent::Play;
                state
                    .timers
                    .progress_heartbeat
                    .schedule(now, state.tuning.progress_interval);
                state.show_controls(now);
            }
            _ => {}
        },

        MediaEvent::Paused => {
            if state.play_state == PlayState::Playing {
                state.play_state = PlayState::Paused;
                state.intent = PlaybackIntent::Pause;
                state.timers.progress_heartbeat.cancel();
                flush_progress(state, FlushKind::Checkpoint, result);
                state.show_controls(now);
            }
        }

        MediaEvent::SeekCompleted => state.seeking = false,

        MediaEvent::Ended => {
            info!("[Player] Playback ended");
            if state.duration > 0.0 {
                state.position = state.duration;
            }
            state.play_state = PlayState::Ended;
            state.intent = PlaybackIntent::Pause;
            state.seeking = false;
            state.timers.progress_heartbeat.cancel();
            flush_progress(state, FlushKind::Final, result);
            state.show_controls(now);
        }

        MediaEvent::Error(message) => {
            error!("[Player] {}", PlayerError::SourceLoad(message));
            state.play_state = PlayState::Errored;
            state.error_message = Some(PLAYBACK_ERROR_MESSAGE.to_string());
            state.pending_resume = None;
            state.seeking = false;
            state.timers.progress_heartbeat.cancel();
            state.show_controls(now);
        }

        MediaEvent::FullscreenChanged(_)
        | MediaEvent::PictureInPictureChanged(_)
        | MediaEvent::FullscreenDenied(_) => {}
    }
}

fn resume_from_buffering(
    state: &mut PlayerDomainState,
    now: Instant,
    result: &mut PlayerUpdateResult,
) {
    state.play_state = state.intent.as_state();
    debug!("[Player] Buffering recovered, back to {}", state.play_state);
    match state.intent {
        PlaybackIntent::Play => {
            if !state.timers.progress_heartbeat.is_armed() {
                state
                    .timers
                    .progress_heartbeat
                    .schedule(now, state.tuning.progress_interval);
            }
        }
        PlaybackIntent::Pause => result.media(MediaCommand::Pause),
    }
    state.refresh_controls_timer(now);
}

fn handle_tick(state: &mut PlayerDomainState, now: Instant, result: &mut PlayerUpdateResult) {
    state.update_controls(now);
    state.expire_indicators(now);

    if state.timers.progress_heartbeat.fire(now) {
        match (state.play_state, state.intent) {
            (PlayState::Playing, _) => {
                flush_progress(state, FlushKind::Checkpoint, result);
                state
                    .timers
                    .progress_heartbeat
                    .schedule(now, state.tuning.progress_interval);
            }
            (PlayState::Buffering, PlaybackIntent::Play) => {
                state
                    .timers
                    .progress_heartbeat
                    .schedule(now, state.tuning.progress_interval);
            }
            _ => {}
        }
    }
}
