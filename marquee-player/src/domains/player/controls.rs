use super::messages::{Key, NamedKey, PlayerMessage};
use super::state::{PlayerDomainState, PlayerMenu};
use crate::infra::constants::player::volume;
use std::time::Instant;

impl PlayerDomainState {
    /// Reveal the controls and rebase the auto-hide deadline.
    ///
    /// The deadline is only armed while playing with no sub-menu open;
    /// otherwise the controls stay up until the next activity.
    pub fn show_controls(&mut self, now: Instant) {
        self.controls_visible = true;
        self.refresh_controls_timer(now);
    }

    pub fn refresh_controls_timer(&mut self, now: Instant) {
        if self.is_playing() && self.open_menu.is_none() {
            self.timers
                .controls_hide
                .schedule(now, self.tuning.controls_hide_delay);
        } else {
            self.timers.controls_hide.cancel();
        }
    }

    /// Hide the controls if their deadline passed and nothing pins them
    pub fn update_controls(&mut self, now: Instant) {
        if self.timers.controls_hide.fire(now)
            && self.is_playing()
            && self.open_menu.is_none()
        {
            self.controls_visible = false;
        }
    }

    pub fn toggle_menu(&mut self, menu: PlayerMenu, now: Instant) {
        self.open_menu = if self.open_menu == Some(menu) {
            None
        } else {
            Some(menu)
        };
        self.show_controls(now);
    }

    pub fn close_menus(&mut self, now: Instant) {
        self.open_menu = None;
        self.show_controls(now);
    }
}

/// Map a key press to the player action it triggers
pub fn shortcut_message(key: Key, state: &PlayerDomainState) -> Option<PlayerMessage> {
    let skip = state.tuning.skip_seconds;
    match key {
        Key::Named(NamedKey::Space) => Some(PlayerMessage::PlayPause),
        Key::Named(NamedKey::ArrowLeft) => Some(PlayerMessage::SeekRelative(-skip)),
        Key::Named(NamedKey::ArrowRight) => Some(PlayerMessage::SeekRelative(skip)),
        Key::Named(NamedKey::ArrowUp) => Some(PlayerMessage::AdjustVolume(volume::STEP)),
        Key::Named(NamedKey::ArrowDown) => {
            Some(PlayerMessage::AdjustVolume(-volume::STEP))
        }
        Key::Named(NamedKey::Home) => Some(PlayerMessage::Seek(0.0)),
        Key::Named(NamedKey::End) => Some(PlayerMessage::Seek(state.duration)),
        Key::Named(NamedKey::Escape) => {
            if state.open_menu.is_some() {
                Some(PlayerMessage::CloseMenus)
            } else if state.is_fullscreen {
                Some(PlayerMessage::ToggleFullscreen)
            } else {
                None
            }
        }
        Key::Character(c) => match c.to_ascii_lowercase() {
            'k' => Some(PlayerMessage::PlayPause),
            'j' => Some(PlayerMessage::SeekRelative(-skip)),
            'l' => Some(PlayerMessage::SeekRelative(skip)),
            'm' => Some(PlayerMessage::ToggleMute),
            'f' => Some(PlayerMessage::ToggleFullscreen),
            'c' => Some(PlayerMessage::CycleSubtitleTrack),
            ' ' => Some(PlayerMessage::PlayPause),
            digit @ '0'..='9' => {
                let tenths = f64::from(digit.to_digit(10).unwrap_or(0));
                Some(PlayerMessage::SeekToFraction(tenths / 10.0))
            }
            _ => None,
        },
    }
}
