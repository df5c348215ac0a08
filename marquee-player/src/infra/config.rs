use crate::error::{PlayerError, PlayerResult};
use crate::infra::constants::player::{playback_speed, resume, seeking, timing, volume, zoom};
use marquee_model::MIN_PERSISTED_POSITION_SECS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "marquee-player";
const CONFIG_FILE: &str = "config.json";
const SERVER_URL_ENV: &str = "MARQUEE_SERVER_URL";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub server_url: String,
    pub autoplay: bool,
    pub volume: f64,
    pub unmute_restore_volume: f64,
    pub controls_hide_delay_ms: u64,
    pub progress_interval_secs: u64,
    pub resume_fetch_timeout_ms: u64,
    /// Positions below this are never written back; can only be raised
    /// above the store's own minimum
    pub min_persisted_position_secs: f64,
    pub skip_seconds: f64,
    pub indicator_ms: u64,
    pub track_notification_ms: u64,
    pub zoom_max_scale: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:3000".to_string(),
            autoplay: true,
            volume: 1.0,
            unmute_restore_volume: volume::UNMUTE_RESTORE,
            controls_hide_delay_ms: timing::CONTROLS_HIDE_DELAY.as_millis()
                as u64,
            progress_interval_secs: timing::PROGRESS_INTERVAL.as_secs(),
            resume_fetch_timeout_ms: timing::RESUME_FETCH_TIMEOUT.as_millis()
                as u64,
            min_persisted_position_secs: MIN_PERSISTED_POSITION_SECS,
            skip_seconds: seeking::SKIP_FORWARD,
            indicator_ms: timing::INDICATOR_DURATION.as_millis() as u64,
            track_notification_ms: timing::TRACK_NOTIFICATION_DURATION
                .as_millis() as u64,
            zoom_max_scale: zoom::MAX_SCALE,
        }
    }
}

impl PlayerConfig {
    pub fn load() -> Self {
        // First check for environment variable
        let mut config = if let Ok(server_url) = std::env::var(SERVER_URL_ENV) {
            Self {
                server_url,
                ..Self::default()
            }
        } else {
            Self::default()
        };

        // Then load from config file (which can override env var)
        if let Some(config_path) = Self::default_path()
            && config_path.exists()
        {
            match Self::load_from(&config_path) {
                Ok(loaded) => config = loaded,
                Err(err) => log::warn!(
                    "[Config] Ignoring unreadable config at {}: {}",
                    config_path.display(),
                    err
                ),
            }
        }

        // Allow env var to override config file for server URL
        if let Ok(server_url) = std::env::var(SERVER_URL_ENV) {
            config.server_url = server_url;
        }

        config.sanitized()
    }

    pub fn load_from(path: &Path) -> PlayerResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PlayerError::Config(format!("read {}: {e}", path.display()))
        })?;
        let config: PlayerConfig = serde_json::from_str(&content)
            .map_err(|e| PlayerError::Config(format!("parse {}: {e}", path.display())))?;
        Ok(config.sanitized())
    }

    pub fn save(&self) -> PlayerResult<()> {
        match Self::default_path() {
            Some(path) => self.save_to(&path),
            None => Err(PlayerError::Config(
                "no config directory on this platform".to_string(),
            )),
        }
    }

    pub fn save_to(&self, path: &Path) -> PlayerResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| PlayerError::Config(e.to_string()))?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| PlayerError::Config(e.to_string()))?;
        std::fs::write(path, content)
            .map_err(|e| PlayerError::Config(e.to_string()))
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Pull hand-edited values back into their valid ranges
    fn sanitized(mut self) -> Self {
        self.volume = clamp_unit(self.volume, 1.0);
        self.unmute_restore_volume =
            clamp_unit(self.unmute_restore_volume, volume::UNMUTE_RESTORE);
        if self.unmute_restore_volume == 0.0 {
            self.unmute_restore_volume = volume::UNMUTE_RESTORE;
        }
        if !self.skip_seconds.is_finite() || self.skip_seconds <= 0.0 {
            self.skip_seconds = seeking::SKIP_FORWARD;
        }
        if !self.zoom_max_scale.is_finite() || self.zoom_max_scale < zoom::MIN_SCALE {
            self.zoom_max_scale = zoom::MAX_SCALE;
        }
        if !self.min_persisted_position_secs.is_finite()
            || self.min_persisted_position_secs < MIN_PERSISTED_POSITION_SECS
        {
            self.min_persisted_position_secs = MIN_PERSISTED_POSITION_SECS;
        }
        self.progress_interval_secs = self.progress_interval_secs.max(1);
        self
    }

    pub fn tuning(&self) -> PlaybackTuning {
        PlaybackTuning {
            autoplay: self.autoplay,
            unmute_restore_volume: self.unmute_restore_volume,
            controls_hide_delay: Duration::from_millis(self.controls_hide_delay_ms),
            progress_interval: Duration::from_secs(self.progress_interval_secs),
            skip_seconds: self.skip_seconds,
            indicator_duration: Duration::from_millis(self.indicator_ms),
            track_notification_duration: Duration::from_millis(
                self.track_notification_ms,
            ),
            zoom_max_scale: self.zoom_max_scale,
            min_resume_position: resume::MIN_RESUME_POSITION_SECS,
            min_persisted_position: self.min_persisted_position_secs,
            finished_fraction: resume::FINISHED_FRACTION,
            min_playback_speed: playback_speed::MIN,
            max_playback_speed: playback_speed::MAX,
        }
    }
}

fn clamp_unit(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

/// Runtime knobs the controller reads on every event
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackTuning {
    pub autoplay: bool,
    pub unmute_restore_volume: f64,
    pub controls_hide_delay: Duration,
    pub progress_interval: Duration,
    pub skip_seconds: f64,
    pub indicator_duration: Duration,
    pub track_notification_duration: Duration,
    pub zoom_max_scale: f64,
    pub min_resume_position: f64,
    pub min_persisted_position: f64,
    pub finished_fraction: f64,
    pub min_playback_speed: f64,
    pub max_playback_speed: f64,
}

impl Default for PlaybackTuning {
    fn default() -> Self {
        PlayerConfig::default().tuning()
    }
}
