#![allow(dead_code)]

use async_trait::async_trait;
use marquee_model::chrono::Utc;
use marquee_model::{
    ContentId, MediaKind, PlaybackSource, ProgressRecord, SubtitleSource,
};
use marquee_player::domains::subtitles::SubtitleFetcher;
use marquee_player::infra::services::{InMemoryProgressStore, ProgressStore};
use marquee_player::infra::testing::{
    ManualTimeProvider, MediaRecording, RecordingMediaElement,
};
use marquee_player::infra::logging::init_test_logger;
use marquee_player::infra::time::TimeProvider;
use marquee_player::{
    MediaEvent, PlaybackController, PlayerConfig, PlayerError, PlayerResult,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Subtitle fetcher serving canned documents by URL
#[derive(Debug, Default)]
pub struct StaticFetcher(pub HashMap<String, String>);

impl StaticFetcher {
    pub fn with(mut self, url: &str, body: &str) -> Self {
        self.0.insert(url.to_string(), body.to_string());
        self
    }
}

#[async_trait]
impl SubtitleFetcher for StaticFetcher {
    async fn fetch_text(&self, url: &Url) -> PlayerResult<String> {
        self.0.get(url.as_str()).cloned().ok_or_else(|| {
            PlayerError::SubtitleConversion(format!("404 for {url}"))
        })
    }
}

pub struct Harness {
    pub controller: PlaybackController,
    pub media: MediaRecording,
    pub clock: ManualTimeProvider,
    pub memory: Option<Arc<InMemoryProgressStore>>,
}

impl Harness {
    pub fn new() -> Self {
        let clock = ManualTimeProvider::new();
        let memory = Arc::new(InMemoryProgressStore::with_clock(Arc::new(
            clock.clone(),
        )));
        let mut harness = Self::build(
            PlayerConfig::default(),
            memory.clone(),
            Arc::new(StaticFetcher::default()),
            clock,
        );
        harness.memory = Some(memory);
        harness
    }

    pub fn with_store(store: Arc<dyn ProgressStore>) -> Self {
        Self::build(
            PlayerConfig::default(),
            store,
            Arc::new(StaticFetcher::default()),
            ManualTimeProvider::new(),
        )
    }

    pub fn with_fetcher(fetcher: StaticFetcher) -> Self {
        Self::build(
            PlayerConfig::default(),
            Arc::new(InMemoryProgressStore::new()),
            Arc::new(fetcher),
            ManualTimeProvider::new(),
        )
    }

    pub fn with_config(config: PlayerConfig) -> Self {
        Self::build(
            config,
            Arc::new(InMemoryProgressStore::new()),
            Arc::new(StaticFetcher::default()),
            ManualTimeProvider::new(),
        )
    }

    fn build(
        config: PlayerConfig,
        store: Arc<dyn ProgressStore>,
        fetcher: Arc<dyn SubtitleFetcher>,
        clock: ManualTimeProvider,
    ) -> Self {
        init_test_logger();
        let (element, media) = RecordingMediaElement::new();
        let time: Arc<dyn TimeProvider> = Arc::new(clock.clone());
        let controller = PlaybackController::new(
            &config,
            Box::new(element),
            store,
            fetcher,
            time,
        );
        Self {
            controller,
            media,
            clock,
            memory: None,
        }
    }

    pub fn memory(&self) -> &InMemoryProgressStore {
        self.memory
            .as_deref()
            .expect("harness built with the in-memory store")
    }

    /// Move the clock forward and let due timers fire
    pub fn advance(&mut self, duration: Duration) {
        self.clock.advance(duration);
        self.controller.tick();
    }

    /// Advance in one-second steps, as a host ticking once a second would
    pub fn run_for(&mut self, duration: Duration) {
        let steps = duration.as_secs();
        for _ in 0..steps {
            self.advance(Duration::from_secs(1));
        }
    }

    pub fn media_event(&mut self, event: MediaEvent) {
        self.controller.handle_media_event(event);
    }

    /// Open `source`, report metadata and readiness
    pub async fn start(&mut self, source: PlaybackSource, duration: f64) {
        self.controller.open(source).await;
        self.media_event(MediaEvent::LoadedMetadata { duration });
        self.media_event(MediaEvent::CanPlay);
    }

    /// Report playback up to `position`
    pub fn play_to(&mut self, position: f64) {
        self.media_event(MediaEvent::TimeUpdate(position));
    }
}

pub fn episode(id: &str) -> PlaybackSource {
    PlaybackSource::new(
        ContentId::new(id).unwrap(),
        MediaKind::Episode,
        &format!("https://cdn.test/{id}/index.m3u8"),
    )
    .unwrap()
}

pub fn movie(id: &str) -> PlaybackSource {
    PlaybackSource::new(
        ContentId::new(id).unwrap(),
        MediaKind::Movie,
        &format!("https://cdn.test/{id}.mp4"),
    )
    .unwrap()
}

pub fn subtitle(url: &str, label: &str, lang: &str, is_default: bool) -> SubtitleSource {
    SubtitleSource::new(url, label, lang, is_default).unwrap()
}

pub fn record(id: &str, position: f64, duration: f64) -> ProgressRecord {
    ProgressRecord {
        content_id: ContentId::new(id).unwrap(),
        position_seconds: position,
        duration_seconds: duration,
        updated_at: Utc::now(),
    }
}
