//! Subtitle pipeline
//!
//! Turns upstream track descriptions into tracks a media element can play.
//! SubRip sources are fetched and converted to WebVTT; WebVTT sources are
//! handed over by URL. A track that cannot be fetched or converted is left
//! out, the rest of the list is still delivered.

mod srt;

pub use srt::{WEBVTT_HEADER, srt_to_vtt};

use crate::error::PlayerResult;
use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, warn};
use marquee_model::{SubtitleFormat, SubtitleSource};
use url::Url;

/// Retrieves the raw text of a subtitle source
#[async_trait]
pub trait SubtitleFetcher: Send + Sync {
    async fn fetch_text(&self, url: &Url) -> PlayerResult<String>;
}

/// Where the media element loads a prepared track from
#[derive(Debug, Clone, PartialEq)]
pub enum TrackSource {
    /// Playable as published
    Remote(Url),
    /// Converted WebVTT document held in memory
    Inline(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedTrack {
    pub label: String,
    pub language_code: String,
    pub is_default: bool,
    pub source: TrackSource,
}

impl PreparedTrack {
    /// A track that needs no conversion
    pub fn remote(source: &SubtitleSource) -> Self {
        Self {
            label: source.label.clone(),
            language_code: source.language_code.clone(),
            is_default: source.is_default,
            source: TrackSource::Remote(source.url.clone()),
        }
    }
}

/// Prepare one track, converting SubRip to WebVTT when needed
pub async fn prepare_track(
    fetcher: &dyn SubtitleFetcher,
    source: &SubtitleSource,
) -> PlayerResult<PreparedTrack> {
    match source.format() {
        SubtitleFormat::WebVtt => Ok(PreparedTrack::remote(source)),
        SubtitleFormat::Srt => {
            let text = fetcher.fetch_text(&source.url).await?;
            let vtt = srt_to_vtt(&text)?;
            Ok(PreparedTrack {
                label: source.label.clone(),
                language_code: source.language_code.clone(),
                is_default: source.is_default,
                source: TrackSource::Inline(vtt),
            })
        }
    }
}

/// Prepare every source concurrently, keeping upstream order and dropping
/// the ones that fail
pub async fn prepare_tracks(
    fetcher: &dyn SubtitleFetcher,
    sources: &[SubtitleSource],
) -> Vec<PreparedTrack> {
    let results =
        join_all(sources.iter().map(|source| prepare_track(fetcher, source))).await;

    let tracks: Vec<PreparedTrack> = results
        .into_iter()
        .zip(sources)
        .filter_map(|(result, source)| match result {
            Ok(track) => Some(track),
            Err(err) => {
                warn!(
                    "[Subtitles] Omitting track '{}' ({}): {}",
                    source.label, source.url, err
                );
                None
            }
        })
        .collect();

    debug!(
        "[Subtitles] Prepared {} of {} tracks",
        tracks.len(),
        sources.len()
    );
    tracks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlayerError;
    use std::collections::HashMap;

    struct StaticFetcher(HashMap<String, String>);

    #[async_trait]
    impl SubtitleFetcher for StaticFetcher {
        async fn fetch_text(&self, url: &Url) -> PlayerResult<String> {
            self.0.get(url.as_str()).cloned().ok_or_else(|| {
                PlayerError::SubtitleConversion(format!("404 for {url}"))
            })
        }
    }

    fn source(url: &str, label: &str, default: bool) -> SubtitleSource {
        SubtitleSource::new(url, label, "en", default).unwrap()
    }

    #[tokio::test]
    async fn converts_srt_and_keeps_vtt_remote() {
        let fetcher = StaticFetcher(HashMap::from([(
            "https://cdn.test/en.srt".to_string(),
            "1\n00:00:01,000 --> 00:00:02,000\nHi\n".to_string(),
        )]));
        let sources = vec![
            source("https://cdn.test/en.srt", "English", true),
            source("https://cdn.test/es.vtt", "Spanish", false),
        ];

        let tracks = prepare_tracks(&fetcher, &sources).await;

        assert_eq!(tracks.len(), 2);
        match &tracks[0].source {
            TrackSource::Inline(vtt) => {
                assert!(vtt.starts_with("WEBVTT"));
                assert!(vtt.contains("00:00:01.000 --> 00:00:02.000"));
            }
            other => panic!("expected inline track, got {other:?}"),
        }
        assert!(tracks[0].is_default);
        assert_eq!(
            tracks[1].source,
            TrackSource::Remote(Url::parse("https://cdn.test/es.vtt").unwrap())
        );
    }

    #[tokio::test]
    async fn failed_tracks_are_omitted_not_fatal() {
        let fetcher = StaticFetcher(HashMap::from([(
            "https://cdn.test/broken.srt".to_string(),
            "garbage".to_string(),
        )]));
        let sources = vec![
            source("https://cdn.test/missing.srt", "Missing", false),
            source("https://cdn.test/broken.srt", "Broken", false),
            source("https://cdn.test/fr.vtt", "French", false),
        ];

        let tracks = prepare_tracks(&fetcher, &sources).await;

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].label, "French");
    }
}
