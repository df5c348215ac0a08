mod support;

use marquee_player::domains::player::track_selection::TrackMode;
use marquee_player::domains::player::Key;
use marquee_player::domains::subtitles::TrackSource;
use marquee_player::{MediaCommand, PlayerMessage};
use std::time::Duration;
use support::{Harness, StaticFetcher, episode, subtitle};

const EN_SRT: &str = "1\r\n00:00:01,000 --> 00:00:03,500\r\nWhere were we?\r\n\r\n2\r\n00:00:04,000 --> 00:00:06,000\r\nRight here.\r\n";

fn fetcher() -> StaticFetcher {
    StaticFetcher::default()
        .with("https://cdn.test/subs/en.srt", EN_SRT)
        .with("https://cdn.test/subs/broken.srt", "not a subtitle file")
}

fn showing(h: &Harness) -> Vec<usize> {
    h.controller
        .state()
        .subtitles
        .tracks()
        .iter()
        .enumerate()
        .filter(|(_, t)| t.mode == TrackMode::Showing)
        .map(|(i, _)| i)
        .collect()
}

#[tokio::test]
async fn prepared_tracks_attach_with_default_showing() {
    let mut h = Harness::with_fetcher(fetcher());
    let source = episode("ep-1").with_subtitles(vec![
        subtitle("https://cdn.test/subs/es.vtt", "Español", "es", false),
        subtitle("https://cdn.test/subs/en.srt", "English", "en", true),
    ]);

    h.start(source, 1500.0).await;
    h.controller.settle().await;

    let tracks = h.controller.state().subtitles.tracks();
    assert_eq!(tracks.len(), 2);
    assert!(matches!(tracks[0].source, TrackSource::Remote(_)));
    match &tracks[1].source {
        TrackSource::Inline(vtt) => {
            assert!(vtt.starts_with("WEBVTT\n\n"));
            assert!(vtt.contains("00:00:01.000 --> 00:00:03.500"));
        }
        other => panic!("expected converted track, got {other:?}"),
    }
    assert_eq!(showing(&h), vec![1]);
    assert!(h.media.commands().contains(&MediaCommand::ShowTextTrack(Some(1))));
}

#[tokio::test]
async fn broken_tracks_are_left_out() {
    let mut h = Harness::with_fetcher(fetcher());
    let source = episode("ep-1").with_subtitles(vec![
        subtitle("https://cdn.test/subs/broken.srt", "Broken", "en", true),
        subtitle("https://cdn.test/subs/missing.srt", "Missing", "fr", false),
        subtitle("https://cdn.test/subs/de.vtt", "Deutsch", "de", false),
    ]);

    h.start(source, 1500.0).await;
    h.controller.settle().await;

    let tracks = h.controller.state().subtitles.tracks();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].label, "Deutsch");
    assert_eq!(showing(&h), vec![0]);
}

#[tokio::test]
async fn selecting_a_track_leaves_exactly_one_showing() {
    let mut h = Harness::with_fetcher(fetcher());
    let source = episode("ep-1").with_subtitles(vec![
        subtitle("https://cdn.test/subs/en.srt", "English", "en", false),
        subtitle("https://cdn.test/subs/es.vtt", "Español", "es", false),
        subtitle("https://cdn.test/subs/ja.vtt", "日本語", "ja", false),
    ]);
    h.start(source, 1500.0).await;
    h.controller.settle().await;

    for index in [2, 0, 1, 1] {
        h.controller.select_subtitle_track(Some(index));
        assert_eq!(showing(&h), vec![index]);
        assert_eq!(
            h.media.commands().last(),
            Some(&MediaCommand::ShowTextTrack(Some(index)))
        );
    }

    // Out of range keeps the current selection
    h.controller.select_subtitle_track(Some(9));
    assert_eq!(showing(&h), vec![1]);

    h.controller.select_subtitle_track(None);
    assert!(showing(&h).is_empty());
}

#[tokio::test]
async fn cycling_announces_each_track_briefly() {
    let mut h = Harness::with_fetcher(fetcher());
    let source = episode("ep-1").with_subtitles(vec![
        subtitle("https://cdn.test/subs/en.srt", "English", "en", true),
        subtitle("https://cdn.test/subs/es.vtt", "Español", "es", false),
    ]);
    h.start(source, 1500.0).await;
    h.controller.settle().await;
    assert_eq!(showing(&h), vec![0]);

    h.controller.dispatch(PlayerMessage::KeyPressed(Key::Character('c')));
    assert_eq!(showing(&h), vec![1]);
    assert_eq!(
        h.controller.state().track_notification.as_deref(),
        Some("Subtitles: Español (Spanish)")
    );

    h.controller.dispatch(PlayerMessage::CycleSubtitleTrack);
    assert!(showing(&h).is_empty());
    assert_eq!(
        h.controller.state().track_notification.as_deref(),
        Some("Subtitles: Off")
    );

    h.advance(Duration::from_secs(2));
    assert!(h.controller.state().track_notification.is_none());
}

#[tokio::test]
async fn tracks_from_a_replaced_source_never_attach() {
    let mut h = Harness::with_fetcher(fetcher());
    let first = episode("ep-1").with_subtitles(vec![subtitle(
        "https://cdn.test/subs/en.srt",
        "English",
        "en",
        true,
    )]);

    h.controller.open(first).await;
    h.controller.open(episode("ep-2")).await;
    h.controller.settle().await;

    assert!(h.controller.state().subtitles.is_empty());
    assert!(
        !h.media
            .commands()
            .iter()
            .any(|c| matches!(c, MediaCommand::SetTextTracks(_)))
    );
}
