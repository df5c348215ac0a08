use crate::domains::subtitles::{PreparedTrack, TrackSource};
use log::info;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackMode {
    Showing,
    Hidden,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextTrack {
    pub label: String,
    pub language_code: String,
    pub is_default: bool,
    pub mode: TrackMode,
    pub source: TrackSource,
}

impl From<PreparedTrack> for TextTrack {
    fn from(track: PreparedTrack) -> Self {
        Self {
            label: track.label,
            language_code: track.language_code,
            is_default: track.is_default,
            mode: TrackMode::Hidden,
            source: track.source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackOutOfRange {
    pub index: usize,
    pub len: usize,
}

impl fmt::Display for TrackOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "track {} requested but only {} available", self.index, self.len)
    }
}

impl std::error::Error for TrackOutOfRange {}

/// Text tracks attached to the media element.
///
/// Every selection rewrites all modes in one pass, so at most one track is
/// ever showing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubtitleTrackList {
    tracks: Vec<TextTrack>,
    selected: Option<usize>,
}

impl SubtitleTrackList {
    pub fn new(tracks: Vec<PreparedTrack>) -> Self {
        Self {
            tracks: tracks.into_iter().map(TextTrack::from).collect(),
            selected: None,
        }
    }

    pub fn tracks(&self) -> &[TextTrack] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_track(&self) -> Option<&TextTrack> {
        self.selected.and_then(|index| self.tracks.get(index))
    }

    /// First track flagged default, else the first track
    pub fn default_index(&self) -> Option<usize> {
        self.tracks
            .iter()
            .position(|track| track.is_default)
            .or(if self.tracks.is_empty() { None } else { Some(0) })
    }

    /// Show `index` and hide every other track; `None` hides all
    pub fn select(&mut self, index: Option<usize>) -> Result<(), TrackOutOfRange> {
        if let Some(index) = index
            && index >= self.tracks.len()
        {
            return Err(TrackOutOfRange {
                index,
                len: self.tracks.len(),
            });
        }

        for (i, track) in self.tracks.iter_mut().enumerate() {
            track.mode = if Some(i) == index {
                TrackMode::Showing
            } else {
                TrackMode::Hidden
            };
        }
        self.selected = index;
        info!("[Subtitles] Selected track {:?}", index);
        Ok(())
    }

    /// Next selection in the cycle off, first, ..., last, off
    pub fn next_in_cycle(&self) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }
        match self.selected {
            None => Some(0),
            Some(index) if index + 1 < self.tracks.len() => Some(index + 1),
            Some(_) => None,
        }
    }

    pub fn showing_count(&self) -> usize {
        self.tracks
            .iter()
            .filter(|track| track.mode == TrackMode::Showing)
            .count()
    }

    /// Notification text for the current selection
    pub fn describe_selection(&self) -> String {
        match self.selected_track() {
            Some(track) => format!("Subtitles: {}", format_text_track(track)),
            None => "Subtitles: Off".to_string(),
        }
    }
}

/// Format a text track for display
pub fn format_text_track(track: &TextTrack) -> String {
    let language = format_language_code(&track.language_code);
    if track.label.is_empty() || track.label.eq_ignore_ascii_case(&language) {
        language
    } else if language == track.language_code {
        track.label.clone()
    } else {
        format!("{} ({})", track.label, language)
    }
}

/// Convert language code to human-readable name
fn format_language_code(code: &str) -> String {
    match code.to_lowercase().as_str() {
        "en" | "eng" => "English",
        "es" | "spa" => "Spanish",
        "fr" | "fra" => "French",
        "de" | "deu" | "ger" => "German",
        "it" | "ita" => "Italian",
        "pt" | "por" => "Portuguese",
        "ru" | "rus" => "Russian",
        "ja" | "jpn" => "Japanese",
        "zh" | "chi" | "zho" => "Chinese",
        "ko" | "kor" => "Korean",
        "ar" | "ara" => "Arabic",
        "hi" | "hin" => "Hindi",
        "nl" | "nld" | "dut" => "Dutch",
        "sv" | "swe" => "Swedish",
        "pl" | "pol" => "Polish",
        "tr" | "tur" => "Turkish",
        _ => code,
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn track(label: &str, lang: &str, is_default: bool) -> PreparedTrack {
        PreparedTrack {
            label: label.to_string(),
            language_code: lang.to_string(),
            is_default,
            source: TrackSource::Remote(
                Url::parse(&format!("https://cdn.test/{lang}.vtt")).unwrap(),
            ),
        }
    }

    fn list() -> SubtitleTrackList {
        SubtitleTrackList::new(vec![
            track("English", "en", false),
            track("Español", "es", true),
            track("Commentary", "en", false),
        ])
    }

    #[test]
    fn selecting_any_index_leaves_exactly_one_showing() {
        let mut tracks = list();
        for index in 0..tracks.len() {
            tracks.select(Some(index)).unwrap();
            assert_eq!(tracks.showing_count(), 1);
            assert_eq!(tracks.tracks()[index].mode, TrackMode::Showing);
        }
    }

    #[test]
    fn selecting_none_hides_everything() {
        let mut tracks = list();
        tracks.select(Some(1)).unwrap();
        tracks.select(None).unwrap();
        assert_eq!(tracks.showing_count(), 0);
        assert_eq!(tracks.describe_selection(), "Subtitles: Off");
    }

    #[test]
    fn out_of_range_selection_keeps_previous_state() {
        let mut tracks = list();
        tracks.select(Some(0)).unwrap();
        let err = tracks.select(Some(7)).unwrap_err();
        assert_eq!(err, TrackOutOfRange { index: 7, len: 3 });
        assert_eq!(tracks.selected(), Some(0));
        assert_eq!(tracks.showing_count(), 1);
    }

    #[test]
    fn default_prefers_flagged_track() {
        assert_eq!(list().default_index(), Some(1));

        let unflagged = SubtitleTrackList::new(vec![
            track("English", "en", false),
            track("French", "fr", false),
        ]);
        assert_eq!(unflagged.default_index(), Some(0));
        assert_eq!(SubtitleTrackList::default().default_index(), None);
    }

    #[test]
    fn cycle_wraps_through_off() {
        let mut tracks = list();
        let mut seen = Vec::new();
        for _ in 0..5 {
            let next = tracks.next_in_cycle();
            tracks.select(next).unwrap();
            seen.push(next);
        }
        assert_eq!(seen, vec![Some(0), Some(1), Some(2), None, Some(0)]);
    }

    #[test]
    fn describes_tracks_by_language() {
        let mut tracks = list();
        tracks.select(Some(0)).unwrap();
        assert_eq!(tracks.describe_selection(), "Subtitles: English");
        tracks.select(Some(2)).unwrap();
        assert_eq!(
            tracks.describe_selection(),
            "Subtitles: Commentary (English)"
        );
    }
}
