use crate::error::ModelError;
use url::Url;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Timed-text formats the pipeline knows how to hand to a media element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SubtitleFormat {
    /// SubRip, needs conversion before playback
    Srt,
    /// WebVTT, playable as-is
    WebVtt,
}

impl SubtitleFormat {
    /// Detect the format from the path suffix of a track URL.
    ///
    /// Unknown suffixes are assumed to already be WebVTT.
    pub fn from_url(url: &Url) -> Self {
        let path = url.path().to_ascii_lowercase();
        if path.ends_with(".srt") {
            SubtitleFormat::Srt
        } else {
            SubtitleFormat::WebVtt
        }
    }
}

/// Upstream description of one subtitle track
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SubtitleSource {
    pub url: Url,
    pub label: String,
    pub language_code: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_default: bool,
}

impl SubtitleSource {
    pub fn new(
        url: &str,
        label: impl Into<String>,
        language_code: impl Into<String>,
        is_default: bool,
    ) -> Result<Self, ModelError> {
        let url = Url::parse(url)?;
        let label = label.into();
        if label.trim().is_empty() {
            return Err(ModelError::InvalidSource(format!(
                "subtitle track {url} has no label"
            )));
        }
        Ok(Self {
            url,
            label,
            language_code: language_code.into(),
            is_default,
        })
    }

    pub fn format(&self) -> SubtitleFormat {
        SubtitleFormat::from_url(&self.url)
    }
}
