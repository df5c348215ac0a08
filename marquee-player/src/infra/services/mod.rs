//! Service traits and their implementations

pub mod progress;
pub mod subtitles;

pub use progress::{ApiProgressStore, InMemoryProgressStore, ProgressStore};
pub use subtitles::HttpSubtitleFetcher;
