pub mod player;
pub mod subtitles;
