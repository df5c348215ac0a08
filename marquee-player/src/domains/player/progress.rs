//! Watch-progress rules: when a stored record seeds a new session and when
//! the current position is worth writing back.

use super::state::PlayerDomainState;
use crate::infra::config::PlaybackTuning;
use log::debug;
use marquee_model::{ProgressRecord, UpdateProgressRequest};

/// How a flush relates to the session lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushKind {
    /// Heartbeat or pause; aborted if the session is torn down first
    Checkpoint,
    /// Ended, unmount, page hide or source change; always allowed to finish
    Final,
}

/// Offset a new session should start from, if the record is worth resuming.
///
/// Positions at or below the minimum start over, and so do records within
/// the final stretch of their duration (the viewer already finished).
pub fn resume_position(
    record: &ProgressRecord,
    tuning: &PlaybackTuning,
) -> Option<f64> {
    let position = record.position_seconds;
    if !position.is_finite() || position <= tuning.min_resume_position {
        return None;
    }

    if record.duration_seconds > 0.0
        && position >= record.duration_seconds * tuning.finished_fraction
    {
        debug!(
            "[Progress] {} is {:.0}% watched, starting over",
            record.content_id,
            record.progress() * 100.0
        );
        return None;
    }

    Some(position)
}

/// Upsert payload for the current session, or `None` when the position does
/// not qualify for persistence
pub fn flush_request(state: &PlayerDomainState) -> Option<UpdateProgressRequest> {
    let session = state.session.as_ref()?;
    UpdateProgressRequest::checked_from(
        session.content_id.clone(),
        session.media_kind,
        state.position,
        state.duration,
        state.tuning.min_persisted_position,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_model::chrono::Utc;
    use marquee_model::{ContentId, MediaKind, PlaybackSource};

    fn record(position: f64, duration: f64) -> ProgressRecord {
        ProgressRecord {
            content_id: ContentId::new("ep-42").unwrap(),
            position_seconds: position,
            duration_seconds: duration,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn resumes_only_past_minimum() {
        let tuning = PlaybackTuning::default();
        assert_eq!(resume_position(&record(340.0, 1500.0), &tuning), Some(340.0));
        assert_eq!(resume_position(&record(10.0, 1500.0), &tuning), None);
        assert_eq!(resume_position(&record(10.5, 1500.0), &tuning), Some(10.5));
    }

    #[test]
    fn finished_records_start_over() {
        let tuning = PlaybackTuning::default();
        assert_eq!(resume_position(&record(1450.0, 1500.0), &tuning), None);
        assert_eq!(resume_position(&record(1400.0, 1500.0), &tuning), Some(1400.0));
    }

    #[test]
    fn flush_requires_session_and_threshold() {
        let mut state = PlayerDomainState::new(PlaybackTuning::default(), 1.0);
        state.position = 50.0;
        state.duration = 120.0;
        assert!(flush_request(&state).is_none());

        let source = PlaybackSource::new(
            ContentId::new("movie-1").unwrap(),
            MediaKind::Movie,
            "https://cdn.test/movie-1.mp4",
        )
        .unwrap();
        state.begin_session(&source, None);

        state.position = 9.9;
        state.duration = 120.0;
        assert!(flush_request(&state).is_none());

        state.position = 10.0;
        let request = flush_request(&state).unwrap();
        assert_eq!(request.position_seconds, 10.0);
        assert_eq!(request.duration_seconds, 120.0);
        assert_eq!(request.media_kind, MediaKind::Movie);

        state.duration = 0.0;
        assert!(flush_request(&state).is_none());
    }

    #[test]
    fn flush_honours_configured_minimum() {
        let tuning = PlaybackTuning {
            min_persisted_position: 30.0,
            ..PlaybackTuning::default()
        };
        let mut state = PlayerDomainState::new(tuning, 1.0);
        let source = PlaybackSource::new(
            ContentId::new("movie-1").unwrap(),
            MediaKind::Movie,
            "https://cdn.test/movie-1.mp4",
        )
        .unwrap();
        state.begin_session(&source, None);
        state.duration = 120.0;

        state.position = 25.0;
        assert!(flush_request(&state).is_none());
        state.position = 30.0;
        assert!(flush_request(&state).is_some());
    }
}
