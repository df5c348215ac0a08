use crate::{ContentId, MediaKind};
use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Positions below this are treated as accidental or abandoned plays and
/// are never persisted.
pub const MIN_PERSISTED_POSITION_SECS: f64 = 10.0;

/// Last known playback position of a viewer for one content id
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ProgressRecord {
    pub content_id: ContentId,
    pub position_seconds: f64,
    pub duration_seconds: f64,
    pub updated_at: DateTime<Utc>,
}

impl ProgressRecord {
    /// Whether a record with these numbers may be written at all
    pub fn is_persistable(position_seconds: f64, duration_seconds: f64) -> bool {
        Self::is_persistable_from(
            position_seconds,
            duration_seconds,
            MIN_PERSISTED_POSITION_SECS,
        )
    }

    /// Same rule with a caller-chosen minimum position
    pub fn is_persistable_from(
        position_seconds: f64,
        duration_seconds: f64,
        min_position_seconds: f64,
    ) -> bool {
        position_seconds.is_finite()
            && duration_seconds.is_finite()
            && position_seconds >= min_position_seconds
            && duration_seconds > 0.0
    }

    /// Fraction watched in `[0.0, 1.0]`
    pub fn progress(&self) -> f64 {
        if self.duration_seconds <= 0.0 {
            return 0.0;
        }
        (self.position_seconds / self.duration_seconds).clamp(0.0, 1.0)
    }

    pub fn from_request(
        request: &UpdateProgressRequest,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            content_id: request.content_id.clone(),
            position_seconds: request.position_seconds,
            duration_seconds: request.duration_seconds,
            updated_at,
        }
    }
}

/// Upsert payload sent to the progress store.
///
/// The viewer is implied by the authenticated session, so the store keys
/// the write by `(user, content_id)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct UpdateProgressRequest {
    pub content_id: ContentId,
    pub media_kind: MediaKind,
    pub position_seconds: f64,
    pub duration_seconds: f64,
}

impl UpdateProgressRequest {
    /// Builds a request only when the numbers satisfy the persistence rule
    pub fn checked(
        content_id: ContentId,
        media_kind: MediaKind,
        position_seconds: f64,
        duration_seconds: f64,
    ) -> Option<Self> {
        Self::checked_from(
            content_id,
            media_kind,
            position_seconds,
            duration_seconds,
            MIN_PERSISTED_POSITION_SECS,
        )
    }

    pub fn checked_from(
        content_id: ContentId,
        media_kind: MediaKind,
        position_seconds: f64,
        duration_seconds: f64,
        min_position_seconds: f64,
    ) -> Option<Self> {
        ProgressRecord::is_persistable_from(
            position_seconds,
            duration_seconds,
            min_position_seconds,
        )
        .then(|| Self {
            content_id,
            media_kind,
            position_seconds,
            duration_seconds,
        })
    }
}
