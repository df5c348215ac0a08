//! Progress store service
//!
//! The controller receives an `Arc<dyn ProgressStore>` at construction
//! instead of reaching for a shared global, so tests swap in the in-memory
//! store or a mock.

use crate::error::{PlayerError, PlayerResult};
use crate::infra::api_client::ApiClient;
use crate::infra::constants::routes::v1;
use crate::infra::time::{SystemTimeProvider, TimeProvider};
use async_trait::async_trait;
use dashmap::DashMap;
use marquee_model::{ContentId, ProgressRecord, UpdateProgressRequest};
use std::sync::Arc;

/// Key-value persistence of watch positions, keyed by content id
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Read the stored record for `content_id`, if any
    async fn load_progress(
        &self,
        content_id: &ContentId,
    ) -> PlayerResult<Option<ProgressRecord>>;

    /// Idempotent upsert; the last write wins
    async fn save_progress(&self, request: UpdateProgressRequest) -> PlayerResult<()>;
}

/// HTTP-backed store talking to the catalog server
#[derive(Debug, Clone)]
pub struct ApiProgressStore {
    client: ApiClient,
}

impl ApiProgressStore {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProgressStore for ApiProgressStore {
    async fn load_progress(
        &self,
        content_id: &ContentId,
    ) -> PlayerResult<Option<ProgressRecord>> {
        let path = v1::watch::progress_item(content_id.as_str());
        self.client
            .get_optional::<ProgressRecord>(&path)
            .await
            .map_err(|e| PlayerError::Api(format!("{e:#}")))
    }

    async fn save_progress(&self, request: UpdateProgressRequest) -> PlayerResult<()> {
        self.client
            .post_no_content(v1::watch::UPDATE_PROGRESS, &request)
            .await
            .map_err(|e| PlayerError::ProgressPersist(format!("{e:#}")))
    }
}

/// Process-local store, used offline and in tests
pub struct InMemoryProgressStore {
    records: DashMap<ContentId, ProgressRecord>,
    clock: Arc<dyn TimeProvider>,
}

impl std::fmt::Debug for InMemoryProgressStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryProgressStore")
            .field("records", &self.records.len())
            .finish()
    }
}

impl Default for InMemoryProgressStore {
    fn default() -> Self {
        Self::with_clock(Arc::new(SystemTimeProvider))
    }
}

impl InMemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            records: DashMap::new(),
            clock,
        }
    }

    /// Seed a record directly, bypassing the persistence rule
    pub fn insert(&self, record: ProgressRecord) {
        self.records.insert(record.content_id.clone(), record);
    }

    pub fn get(&self, content_id: &ContentId) -> Option<ProgressRecord> {
        self.records.get(content_id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ProgressStore for InMemoryProgressStore {
    async fn load_progress(
        &self,
        content_id: &ContentId,
    ) -> PlayerResult<Option<ProgressRecord>> {
        Ok(self.get(content_id))
    }

    async fn save_progress(&self, request: UpdateProgressRequest) -> PlayerResult<()> {
        if !ProgressRecord::is_persistable(
            request.position_seconds,
            request.duration_seconds,
        ) {
            return Err(PlayerError::ProgressPersist(format!(
                "refusing to store {:.1}s of {:.1}s for {}",
                request.position_seconds,
                request.duration_seconds,
                request.content_id
            )));
        }
        let record = ProgressRecord::from_request(&request, self.clock.utc_now());
        self.records.insert(request.content_id, record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_model::MediaKind;

    fn request(id: &str, position: f64) -> UpdateProgressRequest {
        UpdateProgressRequest {
            content_id: ContentId::new(id).unwrap(),
            media_kind: MediaKind::Episode,
            position_seconds: position,
            duration_seconds: 1500.0,
        }
    }

    #[tokio::test]
    async fn last_write_wins() {
        let store = InMemoryProgressStore::new();
        store.save_progress(request("ep-1", 30.0)).await.unwrap();
        store.save_progress(request("ep-1", 45.0)).await.unwrap();

        let id = ContentId::new("ep-1").unwrap();
        let record = store.load_progress(&id).await.unwrap().unwrap();
        assert_eq!(record.position_seconds, 45.0);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn rejects_writes_that_break_the_persistence_rule() {
        let store = InMemoryProgressStore::new();
        let err = store.save_progress(request("ep-1", 3.0)).await.unwrap_err();
        assert!(matches!(err, PlayerError::ProgressPersist(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn unknown_content_has_no_record() {
        let store = InMemoryProgressStore::new();
        let id = ContentId::new("movie-404").unwrap();
        assert!(store.load_progress(&id).await.unwrap().is_none());
    }
}
