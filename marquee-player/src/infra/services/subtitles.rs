use crate::domains::subtitles::SubtitleFetcher;
use crate::error::{PlayerError, PlayerResult};
use crate::infra::api_client::ApiClient;
use async_trait::async_trait;
use url::Url;

/// Fetches subtitle sources over HTTP through the shared client
#[derive(Debug, Clone)]
pub struct HttpSubtitleFetcher {
    client: ApiClient,
}

impl HttpSubtitleFetcher {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SubtitleFetcher for HttpSubtitleFetcher {
    async fn fetch_text(&self, url: &Url) -> PlayerResult<String> {
        self.client
            .get_text(url)
            .await
            .map_err(|e| PlayerError::SubtitleConversion(format!("{e:#}")))
    }
}
