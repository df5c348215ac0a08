use anyhow::{Context, Result};
use log::{info, warn};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use url::Url;

use crate::infra::constants::routes::v1;

/// API client with optional bearer authentication
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) client: Client,
    base_url: String,
    token_store: Arc<RwLock<Option<String>>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field(
                "has_token",
                &self
                    .token_store
                    .try_read()
                    .map(|t| t.is_some())
                    .unwrap_or(false),
            )
            .finish()
    }
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = normalize_base_url(base_url.into());
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to create HTTP client")?;

        info!(
            "[ApiClient] Creating new API client with base URL: {}",
            base_url
        );

        Ok(Self {
            client,
            base_url,
            token_store: Arc::new(RwLock::new(None)),
        })
    }

    /// Build a versioned API URL
    pub fn build_url(&self, path: impl AsRef<str>) -> String {
        let p = path.as_ref();
        if p.starts_with("http://") || p.starts_with("https://") {
            return p.to_string();
        }
        let path = p.trim_start_matches('/');
        if path.starts_with("api/") {
            format!("{}/{}", self.base_url, path)
        } else {
            format!("{}/api/{}/{}", self.base_url, v1::VERSION, path)
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set the session token issued by the auth provider
    pub async fn set_token(&self, token: Option<String>) {
        *self.token_store.write().await = token;
    }

    /// Build a request with authentication headers
    async fn build_request(&self, builder: RequestBuilder) -> RequestBuilder {
        if let Some(token) = self.token_store.read().await.as_ref() {
            builder.bearer_auth(token)
        } else {
            builder
        }
    }

    /// GET a JSON document, mapping 404 to `None`
    pub async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>> {
        let url = self.build_url(path);
        let request = self.build_request(self.client.get(&url)).await;
        let response = request
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::NO_CONTENT => Ok(None),
            status if status.is_success() => {
                let body = response
                    .json::<T>()
                    .await
                    .with_context(|| format!("decode body of GET {url}"))?;
                Ok(Some(body))
            }
            status => Err(failure(status, response).await),
        }
    }

    /// POST a JSON body to an endpoint that answers without a payload
    pub async fn post_no_content<T: Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<()> {
        let url = self.build_url(path);
        let request = self.build_request(self.client.post(&url).json(body)).await;
        let response = request
            .send()
            .await
            .with_context(|| format!("POST {url}"))?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT | StatusCode::CREATED => Ok(()),
            StatusCode::UNAUTHORIZED => {
                warn!("[ApiClient] Session rejected by server, clearing token");
                self.set_token(None).await;
                Err(anyhow::anyhow!("Unauthorized - please login again"))
            }
            status => Err(failure(status, response).await),
        }
    }

    /// Fetch a text document from an absolute URL (subtitle files live on
    /// the CDN, not under the API root)
    pub async fn get_text(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;
        let status = response.status();
        if !status.is_success() {
            return Err(failure(status, response).await);
        }
        response
            .text()
            .await
            .with_context(|| format!("read body of GET {url}"))
    }
}

// Many users will provide "localhost:3000" which reqwest rejects, so add a
// scheme when missing and trim the trailing slash.
fn normalize_base_url(raw: String) -> String {
    let trimmed = raw.trim().trim_end_matches('/').to_string();
    let with_scheme =
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed
        } else {
            format!("http://{}", trimmed)
        };
    if with_scheme != raw {
        log::warn!(
            "[ApiClient] Normalized base URL from '{}' to '{}'",
            raw,
            with_scheme
        );
    }
    with_scheme
}

async fn failure(status: StatusCode, response: reqwest::Response) -> anyhow::Error {
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    anyhow::anyhow!("Request failed with status {}: {}", status, error_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_scheme_and_loses_trailing_slash() {
        assert_eq!(
            normalize_base_url("localhost:3000/".to_string()),
            "http://localhost:3000"
        );
        assert_eq!(
            normalize_base_url("https://media.example".to_string()),
            "https://media.example"
        );
    }

    #[test]
    fn build_url_versions_relative_paths() {
        let client = ApiClient::new("https://media.example/").unwrap();
        assert_eq!(
            client.build_url("watch/progress"),
            "https://media.example/api/v1/watch/progress"
        );
        assert_eq!(
            client.build_url(v1::watch::UPDATE_PROGRESS),
            "https://media.example/api/v1/watch/progress"
        );
        assert_eq!(
            client.build_url("https://cdn.example/x.srt"),
            "https://cdn.example/x.srt"
        );
    }
}
