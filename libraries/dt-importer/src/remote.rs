//! HTTP access to remote collection data.

use crate::error::ImportError;
use crate::Result;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Read-only client rooted at one base URL.
///
/// Every path is resolved below the base; a non-success status is reported as
/// [`ImportError::RemoteUnavailable`].
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: Client,
    base_url: Url,
}

impl RemoteClient {
    /// Create a client for `base_url` (e.g. `https://example.com/dont-translate-data`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        if base_url.is_empty() {
            return Err(ImportError::InvalidUrl("URL cannot be empty".into()));
        }

        let base_url =
            Url::parse(base_url).map_err(|e| ImportError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ImportError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("dt-importer/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ImportError::InvalidUrl(e.to_string()))?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Client rooted at a sub-path of this one, sharing the connection pool
    pub fn scoped(&self, path: &str) -> Result<Self> {
        Ok(Self {
            http: self.http.clone(),
            base_url: self.url_for(path)?,
        })
    }

    /// Resolve a `/`-separated relative path below the base URL.
    ///
    /// Each segment is percent-encoded, so filenames with spaces or `#` stay intact.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ImportError::InvalidUrl(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(path.split('/').filter(|s| !s.is_empty()));
        Ok(url)
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response> {
        let url = self.url_for(path)?;
        debug!(url = %url, "Fetching");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ImportError::remote(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::remote(url.as_str(), status));
        }

        Ok(response)
    }

    pub async fn get_text(&self, path: &str) -> Result<String> {
        let response = self.get(path).await?;
        let url = response.url().to_string();
        response.text().await.map_err(|e| ImportError::remote(url, e))
    }

    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let response = self.get(path).await?;
        let url = response.url().to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImportError::remote(url, e))?;
        Ok(bytes.to_vec())
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.get(path).await?;
        let url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| ImportError::remote(&url, e))?;

        serde_json::from_str(&body).map_err(|e| ImportError::InvalidResponse {
            url,
            reason: e.to_string(),
        })
    }
}
