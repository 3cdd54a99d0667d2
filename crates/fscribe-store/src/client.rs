//! HTTP blob-store client.
//!
//! The status store is consumed through a minimal put/get interface: one
//! JSON document per key, eventually consistent, no transactions. The HTTP
//! implementation targets any store exposing `PUT`/`GET {base}/{key}` with
//! an optional bearer token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::retry::{with_retry, RetryConfig};

/// Key-value access to the job status store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Write (create or replace) the document under `key`.
    async fn put(&self, key: &str, document: Value) -> StoreResult<()>;

    /// Read the document under `key`; `None` when absent.
    async fn get(&self, key: &str) -> StoreResult<Option<Value>>;
}

/// Blob store client configuration.
#[derive(Debug, Clone)]
pub struct BlobStoreConfig {
    /// Base URL of the document collection
    pub base_url: String,
    /// Optional bearer token
    pub token: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Retry configuration
    pub retry: RetryConfig,
}

impl BlobStoreConfig {
    /// Create config from environment variables.
    pub fn from_env() -> StoreResult<Self> {
        let base_url = std::env::var("BLOB_STORE_URL")
            .map_err(|_| StoreError::config("BLOB_STORE_URL must be set to use the HTTP store"))?;

        if base_url.is_empty() {
            return Err(StoreError::config("BLOB_STORE_URL cannot be empty"));
        }

        Ok(Self {
            base_url,
            token: std::env::var("BLOB_STORE_TOKEN").ok().filter(|t| !t.is_empty()),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
            retry: RetryConfig::from_env(),
        })
    }

    /// Config for a given base URL with defaults everywhere else.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
            retry: RetryConfig::default(),
        }
    }
}

/// HTTP implementation of [`DocumentStore`].
pub struct HttpBlobStore {
    http: Client,
    config: BlobStoreConfig,
}

impl HttpBlobStore {
    /// Create a new client.
    pub fn new(config: BlobStoreConfig) -> StoreResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(concat!("fscribe-store/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(StoreError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> StoreResult<Self> {
        Self::new(BlobStoreConfig::from_env()?)
    }

    fn document_url(&self, key: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(key)
        )
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn error_for(status: StatusCode, response: reqwest::Response) -> StoreError {
        let message = response.text().await.unwrap_or_default();
        if status.is_server_error() {
            StoreError::ServerError {
                status: status.as_u16(),
                message,
            }
        } else {
            StoreError::request_failed(format!("HTTP {}: {}", status, message))
        }
    }
}

#[async_trait]
impl DocumentStore for HttpBlobStore {
    async fn put(&self, key: &str, document: Value) -> StoreResult<()> {
        let url = self.document_url(key);

        with_retry(&self.config.retry, "put_document", || {
            let document = document.clone();
            let url = url.clone();
            async move {
                let response = self
                    .authorize(self.http.put(&url).json(&document))
                    .send()
                    .await?;

                let status = response.status();
                if status.is_success() {
                    debug!(key = %key, "Stored document");
                    Ok(())
                } else {
                    Err(Self::error_for(status, response).await)
                }
            }
        })
        .await
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let url = self.document_url(key);

        with_retry(&self.config.retry, "get_document", || {
            let url = url.clone();
            async move {
                let response = self.authorize(self.http.get(&url)).send().await?;

                match response.status() {
                    StatusCode::NOT_FOUND => Ok(None),
                    status if status.is_success() => {
                        let document: Value = response.json().await?;
                        Ok(Some(document))
                    }
                    status => Err(Self::error_for(status, response).await),
                }
            }
        })
        .await
    }
}
