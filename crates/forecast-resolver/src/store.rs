//! Remote artifact store access.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{header, Client, StatusCode};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use profiler_common::{ProfileError, ProfileResult};

/// Capability for probing and fetching remote forecast artifacts.
///
/// Any conforming store is substitutable; tests use an in-memory one.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Probe whether an artifact currently exists at `path`.
    ///
    /// Errors are transport problems (timeouts, refused connections); how
    /// to interpret them is the caller's decision. The availability scan
    /// treats them as a negative probe.
    async fn exists(&self, path: &str) -> ProfileResult<bool>;

    /// Download the artifact at `path` into `dest`, returning the number
    /// of bytes written. A short or failed transfer is `TransferFailure`.
    async fn fetch(&self, path: &str, dest: &Path) -> ProfileResult<u64>;
}

/// HTTP-backed store for the NOMADS public data tree.
pub struct HttpStore {
    client: Client,
    base_url: String,
    probe_timeout: Duration,
}

impl HttpStore {
    /// NOMADS production data root.
    pub const DEFAULT_BASE_URL: &'static str = "https://nomads.ncep.noaa.gov/pub/data/nccf/com/";

    /// Default probe timeout: short enough that one unreachable endpoint
    /// cannot stall the whole backward scan.
    pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Default transfer timeout for full artifact downloads.
    pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(600);

    pub fn new(
        base_url: impl Into<String>,
        probe_timeout: Duration,
        fetch_timeout: Duration,
    ) -> ProfileResult<Self> {
        let client = Client::builder()
            .timeout(fetch_timeout)
            .connect_timeout(Duration::from_secs(10))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| ProfileError::Http(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            probe_timeout,
        })
    }

    /// Store with the NOMADS base URL and default timeouts.
    pub fn nomads() -> ProfileResult<Self> {
        Self::new(
            Self::DEFAULT_BASE_URL,
            Self::DEFAULT_PROBE_TIMEOUT,
            Self::DEFAULT_FETCH_TIMEOUT,
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl RemoteStore for HttpStore {
    async fn exists(&self, path: &str) -> ProfileResult<bool> {
        let url = self.url(path);
        let response = self
            .client
            .head(&url)
            .timeout(self.probe_timeout)
            .send()
            .await
            .map_err(|e| ProfileError::Http(format!("probe failed for {}: {}", url, e)))?;

        debug!(url = %url, status = %response.status(), "Probe response");
        Ok(response.status().is_success())
    }

    async fn fetch(&self, path: &str, dest: &Path) -> ProfileResult<u64> {
        let url = self.url(path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProfileError::TransferFailure {
                url: url.clone(),
                message: e.to_string(),
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ProfileError::TransferFailure {
                url,
                message: "artifact disappeared between probe and transfer".to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(ProfileError::TransferFailure {
                url,
                message: format!("HTTP {}", response.status()),
            });
        }

        let expected: Option<u64> = response
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok());

        let mut file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(dest)
            .await?;

        let mut written = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| ProfileError::TransferFailure {
                url: url.clone(),
                message: format!("error reading response body: {}", e),
            })?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        // Verify against Content-Length; a truncated artifact will not decode.
        if let Some(expected) = expected {
            if written != expected {
                return Err(ProfileError::TransferFailure {
                    url,
                    message: format!("size mismatch: expected {} bytes, got {}", expected, written),
                });
            }
        }

        info!(url = %url, bytes = written, "Transfer complete");
        Ok(written)
    }
}
