use std::path::Path;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use url::Url;

use crate::error::FetchError;

/// Default timeout for a whole download request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Abstraction over HTTP downloads for testability.
///
/// Production code uses [`HttpFetcher`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait JarFetcher: Send + Sync {
    /// GET `url` and stream the response body into the file at `dest`,
    /// returning the number of bytes written.
    async fn download(&self, url: &Url, dest: &Path) -> Result<u64, FetchError>;
}

/// reqwest-backed fetcher.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("unbox/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Client { source: e })?;
        Ok(Self { client })
    }
}

impl JarFetcher for HttpFetcher {
    async fn download(&self, url: &Url, dest: &Path) -> Result<u64, FetchError> {
        let request_error = |e: reqwest::Error| FetchError::Request {
            url: url.clone(),
            source: e,
        };
        let write_error = |e: std::io::Error| FetchError::Write {
            path: dest.to_path_buf(),
            source: e,
        };

        tracing::debug!(%url, "sending GET");
        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.clone(),
                status,
            });
        }

        let mut file = tokio::fs::File::create(dest).await.map_err(write_error)?;
        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await.map_err(request_error)? {
            file.write_all(&chunk).await.map_err(write_error)?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(write_error)?;

        tracing::debug!(%url, bytes = written, "download complete");
        Ok(written)
    }
}
