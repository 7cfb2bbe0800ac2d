use std::path::PathBuf;

use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to fetch {url}")]
    Request { url: Url, source: reqwest::Error },

    #[error("fetching {url} returned HTTP {status}")]
    Status {
        url: Url,
        status: reqwest::StatusCode,
    },

    #[error("failed to create temporary file for download")]
    TempFile { source: std::io::Error },

    #[error("failed to write downloaded archive to {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to build HTTP client")]
    Client { source: reqwest::Error },
}
