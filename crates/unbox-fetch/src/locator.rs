use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use unbox_core::JarSource;

use crate::error::FetchError;
use crate::fetcher::{HttpFetcher, JarFetcher};

/// An archive ready to be opened from the local filesystem.
#[derive(Debug)]
pub enum LocatedJar {
    /// The configured path, used in place
    Local(PathBuf),
    /// A download held in a temporary file, removed on drop
    Downloaded(NamedTempFile),
}

impl LocatedJar {
    pub fn path(&self) -> &Path {
        match self {
            Self::Local(path) => path,
            Self::Downloaded(file) => file.path(),
        }
    }
}

/// Resolves a [`JarSource`] to a readable archive, parameterized over the
/// fetcher for testability.
pub struct JarLocator<F: JarFetcher = HttpFetcher> {
    fetcher: F,
}

impl<F: JarFetcher> JarLocator<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Local sources are passed through untouched; a missing file is
    /// reported later when the archive is opened. Remote sources are
    /// downloaded into a fresh `fat-jar*` temporary file.
    pub async fn locate(&self, source: &JarSource) -> Result<LocatedJar, FetchError> {
        match source {
            JarSource::Local(path) => {
                tracing::debug!(path = %path.display(), "using local archive");
                Ok(LocatedJar::Local(path.clone()))
            }
            JarSource::Remote(url) => {
                let file = tempfile::Builder::new()
                    .prefix("fat-jar")
                    .suffix(".jar")
                    .tempfile()
                    .map_err(|e| FetchError::TempFile { source: e })?;

                let bytes = self.fetcher.download(url, file.path()).await?;
                tracing::info!(%url, bytes, path = %file.path().display(), "downloaded archive");
                Ok(LocatedJar::Downloaded(file))
            }
        }
    }
}
