use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

/// Where the fat JAR comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JarSource {
    /// Absolute path on the local filesystem
    Local(PathBuf),
    /// http(s) URL fetched with a GET request
    Remote(Url),
}

impl JarSource {
    /// Classify a `repo` reference.
    ///
    /// Absolute paths are local. Anything else must parse as an absolute URI:
    /// `http`/`https` with a host is remote, a host-less `file:` URI is local.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSource`](crate::Error::InvalidSource) for relative paths,
    /// unparsable URIs, URIs without a host, and unsupported schemes.
    pub fn parse(reference: &str) -> crate::Result<Self> {
        let reference = reference.trim();
        if Path::new(reference).is_absolute() {
            return Ok(Self::Local(PathBuf::from(reference)));
        }

        let invalid = |reason: String| crate::Error::InvalidSource {
            reference: reference.to_owned(),
            reason,
        };

        let url = Url::parse(reference).map_err(|e| invalid(e.to_string()))?;
        let has_host = url.host_str().is_some_and(|h| !h.is_empty());

        match url.scheme() {
            "http" | "https" if has_host => Ok(Self::Remote(url)),
            "file" if !has_host => url
                .to_file_path()
                .map(Self::Local)
                .map_err(|()| invalid("file URI is not a valid local path".to_owned())),
            _ if !has_host => Err(invalid("URI has no host".to_owned())),
            scheme => Err(invalid(format!("unsupported scheme `{scheme}`"))),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl fmt::Display for JarSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => write!(f, "{url}"),
        }
    }
}
