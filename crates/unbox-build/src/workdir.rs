use std::io::Write;
use std::path::{Path, PathBuf};

/// Directory name used under the home directory when no work directory is
/// configured.
pub const DEFAULT_DIR_NAME: &str = ".unbox";

pub const DOCKERFILE_NAME: &str = "Dockerfile";

/// Output directory for the rendered Dockerfile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkDir {
    path: PathBuf,
}

impl WorkDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<home>/.unbox`
    pub fn in_home(home: &Path) -> Self {
        Self::new(home.join(DEFAULT_DIR_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dockerfile_path(&self) -> PathBuf {
        self.path.join(DOCKERFILE_NAME)
    }

    /// Create the directory (and parents) if it does not exist yet.
    pub fn ensure(&self) -> Result<(), WorkDirError> {
        if self.path.is_dir() {
            tracing::debug!(path = %self.path.display(), "work directory already exists");
            return Ok(());
        }
        std::fs::create_dir_all(&self.path).map_err(|e| WorkDirError::CreateDir {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Write `content` to `<work dir>/Dockerfile`, replacing any previous one.
    ///
    /// The content goes to a temporary file in the same directory first and is
    /// then renamed over the final name, so readers never see a partial file.
    pub fn write_dockerfile(&self, content: &str) -> Result<PathBuf, WorkDirError> {
        self.ensure()?;
        let dockerfile_path = self.dockerfile_path();
        let write_error = |e: std::io::Error| WorkDirError::Write {
            path: dockerfile_path.clone(),
            source: e,
        };

        let mut staged = tempfile::Builder::new()
            .prefix(".Dockerfile")
            .tempfile_in(&self.path)
            .map_err(write_error)?;
        staged.write_all(content.as_bytes()).map_err(write_error)?;
        staged.flush().map_err(write_error)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            staged
                .as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o644))
                .map_err(write_error)?;
        }

        staged
            .persist(&dockerfile_path)
            .map_err(|e| write_error(e.error))?;

        tracing::info!(path = %dockerfile_path.display(), "wrote Dockerfile");
        Ok(dockerfile_path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorkDirError {
    #[error("failed to create work directory {path}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
