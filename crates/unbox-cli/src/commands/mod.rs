mod jar;
mod manifest;

use std::path::PathBuf;
use std::time::Duration;

use unbox_build::WorkDir;
use unbox_fetch::{HttpFetcher, JarLocator};

pub use jar::{JarOptions, jar};
pub use manifest::manifest;

pub(crate) fn locator(timeout_secs: u64) -> anyhow::Result<JarLocator<HttpFetcher>> {
    let fetcher = HttpFetcher::with_timeout(Duration::from_secs(timeout_secs))?;
    Ok(JarLocator::with_fetcher(fetcher))
}

/// An explicit `--work-dir` wins; otherwise `~/.unbox`.
pub(crate) fn resolve_work_dir(explicit: Option<PathBuf>) -> anyhow::Result<WorkDir> {
    if let Some(path) = explicit {
        return Ok(WorkDir::new(path));
    }
    let home = dirs::home_dir().ok_or_else(|| {
        anyhow::anyhow!("could not determine home directory; pass --work-dir or set UNBOX_WORK_DIR")
    })?;
    Ok(WorkDir::in_home(&home))
}
