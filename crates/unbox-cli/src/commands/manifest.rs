use std::path::Path;

use unbox_build::extract;
use unbox_core::{JarSource, UnboxConfig};

use super::locator;

pub async fn manifest(config_path: &Path, timeout_secs: u64) -> anyhow::Result<()> {
    let config = UnboxConfig::load(config_path)?;
    let source = JarSource::parse(&config.repo)?;
    let located = locator(timeout_secs)?.locate(&source).await?;

    let manifest = extract::read_manifest(located.path())?;
    print!("{manifest}");
    Ok(())
}
