use std::path::PathBuf;

use unbox_build::dockerfile::{DockerfileParams, DockerfileRenderer};
use unbox_build::extract;
use unbox_core::{JarSource, UnboxConfig};

use super::{locator, resolve_work_dir};

pub struct JarOptions {
    pub config_path: PathBuf,
    pub timeout_secs: u64,
    pub template: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
    pub keep_extracted: bool,
}

/// Execute the full pipeline: config → locate → extract → render → write.
pub async fn jar(options: JarOptions) -> anyhow::Result<()> {
    let config = UnboxConfig::load(&options.config_path)?;
    let work_dir = resolve_work_dir(options.work_dir)?;
    tracing::info!(name = %config.name, base = %config.base, repo = %config.repo, "loaded config");

    // Locate and extract
    let source = JarSource::parse(&config.repo)?;
    let located = locator(options.timeout_secs)?.locate(&source).await?;
    let extracted = extract::extract_jar(located.path())?;

    if extracted.manifest().is_empty() {
        tracing::warn!(source = %source, "archive has no META-INF/MANIFEST.MF");
    }
    for (name, value) in extracted.manifest().iter() {
        tracing::info!("{name}: {value}");
    }

    // Render into memory, then write in one step
    let renderer = match &options.template {
        Some(path) => DockerfileRenderer::from_template_file(path)?,
        None => DockerfileRenderer::new()?,
    };
    let dockerfile = renderer.render(&DockerfileParams::from_config(&config))?;
    let dockerfile_path = work_dir.write_dockerfile(&dockerfile)?;

    if options.keep_extracted {
        let (root, _manifest) = extracted.keep();
        println!("Extracted to {}", root.display());
    }
    println!("Wrote {}", dockerfile_path.display());

    Ok(())
}
