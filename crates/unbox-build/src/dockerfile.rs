use std::path::{Path, PathBuf};

use serde::Serialize;
use tera::{Context, Tera};
use unbox_core::UnboxConfig;

const TEMPLATE_NAME: &str = "Dockerfile";

/// Built-in template, used when no template file is given.
pub const DEFAULT_TEMPLATE: &str = r#"# Generated by unbox
FROM {{ base_image }}
{% for volume in volumes -%}
VOLUME {{ volume }}
{% endfor -%}
"#;

/// Values substituted into the Dockerfile template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DockerfileParams {
    pub base_image: String,
    /// Rendered in order, one `VOLUME` each with the default template
    pub volumes: Vec<String>,
}

impl DockerfileParams {
    pub fn from_config(config: &UnboxConfig) -> Self {
        Self {
            base_image: config.base.clone(),
            volumes: config.context.volumes.clone(),
        }
    }
}

/// Renders a Dockerfile from a Tera template exposing `base_image` and
/// `volumes`.
pub struct DockerfileRenderer {
    tera: Tera,
}

impl DockerfileRenderer {
    /// Renderer using [`DEFAULT_TEMPLATE`].
    pub fn new() -> Result<Self, RenderError> {
        Self::from_template_str(DEFAULT_TEMPLATE)
    }

    pub fn from_template_str(source: &str) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, source)
            .map_err(|e| RenderError::Parse { source: e })?;
        Ok(Self { tera })
    }

    pub fn from_template_file(path: &Path) -> Result<Self, RenderError> {
        tracing::debug!(path = %path.display(), "loading Dockerfile template");
        let source = std::fs::read_to_string(path).map_err(|e| RenderError::ReadTemplate {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_template_str(&source)
    }

    /// Render fully in memory; nothing is written on failure.
    pub fn render(&self, params: &DockerfileParams) -> Result<String, RenderError> {
        let context =
            Context::from_serialize(params).map_err(|e| RenderError::Render { source: e })?;
        self.tera
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| RenderError::Render { source: e })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to read Dockerfile template {path}")]
    ReadTemplate {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse Dockerfile template")]
    Parse { source: tera::Error },
    #[error("failed to render Dockerfile template")]
    Render { source: tera::Error },
}
