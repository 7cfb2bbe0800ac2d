use std::path::Path;

use serde::{Deserialize, Serialize};

/// unbox YAML configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnboxConfig {
    /// Application name
    #[serde(default)]
    pub name: String,
    /// Base image reference used in the `FROM` line
    #[serde(default)]
    pub base: String,
    /// Location of the fat JAR: an absolute path or an http(s) URL
    #[serde(default)]
    pub repo: String,
    #[serde(default)]
    pub context: ContextConfig,
}

/// Service context carried alongside the image definition.
///
/// Only `volumes` feeds the rendered Dockerfile today; the remaining fields
/// are loaded and kept for callers that want them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextConfig {
    #[serde(default)]
    pub service_name: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub port: Option<u16>,
    /// Mount paths, rendered as one `VOLUME` each in listed order
    #[serde(default)]
    pub volumes: Vec<String>,
}

impl UnboxConfig {
    /// Load and validate the YAML configuration at `path`.
    ///
    /// # Errors
    ///
    /// - [`Error::ConfigLoad`](crate::Error::ConfigLoad) if the file cannot be read
    /// - [`Error::ConfigParse`](crate::Error::ConfigParse) if it is not valid YAML for this schema
    /// - [`Error::MissingField`](crate::Error::MissingField) if `base` or `repo` is empty
    pub fn load(path: &Path) -> crate::Result<Self> {
        tracing::debug!(path = %path.display(), "reading config");
        let content = std::fs::read_to_string(path).map_err(|e| crate::Error::ConfigLoad {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml(&content, path)
    }

    /// Parse configuration text. `origin` is only used in error messages.
    pub fn from_yaml(content: &str, origin: &Path) -> crate::Result<Self> {
        let config: Self =
            serde_yaml::from_str(content).map_err(|e| crate::Error::ConfigParse {
                path: origin.to_path_buf(),
                source: e,
            })?;
        config.validate(origin)?;
        Ok(config)
    }

    fn validate(&self, origin: &Path) -> crate::Result<()> {
        for (field, value) in [("base", &self.base), ("repo", &self.repo)] {
            if value.trim().is_empty() {
                return Err(crate::Error::MissingField {
                    path: origin.to_path_buf(),
                    field,
                });
            }
        }
        Ok(())
    }
}
