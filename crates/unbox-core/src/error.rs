use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("config at {path} is missing required field `{field}`")]
    MissingField { path: PathBuf, field: &'static str },

    // ── Source resolution ──
    #[error("invalid JAR source {reference:?}: {reason}")]
    InvalidSource { reference: String, reason: String },
}
