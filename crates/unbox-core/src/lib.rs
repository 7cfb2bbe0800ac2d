//! Core types and configuration for unbox.
//!
//! This crate defines the YAML configuration schema ([`UnboxConfig`]),
//! JAR source resolution ([`JarSource`]), the `MANIFEST.MF` parser
//! ([`Manifest`]), and shared error types.

pub mod config;
pub mod error;
pub mod manifest;
pub mod source;

pub use config::{ContextConfig, UnboxConfig};
pub use error::{Error, Result};
pub use manifest::{MANIFEST_ENTRY, Manifest, ManifestError};
pub use source::JarSource;
