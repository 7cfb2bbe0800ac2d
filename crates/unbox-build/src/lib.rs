//! JAR extraction and Dockerfile rendering for unbox.
//!
//! # Pipeline
//!
//! ```text
//! unbox jar -f unbox.yaml
//!   1. Locate     ── local path, or download into a fat-jar* temp file (unbox-fetch)
//!   2. Extract    ── every entry → extracted-jar* temp dir, MANIFEST.MF parsed on the way
//!   3. Render     ── DockerfileRenderer::render() with base image + volumes
//!   4. Write      ── WorkDir::write_dockerfile() → ~/.unbox/Dockerfile
//! ```
//!
//! # Extraction safety
//!
//! Entry names that would resolve outside the extraction root (`../`,
//! absolute paths) abort extraction with [`ExtractError::UnsafeEntryPath`].

pub mod dockerfile;
pub mod extract;
pub mod workdir;

pub use dockerfile::{DockerfileParams, DockerfileRenderer, RenderError};
pub use extract::{ExtractError, ExtractedJar, extract_into, extract_jar, read_manifest};
pub use workdir::{WorkDir, WorkDirError};
