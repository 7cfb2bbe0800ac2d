//! Locating the fat JAR named by an unbox configuration.
//!
//! Local paths are used as-is; `http`/`https` URLs are downloaded into a
//! temporary file through a [`JarFetcher`].

pub mod error;
pub mod fetcher;
pub mod locator;

pub use error::FetchError;
pub use fetcher::{DEFAULT_TIMEOUT, HttpFetcher, JarFetcher};
pub use locator::{JarLocator, LocatedJar};
