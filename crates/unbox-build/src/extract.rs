use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use unbox_core::{MANIFEST_ENTRY, Manifest, ManifestError};
use zip::ZipArchive;
use zip::result::ZipError;

/// An extracted JAR: a temporary root holding every entry, plus the parsed
/// manifest (empty when the archive has none).
///
/// The root is deleted when this value is dropped unless [`keep`](Self::keep)
/// is called.
#[derive(Debug)]
pub struct ExtractedJar {
    root: TempDir,
    manifest: Manifest,
}

impl ExtractedJar {
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Persist the extraction root past this value's lifetime.
    pub fn keep(self) -> (PathBuf, Manifest) {
        (self.root.keep(), self.manifest)
    }
}

/// Extracts the archive at `archive_path` into a fresh `extracted-jar*`
/// temporary directory.
pub fn extract_jar(archive_path: &Path) -> Result<ExtractedJar, ExtractError> {
    let root = tempfile::Builder::new()
        .prefix("extracted-jar")
        .tempdir()
        .map_err(|e| ExtractError::TempDir { source: e })?;

    let manifest = extract_into(archive_path, root.path())?;
    Ok(ExtractedJar { root, manifest })
}

/// Writes every entry of the archive under `root` in stored order, parsing
/// `META-INF/MANIFEST.MF` on the way through.
///
/// Entries are written as they are reached, so a failure part-way leaves the
/// earlier entries on disk.
///
/// # Errors
///
/// - [`ExtractError::NotAnArchive`] if the file is missing or not a zip archive
/// - [`ExtractError::UnsafeEntryPath`] if an entry name would land outside `root`
/// - [`ExtractError::Manifest`] if the manifest entry is malformed
pub fn extract_into(archive_path: &Path, root: &Path) -> Result<Manifest, ExtractError> {
    let mut archive = open_archive(archive_path)?;
    let mut manifest = Manifest::default();

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| ExtractError::Entry { index, source: e })?;

        let name = entry.name().to_owned();
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| ExtractError::UnsafeEntryPath { name: name.clone() })?;
        let target = root.join(relative);
        tracing::debug!(path = %target.display(), "extracting entry");

        if entry.is_dir() {
            create_dir(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            create_dir(parent)?;
        }

        let mode = entry.unix_mode();
        if name == MANIFEST_ENTRY {
            let mut bytes = Vec::new();
            entry
                .read_to_end(&mut bytes)
                .map_err(|e| ExtractError::ReadEntry {
                    name: name.clone(),
                    source: e,
                })?;
            write_entry(&target, &mut bytes.as_slice(), mode)?;
            manifest = Manifest::from_bytes(&bytes).map_err(|e| ExtractError::Manifest {
                archive: archive_path.to_path_buf(),
                source: e,
            })?;
        } else {
            write_entry(&target, &mut entry, mode)?;
        }
    }

    tracing::info!(
        archive = %archive_path.display(),
        entries = archive.len(),
        attributes = manifest.len(),
        "extracted archive"
    );
    Ok(manifest)
}

/// Reads only the manifest entry, without extracting anything.
pub fn read_manifest(archive_path: &Path) -> Result<Manifest, ExtractError> {
    let mut archive = open_archive(archive_path)?;
    let mut entry = archive.by_name(MANIFEST_ENTRY).map_err(|e| match e {
        ZipError::FileNotFound => ExtractError::MissingManifest(archive_path.to_path_buf()),
        other => ExtractError::NotAnArchive {
            path: archive_path.to_path_buf(),
            source: other,
        },
    })?;

    let mut bytes = Vec::new();
    entry
        .read_to_end(&mut bytes)
        .map_err(|e| ExtractError::ReadEntry {
            name: MANIFEST_ENTRY.to_owned(),
            source: e,
        })?;

    Manifest::from_bytes(&bytes).map_err(|e| ExtractError::Manifest {
        archive: archive_path.to_path_buf(),
        source: e,
    })
}

fn open_archive(path: &Path) -> Result<ZipArchive<BufReader<File>>, ExtractError> {
    let not_an_archive = |e: ZipError| ExtractError::NotAnArchive {
        path: path.to_path_buf(),
        source: e,
    };
    let file = File::open(path).map_err(|e| not_an_archive(ZipError::Io(e)))?;
    ZipArchive::new(BufReader::new(file)).map_err(not_an_archive)
}

fn create_dir(path: &Path) -> Result<(), ExtractError> {
    std::fs::create_dir_all(path).map_err(|e| ExtractError::CreateDir {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_entry(
    target: &Path,
    contents: &mut impl Read,
    mode: Option<u32>,
) -> Result<(), ExtractError> {
    let write_error = |e: std::io::Error| ExtractError::WriteFile {
        path: target.to_path_buf(),
        source: e,
    };

    let mut out = File::create(target).map_err(write_error)?;
    std::io::copy(contents, &mut out).map_err(write_error)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Some(mode) = mode {
            std::fs::set_permissions(target, std::fs::Permissions::from_mode(mode & 0o7777))
                .map_err(write_error)?;
        }
    }
    #[cfg(not(unix))]
    let _ = mode;

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("{path} is not a readable zip archive")]
    NotAnArchive { path: PathBuf, source: ZipError },

    #[error("failed to read archive entry #{index}")]
    Entry { index: usize, source: ZipError },

    #[error("failed to read archive entry {name}")]
    ReadEntry {
        name: String,
        source: std::io::Error,
    },

    #[error("archive entry {name:?} escapes the extraction directory")]
    UnsafeEntryPath { name: String },

    #[error("failed to create temporary extraction directory")]
    TempDir { source: std::io::Error },

    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid manifest in {archive}")]
    Manifest {
        archive: PathBuf,
        source: ManifestError,
    },

    #[error("{0} has no META-INF/MANIFEST.MF (not a JAR file)")]
    MissingManifest(PathBuf),
}
