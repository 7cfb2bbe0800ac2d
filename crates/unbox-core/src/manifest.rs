//! `META-INF/MANIFEST.MF` parsing.
//!
//! The format is line oriented: `Name: Value` pairs, with long values folded
//! onto continuation lines that start with a single space. Blank lines
//! (section separators) are skipped; all attributes land in one flat map.

use std::collections::BTreeMap;
use std::fmt;
use std::io::BufRead;

/// Path of the manifest entry inside a JAR.
pub const MANIFEST_ENTRY: &str = "META-INF/MANIFEST.MF";

const DELIMITER: &str = ": ";

/// Parsed manifest attributes, keyed by case-sensitive attribute name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    attributes: BTreeMap<String, String>,
}

impl Manifest {
    /// Parse manifest text line by line.
    ///
    /// Lines are split on raw bytes and values are decoded only once all of
    /// their continuation lines are joined, so a multibyte character folded
    /// across two lines is accepted.
    ///
    /// A failure returns only the error; attributes read before the bad line
    /// are discarded.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, ManifestError> {
        let mut raw: BTreeMap<String, Vec<u8>> = BTreeMap::new();
        let mut current: Option<String> = None;

        for (index, line) in reader.split(b'\n').enumerate() {
            let line = line.map_err(|e| ManifestError::Read { source: e })?;
            let line_number = index + 1;
            let bytes = line.strip_suffix(b"\r").unwrap_or(&line);

            if bytes.is_empty() {
                continue;
            }

            if let Some(rest) = bytes.strip_prefix(b" ") {
                let name = current
                    .as_deref()
                    .ok_or(ManifestError::OrphanContinuation { line_number })?;
                if let Some(value) = raw.get_mut(name) {
                    value.extend_from_slice(rest);
                }
                continue;
            }

            let malformed = || ManifestError::Malformed {
                line_number,
                line: String::from_utf8_lossy(bytes).into_owned(),
            };
            let (name, value) = split_attribute(bytes).ok_or_else(malformed)?;
            let name = std::str::from_utf8(name).map_err(|_| malformed())?;

            raw.insert(name.to_owned(), value.to_vec());
            current = Some(name.to_owned());
        }

        let attributes = raw
            .into_iter()
            .map(|(name, value)| match String::from_utf8(value) {
                Ok(value) => Ok((name, value)),
                Err(e) => Err(ManifestError::InvalidUtf8 {
                    name,
                    source: e.utf8_error(),
                }),
            })
            .collect::<Result<BTreeMap<_, _>, ManifestError>>()?;

        Ok(Self { attributes })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ManifestError> {
        Self::parse(bytes)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Attributes in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn manifest_version(&self) -> Option<&str> {
        self.get("Manifest-Version")
    }

    pub fn main_class(&self) -> Option<&str> {
        self.get("Main-Class")
    }
}

/// Splits `Name: Value` at the first delimiter; both sides must be non-empty.
fn split_attribute(line: &[u8]) -> Option<(&[u8], &[u8])> {
    let at = line
        .windows(DELIMITER.len())
        .position(|w| w == DELIMITER.as_bytes())?;
    let (name, value) = (&line[..at], &line[at + DELIMITER.len()..]);
    (!name.is_empty() && !value.is_empty()).then_some((name, value))
}

impl FromIterator<(String, String)> for Manifest {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            attributes: iter.into_iter().collect(),
        }
    }
}

/// One `Name: Value` line per attribute, unfolded.
impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.iter() {
            writeln!(f, "{name}{DELIMITER}{value}")?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("malformed manifest line {line_number}: {line:?} (expected `Name: Value`)")]
    Malformed { line_number: usize, line: String },

    #[error("manifest line {line_number} continues an attribute that was never declared")]
    OrphanContinuation { line_number: usize },

    #[error("manifest attribute {name} is not valid UTF-8")]
    InvalidUtf8 {
        name: String,
        source: std::str::Utf8Error,
    },

    #[error("failed to read manifest")]
    Read { source: std::io::Error },
}
