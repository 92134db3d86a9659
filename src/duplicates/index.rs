//! Content fingerprints, file locations and the fingerprint → locations index.
//!
//! # Overview
//!
//! The [`DuplicateIndex`] is the hand-off artifact between the scan phase and
//! the cleanup phase. It maps every [`Fingerprint`] to the ordered list of
//! [`FileLocation`]s whose content produced it, in traversal order.
//!
//! # Example
//!
//! ```
//! use dupsweep::duplicates::{DuplicateIndex, FileLocation, Fingerprint};
//!
//! let fp: Fingerprint = "d41d8cd98f00b204e9800998ecf8427e".parse().unwrap();
//! let mut index = DuplicateIndex::new();
//! index.insert(fp, FileLocation::new("/data/a", "x.txt"));
//! index.insert(fp, FileLocation::new("/data/b", "x.txt"));
//!
//! assert_eq!(index.len(), 1);
//! assert_eq!(index.total_files(), 2);
//! ```

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Length of a fingerprint in bytes (128-bit digest).
pub const FINGERPRINT_LEN: usize = 16;

/// 128-bit content digest, rendered as 32 lowercase hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

impl Fingerprint {
    /// Wrap raw digest bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; FINGERPRINT_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }

    /// Lowercase hex rendering.
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Error returned when a string is not a valid fingerprint.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid fingerprint '{0}': expected 32 hex digits")]
pub struct ParseFingerprintError(pub String);

impl FromStr for Fingerprint {
    type Err = ParseFingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != FINGERPRINT_LEN * 2 || !s.is_ascii() {
            return Err(ParseFingerprintError(s.to_string()));
        }

        let mut bytes = [0u8; FINGERPRINT_LEN];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16)
                .map_err(|_| ParseFingerprintError(s.to_string()))?;
        }
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = ParseFingerprintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Fingerprint> for String {
    fn from(fp: Fingerprint) -> Self {
        fp.to_string()
    }
}

/// One file on disk, kept as (directory, file name).
///
/// The two halves are stored separately because relocation rewrites only the
/// directory. Serialized as a two-element array `[directory, file_name]`.
/// Ordering is directory first, then file name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(PathBuf, String)", into = "(PathBuf, String)")]
pub struct FileLocation {
    /// Directory containing the file
    pub directory: PathBuf,
    /// Bare file name
    pub file_name: String,
}

impl FileLocation {
    /// Create a location from a directory and a file name.
    pub fn new(directory: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            file_name: file_name.into(),
        }
    }

    /// Full path of the file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    /// Split a full path into a location.
    ///
    /// Returns `None` when the path has no parent or file name, or when the
    /// file name is not valid UTF-8 (it could not be persisted).
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let directory = path.parent()?;
        let file_name = path.file_name()?.to_str()?;
        directory.to_str()?;
        Some(Self::new(directory, file_name))
    }
}

impl fmt::Display for FileLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path().display())
    }
}

impl From<(PathBuf, String)> for FileLocation {
    fn from((directory, file_name): (PathBuf, String)) -> Self {
        Self {
            directory,
            file_name,
        }
    }
}

impl From<FileLocation> for (PathBuf, String) {
    fn from(loc: FileLocation) -> Self {
        (loc.directory, loc.file_name)
    }
}

/// Mapping from fingerprint to the ordered locations sharing it.
///
/// Fingerprints iterate in ascending order; each location list keeps the
/// order in which files were encountered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DuplicateIndex {
    entries: BTreeMap<Fingerprint, Vec<FileLocation>>,
}

impl DuplicateIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a location to a fingerprint's list, creating the entry if absent.
    pub fn insert(&mut self, fingerprint: Fingerprint, location: FileLocation) {
        self.entries.entry(fingerprint).or_default().push(location);
    }

    /// Locations recorded for a fingerprint.
    #[must_use]
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&[FileLocation]> {
        self.entries.get(fingerprint).map(Vec::as_slice)
    }

    /// Number of distinct fingerprints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no file has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all location-list lengths.
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Number of fingerprints shared by two or more files.
    #[must_use]
    pub fn duplicate_groups(&self) -> usize {
        self.entries.values().filter(|locs| locs.len() > 1).count()
    }

    /// Iterate over `(fingerprint, locations)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Fingerprint, &[FileLocation])> {
        self.entries.iter().map(|(fp, locs)| (fp, locs.as_slice()))
    }

    /// Iterate only over groups with two or more locations.
    pub fn duplicates(&self) -> impl Iterator<Item = (&Fingerprint, &[FileLocation])> {
        self.iter().filter(|(_, locs)| locs.len() > 1)
    }

    /// Build a new index keeping only the locations accepted by `keep`.
    ///
    /// Fingerprints left with no location are dropped. `self` is untouched.
    #[must_use]
    pub fn retain_locations<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&FileLocation) -> bool,
    {
        let entries = self
            .entries
            .iter()
            .filter_map(|(fp, locs)| {
                let kept: Vec<FileLocation> = locs.iter().filter(|l| keep(*l)).cloned().collect();
                (!kept.is_empty()).then_some((*fp, kept))
            })
            .collect();
        Self { entries }
    }

    /// Build a new index with every location passed through `f`.
    ///
    /// Fingerprints and list order are preserved. `self` is untouched.
    #[must_use]
    pub fn map_locations<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&FileLocation) -> FileLocation,
    {
        let entries = self
            .entries
            .iter()
            .map(|(fp, locs)| (*fp, locs.iter().map(&mut f).collect()))
            .collect();
        Self { entries }
    }

    /// Compare two indexes ignoring the order inside each location list.
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        if self.entries.len() != other.entries.len() {
            return false;
        }
        self.entries.iter().all(|(fp, locs)| {
            other.entries.get(fp).is_some_and(|other_locs| {
                let mut a = locs.clone();
                let mut b = other_locs.clone();
                a.sort();
                b.sort();
                a == b
            })
        })
    }
}

impl FromIterator<(Fingerprint, FileLocation)> for DuplicateIndex {
    fn from_iter<I: IntoIterator<Item = (Fingerprint, FileLocation)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (fp, loc) in iter {
            index.insert(fp, loc);
        }
        index
    }
}

impl From<BTreeMap<Fingerprint, Vec<FileLocation>>> for DuplicateIndex {
    fn from(entries: BTreeMap<Fingerprint, Vec<FileLocation>>) -> Self {
        Self { entries }
    }
}

impl IntoIterator for DuplicateIndex {
    type Item = (Fingerprint, Vec<FileLocation>);
    type IntoIter = btree_map::IntoIter<Fingerprint, Vec<FileLocation>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
