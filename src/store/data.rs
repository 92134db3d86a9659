//! Data structures for the persisted index.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::duplicates::DuplicateIndex;

/// File name of the persisted index, relative to the scan root.
pub const INDEX_FILE_NAME: &str = "files_and_md5_sums.json";

/// Current version of the index file format.
pub const INDEX_VERSION: u32 = 1;

/// Versioned index document as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexDocument {
    /// Format version.
    pub version: u32,
    /// When the scan finished.
    pub created_at: DateTime<Utc>,
    /// Root directory that was scanned.
    pub root_dir: PathBuf,
    /// SHA-256 of the compact JSON encoding of `files`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    /// Fingerprint → locations mapping.
    pub files: DuplicateIndex,
}

impl IndexDocument {
    /// Wrap an index for `root_dir` with the current version and timestamp.
    #[must_use]
    pub fn new(root_dir: PathBuf, files: DuplicateIndex) -> Self {
        Self {
            version: INDEX_VERSION,
            created_at: Utc::now(),
            root_dir,
            checksum: None,
            files,
        }
    }
}
