//! Persisted duplicate index.
//!
//! The scan phase writes the index once, as a full snapshot, to
//! `<root>/files_and_md5_sums.json`; the cleanup phase reads it back whole.
//!
//! # Features
//!
//! * **Versioning**: the document carries a `version` field; unknown versions are rejected.
//! * **Integrity**: a SHA-256 checksum over the `files` mapping detects edits and truncation.
//! * **Compatibility**: bare `{fingerprint: [[dir, name], ...]}` files are still accepted.
//! * **Staleness**: locations that vanished since the scan can be pruned before cleanup.
//! * **Relative paths**: legacy locations recorded relative to the scan's working directory can be anchored.
//!
//! # Architecture
//!
//! * [`data`]: Serializable document model.
//! * [`io`]: Saving, loading, validation and stale-location pruning.

pub mod data;
pub mod io;

use std::path::PathBuf;

pub use data::{IndexDocument, INDEX_FILE_NAME, INDEX_VERSION};
pub use io::{index_path, load_index, prune_stale, resolve_relative, save_index, LoadedIndex};

/// Errors raised while persisting or loading the index.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// The index file could not be read or written.
    #[error("I/O error for index file {path}: {source}")]
    Io {
        /// Index file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The index could not be serialized.
    #[error("Failed to serialize index: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The file is not a well-formed index document.
    #[error("Index file {path} is corrupted: {reason}")]
    Corrupted {
        /// Index file path
        path: PathBuf,
        /// What is wrong with it
        reason: String,
    },

    /// The document was written by an unknown format version.
    #[error("Unsupported index version {found} in {path} (expected {expected})")]
    UnsupportedVersion {
        /// Index file path
        path: PathBuf,
        /// Version found in the file
        found: u32,
        /// Version this build understands
        expected: u32,
    },

    /// The stored checksum does not match the content.
    #[error("Index integrity check failed for {path}: checksum mismatch")]
    ChecksumMismatch {
        /// Index file path
        path: PathBuf,
    },
}

impl StoreError {
    /// True for errors that mean the file content itself is bad.
    #[must_use]
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::Corrupted { .. } | Self::UnsupportedVersion { .. } | Self::ChecksumMismatch { .. }
        )
    }
}
