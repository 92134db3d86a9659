//! Scanner module for directory traversal and content fingerprinting.
//!
//! This module provides functionality for:
//! - Walking the scan root (following directory symlinks)
//! - Applying the ignore rules for directories and files
//! - Fingerprinting file content with MD5
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`filter`]: Ignore rules for directories and file names
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: MD5 file hashing (streaming)
//! - [`path_utils`]: Lexical normalization and component-wise prefix tests
//!
//! The orchestration that turns walked files into a
//! [`DuplicateIndex`](crate::duplicates::DuplicateIndex) lives in
//! [`crate::duplicates::finder`].

pub mod filter;
pub mod hasher;
pub mod path_utils;
pub mod walker;

use std::path::{Path, PathBuf};

// Re-export main types
pub use filter::{IgnoreMatch, IgnoreRules, DEFAULT_IGNORED_FILE_NAMES, DEFAULT_IGNORED_FILE_SUFFIXES};
pub use hasher::Hasher;
pub use walker::Walker;

/// Errors that can occur while scanning a single item.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The path vanished or a symlink target does not exist.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// A directory symlink points back to one of its ancestors.
    #[error("Symlink loop: {path} -> {ancestor}")]
    SymlinkLoop {
        /// The looping link
        path: PathBuf,
        /// The ancestor it resolves to
        ancestor: PathBuf,
    },

    /// The path is not valid UTF-8 and cannot be stored in the index.
    #[error("Path is not valid UTF-8: {0}")]
    UnsupportedPath(PathBuf),

    /// Fingerprinting the file failed.
    #[error(transparent)]
    Hash(#[from] HashError),

    /// An I/O error occurred while accessing a path.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied(p)
            | Self::NotFound(p)
            | Self::UnsupportedPath(p)
            | Self::SymlinkLoop { path: p, .. }
            | Self::Io { path: p, .. } => p,
            Self::Hash(e) => e.path(),
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::Io { path: p, .. } => p,
        }
    }
}
