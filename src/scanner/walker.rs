//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct, which traverses the scan root
//! and yields a [`FileLocation`] for every regular file that survives the
//! [`IgnoreRules`].
//!
//! # Features
//!
//! - Symbolic links are followed into directories (walkdir reports loops)
//! - Ignored directories are pruned with their entire subtree
//! - Children are visited in file-name order for reproducible indexes
//! - Graceful shutdown via atomic flag
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::scanner::{IgnoreRules, Walker};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/data"), IgnoreRules::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(location) => println!("{}", location),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::WalkDir;

use super::{IgnoreRules, ScanError};
use crate::duplicates::FileLocation;

/// Directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Ignore rules
    rules: IgnoreRules,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
    /// Files skipped by the file-name rules during the last walk
    skipped: Cell<usize>,
}

impl Walker {
    /// Create a new walker for the given root.
    #[must_use]
    pub fn new(root: &Path, rules: IgnoreRules) -> Self {
        Self {
            root: root.to_path_buf(),
            rules,
            shutdown_flag: None,
            skipped: Cell::new(0),
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the walker stops yielding entries.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Number of files skipped by ignore rules so far.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.skipped.get()
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Walk the tree, yielding file locations.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration; the caller decides whether an error is fatal.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileLocation, ScanError>> + '_ {
        self.skipped.set(0);
        let rules = &self.rules;

        WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                if entry.file_type().is_dir() && rules.is_ignored_dir(entry.path()) {
                    log::debug!("Ignoring directory: {}", entry.path().display());
                    return false;
                }
                true
            })
            .take_while(move |_| {
                if self.is_shutdown_requested() {
                    log::debug!("Walker: Shutdown requested, stopping iteration");
                    return false;
                }
                true
            })
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        return None;
                    }

                    let path = entry.path();
                    if self.rules.is_excluded(path) {
                        log::trace!("Skipping excluded path: {}", path.display());
                        return None;
                    }

                    let name = entry.file_name().to_string_lossy();
                    if self.rules.is_ignored_file_name(&name) {
                        log::trace!("Ignoring file: {}", path.display());
                        self.skipped.set(self.skipped.get() + 1);
                        return None;
                    }

                    match FileLocation::from_path(path) {
                        Some(location) => Some(Ok(location)),
                        None => {
                            log::warn!("Path is not valid UTF-8: {}", path.display());
                            Some(Err(ScanError::UnsupportedPath(path.to_path_buf())))
                        }
                    }
                }
                Err(e) => Some(Err(self.handle_walk_error(e))),
            })
    }

    /// Convert a walkdir error into a [`ScanError`].
    fn handle_walk_error(&self, error: walkdir::Error) -> ScanError {
        use std::io::ErrorKind;

        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        if let Some(ancestor) = error.loop_ancestor() {
            log::warn!(
                "Symlink loop: {} points back to {}",
                path.display(),
                ancestor.display()
            );
            return ScanError::SymlinkLoop {
                path,
                ancestor: ancestor.to_path_buf(),
            };
        }

        let kind = error.io_error().map(std::io::Error::kind);
        match kind {
            Some(ErrorKind::PermissionDenied) => {
                log::warn!("Permission denied: {}", path.display());
                ScanError::PermissionDenied(path)
            }
            Some(ErrorKind::NotFound) => {
                log::warn!("Not found (broken link or removed): {}", path.display());
                ScanError::NotFound(path)
            }
            _ => {
                log::warn!("Walker error for {}: {}", path.display(), error);
                ScanError::Io {
                    path,
                    source: error
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("directory walk failed")),
                }
            }
        }
    }
}
