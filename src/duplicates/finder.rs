//! Duplicate finder: walks the scan root and builds the [`DuplicateIndex`].
//!
//! # Overview
//!
//! The pipeline has two phases:
//! 1. **Walking**: collect every candidate file under the root, in
//!    file-name order, honouring the [`IgnoreRules`]
//! 2. **Hashing**: fingerprint each candidate and append its location to the
//!    index entry for that fingerprint
//!
//! Progress ticks fire during hashing only, one per `progress_interval`
//! fingerprinted files. The walk shows a spinner without ticks.
//!
//! Hashing is sequential by default. With `io_threads > 1` fingerprints are
//! computed on a rayon pool, but the index is still populated in walk order,
//! so the resulting index is identical either way.
//!
//! Per-item failures (unreadable file, broken link, symlink loop) are
//! collected in [`ScanSummary::failures`] and the scan continues. In strict
//! mode the first failure aborts the scan.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default());
//! let (index, summary) = finder.find_duplicates(Path::new("/data")).unwrap();
//! println!(
//!     "{} files, {} duplicate groups",
//!     summary.files_hashed,
//!     index.duplicate_groups()
//! );
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use super::{DuplicateIndex, FileLocation, Fingerprint};
use crate::progress::{is_tick, ProgressCallback, PHASE_HASHING, PHASE_WALKING};
use crate::scanner::{HashError, Hasher, IgnoreRules, ScanError, Walker};

/// Default number of files between two progress ticks.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 100;

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Directory and file ignore rules.
    pub rules: IgnoreRules,
    /// Files processed between two progress ticks.
    pub progress_interval: usize,
    /// Number of threads used for fingerprinting (1 = sequential).
    pub io_threads: usize,
    /// Abort on the first per-item failure instead of collecting it.
    pub strict: bool,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("rules", &self.rules)
            .field("progress_interval", &self.progress_interval)
            .field("io_threads", &self.io_threads)
            .field("strict", &self.strict)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            rules: IgnoreRules::default(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            io_threads: 1,
            strict: false,
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the ignore rules.
    #[must_use]
    pub fn with_rules(mut self, rules: IgnoreRules) -> Self {
        self.rules = rules;
        self
    }

    /// Set the progress tick interval.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Set the number of fingerprinting threads.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Enable or disable strict (fail-fast) mode.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// A file or directory that could not be scanned.
#[derive(Debug)]
pub struct ScanFailure {
    /// Path of the failing item.
    pub path: PathBuf,
    /// What went wrong.
    pub error: ScanError,
}

/// Summary statistics of a completed scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Files successfully fingerprinted and recorded.
    pub files_hashed: usize,
    /// Files skipped by the file-name ignore rules.
    pub files_ignored: usize,
    /// Distinct fingerprints in the index.
    pub unique_fingerprints: usize,
    /// Fingerprints shared by two or more files.
    pub duplicate_groups: usize,
    /// Per-item failures, in encounter order.
    pub failures: Vec<ScanFailure>,
}

impl ScanSummary {
    /// True if any item could not be scanned.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Errors that abort a scan.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// Scan was interrupted by the user.
    #[error("Scan interrupted by user")]
    Interrupted,

    /// The scan root does not exist.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The scan root is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A per-item failure in strict mode.
    #[error("Scan aborted: {0}")]
    Aborted(#[source] ScanError),

    /// The fingerprinting thread pool could not be created.
    #[error("Failed to create thread pool: {0}")]
    ThreadPool(String),
}

/// Builds a [`DuplicateIndex`] from a directory tree.
#[derive(Debug)]
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self {
            config,
            hasher: Hasher::new(),
        }
    }

    /// Create a finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Scan `root` and return the populated index with scan statistics.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError`] if the root is unusable, the scan is
    /// interrupted, or (in strict mode) any item fails.
    pub fn find_duplicates(
        &self,
        root: &Path,
    ) -> Result<(DuplicateIndex, ScanSummary), FinderError> {
        check_root(root)?;
        log::info!("Starting scan for duplicates under {}", root.display());

        let mut summary = ScanSummary::default();
        let candidates = self.collect_candidates(root, &mut summary)?;

        let index = self.populate_index(candidates, &mut summary)?;
        summary.unique_fingerprints = index.len();
        summary.duplicate_groups = index.duplicate_groups();

        log::info!(
            "Scan completed: {} files, {} fingerprints, {} duplicate groups, {} failures",
            summary.files_hashed,
            summary.unique_fingerprints,
            summary.duplicate_groups,
            summary.failures.len()
        );
        Ok((index, summary))
    }

    /// Phase 1: walk the tree and collect candidate files.
    fn collect_candidates(
        &self,
        root: &Path,
        summary: &mut ScanSummary,
    ) -> Result<Vec<FileLocation>, FinderError> {
        let mut walker = Walker::new(root, self.config.rules.clone());
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(Arc::clone(flag));
        }

        self.phase_start(PHASE_WALKING, 0);
        let mut candidates = Vec::new();
        for entry in walker.walk() {
            match entry {
                Ok(location) => candidates.push(location),
                Err(e) => self.record_failure(summary, e)?,
            }
        }
        self.phase_end(PHASE_WALKING);

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        summary.files_ignored = walker.skipped_count();
        log::debug!(
            "Walk found {} candidate files ({} ignored)",
            candidates.len(),
            summary.files_ignored
        );
        Ok(candidates)
    }

    /// Phase 2: fingerprint candidates and fill the index in walk order.
    fn populate_index(
        &self,
        candidates: Vec<FileLocation>,
        summary: &mut ScanSummary,
    ) -> Result<DuplicateIndex, FinderError> {
        self.phase_start(PHASE_HASHING, candidates.len());

        let hashed = if self.config.io_threads > 1 {
            self.hash_parallel(candidates)?
        } else {
            self.hash_sequential(candidates)
        };

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        let mut index = DuplicateIndex::new();
        for (location, result) in hashed {
            match result {
                Ok(fingerprint) => {
                    log::trace!("{} {}", fingerprint, location);
                    index.insert(fingerprint, location);
                    summary.files_hashed += 1;
                }
                Err(e) => self.record_failure(summary, e.into())?,
            }
        }

        self.phase_end(PHASE_HASHING);
        Ok(index)
    }

    fn hash_sequential(
        &self,
        candidates: Vec<FileLocation>,
    ) -> Vec<(FileLocation, Result<Fingerprint, HashError>)> {
        let mut results = Vec::with_capacity(candidates.len());
        for (i, location) in candidates.into_iter().enumerate() {
            if self.config.is_shutdown_requested() {
                log::debug!("Hashing: Shutdown requested, skipping remaining files");
                break;
            }

            let result = self.hasher.fingerprint(&location.path());
            let failed = result.is_err();
            results.push((location, result));
            self.maybe_tick(i + 1);

            // Nothing after the first failure can be used in strict mode
            if failed && self.config.strict {
                break;
            }
        }
        results
    }

    fn hash_parallel(
        &self,
        candidates: Vec<FileLocation>,
    ) -> Result<Vec<(FileLocation, Result<Fingerprint, HashError>)>, FinderError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.io_threads)
            .build()
            .map_err(|e| FinderError::ThreadPool(e.to_string()))?;

        log::debug!(
            "Fingerprinting {} files on {} threads",
            candidates.len(),
            self.config.io_threads
        );

        let processed = AtomicUsize::new(0);
        let results: Vec<(FileLocation, Result<Fingerprint, HashError>)> = pool.install(|| {
            candidates
                .into_par_iter()
                .map(|location| {
                    if self.config.is_shutdown_requested() {
                        let err = HashError::Io {
                            path: location.path(),
                            source: std::io::Error::new(
                                std::io::ErrorKind::Interrupted,
                                "Shutdown",
                            ),
                        };
                        return (location, Err(err));
                    }

                    let result = self.hasher.fingerprint(&location.path());
                    let n = processed.fetch_add(1, Ordering::Relaxed) + 1;
                    self.maybe_tick(n);
                    (location, result)
                })
                .collect()
        });
        Ok(results)
    }

    /// Collect a failure, or abort in strict mode.
    fn record_failure(&self, summary: &mut ScanSummary, error: ScanError) -> Result<(), FinderError> {
        if self.config.strict {
            log::error!("Aborting scan: {}", error);
            return Err(FinderError::Aborted(error));
        }
        log::warn!("Skipping {}: {}", error.path().display(), error);
        summary.failures.push(ScanFailure {
            path: error.path().to_path_buf(),
            error,
        });
        Ok(())
    }

    fn maybe_tick(&self, processed: usize) {
        if let Some(ref cb) = self.config.progress_callback {
            if is_tick(processed, self.config.progress_interval) {
                cb.on_tick(processed);
            }
        }
    }

    fn phase_start(&self, phase: &str, total: usize) {
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_phase_start(phase, total);
        }
    }

    fn phase_end(&self, phase: &str) {
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_phase_end(phase);
        }
    }
}

fn check_root(root: &Path) -> Result<(), FinderError> {
    match std::fs::metadata(root) {
        Ok(m) if m.is_dir() => Ok(()),
        Ok(_) => Err(FinderError::NotADirectory(root.to_path_buf())),
        Err(_) => Err(FinderError::NotFound(root.to_path_buf())),
    }
}

/// Scan `root` with the default file rules and the given ignored directory
/// strings, aborting on the first unreadable item.
///
/// # Errors
///
/// Returns [`FinderError`] on any failure.
pub fn scan(root: &Path, ignored_dirs: &[String]) -> Result<DuplicateIndex, FinderError> {
    let config = FinderConfig::default()
        .with_rules(IgnoreRules::with_ignored_dirs(ignored_dirs.to_vec()))
        .with_strict(true);
    DuplicateFinder::new(config)
        .find_duplicates(root)
        .map(|(index, _)| index)
}
