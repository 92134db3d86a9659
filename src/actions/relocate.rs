//! Relocation of duplicate files into the quarantine area.
//!
//! # Overview
//!
//! Files are never deleted. Each cleanse-side file is renamed into a
//! quarantine directory whose name is the original directory path with path
//! separators and spaces replaced by underscores, so `/root/b` becomes
//! `<base>/_root_b`.
//!
//! In demo mode [`apply`] reports the same source/target pairs without
//! touching the filesystem.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::actions::{apply, classify, CleansePaths, Quarantine, RelocateConfig};
//! use dupsweep::duplicates::DuplicateIndex;
//!
//! let index = DuplicateIndex::new();
//! let plan = classify(&index, &CleansePaths::new(["/data/old"]), &Quarantine::new("/tmp/q"));
//! let summary = apply(&plan.actions, &RelocateConfig::demo(), None).unwrap();
//! println!("{}", summary.summary());
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use super::classify::RelocationAction;
use crate::progress::{ProgressCallback, PHASE_RELOCATING};

/// Error type for relocation operations.
#[derive(Debug, Error)]
pub enum RelocateError {
    /// The source file no longer exists.
    #[error("source file not found: {0}")]
    SourceMissing(PathBuf),

    /// A file already exists at the target path.
    #[error("target already exists: {0}")]
    TargetExists(PathBuf),

    /// The quarantine directory could not be created.
    #[error("failed to create quarantine directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The rename failed (cross-device, permission, ...).
    #[error("failed to move {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Relocation was interrupted by the user.
    #[error("relocation interrupted by user")]
    Interrupted,
}

impl RelocateError {
    /// Get the path associated with this error (if any).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::SourceMissing(p)
            | Self::TargetExists(p)
            | Self::CreateDir { path: p, .. }
            | Self::Move { from: p, .. } => Some(p),
            Self::Interrupted => None,
        }
    }
}

/// The quarantine area files are relocated into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quarantine {
    base: PathBuf,
}

impl Quarantine {
    /// Quarantine rooted at `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Base directory.
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Flatten a directory path into a single directory name.
    ///
    /// ```
    /// use dupsweep::actions::Quarantine;
    /// use std::path::Path;
    ///
    /// assert_eq!(Quarantine::sanitize(Path::new("/root/My Files")), "_root_My_Files");
    /// ```
    #[must_use]
    pub fn sanitize(dir: &Path) -> String {
        dir.to_string_lossy().replace(['/', '\\', ' '], "_")
    }

    /// Quarantine directory for files from `dir`.
    #[must_use]
    pub fn target_dir_for(&self, dir: &Path) -> PathBuf {
        self.base.join(Self::sanitize(dir))
    }
}

/// Configuration for relocation.
#[derive(Debug, Clone, Default)]
pub struct RelocateConfig {
    /// Report only, never touch the filesystem.
    pub demo: bool,
    /// Stop at the first failure instead of collecting it.
    pub strict: bool,
    /// Optional shutdown flag checked between moves.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
}

impl RelocateConfig {
    /// Config for a dry run.
    #[must_use]
    pub fn demo() -> Self {
        Self {
            demo: true,
            ..Self::default()
        }
    }

    /// Enable/disable demo mode.
    #[must_use]
    pub fn with_demo(mut self, demo: bool) -> Self {
        self.demo = demo;
        self
    }

    /// Enable/disable strict mode.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the shutdown flag.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// A source/target pair that was moved (or would be, in demo mode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    /// Original path.
    pub source: PathBuf,
    /// Path in the quarantine area.
    pub target: PathBuf,
}

/// A relocation that failed.
#[derive(Debug)]
pub struct RelocationFailure {
    /// Original path.
    pub source: PathBuf,
    /// Intended target.
    pub target: PathBuf,
    /// What went wrong.
    pub error: RelocateError,
}

/// Results of applying a batch of relocation actions.
#[derive(Debug, Default)]
pub struct RelocationSummary {
    /// Whether this was a dry run.
    pub demo: bool,
    /// Pairs moved, or planned in demo mode, in action order.
    pub relocated: Vec<Relocation>,
    /// Per-file failures, in action order.
    pub failures: Vec<RelocationFailure>,
}

impl RelocationSummary {
    /// Number of files moved (or planned).
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.relocated.len()
    }

    /// Number of failed moves.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Check if all relocations succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.demo {
            format!("Demo mode: {} file(s) would be relocated", self.success_count())
        } else if self.all_succeeded() {
            format!("Relocated {} file(s)", self.success_count())
        } else {
            format!(
                "Relocated {} file(s), {} failed",
                self.success_count(),
                self.failure_count()
            )
        }
    }
}

/// Move one file into its quarantine directory.
///
/// # Errors
///
/// Returns [`RelocateError`] if the source is gone, the target is taken,
/// or directory creation or the rename fails.
pub fn relocate_file(action: &RelocationAction) -> Result<(), RelocateError> {
    let source = action.source_path();

    if fs::symlink_metadata(&source).is_err() {
        return Err(RelocateError::SourceMissing(source));
    }
    if fs::symlink_metadata(&action.target).is_ok() {
        return Err(RelocateError::TargetExists(action.target.clone()));
    }

    if !action.target_dir.is_dir() {
        log::debug!("Creating quarantine directory {}", action.target_dir.display());
        fs::create_dir_all(&action.target_dir).map_err(|e| RelocateError::CreateDir {
            path: action.target_dir.clone(),
            source: e,
        })?;
    }

    fs::rename(&source, &action.target).map_err(|e| RelocateError::Move {
        from: source.clone(),
        to: action.target.clone(),
        source: e,
    })?;

    log::debug!("Moved {} => {}", source.display(), action.target.display());
    Ok(())
}

/// Apply relocation actions in order.
///
/// Failures are collected and processing continues, unless `config.strict`
/// is set, in which case the first failure is returned.
///
/// # Errors
///
/// Returns the first [`RelocateError`] in strict mode, or
/// [`RelocateError::Interrupted`] when the shutdown flag is raised.
pub fn apply(
    actions: &[RelocationAction],
    config: &RelocateConfig,
    callback: Option<&dyn ProgressCallback>,
) -> Result<RelocationSummary, RelocateError> {
    let mut summary = RelocationSummary {
        demo: config.demo,
        ..RelocationSummary::default()
    };

    if let Some(cb) = callback {
        cb.on_phase_start(PHASE_RELOCATING, actions.len());
    }

    for (index, action) in actions.iter().enumerate() {
        if config.is_shutdown_requested() {
            log::info!("Relocation interrupted after {} file(s)", index);
            return Err(RelocateError::Interrupted);
        }

        let pair = Relocation {
            source: action.source_path(),
            target: action.target.clone(),
        };

        if config.demo {
            summary.relocated.push(pair);
        } else {
            match relocate_file(action) {
                Ok(()) => summary.relocated.push(pair),
                Err(e) if config.strict => {
                    log::error!("Stopping relocation: {}", e);
                    return Err(e);
                }
                Err(e) => {
                    log::warn!("Failed to relocate {}: {}", pair.source.display(), e);
                    summary.failures.push(RelocationFailure {
                        source: pair.source,
                        target: pair.target,
                        error: e,
                    });
                }
            }
        }

        if let Some(cb) = callback {
            cb.on_tick(index + 1);
        }
    }

    if let Some(cb) = callback {
        cb.on_phase_end(PHASE_RELOCATING);
    }

    log::info!("{}", summary.summary());
    Ok(summary)
}
