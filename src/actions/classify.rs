//! Keep/cleanse classification of duplicate groups.
//!
//! # Overview
//!
//! Every duplicate group (a fingerprint with two or more locations) is split
//! into the files to keep, which live outside every cleanse path, and the
//! files to cleanse, which live beneath at least one of them. Relocation
//! actions are produced for the cleanse side only when the keep side is
//! non-empty, so the last surviving copy of a file is never moved and groups
//! with no presence under a cleanse path are never touched.
//!
//! # Example
//!
//! ```
//! use dupsweep::actions::{classify, CleansePaths, Quarantine};
//! use dupsweep::duplicates::{DuplicateIndex, FileLocation, Fingerprint};
//!
//! let fp = Fingerprint::from_bytes([7; 16]);
//! let mut index = DuplicateIndex::new();
//! index.insert(fp, FileLocation::new("/root/a", "x.txt"));
//! index.insert(fp, FileLocation::new("/root/b", "x.txt"));
//!
//! let plan = classify(&index, &CleansePaths::new(["/root/b"]), &Quarantine::new("/q"));
//! assert_eq!(plan.actions.len(), 1);
//! assert_eq!(plan.actions[0].source, FileLocation::new("/root/b", "x.txt"));
//! ```

use std::path::{Path, PathBuf};

use super::relocate::Quarantine;
use crate::duplicates::{DuplicateIndex, FileLocation, Fingerprint};
use crate::scanner::path_utils::{is_within, normalize_lexically};

/// Directory prefixes whose duplicates should be relocated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleansePaths {
    prefixes: Vec<PathBuf>,
}

impl CleansePaths {
    /// Build the set, normalizing each prefix lexically.
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut prefixes: Vec<PathBuf> = paths
            .into_iter()
            .map(|p| normalize_lexically(p.as_ref()))
            .collect();
        prefixes.sort();
        prefixes.dedup();
        Self { prefixes }
    }

    /// True if `dir` equals or lies beneath any prefix.
    #[must_use]
    pub fn contains(&self, dir: &Path) -> bool {
        self.prefixes.iter().any(|prefix| is_within(dir, prefix))
    }

    /// The normalized prefixes.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.prefixes.iter().map(PathBuf::as_path)
    }

    /// Number of distinct prefixes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// True if no prefix was given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

/// Split `locations` into `(keep, cleanse)`, preserving order within each side.
#[must_use]
pub fn partition(
    locations: &[FileLocation],
    cleanse_paths: &CleansePaths,
) -> (Vec<FileLocation>, Vec<FileLocation>) {
    let (cleanse, keep): (Vec<FileLocation>, Vec<FileLocation>) = locations
        .iter()
        .cloned()
        .partition(|location| cleanse_paths.contains(&location.directory));
    (keep, cleanse)
}

/// The keep/cleanse split of one duplicate group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDecision {
    /// Shared fingerprint of the group.
    pub fingerprint: Fingerprint,
    /// Locations outside every cleanse path.
    pub keep: Vec<FileLocation>,
    /// Locations beneath a cleanse path.
    pub cleanse: Vec<FileLocation>,
}

impl GroupDecision {
    /// True when the group has copies on both sides.
    #[must_use]
    pub fn is_actionable(&self) -> bool {
        !self.keep.is_empty() && !self.cleanse.is_empty()
    }
}

/// Move one file into the quarantine area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationAction {
    /// Fingerprint of the group the file belongs to.
    pub fingerprint: Fingerprint,
    /// File to move.
    pub source: FileLocation,
    /// Quarantine directory mirroring the source directory.
    pub target_dir: PathBuf,
    /// Final path of the moved file.
    pub target: PathBuf,
}

impl RelocationAction {
    /// Full path of the file to move.
    #[must_use]
    pub fn source_path(&self) -> PathBuf {
        self.source.path()
    }
}

/// Result of classifying a whole index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleansePlan {
    /// Actionable groups, in fingerprint order.
    pub decisions: Vec<GroupDecision>,
    /// Relocation actions, in group order then location order.
    pub actions: Vec<RelocationAction>,
    /// Sum of all location-list lengths in the index.
    pub total_files: usize,
}

impl CleansePlan {
    /// Number of files marked for relocation.
    #[must_use]
    pub fn to_relocate(&self) -> usize {
        self.actions.len()
    }

    /// True if nothing would be moved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Classify every duplicate group of `index` against `cleanse_paths`.
///
/// The index is only read; the plan holds fresh copies of the locations.
#[must_use]
pub fn classify(
    index: &DuplicateIndex,
    cleanse_paths: &CleansePaths,
    quarantine: &Quarantine,
) -> CleansePlan {
    let mut plan = CleansePlan {
        total_files: index.total_files(),
        ..CleansePlan::default()
    };

    for (fingerprint, locations) in index.duplicates() {
        let (keep, cleanse) = partition(locations, cleanse_paths);
        let decision = GroupDecision {
            fingerprint: *fingerprint,
            keep,
            cleanse,
        };

        if !decision.is_actionable() {
            log::trace!(
                "Group {} untouched: {} to keep, {} under cleanse paths",
                fingerprint,
                decision.keep.len(),
                decision.cleanse.len()
            );
            continue;
        }

        log::debug!(
            "Group {}: keeping {}, relocating {}",
            fingerprint,
            decision.keep.len(),
            decision.cleanse.len()
        );

        for source in &decision.cleanse {
            let target_dir = quarantine.target_dir_for(&source.directory);
            let target = target_dir.join(&source.file_name);
            plan.actions.push(RelocationAction {
                fingerprint: *fingerprint,
                source: source.clone(),
                target_dir,
                target,
            });
        }
        plan.decisions.push(decision);
    }

    log::info!(
        "Classified {} files: {} group(s) with copies to relocate, {} file(s) to relocate",
        plan.total_files,
        plan.decisions.len(),
        plan.actions.len()
    );
    plan
}
