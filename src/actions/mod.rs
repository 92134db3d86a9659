//! Cleanup actions module.
//!
//! This module provides functionality for:
//! - Classifying duplicate groups into files to keep and files to cleanse
//! - Relocating cleanse-side files into a quarantine area (never deleting)
//!
//! # Classification
//!
//! ```
//! use dupsweep::actions::{partition, CleansePaths};
//! use dupsweep::duplicates::FileLocation;
//!
//! let group = vec![
//!     FileLocation::new("/root/a", "x.txt"),
//!     FileLocation::new("/root/b", "x.txt"),
//! ];
//! let (keep, cleanse) = partition(&group, &CleansePaths::new(["/root/b"]));
//! assert_eq!(keep.len(), 1);
//! assert_eq!(cleanse.len(), 1);
//! ```
//!
//! # Relocation
//!
//! The relocate module moves files with:
//! - Mirrored quarantine directories created on demand
//! - A dry-run mode reporting identical source/target pairs
//! - Per-file failure collection, or fail-fast in strict mode

pub mod classify;
pub mod relocate;

// Re-export commonly used types
pub use classify::{
    classify, partition, CleansePaths, CleansePlan, GroupDecision, RelocationAction,
};
pub use relocate::{
    apply, relocate_file, Quarantine, RelocateConfig, RelocateError, Relocation,
    RelocationFailure, RelocationSummary,
};
