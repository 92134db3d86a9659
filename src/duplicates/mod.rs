//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - The content-to-locations index ([`DuplicateIndex`])
//! - Building the index from a directory tree ([`DuplicateFinder`])
//! - Splitting an index into unique and duplicated files ([`ScanReport`])

pub mod finder;
pub mod index;
pub mod report;

pub use finder::{
    scan, DuplicateFinder, FinderConfig, FinderError, ScanFailure, ScanSummary,
    DEFAULT_PROGRESS_INTERVAL,
};
pub use index::{DuplicateIndex, FileLocation, Fingerprint, ParseFingerprintError, FINGERPRINT_LEN};
pub use report::ScanReport;
