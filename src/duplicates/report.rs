//! Display-only partition of a finished index.
//!
//! After a scan the operator sees two lists: files whose content appears
//! exactly once and files whose content appears more than once. The
//! partition is computed on demand and never persisted.

use super::{DuplicateIndex, FileLocation};

/// Files split by how often their content occurs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Locations whose fingerprint has a single location.
    pub appearing_once: Vec<FileLocation>,
    /// Every location of every fingerprint with two or more locations.
    pub appearing_more_than_once: Vec<FileLocation>,
}

impl ScanReport {
    /// Partition all locations of `index`.
    #[must_use]
    pub fn from_index(index: &DuplicateIndex) -> Self {
        let mut report = Self::default();
        for (_, locations) in index.iter() {
            match locations {
                [single] => report.appearing_once.push(single.clone()),
                many => report.appearing_more_than_once.extend_from_slice(many),
            }
        }
        report
    }

    /// Total number of locations in the report.
    #[must_use]
    pub fn total(&self) -> usize {
        self.appearing_once.len() + self.appearing_more_than_once.len()
    }
}
