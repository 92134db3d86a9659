//! I/O operations for the persisted index.

use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::data::{IndexDocument, INDEX_FILE_NAME, INDEX_VERSION};
use super::StoreError;
use crate::duplicates::{DuplicateIndex, FileLocation};
use crate::scanner::path_utils::normalize_lexically;

/// An index read back from disk.
#[derive(Debug, Clone)]
pub struct LoadedIndex {
    /// The fingerprint → locations mapping.
    pub index: DuplicateIndex,
    /// Format version, `None` for the legacy unversioned format.
    pub version: Option<u32>,
    /// Root recorded in the document, if any.
    pub root_dir: Option<PathBuf>,
    /// Scan timestamp recorded in the document, if any.
    pub created_at: Option<DateTime<Utc>>,
}

/// Location of the index file for a scan root.
#[must_use]
pub fn index_path(root: &Path) -> PathBuf {
    root.join(INDEX_FILE_NAME)
}

fn checksum(index: &DuplicateIndex) -> Result<String, StoreError> {
    // Compact encoding; must match what load() recomputes
    let json = serde_json::to_string(index).map_err(StoreError::Serialize)?;
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// Write `index` to `<root>/files_and_md5_sums.json`, pretty-printed.
///
/// # Errors
///
/// Returns [`StoreError`] if serialization or writing fails.
pub fn save_index(root: &Path, index: &DuplicateIndex) -> Result<PathBuf, StoreError> {
    let path = index_path(root);

    let mut document = IndexDocument::new(root.to_path_buf(), index.clone());
    document.checksum = Some(checksum(index)?);

    let json = serde_json::to_string_pretty(&document).map_err(StoreError::Serialize)?;
    let io_err = |source| StoreError::Io {
        path: path.clone(),
        source,
    };
    let mut file = File::create(&path).map_err(io_err)?;
    file.write_all(json.as_bytes()).map_err(io_err)?;
    file.write_all(b"\n").map_err(io_err)?;

    log::info!(
        "Saved index with {} fingerprints ({} files) to {}",
        index.len(),
        index.total_files(),
        path.display()
    );
    Ok(path)
}

/// Load and validate an index file.
///
/// Accepts both the versioned document and the legacy bare mapping.
///
/// # Errors
///
/// Returns [`StoreError::Io`] when the file cannot be read and one of the
/// corruption variants when its content is invalid.
pub fn load_index(path: &Path) -> Result<LoadedIndex, StoreError> {
    let content = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let corrupted = |reason: String| StoreError::Corrupted {
        path: path.to_path_buf(),
        reason,
    };

    let value: Value = serde_json::from_str(&content).map_err(|e| corrupted(e.to_string()))?;
    let Value::Object(ref map) = value else {
        return Err(corrupted("top-level value is not an object".to_string()));
    };

    let loaded = if let Some(version) = map.get("version") {
        let found = version
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| corrupted(format!("invalid version field: {version}")))?;
        if found != INDEX_VERSION {
            return Err(StoreError::UnsupportedVersion {
                path: path.to_path_buf(),
                found,
                expected: INDEX_VERSION,
            });
        }

        let document: IndexDocument =
            serde_json::from_value(value).map_err(|e| corrupted(e.to_string()))?;

        if let Some(ref stored) = document.checksum {
            if *stored != checksum(&document.files)? {
                return Err(StoreError::ChecksumMismatch {
                    path: path.to_path_buf(),
                });
            }
        }

        LoadedIndex {
            index: document.files,
            version: Some(document.version),
            root_dir: Some(document.root_dir),
            created_at: Some(document.created_at),
        }
    } else {
        log::info!("Reading legacy (unversioned) index format from {}", path.display());
        let index: DuplicateIndex =
            serde_json::from_value(value).map_err(|e| corrupted(e.to_string()))?;
        LoadedIndex {
            index,
            version: None,
            root_dir: None,
            created_at: None,
        }
    };

    validate_structure(&loaded.index).map_err(corrupted)?;

    log::info!(
        "Loaded index with {} fingerprints ({} files) from {}",
        loaded.index.len(),
        loaded.index.total_files(),
        path.display()
    );
    Ok(loaded)
}

/// Check that every list is non-empty and no location is recorded twice.
fn validate_structure(index: &DuplicateIndex) -> Result<(), String> {
    let mut seen: HashSet<&FileLocation> = HashSet::new();
    for (fingerprint, locations) in index.iter() {
        if locations.is_empty() {
            return Err(format!("fingerprint {fingerprint} has no locations"));
        }
        for location in locations {
            if !seen.insert(location) {
                return Err(format!("location {location} is recorded more than once"));
            }
        }
    }
    Ok(())
}

/// Anchor relative location directories at `base`.
///
/// Indexes written by older tools for a relative root hold directories such
/// as `data/b`, which would never match the absolute cleanse paths. Returns
/// the fresh index and how many locations were rewritten.
#[must_use]
pub fn resolve_relative(index: &DuplicateIndex, base: &Path) -> (DuplicateIndex, usize) {
    let mut rewritten = 0;
    let resolved = index.map_locations(|location| {
        if location.directory.is_absolute() {
            return location.clone();
        }
        rewritten += 1;
        FileLocation::new(
            normalize_lexically(&base.join(&location.directory)),
            location.file_name.clone(),
        )
    });

    if rewritten > 0 {
        log::warn!(
            "{} indexed location(s) are relative; resolving them against {}",
            rewritten,
            base.display()
        );
    }
    (resolved, rewritten)
}

/// Drop locations that are no longer regular files.
///
/// Returns a fresh index and the stale locations, in index order. The input
/// index is not modified.
#[must_use]
pub fn prune_stale(index: &DuplicateIndex) -> (DuplicateIndex, Vec<FileLocation>) {
    let mut stale = Vec::new();
    let pruned = index.retain_locations(|location| {
        if location.path().is_file() {
            true
        } else {
            log::warn!("Indexed file no longer exists, skipping: {}", location);
            stale.push(location.clone());
            false
        }
    });

    if !stale.is_empty() {
        log::warn!("{} indexed file(s) are stale and will be ignored", stale.len());
    }
    (pruned, stale)
}
