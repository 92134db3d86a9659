//! MD5 content fingerprinting.
//!
//! # Overview
//! This module provides the [`Hasher`] struct, which computes a 128-bit
//! [`Fingerprint`] over the full byte content of a file. Content is read as
//! opaque bytes in a single streaming pass; no text decoding takes place.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use md5::{Digest, Md5};

use super::HashError;
use crate::duplicates::{Fingerprint, FINGERPRINT_LEN};

/// Default read buffer size (64 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Streaming file hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    buffer_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default buffer size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Use a custom read buffer size (minimum 1 byte).
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Fingerprint the full content of a file.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read.
    pub fn fingerprint(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let mut file = File::open(path).map_err(|e| map_io_error(path, e))?;
        let mut hasher = Md5::new();
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            let n = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(map_io_error(path, e)),
            };
            hasher.update(&buffer[..n]);
        }

        Ok(finish(hasher))
    }

    /// Fingerprint an in-memory byte slice.
    #[must_use]
    pub fn fingerprint_bytes(data: &[u8]) -> Fingerprint {
        let mut hasher = Md5::new();
        hasher.update(data);
        finish(hasher)
    }
}

fn finish(hasher: Md5) -> Fingerprint {
    let digest = hasher.finalize();
    let mut bytes = [0u8; FINGERPRINT_LEN];
    bytes.copy_from_slice(&digest);
    Fingerprint::from_bytes(bytes)
}

fn map_io_error(path: &Path, error: io::Error) -> HashError {
    match error.kind() {
        io::ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
        _ => HashError::Io {
            path: path.to_path_buf(),
            source: error,
        },
    }
}
