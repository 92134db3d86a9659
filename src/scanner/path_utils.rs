//! Lexical path normalization utilities.
//!
//! Paths recorded in the index and paths supplied on the command line are
//! compared component-wise, never as raw strings. Both sides are first
//! brought into the same absolute, lexically normalized form: `.` components
//! are dropped and `..` pops the previous component. Symbolic links are not
//! resolved, so a cleanse path reached through a link matches the locations
//! the walker recorded through that same link.
//!
//! # Example
//!
//! ```
//! use dupsweep::scanner::path_utils::{is_within, normalize_lexically};
//! use std::path::Path;
//!
//! let path = normalize_lexically(Path::new("/root/a/../b/./x"));
//! assert_eq!(path, Path::new("/root/b/x"));
//!
//! assert!(is_within(Path::new("/root/b/x"), Path::new("/root/b")));
//! assert!(!is_within(Path::new("/root/bb"), Path::new("/root/b")));
//! ```

use std::io;
use std::path::{Component, Path, PathBuf};

/// Normalize a path without touching the filesystem.
///
/// `..` at the root stays at the root.
#[must_use]
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                ) && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Make `path` absolute against the current directory and normalize it.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(normalize_lexically(path))
    } else {
        Ok(normalize_lexically(&std::env::current_dir()?.join(path)))
    }
}

/// Returns true when `path` equals `prefix` or lies beneath it.
///
/// Comparison is by whole components, so `/root/bb` is not within `/root/b`.
#[must_use]
pub fn is_within(path: &Path, prefix: &Path) -> bool {
    path.starts_with(prefix)
}
