//! Ignore rules applied while walking the scan root.
//!
//! Two independent filters exist:
//!
//! - **Directory filter**: a directory whose path matches any ignored
//!   directory string is skipped together with its whole subtree.
//! - **File filter**: entries whose name equals an ignored file name, or ends
//!   with an ignored suffix, are never fingerprinted.
//!
//! Directory matching defaults to a raw substring test against the full path
//! ([`IgnoreMatch::Substring`]), so ignoring `"tmp"` also skips
//! `/data/attempt`. [`IgnoreMatch::Segment`] restricts matches to whole path
//! components.
//!
//! The walker sees absolute paths, but directory strings are matched against
//! the root as the operator spelled it (see [`IgnoreRules::with_root`]), so
//! ancestors of a relative root never take part in the match.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// File names skipped by default (OS metadata).
pub const DEFAULT_IGNORED_FILE_NAMES: &[&str] = &[".DS_Store"];

/// File suffixes skipped by default (DVD disc-image sidecar files).
pub const DEFAULT_IGNORED_FILE_SUFFIXES: &[&str] = &[".BUP", ".IFO", ".VOB"];

/// How ignored directory strings are matched against directory paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IgnoreMatch {
    /// Match anywhere in the full path string
    #[default]
    Substring,
    /// Match only a complete path component
    Segment,
}

/// The set of ignore rules used by the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreRules {
    /// Exact file names to skip
    pub file_names: Vec<String>,
    /// File name suffixes to skip (case-sensitive)
    pub file_suffixes: Vec<String>,
    /// Directory strings whose subtrees are skipped
    pub dir_patterns: Vec<String>,
    /// Matching mode for `dir_patterns`
    pub dir_match: IgnoreMatch,
    /// Paths never indexed (the persisted index, the quarantine area)
    pub excluded_paths: Vec<PathBuf>,
    /// Resolved scan root and the spelling directory strings are matched against
    pub root_as_given: Option<(PathBuf, PathBuf)>,
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self {
            file_names: DEFAULT_IGNORED_FILE_NAMES
                .iter()
                .map(ToString::to_string)
                .collect(),
            file_suffixes: DEFAULT_IGNORED_FILE_SUFFIXES
                .iter()
                .map(ToString::to_string)
                .collect(),
            dir_patterns: Vec::new(),
            dir_match: IgnoreMatch::default(),
            excluded_paths: Vec::new(),
            root_as_given: None,
        }
    }
}

impl IgnoreRules {
    /// Default file rules with the given ignored directory strings.
    #[must_use]
    pub fn with_ignored_dirs(dir_patterns: Vec<String>) -> Self {
        Self {
            dir_patterns,
            ..Self::default()
        }
    }

    /// Add a path that must never be indexed.
    #[must_use]
    pub fn exclude_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.excluded_paths.push(path.into());
        self
    }

    /// Match directory strings against `given` in place of the resolved `root`.
    ///
    /// `/home/me/lib/a` is matched as `lib/a` for a root typed as `lib`.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>, given: impl Into<PathBuf>) -> Self {
        self.root_as_given = Some((root.into(), given.into()));
        self
    }

    fn as_given<'a>(&self, dir: &'a Path) -> Cow<'a, Path> {
        let Some((ref root, ref given)) = self.root_as_given else {
            return Cow::Borrowed(dir);
        };
        match dir.strip_prefix(root) {
            Ok(rest) if rest.as_os_str().is_empty() => Cow::Owned(given.clone()),
            Ok(rest) => Cow::Owned(given.join(rest)),
            Err(_) => Cow::Borrowed(dir),
        }
    }

    /// True if the directory (and its subtree) should be skipped.
    #[must_use]
    pub fn is_ignored_dir(&self, dir: &Path) -> bool {
        if self.is_excluded(dir) {
            return true;
        }

        let dir = self.as_given(dir);
        match self.dir_match {
            IgnoreMatch::Substring => {
                let path_str = dir.to_string_lossy();
                self.dir_patterns
                    .iter()
                    .filter(|p| !p.is_empty())
                    .any(|p| path_str.contains(p.as_str()))
            }
            IgnoreMatch::Segment => dir.components().any(|c| {
                let segment = c.as_os_str();
                self.dir_patterns.iter().any(|p| segment == p.as_str())
            }),
        }
    }

    /// True if a file with this name should be skipped.
    #[must_use]
    pub fn is_ignored_file_name(&self, name: &str) -> bool {
        self.file_names.iter().any(|n| n == name)
            || self.file_suffixes.iter().any(|s| name.ends_with(s.as_str()))
    }

    /// True if the path is one of the excluded paths.
    #[must_use]
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.excluded_paths.iter().any(|p| p == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_rules() {
        let rules = IgnoreRules::default();
        assert!(rules.is_ignored_file_name(".DS_Store"));
        assert!(rules.is_ignored_file_name("VTS_01_0.BUP"));
        assert!(rules.is_ignored_file_name("VTS_01_0.IFO"));
        assert!(rules.is_ignored_file_name("VTS_01_1.VOB"));
        assert!(!rules.is_ignored_file_name("movie.mkv"));
        // Suffix match is case-sensitive
        assert!(!rules.is_ignored_file_name("vts_01_1.vob"));
    }

    #[test]
    fn test_substring_matching_is_loose() {
        let rules = IgnoreRules::with_ignored_dirs(vec!["tmp".to_string()]);
        assert!(rules.is_ignored_dir(Path::new("/data/tmp")));
        assert!(rules.is_ignored_dir(Path::new("/data/tmp/nested")));
        assert!(rules.is_ignored_dir(Path::new("/data/attempt")));
        assert!(!rules.is_ignored_dir(Path::new("/data/photos")));
    }

    #[test]
    fn test_segment_matching_is_strict() {
        let rules = IgnoreRules {
            dir_match: IgnoreMatch::Segment,
            ..IgnoreRules::with_ignored_dirs(vec!["tmp".to_string()])
        };
        assert!(rules.is_ignored_dir(Path::new("/data/tmp")));
        assert!(rules.is_ignored_dir(Path::new("/data/tmp/nested")));
        assert!(!rules.is_ignored_dir(Path::new("/data/attempt")));
    }

    #[test]
    fn test_relative_root_ancestors_not_matched() {
        let rules = IgnoreRules::with_ignored_dirs(vec!["tmpwork".to_string()])
            .with_root("/home/me/tmpwork/lib", "lib");
        assert!(!rules.is_ignored_dir(Path::new("/home/me/tmpwork/lib")));
        assert!(!rules.is_ignored_dir(Path::new("/home/me/tmpwork/lib/a")));
        assert!(rules.is_ignored_dir(Path::new("/home/me/tmpwork/lib/tmpwork")));

        let segment = IgnoreRules {
            dir_match: IgnoreMatch::Segment,
            ..rules.clone()
        };
        assert!(!segment.is_ignored_dir(Path::new("/home/me/tmpwork/lib/a")));
        assert!(segment.is_ignored_dir(Path::new("/home/me/tmpwork/lib/a/tmpwork")));
    }

    #[test]
    fn test_root_as_typed_still_matches() {
        let rules = IgnoreRules::with_ignored_dirs(vec!["lib".to_string()])
            .with_root("/home/me/lib", "lib");
        assert!(rules.is_ignored_dir(Path::new("/home/me/lib")));
        assert!(rules.is_ignored_dir(Path::new("/home/me/lib/a")));
    }

    #[test]
    fn test_empty_pattern_matches_nothing() {
        let rules = IgnoreRules::with_ignored_dirs(vec![String::new()]);
        assert!(!rules.is_ignored_dir(Path::new("/data")));
    }

    #[test]
    fn test_excluded_paths() {
        let rules = IgnoreRules::default().exclude_path("/data/quarantine");
        assert!(rules.is_ignored_dir(Path::new("/data/quarantine")));
        assert!(!rules.is_ignored_dir(Path::new("/data/quarantine-old")));
        assert!(rules.is_excluded(Path::new("/data/quarantine")));
    }
}
