//! Application configuration management.
//!
//! Settings are layered with figment, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config <FILE>`, else `config.toml` in the platform
//!    configuration directory when it exists)
//! 3. `DUPSWEEP_*` environment variables
//! 4. CLI flags (see [`Config::merge_cli`])
//!
//! # Example
//!
//! ```toml
//! ignored_file_names = [".DS_Store", "Thumbs.db"]
//! ignored_file_suffixes = [".BUP", ".IFO", ".VOB"]
//! quarantine_base = "/mnt/spare/quarantine"
//! ignore_match = "segment"
//! io_threads = 4
//! strict = false
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::scanner::{
    IgnoreMatch, IgnoreRules, DEFAULT_IGNORED_FILE_NAMES, DEFAULT_IGNORED_FILE_SUFFIXES,
};

/// Prefix of environment variables read into the configuration.
pub const ENV_PREFIX: &str = "DUPSWEEP_";

/// Directory name used under the temp dir when no data dir is available.
const FALLBACK_QUARANTINE_DIR: &str = "duplicate-file-cleaner";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Exact file names never fingerprinted.
    pub ignored_file_names: Vec<String>,
    /// File name suffixes never fingerprinted.
    pub ignored_file_suffixes: Vec<String>,
    /// Directory relocated files are moved under.
    pub quarantine_base: PathBuf,
    /// How `--ignored-dirs` strings are matched.
    pub ignore_match: IgnoreMatch,
    /// Fingerprinting threads (1 = sequential).
    pub io_threads: usize,
    /// Abort on the first per-item failure.
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignored_file_names: DEFAULT_IGNORED_FILE_NAMES
                .iter()
                .map(ToString::to_string)
                .collect(),
            ignored_file_suffixes: DEFAULT_IGNORED_FILE_SUFFIXES
                .iter()
                .map(ToString::to_string)
                .collect(),
            quarantine_base: default_quarantine_base(),
            ignore_match: IgnoreMatch::default(),
            io_threads: 1,
            strict: false,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "dupsweep", "dupsweep")
}

/// Default quarantine directory.
///
/// The platform data directory plus `quarantine`, or
/// `<tmp>/duplicate-file-cleaner` when no home directory is known.
#[must_use]
pub fn default_quarantine_base() -> PathBuf {
    match project_dirs() {
        Some(dirs) => dirs.data_dir().join("quarantine"),
        None => std::env::temp_dir().join(FALLBACK_QUARANTINE_DIR),
    }
}

impl Config {
    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration, reading `explicit` if given, else the default file.
    ///
    /// # Errors
    ///
    /// Returns an error if `explicit` does not exist, or if any layer holds
    /// a value of the wrong type.
    pub fn load(explicit: Option<&Path>) -> Result<Self, figment::Error> {
        match explicit {
            Some(path) if !path.is_file() => Err(figment::Error::from(format!(
                "config file not found: {}",
                path.display()
            ))),
            Some(path) => Self::load_from_path(path),
            None => match Self::config_path() {
                Some(path) => Self::load_from_path(&path),
                None => Self::figment(None).extract(),
            },
        }
    }

    /// Load configuration with `path` as the TOML layer.
    ///
    /// A missing file contributes nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or environment holds invalid values.
    pub fn load_from_path(path: &Path) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(Some(path)).extract()?;
        log::debug!("Configuration loaded (file: {})", path.display());
        Ok(config)
    }

    fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Apply CLI flags on top of the loaded layers.
    pub fn merge_cli(&mut self, cli: &Cli) {
        if let Some(ref dir) = cli.quarantine_dir {
            self.quarantine_base = dir.clone();
        }
        if let Some(mode) = cli.ignore_match {
            self.ignore_match = mode;
        }
        if let Some(threads) = cli.io_threads {
            self.io_threads = threads;
        }
        if cli.strict {
            self.strict = true;
        }
    }

    /// Build the walker's ignore rules with the given directory strings.
    #[must_use]
    pub fn ignore_rules(&self, ignored_dirs: Vec<String>) -> IgnoreRules {
        IgnoreRules {
            file_names: self.ignored_file_names.clone(),
            file_suffixes: self.ignored_file_suffixes.clone(),
            dir_patterns: ignored_dirs,
            dir_match: self.ignore_match,
            excluded_paths: Vec::new(),
            root_as_given: None,
        }
    }
}
