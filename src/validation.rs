//! Pre-flight validation of a run.
//!
//! All checks happen before anything is scanned or moved. Path checks are
//! lexical; the only filesystem access is confirming that the root is a
//! directory and, for `clean`, that a persisted index exists.

use std::io;
use std::path::{Path, PathBuf};

use crate::actions::CleansePaths;
use crate::cli::{Action, Cli};
use crate::config::Config;
use crate::scanner::path_utils::{absolutize, is_within};
use crate::store::index_path;

/// Invalid combination of arguments or missing prerequisite.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A cleanse path equals the root.
    #[error("--root-dir ({root}) and --cleanse-paths ({path}) cannot point to the same path!")]
    SameAsRoot {
        /// Normalized root directory
        root: PathBuf,
        /// Offending cleanse path
        path: PathBuf,
    },

    /// A cleanse path lies outside the root.
    #[error("--cleanse-paths ({path}) should point to a path within --root-dir ({root})")]
    OutsideRoot {
        /// Normalized root directory
        root: PathBuf,
        /// Offending cleanse path
        path: PathBuf,
    },

    /// `find` was given cleanse paths.
    #[error("--cleanse-paths cannot be passed with action \"find\"")]
    CleansePathsWithFind,

    /// `clean` or `both` was given no cleanse paths.
    #[error("--cleanse-paths must be passed with action \"{0}\"")]
    MissingCleansePaths(Action),

    /// `clean` found no persisted index.
    #[error("Action \"clean\" must be run after \"find\" (no index at {0})")]
    MissingIndex(PathBuf),

    /// The progress interval is zero.
    #[error("--progress-indicator must be at least 1")]
    InvalidProgressInterval,

    /// The root does not exist or is not a directory.
    #[error("--root-dir ({0}) is not an existing directory")]
    RootNotADirectory(PathBuf),

    /// A relative path could not be made absolute.
    #[error("cannot resolve path {path}: {source}")]
    Path {
        /// Path as given
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The configuration file or environment holds invalid values.
    #[error("invalid configuration: {0}")]
    Load(#[from] figment::Error),
}

/// A validated run.
#[derive(Debug, Clone)]
pub struct RunPlan {
    /// What to do.
    pub action: Action,
    /// Absolute, normalized scan root.
    pub root: PathBuf,
    /// Scan root as typed on the command line.
    pub root_as_given: PathBuf,
    /// Location of the persisted index.
    pub index_path: PathBuf,
    /// Normalized cleanse paths (empty for `find`).
    pub cleanse_paths: CleansePaths,
    /// Ignored directory strings.
    pub ignored_dirs: Vec<String>,
    /// Files between progress ticks.
    pub progress_interval: usize,
    /// Dry-run relocation.
    pub demo: bool,
    /// Print the once / more-than-once listing.
    pub report: bool,
    /// Effective configuration, CLI flags applied.
    pub config: Config,
}

fn resolve(path: &Path) -> Result<PathBuf, ConfigError> {
    absolutize(path).map_err(|source| ConfigError::Path {
        path: path.to_path_buf(),
        source,
    })
}

/// Check every cleanse path lies strictly inside `root`.
///
/// Both sides must already be normalized.
///
/// # Errors
///
/// Returns [`ConfigError::SameAsRoot`] or [`ConfigError::OutsideRoot`] for
/// the first offending path.
pub fn check_cleanse_paths(root: &Path, cleanse_paths: &[PathBuf]) -> Result<(), ConfigError> {
    for path in cleanse_paths {
        if path == root {
            return Err(ConfigError::SameAsRoot {
                root: root.to_path_buf(),
                path: path.clone(),
            });
        }
        if !is_within(path, root) {
            return Err(ConfigError::OutsideRoot {
                root: root.to_path_buf(),
                path: path.clone(),
            });
        }
    }
    Ok(())
}

/// Check that the action and the presence of cleanse paths agree.
///
/// # Errors
///
/// Returns [`ConfigError::CleansePathsWithFind`] or
/// [`ConfigError::MissingCleansePaths`].
pub fn check_action(action: Action, has_cleanse_paths: bool) -> Result<(), ConfigError> {
    match (action, has_cleanse_paths) {
        (Action::Find, true) => Err(ConfigError::CleansePathsWithFind),
        (Action::Clean | Action::Both, false) => Err(ConfigError::MissingCleansePaths(action)),
        _ => Ok(()),
    }
}

/// Validate the CLI arguments against `config` and produce a [`RunPlan`].
///
/// # Errors
///
/// Returns a [`ConfigError`] describing the first violated rule.
pub fn validate(cli: &Cli, mut config: Config) -> Result<RunPlan, ConfigError> {
    config.merge_cli(cli);

    let root = resolve(&cli.root_dir)?;
    let cleanse: Vec<PathBuf> = cli
        .cleanse_paths
        .iter()
        .map(|p| resolve(p))
        .collect::<Result<_, _>>()?;

    check_cleanse_paths(&root, &cleanse)?;
    check_action(cli.action, !cleanse.is_empty())?;

    if cli.progress_indicator == 0 {
        return Err(ConfigError::InvalidProgressInterval);
    }

    if !root.is_dir() {
        return Err(ConfigError::RootNotADirectory(root));
    }

    let index_path = index_path(&root);
    if cli.action == Action::Clean && !index_path.is_file() {
        return Err(ConfigError::MissingIndex(index_path));
    }

    config.quarantine_base = resolve(&config.quarantine_base)?;

    log::debug!(
        "Validated run: action={}, root={}, {} cleanse path(s)",
        cli.action,
        root.display(),
        cleanse.len()
    );

    Ok(RunPlan {
        action: cli.action,
        index_path,
        cleanse_paths: CleansePaths::new(&cleanse),
        ignored_dirs: cli.ignored_dirs.clone(),
        progress_interval: cli.progress_indicator,
        demo: cli.demo,
        report: !cli.no_report,
        root,
        root_as_given: cli.root_dir.clone(),
        config,
    })
}
