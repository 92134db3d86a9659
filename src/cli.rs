//! Command-line interface definitions for DupSweep.
//!
//! This module defines all CLI arguments using the clap derive API. A run is
//! selected with `--action`: `find` scans and persists the index, `clean`
//! relocates duplicates using a previously persisted index, and `both` scans
//! and then cleans with the freshly built index.
//!
//! # Example
//!
//! ```bash
//! # Scan and print the once / more-than-once report
//! dupsweep --action find --root-dir ~/Pictures
//!
//! # Show what would be relocated out of two subtrees
//! dupsweep -a clean -r ~/Pictures -c ~/Pictures/import ~/Pictures/old --demo
//!
//! # Scan, skip any directory containing "cache", then relocate
//! dupsweep -a both -r /data -c /data/inbox -i cache
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::duplicates::DEFAULT_PROGRESS_INTERVAL;
use crate::scanner::IgnoreMatch;

/// Finds duplicate files and relocates redundant copies out of chosen subtrees.
///
/// Files are grouped by MD5 content fingerprint. Copies living under a
/// cleanse path are moved to a quarantine directory, but only when at least
/// one copy lives outside every cleanse path.
#[derive(Debug, Parser)]
#[command(name = "dupsweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Which action to perform
    #[arg(short, long, value_enum)]
    pub action: Action,

    /// Root directory to scan; also holds the persisted index
    #[arg(short, long, value_name = "DIR")]
    pub root_dir: PathBuf,

    /// Paths to cleanse when they contain duplicates of files elsewhere
    ///
    /// Required for `clean` and `both`, rejected for `find`. Each path must
    /// lie inside --root-dir and differ from it. Paths match whole
    /// directory names: `/data/b` covers `/data/b/x` but not `/data/bb`.
    #[arg(short, long, value_name = "PATH", num_args = 1..)]
    pub cleanse_paths: Vec<PathBuf>,

    /// Skip every directory whose path contains one of these strings
    #[arg(short, long, value_name = "SUBSTRING", num_args = 0..)]
    pub ignored_dirs: Vec<String>,

    /// Emit a progress tick every N files
    #[arg(long, value_name = "N", default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    pub progress_indicator: usize,

    /// Show what would be relocated without moving anything
    #[arg(long)]
    pub demo: bool,

    /// Do not print the once / more-than-once listing after a scan
    #[arg(long)]
    pub no_report: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print errors as JSON objects on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file (TOML)
    ///
    /// Defaults to `config.toml` in the platform configuration directory.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory that relocated files are moved under
    #[arg(long, value_name = "DIR")]
    pub quarantine_dir: Option<PathBuf>,

    /// Abort on the first unreadable file or failed move
    #[arg(long)]
    pub strict: bool,

    /// Number of threads used for fingerprinting (1 = sequential)
    #[arg(long, value_name = "N")]
    pub io_threads: Option<usize>,

    /// How --ignored-dirs strings are matched against directory paths
    #[arg(long, value_enum, value_name = "MODE")]
    pub ignore_match: Option<IgnoreMatch>,
}

/// The action a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    /// Scan, report and persist the index
    Find,
    /// Relocate duplicates using the persisted index
    Clean,
    /// Scan, persist, then relocate using the fresh index
    Both,
}

impl Action {
    /// True if the action scans the tree.
    #[must_use]
    pub fn scans(self) -> bool {
        matches!(self, Self::Find | Self::Both)
    }

    /// True if the action relocates files.
    #[must_use]
    pub fn cleans(self) -> bool {
        matches!(self, Self::Clean | Self::Both)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Find => write!(f, "find"),
            Action::Clean => write!(f, "clean"),
            Action::Both => write!(f, "both"),
        }
    }
}
