//! DupSweep - duplicate file finder and relocator
//!
//! Scans a directory tree, groups files by MD5 content fingerprint and
//! persists the grouping as `files_and_md5_sums.json` at the scan root. A
//! later cleanup run reads that index and moves duplicates found under
//! chosen "cleanse" subtrees into a quarantine directory, as long as at least
//! one copy survives outside every cleanse path.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::actions::{classify, CleansePaths, Quarantine};
//! use dupsweep::duplicates::scan;
//! use std::path::Path;
//!
//! let index = scan(Path::new("/data"), &[]).unwrap();
//! let plan = classify(&index, &CleansePaths::new(["/data/inbox"]), &Quarantine::new("/tmp/q"));
//! println!("{} file(s) to relocate", plan.to_relocate());
//! ```

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;
pub mod store;
pub mod validation;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::actions::{apply, classify, Quarantine, RelocateConfig};
use crate::cli::Cli;
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, DuplicateIndex, FinderConfig, ScanReport};
use crate::error::ExitCode;
use crate::output::Console;
use crate::progress::{Progress, ProgressCallback};
use crate::scanner::path_utils::is_within;
use crate::signal::ShutdownHandler;
use crate::validation::{ConfigError, RunPlan};

/// Everything a phase needs besides the plan.
struct Session {
    console: Console,
    quiet: bool,
    progress: Arc<dyn ProgressCallback>,
    shutdown: ShutdownHandler,
}

impl Session {
    fn print(&self, text: &str) {
        if !self.quiet {
            println!("{text}");
        }
    }
}

/// Run the application for parsed CLI arguments.
///
/// # Errors
///
/// Returns an error for invalid arguments ([`ConfigError`]), an interrupted
/// run, an unreadable or corrupted index, or (in strict mode) the first
/// per-item failure. Per-item failures otherwise yield
/// [`ExitCode::PartialSuccess`].
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let config = Config::load(cli.config.as_deref()).map_err(ConfigError::from)?;
    let plan = validation::validate(&cli, config)?;

    let session = Session {
        console: Console::new(!cli.no_color),
        quiet: cli.quiet,
        progress: Arc::new(Progress::new(cli.quiet)),
        shutdown: signal::install_handler().context("failed to install Ctrl+C handler")?,
    };

    let mut partial = false;

    let scanned = if plan.action.scans() {
        let (index, failed) = run_find(&plan, &session)?;
        partial |= failed;
        Some(index)
    } else {
        None
    };

    if plan.action.cleans() {
        let index = match scanned {
            Some(index) => index,
            None => load_for_clean(&plan)?,
        };
        partial |= run_clean(&plan, &session, &index)?;
    }

    Ok(if partial {
        ExitCode::PartialSuccess
    } else {
        ExitCode::Success
    })
}

/// Scan, report and persist. Returns the index and whether any item failed.
fn run_find(plan: &RunPlan, session: &Session) -> Result<(DuplicateIndex, bool)> {
    let mut rules = plan
        .config
        .ignore_rules(plan.ignored_dirs.clone())
        .with_root(plan.root.clone(), plan.root_as_given.clone())
        .exclude_path(plan.index_path.clone());
    if is_within(&plan.config.quarantine_base, &plan.root) {
        rules = rules.exclude_path(plan.config.quarantine_base.clone());
    }

    let finder = DuplicateFinder::new(
        FinderConfig::default()
            .with_rules(rules)
            .with_progress_interval(plan.progress_interval)
            .with_io_threads(plan.config.io_threads)
            .with_strict(plan.config.strict)
            .with_shutdown_flag(session.shutdown.get_flag())
            .with_progress_callback(Arc::clone(&session.progress)),
    );

    session.print(&session.console.scan_started(&plan.root));
    let (index, summary) = finder
        .find_duplicates(&plan.root)
        .with_context(|| format!("scan of {} failed", plan.root.display()))?;
    session.print(&session.console.scan_completed(&summary));

    if summary.has_failures() {
        eprintln!("{}", session.console.scan_failures(&summary));
    }
    if plan.report && !session.quiet {
        print!("{}", session.console.scan_report(&ScanReport::from_index(&index)));
    }

    let saved = store::save_index(&plan.root, &index).context("failed to save index")?;
    log::info!("Index written to {}", saved.display());

    Ok((index, summary.has_failures()))
}

/// Load the persisted index and drop locations that vanished since the scan.
fn load_for_clean(plan: &RunPlan) -> Result<DuplicateIndex> {
    let loaded = store::load_index(&plan.index_path)
        .with_context(|| format!("failed to load index {}", plan.index_path.display()))?;

    if let Some(ref recorded) = loaded.root_dir {
        if *recorded != plan.root {
            log::warn!(
                "Index was built for {} but --root-dir is {}",
                recorded.display(),
                plan.root.display()
            );
        }
    }

    let cwd = std::env::current_dir().context("cannot determine the current directory")?;
    let (index, _) = store::resolve_relative(&loaded.index, &cwd);

    let (index, stale) = store::prune_stale(&index);
    if !stale.is_empty() {
        log::info!("Ignoring {} stale location(s) from the index", stale.len());
    }
    Ok(index)
}

/// Classify and relocate. Returns whether any relocation failed.
fn run_clean(plan: &RunPlan, session: &Session, index: &DuplicateIndex) -> Result<bool> {
    let quarantine = Quarantine::new(&plan.config.quarantine_base);
    let cleanse_plan = classify(index, &plan.cleanse_paths, &quarantine);

    for decision in &cleanse_plan.decisions {
        session.print(&session.console.group_decision(decision));
    }
    for action in &cleanse_plan.actions {
        session.print(&session.console.relocation_pair(action));
    }

    let config = RelocateConfig::default()
        .with_demo(plan.demo)
        .with_strict(plan.config.strict)
        .with_shutdown_flag(session.shutdown.get_flag());
    let summary = apply(&cleanse_plan.actions, &config, Some(session.progress.as_ref()))
        .context("relocation failed")?;

    session.print(&session.console.clean_totals(&cleanse_plan));
    let outcome = session.console.relocation_summary(&summary);
    if summary.all_succeeded() {
        session.print(&outcome);
    } else {
        eprintln!("{outcome}");
    }

    Ok(!summary.all_succeeded())
}
