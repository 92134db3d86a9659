//! Logging setup for DupSweep.
//!
//! All modules log through the `log` facade; this module installs the
//! `env_logger` backend. The level is chosen in priority order:
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. `--quiet` (errors only) or `-v`/`-vv` (debug/trace)
//! 3. Default: info
//!
//! Debug builds prefix each line with a timestamp (and the module path at
//! `-v` and above); release builds print level and message only.
//!
//! ```rust,no_run
//! use dupsweep::logging::init_logging;
//!
//! init_logging(1, false);
//! log::debug!("visible at -v");
//! ```

use std::env;
use std::io::Write;

use env_logger::Builder;
use log::LevelFilter;

/// Install the logger for the given CLI verbosity.
///
/// Only the first call in a process takes effect; later calls are ignored
/// so the driver can be invoked repeatedly (e.g. from tests).
pub fn init_logging(verbose: u8, quiet: bool) {
    let from_env = env::var("RUST_LOG").is_ok();

    let mut builder = Builder::new();
    if from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }
    configure_format(&mut builder, verbose);

    if builder.try_init().is_ok() {
        log::debug!(
            "Logging initialized at level {} ({})",
            log::max_level(),
            if from_env { "RUST_LOG" } else { "CLI flags" }
        );
    }
}

/// Map CLI flags to a level filter; `quiet` wins over `verbose`.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[cfg(debug_assertions)]
fn configure_format(builder: &mut Builder, verbose: u8) {
    builder.format(move |buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        let timestamp = buf.timestamp_seconds();
        if verbose >= 1 {
            writeln!(
                buf,
                "{timestamp} {style}{level:<5}{style:#} [{}] {}",
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(buf, "{timestamp} {style}{level:<5}{style:#} {}", record.args())
        }
    });
}

#[cfg(not(debug_assertions))]
fn configure_format(builder: &mut Builder, _verbose: u8) {
    builder.format(|buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        writeln!(buf, "{style}{level:<5}{style:#} {}", record.args())
    });
}
