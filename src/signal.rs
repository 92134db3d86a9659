//! Ctrl+C handling for graceful shutdown.
//!
//! A shared `AtomicBool` is raised when the user interrupts the run. The
//! walker stops yielding files, the finder stops hashing and reports
//! `Interrupted` (no index is written), and relocation stops before the
//! next move. The process then exits with code 130.
//!
//! ```rust,no_run
//! use dupsweep::duplicates::FinderConfig;
//! use dupsweep::signal::install_handler;
//!
//! let handler = install_handler().expect("signal handler");
//! let config = FinderConfig::default().with_shutdown_flag(handler.get_flag());
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Shared shutdown flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Create a handler with no shutdown requested.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True once Ctrl+C was pressed or [`request_shutdown`](Self::request_shutdown) was called.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Raise the flag manually.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Clone of the flag for the walker, finder and relocator.
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Lower the flag again.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Install the process-wide Ctrl+C handler, or reuse the one installed earlier.
///
/// The reused handler's flag is reset, so each run starts clean.
///
/// # Errors
///
/// Returns [`SignalError`] if the OS refuses the handler and none was
/// installed before.
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    if let Some(handler) = GLOBAL_HANDLER.get() {
        handler.reset();
        return Ok(handler.clone());
    }

    let handler = ShutdownHandler::new();
    let flag = handler.get_flag();

    let installed = ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        let mut stderr = std::io::stderr();
        let _ = writeln!(
            stderr,
            "\nInterrupted. Stopping after the current file (no index is written mid-scan)..."
        );
        let _ = stderr.flush();
    });

    match installed {
        Ok(()) => {
            let _ = GLOBAL_HANDLER.set(handler.clone());
            Ok(GLOBAL_HANDLER.get().cloned().unwrap_or(handler))
        }
        Err(ctrlc::Error::MultipleHandlers) => {
            // Registered by a concurrent caller; share one unhooked handler.
            log::debug!("Ctrl+C handler already registered, using unhooked handler");
            Ok(GLOBAL_HANDLER.get_or_init(ShutdownHandler::new).clone())
        }
        Err(e) => Err(e.into()),
    }
}
