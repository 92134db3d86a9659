//! Progress reporting utilities using indicatif.
//!
//! The scanner emits one progress tick for every `N` files processed (the
//! `--progress-indicator` interval). Ticks are purely observational: they
//! never influence the index being built.
//!
//! [`Progress`] renders ticks as indicatif spinners and bars. Tests and
//! library callers can plug in their own [`ProgressCallback`].

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Phase name for directory traversal.
pub const PHASE_WALKING: &str = "walking";
/// Phase name for content fingerprinting.
pub const PHASE_HASHING: &str = "hashing";
/// Phase name for moving files to quarantine.
pub const PHASE_RELOCATING: &str = "relocating";

/// Progress callback for the scan and relocation phases.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase (see the `PHASE_*` constants)
    /// * `total` - Total number of items, or 0 when unknown
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called once every progress interval.
    ///
    /// # Arguments
    ///
    /// * `processed` - Number of items processed so far in the current phase
    fn on_tick(&self, processed: usize);

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);

    /// Called to update the progress message.
    fn on_message(&self, _message: &str) {}
}

/// Progress reporter using indicatif.
pub struct Progress {
    bar: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, nothing is displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use dupsweep::progress::Progress;
    ///
    /// let progress = Progress::new(true);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            quiet,
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        let pb = if total == 0 {
            let pb = ProgressBar::new_spinner();
            pb.set_style(Self::spinner_style());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        } else {
            let pb = ProgressBar::new(total as u64);
            pb.set_style(Self::bar_style());
            pb
        };

        pb.set_message(match phase {
            PHASE_WALKING => "Walking directory".to_string(),
            PHASE_HASHING => "Fingerprinting".to_string(),
            PHASE_RELOCATING => "Relocating".to_string(),
            other => other.to_string(),
        });

        let mut bar = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = bar.replace(pb) {
            previous.finish_and_clear();
        }
    }

    fn on_tick(&self, processed: usize) {
        if self.quiet {
            return;
        }
        if let Some(ref pb) = *self.bar.lock().unwrap_or_else(PoisonError::into_inner) {
            pb.set_position(processed as u64);
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if self.quiet {
            return;
        }
        if let Some(pb) = self.bar.lock().unwrap_or_else(PoisonError::into_inner).take() {
            pb.finish_with_message(format!("{phase} complete"));
        }
    }

    fn on_message(&self, message: &str) {
        if self.quiet {
            return;
        }
        if let Some(ref pb) = *self.bar.lock().unwrap_or_else(PoisonError::into_inner) {
            pb.set_message(message.to_string());
        }
    }
}

/// Returns true when `processed` lands on a tick boundary.
///
/// An interval of 0 disables ticks.
#[must_use]
pub fn is_tick(processed: usize, interval: usize) -> bool {
    interval > 0 && processed > 0 && processed % interval == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_tick() {
        assert!(!is_tick(0, 100));
        assert!(!is_tick(99, 100));
        assert!(is_tick(100, 100));
        assert!(is_tick(300, 100));
        assert!(is_tick(1, 1));
        assert!(!is_tick(5, 0));
    }

    #[test]
    fn test_quiet_progress_is_noop() {
        let progress = Progress::new(true);
        progress.on_phase_start(PHASE_HASHING, 10);
        progress.on_tick(5);
        progress.on_message("hello");
        progress.on_phase_end(PHASE_HASHING);
        assert!(progress.bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_phase_lifecycle() {
        let progress = Progress::new(false);
        progress.on_phase_start(PHASE_WALKING, 0);
        progress.on_tick(3);
        assert!(progress.bar.lock().unwrap().is_some());
        progress.on_phase_end(PHASE_WALKING);
        assert!(progress.bar.lock().unwrap().is_none());
    }
}
