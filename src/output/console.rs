//! Colored console formatting.
//!
//! [`Console`] turns structured results into display strings. It keeps no
//! state besides the color switch, so the same input always renders the same
//! text and the caller decides where it is printed.
//!
//! # Example
//!
//! ```
//! use dupsweep::duplicates::{DuplicateIndex, ScanReport};
//! use dupsweep::output::Console;
//!
//! let console = Console::new(false);
//! let report = ScanReport::from_index(&DuplicateIndex::new());
//! assert!(console.scan_report(&report).starts_with("Files appearing once (0)"));
//! ```

use std::fmt::Write;
use std::path::Path;

use yansi::{Paint, Style};

use crate::actions::{CleansePlan, GroupDecision, RelocationAction, RelocationSummary};
use crate::duplicates::{FileLocation, ScanReport, ScanSummary};

const HEADER_RULE_WIDTH: usize = 50;
const GROUP_RULE_WIDTH: usize = 100;

const GREEN: Style = Style::new().green().bold();
const YELLOW: Style = Style::new().yellow().bold();
const RED: Style = Style::new().red().bold();
const CYAN: Style = Style::new().cyan().bold();

/// Stateless formatter for console output.
#[derive(Debug, Clone, Copy)]
pub struct Console {
    color: bool,
}

impl Console {
    /// Create a formatter; `color = false` renders plain text.
    #[must_use]
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.color {
            text.paint(style).to_string()
        } else {
            text.to_string()
        }
    }

    fn location_list(locations: &[FileLocation]) -> String {
        let items: Vec<String> = locations.iter().map(ToString::to_string).collect();
        format!("[{}]", items.join(", "))
    }

    /// Banner printed before a scan.
    #[must_use]
    pub fn scan_started(&self, root: &Path) -> String {
        self.paint(
            &format!("Starting scan for duplicates under <{}>", root.display()),
            GREEN,
        )
    }

    /// Line printed after a scan.
    #[must_use]
    pub fn scan_completed(&self, summary: &ScanSummary) -> String {
        let mut line = format!(
            "Scan completed: {} files fingerprinted, {} ignored, {} duplicate group(s)",
            summary.files_hashed, summary.files_ignored, summary.duplicate_groups
        );
        if summary.has_failures() {
            let _ = write!(line, ", {} failure(s)", summary.failures.len());
            return self.paint(&line, YELLOW);
        }
        self.paint(&line, GREEN)
    }

    /// The once / more-than-once listing.
    #[must_use]
    pub fn scan_report(&self, report: &ScanReport) -> String {
        let mut out = String::new();
        let sections = [
            ("Files appearing once", &report.appearing_once, GREEN),
            (
                "Files appearing more than once",
                &report.appearing_more_than_once,
                YELLOW,
            ),
        ];
        for (title, locations, style) in sections {
            let _ = writeln!(
                out,
                "{}",
                self.paint(&format!("{title} ({})", locations.len()), style)
            );
            let _ = writeln!(out, "{}", "-".repeat(HEADER_RULE_WIDTH));
            for location in locations {
                let _ = writeln!(out, "{}", self.paint(&location.to_string(), style));
            }
        }
        out
    }

    /// Keep/cleanse lines for one actionable group.
    #[must_use]
    pub fn group_decision(&self, decision: &GroupDecision) -> String {
        format!(
            "{}\n{} => files to keep => {}\n{} => files to cleanse => {}",
            "-".repeat(GROUP_RULE_WIDTH),
            decision.fingerprint,
            self.paint(&Self::location_list(&decision.keep), GREEN),
            decision.fingerprint,
            self.paint(&Self::location_list(&decision.cleanse), YELLOW),
        )
    }

    /// `source => target` line for one relocation.
    #[must_use]
    pub fn relocation_pair(&self, action: &RelocationAction) -> String {
        format!(
            "{} => {}",
            action.source_path().display(),
            self.paint(&action.target.display().to_string(), CYAN)
        )
    }

    /// Totals line after classification.
    #[must_use]
    pub fn clean_totals(&self, plan: &CleansePlan) -> String {
        format!(
            "Total files: {}, total to relocate: {}",
            plan.total_files,
            plan.to_relocate()
        )
    }

    /// Outcome of applying the relocation actions, failures included.
    #[must_use]
    pub fn relocation_summary(&self, summary: &RelocationSummary) -> String {
        if summary.all_succeeded() {
            return self.paint(&summary.summary(), GREEN);
        }
        let mut out = self.paint(&summary.summary(), RED);
        for failure in &summary.failures {
            let _ = write!(out, "\n  {}: {}", failure.source.display(), failure.error);
        }
        out
    }

    /// Listing of per-file scan failures.
    #[must_use]
    pub fn scan_failures(&self, summary: &ScanSummary) -> String {
        let mut out = self.paint(
            &format!("{} item(s) could not be scanned:", summary.failures.len()),
            RED,
        );
        for failure in &summary.failures {
            let _ = write!(out, "\n  {}", failure.error);
        }
        out
    }
}
