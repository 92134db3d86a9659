//! Output formatting for scan and cleanup results.
//!
//! Results are printed to stdout as colored text; `--no-color` (or
//! `NO_COLOR`) switches to plain text.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::duplicates::{DuplicateFinder, ScanReport};
//! use dupsweep::output::Console;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (index, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! let console = Console::new(true);
//! print!("{}", console.scan_report(&ScanReport::from_index(&index)));
//! println!("{}", console.scan_completed(&summary));
//! ```

pub mod console;

pub use console::Console;
