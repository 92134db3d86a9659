//! Structured error handling and exit codes.

use serde::Serialize;

use crate::actions::RelocateError;
use crate::duplicates::FinderError;
use crate::store::StoreError;
use crate::validation::ConfigError;

/// Exit codes for the DupSweep application.
///
/// - 0: Success
/// - 1: General error (unexpected failure, unreadable or corrupted index)
/// - 2: Usage error (invalid arguments or configuration)
/// - 3: Partial success (some files could not be scanned or relocated)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: the run completed without per-item failures.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// Usage error: arguments or configuration are invalid.
    UsageError = 2,
    /// Partial success: the run completed but some items failed.
    PartialSuccess = 3,
    /// Interrupted: the run was interrupted by user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::UsageError => "DS002",
            Self::PartialSuccess => "DS003",
            Self::Interrupted => "DS130",
        }
    }

    /// Pick the exit code for an error returned by the driver.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        for cause in err.chain() {
            if cause.downcast_ref::<ConfigError>().is_some() {
                return Self::UsageError;
            }
            if matches!(cause.downcast_ref::<FinderError>(), Some(FinderError::Interrupted))
                || matches!(
                    cause.downcast_ref::<RelocateError>(),
                    Some(RelocateError::Interrupted)
                )
            {
                return Self::Interrupted;
            }
        }
        Self::GeneralError
    }
}

/// True if the error chain contains a corrupted-index error.
#[must_use]
pub fn is_index_corruption(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| cause.downcast_ref::<StoreError>().is_some_and(StoreError::is_corruption))
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DS001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including causes
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
    /// Whether the persisted index was found to be corrupted
    pub index_corrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
            index_corrupted: is_index_corruption(err),
        }
    }
}
