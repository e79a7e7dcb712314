//! Report error types.

use chrono::NaiveDate;
use ledgerview_shared::AppError;
use thiserror::Error;

use crate::hierarchy::HierarchyError;

/// Errors that can occur while running a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// No report registered under this name.
    #[error("Report not found: {0}")]
    UnknownReport(String),

    /// A required filter has no value.
    #[error("Missing required filter: {0}")]
    MissingFilter(String),

    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Selected value is not one of the filter's options.
    #[error("Invalid value '{value}' for filter {field}")]
    InvalidOption {
        /// Filter field name.
        field: String,
        /// Rejected value.
        value: String,
    },

    /// The row source failed.
    #[error("Row source failed: {0}")]
    RowSource(String),

    /// Rows could not be arranged into a tree.
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        let message = err.to_string();
        match err {
            ReportError::UnknownReport(_) => Self::NotFound(message),
            ReportError::MissingFilter(_)
            | ReportError::InvalidDateRange { .. }
            | ReportError::InvalidOption { .. } => Self::Validation(message),
            ReportError::RowSource(_) => Self::ExternalService(message),
            ReportError::Hierarchy(inner) => inner.into(),
        }
    }
}
