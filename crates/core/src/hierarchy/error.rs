//! Hierarchy error types.

use ledgerview_shared::{AppError, types::RowId};
use thiserror::Error;

/// Errors that can occur while building a report tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    /// Two rows share the same key.
    #[error("Duplicate row key: {0}")]
    DuplicateKey(RowId),

    /// A record has no usable value in its name field.
    #[error("Record has no usable key in field '{field}'")]
    MissingKey {
        /// Configured name field.
        field: String,
    },
}

impl From<HierarchyError> for AppError {
    fn from(err: HierarchyError) -> Self {
        match err {
            HierarchyError::DuplicateKey(_) => Self::Conflict(err.to_string()),
            HierarchyError::MissingKey { .. } => Self::Validation(err.to_string()),
        }
    }
}
