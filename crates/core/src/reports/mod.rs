//! Report screens.
//!
//! This module describes the report screens declaratively and runs them:
//! - Report definitions (filters, hierarchy configuration)
//! - Filter validation
//! - Report execution against a row source

pub mod definition;
pub mod error;
pub mod filters;
pub mod registry;
pub mod view;

#[cfg(test)]
mod tests;

pub use definition::{DateDefault, FilterDefault, FilterField, FilterKind, ReportDefinition};
pub use error::ReportError;
pub use filters::ReportFilters;
pub use registry::ReportRegistry;
pub use view::{RecordSource, ReportView, RowSource};
