//! Submitted filter values and their validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::definition::{FROM_DATE, FilterDefault, REPORT, ReportDefinition, TO_DATE};
use super::error::ReportError;

/// Filter values for one report execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilters {
    /// Start of the reporting period.
    pub from_date: Option<NaiveDate>,
    /// End of the reporting period.
    pub to_date: Option<NaiveDate>,
    /// Selected report variant.
    pub report: Option<String>,
}

impl ReportFilters {
    /// Creates filters for a date range.
    #[must_use]
    pub fn range(from_date: NaiveDate, to_date: NaiveDate) -> Self {
        Self {
            from_date: Some(from_date),
            to_date: Some(to_date),
            report: None,
        }
    }

    /// Selects a report variant.
    #[must_use]
    pub fn with_report(mut self, report: impl Into<String>) -> Self {
        self.report = Some(report.into());
        self
    }

    /// Fills unset selections from the options the report declares as default.
    ///
    /// Date defaults are relative to the calendar and stay unresolved.
    #[must_use]
    pub fn with_defaults(mut self, definition: &ReportDefinition) -> Self {
        if self.report.is_none()
            && let Some(field) = definition.filter(REPORT)
            && let Some(FilterDefault::Option(option)) = &field.default
        {
            self.report = Some(option.clone());
        }
        self
    }

    /// Returns the submitted value of a filter rendered as text.
    #[must_use]
    pub fn value(&self, fieldname: &str) -> Option<String> {
        match fieldname {
            FROM_DATE => self.from_date.map(|d| d.to_string()),
            TO_DATE => self.to_date.map(|d| d.to_string()),
            REPORT => self.report.clone(),
            _ => None,
        }
    }

    /// Checks the values against a report's declared filters.
    ///
    /// Required filters must be set, selections must be among the declared
    /// options, and the range must not end before it starts.
    pub fn validate(&self, definition: &ReportDefinition) -> Result<(), ReportError> {
        for field in &definition.filters {
            let Some(value) = self.value(&field.fieldname) else {
                if field.required {
                    return Err(ReportError::MissingFilter(field.fieldname.clone()));
                }
                continue;
            };

            let options = field.options();
            if !options.is_empty() && !options.iter().any(|o| *o == value) {
                return Err(ReportError::InvalidOption {
                    field: field.fieldname.clone(),
                    value,
                });
            }
        }

        if let (Some(start), Some(end)) = (self.from_date, self.to_date)
            && start > end
        {
            return Err(ReportError::InvalidDateRange { start, end });
        }

        Ok(())
    }
}
