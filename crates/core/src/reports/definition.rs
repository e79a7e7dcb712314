//! Declarative report definitions.

use serde::{Deserialize, Serialize};

use crate::hierarchy::HierarchyConfig;

/// Start-of-range date filter.
pub const FROM_DATE: &str = "from_date";
/// End-of-range date filter.
pub const TO_DATE: &str = "to_date";
/// Report-variant selector.
pub const REPORT: &str = "report";

/// Name of the profit and loss screen.
pub const CUSTOM_PNL_REPORT: &str = "Custom PnL Report";
/// Name of the year-over-year screen.
pub const DELTA_REPORT: &str = "Delta Report";
/// Name of the combined statements screen.
pub const FINANCIAL_ACCOUNTING_REPORTS: &str = "Financial Accounting Reports";

/// Statement variants behind the combined screen.
pub const STATEMENT_OPTIONS: [&str; 3] = ["Profit and Loss Statement", "Balance Sheet", "Cash Flow"];

/// Input widget of a filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterKind {
    /// A calendar date.
    Date,
    /// One of a fixed list of values.
    Select {
        /// Allowed values, in display order.
        options: Vec<String>,
    },
}

/// Relative date default. Resolved by the host, never here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateDefault {
    /// The current day.
    Today,
    /// A number of days before the current day.
    DaysBeforeToday(u32),
    /// First day of the current fiscal year.
    FiscalYearStart,
    /// Last day of the current fiscal year.
    FiscalYearEnd,
}

/// Default value of a filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterDefault {
    /// Relative date.
    Date(DateDefault),
    /// Preselected option.
    Option(String),
}

/// One filter of a report screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterField {
    /// Field name the value is submitted under.
    pub fieldname: String,
    /// Display label.
    pub label: String,
    /// Widget kind.
    pub kind: FilterKind,
    /// Whether the report refuses to run without a value.
    pub required: bool,
    /// Default value.
    pub default: Option<FilterDefault>,
}

impl FilterField {
    /// Creates a required date filter.
    #[must_use]
    pub fn date(fieldname: &str, label: &str, default: DateDefault) -> Self {
        Self {
            fieldname: fieldname.to_string(),
            label: label.to_string(),
            kind: FilterKind::Date,
            required: true,
            default: Some(FilterDefault::Date(default)),
        }
    }

    /// Creates a required select filter.
    #[must_use]
    pub fn select(fieldname: &str, label: &str, options: &[&str], default: &str) -> Self {
        Self {
            fieldname: fieldname.to_string(),
            label: label.to_string(),
            kind: FilterKind::Select {
                options: options.iter().map(ToString::to_string).collect(),
            },
            required: true,
            default: Some(FilterDefault::Option(default.to_string())),
        }
    }

    /// Marks the filter optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Options of a select filter; empty for other kinds.
    #[must_use]
    pub fn options(&self) -> &[String] {
        match &self.kind {
            FilterKind::Select { options } => options,
            FilterKind::Date => &[],
        }
    }
}

/// Everything the renderer needs to know about one report screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDefinition {
    /// Unique report name.
    pub name: String,
    /// How rows nest.
    pub hierarchy: HierarchyConfig,
    /// Filters in display order.
    pub filters: Vec<FilterField>,
}

impl ReportDefinition {
    /// Creates a definition with no filters.
    #[must_use]
    pub fn new(name: impl Into<String>, hierarchy: HierarchyConfig) -> Self {
        Self {
            name: name.into(),
            hierarchy,
            filters: Vec::new(),
        }
    }

    /// Appends a filter.
    #[must_use]
    pub fn with_filter(mut self, filter: FilterField) -> Self {
        self.filters.push(filter);
        self
    }

    /// Looks up a filter by field name.
    #[must_use]
    pub fn filter(&self, fieldname: &str) -> Option<&FilterField> {
        self.filters.iter().find(|f| f.fieldname == fieldname)
    }

    /// Profit and loss over the last 90 days.
    #[must_use]
    pub fn custom_pnl() -> Self {
        Self::new(CUSTOM_PNL_REPORT, HierarchyConfig::new())
            .with_filter(FilterField::date(
                FROM_DATE,
                "From Date",
                DateDefault::DaysBeforeToday(90),
            ))
            .with_filter(FilterField::date(TO_DATE, "To Date", DateDefault::Today))
    }

    /// Year-over-year comparison over the current fiscal year.
    #[must_use]
    pub fn delta() -> Self {
        Self::new(DELTA_REPORT, HierarchyConfig::new()).with_fiscal_year_range()
    }

    /// Ledger tree for the selected statement over the current fiscal year.
    #[must_use]
    pub fn financial_accounting() -> Self {
        Self::new(
            FINANCIAL_ACCOUNTING_REPORTS,
            HierarchyConfig::new().with_fields("ledger_code", "group"),
        )
        .with_fiscal_year_range()
        .with_filter(FilterField::select(
            REPORT,
            "Report",
            &STATEMENT_OPTIONS,
            "Balance Sheet",
        ))
    }

    fn with_fiscal_year_range(self) -> Self {
        self.with_filter(FilterField::date(
            FROM_DATE,
            "From Date",
            DateDefault::FiscalYearStart,
        ))
        .with_filter(FilterField::date(
            TO_DATE,
            "To Date",
            DateDefault::FiscalYearEnd,
        ))
    }
}
