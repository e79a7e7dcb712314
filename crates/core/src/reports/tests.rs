//! Tests for reports module.

use chrono::NaiveDate;
use ledgerview_shared::AppError;
use rstest::rstest;
use serde_json::json;

use super::definition::{
    CUSTOM_PNL_REPORT, DELTA_REPORT, DateDefault, FINANCIAL_ACCOUNTING_REPORTS, FilterDefault,
    FilterField, REPORT, ReportDefinition,
};
use super::error::ReportError;
use super::filters::ReportFilters;
use super::registry::ReportRegistry;
use super::view::{RecordSource, ReportView, RowSource};
use crate::hierarchy::{HierarchyConfig, HierarchyError, Row};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn fiscal_year() -> ReportFilters {
    ReportFilters::range(date(2026, 1, 1), date(2026, 12, 31))
}

fn ledger_records() -> Vec<serde_json::Value> {
    vec![
        json!({"ledger_code": "Asset", "ledger_name": "Assets"}),
        json!({"ledger_code": "1100", "group": "Asset", "ledger_name": "Cash"}),
        json!({"ledger_code": "1200", "group": "Asset", "ledger_name": "Bank"}),
        json!({"ledger_code": "Liability", "ledger_name": "Liabilities"}),
        json!({"ledger_code": "2100", "group": "Liability", "ledger_name": "Payables"}),
    ]
}

struct FailingSource;

impl RowSource for FailingSource {
    fn fetch(&self, _: &ReportDefinition, _: &ReportFilters) -> Result<Vec<Row>, ReportError> {
        Err(ReportError::RowSource("timeout".to_string()))
    }
}

#[test]
fn test_builtin_registry_has_three_reports() {
    let registry = ReportRegistry::builtin();
    let names: Vec<_> = registry.names().collect();
    assert_eq!(
        names,
        vec![CUSTOM_PNL_REPORT, DELTA_REPORT, FINANCIAL_ACCOUNTING_REPORTS]
    );
}

#[test]
fn test_unknown_report() {
    let registry = ReportRegistry::builtin();
    let err = registry.get("Cash Book").unwrap_err();
    assert!(matches!(err, ReportError::UnknownReport(ref name) if name == "Cash Book"));
    assert_eq!(AppError::from(err).exit_code(), 64);
}

#[test]
fn test_register_replaces_same_name() {
    let mut registry = ReportRegistry::builtin();
    registry.register(ReportDefinition::new(
        DELTA_REPORT,
        HierarchyConfig::new().with_initial_depth(2),
    ));
    assert_eq!(registry.len(), 3);
    assert_eq!(
        registry.get(DELTA_REPORT).unwrap().hierarchy.initial_depth,
        2
    );
}

#[test]
fn test_financial_accounting_definition() {
    let def = ReportDefinition::financial_accounting();
    assert_eq!(def.hierarchy.name_field, "ledger_code");
    assert_eq!(def.hierarchy.parent_field, "group");
    assert_eq!(def.hierarchy.initial_depth, 0);

    let report = def.filter(REPORT).unwrap();
    assert!(report.required);
    assert_eq!(
        report.options(),
        ["Profit and Loss Statement", "Balance Sheet", "Cash Flow"]
    );
    assert_eq!(
        report.default,
        Some(FilterDefault::Option("Balance Sheet".to_string()))
    );
}

#[rstest]
#[case(ReportDefinition::custom_pnl(), DateDefault::DaysBeforeToday(90), DateDefault::Today)]
#[case(ReportDefinition::delta(), DateDefault::FiscalYearStart, DateDefault::FiscalYearEnd)]
#[case(
    ReportDefinition::financial_accounting(),
    DateDefault::FiscalYearStart,
    DateDefault::FiscalYearEnd
)]
fn test_date_defaults(
    #[case] def: ReportDefinition,
    #[case] from: DateDefault,
    #[case] to: DateDefault,
) {
    assert_eq!(
        def.filter("from_date").unwrap().default,
        Some(FilterDefault::Date(from))
    );
    assert_eq!(
        def.filter("to_date").unwrap().default,
        Some(FilterDefault::Date(to))
    );
}

#[test]
fn test_validate_accepts_complete_filters() {
    let def = ReportDefinition::financial_accounting();
    let filters = fiscal_year().with_report("Balance Sheet");
    assert!(filters.validate(&def).is_ok());
}

#[test]
fn test_validate_missing_required_date() {
    let def = ReportDefinition::delta();
    let filters = ReportFilters {
        from_date: Some(date(2026, 1, 1)),
        ..ReportFilters::default()
    };
    let err = filters.validate(&def).unwrap_err();
    assert!(matches!(err, ReportError::MissingFilter(ref f) if f == "to_date"));
}

#[test]
fn test_missing_report_selection_takes_declared_default() {
    let def = ReportDefinition::financial_accounting();
    let filters = fiscal_year().with_defaults(&def);
    assert_eq!(filters.report.as_deref(), Some("Balance Sheet"));
    assert!(filters.validate(&def).is_ok());
}

#[test]
fn test_defaults_keep_explicit_selection() {
    let def = ReportDefinition::financial_accounting();
    let filters = fiscal_year().with_report("Cash Flow").with_defaults(&def);
    assert_eq!(filters.report.as_deref(), Some("Cash Flow"));
}

#[test]
fn test_required_selection_without_default_is_missing() {
    let def = ReportDefinition::new("Ledger", HierarchyConfig::new()).with_filter(FilterField {
        default: None,
        ..FilterField::select(REPORT, "Report", &["A", "B"], "A")
    });
    let filters = ReportFilters::default().with_defaults(&def);
    assert_eq!(filters.report, None);
    let err = filters.validate(&def).unwrap_err();
    assert!(matches!(err, ReportError::MissingFilter(ref f) if f == "report"));

    let err = ReportView::execute(&def, &ReportFilters::default(), &FailingSource).unwrap_err();
    assert!(matches!(err, ReportError::MissingFilter(ref f) if f == "report"));
}

#[test]
fn test_execute_without_selection_uses_default_report() {
    let def = ReportDefinition::financial_accounting();
    let view = ReportView::execute(&def, &fiscal_year(), &RecordSource::new(ledger_records()))
        .unwrap();
    assert_eq!(view.flatten_visible().count(), 2);
}

struct SelectionSource;

impl RowSource for SelectionSource {
    fn fetch(
        &self,
        _: &ReportDefinition,
        filters: &ReportFilters,
    ) -> Result<Vec<Row>, ReportError> {
        Ok(vec![Row::root(filters.report.clone().unwrap_or_default())])
    }
}

#[test]
fn test_execute_fetches_with_resolved_selection() {
    let def = ReportDefinition::financial_accounting();
    let view = ReportView::execute(&def, &fiscal_year(), &SelectionSource).unwrap();
    assert!(view.find("Balance Sheet").is_some());
}

#[test]
fn test_validate_optional_filter_may_be_empty() {
    let def = ReportDefinition::new("Ledger", HierarchyConfig::new())
        .with_filter(FilterField::date("from_date", "From Date", DateDefault::Today))
        .with_filter(FilterField::select("report", "Report", &["A", "B"], "A").optional());
    assert!(ReportFilters::range(date(2026, 1, 1), date(2026, 1, 1))
        .validate(&def)
        .is_ok());
}

#[test]
fn test_validate_rejects_unknown_option() {
    let def = ReportDefinition::financial_accounting();
    let err = fiscal_year()
        .with_report("Trial Balance")
        .validate(&def)
        .unwrap_err();
    assert!(matches!(err, ReportError::InvalidOption { ref value, .. } if value == "Trial Balance"));
    assert_eq!(AppError::from(err).error_code(), "VALIDATION_ERROR");
}

#[test]
fn test_validate_rejects_inverted_range() {
    let def = ReportDefinition::custom_pnl();
    let err = ReportFilters::range(date(2026, 3, 1), date(2026, 2, 1))
        .validate(&def)
        .unwrap_err();
    assert!(matches!(err, ReportError::InvalidDateRange { .. }));
    assert_eq!(
        err.to_string(),
        "Invalid date range: start 2026-03-01 is after end 2026-02-01"
    );
}

#[test]
fn test_execute_builds_collapsed_ledger_tree() {
    let def = ReportDefinition::financial_accounting();
    let source = RecordSource::new(ledger_records());
    let mut view =
        ReportView::execute(&def, &fiscal_year().with_report("Balance Sheet"), &source).unwrap();

    let ids: Vec<_> = view.flatten_visible().map(|n| n.id().to_string()).collect();
    assert_eq!(ids, vec!["Asset", "Liability"]);

    assert!(view.toggle("Asset"));
    let rows: Vec<_> = view
        .flatten_visible()
        .map(|n| (n.row.label().to_string(), n.depth))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("Assets".to_string(), 0),
            ("Cash".to_string(), 1),
            ("Bank".to_string(), 1),
            ("Liabilities".to_string(), 0),
        ]
    );
}

#[test]
fn test_execute_validates_before_fetching() {
    let def = ReportDefinition::custom_pnl();
    let err = ReportView::execute(&def, &ReportFilters::default(), &FailingSource).unwrap_err();
    assert!(matches!(err, ReportError::MissingFilter(_)));
}

#[test]
fn test_execute_surfaces_row_source_failure() {
    let def = ReportDefinition::custom_pnl();
    let err = ReportView::execute(&def, &fiscal_year(), &FailingSource).unwrap_err();
    assert!(matches!(err, ReportError::RowSource(_)));
    assert_eq!(AppError::from(err).exit_code(), 69);
}

#[test]
fn test_execute_duplicate_rows() {
    let def = ReportDefinition::delta();
    let rows = vec![Row::root("x"), Row::root("x")];
    let err = ReportView::execute(&def, &fiscal_year(), &rows).unwrap_err();
    assert!(matches!(
        err,
        ReportError::Hierarchy(HierarchyError::DuplicateKey(ref id)) if id.as_str() == "x"
    ));
    assert_eq!(AppError::from(err).error_code(), "CONFLICT");
}

#[test]
fn test_from_records_missing_name_field() {
    let def = ReportDefinition::financial_accounting();
    let err = ReportView::from_records(&def, vec![json!({"group": "Asset"})]).unwrap_err();
    assert!(matches!(
        err,
        ReportError::Hierarchy(HierarchyError::MissingKey { .. })
    ));
}

#[test]
fn test_expand_and_collapse_view() {
    let def = ReportDefinition::financial_accounting();
    let mut view = ReportView::from_records(&def, ledger_records()).unwrap();
    assert_eq!(view.name(), FINANCIAL_ACCOUNTING_REPORTS);

    view.expand_all();
    assert_eq!(view.flatten_visible().count(), 5);

    view.collapse_all();
    assert_eq!(view.flatten_visible().count(), 2);
    assert!(view.find("1100").is_some_and(|n| !n.visible));
}
