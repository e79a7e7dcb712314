//! Ledgerview report viewer
//!
//! Renders a JSON file of report rows as an indented tree.
//!
//! Usage: ledgerview rows.json --from-date 2026-01-01 --to-date 2026-12-31 [--select "Cash Flow"]
//!
//! Failures exit with the `sysexits.h` status of the underlying [`AppError`].

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ledgerview_core::hierarchy::RenderNode;
use ledgerview_core::reports::{
    RecordSource, ReportError, ReportFilters, ReportRegistry, ReportView,
};
use ledgerview_shared::{AppConfig, AppError};

#[derive(Parser)]
#[command(name = "ledgerview")]
#[command(about = "Render report rows as an expandable tree")]
struct Cli {
    /// JSON file holding an array of row records
    rows: PathBuf,

    /// Report definition to render with (defaults to the configured report)
    #[arg(long)]
    report: Option<String>,

    /// Start of the reporting period
    #[arg(long)]
    from_date: NaiveDate,

    /// End of the reporting period
    #[arg(long)]
    to_date: NaiveDate,

    /// Report variant for reports with a selector (defaults to the declared variant)
    #[arg(long)]
    select: Option<String>,

    /// Override the initial expansion depth
    #[arg(long, allow_negative_numbers = true)]
    depth: Option<i64>,

    /// Toggle a row by key; may be repeated and is applied in order
    #[arg(long = "toggle")]
    toggles: Vec<String>,

    /// Expand every row before applying toggles
    #[arg(long)]
    expand_all: bool,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ledgerview=info,ledgerview_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let app = classify(err);
            eprintln!("error [{}]: {app}", app.error_code());
            ExitCode::from(app.exit_code())
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load().map_err(AppError::from)?;

    let registry = ReportRegistry::builtin();
    let report_name = cli.report.as_deref().unwrap_or(&config.viewer.default_report);
    let mut definition = registry.get(report_name)?.clone();
    if let Some(depth) = cli.depth.or(config.viewer.initial_depth) {
        definition.hierarchy.initial_depth = depth;
    }

    let records = read_records(&cli.rows)?;
    info!(path = %cli.rows.display(), records = records.len(), "loaded rows");

    let mut filters = ReportFilters::range(cli.from_date, cli.to_date);
    filters.report = cli.select;

    let mut view = ReportView::execute(&definition, &filters, &RecordSource::new(records))?;
    if cli.expand_all {
        view.expand_all();
    }
    for id in &cli.toggles {
        if !view.toggle(id) {
            warn!(id = %id, "no row with this key");
        }
    }

    for line in render_lines(&view, config.viewer.indent_width) {
        println!("{line}");
    }

    Ok(())
}

fn read_records(path: &std::path::Path) -> Result<Vec<serde_json::Value>, AppError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| AppError::NotFound(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&raw).map_err(|e| {
        AppError::Validation(format!(
            "{} must hold a JSON array of records: {e}",
            path.display()
        ))
    })
}

/// Maps a failure onto the shared error type that decides the exit status.
fn classify(err: anyhow::Error) -> AppError {
    let err = match err.downcast::<AppError>() {
        Ok(app) => return app,
        Err(err) => err,
    };
    match err.downcast::<ReportError>() {
        Ok(report) => AppError::from(report),
        Err(other) => AppError::Internal(format!("{other:#}")),
    }
}

/// One text line per visible row.
fn render_lines(view: &ReportView, indent_width: usize) -> Vec<String> {
    view.flatten_visible()
        .map(|node| render_line(node, indent_width))
        .collect()
}

fn render_line(node: &RenderNode, indent_width: usize) -> String {
    let indent = " ".repeat(node.depth * indent_width);
    let marker = match (node.has_children(), node.expanded) {
        (false, _) => ' ',
        (true, true) => '-',
        (true, false) => '+',
    };
    let id = node.id().as_str();
    let label = node.row.label();
    if label == id {
        format!("{indent}{marker} {id}")
    } else {
        format!("{indent}{marker} {id}  {label}")
    }
}
