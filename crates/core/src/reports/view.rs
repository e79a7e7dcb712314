//! Report execution.

use serde_json::Value;
use tracing::{debug, info};

use super::definition::ReportDefinition;
use super::error::ReportError;
use super::filters::ReportFilters;
use crate::hierarchy::{HierarchyConfig, RenderNode, ReportTree, Row, VisibleNodes};

/// Supplies the rows of a report for validated filter values.
///
/// Rows come back already restricted to the requested period; the view does
/// not filter them again.
pub trait RowSource {
    /// Fetches rows for one execution.
    fn fetch(
        &self,
        definition: &ReportDefinition,
        filters: &ReportFilters,
    ) -> Result<Vec<Row>, ReportError>;
}

impl RowSource for Vec<Row> {
    fn fetch(&self, _: &ReportDefinition, _: &ReportFilters) -> Result<Vec<Row>, ReportError> {
        Ok(self.clone())
    }
}

/// Untyped records mapped through the report's name and parent fields.
#[derive(Debug, Clone, Default)]
pub struct RecordSource {
    records: Vec<Value>,
}

impl RecordSource {
    /// Wraps a list of records.
    #[must_use]
    pub fn new(records: Vec<Value>) -> Self {
        Self { records }
    }
}

impl RowSource for RecordSource {
    fn fetch(
        &self,
        definition: &ReportDefinition,
        _: &ReportFilters,
    ) -> Result<Vec<Row>, ReportError> {
        self.records
            .iter()
            .cloned()
            .map(|record| Row::from_record(record, &definition.hierarchy).map_err(ReportError::from))
            .collect()
    }
}

/// One rendered report: its definition's hierarchy settings and live tree.
#[derive(Debug, Clone)]
pub struct ReportView {
    name: String,
    hierarchy: HierarchyConfig,
    tree: ReportTree,
}

impl ReportView {
    /// Applies declared defaults, validates `filters`, fetches rows and
    /// builds the tree.
    pub fn execute<S>(
        definition: &ReportDefinition,
        filters: &ReportFilters,
        source: &S,
    ) -> Result<Self, ReportError>
    where
        S: RowSource + ?Sized,
    {
        let filters = filters.clone().with_defaults(definition);
        filters.validate(definition)?;
        let rows = source.fetch(definition, &filters)?;
        debug!(report = %definition.name, rows = rows.len(), "fetched report rows");

        let tree = ReportTree::build(rows, &definition.hierarchy)?;
        info!(
            report = %definition.name,
            nodes = tree.len(),
            initial_depth = definition.hierarchy.effective_initial_depth(),
            "report rendered"
        );

        Ok(Self {
            name: definition.name.clone(),
            hierarchy: definition.hierarchy.clone(),
            tree,
        })
    }

    /// Builds a view straight from records, skipping filter validation.
    pub fn from_records(
        definition: &ReportDefinition,
        records: Vec<Value>,
    ) -> Result<Self, ReportError> {
        let rows = RecordSource::new(records).fetch(definition, &ReportFilters::default())?;
        let tree = ReportTree::build(rows, &definition.hierarchy)?;
        Ok(Self {
            name: definition.name.clone(),
            hierarchy: definition.hierarchy.clone(),
            tree,
        })
    }

    /// Report name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hierarchy settings the tree was built with.
    #[must_use]
    pub fn hierarchy(&self) -> &HierarchyConfig {
        &self.hierarchy
    }

    /// The render tree.
    #[must_use]
    pub fn tree(&self) -> &ReportTree {
        &self.tree
    }

    /// See [`ReportTree::toggle`].
    pub fn toggle(&mut self, id: &str) -> bool {
        self.tree.toggle(id)
    }

    /// See [`ReportTree::expand_all`].
    pub fn expand_all(&mut self) {
        self.tree.expand_all();
    }

    /// See [`ReportTree::collapse_all`].
    pub fn collapse_all(&mut self) {
        self.tree.collapse_all();
    }

    /// See [`ReportTree::flatten_visible`].
    #[must_use]
    pub fn flatten_visible(&self) -> VisibleNodes<'_> {
        self.tree.flatten_visible()
    }

    /// Looks up a node by row key.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&RenderNode> {
        self.tree.find(id)
    }
}
