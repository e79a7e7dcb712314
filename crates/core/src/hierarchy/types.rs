//! Hierarchy data types.

use ledgerview_shared::types::RowId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::HierarchyError;

/// One report line.
///
/// Only `id` and `parent_id` carry meaning for the tree; `payload` (labels,
/// amounts, the original record) passes through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Unique key of the row.
    pub id: RowId,
    /// Key of the parent row, if any.
    pub parent_id: Option<RowId>,
    /// Opaque row data.
    #[serde(default)]
    pub payload: Value,
}

impl Row {
    /// Creates a row with an empty payload.
    #[must_use]
    pub fn new(id: impl Into<RowId>, parent_id: Option<RowId>) -> Self {
        Self {
            id: id.into(),
            parent_id,
            payload: Value::Null,
        }
    }

    /// Creates a root row.
    #[must_use]
    pub fn root(id: impl Into<RowId>) -> Self {
        Self::new(id, None)
    }

    /// Creates a row under `parent`.
    #[must_use]
    pub fn child(id: impl Into<RowId>, parent: impl Into<RowId>) -> Self {
        Self::new(id, Some(parent.into()))
    }

    /// Attaches a payload.
    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    /// Maps an untyped record through the configured name and parent fields.
    ///
    /// The whole record becomes the payload. A null, empty or absent parent
    /// field makes the row a root.
    pub fn from_record(record: Value, config: &HierarchyConfig) -> Result<Self, HierarchyError> {
        let id = record
            .get(&config.name_field)
            .and_then(key_from_value)
            .ok_or_else(|| HierarchyError::MissingKey {
                field: config.name_field.clone(),
            })?;
        let parent_id = record.get(&config.parent_field).and_then(key_from_value);

        Ok(Self {
            id,
            parent_id,
            payload: record,
        })
    }

    /// Returns a display label from the payload, falling back to the key.
    #[must_use]
    pub fn label(&self) -> &str {
        ["label", "ledger_name", "name"]
            .iter()
            .find_map(|field| self.payload.get(field).and_then(Value::as_str))
            .unwrap_or_else(|| self.id.as_str())
    }
}

fn key_from_value(value: &Value) -> Option<RowId> {
    match value {
        Value::String(s) if !s.is_empty() => Some(RowId::new(s.as_str())),
        Value::Number(n) => Some(RowId::new(number_key(n))),
        _ => None,
    }
}

/// Integral numbers share one spelling, so `1.0` and `1` are the same key.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn number_key(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f)
            if f.fract().abs() < f64::EPSILON
                && f >= i64::MIN as f64
                && f < i64::MAX as f64 =>
        {
            (f as i64).to_string()
        }
        _ => n.to_string(),
    }
}

/// How rows are linked and how deep the tree opens initially.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyConfig {
    /// Record field holding the row key.
    pub name_field: String,
    /// Record field holding the parent key.
    pub parent_field: String,
    /// Levels expanded on first render. Negative values act as 0.
    pub initial_depth: i64,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            name_field: "name".to_string(),
            parent_field: "parent".to_string(),
            initial_depth: 0,
        }
    }
}

impl HierarchyConfig {
    /// Creates a config with default field names.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name and parent fields.
    #[must_use]
    pub fn with_fields(
        mut self,
        name_field: impl Into<String>,
        parent_field: impl Into<String>,
    ) -> Self {
        self.name_field = name_field.into();
        self.parent_field = parent_field.into();
        self
    }

    /// Sets the initial expansion depth.
    #[must_use]
    pub const fn with_initial_depth(mut self, depth: i64) -> Self {
        self.initial_depth = depth;
        self
    }

    /// Initial depth clamped to zero.
    #[must_use]
    pub fn effective_initial_depth(&self) -> usize {
        usize::try_from(self.initial_depth).unwrap_or(0)
    }
}

/// Render state of one row.
///
/// Nodes live in a flat arena owned by [`ReportTree`](super::ReportTree);
/// `parent` and `children` are indices into it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderNode {
    /// The source row.
    pub row: Row,
    /// Number of ancestors.
    pub depth: usize,
    /// Whether children are shown when this node is visible.
    pub expanded: bool,
    /// Whether this node is drawn.
    pub visible: bool,
    /// Index of the parent node, `None` for roots.
    pub parent: Option<usize>,
    /// Indices of child nodes in source row order.
    pub children: Vec<usize>,
}

impl RenderNode {
    /// Key of the underlying row.
    #[must_use]
    pub fn id(&self) -> &RowId {
        &self.row.id
    }

    /// Returns true if the node has at least one child.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns true if the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
