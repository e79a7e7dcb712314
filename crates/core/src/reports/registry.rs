//! Report definition lookup.

use super::definition::ReportDefinition;
use super::error::ReportError;

/// Set of report screens known to a caller.
///
/// Owned by whoever renders reports; there is no process-wide registry.
#[derive(Debug, Clone, Default)]
pub struct ReportRegistry {
    reports: Vec<ReportDefinition>,
}

impl ReportRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the three standard report screens.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(ReportDefinition::custom_pnl());
        registry.register(ReportDefinition::delta());
        registry.register(ReportDefinition::financial_accounting());
        registry
    }

    /// Adds a definition, replacing any with the same name in place.
    pub fn register(&mut self, definition: ReportDefinition) {
        match self.reports.iter_mut().find(|r| r.name == definition.name) {
            Some(existing) => *existing = definition,
            None => self.reports.push(definition),
        }
    }

    /// Looks up a definition by name.
    pub fn get(&self, name: &str) -> Result<&ReportDefinition, ReportError> {
        self.reports
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| ReportError::UnknownReport(name.to_string()))
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.reports.iter().map(|r| r.name.as_str())
    }

    /// Number of registered reports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}
