//! Hierarchical report rendering.
//!
//! Turns a flat list of parent-linked rows into an expandable/collapsible
//! tree:
//! - `ReportTree::build` resolves parents and computes depth, expansion and
//!   visibility for every row
//! - `ReportTree::toggle` flips one node and repropagates visibility
//! - `ReportTree::flatten_visible` yields the rows a table renderer draws

pub mod error;
pub mod tree;
pub mod types;


pub use error::HierarchyError;
pub use tree::{Nodes, ReportTree, VisibleNodes};
pub use types::{HierarchyConfig, RenderNode, Row};
