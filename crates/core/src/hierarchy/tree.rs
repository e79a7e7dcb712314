//! Tree construction and interaction.

use std::collections::HashMap;

use ledgerview_shared::types::RowId;
use serde::Serialize;
use tracing::{debug, warn};

use super::error::HierarchyError;
use super::types::{HierarchyConfig, RenderNode, Row};

/// Render model of one report execution.
///
/// Nodes are stored flat, in source row order; structure is carried by
/// parent and child indices so no operation recurses per level.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportTree {
    nodes: Vec<RenderNode>,
    roots: Vec<usize>,
    #[serde(skip)]
    index: HashMap<RowId, usize>,
}

impl ReportTree {
    /// Builds the render tree for `rows`.
    ///
    /// Rows whose parent is missing, unknown, or part of a parent cycle
    /// become roots. Children keep their input order.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::DuplicateKey`] if two rows share an id.
    pub fn build(rows: Vec<Row>, config: &HierarchyConfig) -> Result<Self, HierarchyError> {
        let mut index: HashMap<RowId, usize> = HashMap::with_capacity(rows.len());
        for (idx, row) in rows.iter().enumerate() {
            if index.insert(row.id.clone(), idx).is_some() {
                return Err(HierarchyError::DuplicateKey(row.id.clone()));
            }
        }

        let mut dangling = 0usize;
        let mut parents: Vec<Option<usize>> = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                let parent_id = row.parent_id.as_ref()?;
                match index.get(parent_id) {
                    Some(&parent) if parent != idx => Some(parent),
                    Some(_) => None,
                    None => {
                        dangling += 1;
                        None
                    }
                }
            })
            .collect();

        let cyclic = cycle_members(&parents);
        if !cyclic.is_empty() {
            warn!(rows = cyclic.len(), "parent cycle detected, promoting rows to roots");
            for idx in cyclic {
                parents[idx] = None;
            }
        }
        if dangling > 0 {
            debug!(rows = dangling, "unresolved parent keys, treating rows as roots");
        }

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); rows.len()];
        let mut roots = Vec::new();
        for (idx, parent) in parents.iter().enumerate() {
            match parent {
                Some(parent) => children[*parent].push(idx),
                None => roots.push(idx),
            }
        }

        let nodes = rows
            .into_iter()
            .zip(parents)
            .zip(children)
            .map(|((row, parent), children)| RenderNode {
                row,
                depth: 0,
                expanded: false,
                visible: false,
                parent,
                children,
            })
            .collect();

        let mut tree = Self {
            nodes,
            roots,
            index,
        };
        tree.layout(config.effective_initial_depth());

        debug!(rows = tree.len(), roots = tree.roots.len(), "built report tree");
        Ok(tree)
    }

    /// Assigns depth, default expansion and visibility top-down.
    fn layout(&mut self, initial_depth: usize) {
        let mut placed = vec![false; self.nodes.len()];
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        for &root in &self.roots {
            self.nodes[root].visible = true;
        }

        while let Some(idx) = stack.pop() {
            // Visited guard; cycles are already cut, so this never fires.
            if std::mem::replace(&mut placed[idx], true) {
                continue;
            }
            let node = &mut self.nodes[idx];
            node.expanded = node.depth < initial_depth;
            let (depth, show) = (node.depth + 1, node.visible && node.expanded);

            for k in 0..self.nodes[idx].children.len() {
                let child = self.nodes[idx].children[k];
                let child_node = &mut self.nodes[child];
                child_node.depth = depth;
                child_node.visible = show;
                stack.push(child);
            }
        }
    }

    /// Recomputes visibility of every descendant of `from`.
    fn refresh_visibility(&mut self, from: usize) {
        let mut stack = vec![from];
        while let Some(idx) = stack.pop() {
            let show = self.nodes[idx].visible && self.nodes[idx].expanded;
            for k in 0..self.nodes[idx].children.len() {
                let child = self.nodes[idx].children[k];
                self.nodes[child].visible = show;
                stack.push(child);
            }
        }
    }

    /// Top-level nodes in source order.
    pub fn roots(&self) -> impl ExactSizeIterator<Item = &RenderNode> + '_ {
        self.roots.iter().map(|&idx| &self.nodes[idx])
    }

    /// All nodes in source row order.
    #[must_use]
    pub fn nodes(&self) -> &[RenderNode] {
        &self.nodes
    }

    /// Children of `node` in source order.
    pub fn children<'a>(
        &'a self,
        node: &'a RenderNode,
    ) -> impl ExactSizeIterator<Item = &'a RenderNode> + 'a {
        node.children.iter().map(|&idx| &self.nodes[idx])
    }

    /// Parent of `node`, if it is not a root.
    #[must_use]
    pub fn parent(&self, node: &RenderNode) -> Option<&RenderNode> {
        node.parent.map(|idx| &self.nodes[idx])
    }

    /// Total number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a node by row key.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&RenderNode> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    /// Flips the expansion of the node with key `id`.
    ///
    /// Only descendants' visibility changes; no other node's `expanded`
    /// flag is touched. Returns false, leaving the tree unchanged, if no
    /// node has that key.
    pub fn toggle(&mut self, id: &str) -> bool {
        let Some(&idx) = self.index.get(id) else {
            debug!(id, "toggle ignored, unknown row");
            return false;
        };
        self.nodes[idx].expanded = !self.nodes[idx].expanded;
        self.refresh_visibility(idx);
        true
    }

    /// Expands every node.
    pub fn expand_all(&mut self) {
        self.set_all_expanded(true);
    }

    /// Collapses every node.
    pub fn collapse_all(&mut self) {
        self.set_all_expanded(false);
    }

    fn set_all_expanded(&mut self, expanded: bool) {
        for node in &mut self.nodes {
            node.expanded = expanded;
            node.visible = expanded || node.parent.is_none();
        }
    }

    /// Visible nodes in depth-first pre-order.
    ///
    /// Every call starts a fresh traversal.
    #[must_use]
    pub fn flatten_visible(&self) -> VisibleNodes<'_> {
        VisibleNodes {
            nodes: &self.nodes,
            stack: vec![self.roots.iter()],
        }
    }

    /// All nodes in depth-first pre-order, regardless of visibility.
    #[must_use]
    pub fn iter(&self) -> Nodes<'_> {
        Nodes {
            nodes: &self.nodes,
            stack: vec![self.roots.iter()],
        }
    }
}

/// Indices of rows whose parent chain loops back on itself.
fn cycle_members(parents: &[Option<usize>]) -> Vec<usize> {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Unseen,
        OnPath,
        Done,
    }

    let mut state = vec![State::Unseen; parents.len()];
    let mut members = Vec::new();

    for start in 0..parents.len() {
        let mut path = Vec::new();
        let mut current = Some(start);
        while let Some(idx) = current {
            match state[idx] {
                State::Done => break,
                State::OnPath => {
                    if let Some(pos) = path.iter().position(|&p| p == idx) {
                        members.extend_from_slice(&path[pos..]);
                    }
                    break;
                }
                State::Unseen => {
                    state[idx] = State::OnPath;
                    path.push(idx);
                    current = parents[idx];
                }
            }
        }
        for idx in path {
            state[idx] = State::Done;
        }
    }

    members
}

/// Iterator over visible nodes. See [`ReportTree::flatten_visible`].
pub struct VisibleNodes<'a> {
    nodes: &'a [RenderNode],
    stack: Vec<std::slice::Iter<'a, usize>>,
}

impl<'a> Iterator for VisibleNodes<'a> {
    type Item = &'a RenderNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(top) = self.stack.last_mut() {
            let Some(&idx) = top.next() else {
                self.stack.pop();
                continue;
            };
            let node = &self.nodes[idx];
            if node.visible {
                if node.expanded {
                    self.stack.push(node.children.iter());
                }
                return Some(node);
            }
        }
        None
    }
}

/// Iterator over all nodes. See [`ReportTree::iter`].
pub struct Nodes<'a> {
    nodes: &'a [RenderNode],
    stack: Vec<std::slice::Iter<'a, usize>>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a RenderNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(top) = self.stack.last_mut() {
            if let Some(&idx) = top.next() {
                let node = &self.nodes[idx];
                self.stack.push(node.children.iter());
                return Some(node);
            }
            self.stack.pop();
        }
        None
    }
}

impl<'a> IntoIterator for &'a ReportTree {
    type Item = &'a RenderNode;
    type IntoIter = Nodes<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
