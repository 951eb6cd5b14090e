use std::collections::HashSet;

use serde::Serialize;

use super::node::{Hierarchical, TreeNode};

/// Expanded node ids, owned by whoever renders the forest.
///
/// Kept apart from the nodes so that rebuilding the forest does not lose it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandState {
    expanded: HashSet<i64>,
}

impl ExpandState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from the `is_expanded` flags a filter pass set.
    pub fn from_forest<T: Hierarchical>(roots: &[TreeNode<T>]) -> Self {
        let mut state = Self::new();
        visit(roots, &mut |node: &TreeNode<T>| {
            if node.is_expanded {
                state.expanded.insert(node.id());
            }
        });
        state
    }

    pub fn is_expanded(&self, id: i64) -> bool {
        self.expanded.contains(&id)
    }

    pub fn expand(&mut self, id: i64) {
        self.expanded.insert(id);
    }

    pub fn collapse(&mut self, id: i64) {
        self.expanded.remove(&id);
    }

    /// Returns the new state of `id`.
    pub fn toggle(&mut self, id: i64) -> bool {
        if self.expanded.remove(&id) {
            false
        } else {
            self.expanded.insert(id);
            true
        }
    }

    pub fn expand_all<T: Hierarchical>(&mut self, roots: &[TreeNode<T>]) {
        visit(roots, &mut |node: &TreeNode<T>| {
            if !node.is_leaf() {
                self.expanded.insert(node.id());
            }
        });
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}

fn visit<T: Hierarchical>(nodes: &[TreeNode<T>], f: &mut impl FnMut(&TreeNode<T>)) {
    for node in nodes {
        f(node);
        visit(&node.children, f);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineRow {
    pub depth: usize,
    pub id: i64,
    pub name: String,
    pub active: bool,
    pub entries_count: usize,
    pub has_children: bool,
    pub expanded: bool,
}

/// Flatten the forest into display rows, skipping the children of collapsed nodes.
pub fn render_outline<T: Hierarchical>(roots: &[TreeNode<T>], state: &ExpandState) -> Vec<OutlineRow> {
    let mut rows = Vec::new();
    push_rows(roots, 0, state, &mut rows);
    rows
}

fn push_rows<T: Hierarchical>(
    nodes: &[TreeNode<T>],
    depth: usize,
    state: &ExpandState,
    rows: &mut Vec<OutlineRow>,
) {
    for node in nodes {
        let expanded = state.is_expanded(node.id());
        rows.push(OutlineRow {
            depth,
            id: node.id(),
            name: node.name().to_string(),
            active: node.record.is_active(),
            entries_count: node.entries_count,
            has_children: !node.is_leaf(),
            expanded,
        });
        if expanded {
            push_rows(&node.children, depth + 1, state, rows);
        }
    }
}
