use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A record that points at its parent by id.
pub trait Hierarchical {
    fn id(&self) -> i64;
    fn parent_id(&self) -> Option<i64>;
    fn name(&self) -> &str;

    fn is_active(&self) -> bool {
        true
    }
}

/// A record linked into the forest.
///
/// Serializes as the record's own fields plus `children`, `entriesCount` and `isExpanded`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode<T> {
    #[serde(flatten)]
    pub record: T,
    pub children: Vec<TreeNode<T>>,
    /// Number of strict descendants in the unfiltered tree.
    pub entries_count: usize,
    pub is_expanded: bool,
}

impl<T: Hierarchical> TreeNode<T> {
    pub fn id(&self) -> i64 {
        self.record.id()
    }

    pub fn name(&self) -> &str {
        self.record.name()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Depth-first search for a node by id.
    pub fn find(&self, id: i64) -> Option<&TreeNode<T>> {
        if self.id() == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forest<T> {
    pub roots: Vec<TreeNode<T>>,
    /// Records left out because their ancestry ends at a parent id that does not exist.
    pub orphans: Vec<i64>,
}

impl<T: Hierarchical + Clone> Forest<T> {
    pub fn filter(&self, term: &str) -> Forest<T> {
        Forest {
            roots: super::filter_tree(&self.roots, term),
            orphans: self.orphans.clone(),
        }
    }

    pub fn count_all_nodes(&self) -> usize {
        super::count_all_nodes(&self.roots)
    }

    pub fn find(&self, id: i64) -> Option<&TreeNode<T>> {
        self.roots.iter().find_map(|root| root.find(id))
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Which parent values mark a record as a root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RootSentinel {
    /// Only a missing parent id. A record naming itself is a one-record cycle.
    #[default]
    Null,
    /// A missing parent id, or a parent id equal to the record's own id.
    NullOrSelf,
}

impl RootSentinel {
    /// The parent a record is linked under, or `None` when it is a root.
    pub fn parent_of<T: Hierarchical + ?Sized>(self, record: &T) -> Option<i64> {
        match (record.parent_id(), self) {
            (Some(parent), RootSentinel::NullOrSelf) if parent == record.id() => None,
            (parent, _) => parent,
        }
    }
}

impl FromStr for RootSentinel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "null" => Ok(RootSentinel::Null),
            "null-or-self" | "self" => Ok(RootSentinel::NullOrSelf),
            other => Err(format!("unknown root sentinel '{}'", other)),
        }
    }
}

/// Which records a parent picker offers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParentScope {
    #[default]
    RootsOnly,
    AnyNonDescendant,
}

impl FromStr for ParentScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "roots" | "roots-only" => Ok(ParentScope::RootsOnly),
            "any" | "any-non-descendant" => Ok(ParentScope::AnyNonDescendant),
            other => Err(format!("unknown parent scope '{}'", other)),
        }
    }
}
