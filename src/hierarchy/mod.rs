//! Flat parent-referencing records to a renderable forest.
//!
//! The backing store hands out audit areas (and similar records) as a flat list where
//! each record names its parent. Everything in here is pure and synchronous: build the
//! forest, filter it by a search term, count it, guard parent reassignment, and flatten
//! it into outline rows for whatever output layer is in use.

pub mod builder;
pub mod error;
pub mod filter;
pub mod guard;
pub mod node;
pub mod outline;

pub use builder::{build_tree, build_tree_with};
pub use error::HierarchyError;
pub use filter::{count_all_nodes, filter_tree};
pub use guard::{eligible_parents, validate_parent_assignment};
pub use node::{Forest, Hierarchical, ParentScope, RootSentinel, TreeNode};
pub use outline::{render_outline, ExpandState, OutlineRow};
