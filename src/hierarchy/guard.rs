use std::collections::{HashMap, HashSet};

use super::error::HierarchyError;
use super::node::{Hierarchical, ParentScope, RootSentinel};

/// Check that `node_id` may be placed under `candidate_parent_id`.
///
/// Moving to the top level (`None`) is always allowed. Otherwise the candidate must exist,
/// must not be the node itself, and must not have the node anywhere in its ancestry.
/// `sentinel` decides whether a record naming itself as parent ends the ancestry walk
/// or is reported as a one-record cycle.
pub fn validate_parent_assignment<T: Hierarchical>(
    candidate_parent_id: Option<i64>,
    node_id: i64,
    records: &[T],
    sentinel: RootSentinel,
) -> Result<(), HierarchyError> {
    let Some(candidate) = candidate_parent_id else {
        return Ok(());
    };
    if candidate == node_id {
        return Err(HierarchyError::SelfParent(node_id));
    }

    let parents: HashMap<i64, Option<i64>> = records
        .iter()
        .map(|record| (record.id(), sentinel.parent_of(record)))
        .collect();
    if !parents.contains_key(&candidate) {
        return Err(HierarchyError::UnknownParent(candidate));
    }

    let mut chain = vec![candidate];
    let mut seen = HashSet::from([candidate]);
    let mut current = candidate;
    loop {
        let parent = match parents.get(&current) {
            Some(Some(parent)) => *parent,
            _ => return Ok(()),
        };

        if parent == node_id {
            chain.push(parent);
            return Err(HierarchyError::WouldCreateCycle {
                node_id,
                candidate_parent_id: candidate,
                chain,
            });
        }

        if !seen.insert(parent) {
            let start = chain.iter().position(|&id| id == parent).unwrap_or(0);
            let mut ids = chain[start..].to_vec();
            ids.sort_unstable();
            return Err(HierarchyError::Cycle { ids });
        }

        chain.push(parent);
        current = parent;
    }
}

/// Ids that may be offered as a parent for `node_id` (or for a new record when `None`).
///
/// The node and its subtree are never eligible, nor is a record whose ancestry loops.
/// Input order is kept.
pub fn eligible_parents<T: Hierarchical>(
    node_id: Option<i64>,
    records: &[T],
    scope: ParentScope,
    sentinel: RootSentinel,
) -> Vec<i64> {
    let excluded = match node_id {
        Some(id) => subtree_ids(id, records, sentinel),
        None => HashSet::new(),
    };

    records
        .iter()
        .filter(|record| !excluded.contains(&record.id()))
        .filter(|record| match scope {
            ParentScope::RootsOnly => sentinel.parent_of(*record).is_none(),
            ParentScope::AnyNonDescendant => true,
        })
        .filter(|record| !in_cycle(record.id(), records, sentinel))
        .map(|record| record.id())
        .collect()
}

/// True when the ancestry of `id` runs into a loop.
fn in_cycle<T: Hierarchical>(id: i64, records: &[T], sentinel: RootSentinel) -> bool {
    let parents: HashMap<i64, Option<i64>> = records
        .iter()
        .map(|record| (record.id(), sentinel.parent_of(record)))
        .collect();

    let mut seen = HashSet::from([id]);
    let mut current = id;
    while let Some(Some(parent)) = parents.get(&current) {
        if !seen.insert(*parent) {
            return true;
        }
        current = *parent;
    }
    false
}

fn subtree_ids<T: Hierarchical>(root: i64, records: &[T], sentinel: RootSentinel) -> HashSet<i64> {
    let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
    for record in records {
        if let Some(parent) = sentinel.parent_of(record) {
            children.entry(parent).or_default().push(record.id());
        }
    }

    let mut seen = HashSet::from([root]);
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        for &child in children.get(&id).map(Vec::as_slice).unwrap_or(&[]) {
            if seen.insert(child) {
                stack.push(child);
            }
        }
    }
    seen
}
