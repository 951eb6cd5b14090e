use std::collections::{BTreeSet, HashMap};

use super::error::HierarchyError;
use super::node::{Forest, Hierarchical, RootSentinel, TreeNode};

/// Build a forest treating only a missing parent id as a root.
pub fn build_tree<T: Hierarchical + Clone>(records: &[T]) -> Result<Forest<T>, HierarchyError> {
    build_tree_with(records, RootSentinel::Null)
}

/// Link a flat list into a forest.
///
/// Roots and siblings keep their input order. A record whose ancestry ends at a parent
/// id missing from `records` is left out and listed in `Forest::orphans`. Duplicate ids,
/// empty names and ancestry loops are rejected.
pub fn build_tree_with<T: Hierarchical + Clone>(
    records: &[T],
    sentinel: RootSentinel,
) -> Result<Forest<T>, HierarchyError> {
    let mut index: HashMap<i64, usize> = HashMap::with_capacity(records.len());
    for (position, record) in records.iter().enumerate() {
        if record.name().trim().is_empty() {
            return Err(HierarchyError::EmptyName(record.id()));
        }
        if index.insert(record.id(), position).is_some() {
            return Err(HierarchyError::DuplicateId(record.id()));
        }
    }

    let mut roots = Vec::new();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    for (position, record) in records.iter().enumerate() {
        match sentinel.parent_of(record) {
            None => roots.push(position),
            Some(parent_id) => match index.get(&parent_id) {
                Some(&parent) => children[parent].push(position),
                None => tracing::debug!(
                    "Record {} references missing parent {}, leaving it out",
                    record.id(),
                    parent_id
                ),
            },
        }
    }

    // Every record has at most one parent, so anything reachable from a root is acyclic.
    let mut reachable = vec![false; records.len()];
    let mut stack = roots.clone();
    while let Some(position) = stack.pop() {
        reachable[position] = true;
        stack.extend(children[position].iter().copied());
    }

    let mut orphans = Vec::new();
    let mut looped = BTreeSet::new();
    for position in (0..records.len()).filter(|&p| !reachable[p]) {
        match trace_ancestry(position, records, &index, sentinel) {
            Ancestry::Dangling => orphans.push(records[position].id()),
            Ancestry::Loop(ids) => looped.extend(ids),
        }
    }
    if !looped.is_empty() {
        return Err(HierarchyError::Cycle {
            ids: looped.into_iter().collect(),
        });
    }

    let roots = roots
        .into_iter()
        .map(|position| assemble(position, records, &children))
        .collect();

    Ok(Forest { roots, orphans })
}

enum Ancestry {
    Dangling,
    Loop(Vec<i64>),
}

fn trace_ancestry<T: Hierarchical>(
    start: usize,
    records: &[T],
    index: &HashMap<i64, usize>,
    sentinel: RootSentinel,
) -> Ancestry {
    let mut step_of: HashMap<usize, usize> = HashMap::new();
    let mut path: Vec<usize> = Vec::new();
    let mut current = start;
    loop {
        if let Some(&step) = step_of.get(&current) {
            return Ancestry::Loop(path[step..].iter().map(|&p| records[p].id()).collect());
        }
        step_of.insert(current, path.len());
        path.push(current);

        match sentinel.parent_of(&records[current]).and_then(|id| index.get(&id)) {
            Some(&parent) => current = parent,
            None => return Ancestry::Dangling,
        }
    }
}

/// Post-order: each node's count is the sum over its children of (child count + 1).
fn assemble<T: Clone>(position: usize, records: &[T], children: &[Vec<usize>]) -> TreeNode<T> {
    let kids: Vec<TreeNode<T>> = children[position]
        .iter()
        .map(|&child| assemble(child, records, children))
        .collect();
    let entries_count = kids.iter().map(|kid| kid.entries_count + 1).sum();

    TreeNode {
        record: records[position].clone(),
        children: kids,
        entries_count,
        is_expanded: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::fixtures::{area, planning_chain};
    use crate::hierarchy::count_all_nodes;

    #[test]
    fn test_chain_counts_descendants() {
        let forest = build_tree(&planning_chain()).unwrap();

        assert_eq!(forest.roots.len(), 1);
        let planning = &forest.roots[0];
        assert_eq!(planning.id(), 1);
        assert_eq!(planning.entries_count, 2);

        let budgeting = &planning.children[0];
        assert_eq!(budgeting.id(), 2);
        assert_eq!(budgeting.entries_count, 1);

        let forecasting = &budgeting.children[0];
        assert_eq!(forecasting.id(), 3);
        assert_eq!(forecasting.entries_count, 0);
        assert!(forecasting.is_leaf());
        assert!(!planning.is_expanded);
    }

    #[test]
    fn test_dangling_parent_is_left_out() {
        let mut records = planning_chain();
        records.push(area(5, "X", Some(99)));
        records.push(area(6, "Under X", Some(5)));

        let forest = build_tree(&records).unwrap();

        assert!(forest.find(5).is_none());
        assert!(forest.find(6).is_none());
        assert_eq!(forest.orphans, vec![5, 6]);
        assert_eq!(count_all_nodes(&forest.roots), 3);
    }

    #[test]
    fn test_every_record_is_placed_or_orphaned() {
        let records = vec![
            area(10, "Finance", None),
            area(11, "Payroll", Some(10)),
            area(12, "Procurement", None),
            area(13, "Bidding", Some(12)),
            area(14, "Contracts", Some(12)),
            area(15, "Lost", Some(404)),
        ];

        let forest = build_tree(&records).unwrap();

        assert_eq!(forest.count_all_nodes() + forest.orphans.len(), records.len());
        let procurement = forest.find(12).unwrap();
        let sibling_ids: Vec<i64> = procurement.children.iter().map(|c| c.id()).collect();
        assert_eq!(sibling_ids, vec![13, 14]);
        assert_eq!(procurement.entries_count, 2);
    }

    #[test]
    fn test_roots_keep_input_order() {
        let records = vec![
            area(3, "Cash", None),
            area(1, "Assets", None),
            area(2, "Receivables", Some(1)),
        ];

        let forest = build_tree(&records).unwrap();
        let ids: Vec<i64> = forest.roots.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_child_listed_before_parent() {
        let records = vec![area(2, "Child", Some(1)), area(1, "Parent", None)];

        let forest = build_tree(&records).unwrap();
        assert_eq!(forest.roots[0].children[0].id(), 2);
        assert_eq!(forest.roots[0].entries_count, 1);
    }

    #[test]
    fn test_cycle_is_reported() {
        let records = vec![
            area(1, "Root", None),
            area(2, "A", Some(3)),
            area(3, "B", Some(2)),
            area(4, "Below the loop", Some(2)),
        ];

        let err = build_tree(&records).unwrap_err();
        assert_eq!(err, HierarchyError::Cycle { ids: vec![2, 3] });
    }

    #[test]
    fn test_self_parent_depends_on_sentinel() {
        let records = vec![area(1, "Legacy root", Some(1)), area(2, "Child", Some(1))];

        let err = build_tree(&records).unwrap_err();
        assert_eq!(err, HierarchyError::Cycle { ids: vec![1] });

        let forest = build_tree_with(&records, RootSentinel::NullOrSelf).unwrap();
        assert_eq!(forest.roots.len(), 1);
        assert_eq!(forest.roots[0].entries_count, 1);
    }

    #[test]
    fn test_structural_errors() {
        let duplicate = vec![area(1, "One", None), area(1, "Again", None)];
        assert_eq!(build_tree(&duplicate).unwrap_err(), HierarchyError::DuplicateId(1));

        let unnamed = vec![area(7, "  ", None)];
        assert_eq!(build_tree(&unnamed).unwrap_err(), HierarchyError::EmptyName(7));
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let records = planning_chain();
        assert_eq!(build_tree(&records).unwrap(), build_tree(&records).unwrap());
    }

    #[test]
    fn test_empty_input() {
        let forest = build_tree::<crate::hierarchy::fixtures::Area>(&[]).unwrap();
        assert!(forest.is_empty());
        assert!(forest.orphans.is_empty());
    }
}
