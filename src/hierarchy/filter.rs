use super::node::{Hierarchical, TreeNode};

/// Keep nodes whose name contains `term` (case-insensitive) and the ancestors leading to them.
///
/// An ancestor kept only for a matching descendant comes back expanded. An empty term
/// returns the forest unchanged.
pub fn filter_tree<T: Hierarchical + Clone>(roots: &[TreeNode<T>], term: &str) -> Vec<TreeNode<T>> {
    if term.is_empty() {
        return roots.to_vec();
    }

    let needle = term.to_lowercase();
    roots
        .iter()
        .filter_map(|root| filter_node(root, &needle))
        .collect()
}

fn filter_node<T: Hierarchical + Clone>(node: &TreeNode<T>, needle: &str) -> Option<TreeNode<T>> {
    let children: Vec<TreeNode<T>> = node
        .children
        .iter()
        .filter_map(|child| filter_node(child, needle))
        .collect();

    let matches = node.record.name().to_lowercase().contains(needle);
    if !matches && children.is_empty() {
        return None;
    }

    Some(TreeNode {
        record: node.record.clone(),
        children,
        entries_count: node.entries_count,
        is_expanded: if matches { node.is_expanded } else { true },
    })
}

/// Every node at every depth.
pub fn count_all_nodes<T>(roots: &[TreeNode<T>]) -> usize {
    roots
        .iter()
        .map(|node| 1 + count_all_nodes(&node.children))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::build_tree;
    use crate::hierarchy::fixtures::{area, planning_chain, Area};

    fn names(roots: &[TreeNode<Area>]) -> Vec<&str> {
        let mut out = Vec::new();
        for node in roots {
            out.push(node.name());
            out.extend(names(&node.children));
        }
        out
    }

    #[test]
    fn test_match_keeps_ancestors_expanded() {
        let forest = build_tree(&planning_chain()).unwrap();
        let filtered = filter_tree(&forest.roots, "forecast");

        assert_eq!(filtered.len(), 1);
        let planning = &filtered[0];
        assert_eq!(planning.id(), 1);
        assert!(planning.is_expanded);

        let budgeting = &planning.children[0];
        assert_eq!(budgeting.id(), 2);
        assert!(budgeting.is_expanded);

        let forecasting = &budgeting.children[0];
        assert_eq!(forecasting.id(), 3);
        assert!(!forecasting.is_expanded);
    }

    #[test]
    fn test_empty_term_is_identity() {
        let forest = build_tree(&planning_chain()).unwrap();
        assert_eq!(filter_tree(&forest.roots, ""), forest.roots);
    }

    #[test]
    fn test_matching_parent_is_not_forced_open() {
        let records = vec![
            area(1, "Budget Office", None),
            area(2, "Budget Execution", Some(1)),
            area(3, "Travel", Some(1)),
        ];
        let forest = build_tree(&records).unwrap();

        let filtered = filter_tree(&forest.roots, "BUDGET");
        assert_eq!(names(&filtered), vec!["Budget Office", "Budget Execution"]);
        assert!(!filtered[0].is_expanded);
        // Counts describe the full tree, not the filtered view.
        assert_eq!(filtered[0].entries_count, 2);
    }

    #[test]
    fn test_non_matching_branches_are_dropped() {
        let records = vec![
            area(1, "Revenue", None),
            area(2, "Collections", Some(1)),
            area(3, "Expenses", None),
            area(4, "Supplies", Some(3)),
            area(5, "Fuel", Some(3)),
        ];
        let forest = build_tree(&records).unwrap();

        let filtered = filter_tree(&forest.roots, "supp");
        assert_eq!(names(&filtered), vec!["Expenses", "Supplies"]);
        assert!(filter_tree(&forest.roots, "nothing like this").is_empty());
    }

    #[test]
    fn test_survivors_match_or_lead_to_a_match() {
        let records = vec![
            area(1, "Human Resources", None),
            area(2, "Recruitment", Some(1)),
            area(3, "Training", Some(1)),
            area(4, "Resource Planning", Some(3)),
            area(5, "Assets", None),
        ];
        let forest = build_tree(&records).unwrap();

        for term in ["res", "ing", "a", "zzz", "Training"] {
            let filtered = filter_tree(&forest.roots, term);
            assert!(count_all_nodes(&filtered) <= count_all_nodes(&forest.roots));

            fn check(node: &TreeNode<Area>, needle: &str) -> bool {
                let own = node.name().to_lowercase().contains(needle);
                let below: Vec<bool> = node.children.iter().map(|c| check(c, needle)).collect();
                assert!(own || below.iter().any(|&b| b), "{} kept without a match", node.name());
                own || below.iter().any(|&b| b)
            }
            for root in &filtered {
                check(root, &term.to_lowercase());
            }
        }
    }

    #[test]
    fn test_count_all_nodes() {
        let forest = build_tree(&planning_chain()).unwrap();
        assert_eq!(count_all_nodes(&forest.roots), 3);
        assert_eq!(count_all_nodes::<Area>(&[]), 0);
    }
}
