use std::collections::HashSet;

use crate::model::NodeId;
use crate::tree::Tree;

/// Root id that has no registry entry
pub fn find_missing_root<D>(tree: &Tree<D>) -> Option<NodeId> {
    tree.root_id().filter(|id| !tree.contains(*id))
}

/// Root that still records a parent
///
/// Returns (root_id, parent_id)
pub fn find_root_with_parent<D>(tree: &Tree<D>) -> Option<(NodeId, NodeId)> {
    let root = tree.root()?;
    root.parent().map(|parent| (root.id(), parent))
}

/// Child ids listed by a node but absent from the registry
///
/// Returns list of (parent_id, child_id) tuples
pub fn find_dangling_children<D>(tree: &Tree<D>) -> Vec<(NodeId, NodeId)> {
    let mut dangling = Vec::new();

    for node in tree.registry().iter() {
        for child in node.children() {
            if !tree.contains(*child) {
                dangling.push((node.id(), *child));
            }
        }
    }

    dangling.sort();
    dangling
}

/// Child ids listed more than once under the same parent
///
/// Returns list of (parent_id, child_id) tuples
pub fn find_duplicate_children<D>(tree: &Tree<D>) -> Vec<(NodeId, NodeId)> {
    let mut duplicates = Vec::new();

    for node in tree.registry().iter() {
        let mut seen = HashSet::new();
        for child in node.children() {
            if !seen.insert(*child) {
                duplicates.push((node.id(), *child));
            }
        }
    }

    duplicates.sort();
    duplicates
}

/// Children whose parent back-pointer does not name the node listing them
///
/// Returns list of (child_id, recorded_parent, listed_under) tuples
pub fn find_parent_mismatches<D>(tree: &Tree<D>) -> Vec<(NodeId, Option<NodeId>, NodeId)> {
    let mut mismatches = Vec::new();

    for node in tree.registry().iter() {
        for child_id in node.children() {
            if let Some(child) = tree.find(*child_id) {
                if child.parent() != Some(node.id()) {
                    mismatches.push((*child_id, child.parent(), node.id()));
                }
            }
        }
    }

    mismatches.sort();
    mismatches
}

/// Nodes whose cached `index_in_parent` disagrees with their position
///
/// Returns list of (child_id, recorded_index, actual_index) tuples
pub fn find_stale_indices<D>(tree: &Tree<D>) -> Vec<(NodeId, usize, usize)> {
    let mut stale = Vec::new();

    for node in tree.registry().iter() {
        for (actual, child_id) in node.children().iter().enumerate() {
            if let Some(child) = tree.find(*child_id) {
                if child.parent() == Some(node.id()) && child.index_in_parent() != actual {
                    stale.push((*child_id, child.index_in_parent(), actual));
                }
            }
        }
    }

    stale.sort();
    stale
}

/// Registry entries that can not be reached from the root
///
/// With no root every entry is unreachable. Returns sorted ids.
pub fn find_unreachable<D>(tree: &Tree<D>) -> Vec<NodeId> {
    let mut reachable = HashSet::new();
    let mut stack: Vec<NodeId> = tree.root_id().into_iter().collect();

    while let Some(id) = stack.pop() {
        if !reachable.insert(id) {
            continue;
        }
        if let Some(node) = tree.find(id) {
            stack.extend(node.children().iter().copied());
        }
    }

    let mut unreachable: Vec<NodeId> = tree
        .node_ids()
        .into_iter()
        .filter(|id| !reachable.contains(id))
        .collect();
    unreachable.sort();
    unreachable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Node, NodeAttributes, NodeDescription, NodeRole, Update};

    /// root -1 -> [1, 2]
    fn tree() -> Tree {
        Tree::from_update(
            Update::new()
                .with_node(
                    NodeDescription::new(-1, NodeAttributes::new(NodeRole::Desktop))
                        .with_children([1, 2]),
                )
                .with_node(NodeDescription::new(1, NodeAttributes::new(NodeRole::Window)))
                .with_node(NodeDescription::new(2, NodeAttributes::new(NodeRole::Window))),
        )
        .unwrap()
    }

    #[test]
    fn test_healthy_tree_has_no_findings() {
        let tree = tree();
        assert_eq!(find_missing_root(&tree), None);
        assert_eq!(find_root_with_parent(&tree), None);
        assert!(find_dangling_children(&tree).is_empty());
        assert!(find_duplicate_children(&tree).is_empty());
        assert!(find_parent_mismatches(&tree).is_empty());
        assert!(find_stale_indices(&tree).is_empty());
        assert!(find_unreachable(&tree).is_empty());
    }

    #[test]
    fn test_detects_orphan_entry() {
        let mut tree = tree();
        tree.registry
            .insert(Node::new(NodeId::new(40), Some(NodeId::new(1)), 0, NodeAttributes::default()));

        assert_eq!(find_unreachable(&tree), vec![NodeId::new(40)]);
    }

    #[test]
    fn test_detects_dangling_child_and_stale_index() {
        let mut tree = tree();
        if let Some(root) = tree.registry.find_mut(NodeId::new(-1)) {
            root.children = vec![NodeId::new(2), NodeId::new(1), NodeId::new(77)];
        }

        assert_eq!(
            find_dangling_children(&tree),
            vec![(NodeId::new(-1), NodeId::new(77))]
        );
        assert_eq!(
            find_stale_indices(&tree),
            vec![(NodeId::new(1), 0, 1), (NodeId::new(2), 1, 0)]
        );
    }

    #[test]
    fn test_detects_parent_mismatch_and_duplicates() {
        let mut tree = tree();
        if let Some(one) = tree.registry.find_mut(NodeId::new(1)) {
            one.children = vec![NodeId::new(2), NodeId::new(2)];
        }

        assert_eq!(
            find_duplicate_children(&tree),
            vec![(NodeId::new(1), NodeId::new(2))]
        );
        assert_eq!(
            find_parent_mismatches(&tree),
            vec![
                (NodeId::new(2), Some(NodeId::new(-1)), NodeId::new(1)),
                (NodeId::new(2), Some(NodeId::new(-1)), NodeId::new(1)),
            ]
        );
    }

    #[test]
    fn test_detects_missing_root() {
        let mut tree = tree();
        tree.root = Some(NodeId::new(99));
        assert_eq!(find_missing_root(&tree), Some(NodeId::new(99)));
    }
}
