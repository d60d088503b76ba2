//! Scenario 03: Remove a child by omitting it from the parent's list

mod common;

use common::*;
use treesync_core::{ChangeType, NodeChange, NodeId, ObservedEvent, RecordingObserver, Update};

#[test]
fn test_remove_child() {
    // GIVEN root -1 with child 5
    let mut tree = tree_with_children(&[5]);

    // WHEN the root is re-described without children
    let report = tree
        .apply_update(Update::new().with_node(root_desc(&[])))
        .unwrap();

    // THEN 5 is gone and the root has no children
    assert!(tree.find(5).is_none());
    assert!(children_of(&tree, ROOT).is_empty());
    assert_eq!(report.deleted, ids(&[5]));
    assert_eq!(
        report.changes,
        vec![NodeChange::new(NodeId::new(ROOT), ChangeType::NodeChanged)]
    );
}

#[test]
fn test_remove_subtree_notifies_top_once_then_each_node_bottom_up() {
    // GIVEN root -1 -> [5 -> [50, 51], 6]
    let mut tree = tree_with_children(&[5, 6]);
    tree.apply_update(
        Update::new()
            .with_node(group_desc(5, &[50, 51]))
            .with_node(leaf_desc(50))
            .with_node(leaf_desc(51)),
    )
    .unwrap();
    let mut recorder = RecordingObserver::new();

    // WHEN 5 is dropped from the root's children
    let report = tree
        .apply_update_with(Update::new().with_node(root_desc(&[6])), &mut recorder)
        .unwrap();

    // THEN the root's data changes first, then the subtree is released bottom-up
    assert_eq!(
        &recorder.events()[..5],
        &[
            ObservedEvent::NodeDataChanged(NodeId::new(ROOT)),
            ObservedEvent::SubtreeWillBeDeleted(NodeId::new(5)),
            ObservedEvent::NodeWillBeDeleted(NodeId::new(50)),
            ObservedEvent::NodeWillBeDeleted(NodeId::new(51)),
            ObservedEvent::NodeWillBeDeleted(NodeId::new(5)),
        ]
    );
    assert_eq!(report.deleted, ids(&[50, 51, 5]));
    assert_eq!(tree.node_ids(), ids(&[ROOT, 6]));
    assert_eq!(tree.find(6).unwrap().index_in_parent(), 0);
}

#[test]
fn test_description_of_node_removed_later_in_same_update_is_not_reported() {
    // GIVEN root -1 with children [5, 6]
    let mut tree = tree_with_children(&[5, 6]);

    // WHEN 5 is described and then removed by the root's new child list
    let update = Update::new().with_node(leaf_desc(5)).with_node(root_desc(&[6]));
    let report = tree.apply_update(update).unwrap();

    // THEN only the root is reported
    assert_eq!(
        report.changes,
        vec![NodeChange::new(NodeId::new(ROOT), ChangeType::NodeChanged)]
    );
    assert!(tree.find(5).is_none());
}
