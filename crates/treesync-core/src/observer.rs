//! Change notifications
//!
//! Observers are called while a commit is replayed, after the update has
//! been fully validated. They get shared references only and must not try
//! to reach back into the tree.

use crate::model::{Node, NodeId};
use crate::report::NodeChange;

/// Receiver of per-node lifecycle callbacks and the terminal change list
///
/// Every method has an empty default so implementors only override what
/// they care about.
pub trait ChangeObserver<D> {
    /// Fired for every released node, children before parents
    fn on_node_will_be_deleted(&mut self, _node: &Node<D>) {}

    /// Fired once for the top of each released subtree, before any of its
    /// nodes are released
    fn on_subtree_will_be_deleted(&mut self, _subtree_root: &Node<D>) {}

    /// Fired when a node is allocated; its data is still the placeholder
    fn on_node_created(&mut self, _node: &Node<D>) {}

    /// Fired when a described node receives its new data, before its stale
    /// children are released
    fn on_node_data_changed(&mut self, _node: &Node<D>) {}

    /// Fired once per successful update, after every other callback
    fn on_atomic_update_finished(&mut self, _root_changed: bool, _changes: &[NodeChange]) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl<D> ChangeObserver<D> for NoopObserver {}

/// One callback as seen by [`RecordingObserver`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservedEvent {
    NodeWillBeDeleted(NodeId),
    SubtreeWillBeDeleted(NodeId),
    NodeCreated(NodeId),
    NodeDataChanged(NodeId),
    AtomicUpdateFinished {
        root_changed: bool,
        changes: Vec<NodeChange>,
    },
}

/// Observer that records every callback in order
///
/// Handy for tests and for transports that forward notifications after
/// `apply_update` returns.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Vec<ObservedEvent>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ObservedEvent] {
        &self.events
    }

    /// Take the recorded events, leaving the recorder empty
    pub fn drain(&mut self) -> Vec<ObservedEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ids passed to `on_node_will_be_deleted`, in order
    pub fn deleted_ids(&self) -> Vec<NodeId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ObservedEvent::NodeWillBeDeleted(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Ids passed to `on_node_created`, in order
    pub fn created_ids(&self) -> Vec<NodeId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ObservedEvent::NodeCreated(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Number of `on_atomic_update_finished` callbacks seen
    pub fn finished_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, ObservedEvent::AtomicUpdateFinished { .. }))
            .count()
    }
}

impl<D> ChangeObserver<D> for RecordingObserver {
    fn on_node_will_be_deleted(&mut self, node: &Node<D>) {
        self.events.push(ObservedEvent::NodeWillBeDeleted(node.id()));
    }

    fn on_subtree_will_be_deleted(&mut self, subtree_root: &Node<D>) {
        self.events
            .push(ObservedEvent::SubtreeWillBeDeleted(subtree_root.id()));
    }

    fn on_node_created(&mut self, node: &Node<D>) {
        self.events.push(ObservedEvent::NodeCreated(node.id()));
    }

    fn on_node_data_changed(&mut self, node: &Node<D>) {
        self.events.push(ObservedEvent::NodeDataChanged(node.id()));
    }

    fn on_atomic_update_finished(&mut self, root_changed: bool, changes: &[NodeChange]) {
        self.events.push(ObservedEvent::AtomicUpdateFinished {
            root_changed,
            changes: changes.to_vec(),
        });
    }
}
