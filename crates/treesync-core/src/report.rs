//! Outcome of a successful update

use serde::{Deserialize, Serialize};

use crate::model::NodeId;

/// Classification of one described node after an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeType {
    /// New node whose parent is also new (interior of a new subtree)
    NodeCreated,
    /// Topmost new node of a freshly inserted subtree
    SubtreeCreated,
    /// Pre-existing node whose data and/or children were replaced
    NodeChanged,
}

impl ChangeType {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeType::NodeCreated => "NODE_CREATED",
            ChangeType::SubtreeCreated => "SUBTREE_CREATED",
            ChangeType::NodeChanged => "NODE_CHANGED",
        }
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeChange {
    pub node_id: NodeId,
    pub change: ChangeType,
}

impl NodeChange {
    pub fn new(node_id: NodeId, change: ChangeType) -> Self {
        Self { node_id, change }
    }
}

/// Report returned by `Tree::apply_update`
///
/// `changes` holds one entry per description in update order, so an id
/// described twice appears twice. Descriptions of nodes that a later
/// description removed again are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateReport {
    pub root_changed: bool,
    pub old_root: Option<NodeId>,
    pub new_root: Option<NodeId>,
    pub changes: Vec<NodeChange>,
    /// Ids allocated by this update that still exist, sorted
    pub created: Vec<NodeId>,
    /// Ids released by this update, in release order
    pub deleted: Vec<NodeId>,
}

impl UpdateReport {
    /// Classification of the last description of `id`, if any
    pub fn change_for(&self, id: NodeId) -> Option<ChangeType> {
        self.changes
            .iter()
            .rev()
            .find(|c| c.node_id == id)
            .map(|c| c.change)
    }

    /// Ids reported with the given classification, in report order
    pub fn ids_with(&self, change: ChangeType) -> Vec<NodeId> {
        self.changes
            .iter()
            .filter(|c| c.change == change)
            .map(|c| c.node_id)
            .collect()
    }
}
