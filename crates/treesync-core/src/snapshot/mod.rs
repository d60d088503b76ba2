//! Tree snapshots
//!
//! A [`TreeSnapshot`] is a serializable, pre-order capture of a tree's
//! structure and data. It can be turned back into a full [`Update`] that
//! rebuilds an identical tree, and hashed into a digest for equality
//! checks between trees.

pub mod digest;

pub use digest::{compute_snapshot_digest, compute_tree_digest};

use serde::{Deserialize, Serialize};

use crate::model::{NodeDescription, NodeId, Update};
use crate::traversal::walk::depth_first;
use crate::tree::Tree;

/// One captured node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotNode<D> {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub data: D,
    pub child_ids: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSnapshot<D> {
    pub root: Option<NodeId>,
    /// Nodes in pre-order from the root
    pub nodes: Vec<SnapshotNode<D>>,
}

impl<D: Clone> TreeSnapshot<D> {
    /// Capture every node reachable from the root
    pub fn capture(tree: &Tree<D>) -> Self {
        let nodes = depth_first(tree)
            .into_iter()
            .filter_map(|id| tree.find(id))
            .map(|node| SnapshotNode {
                id: node.id(),
                parent: node.parent(),
                data: node.data().clone(),
                child_ids: node.children().to_vec(),
            })
            .collect();

        Self {
            root: tree.root_id(),
            nodes,
        }
    }

    /// Full update rebuilding this tree from scratch
    ///
    /// Applied to an empty tree it reproduces the captured tree. Applied to
    /// a tree that already equals the capture it is a no-op that reports
    /// every node as changed.
    pub fn to_update(&self) -> Update<D> {
        Update::from_nodes(
            self.nodes
                .iter()
                .map(|node| NodeDescription {
                    id: node.id,
                    data: node.data.clone(),
                    child_ids: node.child_ids.clone(),
                })
                .collect(),
        )
    }
}

impl<D> TreeSnapshot<D> {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
