use serde::{Deserialize, Serialize};

use super::data::NodeData;
use super::id::{join_ids, NodeId};

/// Description of one node inside an [`Update`]
///
/// `data` replaces the node's payload wholesale; `child_ids` fully
/// determines the node's child list (and its order) after the update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "D: Deserialize<'de> + Default"))]
pub struct NodeDescription<D> {
    pub id: NodeId,

    #[serde(default)]
    pub data: D,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_ids: Vec<NodeId>,
}

impl<D> NodeDescription<D> {
    /// Describe a node with no children
    pub fn new(id: impl Into<NodeId>, data: D) -> Self {
        Self {
            id: id.into(),
            data,
            child_ids: Vec::new(),
        }
    }

    /// Builder: set the ordered child id list
    pub fn with_children<I, C>(mut self, child_ids: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<NodeId>,
    {
        self.child_ids = child_ids.into_iter().map(Into::into).collect();
        self
    }
}

/// One atomic batch of node descriptions plus an optional clear instruction
///
/// The order of `nodes` need not match tree order. If the same id is
/// described twice, the later description wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "D: Deserialize<'de> + Default"))]
pub struct Update<D> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id_to_clear: Option<NodeId>,

    #[serde(default = "Vec::new")]
    pub nodes: Vec<NodeDescription<D>>,
}

impl<D> Default for Update<D> {
    fn default() -> Self {
        Self {
            node_id_to_clear: None,
            nodes: Vec::new(),
        }
    }
}

impl<D> Update<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update consisting of the given descriptions
    pub fn from_nodes(nodes: Vec<NodeDescription<D>>) -> Self {
        Self {
            node_id_to_clear: None,
            nodes,
        }
    }

    /// Builder: clear the subtree rooted at `id` before applying descriptions
    pub fn clearing(mut self, id: impl Into<NodeId>) -> Self {
        self.node_id_to_clear = Some(id.into());
        self
    }

    /// Builder: append one description
    pub fn with_node(mut self, node: NodeDescription<D>) -> Self {
        self.nodes.push(node);
        self
    }

    /// Ids described by this update, in update order (duplicates kept)
    pub fn described_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.node_id_to_clear.is_none() && self.nodes.is_empty()
    }
}

impl<D: NodeData> std::fmt::Display for Update<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Update:")?;
        if let Some(clear) = self.node_id_to_clear {
            writeln!(f, "  clear {}", clear)?;
        }
        for node in &self.nodes {
            write!(f, "  id={} {}", node.id, node.data.summary())?;
            if !node.child_ids.is_empty() {
                write!(f, " child_ids={}", join_ids(&node.child_ids))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
