use std::collections::HashMap;

use crate::errors::{Result, TreeError};
use crate::model::{Node, NodeId};

/// Owning arena of every node in a tree, keyed by node id
///
/// The registry is the only place nodes live; parent and child links are
/// ids resolved through it. It is not thread-safe and is meant to be owned
/// by a single [`Tree`](crate::tree::Tree).
#[derive(Debug, Clone)]
pub struct NodeRegistry<D> {
    pub(crate) nodes: HashMap<NodeId, Node<D>>,
}

impl<D> Default for NodeRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> NodeRegistry<D> {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    pub fn find(&self, id: NodeId) -> Option<&Node<D>> {
        self.nodes.get(&id)
    }

    pub(crate) fn find_mut(&mut self, id: NodeId) -> Option<&mut Node<D>> {
        self.nodes.get_mut(&id)
    }

    /// Get a node by id
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if no node with this id exists.
    pub fn get(&self, id: NodeId) -> Result<&Node<D>> {
        self.find(id)
            .ok_or(TreeError::NodeNotFound { node_id: id })
    }

    /// Register a freshly allocated node
    ///
    /// # Panics
    ///
    /// Panics if a node with the same id is already registered. The applier
    /// checks existence before every allocation, so a duplicate here means
    /// its bookkeeping is broken.
    pub(crate) fn insert(&mut self, node: Node<D>) {
        let id = node.id;
        let previous = self.nodes.insert(id, node);
        assert!(
            previous.is_none(),
            "node {} registered twice in the same tree",
            id
        );
    }

    pub(crate) fn remove(&mut self, id: NodeId) -> Option<Node<D>> {
        self.nodes.remove(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All registered ids, sorted ascending
    pub fn ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node<D>> {
        self.nodes.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: i32) -> Node<()> {
        Node::new(NodeId::new(id), None, 0, ())
    }

    #[test]
    fn test_insert_find_remove() {
        let mut registry = NodeRegistry::new();
        registry.insert(leaf(3));
        registry.insert(leaf(-1));

        assert_eq!(registry.len(), 2);
        assert!(registry.contains(NodeId::new(3)));
        assert_eq!(registry.ids(), vec![NodeId::new(-1), NodeId::new(3)]);

        let removed = registry.remove(NodeId::new(3)).unwrap();
        assert_eq!(removed.id(), NodeId::new(3));
        assert!(registry.find(NodeId::new(3)).is_none());
        assert!(registry.remove(NodeId::new(3)).is_none());
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let registry: NodeRegistry<()> = NodeRegistry::new();
        assert_eq!(
            registry.get(NodeId::new(9)).unwrap_err(),
            TreeError::NodeNotFound {
                node_id: NodeId::new(9)
            }
        );
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn test_duplicate_insert_panics() {
        let mut registry = NodeRegistry::new();
        registry.insert(leaf(1));
        registry.insert(leaf(1));
    }
}
