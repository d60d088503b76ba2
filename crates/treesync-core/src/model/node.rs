use super::id::NodeId;

/// A single vertex of the tree
///
/// Nodes live in the tree's registry and link to each other by id: `parent`
/// is a non-owning back reference, `children` is the ordered list of owned
/// child ids. Only the update applier mutates a node; callers get shared
/// references.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<D> {
    pub(crate) id: NodeId,
    pub(crate) data: D,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) index_in_parent: usize,
}

impl<D> Node<D> {
    pub(crate) fn new(id: NodeId, parent: Option<NodeId>, index_in_parent: usize, data: D) -> Self {
        Self {
            id,
            data,
            parent,
            children: Vec::new(),
            index_in_parent,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    /// Parent id, `None` only for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child ids in presentation order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn child_at(&self, index: usize) -> Option<NodeId> {
        self.children.get(index).copied()
    }

    /// Position of this node within its parent's child list
    pub fn index_in_parent(&self) -> usize {
        self.index_in_parent
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
