//! Staged structural changes
//!
//! [`StagedView`] is a copy-on-touch overlay over a live registry. The
//! applier runs the whole update against it, so every read sees the effect
//! of earlier steps, while the live tree stays untouched. Each mutation is
//! also appended to an op log; replaying that log ([`Changeset::commit`])
//! reproduces the staged state on the real registry and fires observer
//! callbacks in the order the mutations happened.

use std::collections::HashMap;

use super::registry::NodeRegistry;
use crate::model::{Node, NodeData, NodeId};
use crate::observer::ChangeObserver;
use crate::traversal::walk::post_order_by;

/// One recorded mutation
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Op<D> {
    DestroySubtree {
        root: NodeId,
    },
    Create {
        id: NodeId,
        parent: Option<NodeId>,
        index: usize,
    },
    SetData {
        id: NodeId,
        data: D,
    },
    SetChildren {
        id: NodeId,
        children: Vec<NodeId>,
    },
    SetRoot(Option<NodeId>),
}

/// Structural part of a touched node
#[derive(Debug, Clone)]
struct Shadow {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

pub(crate) struct StagedView<'a, D> {
    base: &'a NodeRegistry<D>,
    /// `None` marks a node destroyed while staging
    entries: HashMap<NodeId, Option<Shadow>>,
    root: Option<NodeId>,
    ops: Vec<Op<D>>,
}

impl<'a, D> StagedView<'a, D> {
    pub(crate) fn new(base: &'a NodeRegistry<D>, root: Option<NodeId>) -> Self {
        Self {
            base,
            entries: HashMap::new(),
            root,
            ops: Vec::new(),
        }
    }

    pub(crate) fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub(crate) fn exists(&self, id: NodeId) -> bool {
        match self.entries.get(&id) {
            Some(entry) => entry.is_some(),
            None => self.base.contains(id),
        }
    }

    pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
        match self.entries.get(&id) {
            Some(entry) => entry.as_ref().and_then(|s| s.parent),
            None => self.base.find(id).and_then(|n| n.parent),
        }
    }

    pub(crate) fn children(&self, id: NodeId) -> &[NodeId] {
        match self.entries.get(&id) {
            Some(Some(shadow)) => &shadow.children,
            Some(None) => &[],
            None => self
                .base
                .find(id)
                .map(|n| n.children.as_slice())
                .unwrap_or(&[]),
        }
    }

    fn shadow_mut(&mut self, id: NodeId) -> Option<&mut Shadow> {
        if !self.entries.contains_key(&id) {
            let node = self.base.find(id)?;
            self.entries.insert(
                id,
                Some(Shadow {
                    parent: node.parent,
                    children: node.children.clone(),
                }),
            );
        }
        self.entries.get_mut(&id).and_then(Option::as_mut)
    }

    /// Destroy `id` and everything below it, detaching it from its parent
    ///
    /// Returns the destroyed ids, children before parents.
    pub(crate) fn destroy_subtree(&mut self, id: NodeId) -> Vec<NodeId> {
        if !self.exists(id) {
            return Vec::new();
        }
        let view = &*self;
        let gone = post_order_by(id, |n| view.children(n));
        let parent = self.parent(id);

        if let Some(shadow) = parent.and_then(|p| self.shadow_mut(p)) {
            shadow.children.retain(|c| *c != id);
        }
        for node in &gone {
            self.entries.insert(*node, None);
        }
        if self.root == Some(id) {
            self.root = None;
        }
        self.ops.push(Op::DestroySubtree { root: id });
        gone
    }

    pub(crate) fn create(&mut self, id: NodeId, parent: Option<NodeId>, index: usize) {
        self.entries.insert(
            id,
            Some(Shadow {
                parent,
                children: Vec::new(),
            }),
        );
        self.ops.push(Op::Create { id, parent, index });
    }

    pub(crate) fn set_data(&mut self, id: NodeId, data: D) {
        self.ops.push(Op::SetData { id, data });
    }

    pub(crate) fn set_children(&mut self, id: NodeId, children: Vec<NodeId>) {
        if let Some(shadow) = self.shadow_mut(id) {
            shadow.children = children.clone();
        }
        for child in &children {
            if let Some(shadow) = self.shadow_mut(*child) {
                shadow.parent = Some(id);
            }
        }
        self.ops.push(Op::SetChildren { id, children });
    }

    pub(crate) fn set_root(&mut self, root: Option<NodeId>) {
        self.root = root;
        self.ops.push(Op::SetRoot(root));
    }

    pub(crate) fn into_changeset(self) -> Changeset<D> {
        Changeset { ops: self.ops }
    }
}

/// Ordered op log produced by a [`StagedView`]
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Changeset<D> {
    ops: Vec<Op<D>>,
}

impl<D: NodeData> Changeset<D> {
    pub(crate) fn len(&self) -> usize {
        self.ops.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Replay the log against the live registry
    ///
    /// Returns the released ids in release order.
    pub(crate) fn commit(
        self,
        registry: &mut NodeRegistry<D>,
        root: &mut Option<NodeId>,
        observer: &mut dyn ChangeObserver<D>,
    ) -> Vec<NodeId> {
        let mut released = Vec::new();
        for op in self.ops {
            match op {
                Op::DestroySubtree { root: top } => {
                    release_subtree(registry, top, observer, &mut released);
                    if *root == Some(top) {
                        *root = None;
                    }
                }
                Op::Create { id, parent, index } => {
                    registry.insert(Node::new(id, parent, index, D::default()));
                    if let Some(node) = registry.find(id) {
                        observer.on_node_created(node);
                    }
                }
                Op::SetData { id, data } => {
                    if let Some(node) = registry.find_mut(id) {
                        node.data = data;
                        observer.on_node_data_changed(node);
                    }
                }
                Op::SetChildren { id, children } => {
                    for (index, child) in children.iter().enumerate() {
                        if let Some(node) = registry.find_mut(*child) {
                            node.parent = Some(id);
                            node.index_in_parent = index;
                        }
                    }
                    if let Some(node) = registry.find_mut(id) {
                        node.children = children;
                    }
                }
                Op::SetRoot(new_root) => *root = new_root,
            }
        }
        released
    }
}

/// Release `top` and its descendants from the registry
///
/// Fires `on_subtree_will_be_deleted` once, then `on_node_will_be_deleted`
/// for every node, children before parents, right before it is removed.
/// The node is detached from its parent's child list first.
pub(crate) fn release_subtree<D>(
    registry: &mut NodeRegistry<D>,
    top: NodeId,
    observer: &mut dyn ChangeObserver<D>,
    released: &mut Vec<NodeId>,
) {
    let Some(node) = registry.find(top) else {
        return;
    };
    observer.on_subtree_will_be_deleted(node);
    let parent = node.parent;

    if let Some(parent_node) = parent.and_then(|p| registry.find_mut(p)) {
        parent_node.children.retain(|c| *c != top);
        let siblings = parent_node.children.clone();
        for (index, sibling) in siblings.into_iter().enumerate() {
            if let Some(node) = registry.find_mut(sibling) {
                node.index_in_parent = index;
            }
        }
    }

    let order = {
        let view = &*registry;
        post_order_by(top, |id| {
            view.find(id)
                .map(|n| n.children.as_slice())
                .unwrap_or(&[])
        })
    };
    for id in &order {
        if let Some(node) = registry.find(*id) {
            observer.on_node_will_be_deleted(node);
        }
        registry.remove(*id);
    }

    tracing::debug!(
        component = module_path!(),
        op = "release_subtree",
        node_id = top.get(),
        deleted_count = order.len(),
    );
    released.extend(order);
}
