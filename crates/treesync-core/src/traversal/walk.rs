use crate::errors::{Result, TreeError};
use crate::model::NodeId;
use crate::tree::Tree;

/// Pre-order walk starting at `start`, children in declared order
pub(crate) fn pre_order_by<'a, F>(start: NodeId, children_of: F) -> Vec<NodeId>
where
    F: Fn(NodeId) -> &'a [NodeId],
{
    let mut order = Vec::new();
    let mut stack = vec![start];
    while let Some(current) = stack.pop() {
        order.push(current);
        stack.extend(children_of(current).iter().rev().copied());
    }
    order
}

/// Post-order walk starting at `start`: children (left to right) before
/// their parent
pub(crate) fn post_order_by<'a, F>(start: NodeId, children_of: F) -> Vec<NodeId>
where
    F: Fn(NodeId) -> &'a [NodeId],
{
    let mut order = Vec::new();
    let mut stack = vec![(start, false)];
    while let Some((current, expanded)) = stack.pop() {
        if expanded {
            order.push(current);
            continue;
        }
        stack.push((current, true));
        stack.extend(children_of(current).iter().rev().map(|c| (*c, false)));
    }
    order
}

/// All node ids in pre-order from the root (empty for an empty tree)
pub fn depth_first<D>(tree: &Tree<D>) -> Vec<NodeId> {
    match tree.root_id() {
        Some(root) => pre_order_by(root, |id| tree.children_of(id)),
        None => Vec::new(),
    }
}

/// All node ids in post-order from the root (empty for an empty tree)
pub fn post_order<D>(tree: &Tree<D>) -> Vec<NodeId> {
    match tree.root_id() {
        Some(root) => post_order_by(root, |id| tree.children_of(id)),
        None => Vec::new(),
    }
}

/// Pre-order ids of the subtree rooted at `id`
///
/// # Errors
///
/// Returns `NodeNotFound` if `id` is not in the tree.
pub fn subtree_ids<D>(tree: &Tree<D>, id: NodeId) -> Result<Vec<NodeId>> {
    if !tree.contains(id) {
        return Err(TreeError::NodeNotFound { node_id: id });
    }
    Ok(pre_order_by(id, |n| tree.children_of(n)))
}
