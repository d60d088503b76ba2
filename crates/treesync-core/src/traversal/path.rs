use crate::errors::{Result, TreeError};
use crate::model::NodeId;
use crate::tree::Tree;

/// Ids from the root down to `id`, both included
///
/// Follows parent links upward, then reverses.
///
/// # Errors
/// * `NodeNotFound` - If `id` (or a node on its parent chain) doesn't exist
pub fn path_to_root<D>(tree: &Tree<D>, id: NodeId) -> Result<Vec<NodeId>> {
    let mut path = Vec::new();
    let mut current = Some(id);

    while let Some(node_id) = current {
        let node = tree
            .find(node_id)
            .ok_or(TreeError::NodeNotFound { node_id })?;
        path.push(node_id);
        if path.len() > tree.len() {
            return Err(TreeError::InvariantViolation {
                rule: "parent_chain_cycle",
                node_id: id,
                detail: "parent chain does not terminate".to_string(),
            });
        }
        current = node.parent();
    }

    path.reverse();
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeAttributes, NodeDescription, NodeRole, Update};

    #[test]
    fn test_path_to_root() {
        let tree = Tree::from_update(
            Update::new()
                .with_node(
                    NodeDescription::new(-1, NodeAttributes::new(NodeRole::RootWebArea))
                        .with_children([2]),
                )
                .with_node(NodeDescription::new(2, NodeAttributes::new(NodeRole::List)).with_children([3]))
                .with_node(NodeDescription::new(3, NodeAttributes::new(NodeRole::ListItem))),
        )
        .unwrap();

        let path = path_to_root(&tree, NodeId::new(3)).unwrap();
        assert_eq!(path, vec![NodeId::new(-1), NodeId::new(2), NodeId::new(3)]);

        assert_eq!(path_to_root(&tree, NodeId::new(-1)).unwrap(), vec![NodeId::new(-1)]);
    }

    #[test]
    fn test_path_to_missing_node() {
        let tree: Tree = Tree::new();
        assert_eq!(
            path_to_root(&tree, NodeId::new(8)).unwrap_err(),
            TreeError::NodeNotFound {
                node_id: NodeId::new(8)
            }
        );
    }
}
