use crate::errors::{Result, TreeError};
use crate::model::{NodeData, NodeId};
use crate::tree::Tree;

const INDENT: &str = "  ";

/// Render the whole tree as an indented dump
///
/// One line per node in pre-order, `id=<id> <summary>`, indented two spaces
/// per level. An empty tree renders as `(empty)`.
pub fn render_tree<D: NodeData>(tree: &Tree<D>) -> String {
    match tree.root_id() {
        Some(root) => render_from(tree, root),
        None => "(empty)\n".to_string(),
    }
}

/// Render the subtree rooted at `id`
///
/// # Errors
/// * `NodeNotFound` - If `id` is not in the tree
pub fn render_subtree<D: NodeData>(tree: &Tree<D>, id: NodeId) -> Result<String> {
    if !tree.contains(id) {
        return Err(TreeError::NodeNotFound { node_id: id });
    }
    Ok(render_from(tree, id))
}

fn render_from<D: NodeData>(tree: &Tree<D>, start: NodeId) -> String {
    let mut output = String::new();
    let mut stack = vec![(start, 0usize)];

    while let Some((id, depth)) = stack.pop() {
        let Some(node) = tree.find(id) else {
            continue;
        };
        output.push_str(&INDENT.repeat(depth));
        output.push_str(&format!("id={} {}\n", id, node.data().summary()));
        stack.extend(node.children().iter().rev().map(|child| (*child, depth + 1)));
    }

    output
}

impl<D: NodeData> std::fmt::Display for Tree<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&render_tree(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeAttributes, NodeDescription, NodeRole, Update};

    #[test]
    fn test_render_nested() {
        let tree = Tree::from_update(
            Update::new()
                .with_node(
                    NodeDescription::new(-1, NodeAttributes::new(NodeRole::RootWebArea))
                        .with_children([3, 2]),
                )
                .with_node(
                    NodeDescription::new(3, NodeAttributes::new(NodeRole::List)).with_children([4]),
                )
                .with_node(NodeDescription::new(
                    4,
                    NodeAttributes::new(NodeRole::ListItem).with_name("first"),
                ))
                .with_node(NodeDescription::new(2, NodeAttributes::new(NodeRole::Button))),
        )
        .unwrap();

        let expected = "id=-1 root_web_area\n  id=3 list\n    id=4 list_item name=\"first\"\n  id=2 button\n";
        assert_eq!(render_tree(&tree), expected);
        assert_eq!(tree.to_string(), expected);
        assert_eq!(
            render_subtree(&tree, NodeId::new(3)).unwrap(),
            "id=3 list\n  id=4 list_item name=\"first\"\n"
        );
    }

    #[test]
    fn test_render_empty_tree() {
        let tree: Tree = Tree::new();
        assert_eq!(render_tree(&tree), "(empty)\n");
        assert!(render_subtree(&tree, NodeId::new(1)).is_err());
    }
}
