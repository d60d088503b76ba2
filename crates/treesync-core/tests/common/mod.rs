use std::cell::RefCell;
use std::rc::Rc;

use treesync_core::{
    ChangeObserver, Node, NodeAttributes, NodeChange, NodeDescription, NodeId, NodeRole,
    RecordingObserver, Tree, TreeConfig, Update,
};

#[allow(dead_code)]
pub const ROOT: i32 = -1;

/// Payload carrying the root marker
#[allow(dead_code)]
pub fn root_data() -> NodeAttributes {
    NodeAttributes::new(NodeRole::RootWebArea)
}

#[allow(dead_code)]
pub fn leaf_data() -> NodeAttributes {
    NodeAttributes::new(NodeRole::StaticText)
}

/// Description of the root (-1) with the given children
#[allow(dead_code)]
pub fn root_desc(children: &[i32]) -> NodeDescription<NodeAttributes> {
    NodeDescription::new(ROOT, root_data()).with_children(children.iter().copied())
}

/// Description of a childless, non-root node
#[allow(dead_code)]
pub fn leaf_desc(id: i32) -> NodeDescription<NodeAttributes> {
    NodeDescription::new(id, leaf_data())
}

/// Description of a non-root group node with the given children
#[allow(dead_code)]
pub fn group_desc(id: i32, children: &[i32]) -> NodeDescription<NodeAttributes> {
    NodeDescription::new(id, NodeAttributes::new(NodeRole::Group))
        .with_children(children.iter().copied())
}

#[allow(dead_code)]
pub fn ids(raw: &[i32]) -> Vec<NodeId> {
    raw.iter().copied().map(NodeId::new).collect()
}

/// Tree with root -1 and one leaf per entry of `children`
#[allow(dead_code)]
pub fn tree_with_children(children: &[i32]) -> Tree {
    tree_with_children_and_config(children, TreeConfig::default())
}

#[allow(dead_code)]
pub fn tree_with_children_and_config(children: &[i32], config: TreeConfig) -> Tree {
    let mut tree = Tree::with_config(config);
    let mut update = Update::new().with_node(root_desc(children));
    for child in children {
        update = update.with_node(leaf_desc(*child));
    }
    tree.apply_update(update).expect("bootstrap update must succeed");
    tree
}

/// Child ids of `id`, empty if the node does not exist
#[allow(dead_code)]
pub fn children_of(tree: &Tree, id: i32) -> Vec<NodeId> {
    tree.find(id)
        .map(|node| node.children().to_vec())
        .unwrap_or_default()
}

/// Observer that forwards every callback into a shared recorder, so a
/// test can register it with a tree and still inspect what it saw
#[derive(Clone, Default)]
pub struct SharedRecorder(pub Rc<RefCell<RecordingObserver>>);

#[allow(dead_code)]
impl SharedRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed(&self) -> Box<dyn ChangeObserver<NodeAttributes>> {
        Box::new(self.clone())
    }

    pub fn recorder(&self) -> std::cell::Ref<'_, RecordingObserver> {
        self.0.borrow()
    }
}

impl ChangeObserver<NodeAttributes> for SharedRecorder {
    fn on_node_will_be_deleted(&mut self, node: &Node<NodeAttributes>) {
        ChangeObserver::<NodeAttributes>::on_node_will_be_deleted(&mut *self.0.borrow_mut(), node);
    }

    fn on_subtree_will_be_deleted(&mut self, subtree_root: &Node<NodeAttributes>) {
        ChangeObserver::<NodeAttributes>::on_subtree_will_be_deleted(
            &mut *self.0.borrow_mut(),
            subtree_root,
        );
    }

    fn on_node_created(&mut self, node: &Node<NodeAttributes>) {
        ChangeObserver::<NodeAttributes>::on_node_created(&mut *self.0.borrow_mut(), node);
    }

    fn on_node_data_changed(&mut self, node: &Node<NodeAttributes>) {
        ChangeObserver::<NodeAttributes>::on_node_data_changed(&mut *self.0.borrow_mut(), node);
    }

    fn on_atomic_update_finished(&mut self, root_changed: bool, changes: &[NodeChange]) {
        ChangeObserver::<NodeAttributes>::on_atomic_update_finished(
            &mut *self.0.borrow_mut(),
            root_changed,
            changes,
        );
    }
}
