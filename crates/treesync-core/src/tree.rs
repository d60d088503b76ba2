//! The tree: owner of every node and the single mutation entry point

use treesync_core_types::{StreamId, UpdateContext};

use crate::apply;
use crate::config::TreeConfig;
use crate::errors::Result;
use crate::model::{Node, NodeAttributes, NodeData, NodeDescription, NodeId, Update};
use crate::observer::{ChangeObserver, NoopObserver};
use crate::ops::changeset::release_subtree;
use crate::ops::NodeRegistry;
use crate::report::UpdateReport;
use crate::rules::validation;

/// Identity-stable tree of nodes kept in sync by successive updates
///
/// Nodes are only ever mutated through [`Tree::apply_update`]. A tree is not
/// thread-safe; callers that share one across threads must serialize access.
///
/// # Example
///
/// ```
/// use treesync_core::{NodeAttributes, NodeDescription, NodeRole, Tree, Update};
///
/// let mut tree = Tree::with_root(-1, NodeAttributes::new(NodeRole::RootWebArea)).unwrap();
/// let update = Update::new()
///     .with_node(NodeDescription::new(-1, NodeAttributes::new(NodeRole::RootWebArea)).with_children([5]))
///     .with_node(NodeDescription::new(5, NodeAttributes::new(NodeRole::Button)));
///
/// let report = tree.apply_update(update).unwrap();
/// assert_eq!(report.created.len(), 1);
/// assert_eq!(tree.root().unwrap().children().len(), 1);
/// ```
pub struct Tree<D = NodeAttributes> {
    pub(crate) registry: NodeRegistry<D>,
    pub(crate) root: Option<NodeId>,
    pub(crate) config: TreeConfig,
    pub(crate) context: UpdateContext,
    observer: Option<Box<dyn ChangeObserver<D>>>,
}

impl<D> Tree<D> {
    pub fn find(&self, id: impl Into<NodeId>) -> Option<&Node<D>> {
        self.registry.find(id.into())
    }

    /// Current root, absent until an update installs one
    pub fn root(&self) -> Option<&Node<D>> {
        self.root.and_then(|id| self.registry.find(id))
    }

    pub fn root_id(&self) -> Option<NodeId> {
        self.root
    }

    pub fn contains(&self, id: impl Into<NodeId>) -> bool {
        self.registry.contains(id.into())
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// All node ids, sorted ascending
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.registry.ids()
    }

    pub fn registry(&self) -> &NodeRegistry<D> {
        &self.registry
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Stream this tree's updates are correlated with in logs and errors
    pub fn stream_id(&self) -> &StreamId {
        &self.context.stream_id
    }

    /// Adopt the stream id of the transport feeding this tree
    pub fn set_stream_id(&mut self, stream_id: StreamId) {
        self.context = UpdateContext::for_stream(stream_id);
    }

    /// Number of updates attempted so far (successful or not)
    pub fn updates_seen(&self) -> u64 {
        self.context.seq.get()
    }

    pub(crate) fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.registry
            .find(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Register the observer used by [`Tree::apply_update`] and on drop
    ///
    /// Returns the previously registered observer.
    pub fn set_observer(
        &mut self,
        observer: Option<Box<dyn ChangeObserver<D>>>,
    ) -> Option<Box<dyn ChangeObserver<D>>> {
        std::mem::replace(&mut self.observer, observer)
    }

    pub fn has_observer(&self) -> bool {
        self.observer.is_some()
    }

    /// Release every node, root last
    ///
    /// Fires `on_subtree_will_be_deleted` for the root, then
    /// `on_node_will_be_deleted` for each node with children before parents.
    /// The tree is empty afterwards and can be bootstrapped again.
    pub fn teardown(&mut self, observer: &mut dyn ChangeObserver<D>) {
        let mut released = Vec::new();
        if let Some(root) = self.root.take() {
            release_subtree(&mut self.registry, root, observer, &mut released);
        }
        tracing::debug!(
            component = module_path!(),
            op = "teardown",
            deleted_count = released.len(),
        );
    }
}

impl<D: NodeData> Tree<D> {
    /// Create an empty tree with default configuration
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            registry: NodeRegistry::new(),
            root: None,
            config,
            context: UpdateContext::new(),
            observer: None,
        }
    }

    /// Bootstrap a tree from an initial update
    ///
    /// # Errors
    ///
    /// Returns the error of the initial update; there is no usable tree in
    /// that case.
    pub fn from_update(update: Update<D>) -> Result<Self> {
        let mut tree = Self::new();
        tree.apply_update(update)?;
        Ok(tree)
    }

    /// Bootstrap a tree from a single synthetic root description
    ///
    /// # Errors
    ///
    /// Returns `UnknownNodeId` if `data` does not mark its node as root.
    pub fn with_root(id: impl Into<NodeId>, data: D) -> Result<Self> {
        Self::from_update(Update::from_nodes(vec![NodeDescription::new(id, data)]))
    }

    /// Apply one update, notifying the registered observer (if any)
    ///
    /// # Errors
    ///
    /// Returns the rule violated by the update. Under the default
    /// [`FailurePolicy::Rollback`](crate::config::FailurePolicy::Rollback)
    /// the tree is unchanged afterwards.
    pub fn apply_update(&mut self, update: Update<D>) -> Result<UpdateReport> {
        let mut observer = self.observer.take();
        let result = match observer.as_deref_mut() {
            Some(observer) => apply::apply(self, update, observer),
            None => apply::apply(self, update, &mut NoopObserver),
        };
        self.observer = observer;
        result
    }

    /// Apply one update, notifying `observer` instead of the registered one
    ///
    /// # Errors
    ///
    /// Same as [`Tree::apply_update`].
    pub fn apply_update_with(
        &mut self,
        update: Update<D>,
        observer: &mut dyn ChangeObserver<D>,
    ) -> Result<UpdateReport> {
        apply::apply(self, update, observer)
    }

    /// Check every structural invariant
    ///
    /// # Errors
    ///
    /// Returns the first `InvariantViolation` found.
    pub fn validate(&self) -> Result<()> {
        validation::validate_tree(self)
    }
}

impl<D: NodeData> Default for Tree<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Drop for Tree<D> {
    fn drop(&mut self) {
        if let Some(mut observer) = self.observer.take() {
            self.teardown(observer.as_mut());
        }
    }
}

impl<D: std::fmt::Debug> std::fmt::Debug for Tree<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tree")
            .field("root", &self.root)
            .field("len", &self.registry.len())
            .field("config", &self.config)
            .field("stream_id", &self.context.stream_id)
            .field("has_observer", &self.observer.is_some())
            .finish()
    }
}
