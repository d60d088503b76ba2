//! Update application
//!
//! This module provides [`apply`], the entry point behind
//! `Tree::apply_update`.
//!
//! ## Atomicity Contract
//!
//! An update is first *staged*: every step (clear, per-description data and
//! child-list rebuild, root resolution, pending check) runs against a
//! copy-on-touch overlay of the tree, recording an op log. Only when the
//! whole update validates is the log replayed on the live tree, which is
//! also when observers hear about it. A rejected update therefore leaves
//! the tree exactly as it was, unless the tree is configured with
//! [`FailurePolicy::KeepPartial`].
//!
//! ## Change classification
//!
//! Each description yields one [`NodeChange`], in update order:
//! `SUBTREE_CREATED` for a new node under a pre-existing parent (or a new
//! root), `NODE_CREATED` for a new node under a new parent, `NODE_CHANGED`
//! for everything else.

use std::collections::HashSet;
use std::time::Instant;

use crate::config::FailurePolicy;
use crate::errors::{Result, SyncError, TreeError};
use crate::model::{NodeData, NodeDescription, NodeId, Update};
use crate::observer::ChangeObserver;
use crate::ops::changeset::{Changeset, StagedView};
use crate::ops::NodeRegistry;
use crate::report::{ChangeType, NodeChange, UpdateReport};
use crate::rules::validation;
use crate::tree::Tree;
use crate::{log_op_end, log_op_error, log_op_start};

/// Bookkeeping kept for the duration of one update
#[derive(Debug, Default)]
struct UpdateState {
    /// Referenced as a child (or cleared) but not yet described
    pending: HashSet<NodeId>,
    /// Allocated by this update and still alive
    created: HashSet<NodeId>,
    /// Node allocated to become the new root
    new_root: Option<NodeId>,
}

/// Result of staging an update that passed every check
pub(crate) struct StagedUpdate<D> {
    pub(crate) changeset: Changeset<D>,
    pub(crate) changes: Vec<NodeChange>,
    pub(crate) created: Vec<NodeId>,
    pub(crate) old_root: Option<NodeId>,
    pub(crate) new_root: Option<NodeId>,
    pub(crate) root_changed: bool,
}

pub(crate) enum StageOutcome<D> {
    Ready(StagedUpdate<D>),
    /// `partial` holds the ops recorded before the failure was detected
    Rejected {
        error: TreeError,
        partial: Changeset<D>,
    },
}

struct Stager<'a, D> {
    view: StagedView<'a, D>,
    state: UpdateState,
}

impl<'a, D: NodeData> Stager<'a, D> {
    fn new(registry: &'a NodeRegistry<D>, root: Option<NodeId>) -> Self {
        Self {
            view: StagedView::new(registry, root),
            state: UpdateState::default(),
        }
    }

    fn destroy(&mut self, id: NodeId) {
        for gone in self.view.destroy_subtree(id) {
            self.state.pending.remove(&gone);
            self.state.created.remove(&gone);
        }
    }

    fn run(&mut self, clear: Option<NodeId>, nodes: Vec<NodeDescription<D>>) -> Result<()> {
        if let Some(target) = clear {
            self.clear(target)?;
        }

        for description in nodes {
            self.apply_description(description)?;
        }

        if self.view.root().is_none() {
            return Err(TreeError::NoRootAfterUpdate);
        }

        if !self.state.pending.is_empty() {
            let mut node_ids: Vec<NodeId> = self.state.pending.iter().copied().collect();
            node_ids.sort();
            return Err(TreeError::DanglingPendingNode { node_ids });
        }

        Ok(())
    }

    /// Clear phase: the root goes away entirely, any other node loses its
    /// children and must be described again
    fn clear(&mut self, target: NodeId) -> Result<()> {
        if !self.view.exists(target) {
            return Err(TreeError::BadClearTarget { node_id: target });
        }

        if self.view.root() == Some(target) {
            self.destroy(target);
            return Ok(());
        }

        let children = self.view.children(target).to_vec();
        for child in children {
            self.destroy(child);
        }
        self.view.set_children(target, Vec::new());
        self.state.pending.insert(target);
        Ok(())
    }

    fn apply_description(&mut self, description: NodeDescription<D>) -> Result<()> {
        let NodeDescription {
            id,
            data,
            child_ids,
        } = description;
        let marks_root = data.is_root();

        if self.view.exists(id) {
            self.state.pending.remove(&id);
        } else {
            if !marks_root {
                return Err(TreeError::UnknownNodeId { node_id: id });
            }
            if let Some(first_root) = self.state.new_root {
                return Err(TreeError::MultipleNewRoots {
                    first_root,
                    second_root: id,
                });
            }
            self.view.create(id, None, 0);
            self.state.new_root = Some(id);
            self.state.created.insert(id);
        }

        self.view.set_data(id, data);

        let mut declared = HashSet::with_capacity(child_ids.len());
        for child in &child_ids {
            if !declared.insert(*child) {
                return Err(TreeError::DuplicateChildId {
                    parent_id: id,
                    child_id: *child,
                });
            }
        }

        let stale: Vec<NodeId> = self
            .view
            .children(id)
            .iter()
            .copied()
            .filter(|child| !declared.contains(child))
            .collect();
        for child in stale {
            self.destroy(child);
        }

        // A failed child is skipped; the rest of the list and the root
        // install still take effect before the error surfaces
        let reparent = self.rebuild_children(id, child_ids);
        let installed = if marks_root {
            self.install_root(id)
        } else {
            Ok(())
        };

        match reparent {
            Some(err) => Err(err),
            None => installed,
        }
    }

    /// Make `id` the root, releasing the previous root's subtree
    fn install_root(&mut self, id: NodeId) -> Result<()> {
        if self.view.root() == Some(id) {
            return Ok(());
        }
        if let Some(current_parent) = self.view.parent(id) {
            return Err(TreeError::IllegalReparent {
                node_id: id,
                current_parent: Some(current_parent),
                new_parent: None,
            });
        }
        if let Some(old_root) = self.view.root() {
            self.destroy(old_root);
        }
        self.view.set_root(Some(id));
        Ok(())
    }

    /// Returns the first reparenting error, if any child triggered one
    fn rebuild_children(&mut self, id: NodeId, child_ids: Vec<NodeId>) -> Option<TreeError> {
        let mut children = Vec::with_capacity(child_ids.len());
        let mut first_error = None;

        for child in child_ids {
            if self.view.exists(child) {
                let current_parent = self.view.parent(child);
                if current_parent != Some(id) {
                    first_error.get_or_insert(TreeError::IllegalReparent {
                        node_id: child,
                        current_parent,
                        new_parent: Some(id),
                    });
                    continue;
                }
            } else {
                self.view.create(child, Some(id), children.len());
                self.state.pending.insert(child);
                self.state.created.insert(child);
            }
            children.push(child);
        }

        self.view.set_children(id, children);
        first_error
    }

    fn classify(&self, described: &[NodeId]) -> Vec<NodeChange> {
        described
            .iter()
            .filter(|id| self.view.exists(**id))
            .map(|id| {
                let change = if !self.state.created.contains(id) {
                    ChangeType::NodeChanged
                } else {
                    match self.view.parent(*id) {
                        Some(parent) if self.state.created.contains(&parent) => {
                            ChangeType::NodeCreated
                        }
                        _ => ChangeType::SubtreeCreated,
                    }
                };
                NodeChange::new(*id, change)
            })
            .collect()
    }

    /// Release a new root that never got installed
    fn drop_orphan_root(&mut self) {
        if let Some(new_root) = self.state.new_root {
            if self.view.exists(new_root) && self.view.root() != Some(new_root) {
                self.destroy(new_root);
            }
        }
    }
}

/// Stage an update against the tree state without mutating it
pub(crate) fn stage_update<D: NodeData>(
    registry: &NodeRegistry<D>,
    root: Option<NodeId>,
    update: Update<D>,
) -> StageOutcome<D> {
    let described = update.described_ids();
    let mut stager = Stager::new(registry, root);

    match stager.run(update.node_id_to_clear, update.nodes) {
        Ok(()) => {
            let changes = stager.classify(&described);
            let new_root = stager.view.root();
            let root_changed = new_root != root
                || new_root.is_some_and(|id| stager.state.created.contains(&id));
            let mut created: Vec<NodeId> = stager.state.created.iter().copied().collect();
            created.sort();

            StageOutcome::Ready(StagedUpdate {
                changeset: stager.view.into_changeset(),
                changes,
                created,
                old_root: root,
                new_root,
                root_changed,
            })
        }
        Err(error) => {
            stager.drop_orphan_root();
            StageOutcome::Rejected {
                error,
                partial: stager.view.into_changeset(),
            }
        }
    }
}

/// Apply an update to `tree`, notifying `observer`
///
/// # Errors
///
/// Returns the first rule the update violates (see [`TreeError`]), or
/// `InvariantViolation` if post-commit verification is enabled and fails.
pub fn apply<D: NodeData>(
    tree: &mut Tree<D>,
    update: Update<D>,
    observer: &mut dyn ChangeObserver<D>,
) -> Result<UpdateReport> {
    let start = Instant::now();
    let seq = tree.context.advance();
    let stream_id = tree.context.stream_id.clone();
    log_op_start!(
        "apply_update",
        stream_id = %stream_id,
        update_seq = seq.get(),
        node_count = update.nodes.len(),
        node_id_to_clear = ?update.node_id_to_clear.map(NodeId::get),
    );

    let fail = |error: TreeError| {
        log_op_error!(
            "apply_update",
            SyncError::from(error.clone()).with_op("apply_update").with_stream(stream_id.clone(), seq),
            duration_ms = start.elapsed().as_millis() as u64,
            stream_id = %stream_id,
            update_seq = seq.get(),
        );
        error
    };

    let staged = match stage_update(&tree.registry, tree.root, update) {
        StageOutcome::Ready(staged) => staged,
        StageOutcome::Rejected { error, partial } => {
            if tree.config.failure_policy == FailurePolicy::KeepPartial && !partial.is_empty() {
                let op_count = partial.len();
                let released = partial.commit(&mut tree.registry, &mut tree.root, observer);
                tracing::warn!(
                    component = module_path!(),
                    op = "apply_update",
                    stream_id = %stream_id,
                    update_seq = seq.get(),
                    op_count,
                    deleted_count = released.len(),
                    "rejected update partially committed"
                );
            }
            return Err(fail(error));
        }
    };

    let deleted = staged
        .changeset
        .commit(&mut tree.registry, &mut tree.root, observer);

    if tree.config.verify_invariants {
        validation::validate_tree(tree).map_err(fail)?;
    }

    observer.on_atomic_update_finished(staged.root_changed, &staged.changes);

    let report = UpdateReport {
        root_changed: staged.root_changed,
        old_root: staged.old_root,
        new_root: staged.new_root,
        changes: staged.changes,
        created: staged.created,
        deleted,
    };

    log_op_end!(
        "apply_update",
        duration_ms = start.elapsed().as_millis() as u64,
        stream_id = %stream_id,
        update_seq = seq.get(),
        created_count = report.created.len(),
        deleted_count = report.deleted.len(),
        root_changed = report.root_changed,
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Node, NodeAttributes, NodeRole};
    use crate::observer::NoopObserver;

    fn root_data() -> NodeAttributes {
        NodeAttributes::new(NodeRole::RootWebArea)
    }

    fn leaf() -> NodeAttributes {
        NodeAttributes::new(NodeRole::StaticText)
    }

    /// Registry holding root -1 -> [5, 6]
    fn base() -> NodeRegistry<NodeAttributes> {
        let mut registry = NodeRegistry::new();
        let mut root = Node::new(NodeId::new(-1), None, 0, root_data());
        root.children = vec![NodeId::new(5), NodeId::new(6)];
        registry.insert(root);
        registry.insert(Node::new(NodeId::new(5), Some(NodeId::new(-1)), 0, leaf()));
        registry.insert(Node::new(NodeId::new(6), Some(NodeId::new(-1)), 1, leaf()));
        registry
    }

    fn expect_ready(outcome: StageOutcome<NodeAttributes>) -> StagedUpdate<NodeAttributes> {
        match outcome {
            StageOutcome::Ready(staged) => staged,
            StageOutcome::Rejected { error, .. } => panic!("unexpected rejection: {}", error),
        }
    }

    fn expect_rejected(outcome: StageOutcome<NodeAttributes>) -> TreeError {
        match outcome {
            StageOutcome::Ready(_) => panic!("expected rejection"),
            StageOutcome::Rejected { error, .. } => error,
        }
    }

    #[test]
    fn test_stage_classifies_new_subtree() {
        let registry = base();
        let update = Update::new()
            .with_node(NodeDescription::new(6, leaf()).with_children([7]))
            .with_node(NodeDescription::new(7, leaf()).with_children([8]))
            .with_node(NodeDescription::new(8, leaf()));

        let staged = expect_ready(stage_update(&registry, Some(NodeId::new(-1)), update));

        assert_eq!(
            staged.changes,
            vec![
                NodeChange::new(NodeId::new(6), ChangeType::NodeChanged),
                NodeChange::new(NodeId::new(7), ChangeType::SubtreeCreated),
                NodeChange::new(NodeId::new(8), ChangeType::NodeCreated),
            ]
        );
        assert_eq!(staged.created, vec![NodeId::new(7), NodeId::new(8)]);
        assert!(!staged.root_changed);
        // staging never touches the live registry
        assert!(!registry.contains(NodeId::new(7)));
    }

    #[test]
    fn test_stage_rejects_second_new_root() {
        let registry = NodeRegistry::new();
        let update = Update::new()
            .with_node(NodeDescription::new(-1, root_data()))
            .with_node(NodeDescription::new(-2, root_data()));

        let err = expect_rejected(stage_update(&registry, None, update));

        assert_eq!(
            err,
            TreeError::MultipleNewRoots {
                first_root: NodeId::new(-1),
                second_root: NodeId::new(-2)
            }
        );
    }

    #[test]
    fn test_stage_duplicate_child_checked_before_deletions() {
        let registry = base();
        let update = Update::new().with_node(NodeDescription::new(-1, root_data()).with_children([7, 7]));

        match stage_update(&registry, Some(NodeId::new(-1)), update) {
            StageOutcome::Rejected { error, partial } => {
                assert_eq!(
                    error,
                    TreeError::DuplicateChildId {
                        parent_id: NodeId::new(-1),
                        child_id: NodeId::new(7)
                    }
                );
                // only the data write was staged
                assert_eq!(partial.len(), 1);
            }
            StageOutcome::Ready(_) => panic!("expected rejection"),
        }
    }

    #[test]
    fn test_stage_described_then_removed_node_is_not_reported() {
        let registry = base();
        let update = Update::new()
            .with_node(NodeDescription::new(5, leaf()))
            .with_node(NodeDescription::new(-1, root_data()).with_children([6]));

        let staged = expect_ready(stage_update(&registry, Some(NodeId::new(-1)), update));

        assert_eq!(
            staged.changes,
            vec![NodeChange::new(NodeId::new(-1), ChangeType::NodeChanged)]
        );
    }

    #[test]
    fn test_stage_replacing_root_marks_root_changed() {
        let registry = base();
        let update = Update::new().with_node(NodeDescription::new(-2, root_data()));

        let staged = expect_ready(stage_update(&registry, Some(NodeId::new(-1)), update));

        assert!(staged.root_changed);
        assert_eq!(staged.old_root, Some(NodeId::new(-1)));
        assert_eq!(staged.new_root, Some(NodeId::new(-2)));
        assert_eq!(
            staged.changes,
            vec![NodeChange::new(NodeId::new(-2), ChangeType::SubtreeCreated)]
        );
    }

    #[test]
    fn test_stage_rooting_a_parented_node_is_reparent() {
        let registry = base();
        let update = Update::new().with_node(NodeDescription::new(5, root_data()));

        let err = expect_rejected(stage_update(&registry, Some(NodeId::new(-1)), update));

        assert_eq!(
            err,
            TreeError::IllegalReparent {
                node_id: NodeId::new(5),
                current_parent: Some(NodeId::new(-1)),
                new_parent: None
            }
        );
    }
    #[test]
    fn test_stage_new_root_installed_despite_reparented_child() {
        let registry = base();
        let update = Update::new()
            .with_node(NodeDescription::new(-2, root_data()).with_children([5, 7]))
            .with_node(NodeDescription::new(7, leaf()));

        match stage_update(&registry, Some(NodeId::new(-1)), update) {
            StageOutcome::Rejected { error, partial } => {
                assert_eq!(
                    error,
                    TreeError::IllegalReparent {
                        node_id: NodeId::new(5),
                        current_parent: Some(NodeId::new(-1)),
                        new_parent: Some(NodeId::new(-2))
                    }
                );
                assert!(!partial.is_empty());
                let mut live = base();
                let mut root = Some(NodeId::new(-1));
                let released = partial.commit(&mut live, &mut root, &mut NoopObserver);
                assert_eq!(root, Some(NodeId::new(-2)));
                assert_eq!(live.ids(), vec![NodeId::new(-2), NodeId::new(7)]);
                assert_eq!(released, vec![NodeId::new(5), NodeId::new(6), NodeId::new(-1)]);
            }
            StageOutcome::Ready(_) => panic!("expected rejection"),
        }
    }
}
