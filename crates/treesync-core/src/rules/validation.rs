use crate::errors::{Result, TreeError};
use crate::tree::Tree;

use super::invariants;

pub const RULE_MISSING_ROOT: &str = "missing_root";
pub const RULE_ROOT_HAS_PARENT: &str = "root_has_parent";
pub const RULE_DANGLING_CHILD: &str = "dangling_child";
pub const RULE_DUPLICATE_CHILD: &str = "duplicate_child";
pub const RULE_PARENT_MISMATCH: &str = "parent_mismatch";
pub const RULE_STALE_INDEX: &str = "stale_index_in_parent";
pub const RULE_UNREACHABLE: &str = "unreachable_node";

/// Validate the structure of the whole tree
///
/// Checks, in order:
///
/// 1. The root id (if any) is registered and has no parent
/// 2. Every listed child exists, at most once per parent
/// 3. Every child's parent pointer names the node listing it
/// 4. Every cached `index_in_parent` matches the child's position
/// 5. Every registered node is reachable from the root (no orphans)
///
/// # Errors
/// Returns the first violation as `InvariantViolation`. For exhaustive
/// reporting, call the individual invariant functions directly.
pub fn validate_tree<D>(tree: &Tree<D>) -> Result<()> {
    if let Some(root_id) = invariants::find_missing_root(tree) {
        return Err(violation(RULE_MISSING_ROOT, root_id, "root id is not registered".to_string()));
    }

    if let Some((root_id, parent_id)) = invariants::find_root_with_parent(tree) {
        return Err(violation(RULE_ROOT_HAS_PARENT, root_id, format!("root has parent {}", parent_id)));
    }

    if let Some((parent_id, child_id)) = invariants::find_dangling_children(tree).first() {
        return Err(violation(
            RULE_DANGLING_CHILD,
            *parent_id,
            format!("lists unknown child {}", child_id),
        ));
    }

    if let Some((parent_id, child_id)) = invariants::find_duplicate_children(tree).first() {
        return Err(violation(
            RULE_DUPLICATE_CHILD,
            *parent_id,
            format!("lists child {} more than once", child_id),
        ));
    }

    if let Some((child_id, recorded, listed_under)) = invariants::find_parent_mismatches(tree).first() {
        let recorded = recorded.map_or_else(|| "none".to_string(), |p| p.to_string());
        return Err(violation(
            RULE_PARENT_MISMATCH,
            *child_id,
            format!("listed under {} but parent is {}", listed_under, recorded),
        ));
    }

    if let Some((child_id, recorded, actual)) = invariants::find_stale_indices(tree).first() {
        return Err(violation(
            RULE_STALE_INDEX,
            *child_id,
            format!("index_in_parent is {} but position is {}", recorded, actual),
        ));
    }

    if let Some(node_id) = invariants::find_unreachable(tree).first() {
        return Err(violation(
            RULE_UNREACHABLE,
            *node_id,
            "not reachable from the root".to_string(),
        ));
    }

    Ok(())
}

fn violation(rule: &'static str, node_id: crate::model::NodeId, detail: String) -> TreeError {
    TreeError::InvariantViolation {
        rule,
        node_id,
        detail,
    }
}
