//! Digest computation for tree snapshots
//!
//! SHA256 over the canonical JSON of a [`TreeSnapshot`]. Snapshot order is
//! pre-order and attribute maps are sorted, so equal trees always produce
//! equal digests and any difference in ids, structure, order or data
//! changes the digest.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::errors::Result;
use crate::snapshot::TreeSnapshot;
use crate::tree::Tree;

/// Compute the digest of a tree's current state
///
/// ## Returns
///
/// Hex-encoded SHA256 digest (64 characters)
///
/// ## Errors
///
/// Returns `TreeError::Serialization` if the node data fails to serialize.
///
/// ## Example
///
/// ```
/// use treesync_core::{NodeAttributes, NodeRole, Tree};
/// use treesync_core::snapshot::compute_tree_digest;
///
/// let tree = Tree::with_root(-1, NodeAttributes::new(NodeRole::RootWebArea)).unwrap();
/// let digest = compute_tree_digest(&tree).unwrap();
/// assert_eq!(digest.len(), 64);
/// ```
pub fn compute_tree_digest<D: Serialize + Clone>(tree: &Tree<D>) -> Result<String> {
    compute_snapshot_digest(&TreeSnapshot::capture(tree))
}

/// Compute the digest of an already captured snapshot
///
/// ## Errors
///
/// Returns `TreeError::Serialization` if the node data fails to serialize.
pub fn compute_snapshot_digest<D: Serialize>(snapshot: &TreeSnapshot<D>) -> Result<String> {
    let canonical = serde_json::to_string(snapshot)?;
    Ok(hash_string(&canonical))
}

fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
