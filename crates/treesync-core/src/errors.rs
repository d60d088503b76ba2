use thiserror::Error;
use treesync_core_types::{StreamId, UpdateSeq};

use crate::model::id::join_ids;
use crate::model::NodeId;

/// Result type alias using TreeError
pub type Result<T> = std::result::Result<T, TreeError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every [`TreeError`] maps onto exactly one kind, and every kind has a
/// stable code usable by transports (e.g. to decide between discarding an
/// update and requesting retransmission) and by log processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncErrorKind {
    // Rejected updates
    BadClearTarget,
    DuplicateChildId,
    IllegalReparent,
    MultipleNewRoots,
    DanglingPendingNode,
    NoRootAfterUpdate,
    UnknownNodeId,

    // Queries
    NotFound,

    // Internal
    InvariantViolation,
    Serialization,
}

impl SyncErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            SyncErrorKind::BadClearTarget => "ERR_BAD_CLEAR_TARGET",
            SyncErrorKind::DuplicateChildId => "ERR_DUPLICATE_CHILD_ID",
            SyncErrorKind::IllegalReparent => "ERR_ILLEGAL_REPARENT",
            SyncErrorKind::MultipleNewRoots => "ERR_MULTIPLE_NEW_ROOTS",
            SyncErrorKind::DanglingPendingNode => "ERR_DANGLING_PENDING_NODE",
            SyncErrorKind::NoRootAfterUpdate => "ERR_NO_ROOT_AFTER_UPDATE",
            SyncErrorKind::UnknownNodeId => "ERR_UNKNOWN_NODE_ID",
            SyncErrorKind::NotFound => "ERR_NOT_FOUND",
            SyncErrorKind::InvariantViolation => "ERR_INVARIANT_VIOLATION",
            SyncErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }

    /// True for kinds that reject an update because of bad input
    ///
    /// A transport should drop (or ask again for) such an update; the other
    /// kinds indicate a query miss or a bug in the engine itself.
    pub fn is_rejected_update(&self) -> bool {
        matches!(
            self,
            SyncErrorKind::BadClearTarget
                | SyncErrorKind::DuplicateChildId
                | SyncErrorKind::IllegalReparent
                | SyncErrorKind::MultipleNewRoots
                | SyncErrorKind::DanglingPendingNode
                | SyncErrorKind::NoRootAfterUpdate
                | SyncErrorKind::UnknownNodeId
        )
    }
}

/// Canonical structured error type
///
/// Carries the classification of a [`TreeError`] together with the node ids
/// involved and optional stream correlation, for logging and for transports
/// that report failures upstream.
#[derive(Debug, Clone)]
pub struct SyncError {
    kind: SyncErrorKind,
    op: Option<String>,
    node_id: Option<NodeId>,
    related_ids: Vec<NodeId>,
    stream_id: Option<StreamId>,
    update_seq: Option<UpdateSeq>,
    message: String,
}

impl SyncError {
    /// Create a new error with the specified kind
    pub fn new(kind: SyncErrorKind) -> Self {
        Self {
            kind,
            op: None,
            node_id: None,
            related_ids: Vec::new(),
            stream_id: None,
            update_seq: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the primary node id
    pub fn with_node_id(mut self, id: NodeId) -> Self {
        self.node_id = Some(id);
        self
    }

    /// Add secondary node ids (parents, pending ids, ...)
    pub fn with_related_ids(mut self, ids: Vec<NodeId>) -> Self {
        self.related_ids = ids;
        self
    }

    /// Add stream correlation
    pub fn with_stream(mut self, stream_id: StreamId, seq: UpdateSeq) -> Self {
        self.stream_id = Some(stream_id);
        self.update_seq = Some(seq);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> SyncErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn node_id(&self) -> Option<NodeId> {
        self.node_id
    }

    pub fn related_ids(&self) -> &[NodeId] {
        &self.related_ids
    }

    pub fn stream_id(&self) -> Option<&StreamId> {
        self.stream_id.as_ref()
    }

    pub fn update_seq(&self) -> Option<UpdateSeq> {
        self.update_seq
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(id) = self.node_id {
            write!(f, " (node_id: {})", id)?;
        }
        if !self.related_ids.is_empty() {
            write!(f, " (related: {})", join_ids(&self.related_ids))?;
        }
        if let (Some(stream), Some(seq)) = (&self.stream_id, self.update_seq) {
            write!(f, " (stream: {} {})", stream, seq)?;
        }
        Ok(())
    }
}

impl std::error::Error for SyncError {}

// ========== End Error Facility ==========

/// Error taxonomy for tree operations
///
/// All variants except `NodeNotFound`, `InvariantViolation` and
/// `Serialization` reject an update. Each names the node id(s) that
/// triggered it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    /// `node_id_to_clear` names a node that does not exist
    #[error("Bad node_id_to_clear: {node_id}")]
    BadClearTarget { node_id: NodeId },

    /// A description lists the same child twice
    #[error("Node {parent_id} has duplicate child id {child_id}")]
    DuplicateChildId { parent_id: NodeId, child_id: NodeId },

    /// An existing node was declared under a different parent (or moved
    /// to/from the root position)
    #[error("Node {node_id} reparented from {} to {}", fmt_parent(.current_parent), fmt_parent(.new_parent))]
    IllegalReparent {
        node_id: NodeId,
        current_parent: Option<NodeId>,
        new_parent: Option<NodeId>,
    },

    /// Two descriptions in one update tried to introduce a new root
    #[error("Update introduces two new roots: {first_root} and {second_root}")]
    MultipleNewRoots {
        first_root: NodeId,
        second_root: NodeId,
    },

    /// Nodes referenced as children (or cleared) but never described
    #[error("Nodes left pending by the update: {}", join_ids(.node_ids))]
    DanglingPendingNode { node_ids: Vec<NodeId> },

    /// The update left the tree without a root
    #[error("No root after update")]
    NoRootAfterUpdate,

    /// A description for an unknown id that does not introduce a root
    #[error("Node {node_id} is not in the tree and not a new root")]
    UnknownNodeId { node_id: NodeId },

    /// Lookup of a node that does not exist
    #[error("Node not found: {node_id}")]
    NodeNotFound { node_id: NodeId },

    /// Tree structure check failed after a commit
    #[error("Invariant violated ({rule}) at node {node_id}: {detail}")]
    InvariantViolation {
        rule: &'static str,
        node_id: NodeId,
        detail: String,
    },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

fn fmt_parent(parent: &Option<NodeId>) -> String {
    match parent {
        Some(id) => id.to_string(),
        None => "<root>".to_string(),
    }
}

impl TreeError {
    pub fn kind(&self) -> SyncErrorKind {
        match self {
            TreeError::BadClearTarget { .. } => SyncErrorKind::BadClearTarget,
            TreeError::DuplicateChildId { .. } => SyncErrorKind::DuplicateChildId,
            TreeError::IllegalReparent { .. } => SyncErrorKind::IllegalReparent,
            TreeError::MultipleNewRoots { .. } => SyncErrorKind::MultipleNewRoots,
            TreeError::DanglingPendingNode { .. } => SyncErrorKind::DanglingPendingNode,
            TreeError::NoRootAfterUpdate => SyncErrorKind::NoRootAfterUpdate,
            TreeError::UnknownNodeId { .. } => SyncErrorKind::UnknownNodeId,
            TreeError::NodeNotFound { .. } => SyncErrorKind::NotFound,
            TreeError::InvariantViolation { .. } => SyncErrorKind::InvariantViolation,
            TreeError::Serialization { .. } => SyncErrorKind::Serialization,
        }
    }
}

/// Conversion from TreeError to the structured SyncError
impl From<TreeError> for SyncError {
    fn from(err: TreeError) -> Self {
        let message = err.to_string();
        let base = SyncError::new(err.kind()).with_message(message);
        match err {
            TreeError::BadClearTarget { node_id }
            | TreeError::UnknownNodeId { node_id }
            | TreeError::NodeNotFound { node_id }
            | TreeError::InvariantViolation { node_id, .. } => base.with_node_id(node_id),

            TreeError::DuplicateChildId {
                parent_id,
                child_id,
            } => base.with_node_id(child_id).with_related_ids(vec![parent_id]),

            TreeError::IllegalReparent {
                node_id,
                current_parent,
                new_parent,
            } => base
                .with_node_id(node_id)
                .with_related_ids(current_parent.into_iter().chain(new_parent).collect()),

            TreeError::MultipleNewRoots {
                first_root,
                second_root,
            } => base
                .with_node_id(second_root)
                .with_related_ids(vec![first_root]),

            TreeError::DanglingPendingNode { node_ids } => base.with_related_ids(node_ids),

            TreeError::NoRootAfterUpdate | TreeError::Serialization { .. } => base,
        }
    }
}

impl From<serde_json::Error> for TreeError {
    fn from(err: serde_json::Error) -> Self {
        TreeError::Serialization {
            message: err.to_string(),
        }
    }
}
