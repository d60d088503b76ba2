use treesync_core::errors::{SyncError, SyncErrorKind, TreeError};
use treesync_core::NodeId;
use treesync_core_types::{StreamId, UpdateSeq};

#[test]
fn test_reparent_verifiable_by_kind() {
    let err = TreeError::IllegalReparent {
        node_id: NodeId::new(2),
        current_parent: Some(NodeId::new(1)),
        new_parent: Some(NodeId::new(3)),
    };

    let sync_err: SyncError = err.into();

    assert_eq!(sync_err.kind(), SyncErrorKind::IllegalReparent);
    assert_eq!(sync_err.code(), "ERR_ILLEGAL_REPARENT");
    assert_eq!(sync_err.node_id(), Some(NodeId::new(2)));
    assert_eq!(sync_err.related_ids(), &[NodeId::new(1), NodeId::new(3)]);
}

#[test]
fn test_pending_error_lists_every_id() {
    let err = TreeError::DanglingPendingNode {
        node_ids: vec![NodeId::new(7), NodeId::new(99)],
    };

    let sync_err: SyncError = err.into();

    assert_eq!(sync_err.kind(), SyncErrorKind::DanglingPendingNode);
    assert_eq!(sync_err.node_id(), None);
    assert_eq!(sync_err.related_ids(), &[NodeId::new(7), NodeId::new(99)]);
    assert!(sync_err.message().contains("7, 99"));
}

#[test]
fn test_not_found_is_not_a_rejected_update() {
    let sync_err: SyncError = TreeError::NodeNotFound {
        node_id: NodeId::new(5),
    }
    .into();

    assert_eq!(sync_err.code(), "ERR_NOT_FOUND");
    assert!(!sync_err.kind().is_rejected_update());
}

#[test]
fn test_error_kind_code_mapping() {
    // Each kind has a stable, unique code
    let kinds = vec![
        (SyncErrorKind::BadClearTarget, "ERR_BAD_CLEAR_TARGET"),
        (SyncErrorKind::DuplicateChildId, "ERR_DUPLICATE_CHILD_ID"),
        (SyncErrorKind::IllegalReparent, "ERR_ILLEGAL_REPARENT"),
        (SyncErrorKind::MultipleNewRoots, "ERR_MULTIPLE_NEW_ROOTS"),
        (SyncErrorKind::DanglingPendingNode, "ERR_DANGLING_PENDING_NODE"),
        (SyncErrorKind::NoRootAfterUpdate, "ERR_NO_ROOT_AFTER_UPDATE"),
        (SyncErrorKind::UnknownNodeId, "ERR_UNKNOWN_NODE_ID"),
        (SyncErrorKind::NotFound, "ERR_NOT_FOUND"),
        (SyncErrorKind::InvariantViolation, "ERR_INVARIANT_VIOLATION"),
        (SyncErrorKind::Serialization, "ERR_SERIALIZATION"),
    ];

    let mut seen = std::collections::HashSet::new();
    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        assert!(seen.insert(expected_code), "Duplicate code {}", expected_code);
    }
}

#[test]
fn test_builder_and_display() {
    let err = SyncError::new(SyncErrorKind::MultipleNewRoots)
        .with_op("apply_update")
        .with_node_id(NodeId::new(-2))
        .with_related_ids(vec![NodeId::new(-1)])
        .with_stream(StreamId::from_string("tab-3".to_string()), UpdateSeq::new(12))
        .with_message("two roots");

    assert_eq!(err.op(), Some("apply_update"));
    assert_eq!(err.stream_id().map(StreamId::as_str), Some("tab-3"));
    assert_eq!(err.update_seq(), Some(UpdateSeq::new(12)));
    assert_eq!(
        err.to_string(),
        "[ERR_MULTIPLE_NEW_ROOTS] in operation 'apply_update': two roots (node_id: -2) (related: -1) (stream: tab-3 #12)"
    );
}

#[test]
fn test_serde_error_maps_to_serialization() {
    let parse = serde_json::from_str::<serde_json::Value>("{not json");
    let err: TreeError = match parse {
        Ok(_) => panic!("expected parse failure"),
        Err(e) => e.into(),
    };

    assert!(matches!(err, TreeError::Serialization { .. }));
    assert_eq!(SyncError::from(err).kind(), SyncErrorKind::Serialization);
}
