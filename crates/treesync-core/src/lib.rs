//! Treesync Core - incremental tree synchronization engine
//!
//! This crate keeps an in-memory, identity-stable tree of nodes in sync with
//! a remote source that sends *updates*: flat, unordered batches of node
//! descriptions. It provides:
//! - The node model and a generic payload contract ([`NodeData`])
//! - A [`Tree`] with a single mutation entry point, [`Tree::apply_update`]
//! - A staged, all-or-nothing update applier with per-node change
//!   classification and observer callbacks
//! - Structural invariant checks, traversal helpers, rendering and
//!   snapshot digests
//! - A structured error and logging facility

pub mod apply;
pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod observer;
pub mod ops;
pub mod render;
pub mod report;
pub mod rules;
pub mod snapshot;
pub mod traversal;
pub mod tree;

// Re-export commonly used types
pub use config::{FailurePolicy, TreeConfig};
pub use errors::{Result, SyncError, SyncErrorKind, TreeError};
pub use model::{Node, NodeAttributes, NodeData, NodeDescription, NodeId, NodeRole, Update};
pub use observer::{ChangeObserver, NoopObserver, ObservedEvent, RecordingObserver};
pub use ops::NodeRegistry;
pub use report::{ChangeType, NodeChange, UpdateReport};
pub use snapshot::TreeSnapshot;
pub use tree::Tree;
