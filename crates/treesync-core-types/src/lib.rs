//! Core types shared across treesync facilities
//!
//! This crate provides the small set of types used by the engine, its
//! logging facility and the CLI alike:
//!
//! - **Correlation types**: StreamId, UpdateSeq, UpdateContext
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{StreamId, UpdateContext, UpdateSeq};
