//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names identical between the engine's log
//! events, the structured error facility and anything that parses them.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_STREAM_ID: &str = "stream_id";
pub const FIELD_UPDATE_SEQ: &str = "update_seq";

// Node identifiers
pub const FIELD_NODE_ID: &str = "node_id";
pub const FIELD_PARENT_ID: &str = "parent_id";
pub const FIELD_ROOT_ID: &str = "root_id";
pub const FIELD_CLEAR_ID: &str = "node_id_to_clear";

// Update sizes and outcome
pub const FIELD_NODE_COUNT: &str = "node_count";
pub const FIELD_CREATED_COUNT: &str = "created_count";
pub const FIELD_DELETED_COUNT: &str = "deleted_count";
pub const FIELD_ROOT_CHANGED: &str = "root_changed";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
