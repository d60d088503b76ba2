//! Canonical logging macros
//!
//! Every engine operation logs a `start` event and exactly one of `end` or
//! `end_error`, all carrying `component` and `op`.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use treesync_core::log_op_start;
/// log_op_start!("apply_update");
/// log_op_start!("apply_update", node_count = 3);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = treesync_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = treesync_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use treesync_core::log_op_end;
/// log_op_end!("apply_update", duration_ms = 42);
/// log_op_end!("apply_update", duration_ms = 42, created_count = 2);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = treesync_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = treesync_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// The error is converted into a [`SyncError`](crate::errors::SyncError)
/// so the event carries the canonical kind and code.
///
/// # Example
///
/// ```
/// # use treesync_core::{log_op_error, errors::TreeError};
/// let err = TreeError::NoRootAfterUpdate;
/// log_op_error!("apply_update", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        use $crate::errors::SyncError;
        let sync_err: SyncError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = treesync_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?sync_err.kind(),
            err_code = sync_err.code(),
            error = %sync_err,
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        use $crate::errors::SyncError;
        let sync_err: SyncError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = treesync_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?sync_err.kind(),
            err_code = sync_err.code(),
            error = %sync_err,
            $($field)*
        );
    }};
}
