//! Error helpers for the store adapters and renderers

use delproof_core::errors::{ExError, ExErrorKind};

pub type Result<T> = std::result::Result<T, ExError>;

/// The object does not exist in the store
pub fn not_found(object_id: &str) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op("fetch_metadata")
        .with_object_id(object_id)
        .with_message(format!("object {} not found", object_id))
}

/// The store could not be reached or answered unexpectedly
pub fn store_unavailable(op: &str, object_id: &str, reason: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::StoreUnavailable)
        .with_op(op.to_string())
        .with_object_id(object_id)
        .with_message(format!("object store unavailable: {}", reason))
}

/// The store did not accept the delete
pub fn delete_failed(object_id: &str, reason: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::DeleteFailed)
        .with_op("delete_object")
        .with_object_id(object_id)
        .with_message(format!("delete of {} failed: {}", object_id, reason))
}

/// The delete request may have reached the store before it failed
pub fn delete_outcome_unknown(object_id: &str, reason: impl std::fmt::Display) -> ExError {
    delete_failed(object_id, reason).with_indeterminate_outcome()
}

/// A receipt document could not be produced
pub fn render_error(object_id: &str, reason: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::RenderError)
        .with_op("render_receipt")
        .with_object_id(object_id)
        .with_message(reason.to_string())
}

/// Unusable credential material
pub fn invalid_credentials(reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("load_credentials")
        .with_message(reason)
}

/// Invalid adapter configuration
pub fn invalid_settings(reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("build_store_client")
        .with_message(reason)
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}
