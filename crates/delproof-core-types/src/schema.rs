//! Canonical schema constants for structured logging
//!
//! Keeps field names identical across the core, the adapters and the CLI.

// Canonical field keys
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";

// Workflow fields
pub const FIELD_OBJECT_ID: &str = "object_id";
pub const FIELD_STATE: &str = "state";
pub const FIELD_DISPOSITION: &str = "disposition";

// Error fields
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_TRANSITION: &str = "transition";
