//! delproof core - proof-of-deletion domain kernel
//!
//! This crate holds everything of the proof-of-deletion workflow that does
//! not perform I/O:
//! - Object metadata, commitment, timestamp token and deletion record models
//! - The commitment builder (canonical string + SHA-256)
//! - The receipt assembler
//! - Capability traits for the object store, timestamp authority and renderer
//! - The structured error facility and logging facility

pub mod capability;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;

#[doc(hidden)]
pub use delproof_core_types as core_types;

// Re-export commonly used types
pub use capability::{Document, ObjectPresence, ObjectStore, ReceiptRenderer, TimestampAuthority};
pub use errors::{ExError, ExErrorKind, Result};
pub use model::{
    Commitment, DeletionRecord, ObjectMetadata, ReceiptData, TimestampToken, WorkflowState,
};
pub use ops::{assemble, commit};
