//! Core types shared across the delproof crates
//!
//! Used by both the error facility and the logging facility:
//!
//! - **Correlation**: `RunId` tagging every event of one deletion workflow
//! - **Sensitive data**: `Sensitive<T>` keeps access tokens out of logs
//! - **Schema constants**: canonical log field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::RunId;
pub use sensitive::Sensitive;
