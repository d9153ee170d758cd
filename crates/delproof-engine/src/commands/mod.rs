//! Command orchestration layer.
//!
//! Coordinates the core domain operations with the store, timestamp and
//! renderer capabilities.

pub mod deletion;
