//! delproof engine - workflow orchestration
//!
//! Provides the proof-of-deletion state machine and the configuration that
//! wires concrete stores, timestamp authorities and renderers into it.

pub mod commands;
pub mod config;

pub use commands::deletion::{
    prove_deletion, DeletionOutcome, Disposition, WorkflowFailure, OP_PROVE_DELETION,
};
pub use config::{ReceiptFormat, WorkflowConfig};
