//! Capability traits for the workflow's external collaborators
//!
//! The deletion workflow never talks to a concrete store, timestamp authority
//! or renderer. It is handed implementations of these traits, so alternate
//! backends can be substituted without touching the state machine.

use crate::errors::ExError;
use crate::model::{ObjectMetadata, ReceiptData, TimestampToken};
use crate::ops::receipt::render_text;
use std::path::PathBuf;

/// Outcome of a presence probe against the object store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectPresence {
    Present,
    Absent,
}

/// Remote object store holding the object to delete
pub trait ObjectStore: Send + Sync {
    /// Fetch the metadata snapshot of an object.
    ///
    /// # Errors
    ///
    /// `ExErrorKind::NotFound` if the object does not exist,
    /// `ExErrorKind::StoreUnavailable` on transport failure or timeout.
    fn fetch(&self, object_id: &str) -> Result<ObjectMetadata, ExError>;

    /// Delete an object. Deletion is irreversible.
    ///
    /// # Errors
    ///
    /// `ExErrorKind::DeleteFailed` if the store did not accept the delete.
    fn delete(&self, object_id: &str) -> Result<(), ExError>;

    /// Probe whether an object is still retrievable.
    ///
    /// # Errors
    ///
    /// `ExErrorKind::StoreUnavailable` if the probe itself could not complete.
    fn get(&self, object_id: &str) -> Result<ObjectPresence, ExError>;
}

/// Trusted timestamp authority speaking RFC 3161
pub trait TimestampAuthority: Send + Sync {
    /// Obtain a timestamp over a hex-encoded SHA-256 digest.
    ///
    /// # Errors
    ///
    /// `ExErrorKind::TsaUnavailable`, `ExErrorKind::TsaProtocolError` or
    /// `ExErrorKind::TsaRejected`.
    fn request_timestamp(&self, digest_hex: &str) -> Result<TimestampToken, ExError>;
}

/// A rendered receipt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub media_type: String,
    pub bytes: Vec<u8>,
    /// Where the document was written, for renderers that persist it
    pub path: Option<PathBuf>,
}

/// Best-effort sink turning receipt data into a document
pub trait ReceiptRenderer: Send + Sync {
    /// Render a receipt.
    ///
    /// # Errors
    ///
    /// `ExErrorKind::RenderError`. The workflow reports it without revoking
    /// the deletion record.
    fn render(&self, receipt: &ReceiptData) -> Result<Document, ExError>;
}

/// Renders the plain-text receipt in memory without persisting it.
pub struct InMemoryReceiptRenderer;

impl ReceiptRenderer for InMemoryReceiptRenderer {
    fn render(&self, receipt: &ReceiptData) -> Result<Document, ExError> {
        Ok(Document {
            media_type: "text/plain".to_string(),
            bytes: render_text(receipt).into_bytes(),
            path: None,
        })
    }
}
