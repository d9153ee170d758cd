//! Receipt assembler
//!
//! Maps a finished [`DeletionRecord`] onto the [`ReceiptData`] payload that
//! renderers consume. Assembly refuses to fill in a missing value: an empty
//! constituent aborts with `MissingField`.

use crate::errors::{ReceiptError, Result};
use crate::model::{DeletionRecord, ReceiptData};

/// Build the receipt payload for a completed deletion
///
/// # Errors
///
/// Returns `ExErrorKind::MissingField` if the record has an empty object id,
/// digest or timestamp token.
pub fn assemble(record: &DeletionRecord) -> Result<ReceiptData> {
    if record.object_id().is_empty() {
        return Err(ReceiptError::MissingObjectId.into());
    }
    if record.commitment().digest_hex().is_empty() {
        return Err(ReceiptError::MissingDigest {
            object_id: record.object_id().to_string(),
        }
        .into());
    }
    if record.timestamp().is_empty() {
        return Err(ReceiptError::MissingTimestamp {
            object_id: record.object_id().to_string(),
        }
        .into());
    }

    Ok(ReceiptData {
        object_id: record.object_id().to_string(),
        digest_hex: record.commitment().digest_hex().to_string(),
        token_length: record.timestamp().len(),
    })
}

/// Plain-text receipt body shared by file renderers
pub fn render_text(receipt: &ReceiptData) -> String {
    format!(
        "Proof of Deletion\n\
         Object ID: {}\n\
         Pre-delete SHA-256: {}\n\
         TSA response bytes: {}\n",
        receipt.object_id, receipt.digest_hex, receipt.token_length
    )
}
