//! File-backed receipt renderers

use crate::atomic::atomic_write;
use crate::errors::render_error;
use chrono::{DateTime, Utc};
use delproof_core::errors::ExError;
use delproof_core::ops::render_text;
use delproof_core::{Document, ReceiptData, ReceiptRenderer};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Receipt file name for an object id
///
/// Ids made only of `[A-Za-z0-9_-]` are used as is. Any other id has the
/// unsafe characters replaced and a short SHA-256 prefix of the raw id
/// appended, so distinct ids never share a file.
pub fn receipt_file_name(object_id: &str, extension: &str) -> String {
    let safe: String = object_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if safe == object_id {
        return format!("receipt_{}.{}", safe, extension);
    }
    let digest = Sha256::digest(object_id.as_bytes());
    format!(
        "receipt_{}-{}.{}",
        safe,
        hex::encode(&digest[..4]),
        extension
    )
}

fn write_document(
    dir: &Path,
    receipt: &ReceiptData,
    extension: &str,
    media_type: &str,
    bytes: Vec<u8>,
) -> Result<Document, ExError> {
    let path = dir.join(receipt_file_name(&receipt.object_id, extension));
    atomic_write(&path, &bytes).map_err(|e| {
        render_error(
            &receipt.object_id,
            format!("cannot write {}: {}", path.display(), e.message()),
        )
    })?;
    tracing::info!(
        object_id = %receipt.object_id,
        path = %path.display(),
        "receipt written"
    );
    Ok(Document {
        media_type: media_type.to_string(),
        bytes,
        path: Some(path),
    })
}

/// Writes the plain-text receipt as `receipt_{id}.pdf`
///
/// The extension is kept for compatibility with existing receipt archives;
/// the content is plain text.
pub struct TextReceiptRenderer {
    output_dir: PathBuf,
}

impl TextReceiptRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl ReceiptRenderer for TextReceiptRenderer {
    fn render(&self, receipt: &ReceiptData) -> Result<Document, ExError> {
        write_document(
            &self.output_dir,
            receipt,
            "pdf",
            "text/plain",
            render_text(receipt).into_bytes(),
        )
    }
}

#[derive(Serialize)]
struct JsonReceipt<'a> {
    #[serde(flatten)]
    receipt: &'a ReceiptData,
    rendered_at: DateTime<Utc>,
}

/// Writes `receipt_{id}.json`
pub struct JsonReceiptRenderer {
    output_dir: PathBuf,
}

impl JsonReceiptRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl ReceiptRenderer for JsonReceiptRenderer {
    fn render(&self, receipt: &ReceiptData) -> Result<Document, ExError> {
        let payload = JsonReceipt {
            receipt,
            rendered_at: Utc::now(),
        };
        let mut bytes = serde_json::to_vec_pretty(&payload)
            .map_err(|e| render_error(&receipt.object_id, e))?;
        bytes.push(b'\n');
        write_document(
            &self.output_dir,
            receipt,
            "json",
            "application/json",
            bytes,
        )
    }
}
