use serde::{Deserialize, Serialize};

/// Structured receipt payload handed to a renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptData {
    pub object_id: String,
    /// Pre-delete SHA-256 commitment, lowercase hex
    pub digest_hex: String,
    /// Size of the TSA response; a cheap signal that an attestation exists
    pub token_length: usize,
}
