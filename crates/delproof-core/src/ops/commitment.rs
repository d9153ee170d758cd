//! Commitment builder
//!
//! Canonicalizes object metadata into `"{id}:{name}:{size}:{checksum}"` and
//! hashes it with SHA-256. The field order is part of the receipt format:
//! receipts issued earlier can only be re-verified if it never changes.

use crate::model::{Commitment, ObjectMetadata};
use sha2::{Digest, Sha256};

/// The exact pre-image that is hashed into the commitment
pub fn canonical_string(meta: &ObjectMetadata) -> String {
    format!(
        "{}:{}:{}:{}",
        meta.id, meta.name, meta.size_bytes, meta.checksum
    )
}

/// Compute the commitment for a metadata snapshot
pub fn commit(meta: &ObjectMetadata) -> Commitment {
    let mut hasher = Sha256::new();
    hasher.update(canonical_string(meta).as_bytes());
    Commitment::from_digest(&hasher.finalize())
}
