use serde::Serialize;

/// SHA-256 commitment over an object's canonical metadata string
///
/// Only produced by [`crate::ops::commitment::commit`], which guarantees the
/// digest is 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Commitment {
    digest_hex: String,
}

impl Commitment {
    pub(crate) fn from_digest(digest: &[u8]) -> Self {
        Self {
            digest_hex: hex::encode(digest),
        }
    }

    /// Lowercase hex rendering of the digest, as sent to the TSA
    pub fn digest_hex(&self) -> &str {
        &self.digest_hex
    }

    /// Raw digest bytes
    pub fn digest_bytes(&self) -> Vec<u8> {
        // digest_hex is always produced by hex::encode
        hex::decode(&self.digest_hex).unwrap_or_default()
    }
}

impl std::fmt::Display for Commitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.digest_hex)
    }
}
