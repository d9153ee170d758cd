use serde::{Deserialize, Serialize};

/// Snapshot of a remote object's metadata, taken once before deletion
///
/// The snapshot is owned by a single workflow run and never changes after
/// it has been fetched; the commitment is computed from exactly these values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectMetadata {
    pub id: String,
    pub name: String,
    pub size_bytes: u64,
    /// Content checksum as reported by the store (MD5 hex for Drive)
    pub checksum: String,
}

impl ObjectMetadata {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        size_bytes: u64,
        checksum: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size_bytes,
            checksum: checksum.into(),
        }
    }
}
