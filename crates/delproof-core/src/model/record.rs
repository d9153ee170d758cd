use crate::model::{Commitment, TimestampToken};

/// Terminal artifact of a successful deletion workflow
///
/// Built only once fetch, commit, delete, verification and timestamping have
/// all succeeded. There are no setters: a record is never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionRecord {
    object_id: String,
    commitment: Commitment,
    timestamp: TimestampToken,
}

impl DeletionRecord {
    pub fn new(
        object_id: impl Into<String>,
        commitment: Commitment,
        timestamp: TimestampToken,
    ) -> Self {
        Self {
            object_id: object_id.into(),
            commitment,
            timestamp,
        }
    }

    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    pub fn commitment(&self) -> &Commitment {
        &self.commitment
    }

    pub fn timestamp(&self) -> &TimestampToken {
        &self.timestamp
    }
}
