/// Raw RFC 3161 TimeStampResp bytes returned by a timestamp authority
///
/// The bytes are kept exactly as received. The token only has meaning
/// together with the commitment whose digest was sent in the request.
#[derive(Clone, PartialEq, Eq)]
pub struct TimestampToken {
    raw: Vec<u8>,
}

impl TimestampToken {
    pub fn new(raw: Vec<u8>) -> Self {
        Self { raw }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.raw
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl std::fmt::Debug for TimestampToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimestampToken")
            .field("len", &self.raw.len())
            .finish()
    }
}
