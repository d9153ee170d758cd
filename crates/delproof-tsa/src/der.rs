//! Minimal DER primitives
//!
//! Only what a TimeStampReq encoder and a TimeStampResp status reader need:
//! definite-length TLVs with single-byte tags. Long-form lengths are limited
//! to four bytes, far beyond any TSA response.

use delproof_core::errors::{ExError, ExErrorKind};
use thiserror::Error;

pub const TAG_BOOLEAN: u8 = 0x01;
pub const TAG_INTEGER: u8 = 0x02;
pub const TAG_BIT_STRING: u8 = 0x03;
pub const TAG_OCTET_STRING: u8 = 0x04;
pub const TAG_NULL: u8 = 0x05;
pub const TAG_OID: u8 = 0x06;
pub const TAG_UTF8_STRING: u8 = 0x0c;
pub const TAG_SEQUENCE: u8 = 0x30;

/// Decoding failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DerError {
    #[error("DER input truncated: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    #[error("unexpected DER tag: expected 0x{expected:02x}, found 0x{found:02x}")]
    UnexpectedTag { expected: u8, found: u8 },

    #[error("indefinite DER length is not allowed")]
    IndefiniteLength,

    #[error("DER length field of {0} bytes is too large")]
    LengthOverflow(usize),

    #[error("{0} trailing bytes after DER value")]
    TrailingData(usize),

    #[error("DER INTEGER does not fit: {0} bytes")]
    IntegerOverflow(usize),
}

impl From<DerError> for ExError {
    fn from(err: DerError) -> Self {
        ExError::new(ExErrorKind::TsaProtocolError)
            .with_op("decode_der")
            .with_message(err.to_string())
    }
}

fn push_length(len: usize, out: &mut Vec<u8>) {
    if len < 0x80 {
        out.push(len as u8);
        return;
    }
    let bytes = len.to_be_bytes();
    let first = bytes
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(bytes.len() - 1);
    let significant = &bytes[first..];
    out.push(0x80 | significant.len() as u8);
    out.extend_from_slice(significant);
}

/// Encode one tag-length-value
pub fn tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len() + 6);
    out.push(tag);
    push_length(content.len(), &mut out);
    out.extend_from_slice(content);
    out
}

/// SEQUENCE over already-encoded elements
pub fn sequence(elements: &[&[u8]]) -> Vec<u8> {
    tlv(TAG_SEQUENCE, &elements.concat())
}

/// Unsigned big-endian magnitude as a DER INTEGER (minimal, non-negative)
pub fn unsigned_integer(magnitude: &[u8]) -> Vec<u8> {
    let first = magnitude
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(magnitude.len());
    let trimmed = &magnitude[first..];
    let mut content = Vec::with_capacity(trimmed.len() + 1);
    if trimmed.is_empty() || trimmed[0] & 0x80 != 0 {
        content.push(0);
    }
    content.extend_from_slice(trimmed);
    tlv(TAG_INTEGER, &content)
}

/// Sequential reader over concatenated DER values
pub struct DerReader<'a> {
    input: &'a [u8],
}

impl<'a> DerReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input }
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    pub fn peek_tag(&self) -> Option<u8> {
        self.input.first().copied()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DerError> {
        if self.input.len() < n {
            return Err(DerError::Truncated {
                needed: n,
                available: self.input.len(),
            });
        }
        let (head, tail) = self.input.split_at(n);
        self.input = tail;
        Ok(head)
    }

    /// Read the next value, returning its tag and content
    pub fn read_any(&mut self) -> Result<(u8, &'a [u8]), DerError> {
        let tag = self.take(1)?[0];
        let first = self.take(1)?[0];
        let len = if first < 0x80 {
            first as usize
        } else if first == 0x80 {
            return Err(DerError::IndefiniteLength);
        } else {
            let n = (first & 0x7f) as usize;
            if n > 4 {
                return Err(DerError::LengthOverflow(n));
            }
            self.take(n)?
                .iter()
                .fold(0usize, |acc, &b| (acc << 8) | b as usize)
        };
        let content = self.take(len)?;
        Ok((tag, content))
    }

    /// Read the next value and require a specific tag
    pub fn read_expected(&mut self, expected: u8) -> Result<&'a [u8], DerError> {
        let (found, content) = self.read_any()?;
        if found != expected {
            return Err(DerError::UnexpectedTag { expected, found });
        }
        Ok(content)
    }

    /// Require that nothing follows
    pub fn finish(self) -> Result<(), DerError> {
        if self.input.is_empty() {
            Ok(())
        } else {
            Err(DerError::TrailingData(self.input.len()))
        }
    }
}

/// Decode a non-negative INTEGER content that fits in a u64
pub fn integer_to_u64(content: &[u8]) -> Result<u64, DerError> {
    let first = content
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(content.len());
    let significant = &content[first..];
    if significant.len() > 8 {
        return Err(DerError::IntegerOverflow(content.len()));
    }
    Ok(significant
        .iter()
        .fold(0u64, |acc, &b| (acc << 8) | b as u64))
}
