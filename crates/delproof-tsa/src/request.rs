//! TimeStampReq encoding (RFC 3161 section 2.4.1)
//!
//! ```text
//! TimeStampReq ::= SEQUENCE {
//!    version          INTEGER { v1(1) },
//!    messageImprint   MessageImprint,
//!    reqPolicy        TSAPolicyId      OPTIONAL,
//!    nonce            INTEGER          OPTIONAL,
//!    certReq          BOOLEAN          DEFAULT FALSE,
//!    extensions   [0] IMPLICIT Extensions OPTIONAL }
//! ```
//!
//! Only SHA-256 imprints are produced. `reqPolicy` and `extensions` are never
//! sent.

use crate::der::{self, TAG_BOOLEAN, TAG_NULL, TAG_OCTET_STRING, TAG_OID};
use crate::errors::{tsa_protocol, Result};
use ring::rand::{SecureRandom, SystemRandom};

/// id-sha256, 2.16.840.1.101.3.4.2.1
pub const SHA256_OID: [u8; 9] = [0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01];

const SHA256_LEN: usize = 32;
const NONCE_LEN: usize = 8;

/// Optional request fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Include a random 64-bit nonce so the response cannot be replayed
    pub nonce: bool,
    /// Ask the TSA to embed its signing certificate
    pub cert_req: bool,
}

/// An encoded TimeStampReq together with the values the response must echo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampRequest {
    der: Vec<u8>,
    digest: Vec<u8>,
    nonce_der: Option<Vec<u8>>,
}

impl TimestampRequest {
    /// DER bytes to send as the HTTP body
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// Raw digest carried in the message imprint
    pub fn digest(&self) -> &[u8] {
        &self.digest
    }

    /// Encoded nonce INTEGER, when one was requested
    pub fn nonce_der(&self) -> Option<&[u8]> {
        self.nonce_der.as_deref()
    }
}

/// Encode a request for a hex-encoded SHA-256 digest
///
/// # Errors
///
/// `ExErrorKind::TsaProtocolError` if the digest is not 64 hex characters or
/// the system random source fails while generating a nonce.
pub fn encode_request(digest_hex: &str, options: &RequestOptions) -> Result<TimestampRequest> {
    let digest = parse_digest(digest_hex)?;
    let nonce_der = if options.nonce {
        Some(random_nonce()?)
    } else {
        None
    };
    Ok(build(digest, nonce_der, options.cert_req))
}

fn parse_digest(digest_hex: &str) -> Result<Vec<u8>> {
    if digest_hex.len() != SHA256_LEN * 2 {
        return Err(tsa_protocol(
            "encode_request",
            format!(
                "digest must be {} hex characters, got {}",
                SHA256_LEN * 2,
                digest_hex.len()
            ),
        ));
    }
    hex::decode(digest_hex)
        .map_err(|e| tsa_protocol("encode_request", format!("digest is not hex: {}", e)))
}

fn random_nonce() -> Result<Vec<u8>> {
    let mut buf = [0u8; NONCE_LEN];
    SystemRandom::new()
        .fill(&mut buf)
        .map_err(|_| tsa_protocol("encode_request", "system random source unavailable"))?;
    Ok(der::unsigned_integer(&buf))
}

fn build(digest: Vec<u8>, nonce_der: Option<Vec<u8>>, cert_req: bool) -> TimestampRequest {
    let oid = der::tlv(TAG_OID, &SHA256_OID);
    let params = der::tlv(TAG_NULL, &[]);
    let algorithm = der::sequence(&[oid.as_slice(), params.as_slice()]);
    let hashed = der::tlv(TAG_OCTET_STRING, &digest);
    let imprint = der::sequence(&[algorithm.as_slice(), hashed.as_slice()]);
    let version = der::unsigned_integer(&[1]);

    let mut fields: Vec<&[u8]> = vec![version.as_slice(), imprint.as_slice()];
    if let Some(nonce) = &nonce_der {
        fields.push(nonce.as_slice());
    }
    let cert_req_der = der::tlv(TAG_BOOLEAN, &[0xff]);
    if cert_req {
        fields.push(cert_req_der.as_slice());
    }

    TimestampRequest {
        der: der::sequence(&fields),
        digest,
        nonce_der,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::der::{DerReader, TAG_INTEGER, TAG_SEQUENCE};
    use delproof_core::ExErrorKind;

    const DIGEST_HEX: &str = "ff79bf8050b75897524d693a81436a04ccd03bbe16d52d95dbab5ba36424e57b";

    fn expected_plain_request() -> Vec<u8> {
        let mut expected = vec![
            0x30, 0x36, // TimeStampReq
            0x02, 0x01, 0x01, // version v1
            0x30, 0x31, // MessageImprint
            0x30, 0x0d, // AlgorithmIdentifier
            0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01, // id-sha256
            0x05, 0x00, // NULL parameters
            0x04, 0x20, // hashedMessage
        ];
        expected.extend_from_slice(&hex::decode(DIGEST_HEX).unwrap());
        expected
    }

    #[test]
    fn test_plain_request_layout() {
        let request = encode_request(DIGEST_HEX, &RequestOptions::default()).unwrap();
        assert_eq!(request.der(), expected_plain_request().as_slice());
        assert_eq!(request.der().len(), 56);
        assert!(request.nonce_der().is_none());
    }

    #[test]
    fn test_plain_request_is_deterministic() {
        let a = encode_request(DIGEST_HEX, &RequestOptions::default()).unwrap();
        let b = encode_request(DIGEST_HEX, &RequestOptions::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_cert_req_appends_true_boolean() {
        let options = RequestOptions {
            nonce: false,
            cert_req: true,
        };
        let request = encode_request(DIGEST_HEX, &options).unwrap();
        assert_eq!(request.der()[1], 0x39);
        assert_eq!(&request.der()[request.der().len() - 3..], &[0x01, 0x01, 0xff]);
    }

    #[test]
    fn test_nonce_is_random_positive_integer() {
        let options = RequestOptions {
            nonce: true,
            cert_req: false,
        };
        let a = encode_request(DIGEST_HEX, &options).unwrap();
        let b = encode_request(DIGEST_HEX, &options).unwrap();
        assert_ne!(a.nonce_der(), b.nonce_der());

        let mut outer = DerReader::new(a.der());
        let body = outer.read_expected(TAG_SEQUENCE).unwrap();
        outer.finish().unwrap();
        let mut fields = DerReader::new(body);
        fields.read_expected(TAG_INTEGER).unwrap();
        fields.read_expected(TAG_SEQUENCE).unwrap();
        let nonce = fields.read_expected(TAG_INTEGER).unwrap();
        assert!(nonce[0] & 0x80 == 0, "nonce must encode as a positive INTEGER");
        assert!(fields.is_empty());
    }

    #[test]
    fn test_rejects_wrong_length_digest() {
        let err = encode_request("abcd", &RequestOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::TsaProtocolError);
    }

    #[test]
    fn test_rejects_non_hex_digest() {
        let bad = "zz".repeat(32);
        let err = encode_request(&bad, &RequestOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::TsaProtocolError);
        assert!(err.message().contains("not hex"));
    }
}
