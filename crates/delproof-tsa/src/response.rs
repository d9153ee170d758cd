//! TimeStampResp inspection (RFC 3161 section 2.4.2)
//!
//! ```text
//! TimeStampResp ::= SEQUENCE {
//!    status          PKIStatusInfo,
//!    timeStampToken  TimeStampToken OPTIONAL }
//!
//! PKIStatusInfo ::= SEQUENCE {
//!    status        PKIStatus,
//!    statusString  PKIFreeText     OPTIONAL,
//!    failInfo      PKIFailureInfo  OPTIONAL }
//! ```
//!
//! The response is read, never rewritten. Signature and certificate chain
//! validation are out of scope; the checks here only make sure the bytes are
//! a granted response that actually answers the request that was sent.

use crate::der::{
    integer_to_u64, DerReader, TAG_BIT_STRING, TAG_INTEGER, TAG_SEQUENCE, TAG_UTF8_STRING,
};
use crate::errors::{tsa_protocol, tsa_rejected, Result};
use crate::request::TimestampRequest;

/// PKIStatus values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PkiStatus {
    Granted,
    GrantedWithMods,
    Rejection,
    Waiting,
    RevocationWarning,
    RevocationNotification,
}

impl PkiStatus {
    fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(PkiStatus::Granted),
            1 => Some(PkiStatus::GrantedWithMods),
            2 => Some(PkiStatus::Rejection),
            3 => Some(PkiStatus::Waiting),
            4 => Some(PkiStatus::RevocationWarning),
            5 => Some(PkiStatus::RevocationNotification),
            _ => None,
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, PkiStatus::Granted | PkiStatus::GrantedWithMods)
    }
}

// PKIFailureInfo named bits
const FAILURE_BITS: [(usize, &str); 8] = [
    (0, "badAlg"),
    (2, "badRequest"),
    (5, "badDataFormat"),
    (14, "timeNotAvailable"),
    (15, "unacceptedPolicy"),
    (16, "unacceptedExtension"),
    (17, "addInfoNotAvailable"),
    (25, "systemFailure"),
];

/// What was learned from a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSummary {
    pub status: PkiStatus,
    pub status_text: Vec<String>,
    pub failure_info: Vec<&'static str>,
    /// Content length of the timeStampToken ContentInfo
    pub token_len: usize,
}

/// Parse a TimeStampResp and check that it answers `request`
///
/// # Errors
///
/// - `ExErrorKind::TsaRejected` when the status is not granted
/// - `ExErrorKind::TsaProtocolError` when the bytes are not a TimeStampResp,
///   when a granted response has no token, or when the token does not carry
///   the requested digest (or nonce, if one was sent)
pub fn inspect_response(body: &[u8], request: &TimestampRequest) -> Result<ResponseSummary> {
    let (summary, token) = parse_summary(body)?;

    if !summary.status.is_granted() {
        let mut reason = format!("TSA answered {:?}", summary.status);
        if !summary.status_text.is_empty() {
            reason.push_str(&format!(": {}", summary.status_text.join("; ")));
        }
        if !summary.failure_info.is_empty() {
            reason.push_str(&format!(" [{}]", summary.failure_info.join(", ")));
        }
        return Err(tsa_rejected(reason));
    }

    let token = match token {
        Some(token) if !token.is_empty() => token,
        _ => {
            return Err(tsa_protocol(
                "inspect_response",
                "granted response carries no timeStampToken",
            ))
        }
    };
    if !contains(token, request.digest()) {
        return Err(tsa_protocol(
            "inspect_response",
            "timeStampToken does not carry the requested digest",
        ));
    }
    if let Some(nonce) = request.nonce_der() {
        if !contains(token, nonce) {
            return Err(tsa_protocol(
                "inspect_response",
                "timeStampToken does not echo the request nonce",
            ));
        }
    }

    Ok(summary)
}

// The token is a CMS ContentInfo; its content is returned for the binding checks
fn parse_summary(body: &[u8]) -> Result<(ResponseSummary, Option<&[u8]>)> {
    let mut outer = DerReader::new(body);
    let response = outer.read_expected(TAG_SEQUENCE)?;
    outer.finish()?;

    let mut fields = DerReader::new(response);
    let status_info = fields.read_expected(TAG_SEQUENCE)?;
    let token = if fields.is_empty() {
        None
    } else {
        Some(fields.read_expected(TAG_SEQUENCE)?)
    };
    fields.finish()?;
    let token_len = token.map_or(0, <[u8]>::len);

    let mut info = DerReader::new(status_info);
    let code = integer_to_u64(info.read_expected(TAG_INTEGER)?)?;
    let status = PkiStatus::from_code(code).ok_or_else(|| {
        tsa_protocol("inspect_response", format!("unknown PKIStatus {}", code))
    })?;

    let mut status_text = Vec::new();
    if info.peek_tag() == Some(TAG_SEQUENCE) {
        let mut texts = DerReader::new(info.read_expected(TAG_SEQUENCE)?);
        while !texts.is_empty() {
            let text = texts.read_expected(TAG_UTF8_STRING)?;
            status_text.push(String::from_utf8_lossy(text).into_owned());
        }
    }

    let mut failure_info = Vec::new();
    if info.peek_tag() == Some(TAG_BIT_STRING) {
        let bits = info.read_expected(TAG_BIT_STRING)?;
        // the first content byte counts unused trailing bits
        let flags = bits.get(1..).unwrap_or_default();
        for (bit, name) in FAILURE_BITS {
            let set = flags
                .get(bit / 8)
                .map(|byte| byte & (0x80 >> (bit % 8)) != 0)
                .unwrap_or(false);
            if set {
                failure_info.push(name);
            }
        }
    }

    Ok((
        ResponseSummary {
            status,
            status_text,
            failure_info,
            token_len,
        },
        token,
    ))
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}
