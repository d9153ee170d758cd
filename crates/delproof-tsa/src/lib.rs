//! delproof TSA - RFC 3161 timestamp client
//!
//! Provides:
//! - An in-process DER encoder for `TimeStampReq` (SHA-256, optional nonce)
//! - Inspection of the `TimeStampResp` status without re-encoding it
//! - A blocking HTTP client implementing `TimestampAuthority`
//! - A bounded retry wrapper for transport failures

pub mod client;
pub mod der;
pub mod errors;
pub mod request;
pub mod response;
pub mod retry;

pub use client::{ClientSettings, HttpTimestampClient, DEFAULT_TSA_URL};
pub use request::{encode_request, RequestOptions, TimestampRequest};
pub use response::{inspect_response, PkiStatus, ResponseSummary};
pub use retry::{RetryPolicy, RetryingTimestampAuthority};
