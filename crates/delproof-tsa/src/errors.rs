//! Error helpers for the timestamp client

use delproof_core::errors::{ExError, ExErrorKind};

pub type Result<T> = std::result::Result<T, ExError>;

/// The TSA could not be reached or did not answer in time
pub fn tsa_unavailable(url: &str, reason: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::TsaUnavailable)
        .with_op("request_timestamp")
        .with_message(format!("timestamp authority {} unreachable: {}", url, reason))
}

/// Malformed request or response
pub fn tsa_protocol(op: &str, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::TsaProtocolError)
        .with_op(op.to_string())
        .with_message(reason)
}

/// The TSA declined to issue a token
pub fn tsa_rejected(reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::TsaRejected)
        .with_op("inspect_response")
        .with_message(reason)
}

/// Classify a transport error from reqwest
///
/// Timeouts, connection failures and interrupted transfers are transient;
/// a body that cannot be decoded is a protocol problem.
pub fn from_reqwest(url: &str, err: reqwest::Error) -> ExError {
    if err.is_decode() {
        return tsa_protocol("request_timestamp", err.to_string());
    }
    tsa_unavailable(url, err)
}

/// Invalid client configuration
pub fn invalid_settings(reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("build_tsa_client")
        .with_message(reason)
}
