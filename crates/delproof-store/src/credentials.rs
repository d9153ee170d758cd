//! Credential loading
//!
//! The interactive OAuth consent flow lives outside this tool. What arrives
//! here is an already-issued bearer token, either as the raw token text or
//! as an OAuth token JSON document carrying `access_token`.

use crate::errors::{invalid_credentials, Result};
use delproof_core_types::Sensitive;
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
struct TokenDocument {
    access_token: Option<String>,
    token_type: Option<String>,
}

/// Read a bearer token from a credentials file
///
/// # Errors
///
/// `ExErrorKind::InvalidInput` if the file cannot be read, is empty, is JSON
/// without a usable `access_token`, or names a non-bearer token type.
pub fn load_access_token(path: &Path) -> Result<Sensitive<String>> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        invalid_credentials(format!("cannot read credentials {}: {}", path.display(), e))
    })?;
    parse_access_token(&raw)
}

/// Extract a bearer token from credential text
///
/// # Errors
///
/// See [`load_access_token`].
pub fn parse_access_token(raw: &str) -> Result<Sensitive<String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid_credentials("credentials are empty"));
    }

    if !trimmed.starts_with('{') {
        if trimmed.contains(char::is_whitespace) {
            return Err(invalid_credentials(
                "credentials must be a single access token or a token JSON document",
            ));
        }
        return Ok(Sensitive::new(trimmed.to_string()));
    }

    // serde_json errors can quote input; keep the token out of the message
    let document: TokenDocument = serde_json::from_str(trimmed).map_err(|e| {
        invalid_credentials(format!(
            "credentials JSON is malformed at line {} column {}",
            e.line(),
            e.column()
        ))
    })?;

    if let Some(kind) = document.token_type.as_deref() {
        if !kind.eq_ignore_ascii_case("bearer") {
            return Err(invalid_credentials(format!(
                "unsupported token_type '{}'",
                kind
            )));
        }
    }

    match document.access_token {
        Some(token) if !token.trim().is_empty() => Ok(Sensitive::new(token.trim().to_string())),
        _ => Err(invalid_credentials(
            "credentials JSON has no access_token; run the OAuth consent flow first",
        )),
    }
}
