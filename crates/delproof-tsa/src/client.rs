//! RFC 3161 HTTP transport
//!
//! One POST per request, `application/timestamp-query` in and
//! `application/timestamp-reply` out. The reply bytes are returned verbatim
//! once they have been checked to answer the request.

use crate::errors::{from_reqwest, invalid_settings, tsa_protocol, Result};
use crate::request::{encode_request, RequestOptions};
use crate::response::inspect_response;
use delproof_core::errors::ExError;
use delproof_core::{TimestampAuthority, TimestampToken};
use std::time::{Duration, Instant};

pub const DEFAULT_TSA_URL: &str = "https://freetsa.org/tsr";

const QUERY_MEDIA_TYPE: &str = "application/timestamp-query";
const REPLY_MEDIA_TYPE: &str = "application/timestamp-reply";

/// Client settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub url: String,
    /// Whole-request deadline
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub request: RequestOptions,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_TSA_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            request: RequestOptions::default(),
        }
    }
}

/// Blocking RFC 3161 client
pub struct HttpTimestampClient {
    url: reqwest::Url,
    options: RequestOptions,
    http_client: reqwest::blocking::Client,
}

impl HttpTimestampClient {
    /// Build a client.
    ///
    /// # Errors
    ///
    /// `ExErrorKind::InvalidInput` if the URL is not an absolute http(s) URL,
    /// a timeout is zero, or the HTTP client cannot be constructed.
    pub fn new(settings: ClientSettings) -> Result<Self> {
        let url = reqwest::Url::parse(settings.url.trim())
            .map_err(|e| invalid_settings(format!("TSA URL '{}': {}", settings.url, e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(invalid_settings(format!(
                "TSA URL '{}' must use http or https",
                settings.url
            )));
        }
        if settings.timeout.is_zero() || settings.connect_timeout.is_zero() {
            return Err(invalid_settings("TSA timeouts must be greater than zero"));
        }

        let http_client = reqwest::blocking::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| invalid_settings(e.to_string()))?;

        Ok(Self {
            url,
            options: settings.request,
            http_client,
        })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    fn post(&self, body: Vec<u8>) -> Result<Vec<u8>> {
        let url = self.url.as_str();
        let response = self
            .http_client
            .post(self.url.clone())
            .header(reqwest::header::CONTENT_TYPE, QUERY_MEDIA_TYPE)
            .header(reqwest::header::ACCEPT, REPLY_MEDIA_TYPE)
            .body(body)
            .send()
            .map_err(|e| from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(tsa_protocol(
                "request_timestamp",
                format!("TSA returned HTTP {}", status),
            )
            .with_http_status(status.as_u16()));
        }

        let bytes = response.bytes().map_err(|e| from_reqwest(url, e))?;
        if bytes.is_empty() {
            return Err(
                tsa_protocol("request_timestamp", "TSA returned an empty body")
                    .with_http_status(status.as_u16()),
            );
        }
        Ok(bytes.to_vec())
    }
}

impl TimestampAuthority for HttpTimestampClient {
    fn request_timestamp(&self, digest_hex: &str) -> std::result::Result<TimestampToken, ExError> {
        let started = Instant::now();
        let request = encode_request(digest_hex, &self.options)?;
        tracing::debug!(
            tsa.url = self.url.as_str(),
            digest = digest_hex,
            request_len = request.der().len(),
            nonce = request.nonce_der().is_some(),
            "sending timestamp request"
        );

        let body = self.post(request.der().to_vec())?;
        let summary = inspect_response(&body, &request)?;

        tracing::debug!(
            tsa.url = self.url.as_str(),
            status = ?summary.status,
            token_len = body.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "timestamp granted"
        );
        Ok(TimestampToken::new(body))
    }
}
