//! Google Drive v3 object store
//!
//! Talks to the Drive REST API directly with a bearer token. Shared drives
//! are supported on every call.

use crate::errors::{
    delete_failed, delete_outcome_unknown, invalid_settings, not_found, store_unavailable, Result,
};
use delproof_core::errors::ExError;
use delproof_core::{ObjectMetadata, ObjectPresence, ObjectStore};
use delproof_core_types::Sensitive;
use reqwest::blocking::{Client, Response};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_DRIVE_BASE_URL: &str = "https://www.googleapis.com/drive/v3";

const METADATA_FIELDS: &str = "id,name,size,md5Checksum";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveSettings {
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for DriveSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DRIVE_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

// Drive serialises int64 values as JSON strings
#[derive(Deserialize)]
#[serde(untagged)]
enum SizeField {
    Text(String),
    Number(u64),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    name: String,
    #[serde(default)]
    size: Option<SizeField>,
    #[serde(default)]
    md5_checksum: Option<String>,
}

impl DriveFile {
    fn into_metadata(self) -> std::result::Result<ObjectMetadata, String> {
        let size_bytes = match self.size {
            None => 0,
            Some(SizeField::Number(n)) => n,
            Some(SizeField::Text(text)) => text
                .parse::<u64>()
                .map_err(|_| format!("size '{}' is not a byte count", text))?,
        };
        Ok(ObjectMetadata::new(
            self.id,
            self.name,
            size_bytes,
            self.md5_checksum.unwrap_or_default(),
        ))
    }
}

pub struct DriveObjectStore {
    base_url: Url,
    token: Sensitive<String>,
    http_client: Client,
}

impl DriveObjectStore {
    /// Build a Drive client.
    ///
    /// # Errors
    ///
    /// `ExErrorKind::InvalidInput` for a non-http(s) base URL, a zero timeout
    /// or an empty token.
    pub fn new(settings: DriveSettings, token: Sensitive<String>) -> Result<Self> {
        let base_url = Url::parse(settings.base_url.trim()).map_err(|e| {
            invalid_settings(format!("store base URL '{}': {}", settings.base_url, e))
        })?;
        if base_url.scheme() != "http" && base_url.scheme() != "https" {
            return Err(invalid_settings(format!(
                "store base URL '{}' must use http or https",
                settings.base_url
            )));
        }
        if base_url.cannot_be_a_base() {
            return Err(invalid_settings(format!(
                "store base URL '{}' cannot carry a path",
                settings.base_url
            )));
        }
        if settings.timeout.is_zero() || settings.connect_timeout.is_zero() {
            return Err(invalid_settings("store timeouts must be greater than zero"));
        }
        if token.expose().trim().is_empty() {
            return Err(invalid_settings("access token is empty"));
        }

        let http_client = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| invalid_settings(e.to_string()))?;

        Ok(Self {
            base_url,
            token,
            http_client,
        })
    }

    fn file_url(&self, object_id: &str, fields: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("files").push(object_id);
        }
        {
            let mut query = url.query_pairs_mut();
            if let Some(fields) = fields {
                query.append_pair("fields", fields);
            }
            query.append_pair("supportsAllDrives", "true");
        }
        url
    }

    fn unexpected_status(op: &str, object_id: &str, response: &Response) -> ExError {
        let status = response.status();
        let hint = match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                " (access token rejected or lacks the drive scope)"
            }
            _ => "",
        };
        store_unavailable(op, object_id, format!("HTTP {}{}", status, hint))
            .with_http_status(status.as_u16())
    }
}

impl ObjectStore for DriveObjectStore {
    fn fetch(&self, object_id: &str) -> std::result::Result<ObjectMetadata, ExError> {
        let url = self.file_url(object_id, Some(METADATA_FIELDS));
        tracing::debug!(object_id, "fetching drive metadata");

        let response = self
            .http_client
            .get(url)
            .bearer_auth(self.token.expose())
            .send()
            .map_err(|e| store_unavailable("fetch_metadata", object_id, e))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(not_found(object_id).with_http_status(404)),
            status if status.is_success() => {
                let file: DriveFile = response.json().map_err(|e| {
                    store_unavailable("fetch_metadata", object_id, format!("bad metadata: {}", e))
                })?;
                file.into_metadata()
                    .map_err(|reason| store_unavailable("fetch_metadata", object_id, reason))
            }
            _ => Err(Self::unexpected_status("fetch_metadata", object_id, &response)),
        }
    }

    fn delete(&self, object_id: &str) -> std::result::Result<(), ExError> {
        let url = self.file_url(object_id, None);
        tracing::debug!(object_id, "deleting drive object");

        // only a failed connect proves the request never left this host
        let response = self
            .http_client
            .delete(url)
            .bearer_auth(self.token.expose())
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    delete_failed(object_id, e)
                } else {
                    delete_outcome_unknown(object_id, e)
                }
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status.is_server_error() {
            Err(delete_outcome_unknown(object_id, format!("HTTP {}", status))
                .with_http_status(status.as_u16()))
        } else {
            Err(delete_failed(object_id, format!("HTTP {}", status))
                .with_http_status(status.as_u16()))
        }
    }

    fn get(&self, object_id: &str) -> std::result::Result<ObjectPresence, ExError> {
        let url = self.file_url(object_id, Some("id"));
        tracing::debug!(object_id, "probing drive object");

        let response = self
            .http_client
            .get(url)
            .bearer_auth(self.token.expose())
            .send()
            .map_err(|e| store_unavailable("verify_deletion", object_id, e))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(ObjectPresence::Absent),
            status if status.is_success() => Ok(ObjectPresence::Present),
            _ => Err(Self::unexpected_status(
                "verify_deletion",
                object_id,
                &response,
            )),
        }
    }
}
