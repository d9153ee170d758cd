//! Workflow configuration
//!
//! Loaded from TOML. Every key is optional; missing keys keep the built-in
//! default. Callers layer command-line overrides on top and then call
//! [`WorkflowConfig::validate`].
//!
//! ```toml
//! [store]
//! base_url = "https://www.googleapis.com/drive/v3"
//! timeout_secs = 30
//!
//! [tsa]
//! url = "https://freetsa.org/tsr"
//! nonce = true
//!
//! [tsa.retry]
//! max_attempts = 3
//!
//! [receipt]
//! output_dir = "receipts"
//! format = "json"
//! ```

use delproof_core::errors::{ExError, ExErrorKind, Result};
use delproof_core::ReceiptRenderer;
use delproof_store::{
    DriveSettings, JsonReceiptRenderer, TextReceiptRenderer, DEFAULT_DRIVE_BASE_URL,
};
use delproof_tsa::{ClientSettings, RequestOptions, RetryPolicy, DEFAULT_TSA_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

fn invalid_config(reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("load_config")
        .with_message(reason)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DRIVE_BASE_URL.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    /// Total attempts; 1 means no retry
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff_ms: 500,
            max_backoff_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TsaConfig {
    pub url: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub nonce: bool,
    pub cert_req: bool,
    pub retry: RetryConfig,
}

impl Default for TsaConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_TSA_URL.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            nonce: false,
            cert_req: false,
            retry: RetryConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for ReceiptFormat {
    type Err = ExError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(ReceiptFormat::Text),
            "json" => Ok(ReceiptFormat::Json),
            other => Err(invalid_config(format!(
                "unknown receipt format '{}', expected text or json",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReceiptConfig {
    pub output_dir: PathBuf,
    pub format: ReceiptFormat,
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            format: ReceiptFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkflowConfig {
    pub store: StoreConfig,
    pub tsa: TsaConfig,
    pub receipt: ReceiptConfig,
}

impl WorkflowConfig {
    /// Parse a TOML document
    ///
    /// # Errors
    ///
    /// `ExErrorKind::InvalidInput` for malformed TOML, unknown keys or
    /// wrongly typed values.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| invalid_config(format!("invalid config: {}", e)))
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    ///
    /// `ExErrorKind::Io` if the file cannot be read, otherwise as
    /// [`WorkflowConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("load_config")
                .with_message(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
            .map_err(|e| invalid_config(format!("{}: {}", path.display(), e.message())))
    }

    /// Check values that deserialise fine but cannot work
    ///
    /// # Errors
    ///
    /// `ExErrorKind::InvalidInput` naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        if self.store.base_url.trim().is_empty() {
            return Err(invalid_config("store.base_url must not be empty"));
        }
        if self.tsa.url.trim().is_empty() {
            return Err(invalid_config("tsa.url must not be empty"));
        }
        let timeouts = [
            ("store.timeout_secs", self.store.timeout_secs),
            ("store.connect_timeout_secs", self.store.connect_timeout_secs),
            ("tsa.timeout_secs", self.tsa.timeout_secs),
            ("tsa.connect_timeout_secs", self.tsa.connect_timeout_secs),
        ];
        if let Some((key, _)) = timeouts.iter().find(|(_, secs)| *secs == 0) {
            return Err(invalid_config(format!("{} must be greater than zero", key)));
        }
        let retry = &self.tsa.retry;
        if retry.max_attempts == 0 {
            return Err(invalid_config("tsa.retry.max_attempts must be at least 1"));
        }
        if retry.max_backoff_ms < retry.initial_backoff_ms {
            return Err(invalid_config(
                "tsa.retry.max_backoff_ms must not be below initial_backoff_ms",
            ));
        }
        Ok(())
    }

    pub fn drive_settings(&self) -> DriveSettings {
        DriveSettings {
            base_url: self.store.base_url.clone(),
            timeout: Duration::from_secs(self.store.timeout_secs),
            connect_timeout: Duration::from_secs(self.store.connect_timeout_secs),
        }
    }

    pub fn tsa_settings(&self) -> ClientSettings {
        ClientSettings {
            url: self.tsa.url.clone(),
            timeout: Duration::from_secs(self.tsa.timeout_secs),
            connect_timeout: Duration::from_secs(self.tsa.connect_timeout_secs),
            request: RequestOptions {
                nonce: self.tsa.nonce,
                cert_req: self.tsa.cert_req,
            },
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.tsa.retry.max_attempts,
            initial_backoff: Duration::from_millis(self.tsa.retry.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.tsa.retry.max_backoff_ms),
        }
    }

    /// Renderer for the configured receipt format
    pub fn renderer(&self) -> Box<dyn ReceiptRenderer> {
        let dir = self.receipt.output_dir.clone();
        match self.receipt.format {
            ReceiptFormat::Text => Box::new(TextReceiptRenderer::new(dir)),
            ReceiptFormat::Json => Box::new(JsonReceiptRenderer::new(dir)),
        }
    }
}
