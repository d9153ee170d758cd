//! Prove-deletion command

use clap::{Args, ValueEnum};
use delproof_core::errors::ExError;
use delproof_engine::{
    prove_deletion, DeletionOutcome, ReceiptFormat, WorkflowConfig, WorkflowFailure,
};
use delproof_store::{load_access_token, DriveObjectStore};
use delproof_tsa::{HttpTimestampClient, RetryingTimestampAuthority};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit status when the workflow ran and failed
const EXIT_WORKFLOW_FAILED: u8 = 1;
/// Exit status when the run could not be set up (config, credentials)
const EXIT_SETUP_FAILED: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for ReceiptFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => ReceiptFormat::Text,
            FormatArg::Json => ReceiptFormat::Json,
        }
    }
}

#[derive(Debug, Args)]
pub struct ProveArgs {
    /// File holding an OAuth access token (raw text or token JSON)
    pub credentials: PathBuf,

    /// Identifier of the object to delete
    pub object_id: String,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Object store API base URL
    #[arg(long)]
    pub store_base_url: Option<String>,

    /// RFC 3161 timestamp authority URL
    #[arg(long)]
    pub tsa_url: Option<String>,

    /// Directory receipts are written to
    #[arg(long)]
    pub receipt_dir: Option<PathBuf>,

    /// Receipt format
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Per-call object store timeout in seconds
    #[arg(long)]
    pub store_timeout: Option<u64>,

    /// Per-call timestamp authority timeout in seconds
    #[arg(long)]
    pub tsa_timeout: Option<u64>,

    /// Send a random nonce with the timestamp request
    #[arg(long)]
    pub nonce: bool,

    /// Ask the TSA to include its signing certificate
    #[arg(long)]
    pub cert_req: bool,

    /// Total timestamp attempts when the TSA is unreachable
    #[arg(long)]
    pub tsa_attempts: Option<u32>,
}

impl ProveArgs {
    fn apply_overrides(&self, config: &mut WorkflowConfig) {
        if let Some(url) = &self.store_base_url {
            config.store.base_url = url.clone();
        }
        if let Some(url) = &self.tsa_url {
            config.tsa.url = url.clone();
        }
        if let Some(dir) = &self.receipt_dir {
            config.receipt.output_dir = dir.clone();
        }
        if let Some(format) = self.format {
            config.receipt.format = format.into();
        }
        if let Some(secs) = self.store_timeout {
            config.store.timeout_secs = secs;
        }
        if let Some(secs) = self.tsa_timeout {
            config.tsa.timeout_secs = secs;
        }
        if self.nonce {
            config.tsa.nonce = true;
        }
        if self.cert_req {
            config.tsa.cert_req = true;
        }
        if let Some(attempts) = self.tsa_attempts {
            config.tsa.retry.max_attempts = attempts;
        }
    }

    /// Defaults, then the config file, then flags
    fn resolve_config(&self) -> Result<WorkflowConfig, ExError> {
        let mut config = match &self.config {
            Some(path) => WorkflowConfig::load(path)?,
            None => WorkflowConfig::default(),
        };
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }
}

pub fn execute(args: ProveArgs) -> ExitCode {
    let config = match args.resolve_config() {
        Ok(config) => config,
        Err(e) => return setup_failed(&e),
    };
    let token = match load_access_token(&args.credentials) {
        Ok(token) => token,
        Err(e) => return setup_failed(&e),
    };
    let store = match DriveObjectStore::new(config.drive_settings(), token) {
        Ok(store) => store,
        Err(e) => return setup_failed(&e),
    };
    let tsa = match HttpTimestampClient::new(config.tsa_settings()) {
        Ok(client) => RetryingTimestampAuthority::new(client, config.retry_policy()),
        Err(e) => return setup_failed(&e),
    };
    let renderer = config.renderer();

    match prove_deletion(&args.object_id, &store, &tsa, renderer.as_ref()) {
        Ok(outcome) => {
            report_success(&outcome);
            ExitCode::SUCCESS
        }
        Err(failure) => {
            report_failure(&failure);
            ExitCode::from(EXIT_WORKFLOW_FAILED)
        }
    }
}

fn setup_failed(err: &ExError) -> ExitCode {
    eprintln!("Error: {}", err);
    eprintln!("Nothing was deleted.");
    ExitCode::from(EXIT_SETUP_FAILED)
}

fn report_success(outcome: &DeletionOutcome) {
    println!(
        "Deleted {} ({}); pre-delete SHA-256 {} timestamped ({} TSA response bytes)",
        outcome.receipt.object_id,
        outcome.metadata.name,
        outcome.receipt.digest_hex,
        outcome.receipt.token_length
    );
    match &outcome.rendered {
        Ok(document) => match &document.path {
            Some(path) => println!("Receipt saved as {}", path.display()),
            None => println!("Receipt rendered ({} bytes)", document.bytes.len()),
        },
        Err(err) => {
            eprintln!("Warning: receipt could not be rendered: {}", err);
            eprintln!("The deletion and its timestamp are still valid.");
        }
    }
}

fn report_failure(failure: &WorkflowFailure) {
    let disposition = failure.disposition();
    eprintln!("Error: proof of deletion failed for '{}'", failure.object_id);
    eprintln!("  state reached: {}", failure.state);
    eprintln!("  cause:         {}", failure.error);
    eprintln!(
        "  disposition:   {} ({})",
        disposition,
        disposition.describe()
    );
    eprintln!("  run id:        {}", failure.run_id);
}
