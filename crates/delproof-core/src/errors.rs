use delproof_core_types::RunId;
use thiserror::Error;

/// Result type alias using the structured ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure of the deletion workflow is classified by one of these kinds.
/// Each kind maps to a stable error code used in CLI diagnostics, log events
/// and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExErrorKind {
    // Object store
    /// The object does not exist in the store
    NotFound,
    /// The store could not be reached, timed out, or answered unexpectedly
    StoreUnavailable,
    /// The store did not accept the delete request
    DeleteFailed,
    /// The object is still retrievable after a successful delete call
    VerificationFailed,

    // Timestamp authority
    /// Connection, DNS or timeout failure talking to the TSA
    TsaUnavailable,
    /// Malformed request or response, or a bad HTTP status from the TSA
    TsaProtocolError,
    /// The TSA answered with a non-granted PKIStatus
    TsaRejected,

    // Receipt
    /// The receipt renderer failed (non-fatal)
    RenderError,
    /// A receipt constituent was absent
    MissingField,

    // Ambient
    InvalidInput,
    Io,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::StoreUnavailable => "ERR_STORE_UNAVAILABLE",
            ExErrorKind::DeleteFailed => "ERR_DELETE_FAILED",
            ExErrorKind::VerificationFailed => "ERR_VERIFICATION_FAILED",
            ExErrorKind::TsaUnavailable => "ERR_TSA_UNAVAILABLE",
            ExErrorKind::TsaProtocolError => "ERR_TSA_PROTOCOL",
            ExErrorKind::TsaRejected => "ERR_TSA_REJECTED",
            ExErrorKind::RenderError => "ERR_RENDER",
            ExErrorKind::MissingField => "ERR_MISSING_FIELD",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Io => "ERR_IO",
        }
    }

    /// Whether repeating the same call can reasonably succeed.
    ///
    /// Only transport failures towards the TSA qualify: a rejected or
    /// malformed exchange fails again with the same input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExErrorKind::TsaUnavailable)
    }
}

/// Canonical structured error type
///
/// Classification fields for programmatic handling plus the context an
/// operator needs to act on the failure.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    object_id: Option<String>,
    run_id: Option<RunId>,
    http_status: Option<u16>,
    indeterminate: bool,
    message: String,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            object_id: None,
            run_id: None,
            http_status: None,
            indeterminate: false,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the id of the object the operation was about
    pub fn with_object_id(mut self, id: impl Into<String>) -> Self {
        self.object_id = Some(id.into());
        self
    }

    /// Tag the error with the workflow run it happened in
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Record the HTTP status that caused the error
    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    /// Mark the outcome of the failed call as unknown: the request may have
    /// taken effect before the failure was observed
    pub fn with_indeterminate_outcome(mut self) -> Self {
        self.indeterminate = true;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn object_id(&self) -> Option<&str> {
        self.object_id.as_deref()
    }

    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
    }

    pub fn http_status(&self) -> Option<u16> {
        self.http_status
    }

    pub fn is_indeterminate(&self) -> bool {
        self.indeterminate
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(status) = self.http_status {
            write!(f, " (http_status: {})", status)?;
        }
        if let Some(object_id) = &self.object_id {
            write!(f, " (object_id: {})", object_id)?;
        }
        if self.indeterminate {
            f.write_str(" (outcome unknown)")?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Validation failures of the receipt payload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReceiptError {
    /// The deletion record carries an empty object id
    #[error("Receipt is missing the object id")]
    MissingObjectId,

    /// The deletion record carries an empty commitment digest
    #[error("Receipt for {object_id} is missing the pre-delete digest")]
    MissingDigest { object_id: String },

    /// The deletion record carries an empty timestamp token
    #[error("Receipt for {object_id} is missing the timestamp token")]
    MissingTimestamp { object_id: String },
}

impl From<ReceiptError> for ExError {
    fn from(err: ReceiptError) -> Self {
        let base = ExError::new(ExErrorKind::MissingField)
            .with_op("assemble_receipt")
            .with_message(err.to_string());
        match err {
            ReceiptError::MissingObjectId => base,
            ReceiptError::MissingDigest { object_id }
            | ReceiptError::MissingTimestamp { object_id } => base.with_object_id(object_id),
        }
    }
}
