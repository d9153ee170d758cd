//! Proof-of-deletion orchestration.
//!
//! ## Sequence (strictly in order):
//! 1. Fetch the metadata snapshot (`Start -> Fetched`)
//! 2. Commit to it with SHA-256 (`Fetched -> Committed`)
//! 3. Delete the object (`Committed -> Deleted`)
//! 4. Verify the object is gone (`Deleted -> Verified`)
//! 5. Timestamp the commitment (`Verified -> Timestamped`)
//! 6. Assemble the receipt (`Timestamped -> Receipted`), then render it
//!
//! Any failure in steps 1-6 aborts the run and reports the last state
//! reached. Rendering is best effort and never revokes the record.

use delproof_core::errors::{ExError, ExErrorKind};
use delproof_core::{
    assemble, commit, log_op_end, log_op_error, log_op_start, log_transition, DeletionRecord,
    Document, ObjectMetadata, ObjectPresence, ObjectStore, ReceiptData, ReceiptRenderer,
    TimestampAuthority, WorkflowState,
};
use delproof_core_types::RunId;
use std::time::Instant;
use thiserror::Error;

pub const OP_PROVE_DELETION: &str = "prove_deletion";

/// What a failed run means for the object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Failed before the delete call, or the store refused it; the object is
    /// untouched
    ObjectIntact,
    /// The delete call failed after it may have reached the store
    DeletionUnknown,
    /// The delete call was accepted but absence could not be confirmed
    DeletionUnconfirmed,
    /// The object is verifiably gone but no proof was produced
    DeletedUnproven,
}

impl Disposition {
    pub fn for_state(state: WorkflowState) -> Self {
        match state {
            WorkflowState::Start | WorkflowState::Fetched | WorkflowState::Committed => {
                Disposition::ObjectIntact
            }
            WorkflowState::Deleted => Disposition::DeletionUnconfirmed,
            WorkflowState::Verified | WorkflowState::Timestamped | WorkflowState::Receipted => {
                Disposition::DeletedUnproven
            }
        }
    }

    /// Disposition of a run that stopped at `state` because of `error`
    pub fn for_failure(state: WorkflowState, error: &ExError) -> Self {
        if state == WorkflowState::Committed
            && error.kind() == ExErrorKind::DeleteFailed
            && error.is_indeterminate()
        {
            return Disposition::DeletionUnknown;
        }
        Self::for_state(state)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Disposition::ObjectIntact => "object_intact",
            Disposition::DeletionUnknown => "deletion_unknown",
            Disposition::DeletionUnconfirmed => "deletion_unconfirmed",
            Disposition::DeletedUnproven => "deleted_unproven",
        }
    }

    /// Operator-facing summary
    pub fn describe(&self) -> &'static str {
        match self {
            Disposition::ObjectIntact => "the object was not deleted",
            Disposition::DeletionUnknown => {
                "the delete request may have been carried out; check whether the object still exists"
            }
            Disposition::DeletionUnconfirmed => {
                "the delete was accepted but the object may still exist"
            }
            Disposition::DeletedUnproven => {
                "the object is deleted but no proof of deletion was obtained"
            }
        }
    }
}

impl std::fmt::Display for Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A run that stopped before producing a deletion record
#[derive(Debug, Error)]
#[error("proof of deletion for '{object_id}' failed after state '{state}': {error}")]
pub struct WorkflowFailure {
    pub run_id: RunId,
    pub object_id: String,
    /// Last state successfully reached
    pub state: WorkflowState,
    #[source]
    pub error: ExError,
}

impl WorkflowFailure {
    pub fn disposition(&self) -> Disposition {
        Disposition::for_failure(self.state, &self.error)
    }

    pub fn kind(&self) -> ExErrorKind {
        self.error.kind()
    }
}

/// A completed run
#[derive(Debug, Clone)]
pub struct DeletionOutcome {
    pub run_id: RunId,
    pub metadata: ObjectMetadata,
    pub record: DeletionRecord,
    pub receipt: ReceiptData,
    /// Renderer result; an error here leaves the record valid
    pub rendered: Result<Document, ExError>,
}

impl DeletionOutcome {
    pub fn state(&self) -> WorkflowState {
        WorkflowState::Receipted
    }

    pub fn render_error(&self) -> Option<&ExError> {
        self.rendered.as_ref().err()
    }
}

struct Run<'a> {
    run_id: RunId,
    object_id: &'a str,
    state: WorkflowState,
}

impl Run<'_> {
    fn advance(&mut self, next: WorkflowState) {
        self.state = next;
        log_transition!(
            OP_PROVE_DELETION,
            next,
            object_id = self.object_id,
            run_id = self.run_id.as_str(),
        );
    }

    fn fail(&self, error: ExError) -> WorkflowFailure {
        WorkflowFailure {
            run_id: self.run_id.clone(),
            object_id: self.object_id.to_string(),
            state: self.state,
            error: error
                .with_object_id(self.object_id)
                .with_run_id(self.run_id.clone()),
        }
    }
}

/// Delete an object and produce a timestamped proof of its prior state
///
/// # Errors
///
/// Returns a [`WorkflowFailure`] carrying the last state reached and the
/// cause. Use [`WorkflowFailure::disposition`] to tell an intact object from
/// a deleted-but-unproven one.
pub fn prove_deletion(
    object_id: &str,
    store: &dyn ObjectStore,
    tsa: &dyn TimestampAuthority,
    renderer: &dyn ReceiptRenderer,
) -> Result<DeletionOutcome, WorkflowFailure> {
    let started = Instant::now();
    let mut run = Run {
        run_id: RunId::new(),
        object_id,
        state: WorkflowState::Start,
    };
    log_op_start!(
        OP_PROVE_DELETION,
        object_id = object_id,
        run_id = run.run_id.as_str(),
    );

    let result = execute(&mut run, store, tsa, renderer);
    let duration_ms = started.elapsed().as_millis() as u64;

    match &result {
        Ok(outcome) => {
            log_op_end!(
                OP_PROVE_DELETION,
                duration_ms = duration_ms,
                object_id = object_id,
                run_id = run.run_id.as_str(),
                token_len = outcome.receipt.token_length,
                rendered = outcome.rendered.is_ok(),
            );
        }
        Err(failure) => {
            log_op_error!(
                OP_PROVE_DELETION,
                failure.error,
                duration_ms = duration_ms,
                object_id = object_id,
                run_id = run.run_id.as_str(),
                state = failure.state.as_str(),
                disposition = failure.disposition().as_str(),
            );
        }
    }

    result
}

fn execute(
    run: &mut Run<'_>,
    store: &dyn ObjectStore,
    tsa: &dyn TimestampAuthority,
    renderer: &dyn ReceiptRenderer,
) -> Result<DeletionOutcome, WorkflowFailure> {
    let object_id = run.object_id;
    if object_id.trim().is_empty() {
        return Err(run.fail(
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("fetch_metadata")
                .with_message("object id must not be empty"),
        ));
    }

    let metadata = store.fetch(object_id).map_err(|e| run.fail(e))?;
    run.advance(WorkflowState::Fetched);

    let commitment = commit(&metadata);
    tracing::debug!(
        object_id,
        digest = commitment.digest_hex(),
        "commitment computed"
    );
    run.advance(WorkflowState::Committed);

    store.delete(object_id).map_err(|e| run.fail(e))?;
    run.advance(WorkflowState::Deleted);

    let presence = store.get(object_id).map_err(|e| run.fail(e))?;
    match presence {
        ObjectPresence::Absent => run.advance(WorkflowState::Verified),
        ObjectPresence::Present => {
            return Err(run.fail(
                ExError::new(ExErrorKind::VerificationFailed)
                    .with_op("verify_deletion")
                    .with_message("object is still retrievable after delete"),
            ));
        }
    }

    let token = tsa
        .request_timestamp(commitment.digest_hex())
        .map_err(|e| run.fail(e))?;
    if token.is_empty() {
        return Err(run.fail(
            ExError::new(ExErrorKind::TsaProtocolError)
                .with_op("request_timestamp")
                .with_message("timestamp authority returned an empty token"),
        ));
    }
    run.advance(WorkflowState::Timestamped);

    let record = DeletionRecord::new(object_id, commitment, token);
    let receipt = assemble(&record).map_err(|e| run.fail(e))?;
    run.advance(WorkflowState::Receipted);

    let rendered = renderer.render(&receipt);
    if let Err(err) = &rendered {
        tracing::warn!(
            object_id,
            run_id = run.run_id.as_str(),
            err.code = err.code(),
            message = err.message(),
            "receipt rendering failed; deletion record remains valid"
        );
    }

    Ok(DeletionOutcome {
        run_id: run.run_id.clone(),
        metadata,
        record,
        receipt,
        rendered,
    })
}
