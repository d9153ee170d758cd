//! Deletion workflow ordering, short-circuiting and failure reporting

use delproof_core::capability::InMemoryReceiptRenderer;
use delproof_core::errors::{ExError, ExErrorKind};
use delproof_core::{
    Document, ObjectMetadata, ObjectPresence, ObjectStore, ReceiptData, ReceiptRenderer,
    TimestampAuthority, TimestampToken, WorkflowState,
};
use delproof_engine::{prove_deletion, Disposition};
use delproof_store::{InMemoryObjectStore, StoreFaults};
use mockall::{mock, Sequence};
use std::sync::Mutex;

mock! {
    pub Store {}
    impl ObjectStore for Store {
        fn fetch(&self, object_id: &str) -> Result<ObjectMetadata, ExError>;
        fn delete(&self, object_id: &str) -> Result<(), ExError>;
        fn get(&self, object_id: &str) -> Result<ObjectPresence, ExError>;
    }
}

mock! {
    pub Tsa {}
    impl TimestampAuthority for Tsa {
        fn request_timestamp(&self, digest_hex: &str) -> Result<TimestampToken, ExError>;
    }
}

mock! {
    pub Renderer {}
    impl ReceiptRenderer for Renderer {
        fn render(&self, receipt: &ReceiptData) -> Result<Document, ExError>;
    }
}

const F1_DIGEST: &str = "ff79bf8050b75897524d693a81436a04ccd03bbe16d52d95dbab5ba36424e57b";

fn doc_txt() -> ObjectMetadata {
    ObjectMetadata::new("F1", "doc.txt", 42, "abc123")
}

/// Timestamp authority answering with a fixed-size token and recording digests
struct FixedTsa {
    token_len: usize,
    seen: Mutex<Vec<String>>,
}

impl FixedTsa {
    fn new(token_len: usize) -> Self {
        Self {
            token_len,
            seen: Mutex::new(Vec::new()),
        }
    }

    fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

impl TimestampAuthority for FixedTsa {
    fn request_timestamp(&self, digest_hex: &str) -> Result<TimestampToken, ExError> {
        self.seen.lock().unwrap().push(digest_hex.to_string());
        Ok(TimestampToken::new(vec![0x30; self.token_len]))
    }
}

fn tsa_never_called() -> MockTsa {
    let mut tsa = MockTsa::new();
    tsa.expect_request_timestamp().never();
    tsa
}

#[test]
fn test_end_to_end_produces_receipt() {
    let store = InMemoryObjectStore::new().with_object(doc_txt());
    let tsa = FixedTsa::new(900);

    let outcome = prove_deletion("F1", &store, &tsa, &InMemoryReceiptRenderer).unwrap();

    assert_eq!(
        outcome.receipt,
        ReceiptData {
            object_id: "F1".to_string(),
            digest_hex: F1_DIGEST.to_string(),
            token_length: 900,
        }
    );
    assert_eq!(outcome.state(), WorkflowState::Receipted);
    assert_eq!(outcome.metadata, doc_txt());
    assert_eq!(outcome.record.commitment().digest_hex(), F1_DIGEST);
    assert_eq!(tsa.seen(), vec![F1_DIGEST.to_string()]);
    assert!(!store.contains("F1"));

    let text = String::from_utf8(outcome.rendered.unwrap().bytes).unwrap();
    assert!(text.contains(F1_DIGEST));
}

#[test]
fn test_steps_run_in_order() {
    let mut seq = Sequence::new();
    let mut store = MockStore::new();
    let mut tsa = MockTsa::new();

    store
        .expect_fetch()
        .withf(|id| id == "F1")
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(doc_txt()));
    store
        .expect_delete()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    store
        .expect_get()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(ObjectPresence::Absent));
    tsa.expect_request_timestamp()
        .withf(|digest| digest == F1_DIGEST)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(TimestampToken::new(vec![1, 2, 3])));

    let outcome = prove_deletion("F1", &store, &tsa, &InMemoryReceiptRenderer).unwrap();
    assert_eq!(outcome.receipt.token_length, 3);
}

#[test]
fn test_missing_object_never_deletes() {
    let mut store = MockStore::new();
    store.expect_fetch().times(1).returning(|id| {
        Err(ExError::new(ExErrorKind::NotFound)
            .with_op("fetch_metadata")
            .with_message(format!("{} not found", id)))
    });
    store.expect_delete().never();
    store.expect_get().never();

    let failure = prove_deletion("missing", &store, &tsa_never_called(), &InMemoryReceiptRenderer)
        .unwrap_err();

    assert_eq!(failure.state, WorkflowState::Start);
    assert_eq!(failure.kind(), ExErrorKind::NotFound);
    assert_eq!(failure.disposition(), Disposition::ObjectIntact);
}

#[test]
fn test_store_outage_on_fetch() {
    let store = InMemoryObjectStore::new()
        .with_object(doc_txt())
        .with_faults(StoreFaults {
            unavailable: true,
            ..StoreFaults::default()
        });

    let failure =
        prove_deletion("F1", &store, &tsa_never_called(), &InMemoryReceiptRenderer).unwrap_err();

    assert_eq!(failure.kind(), ExErrorKind::StoreUnavailable);
    assert_eq!(failure.state, WorkflowState::Start);
    assert_eq!(store.calls().delete, 0);
}

#[test]
fn test_delete_failure_stops_before_verification() {
    let store = InMemoryObjectStore::new()
        .with_object(doc_txt())
        .with_faults(StoreFaults {
            reject_delete: true,
            ..StoreFaults::default()
        });

    let failure =
        prove_deletion("F1", &store, &tsa_never_called(), &InMemoryReceiptRenderer).unwrap_err();

    assert_eq!(failure.kind(), ExErrorKind::DeleteFailed);
    assert_eq!(failure.state, WorkflowState::Committed);
    assert_eq!(failure.disposition(), Disposition::ObjectIntact);
    assert_eq!(store.calls().get, 0);
    assert!(store.contains("F1"));
}

#[test]
fn test_delete_timeout_reports_unknown_outcome() {
    let mut store = MockStore::new();
    store.expect_fetch().times(1).returning(|_| Ok(doc_txt()));
    store.expect_delete().times(1).returning(|id| {
        Err(ExError::new(ExErrorKind::DeleteFailed)
            .with_op("delete_object")
            .with_object_id(id)
            .with_message("operation timed out")
            .with_indeterminate_outcome())
    });
    store.expect_get().never();

    let failure =
        prove_deletion("F1", &store, &tsa_never_called(), &InMemoryReceiptRenderer).unwrap_err();

    assert_eq!(failure.kind(), ExErrorKind::DeleteFailed);
    assert_eq!(failure.state, WorkflowState::Committed);
    assert_eq!(failure.disposition(), Disposition::DeletionUnknown);
}

#[test]
fn test_lost_delete_reply_is_not_reported_intact() {
    let store = InMemoryObjectStore::new()
        .with_object(doc_txt())
        .with_faults(StoreFaults {
            lose_delete_reply: true,
            ..StoreFaults::default()
        });

    let failure =
        prove_deletion("F1", &store, &tsa_never_called(), &InMemoryReceiptRenderer).unwrap_err();

    assert_eq!(failure.disposition(), Disposition::DeletionUnknown);
    assert!(!store.contains("F1"));
    assert_eq!(store.calls().get, 0);
}

#[test]
fn test_object_still_present_never_timestamps() {
    let store = InMemoryObjectStore::new()
        .with_object(doc_txt())
        .with_faults(StoreFaults {
            ignore_delete: true,
            ..StoreFaults::default()
        });

    let failure =
        prove_deletion("F1", &store, &tsa_never_called(), &InMemoryReceiptRenderer).unwrap_err();

    assert_eq!(failure.kind(), ExErrorKind::VerificationFailed);
    assert_eq!(failure.state, WorkflowState::Deleted);
    assert_eq!(failure.disposition(), Disposition::DeletionUnconfirmed);
}

#[test]
fn test_unreachable_probe_is_unconfirmed() {
    let store = InMemoryObjectStore::new()
        .with_object(doc_txt())
        .with_faults(StoreFaults {
            probe_unavailable: true,
            ..StoreFaults::default()
        });

    let failure =
        prove_deletion("F1", &store, &tsa_never_called(), &InMemoryReceiptRenderer).unwrap_err();

    assert_eq!(failure.kind(), ExErrorKind::StoreUnavailable);
    assert_eq!(failure.disposition(), Disposition::DeletionUnconfirmed);
    assert!(!store.contains("F1"));
}

#[test]
fn test_tsa_unavailable_leaves_object_deleted_unproven() {
    let store = InMemoryObjectStore::new().with_object(doc_txt());
    let mut tsa = MockTsa::new();
    tsa.expect_request_timestamp()
        .times(1)
        .returning(|_| Err(ExError::new(ExErrorKind::TsaUnavailable).with_message("refused")));

    let failure = prove_deletion("F1", &store, &tsa, &InMemoryReceiptRenderer).unwrap_err();

    assert_eq!(failure.kind(), ExErrorKind::TsaUnavailable);
    assert_eq!(failure.state, WorkflowState::Verified);
    assert_eq!(failure.disposition(), Disposition::DeletedUnproven);
    assert!(!store.contains("F1"));
    assert_eq!(store.calls().delete, 1);
}

#[test]
fn test_tsa_rejection_keeps_its_kind() {
    let store = InMemoryObjectStore::new().with_object(doc_txt());
    let mut tsa = MockTsa::new();
    tsa.expect_request_timestamp()
        .returning(|_| Err(ExError::new(ExErrorKind::TsaRejected).with_message("badAlg")));

    let failure = prove_deletion("F1", &store, &tsa, &InMemoryReceiptRenderer).unwrap_err();
    assert_eq!(failure.kind(), ExErrorKind::TsaRejected);
}

#[test]
fn test_empty_token_is_protocol_error() {
    let store = InMemoryObjectStore::new().with_object(doc_txt());
    let tsa = FixedTsa::new(0);

    let failure = prove_deletion("F1", &store, &tsa, &InMemoryReceiptRenderer).unwrap_err();
    assert_eq!(failure.kind(), ExErrorKind::TsaProtocolError);
    assert_eq!(failure.state, WorkflowState::Verified);
}

#[test]
fn test_renderer_failure_keeps_record() {
    let store = InMemoryObjectStore::new().with_object(doc_txt());
    let tsa = FixedTsa::new(900);
    let mut renderer = MockRenderer::new();
    renderer
        .expect_render()
        .times(1)
        .returning(|_| Err(ExError::new(ExErrorKind::RenderError).with_message("disk full")));

    let outcome = prove_deletion("F1", &store, &tsa, &renderer).unwrap();

    assert_eq!(
        outcome.render_error().map(|e| e.kind()),
        Some(ExErrorKind::RenderError)
    );
    assert_eq!(outcome.record.timestamp().len(), 900);
    assert_eq!(outcome.receipt.digest_hex, F1_DIGEST);
}

#[test]
fn test_failure_error_carries_run_and_object() {
    let store = InMemoryObjectStore::new();
    let failure =
        prove_deletion("F404", &store, &tsa_never_called(), &InMemoryReceiptRenderer).unwrap_err();

    assert_eq!(failure.error.object_id(), Some("F404"));
    assert_eq!(failure.error.run_id(), Some(&failure.run_id));
    assert!(failure.to_string().contains("ERR_NOT_FOUND"));
}

#[test]
fn test_blank_object_id_is_rejected_before_fetch() {
    let mut store = MockStore::new();
    store.expect_fetch().never();

    let failure =
        prove_deletion("  ", &store, &tsa_never_called(), &InMemoryReceiptRenderer).unwrap_err();
    assert_eq!(failure.kind(), ExErrorKind::InvalidInput);
    assert_eq!(failure.disposition(), Disposition::ObjectIntact);
}
