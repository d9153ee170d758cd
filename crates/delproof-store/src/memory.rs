//! In-process object store
//!
//! Deterministic stand-in for a remote store, with switchable faults so the
//! workflow's failure paths can be driven without a network.

use crate::errors::{delete_failed, delete_outcome_unknown, not_found, store_unavailable};
use delproof_core::errors::ExError;
use delproof_core::{ObjectMetadata, ObjectPresence, ObjectStore};
use std::collections::HashMap;
use std::sync::Mutex;

/// Faults the store can be told to exhibit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreFaults {
    /// Every call fails with `StoreUnavailable`
    pub unavailable: bool,
    /// `delete` fails with `DeleteFailed`
    pub reject_delete: bool,
    /// `delete` reports success but leaves the object in place
    pub ignore_delete: bool,
    /// `delete` removes the object but the reply is lost
    pub lose_delete_reply: bool,
    /// `get` fails with `StoreUnavailable` while `fetch` and `delete` work
    pub probe_unavailable: bool,
}

/// Counts of calls received, for assertions on workflow ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub fetch: usize,
    pub delete: usize,
    pub get: usize,
}

#[derive(Default)]
struct Inner {
    objects: HashMap<String, ObjectMetadata>,
    faults: StoreFaults,
    calls: CallCounts,
}

#[derive(Default)]
pub struct InMemoryObjectStore {
    inner: Mutex<Inner>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(self, meta: ObjectMetadata) -> Self {
        self.insert(meta);
        self
    }

    pub fn with_faults(self, faults: StoreFaults) -> Self {
        self.set_faults(faults);
        self
    }

    pub fn insert(&self, meta: ObjectMetadata) {
        self.lock().objects.insert(meta.id.clone(), meta);
    }

    pub fn set_faults(&self, faults: StoreFaults) {
        self.lock().faults = faults;
    }

    pub fn contains(&self, object_id: &str) -> bool {
        self.lock().objects.contains_key(object_id)
    }

    pub fn calls(&self) -> CallCounts {
        self.lock().calls
    }

    // a poisoned lock only means another test thread panicked mid-call
    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn fetch(&self, object_id: &str) -> Result<ObjectMetadata, ExError> {
        let mut inner = self.lock();
        inner.calls.fetch += 1;
        if inner.faults.unavailable {
            return Err(store_unavailable(
                "fetch_metadata",
                object_id,
                "injected outage",
            ));
        }
        inner
            .objects
            .get(object_id)
            .cloned()
            .ok_or_else(|| not_found(object_id))
    }

    fn delete(&self, object_id: &str) -> Result<(), ExError> {
        let mut inner = self.lock();
        inner.calls.delete += 1;
        if inner.faults.unavailable || inner.faults.reject_delete {
            return Err(delete_failed(object_id, "injected delete failure"));
        }
        if inner.faults.ignore_delete {
            return Ok(());
        }
        if inner.faults.lose_delete_reply {
            inner.objects.remove(object_id);
            return Err(delete_outcome_unknown(object_id, "reply lost after delete"));
        }
        match inner.objects.remove(object_id) {
            Some(_) => Ok(()),
            None => Err(delete_failed(object_id, "no such object")),
        }
    }

    fn get(&self, object_id: &str) -> Result<ObjectPresence, ExError> {
        let mut inner = self.lock();
        inner.calls.get += 1;
        if inner.faults.unavailable || inner.faults.probe_unavailable {
            return Err(store_unavailable(
                "verify_deletion",
                object_id,
                "injected outage",
            ));
        }
        Ok(if inner.objects.contains_key(object_id) {
            ObjectPresence::Present
        } else {
            ObjectPresence::Absent
        })
    }
}
