//! In-memory patient store.
//!
//! Mirrors the behavior of the remote backend closely enough for tests and
//! the `--memory` demo mode: ids are assigned on create, snapshots are in key
//! order, and listeners hear about every change.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use triagem_core::models::patient::{PatientDocument, PatientId, PatientRecord};

use crate::error::StorageError;
use crate::repository::{BoxFuture, PatientRepository, SnapshotListener, Subscription};

#[derive(Default)]
struct Inner {
    docs: BTreeMap<PatientId, PatientDocument>,
    listeners: BTreeMap<u64, Arc<SnapshotListener>>,
    next_listener: u64,
    /// Bumped on every change; orders snapshot delivery.
    version: u64,
}

impl Inner {
    fn snapshot(&self) -> Vec<PatientRecord> {
        self.docs
            .iter()
            .map(|(id, doc)| PatientRecord::from_document(id.clone(), doc.clone()))
            .collect()
    }
}

/// Lock order: `delivered` before `inner`. `inner` is never held while
/// listeners run.
#[derive(Clone, Default)]
pub struct MemoryPatientRepository {
    inner: Arc<Mutex<Inner>>,
    /// Version of the newest snapshot handed to listeners.
    delivered: Arc<Mutex<u64>>,
}

impl MemoryPatientRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing documents under fixed ids.
    pub fn with_documents(docs: impl IntoIterator<Item = (PatientId, PatientDocument)>) -> Self {
        let repo = Self::new();
        repo.lock().docs.extend(docs);
        repo
    }

    pub fn len(&self) -> usize {
        self.lock().docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current contents, in the same order snapshots use.
    pub fn records(&self) -> Vec<PatientRecord> {
        self.lock().snapshot()
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_delivered(&self) -> MutexGuard<'_, u64> {
        self.delivered.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Apply a mutation and notify listeners if it changed anything.
    ///
    /// Concurrent mutations may reach delivery out of order. A snapshot older
    /// than one already delivered is dropped, since the newer one already
    /// contains its change, so listeners never step backwards. Listeners may
    /// read the store but must not mutate it from inside the callback.
    fn mutate<T>(&self, f: impl FnOnce(&mut Inner) -> (T, bool)) -> T {
        let (out, version, snapshot, listeners) = {
            let mut inner = self.lock();
            let (out, changed) = f(&mut inner);
            if !changed {
                return out;
            }
            inner.version += 1;
            let listeners: Vec<_> = inner.listeners.values().cloned().collect();
            (out, inner.version, inner.snapshot(), listeners)
        };

        let mut delivered = self.lock_delivered();
        if version <= *delivered {
            tracing::trace!(version, delivered = *delivered, "superseded snapshot dropped");
            return out;
        }
        *delivered = version;
        for listener in listeners {
            listener(snapshot.clone());
        }
        out
    }
}

impl PatientRepository for MemoryPatientRepository {
    fn create<'a>(
        &'a self,
        patient: &'a PatientDocument,
    ) -> BoxFuture<'a, Result<PatientId, StorageError>> {
        Box::pin(async move {
            let id = PatientId::generate();
            self.mutate(|inner| {
                inner.docs.insert(id.clone(), patient.clone());
                ((), true)
            });
            tracing::debug!(id = %id, "patient created in memory store");
            Ok(id)
        })
    }

    fn delete_by_id<'a>(&'a self, id: &'a PatientId) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let removed = self.mutate(|inner| {
                let removed = inner.docs.remove(id).is_some();
                (removed, removed)
            });
            tracing::debug!(id = %id, removed, "patient delete in memory store");
            Ok(())
        })
    }

    fn batch_delete<'a>(
        &'a self,
        ids: &'a BTreeSet<PatientId>,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let removed = self.mutate(|inner| {
                let before = inner.docs.len();
                inner.docs.retain(|id, _| !ids.contains(id));
                let removed = before - inner.docs.len();
                (removed, removed > 0)
            });
            tracing::debug!(requested = ids.len(), removed, "batch delete in memory store");
            Ok(())
        })
    }

    fn subscribe(&self, listener: SnapshotListener) -> Subscription {
        let listener = Arc::new(listener);
        // Holding the delivery lock keeps pending newer snapshots from
        // reaching this listener ahead of its initial one.
        let delivered = self.lock_delivered();
        let (key, snapshot) = {
            let mut inner = self.lock();
            let key = inner.next_listener;
            inner.next_listener += 1;
            inner.listeners.insert(key, Arc::clone(&listener));
            (key, inner.snapshot())
        };
        listener(snapshot);
        drop(delivered);

        let inner = Arc::clone(&self.inner);
        Subscription::new(move || {
            let mut inner = inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            inner.listeners.remove(&key);
        })
    }
}
