#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use triagem_core::models::patient::{PatientDocument, PatientId, PatientRecord};
use triagem_storage::error::StorageError;
use triagem_storage::memory::MemoryPatientRepository;
use triagem_storage::repository::BoxFuture;
use triagem_storage::{PatientRepository, SnapshotListener, Subscription};

/// Memory store that counts mutating calls and can be switched to fail them.
#[derive(Clone, Default)]
pub struct ProbeRepository {
    pub inner: MemoryPatientRepository,
    pub calls: Arc<AtomicUsize>,
    pub failing: Arc<AtomicBool>,
}

impl ProbeRepository {
    pub fn new(inner: MemoryPatientRepository) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn enter(&self, op: &str) -> Result<(), StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            Err(StorageError::PutObject(format!("{op}: backend unavailable")))
        } else {
            Ok(())
        }
    }
}

impl PatientRepository for ProbeRepository {
    fn create<'a>(
        &'a self,
        patient: &'a PatientDocument,
    ) -> BoxFuture<'a, Result<PatientId, StorageError>> {
        Box::pin(async move {
            self.enter("create")?;
            self.inner.create(patient).await
        })
    }

    fn delete_by_id<'a>(&'a self, id: &'a PatientId) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            self.enter("delete")?;
            self.inner.delete_by_id(id).await
        })
    }

    fn batch_delete<'a>(
        &'a self,
        ids: &'a BTreeSet<PatientId>,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            self.enter("batch_delete")?;
            self.inner.batch_delete(ids).await
        })
    }

    fn subscribe(&self, listener: SnapshotListener) -> Subscription {
        self.inner.subscribe(listener)
    }
}

pub fn doc(name: &str, severity: i64) -> PatientDocument {
    PatientDocument {
        name: name.to_string(),
        age: "30".to_string(),
        description: "flu".to_string(),
        severity,
    }
}

pub fn seeded(names: &[&str]) -> MemoryPatientRepository {
    MemoryPatientRepository::with_documents(names.iter().enumerate().map(|(i, name)| {
        (
            PatientId::parse(&format!("p{i}")).unwrap(),
            doc(name, (i as i64 % 5) + 1),
        )
    }))
}

pub fn record(id: Option<&str>, name: &str) -> PatientRecord {
    PatientRecord {
        id: id.map(|id| PatientId::parse(id).unwrap()),
        name: name.to_string(),
        age: "30".to_string(),
        description: "flu".to_string(),
        severity: 3,
    }
}
