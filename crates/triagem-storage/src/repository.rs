use std::collections::BTreeSet;
use std::future::Future;
use std::pin::Pin;

use triagem_core::models::patient::{PatientDocument, PatientId, PatientRecord};

use crate::error::StorageError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Callback receiving a full snapshot of the collection, in store order.
pub type SnapshotListener = Box<dyn Fn(Vec<PatientRecord>) + Send + Sync + 'static>;

/// The remote patient collection.
///
/// Methods return boxed futures for dyn compatibility, so the presenters can
/// hold an `Arc<dyn PatientRepository>` regardless of backend.
pub trait PatientRepository: Send + Sync {
    /// Persist a new patient. Returns the identifier assigned by the store.
    fn create<'a>(
        &'a self,
        patient: &'a PatientDocument,
    ) -> BoxFuture<'a, Result<PatientId, StorageError>>;

    /// Delete one patient. Unknown ids are a no-op.
    fn delete_by_id<'a>(&'a self, id: &'a PatientId) -> BoxFuture<'a, Result<(), StorageError>>;

    /// Delete a set of patients in a single request.
    fn batch_delete<'a>(
        &'a self,
        ids: &'a BTreeSet<PatientId>,
    ) -> BoxFuture<'a, Result<(), StorageError>>;

    /// Register a listener for collection snapshots. The listener gets the
    /// current contents first and then a new snapshot on every change, until
    /// the returned handle is dropped or released.
    ///
    /// Backends that poll spawn a task, so this must be called from within a
    /// tokio runtime.
    fn subscribe(&self, listener: SnapshotListener) -> Subscription;
}

/// Handle for an active snapshot subscription.
///
/// Releasing happens exactly once, either through [`Subscription::unsubscribe`]
/// or when the handle is dropped.
#[must_use = "dropping the handle immediately ends the subscription"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}
