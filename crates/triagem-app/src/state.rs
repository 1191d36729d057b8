use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use triagem_core::models::patient::{PatientId, PatientRecord};
use triagem_storage::{PatientRepository, Subscription};

use crate::error::PresenterError;
use crate::intake::IntakePresenter;
use crate::queue::{Confirmation, QueuePresenter};

/// All UI state for one session, owned by whoever drives the event loop.
///
/// Snapshots from the store arrive on the repository's own task; `watch`
/// forwards them over a channel so the owner applies them in order.
pub struct AppState {
    repository: Arc<dyn PatientRepository>,
    pub intake: IntakePresenter,
    pub queue: QueuePresenter,
}

/// Live feed of collection snapshots. Dropping it ends the subscription.
pub struct SnapshotFeed {
    pub receiver: mpsc::UnboundedReceiver<Vec<PatientRecord>>,
    subscription: Subscription,
}

impl SnapshotFeed {
    pub async fn next(&mut self) -> Option<Vec<PatientRecord>> {
        self.receiver.recv().await
    }

    pub fn close(self) {
        self.subscription.unsubscribe();
    }
}

impl AppState {
    pub fn new(repository: Arc<dyn PatientRepository>) -> Self {
        Self {
            repository,
            intake: IntakePresenter::new(),
            queue: QueuePresenter::new(),
        }
    }

    pub fn repository(&self) -> &dyn PatientRepository {
        self.repository.as_ref()
    }

    pub fn watch(&self) -> SnapshotFeed {
        let (tx, receiver) = mpsc::unbounded_channel::<Vec<PatientRecord>>();
        let subscription = self.repository.subscribe(Box::new(move |records: Vec<PatientRecord>| {
            // The receiver is gone once the feed is dropped; nothing to do.
            let _ = tx.send(records);
        }));
        SnapshotFeed {
            receiver,
            subscription,
        }
    }

    /// Load the current collection into the queue with a one-off
    /// subscription.
    pub async fn refresh(&mut self, wait: Duration) -> Result<(), PresenterError> {
        let mut feed = self.watch();
        let snapshot = tokio::time::timeout(wait, feed.next())
            .await
            .ok()
            .flatten()
            .ok_or(PresenterError::SnapshotUnavailable)?;
        feed.close();
        self.queue.apply_snapshot(snapshot);
        Ok(())
    }

    pub async fn submit_intake(&mut self) -> Result<PatientId, PresenterError> {
        self.intake.submit(self.repository.as_ref()).await
    }

    pub async fn confirm(&mut self, confirmation: Confirmation) -> Result<(), PresenterError> {
        self.queue
            .confirm(confirmation, self.repository.as_ref())
            .await
    }
}
