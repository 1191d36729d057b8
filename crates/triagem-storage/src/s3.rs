//! S3-backed patient collection.
//!
//! Each patient is a JSON document at `{collection}/{id}.json`. S3 has no
//! push notifications for plain clients, so subscriptions poll the collection
//! listing and deliver a fresh snapshot whenever it changes.

use std::collections::BTreeSet;
use std::time::Duration;

use aws_sdk_s3::Client;
use tokio::time::MissedTickBehavior;

use triagem_core::error::CoreError;
use triagem_core::keys;
use triagem_core::models::patient::{PatientDocument, PatientId, PatientRecord};

use crate::documents;
use crate::error::StorageError;
use crate::objects::{self, ObjectMeta};
use crate::repository::{BoxFuture, PatientRepository, SnapshotListener, Subscription};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Clone)]
pub struct S3PatientRepository {
    client: Client,
    bucket: String,
    collection: String,
    poll_interval: Duration,
}

impl S3PatientRepository {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            collection: keys::PATIENTS_COLLECTION.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Intervals below [`MIN_POLL_INTERVAL`] are raised to it.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval.max(MIN_POLL_INTERVAL);
        self
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    async fn list_collection(&self) -> Result<Vec<ObjectMeta>, StorageError> {
        let prefix = keys::collection_prefix(&self.collection);
        objects::list_objects_with_metadata(&self.client, &self.bucket, &prefix).await
    }

    /// Fetch every patient document in `listing`. Documents that vanished
    /// between the listing and the fetch are skipped.
    async fn load_snapshot(
        &self,
        listing: &[ObjectMeta],
    ) -> Result<Vec<PatientRecord>, StorageError> {
        let mut bodies = Vec::with_capacity(listing.len());
        for meta in listing {
            if keys::patient_id_from_key(&self.collection, &meta.key).is_none() {
                continue;
            }
            match objects::get_object(&self.client, &self.bucket, &meta.key).await {
                Ok(body) => bodies.push((meta.key.clone(), body)),
                Err(StorageError::NotFound { key }) => {
                    tracing::debug!(key = %key, "document deleted during snapshot");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(decode_snapshot(
            &self.collection,
            bodies.iter().map(|(key, body)| (key.as_str(), body.as_slice())),
        ))
    }
}

/// Turn fetched `(key, body)` pairs into records, in the order given.
///
/// Keys outside the collection and bodies that fail the shape check are
/// skipped with a warning.
pub fn decode_snapshot<'a>(
    collection: &str,
    documents: impl IntoIterator<Item = (&'a str, &'a [u8])>,
) -> Vec<PatientRecord> {
    let mut records = Vec::new();
    for (key, body) in documents {
        let Some(id) = keys::patient_id_from_key(collection, key) else {
            tracing::warn!(key = %key, collection = %collection, "skipping foreign key");
            continue;
        };
        match PatientRecord::from_json(id, body) {
            Ok(record) => records.push(record),
            Err(CoreError::MalformedDocument { id, reason }) => {
                tracing::warn!(id = %id, reason = %reason, "skipping malformed patient document");
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "skipping unreadable patient document");
            }
        }
    }
    records
}

/// Remembers the last listing a snapshot was delivered for.
#[derive(Debug, Default)]
pub struct ListingTracker {
    delivered: Option<Vec<ObjectMeta>>,
}

impl ListingTracker {
    /// True if `listing` differs from the last delivered one, or nothing has
    /// been delivered yet.
    pub fn is_new(&self, listing: &[ObjectMeta]) -> bool {
        self.delivered.as_deref() != Some(listing)
    }

    pub fn mark_delivered(&mut self, listing: Vec<ObjectMeta>) {
        self.delivered = Some(listing);
    }
}

impl PatientRepository for S3PatientRepository {
    fn create<'a>(
        &'a self,
        patient: &'a PatientDocument,
    ) -> BoxFuture<'a, Result<PatientId, StorageError>> {
        Box::pin(async move {
            let id = PatientId::generate();
            let key = keys::patient(&self.collection, &id);
            documents::save_json(&self.client, &self.bucket, &key, patient).await?;
            tracing::info!(bucket = %self.bucket, key = %key, "patient created");
            Ok(id)
        })
    }

    fn delete_by_id<'a>(&'a self, id: &'a PatientId) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let key = keys::patient(&self.collection, id);
            objects::delete_object(&self.client, &self.bucket, &key).await?;
            tracing::info!(bucket = %self.bucket, key = %key, "patient deleted");
            Ok(())
        })
    }

    fn batch_delete<'a>(
        &'a self,
        ids: &'a BTreeSet<PatientId>,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let keys: Vec<String> = ids
                .iter()
                .map(|id| keys::patient(&self.collection, id))
                .collect();
            objects::delete_objects(&self.client, &self.bucket, &keys).await?;
            tracing::info!(bucket = %self.bucket, count = keys.len(), "patients batch deleted");
            Ok(())
        })
    }

    fn subscribe(&self, listener: SnapshotListener) -> Subscription {
        let repo = self.clone();
        let poll_interval = self.poll_interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut tracker = ListingTracker::default();

            loop {
                ticker.tick().await;

                let listing = match repo.list_collection().await {
                    Ok(listing) => listing,
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to list patient collection");
                        continue;
                    }
                };

                if !tracker.is_new(&listing) {
                    continue;
                }

                match repo.load_snapshot(&listing).await {
                    Ok(records) => {
                        tracing::debug!(count = records.len(), "delivering patient snapshot");
                        listener(records);
                        tracker.mark_delivered(listing);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to load patient snapshot");
                    }
                }
            }
        });

        tracing::debug!(
            bucket = %self.bucket,
            collection = %self.collection,
            poll_ms = poll_interval.as_millis() as u64,
            "patient subscription started"
        );

        Subscription::new(move || handle.abort())
    }
}
