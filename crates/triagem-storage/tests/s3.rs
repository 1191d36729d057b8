//! Integration tests against a real bucket.
//!
//! These tests call real AWS APIs and require valid credentials in the
//! environment plus a scratch bucket in `TRIAGEM_TEST_BUCKET`.
//!
//! Run with: `cargo test -p triagem-storage --test s3 -- --ignored`

use std::collections::BTreeSet;
use std::time::Duration;

use triagem_core::models::patient::{PatientDocument, PatientRecord};
use triagem_storage::PatientRepository;
use triagem_storage::s3::S3PatientRepository;

async fn build_repo() -> S3PatientRepository {
    let bucket = std::env::var("TRIAGEM_TEST_BUCKET").expect("TRIAGEM_TEST_BUCKET not set");
    let client = triagem_storage::client::build_client().await;
    S3PatientRepository::new(client, bucket)
        .with_collection(format!("pacientes-test-{}", std::process::id()))
        .with_poll_interval(Duration::from_millis(500))
}

#[tokio::test]
#[ignore]
async fn create_subscribe_and_clear() {
    let repo = build_repo().await;
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Vec<PatientRecord>>();
    let subscription = repo.subscribe(Box::new(move |records: Vec<PatientRecord>| {
        let _ = tx.send(records);
    }));

    let first = rx.recv().await.unwrap();
    assert!(first.is_empty());

    let doc = PatientDocument {
        name: "Ana".to_string(),
        age: "30".to_string(),
        description: "flu".to_string(),
        severity: 3,
    };
    let id = repo.create(&doc).await.unwrap();

    let second = rx.recv().await.unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].id.as_ref(), Some(&id));

    let ids: BTreeSet<_> = [id].into_iter().collect();
    repo.batch_delete(&ids).await.unwrap();

    let third = rx.recv().await.unwrap();
    assert!(third.is_empty());

    subscription.unsubscribe();
}
