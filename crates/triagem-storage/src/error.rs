use thiserror::Error;

/// Failure talking to the patient store. Surfaced to the user as a
/// persistence error; operations are never retried.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {key}")]
    NotFound { key: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("S3 GetObject error: {0}")]
    GetObject(String),

    #[error("S3 PutObject error: {0}")]
    PutObject(String),

    #[error("S3 DeleteObject error: {0}")]
    DeleteObject(String),

    #[error("S3 DeleteObjects error: {0}")]
    DeleteObjects(String),

    #[error("batch of {count} deletions exceeds the limit of {max}")]
    BatchTooLarge { count: usize, max: usize },

    #[error("S3 ListObjects error: {0}")]
    ListObjects(String),
}
