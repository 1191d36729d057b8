use aws_sdk_s3::Client;
use serde::Serialize;

use crate::error::StorageError;
use crate::objects;

/// Save a JSON document to S3. Returns the new ETag.
pub async fn save_json<T: Serialize>(
    client: &Client,
    bucket: &str,
    key: &str,
    value: &T,
) -> Result<String, StorageError> {
    let body = serde_json::to_vec(value)?;
    objects::put_object(client, bucket, key, body, Some("application/json")).await
}
