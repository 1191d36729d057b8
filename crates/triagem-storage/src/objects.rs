use aws_sdk_s3::Client;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use aws_smithy_types::byte_stream::ByteStream;

use crate::error::StorageError;

/// S3 accepts at most this many keys in one DeleteObjects request.
pub const MAX_BATCH_DELETE: usize = 1000;

/// Get an object body from S3.
pub async fn get_object(client: &Client, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
    let resp = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| {
            let err = e.into_service_error();
            if err.is_no_such_key() {
                StorageError::NotFound {
                    key: key.to_string(),
                }
            } else {
                StorageError::GetObject(err.to_string())
            }
        })?;

    let body = resp
        .body
        .collect()
        .await
        .map_err(|e| StorageError::GetObject(e.to_string()))?
        .into_bytes()
        .to_vec();

    Ok(body)
}

/// Put an object to S3. Returns the new ETag.
pub async fn put_object(
    client: &Client,
    bucket: &str,
    key: &str,
    body: Vec<u8>,
    content_type: Option<&str>,
) -> Result<String, StorageError> {
    let mut req = client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(body));

    if let Some(ct) = content_type {
        req = req.content_type(ct);
    }

    let resp = req
        .send()
        .await
        .map_err(|e| StorageError::PutObject(e.into_service_error().to_string()))?;

    Ok(resp.e_tag().unwrap_or_default().to_string())
}

/// Delete an object from S3. Deleting a missing key succeeds.
pub async fn delete_object(
    client: &Client,
    bucket: &str,
    key: &str,
) -> Result<(), StorageError> {
    client
        .delete_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| StorageError::DeleteObject(e.into_service_error().to_string()))?;

    Ok(())
}

/// Delete a set of objects with a single DeleteObjects request.
///
/// Any per-key failure reported by S3 fails the whole call. Sets larger than
/// [`MAX_BATCH_DELETE`] are rejected before anything is sent.
pub async fn delete_objects(
    client: &Client,
    bucket: &str,
    keys: &[String],
) -> Result<(), StorageError> {
    if keys.is_empty() {
        return Ok(());
    }
    if keys.len() > MAX_BATCH_DELETE {
        return Err(StorageError::BatchTooLarge {
            count: keys.len(),
            max: MAX_BATCH_DELETE,
        });
    }

    let objects = keys
        .iter()
        .map(|key| ObjectIdentifier::builder().key(key).build())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| StorageError::DeleteObjects(e.to_string()))?;

    let delete = Delete::builder()
        .set_objects(Some(objects))
        .quiet(true)
        .build()
        .map_err(|e| StorageError::DeleteObjects(e.to_string()))?;

    let resp = client
        .delete_objects()
        .bucket(bucket)
        .delete(delete)
        .send()
        .await
        .map_err(|e| StorageError::DeleteObjects(e.into_service_error().to_string()))?;

    check_delete_errors(resp.errors())
}

/// Fold the per-key errors of a DeleteObjects response into one failure.
pub fn check_delete_errors(errors: &[aws_sdk_s3::types::Error]) -> Result<(), StorageError> {
    if errors.is_empty() {
        return Ok(());
    }
    let failed: Vec<String> = errors
        .iter()
        .map(|err| {
            format!(
                "{}: {}",
                err.key().unwrap_or("<unknown key>"),
                err.message().unwrap_or("unknown error")
            )
        })
        .collect();
    Err(StorageError::DeleteObjects(failed.join("; ")))
}

/// Metadata for a single S3 object, returned by [`list_objects_with_metadata`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMeta {
    pub key: String,
    pub size: i64,
    pub last_modified: Option<String>,
    pub etag: Option<String>,
}

/// List objects under a prefix with size, last-modified and ETag metadata.
/// Keys come back in S3's lexicographic order.
pub async fn list_objects_with_metadata(
    client: &Client,
    bucket: &str,
    prefix: &str,
) -> Result<Vec<ObjectMeta>, StorageError> {
    let mut objects = Vec::new();
    let mut continuation_token: Option<String> = None;

    loop {
        let mut req = client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix);

        if let Some(token) = &continuation_token {
            req = req.continuation_token(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| StorageError::ListObjects(e.into_service_error().to_string()))?;

        for obj in resp.contents() {
            if let Some(key) = obj.key() {
                objects.push(ObjectMeta {
                    key: key.to_string(),
                    size: obj.size().unwrap_or(0),
                    last_modified: obj.last_modified().map(|t| t.to_string()),
                    etag: obj.e_tag().map(|s| s.to_string()),
                });
            }
        }

        if resp.is_truncated() == Some(true) {
            continuation_token = resp.next_continuation_token().map(|s| s.to_string());
        } else {
            break;
        }
    }

    Ok(objects)
}
