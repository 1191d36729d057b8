use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("malformed patient document {id}: {reason}")]
    MalformedDocument { id: String, reason: String },

    #[error("invalid patient id: {0:?}")]
    InvalidId(String),
}
