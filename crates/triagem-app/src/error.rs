use thiserror::Error;

use triagem_core::validation::ValidationError;
use triagem_storage::error::StorageError;

use crate::messages;

/// Everything a presenter action can fail with. None of these are fatal:
/// each one maps to a user-facing message.
#[derive(Debug, Error)]
pub enum PresenterError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("persistence error: {0}")]
    Persistence(#[from] StorageError),

    #[error("no patient selected")]
    NoSelection,

    #[error("patient at position {index} has no identifier")]
    MissingIdentifier { index: usize },

    #[error("no patient at position {index} (queue has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no snapshot received from the patient store")]
    SnapshotUnavailable,
}

impl PresenterError {
    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            PresenterError::Validation(ValidationError::MissingField(_)) => messages::MISSING_FIELDS,
            PresenterError::Validation(ValidationError::InvalidAge(_)) => messages::INVALID_AGE,
            PresenterError::Validation(ValidationError::InvalidSeverity(_)) => {
                messages::INVALID_SEVERITY
            }
            PresenterError::Persistence(_) => messages::PERSISTENCE_FAILED,
            PresenterError::NoSelection => messages::NO_SELECTION,
            PresenterError::MissingIdentifier { .. } => messages::MISSING_IDENTIFIER,
            PresenterError::IndexOutOfRange { .. } => messages::UNKNOWN_POSITION,
            PresenterError::SnapshotUnavailable => messages::SNAPSHOT_UNAVAILABLE,
        }
    }
}
