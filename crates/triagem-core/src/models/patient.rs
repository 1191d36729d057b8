use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;

/// Opaque document identifier assigned by the repository on creation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct PatientId(String);

impl PatientId {
    /// Fresh random identifier, used by backends that assign ids client-side.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accepts any non-empty id made of ASCII alphanumerics, `-` and `_`.
    /// Ids end up embedded in document keys, so path separators are rejected.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let ok = !raw.is_empty()
            && raw
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if ok {
            Ok(Self(raw.to_string()))
        } else {
            Err(CoreError::InvalidId(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single entry in the triage queue.
///
/// Records built by [`crate::validation`] always satisfy the form rules.
/// Records read back from the repository are trusted as-is: only their shape
/// is checked, so `severity` may fall outside 1–5 for legacy data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatientRecord {
    /// Absent until the record has been persisted.
    pub id: Option<PatientId>,
    pub name: String,
    /// Positive integer kept as decimal text.
    pub age: String,
    pub description: String,
    pub severity: i64,
}

impl PatientRecord {
    /// Stored body of this record, without the identifier.
    pub fn document(&self) -> PatientDocument {
        PatientDocument {
            name: self.name.clone(),
            age: self.age.clone(),
            description: self.description.clone(),
            severity: self.severity,
        }
    }

    pub fn from_document(id: PatientId, doc: PatientDocument) -> Self {
        Self {
            id: Some(id),
            name: doc.name,
            age: doc.age,
            description: doc.description,
            severity: doc.severity,
        }
    }

    /// Parse a raw stored document into a typed record.
    ///
    /// This is the boundary check for data coming back from the backend: the
    /// JSON must have the expected fields and types, but values are not
    /// re-validated against the form rules.
    pub fn from_json(id: PatientId, body: &[u8]) -> Result<Self, CoreError> {
        let doc: PatientDocument =
            serde_json::from_slice(body).map_err(|e| CoreError::MalformedDocument {
                id: id.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self::from_document(id, doc))
    }
}

/// Body of a patient document as stored in the `pacientes` collection.
///
/// Field names follow the collection's existing data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatientDocument {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "idade")]
    pub age: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "gravidade")]
    pub severity: i64,
}
