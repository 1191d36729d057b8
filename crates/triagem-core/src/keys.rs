//! Document key conventions.
//!
//! Pure string functions with no AWS SDK dependency. These define the canonical
//! layout of patient documents in the backing store.

use crate::models::patient::PatientId;

/// Name of the collection holding the triage queue.
pub const PATIENTS_COLLECTION: &str = "pacientes";

pub fn collection_prefix(collection: &str) -> String {
    format!("{}/", collection.trim_end_matches('/'))
}

pub fn patient(collection: &str, id: &PatientId) -> String {
    format!("{}{id}.json", collection_prefix(collection))
}

/// Recover the patient id from a document key. Returns `None` for keys that
/// are outside the collection or are not JSON documents.
pub fn patient_id_from_key(collection: &str, key: &str) -> Option<PatientId> {
    let prefix = collection_prefix(collection);
    let file = key.strip_prefix(prefix.as_str())?;
    let stem = file.strip_suffix(".json")?;
    if stem.is_empty() || stem.contains('/') {
        return None;
    }
    PatientId::parse(stem).ok()
}
