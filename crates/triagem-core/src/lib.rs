//! triagem-core
//!
//! Pure domain types for the triage queue: patient records, form validation,
//! severity classification, and document key conventions.
//! No AWS SDK dependency. This is the shared vocabulary of the Triagem system.

pub mod error;
pub mod keys;
pub mod models;
pub mod severity;
pub mod validation;
