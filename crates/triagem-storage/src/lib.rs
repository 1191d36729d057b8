//! triagem-storage
//!
//! The patient repository boundary. Defines the [`PatientRepository`] trait
//! and its two backends: S3 documents (thin wrapper around the AWS S3 SDK)
//! and an in-memory store for tests and demo mode.

pub mod client;
pub mod documents;
pub mod error;
pub mod memory;
pub mod objects;
pub mod repository;
pub mod s3;

pub use repository::{PatientRepository, SnapshotListener, Subscription};
