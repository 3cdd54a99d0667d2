//! Job status store for FrameScribe.
//!
//! This crate provides:
//! - The [`DocumentStore`] trait: put/get of a JSON document by key against
//!   an eventually consistent store, no transactional guarantees
//! - An HTTP blob-store client with timeouts and retry
//! - An in-memory implementation for tests and credential-less local runs
//! - A typed wrapper for job records

pub mod client;
pub mod error;
pub mod memory;
pub mod repo;
pub mod retry;

pub use client::{BlobStoreConfig, DocumentStore, HttpBlobStore};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use repo::JobStore;
pub use retry::RetryConfig;
