//! ScanVault Storage Library
//!
//! This crate provides the object store adapter for encrypted uploads: the `Storage` trait
//! and its implementations for S3 and the local filesystem.
//!
//! # Storage key format
//!
//! Keys are content-addressed per identity. All backends use the same layout:
//!
//! - `{identity}/{sha256}_{filename}.enc`
//!
//! Keys must not contain `..` or a leading `/`. Key generation is centralized in the
//! `keys` module so all backends stay consistent.
//!
//! # Write-once semantics
//!
//! `put_new` never overwrites. Writing to a key that already holds an object fails with
//! `StorageError::AlreadyExists` on every backend.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::generate_storage_key;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use scanvault_core::StorageBackend;
pub use traits::{Storage, StorageError, StorageResult, StoredObject};
