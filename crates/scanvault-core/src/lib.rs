//! ScanVault Core Library
//!
//! This crate provides the domain models, error types, configuration and the pure
//! building blocks of the scan pipeline (content digest and the one-time cipher)
//! that are shared across all ScanVault components.

pub mod config;
pub mod digest;
pub mod encryption;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, ScanConfig};
pub use digest::sha256_hex;
pub use encryption::{open, seal, OneTimeKey, SealedContent};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::{AuditLogBackend, StorageBackend};
