//! ScanVault Services Layer
//!
//! This crate is the **business service layer**: it hosts the threat detector and the scan
//! orchestrator that sequences digest, detection, encryption, storage and audit logging.
//! Keep pipeline logic and failure coupling here; keep thin HTTP handling in scanvault-api.

pub mod detector;
pub mod scan;
pub mod validation;

pub use detector::{Blocklist, Detection, ThreatDetector};
pub use scan::{RetryPolicy, ScanService};
pub use scanvault_db::{create_audit_log, AuditLog, MemoryAuditLog};
pub use scanvault_storage::{
    create_storage, LocalStorage, Storage, StorageBackend, StorageError, StorageResult,
};
