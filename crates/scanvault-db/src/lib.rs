//! Audit log persistence
//!
//! This crate contains the append-only audit trail of scan outcomes. The PostgreSQL backend
//! writes to the `upload_logs` table; the in-memory backend keeps records for the lifetime
//! of the process and is meant for development and tests.

pub mod audit;

pub use audit::{create_audit_log, AuditLog, MemoryAuditLog, PostgresAuditLog, UploadLogRow};
