//! Audit log trait, backends and factory.

mod memory;
mod postgres;

pub use memory::MemoryAuditLog;
pub use postgres::{PostgresAuditLog, UploadLogRow};

use async_trait::async_trait;
use scanvault_core::models::{NewUploadRecord, UploadRecord};
use scanvault_core::{AppError, AuditLogBackend, Config};
use sqlx::PgPool;
use std::sync::Arc;

/// Append-only record of scan outcomes.
///
/// Records are never updated or deleted. Implementations must make each append atomic:
/// concurrent appends never interleave and a failed append leaves no partial record.
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Persist one record, assigning its id and creation time.
    async fn append(&self, record: NewUploadRecord) -> Result<UploadRecord, AppError>;

    /// All records, newest first.
    async fn list_recent(&self) -> Result<Vec<UploadRecord>, AppError>;

    fn backend_type(&self) -> AuditLogBackend;
}

/// Create the audit log selected by configuration.
///
/// `pool` is required for the postgres backend and ignored otherwise.
pub fn create_audit_log(
    config: &Config,
    pool: Option<PgPool>,
) -> Result<Arc<dyn AuditLog>, AppError> {
    match config.audit_log_backend() {
        AuditLogBackend::Postgres => {
            let pool = pool.ok_or_else(|| {
                AppError::Internal(
                    "PostgreSQL audit log selected but no database pool was provided".to_string(),
                )
            })?;
            tracing::info!("Initializing PostgreSQL audit log");
            Ok(Arc::new(PostgresAuditLog::new(pool)))
        }
        AuditLogBackend::Memory => {
            tracing::warn!("Using in-memory audit log; records are lost on restart");
            Ok(Arc::new(MemoryAuditLog::new()))
        }
    }
}
