use super::AuditLog;
use async_trait::async_trait;
use chrono::Utc;
use scanvault_core::models::{NewUploadRecord, UploadRecord};
use scanvault_core::{AppError, AuditLogBackend};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local audit log. Records live as long as the process.
#[derive(Default)]
pub struct MemoryAuditLog {
    records: RwLock<Vec<UploadRecord>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditLog for MemoryAuditLog {
    async fn append(&self, record: NewUploadRecord) -> Result<UploadRecord, AppError> {
        let mut records = self.records.write().await;
        let record = record.into_record(Uuid::new_v4(), Utc::now());
        records.push(record.clone());

        tracing::debug!(
            id = %record.id,
            status = %record.verdict,
            total = records.len(),
            "Audit record appended"
        );

        Ok(record)
    }

    async fn list_recent(&self) -> Result<Vec<UploadRecord>, AppError> {
        let records = self.records.read().await;
        Ok(records.iter().rev().cloned().collect())
    }

    fn backend_type(&self) -> AuditLogBackend {
        AuditLogBackend::Memory
    }
}
