//! Audit log repository: append and list for the upload_logs table.

use super::AuditLog;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scanvault_core::models::{NewUploadRecord, UploadRecord, Verdict};
use scanvault_core::{AppError, AuditLogBackend};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Row type for upload_logs table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
pub struct UploadLogRow {
    pub id: Uuid,
    pub username: String,
    pub filename: String,
    pub file_size: i64,
    pub sha256: String,
    pub status: String,
    pub storage_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UploadLogRow {
    pub fn to_upload_record(self) -> Result<UploadRecord, AppError> {
        let verdict = self.status.parse::<Verdict>()?;
        let size = u64::try_from(self.file_size).map_err(|_| {
            AppError::Internal(format!(
                "upload_logs row {} has negative file_size {}",
                self.id, self.file_size
            ))
        })?;

        Ok(UploadRecord {
            id: self.id,
            identity: self.username,
            filename: self.filename,
            size,
            digest: self.sha256,
            verdict,
            storage_path: self.storage_path,
            created_at: self.created_at,
        })
    }
}

/// Repository for upload_logs table.
#[derive(Clone)]
pub struct PostgresAuditLog {
    pool: PgPool,
}

impl PostgresAuditLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLog for PostgresAuditLog {
    #[tracing::instrument(
        skip(self, record),
        fields(db.table = "upload_logs", status = %record.verdict())
    )]
    async fn append(&self, record: NewUploadRecord) -> Result<UploadRecord, AppError> {
        let file_size = i64::try_from(record.size())
            .map_err(|_| AppError::InvalidInput("File size out of range".to_string()))?;

        let row: UploadLogRow = sqlx::query_as::<Postgres, UploadLogRow>(
            r#"
            INSERT INTO upload_logs (id, username, filename, file_size, sha256, status, storage_path)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, username, filename, file_size, sha256, status, storage_path, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(record.identity())
        .bind(record.filename())
        .bind(file_size)
        .bind(record.digest())
        .bind(record.verdict().to_string())
        .bind(record.storage_path())
        .fetch_one(&self.pool)
        .await?;

        row.to_upload_record()
    }

    #[tracing::instrument(skip(self), fields(db.table = "upload_logs"))]
    async fn list_recent(&self) -> Result<Vec<UploadRecord>, AppError> {
        let rows: Vec<UploadLogRow> = sqlx::query_as::<Postgres, UploadLogRow>(
            r#"
            SELECT id, username, filename, file_size, sha256, status, storage_path, created_at
            FROM upload_logs
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UploadLogRow::to_upload_record).collect()
    }

    fn backend_type(&self) -> AuditLogBackend {
        AuditLogBackend::Postgres
    }
}
