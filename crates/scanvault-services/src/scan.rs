//! Scan orchestrator
//!
//! Sequences one upload through the pipeline:
//! validate → digest → classify → [malicious: log] | [clean: encrypt → store → log]
//!
//! Ordering rules:
//! - nothing is hashed, stored or logged for a request that fails its preconditions
//! - a clean record is only appended after its object was stored
//! - a collision on the storage key fails the request without a second record
//!
//! The store and append steps of a clean upload run in their own task, so dropping the
//! request future (client disconnect, timeout) cannot stop between the two. If the append
//! keeps failing, the stored object is deleted again.

use crate::detector::{Detection, ThreatDetector};
use crate::validation::validate_scan_request;
use scanvault_core::models::{NewUploadRecord, ScanRequest, ScanResponse, UploadRecord};
use scanvault_core::{seal, sha256_hex, AppError, Config};
use scanvault_db::AuditLog;
use scanvault_storage::{generate_storage_key, Storage, StorageError};
use std::sync::Arc;
use std::time::Duration;

/// Bounded exponential backoff for audit appends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay before the attempt following `attempt` (1-based).
    fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(100))
    }
}

/// Scan pipeline service
pub struct ScanService {
    detector: ThreatDetector,
    storage: Arc<dyn Storage>,
    audit_log: Arc<dyn AuditLog>,
    max_file_size_bytes: usize,
    retry: RetryPolicy,
}

impl ScanService {
    pub fn new(
        detector: ThreatDetector,
        storage: Arc<dyn Storage>,
        audit_log: Arc<dyn AuditLog>,
        max_file_size_bytes: usize,
    ) -> Self {
        Self {
            detector,
            storage,
            audit_log,
            max_file_size_bytes,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn from_config(
        config: &Config,
        storage: Arc<dyn Storage>,
        audit_log: Arc<dyn AuditLog>,
    ) -> Result<Self, AppError> {
        let blocklist = crate::detector::Blocklist::from_config(config)?;
        Ok(Self::new(
            ThreatDetector::new(blocklist),
            storage,
            audit_log,
            config.max_file_size_bytes(),
        )
        .with_retry_policy(RetryPolicy::new(
            config.audit_append_max_attempts(),
            Duration::from_millis(100),
        )))
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn audit_log(&self) -> &Arc<dyn AuditLog> {
        &self.audit_log
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_bytes
    }

    /// Run one upload through the pipeline.
    ///
    /// Verdicts are returned as `Ok`; `Err` means the request was invalid or the pipeline
    /// could not complete.
    #[tracing::instrument(
        skip(self, request),
        fields(
            identity = %request.identity,
            filename = %request.filename,
            size_bytes = request.content.len()
        )
    )]
    pub async fn scan(&self, request: ScanRequest) -> Result<ScanResponse, AppError> {
        validate_scan_request(&request, self.max_file_size_bytes)?;

        let ScanRequest {
            identity,
            filename,
            content,
        } = request;
        let size = content.len() as u64;

        let detector = self.detector.clone();
        let (content, digest, detection) = tokio::task::spawn_blocking(move || {
            let digest = sha256_hex(&content);
            let detection = detector.classify(&digest, &content);
            (content, digest, detection)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Scan task failed: {}", e)))?;

        match detection {
            Detection::Malicious(reason) => {
                tracing::warn!(sha256 = %digest, reason = %reason, "Malicious upload rejected");

                let record = NewUploadRecord::malicious(identity, filename, size, digest.clone());
                append_with_retry(self.audit_log.as_ref(), record, self.retry).await?;

                Ok(ScanResponse::Malicious {
                    sha256: digest,
                    reason,
                })
            }
            Detection::Clean => {
                let sealed = tokio::task::spawn_blocking(move || seal(&content))
                    .await
                    .map_err(|e| AppError::Internal(format!("Encryption task failed: {}", e)))??;
                let (blob, key) = sealed.into_blob();

                let storage_key = generate_storage_key(&identity, &digest, &filename);
                let record = NewUploadRecord::clean(
                    identity,
                    filename,
                    size,
                    digest.clone(),
                    storage_key.clone(),
                );

                let commit = tokio::spawn(commit_clean(
                    self.storage.clone(),
                    self.audit_log.clone(),
                    self.retry,
                    storage_key,
                    blob,
                    record,
                ));
                let logged = commit
                    .await
                    .map_err(|e| AppError::Internal(format!("Commit task failed: {}", e)))??;

                let storage_path = logged.storage_path.ok_or_else(|| {
                    AppError::Internal("Clean record without storage path".to_string())
                })?;

                tracing::info!(
                    sha256 = %digest,
                    storage_path = %storage_path,
                    record_id = %logged.id,
                    "Clean upload encrypted and stored"
                );

                Ok(ScanResponse::Clean {
                    sha256: digest,
                    storage_path,
                    encryption_key: key.into_hex(),
                })
            }
        }
    }

    /// Audit trail, newest first.
    pub async fn list_uploads(&self) -> Result<Vec<UploadRecord>, AppError> {
        self.audit_log.list_recent().await
    }
}

/// Store the encrypted blob, then append its record. Deletes the blob if the append fails.
async fn commit_clean(
    storage: Arc<dyn Storage>,
    audit_log: Arc<dyn AuditLog>,
    retry: RetryPolicy,
    storage_key: String,
    blob: Vec<u8>,
    record: NewUploadRecord,
) -> Result<UploadRecord, AppError> {
    let stored = storage
        .put_new(&storage_key, blob)
        .await
        .map_err(|e| {
            match &e {
                StorageError::AlreadyExists(_) => {
                    tracing::info!(key = %storage_key, "Upload already stored under this key");
                }
                other => {
                    tracing::error!(error = %other, key = %storage_key, "Failed to store encrypted upload");
                }
            }
            AppError::from(e)
        })?;

    match append_with_retry(audit_log.as_ref(), record, retry).await {
        Ok(logged) => Ok(logged),
        Err(err) => {
            tracing::error!(
                error = %err,
                key = %stored.key,
                "Audit append failed after upload, deleting stored object"
            );
            if let Err(delete_err) = storage.delete(&stored.key).await {
                tracing::error!(
                    error = %delete_err,
                    orphan_key = %stored.key,
                    "Compensating delete failed, encrypted object has no audit record"
                );
            }
            Err(err)
        }
    }
}

async fn append_with_retry(
    audit_log: &dyn AuditLog,
    record: NewUploadRecord,
    retry: RetryPolicy,
) -> Result<UploadRecord, AppError> {
    let mut attempt = 1;
    loop {
        match audit_log.append(record.clone()).await {
            Ok(logged) => return Ok(logged),
            Err(e) if attempt < retry.max_attempts => {
                let delay = retry.delay_after(attempt);
                tracing::warn!(
                    error = %e,
                    attempt = attempt,
                    max_attempts = retry.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Audit append failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
