//! Service wiring

use crate::state::AppState;
use anyhow::{Context, Result};
use scanvault_core::Config;
use scanvault_db::create_audit_log;
use scanvault_services::ScanService;
use scanvault_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;

/// Build the audit log and scan service around an initialized storage backend.
pub fn initialize_services(
    config: &Config,
    pool: Option<PgPool>,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let audit_log =
        create_audit_log(config, pool.clone()).context("Failed to initialize audit log")?;

    let scan_service = ScanService::from_config(config, storage, audit_log)
        .context("Failed to initialize scan service")?;

    tracing::info!(
        max_file_size_bytes = scan_service.max_file_size_bytes(),
        blocklist_entries = config.blocklist_hashes().len(),
        storage_backend = %scan_service.storage().backend_type(),
        audit_log_backend = %scan_service.audit_log().backend_type(),
        "Scan service initialized"
    );

    Ok(Arc::new(AppState {
        config: config.clone(),
        scan_service: Arc::new(scan_service),
        db_pool: pool,
    }))
}
