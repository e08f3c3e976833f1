//! Application state shared by all handlers.

use scanvault_core::Config;
use scanvault_services::ScanService;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub scan_service: Arc<ScanService>,
    /// Present only when the audit log is backed by PostgreSQL.
    pub db_pool: Option<PgPool>,
}
