use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, Json};
use scanvault_core::models::UploadLogList;
use std::sync::Arc;

/// Audit trail of all scans, newest first.
#[utoipa::path(
    get,
    path = "/api/v0/uploads",
    tag = "uploads",
    responses(
        (status = 200, description = "Audit records", body = UploadLogList),
        (status = 500, description = "Audit log unavailable", body = ErrorResponse)
    )
)]
pub async fn list_uploads(
    State(state): State<Arc<AppState>>,
) -> Result<Json<UploadLogList>, HttpAppError> {
    let logs = state.scan_service.list_uploads().await?;
    tracing::debug!(count = logs.len(), "Listed audit records");
    Ok(Json(UploadLogList { logs }))
}
