use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::extract_scan_request;
use axum::{
    extract::{Multipart, State},
    Json,
};
use scanvault_core::models::ScanResponse;
use std::sync::Arc;
use utoipa::ToSchema;

/// Multipart body of a scan request, for the OpenAPI document only.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ScanUploadForm {
    /// Uploader identity; becomes the first segment of the storage key
    username: String,
    /// File content; the part's filename is kept, `unknown` when absent
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

#[utoipa::path(
    post,
    path = "/api/v0/scan",
    tag = "scan",
    request_body(content = ScanUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Scan verdict; clean uploads carry the storage path and one-time key", body = ScanResponse),
        (status = 400, description = "Missing field, empty file or invalid name", body = ErrorResponse),
        (status = 409, description = "Same file already stored for this user", body = ErrorResponse),
        (status = 413, description = "File exceeds the size limit", body = ErrorResponse),
        (status = 500, description = "Storage, audit log or encryption failure", body = ErrorResponse)
    )
)]
pub async fn scan_upload(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ScanResponse>, HttpAppError> {
    let request = extract_scan_request(multipart).await?;
    let response = state.scan_service.scan(request).await?;
    Ok(Json(response))
}
