//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use scanvault_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ScanVault API",
        version = "0.1.0",
        description = "Upload scanning service (v0). Every upload is hashed and checked against a blocklist and a trigger pattern. Clean files are encrypted with a one-time key that is returned to the caller and never kept, then stored write-once. Every verdict is recorded in an append-only audit log."
    ),
    paths(
        handlers::scan::scan_upload,
        handlers::uploads::list_uploads,
        handlers::health::health_check,
    ),
    components(schemas(
        models::ScanResponse,
        models::DetectionReason,
        models::UploadRecord,
        models::UploadLogList,
        models::Verdict,
        handlers::scan::ScanUploadForm,
        handlers::health::HealthCheckResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "scan", description = "Scan, encrypt and store uploads"),
        (name = "uploads", description = "Audit trail"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;
