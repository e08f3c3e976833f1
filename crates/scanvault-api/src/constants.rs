//! API constants
//!
//! All versioned routes live under [`API_PREFIX`]. Handler path annotations for the OpenAPI
//! document repeat the literal because utoipa needs compile-time strings.

/// Versioned prefix for all pipeline routes
pub const API_PREFIX: &str = "/api/v0";

/// Room for multipart boundaries, part headers and the username field on top of the file
/// size cap when sizing the request body limit.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Filename used when the file part carries none.
pub const UNKNOWN_FILENAME: &str = "unknown";
