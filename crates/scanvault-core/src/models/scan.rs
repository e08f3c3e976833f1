use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

/// Why content was classified as malicious.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum DetectionReason {
    /// The content digest is on the blocklist.
    #[serde(rename = "hash match")]
    HashMatch,
    /// The content contains the trigger pattern.
    #[serde(rename = "pattern match")]
    PatternMatch,
}

impl Display for DetectionReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DetectionReason::HashMatch => write!(f, "hash match"),
            DetectionReason::PatternMatch => write!(f, "pattern match"),
        }
    }
}

/// An upload handed to the scan pipeline.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub identity: String,
    pub filename: String,
    pub content: Vec<u8>,
}

impl ScanRequest {
    pub fn new(
        identity: impl Into<String>,
        filename: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            identity: identity.into(),
            filename: filename.into(),
            content: content.into(),
        }
    }
}

/// Result of a successful scan, tagged by `status` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ScanResponse {
    Malicious {
        sha256: String,
        reason: DetectionReason,
    },
    Clean {
        sha256: String,
        storage_path: String,
        /// Hex-encoded AES-256 key. Returned once and not kept by the server.
        encryption_key: String,
    },
}

impl ScanResponse {
    pub fn sha256(&self) -> &str {
        match self {
            ScanResponse::Malicious { sha256, .. } | ScanResponse::Clean { sha256, .. } => sha256,
        }
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, ScanResponse::Clean { .. })
    }
}
