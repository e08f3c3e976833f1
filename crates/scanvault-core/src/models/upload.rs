use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Outcome of classifying one upload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Clean,
    Malicious,
}

impl Display for Verdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Verdict::Clean => write!(f, "clean"),
            Verdict::Malicious => write!(f, "malicious"),
        }
    }
}

impl FromStr for Verdict {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clean" => Ok(Verdict::Clean),
            "malicious" => Ok(Verdict::Malicious),
            _ => Err(anyhow::anyhow!("Invalid verdict: {}", s)),
        }
    }
}

/// One immutable entry of the audit trail.
///
/// `storage_path` is present exactly when `verdict` is [`Verdict::Clean`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct UploadRecord {
    pub id: Uuid,
    #[serde(rename = "username")]
    pub identity: String,
    pub filename: String,
    #[serde(rename = "file_size")]
    pub size: u64,
    #[serde(rename = "sha256")]
    pub digest: String,
    #[serde(rename = "status")]
    pub verdict: Verdict,
    pub storage_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A record about to be appended. The id and timestamp are assigned by the audit log.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUploadRecord {
    identity: String,
    filename: String,
    size: u64,
    digest: String,
    verdict: Verdict,
    storage_path: Option<String>,
}

impl NewUploadRecord {
    /// Record for content that was rejected. Nothing was stored.
    pub fn malicious(
        identity: impl Into<String>,
        filename: impl Into<String>,
        size: u64,
        digest: impl Into<String>,
    ) -> Self {
        Self {
            identity: identity.into(),
            filename: filename.into(),
            size,
            digest: digest.into(),
            verdict: Verdict::Malicious,
            storage_path: None,
        }
    }

    /// Record for content that was encrypted and written to `storage_path`.
    pub fn clean(
        identity: impl Into<String>,
        filename: impl Into<String>,
        size: u64,
        digest: impl Into<String>,
        storage_path: impl Into<String>,
    ) -> Self {
        Self {
            identity: identity.into(),
            filename: filename.into(),
            size,
            digest: digest.into(),
            verdict: Verdict::Clean,
            storage_path: Some(storage_path.into()),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn storage_path(&self) -> Option<&str> {
        self.storage_path.as_deref()
    }

    pub fn into_record(self, id: Uuid, created_at: DateTime<Utc>) -> UploadRecord {
        UploadRecord {
            id,
            identity: self.identity,
            filename: self.filename,
            size: self.size,
            digest: self.digest,
            verdict: self.verdict,
            storage_path: self.storage_path,
            created_at,
        }
    }
}

/// Response body of the audit listing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadLogList {
    pub logs: Vec<UploadRecord>,
}
