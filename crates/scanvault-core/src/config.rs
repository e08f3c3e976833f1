//! Configuration module
//!
//! This module provides the configuration of the scan service: server settings shared with
//! any future service, detection rules, storage and audit log backends.

use std::env;

use crate::digest::is_sha256_hex;
use crate::storage_types::{AuditLogBackend, StorageBackend};

// Common constants
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_FILE_SIZE_BYTES: usize = 2 * 1024 * 1024;
const AUDIT_APPEND_MAX_ATTEMPTS: u32 = 3;

/// SHA-256 of zero-length content, blocked out of the box.
pub const DEFAULT_BLOCKLIST_HASH: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
pub const DEFAULT_TRIGGER_PATTERN: &str = "DEMO_TRIGGER";
pub const DEFAULT_LOCAL_STORAGE_PATH: &str = "./data/encrypted-files";

/// Base configuration shared by all services
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub environment: String,
    pub log_json: bool,
}

/// Scan service configuration
#[derive(Clone, Debug)]
pub struct ScanConfig {
    pub base: BaseConfig,
    pub database_url: Option<String>,
    // Detection rules
    pub blocklist_hashes: Vec<String>,
    pub trigger_pattern: String,
    pub max_file_size_bytes: usize,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub local_storage_path: String,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub aws_region: Option<String>,
    // Audit log
    pub audit_log_backend: AuditLogBackend,
    pub audit_append_max_attempts: u32,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ScanConfig>);

impl Config {
    fn as_scan(&self) -> &ScanConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.as_scan().base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ScanConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_scan().validate()
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.as_scan().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_scan().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_scan().base.environment
    }

    pub fn log_json(&self) -> bool {
        self.as_scan().base.log_json
    }

    pub fn db_max_connections(&self) -> u32 {
        self.as_scan().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.as_scan().base.db_timeout_seconds
    }

    pub fn database_url(&self) -> Option<&str> {
        self.as_scan().database_url.as_deref()
    }

    pub fn blocklist_hashes(&self) -> &[String] {
        &self.as_scan().blocklist_hashes
    }

    pub fn trigger_pattern(&self) -> &str {
        &self.as_scan().trigger_pattern
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.as_scan().max_file_size_bytes
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_scan().storage_backend
    }

    pub fn local_storage_path(&self) -> &str {
        &self.as_scan().local_storage_path
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.as_scan().s3_bucket.as_deref()
    }

    /// S3 region, falling back to `AWS_REGION`.
    pub fn s3_region(&self) -> Option<&str> {
        self.as_scan()
            .s3_region
            .as_deref()
            .or(self.as_scan().aws_region.as_deref())
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_scan().s3_endpoint.as_deref()
    }

    pub fn audit_log_backend(&self) -> AuditLogBackend {
        self.as_scan().audit_log_backend
    }

    pub fn audit_append_max_attempts(&self) -> u32 {
        self.as_scan().audit_append_max_attempts
    }
}

impl Default for ScanConfig {
    /// Development defaults: local storage, in-memory audit log, no database.
    fn default() -> Self {
        Self {
            base: BaseConfig {
                server_port: 4000,
                cors_origins: vec!["*".to_string()],
                db_max_connections: MAX_CONNECTIONS,
                db_timeout_seconds: CONNECTION_TIMEOUT_SECS,
                environment: "development".to_string(),
                log_json: false,
            },
            database_url: None,
            blocklist_hashes: vec![DEFAULT_BLOCKLIST_HASH.to_string()],
            trigger_pattern: DEFAULT_TRIGGER_PATTERN.to_string(),
            max_file_size_bytes: MAX_FILE_SIZE_BYTES,
            storage_backend: StorageBackend::Local,
            local_storage_path: DEFAULT_LOCAL_STORAGE_PATH.to_string(),
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            aws_region: None,
            audit_log_backend: AuditLogBackend::Memory,
            audit_append_max_attempts: AUDIT_APPEND_MAX_ATTEMPTS,
        }
    }
}

impl ScanConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            environment,
            log_json: env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        };

        let database_url = env::var("DATABASE_URL").ok().filter(|s| !s.trim().is_empty());

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse::<StorageBackend>()?,
            Err(_) => StorageBackend::Local,
        };

        let audit_log_backend = match env::var("AUDIT_LOG_BACKEND") {
            Ok(value) => value.parse::<AuditLogBackend>()?,
            Err(_) if database_url.is_some() => AuditLogBackend::Postgres,
            Err(_) => AuditLogBackend::Memory,
        };

        let blocklist_hashes = env::var("BLOCKLIST_HASHES")
            .unwrap_or_else(|_| DEFAULT_BLOCKLIST_HASH.to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let config = ScanConfig {
            base,
            database_url,
            blocklist_hashes,
            trigger_pattern: env::var("TRIGGER_PATTERN")
                .unwrap_or_else(|_| DEFAULT_TRIGGER_PATTERN.to_string()),
            max_file_size_bytes: env::var("MAX_FILE_SIZE_BYTES")
                .unwrap_or_else(|_| MAX_FILE_SIZE_BYTES.to_string())
                .parse()
                .unwrap_or(MAX_FILE_SIZE_BYTES),
            storage_backend,
            local_storage_path: env::var("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|_| DEFAULT_LOCAL_STORAGE_PATH.to_string()),
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            audit_log_backend,
            audit_append_max_attempts: env::var("AUDIT_APPEND_MAX_ATTEMPTS")
                .unwrap_or_else(|_| AUDIT_APPEND_MAX_ATTEMPTS.to_string())
                .parse()
                .unwrap_or(AUDIT_APPEND_MAX_ATTEMPTS),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_FILE_SIZE_BYTES must be greater than zero"
            ));
        }

        if self.trigger_pattern.is_empty() {
            return Err(anyhow::anyhow!("TRIGGER_PATTERN must not be empty"));
        }

        if let Some(bad) = self.blocklist_hashes.iter().find(|h| !is_sha256_hex(h)) {
            return Err(anyhow::anyhow!(
                "BLOCKLIST_HASHES contains an invalid SHA-256 digest: {}",
                bad
            ));
        }

        if self.audit_append_max_attempts == 0 {
            return Err(anyhow::anyhow!(
                "AUDIT_APPEND_MAX_ATTEMPTS must be at least 1"
            ));
        }

        if self.audit_log_backend == AuditLogBackend::Postgres {
            match self.database_url.as_deref() {
                None => {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be set when using the postgres audit log backend"
                    ));
                }
                Some(url)
                    if !(url.starts_with("postgresql://") || url.starts_with("postgres://")) =>
                {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be a valid PostgreSQL connection string"
                    ));
                }
                Some(_) => {}
            }
        }

        // Validate storage backend configuration
        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.trim().is_empty() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must not be empty when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config(Box::new(ScanConfig::default()));
        assert!(config.validate().is_ok());
        assert_eq!(config.max_file_size_bytes(), 2_097_152);
        assert_eq!(config.trigger_pattern(), "DEMO_TRIGGER");
        assert_eq!(config.blocklist_hashes(), &[DEFAULT_BLOCKLIST_HASH.to_string()]);
        assert!(!config.is_production());
    }

    #[test]
    fn rejects_empty_trigger_pattern() {
        let config = ScanConfig {
            trigger_pattern: String::new(),
            ..ScanConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_malformed_blocklist_hash() {
        let config = ScanConfig {
            blocklist_hashes: vec!["not-a-digest".to_string()],
            ..ScanConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("BLOCKLIST_HASHES"));
    }

    #[test]
    fn postgres_backend_requires_database_url() {
        let mut config = ScanConfig {
            audit_log_backend: AuditLogBackend::Postgres,
            ..ScanConfig::default()
        };
        assert!(config.validate().is_err());

        config.database_url = Some("mysql://localhost/db".to_string());
        assert!(config.validate().is_err());

        config.database_url = Some("postgres://localhost/scanvault".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn s3_backend_requires_bucket_and_region() {
        let mut config = ScanConfig {
            storage_backend: StorageBackend::S3,
            ..ScanConfig::default()
        };
        assert!(config.validate().is_err());

        config.s3_bucket = Some("encrypted-files".to_string());
        assert!(config.validate().is_err());

        config.aws_region = Some("eu-west-1".to_string());
        assert!(config.validate().is_ok());

        let wrapped = Config(Box::new(config));
        assert_eq!(wrapped.s3_region(), Some("eu-west-1"));
    }

    #[test]
    fn rejects_zero_size_cap() {
        let config = ScanConfig {
            max_file_size_bytes: 0,
            ..ScanConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
