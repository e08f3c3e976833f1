//! Configuration validation
//!
//! Checks deployment-level settings on top of `Config::validate`, which covers the scan
//! rules and backend combinations.

use anyhow::Result;
use scanvault_core::Config;

pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    let is_production = config.is_production();
    let env_var = std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .ok();

    if is_production && env_var.is_none() {
        tracing::warn!(
            "Production mode detected but ENVIRONMENT/APP_ENV not set - error details may leak"
        );
    }

    if is_production {
        if config.cors_origins().iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS configured to allow all origins (*) in production. \
                Set specific allowed origins via the CORS_ORIGINS environment variable."
            ));
        }
        if config.audit_log_backend() == scanvault_core::AuditLogBackend::Memory {
            tracing::warn!("In-memory audit log in production - records are lost on restart");
        }
    }

    if config.db_max_connections() == 0 {
        return Err(anyhow::anyhow!("Database max connections cannot be 0"));
    }

    if config.db_timeout_seconds() == 0 {
        return Err(anyhow::anyhow!("Database timeout cannot be 0"));
    }

    Ok(())
}
