//! Offline helpers for ScanVault operators: open stored blobs with the one-time key handed
//! out at upload time, and compute the digest the service would report for a file.

use anyhow::{Context, Result};
use scanvault_core::{open, sha256_hex, OneTimeKey};
use std::path::Path;

/// Decrypt the blob at `input` with a hex key and return the plaintext.
pub async fn decrypt_file(key_hex: &str, input: &Path) -> Result<Vec<u8>> {
    let key = OneTimeKey::from_hex(key_hex.trim()).context("Invalid encryption key")?;
    let blob = tokio::fs::read(input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;

    tracing::debug!(input = %input.display(), size_bytes = blob.len(), "Opening blob");

    let plaintext = open(&key, &blob)
        .context("Decryption failed: wrong key or the blob was modified")?;
    Ok(plaintext)
}

/// SHA-256 hex digest of the file at `path`.
pub async fn digest_file(path: &Path) -> Result<String> {
    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(sha256_hex(&content))
}

/// Initialize tracing for CLI binaries. Logs go to stderr so stdout stays clean for output.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
