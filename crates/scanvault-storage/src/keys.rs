//! Shared key generation for storage backends.
//!
//! Key format: `{identity}/{sha256}_{filename}.enc`.

use crate::{StorageError, StorageResult};

/// Suffix of every encrypted object.
pub const ENCRYPTED_SUFFIX: &str = ".enc";

/// Generate the storage key for an encrypted upload.
///
/// The same identity uploading the same bytes under the same name always maps to the same
/// key, which is what makes a repeated upload a collision.
pub fn generate_storage_key(identity: &str, digest: &str, filename: &str) -> String {
    format!("{}/{}_{}{}", identity, digest, filename, ENCRYPTED_SUFFIX)
}

/// Reject keys that could escape the storage root.
///
/// Only whole `.`/`..` segments, empty segments and backslashes are refused; dots inside a
/// segment (`report..enc`, `v1..2.txt`) are ordinary characters.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    let bad_segment = storage_key
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if storage_key.is_empty() || bad_segment || storage_key.contains('\\') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}
