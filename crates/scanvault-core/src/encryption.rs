//! One-time encryption of clean uploads.
//!
//! Every call to [`seal`] mints a fresh AES-256-GCM key and nonce, so a nonce is never reused
//! under the same key. The stored blob layout is `nonce (12 bytes) || ciphertext || tag (16 bytes)`,
//! which lets [`open`] recover the nonce without a side channel.
//!
//! The key is not retained anywhere on the server: it is handed to the caller exactly once
//! through [`OneTimeKey::into_hex`] and zeroized on drop otherwise.

use crate::AppError;
use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use std::fmt;
use zeroize::{Zeroize, Zeroizing};

/// AES-256 key length in bytes.
pub const KEY_SIZE: usize = 32;
/// GCM nonce length in bytes.
pub const NONCE_SIZE: usize = 12;
/// GCM authentication tag length in bytes.
pub const TAG_SIZE: usize = 16;

/// Symmetric key generated for a single upload.
pub struct OneTimeKey(Zeroizing<[u8; KEY_SIZE]>);

impl OneTimeKey {
    fn generate() -> Self {
        let mut generated = Aes256Gcm::generate_key(OsRng);
        let mut bytes = Zeroizing::new([0u8; KEY_SIZE]);
        bytes.copy_from_slice(generated.as_slice());
        generated.as_mut_slice().zeroize();
        Self(bytes)
    }

    /// Parse a key previously returned to a client as hex.
    pub fn from_hex(encoded: &str) -> Result<Self, AppError> {
        let decoded = Zeroizing::new(hex::decode(encoded.trim()).map_err(|e| {
            AppError::InvalidInput(format!("Encryption key is not valid hex: {}", e))
        })?);
        if decoded.len() != KEY_SIZE {
            return Err(AppError::InvalidInput(
                "Encryption key must be 32 bytes (256 bits)".to_string(),
            ));
        }
        let mut bytes = Zeroizing::new([0u8; KEY_SIZE]);
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }

    /// Hand the key over to the caller. After this the server holds no copy.
    pub fn into_hex(self) -> String {
        hex::encode(&self.0[..])
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.0[..]))
    }
}

impl fmt::Debug for OneTimeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OneTimeKey(<redacted>)")
    }
}

/// Output of [`seal`]: the stored blob parts and the key that opens them.
#[derive(Debug)]
pub struct SealedContent {
    pub nonce: [u8; NONCE_SIZE],
    /// Ciphertext with the GCM tag appended.
    pub ciphertext: Vec<u8>,
    pub key: OneTimeKey,
}

impl SealedContent {
    /// Split into the storable blob (`nonce || ciphertext`) and the key.
    pub fn into_blob(self) -> (Vec<u8>, OneTimeKey) {
        let mut blob = Vec::with_capacity(NONCE_SIZE + self.ciphertext.len());
        blob.extend_from_slice(&self.nonce);
        blob.extend_from_slice(&self.ciphertext);
        (blob, self.key)
    }
}

/// Encrypt `plaintext` under a freshly generated key and nonce.
pub fn seal(plaintext: &[u8]) -> Result<SealedContent, AppError> {
    let key = OneTimeKey::generate();
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = key
        .cipher()
        .encrypt(&nonce, plaintext)
        .map_err(|e| AppError::Encryption(format!("Encryption failed: {}", e)))?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    nonce_bytes.copy_from_slice(nonce.as_slice());

    Ok(SealedContent {
        nonce: nonce_bytes,
        ciphertext,
        key,
    })
}

/// Decrypt a stored blob (`nonce || ciphertext`). Fails closed on any modification.
pub fn open(key: &OneTimeKey, blob: &[u8]) -> Result<Vec<u8>, AppError> {
    if blob.len() < NONCE_SIZE + TAG_SIZE {
        return Err(AppError::InvalidInput("Encrypted data too short".to_string()));
    }

    let (nonce, ciphertext) = blob.split_at(NONCE_SIZE);
    key.cipher()
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| {
            AppError::InvalidInput(
                "Decryption failed: wrong key or tampered data".to_string(),
            )
        })
}
