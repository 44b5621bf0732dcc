//! AES-256-GCM encryption of individual identifier strings.
//!
//! **Nonce discipline:** a fresh random 96-bit nonce is drawn from the OS
//! CSPRNG for every call. Nonce reuse under the same key breaks both
//! confidentiality and authentication for GCM, so the nonce is never cached,
//! derived, or accepted from the caller.

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the GCM authentication tag (16 bytes = 128 bits).
pub const TAG_LEN: usize = 16;

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The key material is the wrong length (must be [`KEY_LEN`] bytes).
    #[error("invalid key length: expected {KEY_LEN} bytes")]
    InvalidKeyLength,

    /// AES-GCM sealing failed. With a valid key and a fresh nonce this is
    /// unreachable; it is surfaced as an error rather than a panic so the
    /// dispatcher can fail closed.
    #[error("aead seal operation failed")]
    AeadFailure,
}

/// Write-only AES-256-GCM string encryptor.
///
/// Holds the cipher state derived from a validated 256-bit key. The key is
/// fixed for the lifetime of the value; there is no re-keying and no
/// decryption API. Apart from the immutable key there is no state, so a
/// shared reference can be used from any number of tasks concurrently.
///
/// The key material is never logged; the [`std::fmt::Debug`] impl is redacted.
pub struct StringEncryptor {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for StringEncryptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key-derived state, not even in debug builds.
        f.write_str("StringEncryptor([REDACTED])")
    }
}

impl StringEncryptor {
    /// Build an encryptor from raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyLength`] unless `key` is exactly
    /// [`KEY_LEN`] bytes. Any 32-byte value is accepted.
    pub fn new(key: &[u8]) -> Result<Self, CipherError> {
        if key.len() != KEY_LEN {
            return Err(CipherError::InvalidKeyLength);
        }
        let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CipherError::InvalidKeyLength)?;
        Ok(Self { cipher })
    }

    /// Encrypt a plaintext string into a transport-safe token.
    ///
    /// Generates a fresh random nonce, seals the UTF-8 bytes of `plaintext`,
    /// and returns `base64(nonce ∥ ciphertext ∥ tag)` using the standard
    /// alphabet with padding. Two calls with identical input produce
    /// different tokens.
    ///
    /// An empty string is a valid plaintext and encrypts to a token carrying
    /// only nonce and tag.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::AeadFailure`] on an internal AEAD error
    /// (unreachable with a valid key).
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        use aes_gcm::aead::rand_core::RngCore;
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        // The aes-gcm crate appends the 16-byte tag to the ciphertext.
        let sealed = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| CipherError::AeadFailure)?;

        let mut combined = Vec::with_capacity(NONCE_LEN + sealed.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&sealed);

        Ok(STANDARD.encode(combined))
    }
}
