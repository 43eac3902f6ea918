//! AES-256-GCM encryption and decryption of document text.
//!
//! Each call to [`encrypt`] draws a fresh 96-bit IV from the OS CSPRNG. IV
//! uniqueness under one key is probabilistic; there is no counter.
//!
//! The output layout (`ciphertext || tag`, 12-byte IV, 16-byte tag) is the one
//! produced by WebCrypto's `AES-GCM`, so envelopes created in a browser decrypt
//! here unchanged.

use aes_gcm::{
    aead::{rand_core::RngCore, Aead, KeyInit, OsRng},
    Aes256Gcm,
};

use crate::error::EnvelopeError;
use crate::kdf::SymmetricKey;

/// Byte length of an AES-GCM IV (12 bytes = 96 bits).
pub const IV_LEN: usize = 12;

/// Byte length of the AES-GCM authentication tag appended to the ciphertext.
pub const TAG_LEN: usize = 16;

/// An encrypted document: the IV and the ciphertext with its tag appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Raw IV bytes. Not secret.
    pub iv: [u8; IV_LEN],
    /// Raw ciphertext + authentication tag bytes.
    pub ciphertext: Vec<u8>,
}

/// Encrypt `plaintext` under `key` with a freshly generated IV.
///
/// # Errors
///
/// Returns [`EnvelopeError::Encryption`] on an internal AEAD error (unreachable
/// for inputs below the GCM length limit).
pub fn encrypt(plaintext: &str, key: &SymmetricKey) -> Result<Envelope, EnvelopeError> {
    let cipher = build_cipher(key)?;

    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let ciphertext = cipher
        .encrypt(aes_gcm::Nonce::from_slice(&iv), plaintext.as_bytes())
        .map_err(|_| EnvelopeError::Encryption)?;

    Ok(Envelope { iv, ciphertext })
}

/// Decrypt `ciphertext` (with its trailing tag) under `key` and `iv`.
///
/// # Errors
///
/// - [`EnvelopeError::Authentication`] if the tag does not verify. No bytes of
///   plaintext are released in that case.
/// - [`EnvelopeError::InvalidText`] if the authenticated payload is not UTF-8.
pub fn decrypt(
    ciphertext: &[u8],
    key: &SymmetricKey,
    iv: &[u8; IV_LEN],
) -> Result<String, EnvelopeError> {
    let cipher = build_cipher(key)?;
    let plaintext = cipher
        .decrypt(aes_gcm::Nonce::from_slice(iv), ciphertext)
        .map_err(|_| EnvelopeError::Authentication)?;
    String::from_utf8(plaintext).map_err(|_| EnvelopeError::InvalidText)
}

fn build_cipher(key: &SymmetricKey) -> Result<Aes256Gcm, EnvelopeError> {
    Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| EnvelopeError::Encryption)
}
