//! Passkey-protected document envelopes.
//!
//! No HTTP or storage here. The crate provides three client-side building
//! blocks and the two compositions callers normally use:
//!
//! - [`kdf`]: passkey → [`SymmetricKey`] (PBKDF2-HMAC-SHA256, fixed salt).
//! - [`cipher`]: AES-256-GCM encryption of document text into an [`Envelope`].
//! - [`codec`]: [`Envelope`] ⇄ transport string.
//! - [`seal`] / [`open`]: the full encrypt and decrypt pipelines.
//!
//! # Wire format
//!
//! ```text
//! {"iv":"<base64(12-byte IV)>","data":"<base64(ciphertext || 16-byte tag)>"}
//! ```
//!
//! There is no version field; the algorithm and its parameters are fixed.

pub mod cipher;
pub mod codec;
pub mod error;
pub mod kdf;

pub use cipher::{Envelope, IV_LEN, TAG_LEN};
pub use error::EnvelopeError;
pub use kdf::{derive_key, SymmetricKey, KEY_LEN};

/// Encrypt `plaintext` under a key derived from `passkey` and return the
/// serialised envelope.
///
/// The caller is responsible for rejecting an empty passkey.
///
/// # Errors
///
/// Returns [`EnvelopeError::Encryption`] or [`EnvelopeError::Encoding`] on an
/// internal failure; neither is expected for text input.
pub fn seal(plaintext: &str, passkey: &str) -> Result<String, EnvelopeError> {
    let key = derive_key(passkey);
    let envelope = cipher::encrypt(plaintext, &key)?;
    codec::serialize(&envelope)
}

/// Decode a serialised envelope and decrypt it with a key derived from `passkey`.
///
/// The envelope is parsed before the key is derived, so malformed input is
/// rejected without running the key derivation or the cipher.
///
/// # Errors
///
/// - [`EnvelopeError::Format`] if `wire` is not a valid envelope.
/// - [`EnvelopeError::Authentication`] if the passkey is wrong or the envelope
///   was tampered with.
/// - [`EnvelopeError::InvalidText`] if the authenticated payload is not UTF-8.
pub fn open(wire: &str, passkey: &str) -> Result<String, EnvelopeError> {
    let envelope = codec::deserialize(wire)?;
    let key = derive_key(passkey);
    cipher::decrypt(&envelope.ciphertext, &key, &envelope.iv)
}
