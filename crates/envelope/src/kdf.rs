//! Passkey-based key derivation.
//!
//! Every key is derived with PBKDF2-HMAC-SHA256 over a single, fixed salt.
//! Two derivations from the same passkey therefore always yield the same key,
//! which is what lets a document sealed on one machine be opened on another
//! with nothing but the passkey.

use std::fmt;

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// PBKDF2 iteration count.
pub const KDF_ITERATIONS: u32 = 100_000;

/// Salt shared by every derivation.
///
/// Changing this value makes every existing envelope undecryptable.
pub const KDF_SALT: &[u8] = b"some-fixed-salt";

/// A 256-bit key derived from a passkey.
///
/// The buffer is zeroed on drop and never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey([u8; KEY_LEN]);

impl SymmetricKey {
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    #[cfg(test)]
    pub(crate) fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKey([REDACTED])")
    }
}

/// Derive the document key for `passkey`.
///
/// Pure function of its input; an empty passkey is a caller error and is not
/// checked here.
pub fn derive_key(passkey: &str) -> SymmetricKey {
    stretch(passkey.as_bytes(), KDF_SALT, KDF_ITERATIONS)
}

fn stretch(secret: &[u8], salt: &[u8], rounds: u32) -> SymmetricKey {
    let mut key = SymmetricKey([0u8; KEY_LEN]);
    pbkdf2_hmac::<Sha256>(secret, salt, rounds, &mut key.0);
    key
}
