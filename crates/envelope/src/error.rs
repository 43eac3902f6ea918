use thiserror::Error;

/// Errors produced by the envelope layer.
///
/// Cryptographic failures carry no detail: a wrong passkey, a
/// flipped ciphertext bit, and a corrupted IV are indistinguishable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    /// The authentication tag did not verify. Usually a wrong passkey.
    #[error("envelope authentication failed")]
    Authentication,

    /// The envelope string is not a two-field base64 record.
    #[error("malformed envelope: {0}")]
    Format(&'static str),

    /// AES-GCM encryption failed.
    #[error("encryption failed")]
    Encryption,

    /// The envelope record could not be encoded as text.
    #[error("envelope encoding failed: {0}")]
    Encoding(String),

    /// The payload authenticated but is not UTF-8 text.
    #[error("decrypted document is not valid UTF-8")]
    InvalidText,
}
