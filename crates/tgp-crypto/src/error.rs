use thiserror::Error;

pub type CryptoResult<T> = Result<T, CryptoError>;

/// Failures of the decryption primitives.
///
/// Messages never include key material or plaintext bytes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("secret unwrap failed: {0}")]
    KeyUnwrap(String),

    #[error("secret wrap failed: {0}")]
    KeyWrap(String),

    #[error("ciphertext length {len} is not a multiple of the {block}-byte block size")]
    BlockAlignment { len: usize, block: usize },

    #[error("data integrity check failed (wrong secret, tampered data, or mismatched hash)")]
    IntegrityCheckFailed,

    #[error("invalid padding length {padding} for a {len}-byte buffer")]
    Padding { padding: usize, len: usize },

    #[error("invalid base64 in {0}")]
    Base64(&'static str),
}
