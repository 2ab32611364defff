//! tgp-crypto: decryption primitives for Passport envelopes
//!
//! Pipeline for every encrypted payload (credentials blob, element `data`,
//! downloaded files):
//! ```text
//! secret ── RSA-OAEP unwrap (credentials only)
//!   │
//!   └── SHA-512(secret || hash) ──► key = [0..32], iv = [32..48]
//!                                      │
//! ciphertext ── AES-256-CBC (no unpadding) ──► padded
//!                                      │
//!                 SHA-256(padded) == hash  (constant time)
//!                                      │
//!                 padded[padded[0]..]  ──► plaintext
//! ```
//!
//! Padding: 32..=255 random bytes prepended so the total length is a
//! multiple of 16. The first byte holds the padding length, itself included.

pub mod cipher;
pub mod error;
pub mod keys;
pub mod unwrap;

pub use cipher::{decrypt_data, decrypt_data_b64, encrypt_data, SealedData};
pub use error::{CryptoError, CryptoResult};
pub use keys::{derive_key_iv, generate_secret, DerivedKey};
pub use unwrap::{parse_private_key, unwrap_secret, wrap_secret};

/// AES block size in bytes
pub const BLOCK_SIZE: usize = 16;

/// AES-256 key size in bytes
pub const KEY_SIZE: usize = 32;

/// CBC initialization vector size in bytes
pub const IV_SIZE: usize = 16;

/// Smallest valid padding length (length byte included)
pub const MIN_PADDING: usize = 32;

/// Largest valid padding length (length byte included)
pub const MAX_PADDING: usize = 255;
