//! RSA-OAEP secret unwrap
//!
//! The platform encrypts the per-envelope secret with the bot's public key
//! using OAEP (MGF1 + SHA-1). The private key arrives as PEM bytes and is
//! only borrowed for the duration of the call.

use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};

/// Parse a PEM-encoded RSA private key, PKCS#1 or PKCS#8.
pub fn parse_private_key(pem: &[u8]) -> CryptoResult<RsaPrivateKey> {
    let pem = std::str::from_utf8(pem)
        .map_err(|_| CryptoError::KeyUnwrap("private key is not valid PEM text".into()))?;

    RsaPrivateKey::from_pkcs1_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs8_pem(pem))
        .map_err(|_| CryptoError::KeyUnwrap("malformed RSA private key".into()))
}

/// Decrypt an RSA-OAEP encrypted secret with a PEM private key.
pub fn unwrap_secret(encrypted: &[u8], private_key_pem: &[u8]) -> CryptoResult<Zeroizing<Vec<u8>>> {
    let key = parse_private_key(private_key_pem)?;

    if encrypted.len() != key.size() {
        return Err(CryptoError::KeyUnwrap(format!(
            "encrypted secret is {} bytes, key modulus is {}",
            encrypted.len(),
            key.size()
        )));
    }

    let secret = key
        .decrypt(Oaep::new::<Sha1>(), encrypted)
        .map_err(|_| {
            CryptoError::KeyUnwrap("OAEP decryption failed (wrong key or corrupted secret)".into())
        })?;

    tracing::trace!(len = secret.len(), "secret unwrapped");
    Ok(Zeroizing::new(secret))
}

/// Encrypt a secret for the holder of `public_key`; the inverse of
/// [`unwrap_secret`].
pub fn wrap_secret(public_key: &RsaPublicKey, secret: &[u8]) -> CryptoResult<Vec<u8>> {
    public_key
        .encrypt(&mut rand::thread_rng(), Oaep::new::<Sha1>(), secret)
        .map_err(|e| CryptoError::KeyWrap(e.to_string()))
}
