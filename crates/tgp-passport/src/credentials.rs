//! Credentials blob decoding
//!
//! ```text
//! secret ──RSA-OAEP──► symmetric secret
//! data, hash, symmetric secret ──decrypt_data──► Credentials JSON
//! ```

use tgp_core::types::{Credentials, EncryptedCredentials};

use crate::encoding;
use crate::error::{PassportError, PassportResult};

/// Decrypt an envelope's credentials blob with the holder's PEM private key.
///
/// Crypto failures surface unchanged as [`PassportError::Crypto`]; a
/// plaintext that is not a `Credentials` document (missing `secure_data` or
/// `nonce`) is a [`PassportError::PayloadDecode`].
pub fn decrypt_credentials(
    encrypted: &EncryptedCredentials,
    private_key_pem: &[u8],
) -> PassportResult<Credentials> {
    let data = encoding::decode(&encrypted.data, || "credentials.data".into())?;
    let hash = encoding::decode(&encrypted.hash, || "credentials.hash".into())?;
    let secret = encoding::decode(&encrypted.secret, || "credentials.secret".into())?;

    decrypt_credentials_raw(&data, &hash, &secret, private_key_pem)
}

/// [`decrypt_credentials`] over already-decoded byte buffers.
pub fn decrypt_credentials_raw(
    data: &[u8],
    hash: &[u8],
    encrypted_secret: &[u8],
    private_key_pem: &[u8],
) -> PassportResult<Credentials> {
    let secret = tgp_crypto::unwrap_secret(encrypted_secret, private_key_pem)?;
    let plaintext = zeroize::Zeroizing::new(tgp_crypto::decrypt_data(data, &secret, hash)?);

    let credentials: Credentials = serde_json::from_slice(&plaintext)
        .map_err(|e| PassportError::payload("credentials", &e))?;

    tracing::debug!(
        entries = credentials.secure_data.len(),
        "credentials decrypted"
    );
    Ok(credentials)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use rsa::pkcs1::{EncodeRsaPrivateKey, LineEnding};
    use rsa::{RsaPrivateKey, RsaPublicKey};
    use std::sync::OnceLock;
    use tgp_crypto::CryptoError;

    struct Fixture {
        public: RsaPublicKey,
        pem: String,
    }

    fn fixture() -> &'static Fixture {
        static FIXTURE: OnceLock<Fixture> = OnceLock::new();
        FIXTURE.get_or_init(|| {
            let key = RsaPrivateKey::new(&mut rand::thread_rng(), 1024).unwrap();
            Fixture {
                public: RsaPublicKey::from(&key),
                pem: key.to_pkcs1_pem(LineEnding::LF).unwrap().to_string(),
            }
        })
    }

    fn seal(plaintext: &[u8]) -> EncryptedCredentials {
        let secret = tgp_crypto::generate_secret();
        let sealed = tgp_crypto::encrypt_data(plaintext, &secret);
        let wrapped = tgp_crypto::wrap_secret(&fixture().public, &secret).unwrap();
        EncryptedCredentials {
            data: STANDARD.encode(&sealed.data),
            hash: STANDARD.encode(sealed.hash),
            secret: STANDARD.encode(wrapped),
        }
    }

    #[test]
    fn test_decrypt_empty_credentials() {
        let encrypted = seal(br#"{"secure_data":{},"nonce":"abc123"}"#);
        let creds = decrypt_credentials(&encrypted, fixture().pem.as_bytes()).unwrap();

        assert!(creds.secure_data.is_empty());
        assert_eq!(creds.nonce, "abc123");
    }

    #[test]
    fn test_missing_nonce_is_payload_error() {
        let encrypted = seal(br#"{"secure_data":{}}"#);
        let err = decrypt_credentials(&encrypted, fixture().pem.as_bytes()).unwrap_err();
        assert!(matches!(err, PassportError::PayloadDecode { .. }));
    }

    #[test]
    fn test_non_json_is_payload_error() {
        let encrypted = seal(b"not json at all");
        let err = decrypt_credentials(&encrypted, fixture().pem.as_bytes()).unwrap_err();
        assert!(matches!(err, PassportError::PayloadDecode { .. }));
    }

    #[test]
    fn test_tampered_hash_is_integrity_failure() {
        let mut encrypted = seal(br#"{"secure_data":{},"nonce":"n"}"#);
        let mut hash = STANDARD.decode(&encrypted.hash).unwrap();
        hash[0] ^= 0x01;
        encrypted.hash = STANDARD.encode(hash);

        let err = decrypt_credentials(&encrypted, fixture().pem.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            PassportError::Crypto(CryptoError::IntegrityCheckFailed)
        ));
    }

    #[test]
    fn test_bad_private_key_is_unwrap_error() {
        let encrypted = seal(br#"{"secure_data":{},"nonce":"n"}"#);
        let err = decrypt_credentials(&encrypted, b"not a key").unwrap_err();
        assert!(matches!(err, PassportError::Crypto(CryptoError::KeyUnwrap(_))));
    }

    #[test]
    fn test_invalid_base64_names_field() {
        let mut encrypted = seal(br#"{"secure_data":{},"nonce":"n"}"#);
        encrypted.secret = "***".into();

        let err = decrypt_credentials(&encrypted, fixture().pem.as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "invalid base64 in credentials.secret");
    }
}
