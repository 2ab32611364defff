//! Symmetric key/IV derivation and secret generation

use rand::RngCore;
use sha2::{Digest, Sha512};
use zeroize::{Zeroize, Zeroizing};

use crate::{IV_SIZE, KEY_SIZE};

/// AES-256 key and CBC IV derived from a (secret, hash) pair. Zeroized on drop.
#[derive(Clone)]
pub struct DerivedKey {
    key: [u8; KEY_SIZE],
    iv: [u8; IV_SIZE],
}

impl DerivedKey {
    pub fn key(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }

    pub fn iv(&self) -> &[u8; IV_SIZE] {
        &self.iv
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.key.zeroize();
        self.iv.zeroize();
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .field("iv", &"[REDACTED]")
            .finish()
    }
}

/// `digest = SHA-512(secret || hash)`, `key = digest[0..32]`, `iv = digest[32..48]`.
pub fn derive_key_iv(secret: &[u8], hash: &[u8]) -> DerivedKey {
    let mut hasher = Sha512::new();
    hasher.update(secret);
    hasher.update(hash);
    let mut digest = hasher.finalize();

    let mut key = [0u8; KEY_SIZE];
    let mut iv = [0u8; IV_SIZE];
    key.copy_from_slice(&digest[..KEY_SIZE]);
    iv.copy_from_slice(&digest[KEY_SIZE..KEY_SIZE + IV_SIZE]);
    digest.as_mut_slice().zeroize();

    DerivedKey { key, iv }
}

/// Generate a random 32-byte secret for sealing a payload.
pub fn generate_secret() -> Zeroizing<Vec<u8>> {
    let mut secret = Zeroizing::new(vec![0u8; KEY_SIZE]);
    rand::thread_rng().fill_bytes(&mut secret);
    secret
}
