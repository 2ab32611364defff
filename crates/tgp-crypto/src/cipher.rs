//! AES-256-CBC payload decryption with SHA-256 integrity check
//!
//! Padded plaintext layout:
//! ```text
//! [1 byte: padding length P][P-1 bytes: random][N bytes: plaintext]
//! 32 <= P <= 255, (P + N) % 16 == 0
//! ```
//!
//! The integrity hash is SHA-256 over the whole padded buffer and doubles as
//! KDF input, so a wrong secret and a tampered payload fail the same check.

use aes::cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes256Dec, Aes256Enc, Block};
use rand::{Rng, RngCore};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};
use crate::keys::{derive_key_iv, DerivedKey};
use crate::{BLOCK_SIZE, MAX_PADDING, MIN_PADDING};

/// Output of [`encrypt_data`]: the ciphertext and the hash that must travel
/// with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedData {
    pub data: Vec<u8>,
    pub hash: [u8; 32],
}

/// Decrypt a payload with its secret and integrity hash.
///
/// - `ciphertext`: raw AES-256-CBC output, a multiple of 16 bytes
/// - `secret`: raw secret bytes (already RSA-unwrapped or Base64-decoded)
/// - `hash`: SHA-256 of the padded plaintext, also the KDF salt
///
/// Returns the plaintext with the padding stripped.
pub fn decrypt_data(ciphertext: &[u8], secret: &[u8], hash: &[u8]) -> CryptoResult<Vec<u8>> {
    if ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(CryptoError::BlockAlignment {
            len: ciphertext.len(),
            block: BLOCK_SIZE,
        });
    }

    let derived = derive_key_iv(secret, hash);
    let mut padded = cbc_decrypt(&derived, ciphertext);

    let actual = Sha256::digest(&padded);
    if !bool::from(actual.as_slice().ct_eq(hash)) {
        tracing::debug!(len = ciphertext.len(), "payload hash mismatch");
        return Err(CryptoError::IntegrityCheckFailed);
    }

    let padding = padded.first().copied().map_or(0, usize::from);
    if !(MIN_PADDING..=MAX_PADDING).contains(&padding) || padding > padded.len() {
        return Err(CryptoError::Padding {
            padding,
            len: padded.len(),
        });
    }

    let plaintext = padded.split_off(padding);
    zeroize::Zeroize::zeroize(&mut padded);
    tracing::trace!(len = plaintext.len(), padding, "payload decrypted");
    Ok(plaintext)
}

/// [`decrypt_data`] over Base64-encoded inputs, as they appear on the wire.
pub fn decrypt_data_b64(data: &str, secret: &str, hash: &str) -> CryptoResult<Vec<u8>> {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    let data = STANDARD
        .decode(data)
        .map_err(|_| CryptoError::Base64("data"))?;
    let secret = Zeroizing::new(
        STANDARD
            .decode(secret)
            .map_err(|_| CryptoError::Base64("secret"))?,
    );
    let hash = STANDARD
        .decode(hash)
        .map_err(|_| CryptoError::Base64("hash"))?;
    decrypt_data(&data, &secret, &hash)
}

/// Pad and encrypt `plaintext` under `secret`; the inverse of [`decrypt_data`].
///
/// Padding length is chosen at random among the valid values for the
/// plaintext's length, and the padding bytes themselves are random.
pub fn encrypt_data(plaintext: &[u8], secret: &[u8]) -> SealedData {
    let mut rng = rand::thread_rng();

    // Smallest valid padding, then any number of extra blocks that keeps it <= 255
    let base = MIN_PADDING + (BLOCK_SIZE - (plaintext.len() + MIN_PADDING) % BLOCK_SIZE) % BLOCK_SIZE;
    let extra_blocks = (MAX_PADDING - base) / BLOCK_SIZE;
    let padding = base + BLOCK_SIZE * rng.gen_range(0..=extra_blocks);

    let mut padded = Zeroizing::new(vec![0u8; padding + plaintext.len()]);
    rng.fill_bytes(&mut padded[1..padding]);
    padded[0] = padding as u8;
    padded[padding..].copy_from_slice(plaintext);

    let hash: [u8; 32] = Sha256::digest(padded.as_slice()).into();
    let derived = derive_key_iv(secret, &hash);
    let data = cbc_encrypt(&derived, &padded);

    SealedData { data, hash }
}

/// CBC decryption without unpadding. `ciphertext.len()` must be block-aligned.
fn cbc_decrypt(derived: &DerivedKey, ciphertext: &[u8]) -> Vec<u8> {
    let cipher = Aes256Dec::new(GenericArray::from_slice(derived.key()));
    let mut previous = *derived.iv();
    let mut output = Vec::with_capacity(ciphertext.len());

    for chunk in ciphertext.chunks_exact(BLOCK_SIZE) {
        let mut block = Block::clone_from_slice(chunk);
        cipher.decrypt_block(&mut block);
        output.extend(block.iter().zip(previous.iter()).map(|(b, p)| b ^ p));
        previous.copy_from_slice(chunk);
    }
    output
}

fn cbc_encrypt(derived: &DerivedKey, padded: &[u8]) -> Vec<u8> {
    let cipher = Aes256Enc::new(GenericArray::from_slice(derived.key()));
    let mut previous = Block::clone_from_slice(derived.iv());
    let mut output = Vec::with_capacity(padded.len());

    for chunk in padded.chunks_exact(BLOCK_SIZE) {
        let mut block = Block::default();
        for (out, (p, c)) in block.iter_mut().zip(chunk.iter().zip(previous.iter())) {
            *out = p ^ c;
        }
        cipher.encrypt_block(&mut block);
        output.extend_from_slice(&block);
        previous = block;
    }
    output
}
