//! tgp-passport: Passport envelope decryption
//!
//! ```text
//! PassportData
//!   ├── credentials ──decrypt_credentials──► Credentials { secure_data, nonce }
//!   └── data[] ─────────────────────────────┐
//!                                           ▼
//!                   assemble_fields(elements, secure_data) ──► RequestedFields
//! ```
//!
//! The whole call is a pure transform: any failure aborts it, nothing is
//! retried and no partial tree is returned.

pub mod assemble;
pub mod credentials;
pub mod element;
mod encoding;
pub mod error;

pub use assemble::{assemble_element, assemble_fields, AssembleOptions};
pub use credentials::{decrypt_credentials, decrypt_credentials_raw};
pub use element::Element;
pub use error::{PassportError, PassportResult};

use tgp_core::fields::RequestedFields;
use tgp_core::types::{FileCredentials, PassportData};

/// Decrypt a full envelope with the holder's PEM private key.
///
/// Elements are processed sequentially; see [`decrypt_passport_data_with`]
/// for the parallel path.
pub fn decrypt_passport_data(
    envelope: &PassportData,
    private_key_pem: &[u8],
) -> PassportResult<RequestedFields> {
    decrypt_passport_data_with(envelope, private_key_pem, &AssembleOptions::default())
}

/// [`decrypt_passport_data`] with explicit scheduling options.
pub fn decrypt_passport_data_with(
    envelope: &PassportData,
    private_key_pem: &[u8],
    options: &AssembleOptions,
) -> PassportResult<RequestedFields> {
    let credentials = decrypt_credentials(&envelope.credentials, private_key_pem)?;
    let mut fields = assemble_fields(&envelope.data, &credentials.secure_data, options)?;
    fields.nonce = Some(credentials.nonce);

    tracing::debug!(types = ?fields.field_types(), "passport data decrypted");
    Ok(fields)
}

/// Decrypt one raw buffer (for instance a downloaded file) with its secret
/// and hash. Thin wrapper over the symmetric decryptor.
pub fn decrypt_buffer(ciphertext: &[u8], secret: &[u8], hash: &[u8]) -> PassportResult<Vec<u8>> {
    Ok(tgp_crypto::decrypt_data(ciphertext, secret, hash)?)
}

/// Decrypt a downloaded file's bytes with the credentials merged into its
/// descriptor.
pub fn decrypt_file(content: &[u8], credentials: &FileCredentials) -> PassportResult<Vec<u8>> {
    let secret = encoding::decode_secret(&credentials.secret, || "file.secret".into())?;
    let hash = encoding::decode(&credentials.file_hash, || "file.file_hash".into())?;
    decrypt_buffer(content, &secret, &hash)
}
