//! tgp-core: shared types for Passport envelope decryption
//!
//! - [`types`]: the field-type enumeration and the wire shapes of an envelope
//! - [`fields`]: the decrypted output tree and typed payloads
//! - [`config`]: TOML configuration schema

pub mod config;
pub mod error;
pub mod fields;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use fields::{
    BillLike, DataField, DecryptedField, FileWithCredentials, Gender, IdDocument, IdDocumentData,
    PersonalDetails, RequestedFields, ResidentialAddress,
};
pub use types::{
    Credentials, DataCredentials, EncryptedCredentials, EncryptedPassportElement, FieldType,
    FileCredentials, PassportData, PassportFile, SecureData, SecureValue, UnknownFieldType,
};
