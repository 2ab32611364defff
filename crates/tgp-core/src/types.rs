//! Wire shapes of a Passport envelope
//!
//! Every byte-string field on these types (`data`, `hash`, `secret`,
//! `data_hash`, `file_hash`) is Base64 text exactly as delivered by the
//! platform. Decoding happens at the decryption boundary, not here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The fixed set of element types an envelope may carry.
///
/// This is the single source of truth for type names: `secure_data` keys,
/// element `type` tags, and output keys are all derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    PersonalDetails,
    Passport,
    InternalPassport,
    DriverLicense,
    IdentityCard,
    Address,
    UtilityBill,
    BankStatement,
    RentalAgreement,
    PassportRegistration,
    TemporaryRegistration,
    PhoneNumber,
    Email,
}

impl FieldType {
    pub const ALL: [FieldType; 13] = [
        FieldType::PersonalDetails,
        FieldType::Passport,
        FieldType::InternalPassport,
        FieldType::DriverLicense,
        FieldType::IdentityCard,
        FieldType::Address,
        FieldType::UtilityBill,
        FieldType::BankStatement,
        FieldType::RentalAgreement,
        FieldType::PassportRegistration,
        FieldType::TemporaryRegistration,
        FieldType::PhoneNumber,
        FieldType::Email,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::PersonalDetails => "personal_details",
            FieldType::Passport => "passport",
            FieldType::InternalPassport => "internal_passport",
            FieldType::DriverLicense => "driver_license",
            FieldType::IdentityCard => "identity_card",
            FieldType::Address => "address",
            FieldType::UtilityBill => "utility_bill",
            FieldType::BankStatement => "bank_statement",
            FieldType::RentalAgreement => "rental_agreement",
            FieldType::PassportRegistration => "passport_registration",
            FieldType::TemporaryRegistration => "temporary_registration",
            FieldType::PhoneNumber => "phone_number",
            FieldType::Email => "email",
        }
    }

    /// `phone_number` and `email` travel in plaintext and never have an
    /// entry in `secure_data`.
    pub fn requires_credentials(self) -> bool {
        !matches!(self, FieldType::PhoneNumber | FieldType::Email)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a type tag is not one of [`FieldType::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown element type '{0}'")]
pub struct UnknownFieldType(pub String);

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownFieldType(s.to_string()))
    }
}

/// The complete envelope: encrypted elements plus the credentials blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassportData {
    pub data: Vec<EncryptedPassportElement>,
    pub credentials: EncryptedCredentials,
}

/// RSA-wrapped secret plus the AES-encrypted credentials JSON.
#[derive(Clone, Serialize, Deserialize)]
pub struct EncryptedCredentials {
    /// AES-256-CBC encrypted `Credentials` JSON (Base64)
    pub data: String,
    /// SHA-256 of the padded plaintext (Base64)
    pub hash: String,
    /// RSA-OAEP encrypted symmetric secret (Base64)
    pub secret: String,
}

impl fmt::Debug for EncryptedCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedCredentials")
            .field("data", &format_args!("<{} chars>", self.data.len()))
            .field("hash", &self.hash)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// A single element as delivered on the wire.
///
/// The `type` tag is kept as text so that an unrecognised tag surfaces as a
/// decryption error naming the tag instead of a generic JSON error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncryptedPassportElement {
    #[serde(rename = "type")]
    pub element_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<PassportFile>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_side: Option<PassportFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse_side: Option<PassportFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selfie: Option<PassportFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<Vec<PassportFile>>,
    /// Opaque; used by the caller for error reporting back to the platform.
    pub hash: String,
}

/// A file uploaded by the user. The descriptor itself is never encrypted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassportFile {
    pub file_id: String,
    pub file_unique_id: String,
    pub file_size: u64,
    /// Unix time of upload
    pub file_date: u64,
}

/// Decrypted credentials blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub secure_data: SecureData,
    /// Opaque request binding, passed through unchanged
    pub nonce: String,
}

/// Keyed by type name as sent. Keys are not checked against [`FieldType`]
/// here so that an unrecognised element type is reported by the element
/// walk, naming the tag, rather than as a credentials decode failure.
pub type SecureData = BTreeMap<String, SecureValue>;

/// Decryption material for one element type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecureValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<DataCredentials>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_side: Option<FileCredentials>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse_side: Option<FileCredentials>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selfie: Option<FileCredentials>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<Vec<FileCredentials>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileCredentials>>,
}

/// Credentials for an element's encrypted `data` JSON.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataCredentials {
    pub data_hash: String,
    pub secret: String,
}

impl fmt::Debug for DataCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataCredentials")
            .field("data_hash", &self.data_hash)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Credentials needed to decrypt a file's content once it is downloaded.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCredentials {
    pub file_hash: String,
    pub secret: String,
}

impl fmt::Debug for FileCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileCredentials")
            .field("file_hash", &self.file_hash)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
