//! Decrypted output tree
//!
//! Composite elements carry their decrypted `data` as typed payloads, file
//! descriptors are paired with the credentials needed to decrypt the file
//! content, and contact fields are plain strings.

use serde::{Deserialize, Serialize};

use crate::types::{FieldType, FileCredentials, PassportFile};

/// A file descriptor merged with its decryption credentials.
///
/// Serializes flat, i.e. `{file_id, file_unique_id, file_size, file_date,
/// file_hash, secret}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileWithCredentials {
    #[serde(flatten)]
    pub file: PassportFile,
    #[serde(flatten)]
    pub credentials: FileCredentials,
}

impl FileWithCredentials {
    pub fn new(file: PassportFile, credentials: FileCredentials) -> Self {
        Self { file, credentials }
    }
}

/// Wrapper for elements whose only content is a decrypted `data` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataField<T> {
    pub data: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalDetails {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    /// DD.MM.YYYY
    pub birth_date: String,
    pub gender: Gender,
    /// ISO 3166-1 alpha-2
    pub country_code: String,
    pub residence_country_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name_native: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name_native: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name_native: Option<String>,
    /// Keys not declared above, kept as delivered
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidentialAddress {
    pub street_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_line2: Option<String>,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub country_code: String,
    pub post_code: String,
    /// Keys not declared above, kept as delivered
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdDocumentData {
    pub document_no: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    /// Keys not declared above, kept as delivered
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// passport, internal_passport, driver_license, identity_card.
///
/// `reverse_side` is never set for `passport`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<IdDocumentData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_side: Option<FileWithCredentials>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse_side: Option<FileWithCredentials>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selfie: Option<FileWithCredentials>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<Vec<FileWithCredentials>>,
}

/// utility_bill, bank_statement, rental_agreement, passport_registration,
/// temporary_registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillLike {
    #[serde(default)]
    pub files: Vec<FileWithCredentials>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<Vec<FileWithCredentials>>,
}

/// One decrypted element, tagged by its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecryptedField {
    PersonalDetails(DataField<PersonalDetails>),
    Passport(IdDocument),
    InternalPassport(IdDocument),
    DriverLicense(IdDocument),
    IdentityCard(IdDocument),
    Address(DataField<ResidentialAddress>),
    UtilityBill(BillLike),
    BankStatement(BillLike),
    RentalAgreement(BillLike),
    PassportRegistration(BillLike),
    TemporaryRegistration(BillLike),
    PhoneNumber(String),
    Email(String),
}

impl DecryptedField {
    pub fn field_type(&self) -> FieldType {
        match self {
            DecryptedField::PersonalDetails(_) => FieldType::PersonalDetails,
            DecryptedField::Passport(_) => FieldType::Passport,
            DecryptedField::InternalPassport(_) => FieldType::InternalPassport,
            DecryptedField::DriverLicense(_) => FieldType::DriverLicense,
            DecryptedField::IdentityCard(_) => FieldType::IdentityCard,
            DecryptedField::Address(_) => FieldType::Address,
            DecryptedField::UtilityBill(_) => FieldType::UtilityBill,
            DecryptedField::BankStatement(_) => FieldType::BankStatement,
            DecryptedField::RentalAgreement(_) => FieldType::RentalAgreement,
            DecryptedField::PassportRegistration(_) => FieldType::PassportRegistration,
            DecryptedField::TemporaryRegistration(_) => FieldType::TemporaryRegistration,
            DecryptedField::PhoneNumber(_) => FieldType::PhoneNumber,
            DecryptedField::Email(_) => FieldType::Email,
        }
    }
}

/// The reassembled, decrypted envelope keyed by element type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_details: Option<DataField<PersonalDetails>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport: Option<IdDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_passport: Option<IdDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_license: Option<IdDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_card: Option<IdDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<DataField<ResidentialAddress>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utility_bill: Option<BillLike>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_statement: Option<BillLike>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rental_agreement: Option<BillLike>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport_registration: Option<BillLike>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporary_registration: Option<BillLike>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Nonce from the decrypted credentials, for request binding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

impl RequestedFields {
    /// Store a decrypted field under its type. Returns `true` if a value of
    /// the same type was already present and has been replaced.
    pub fn insert(&mut self, field: DecryptedField) -> bool {
        match field {
            DecryptedField::PersonalDetails(v) => self.personal_details.replace(v).is_some(),
            DecryptedField::Passport(v) => self.passport.replace(v).is_some(),
            DecryptedField::InternalPassport(v) => self.internal_passport.replace(v).is_some(),
            DecryptedField::DriverLicense(v) => self.driver_license.replace(v).is_some(),
            DecryptedField::IdentityCard(v) => self.identity_card.replace(v).is_some(),
            DecryptedField::Address(v) => self.address.replace(v).is_some(),
            DecryptedField::UtilityBill(v) => self.utility_bill.replace(v).is_some(),
            DecryptedField::BankStatement(v) => self.bank_statement.replace(v).is_some(),
            DecryptedField::RentalAgreement(v) => self.rental_agreement.replace(v).is_some(),
            DecryptedField::PassportRegistration(v) => {
                self.passport_registration.replace(v).is_some()
            }
            DecryptedField::TemporaryRegistration(v) => {
                self.temporary_registration.replace(v).is_some()
            }
            DecryptedField::PhoneNumber(v) => self.phone_number.replace(v).is_some(),
            DecryptedField::Email(v) => self.email.replace(v).is_some(),
        }
    }

    pub fn contains(&self, field_type: FieldType) -> bool {
        match field_type {
            FieldType::PersonalDetails => self.personal_details.is_some(),
            FieldType::Passport => self.passport.is_some(),
            FieldType::InternalPassport => self.internal_passport.is_some(),
            FieldType::DriverLicense => self.driver_license.is_some(),
            FieldType::IdentityCard => self.identity_card.is_some(),
            FieldType::Address => self.address.is_some(),
            FieldType::UtilityBill => self.utility_bill.is_some(),
            FieldType::BankStatement => self.bank_statement.is_some(),
            FieldType::RentalAgreement => self.rental_agreement.is_some(),
            FieldType::PassportRegistration => self.passport_registration.is_some(),
            FieldType::TemporaryRegistration => self.temporary_registration.is_some(),
            FieldType::PhoneNumber => self.phone_number.is_some(),
            FieldType::Email => self.email.is_some(),
        }
    }

    /// Types present in this tree, in enumeration order.
    pub fn field_types(&self) -> Vec<FieldType> {
        FieldType::ALL
            .into_iter()
            .filter(|t| self.contains(*t))
            .collect()
    }
}
