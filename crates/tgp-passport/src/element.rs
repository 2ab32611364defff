//! Typed view over wire elements
//!
//! Each element type admits a fixed set of sub-fields:
//!
//! | type                                            | sub-fields                                         |
//! |-------------------------------------------------|----------------------------------------------------|
//! | personal_details, address                       | data                                               |
//! | passport                                        | data, front_side, selfie, translation              |
//! | internal_passport, driver_license, identity_card| data, front_side, reverse_side, selfie, translation |
//! | utility_bill, bank_statement, rental_agreement, passport_registration, temporary_registration | files, translation |
//! | phone_number                                    | phone_number                                       |
//! | email                                           | email                                              |
//!
//! Anything else present on the wire is rejected rather than dropped.

use tgp_core::types::{EncryptedPassportElement, FieldType, PassportFile};

use crate::error::{PassportError, PassportResult};

/// An element whose only content is an encrypted `data` object.
#[derive(Debug, Clone, Copy)]
pub struct DataElement<'a> {
    pub data: &'a str,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IdDocumentElement<'a> {
    pub data: Option<&'a str>,
    pub front_side: Option<&'a PassportFile>,
    pub reverse_side: Option<&'a PassportFile>,
    pub selfie: Option<&'a PassportFile>,
    pub translation: Option<&'a [PassportFile]>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BillElement<'a> {
    pub files: Option<&'a [PassportFile]>,
    pub translation: Option<&'a [PassportFile]>,
}

/// A validated element, borrowing from the wire structure.
#[derive(Debug, Clone, Copy)]
pub enum Element<'a> {
    PersonalDetails(DataElement<'a>),
    Passport(IdDocumentElement<'a>),
    InternalPassport(IdDocumentElement<'a>),
    DriverLicense(IdDocumentElement<'a>),
    IdentityCard(IdDocumentElement<'a>),
    Address(DataElement<'a>),
    UtilityBill(BillElement<'a>),
    BankStatement(BillElement<'a>),
    RentalAgreement(BillElement<'a>),
    PassportRegistration(BillElement<'a>),
    TemporaryRegistration(BillElement<'a>),
    PhoneNumber(&'a str),
    Email(&'a str),
}

impl<'a> Element<'a> {
    /// Resolve the type tag and check the sub-fields against it.
    pub fn parse(raw: &'a EncryptedPassportElement) -> PassportResult<Self> {
        let field_type: FieldType = raw.element_type.parse()?;
        reject_unexpected(field_type, raw)?;

        let element = match field_type {
            FieldType::PersonalDetails => Element::PersonalDetails(data_element(field_type, raw)?),
            FieldType::Address => Element::Address(data_element(field_type, raw)?),
            FieldType::Passport => Element::Passport(id_document(raw)),
            FieldType::InternalPassport => Element::InternalPassport(id_document(raw)),
            FieldType::DriverLicense => Element::DriverLicense(id_document(raw)),
            FieldType::IdentityCard => Element::IdentityCard(id_document(raw)),
            FieldType::UtilityBill => Element::UtilityBill(bill(raw)),
            FieldType::BankStatement => Element::BankStatement(bill(raw)),
            FieldType::RentalAgreement => Element::RentalAgreement(bill(raw)),
            FieldType::PassportRegistration => Element::PassportRegistration(bill(raw)),
            FieldType::TemporaryRegistration => Element::TemporaryRegistration(bill(raw)),
            FieldType::PhoneNumber => Element::PhoneNumber(required(
                field_type,
                "phone_number",
                raw.phone_number.as_deref(),
            )?),
            FieldType::Email => {
                Element::Email(required(field_type, "email", raw.email.as_deref())?)
            }
        };
        Ok(element)
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            Element::PersonalDetails(_) => FieldType::PersonalDetails,
            Element::Passport(_) => FieldType::Passport,
            Element::InternalPassport(_) => FieldType::InternalPassport,
            Element::DriverLicense(_) => FieldType::DriverLicense,
            Element::IdentityCard(_) => FieldType::IdentityCard,
            Element::Address(_) => FieldType::Address,
            Element::UtilityBill(_) => FieldType::UtilityBill,
            Element::BankStatement(_) => FieldType::BankStatement,
            Element::RentalAgreement(_) => FieldType::RentalAgreement,
            Element::PassportRegistration(_) => FieldType::PassportRegistration,
            Element::TemporaryRegistration(_) => FieldType::TemporaryRegistration,
            Element::PhoneNumber(_) => FieldType::PhoneNumber,
            Element::Email(_) => FieldType::Email,
        }
    }
}

fn allowed_sub_fields(field_type: FieldType) -> &'static [&'static str] {
    match field_type {
        FieldType::PersonalDetails | FieldType::Address => &["data"],
        FieldType::Passport => &["data", "front_side", "selfie", "translation"],
        FieldType::InternalPassport | FieldType::DriverLicense | FieldType::IdentityCard => {
            &["data", "front_side", "reverse_side", "selfie", "translation"]
        }
        FieldType::UtilityBill
        | FieldType::BankStatement
        | FieldType::RentalAgreement
        | FieldType::PassportRegistration
        | FieldType::TemporaryRegistration => &["files", "translation"],
        FieldType::PhoneNumber => &["phone_number"],
        FieldType::Email => &["email"],
    }
}

fn present_sub_fields(raw: &EncryptedPassportElement) -> impl Iterator<Item = &'static str> {
    [
        ("data", raw.data.is_some()),
        ("phone_number", raw.phone_number.is_some()),
        ("email", raw.email.is_some()),
        ("files", raw.files.is_some()),
        ("front_side", raw.front_side.is_some()),
        ("reverse_side", raw.reverse_side.is_some()),
        ("selfie", raw.selfie.is_some()),
        ("translation", raw.translation.is_some()),
    ]
    .into_iter()
    .filter_map(|(name, present)| present.then_some(name))
}

fn reject_unexpected(field_type: FieldType, raw: &EncryptedPassportElement) -> PassportResult<()> {
    let allowed = allowed_sub_fields(field_type);
    match present_sub_fields(raw).find(|name| !allowed.contains(name)) {
        Some(sub_field) => Err(PassportError::UnexpectedSubField {
            field_type,
            sub_field,
        }),
        None => Ok(()),
    }
}

fn required<'a>(
    field_type: FieldType,
    sub_field: &'static str,
    value: Option<&'a str>,
) -> PassportResult<&'a str> {
    value.ok_or(PassportError::MissingSubField {
        field_type,
        sub_field,
    })
}

fn data_element(
    field_type: FieldType,
    raw: &EncryptedPassportElement,
) -> PassportResult<DataElement<'_>> {
    Ok(DataElement {
        data: required(field_type, "data", raw.data.as_deref())?,
    })
}

fn id_document(raw: &EncryptedPassportElement) -> IdDocumentElement<'_> {
    IdDocumentElement {
        data: raw.data.as_deref(),
        front_side: raw.front_side.as_ref(),
        reverse_side: raw.reverse_side.as_ref(),
        selfie: raw.selfie.as_ref(),
        translation: raw.translation.as_deref(),
    }
}

fn bill(raw: &EncryptedPassportElement) -> BillElement<'_> {
    BillElement {
        files: raw.files.as_deref(),
        translation: raw.translation.as_deref(),
    }
}
