//! Field reassembly failures and edge cases, driven through full envelopes.

mod common;

use common::{element, file, file_credentials, EnvelopeBuilder};
use serde_json::json;

use tgp_core::types::{FieldType, SecureValue};
use tgp_passport::{decrypt_passport_data, PassportError};

#[test]
fn files_credentials_arity_mismatch() {
    let mut bill = element(FieldType::UtilityBill);
    bill.files = Some(vec![file("a"), file("b")]);

    let envelope = EnvelopeBuilder::new("n")
        .element(bill)
        .secure_value(
            FieldType::UtilityBill,
            SecureValue {
                files: Some(vec![file_credentials("a")]),
                ..Default::default()
            },
        )
        .build();

    let err = decrypt_passport_data(&envelope, common::pem()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "utility_bill.files: 2 files but 1 credentials"
    );
}

#[test]
fn translation_arity_mismatch_on_id_document() {
    let envelope = EnvelopeBuilder::new("n")
        .data_element(
            FieldType::IdentityCard,
            json!({"document_no": "ID-1"}),
            |element, value| {
                element.translation = Some(vec![file("t0")]);
                value.translation = Some(vec![file_credentials("t0"), file_credentials("t1")]);
            },
        )
        .build();

    let err = decrypt_passport_data(&envelope, common::pem()).unwrap_err();
    assert!(matches!(
        err,
        PassportError::ArityMismatch {
            field_type: FieldType::IdentityCard,
            sub_field: "translation",
            files: 1,
            credentials: 2
        }
    ));
}

#[test]
fn contact_fields_pass_through_with_secure_data_entry() {
    let mut phone = element(FieldType::PhoneNumber);
    phone.phone_number = Some("15550100".into());
    let mut email = element(FieldType::Email);
    email.email = Some("someone@example.net".into());

    // Entries that would fail to decrypt if they were ever consulted
    let bogus = SecureValue {
        data: Some(common::seal_json(&json!("unused")).1),
        ..Default::default()
    };
    let envelope = EnvelopeBuilder::new("n")
        .element(phone)
        .element(email)
        .secure_value(FieldType::PhoneNumber, bogus.clone())
        .secure_value(FieldType::Email, bogus)
        .build();

    let fields = decrypt_passport_data(&envelope, common::pem()).unwrap();
    assert_eq!(fields.phone_number.as_deref(), Some("15550100"));
    assert_eq!(fields.email.as_deref(), Some("someone@example.net"));
}

#[test]
fn missing_front_side_credential() {
    let envelope = EnvelopeBuilder::new("n")
        .data_element(
            FieldType::Passport,
            json!({"document_no": "P1"}),
            |element, _| element.front_side = Some(file("front")),
        )
        .build();

    let err = decrypt_passport_data(&envelope, common::pem()).unwrap_err();
    assert_eq!(err.to_string(), "passport: front_side credential missing");
}

#[test]
fn missing_secure_data_entry() {
    let mut bill = element(FieldType::TemporaryRegistration);
    bill.files = Some(vec![file("a")]);
    let envelope = EnvelopeBuilder::new("n").element(bill).build();

    let err = decrypt_passport_data(&envelope, common::pem()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "temporary_registration: secure_data entry missing"
    );
}

#[test]
fn missing_data_credential() {
    let envelope = EnvelopeBuilder::new("n")
        .data_element(
            FieldType::DriverLicense,
            json!({"document_no": "DL-9"}),
            |_, value| value.data = None,
        )
        .build();

    let err = decrypt_passport_data(&envelope, common::pem()).unwrap_err();
    assert!(matches!(
        err,
        PassportError::MissingCredentials {
            field_type: FieldType::DriverLicense,
            sub_field: Some("data")
        }
    ));
}

#[test]
fn duplicate_element_type_rejected() {
    let mut first = element(FieldType::Email);
    first.email = Some("a@example.com".into());
    let mut second = element(FieldType::Email);
    second.email = Some("b@example.com".into());

    let envelope = EnvelopeBuilder::new("n")
        .element(first)
        .element(second)
        .build();

    let err = decrypt_passport_data(&envelope, common::pem()).unwrap_err();
    assert!(matches!(err, PassportError::DuplicateFieldType(FieldType::Email)));
}

#[test]
fn unknown_element_type_rejected() {
    let mut unknown = element(FieldType::Email);
    unknown.element_type = "bank_card".into();
    unknown.email = None;

    let envelope = EnvelopeBuilder::new("n").element(unknown).build();
    let err = decrypt_passport_data(&envelope, common::pem()).unwrap_err();
    assert_eq!(err.to_string(), "unknown element type 'bank_card'");
}

#[test]
fn unknown_element_type_with_own_credentials_rejected() {
    let (data, credentials) = common::seal_json(&json!({"number": "4111"}));
    let mut card = element(FieldType::Email);
    card.element_type = "bank_card".into();
    card.email = None;
    card.data = Some(data);

    let envelope = EnvelopeBuilder::new("n")
        .element(card)
        .secure_value_named(
            "bank_card",
            SecureValue {
                data: Some(credentials),
                ..Default::default()
            },
        )
        .build();

    let err = decrypt_passport_data(&envelope, common::pem()).unwrap_err();
    assert!(matches!(err, PassportError::UnknownFieldType(ref t) if t == "bank_card"));
}

#[test]
fn empty_translation_without_credentials_is_accepted() {
    let mut bill = element(FieldType::RentalAgreement);
    bill.files = Some(vec![file("lease")]);
    bill.translation = Some(vec![]);

    let envelope = EnvelopeBuilder::new("n")
        .element(bill)
        .secure_value(
            FieldType::RentalAgreement,
            SecureValue {
                files: Some(vec![file_credentials("lease")]),
                ..Default::default()
            },
        )
        .build();

    let fields = decrypt_passport_data(&envelope, common::pem()).unwrap();
    let lease = fields.rental_agreement.unwrap();
    assert_eq!(lease.files.len(), 1);
    assert_eq!(lease.translation, Some(vec![]));
}

#[test]
fn empty_envelope_yields_only_nonce() {
    let envelope = EnvelopeBuilder::new("only-nonce").build();
    let fields = decrypt_passport_data(&envelope, common::pem()).unwrap();

    assert!(fields.field_types().is_empty());
    assert_eq!(fields.nonce.as_deref(), Some("only-nonce"));
}
