//! Field reassembly
//!
//! For each element:
//! - `phone_number` / `email` are copied as-is, `secure_data` is not consulted
//! - encrypted `data` is decrypted with `secure_data[type].data` and parsed
//! - `front_side` / `reverse_side` / `selfie` are paired with the matching
//!   file credentials
//! - `files` / `translation` are zipped positionally with the credential
//!   lists, which must have the same length
//!
//! Elements are independent of each other and only share the read-only
//! `secure_data` map, so they can be decrypted on a rayon pool.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, OnceLock};

use tgp_core::fields::{
    BillLike, DataField, DecryptedField, FileWithCredentials, IdDocument, RequestedFields,
};
use tgp_core::types::{
    DataCredentials, EncryptedPassportElement, FieldType, FileCredentials, PassportFile,
    SecureData, SecureValue,
};

use crate::element::{BillElement, DataElement, Element, IdDocumentElement};
use crate::encoding;
use crate::error::{PassportError, PassportResult};

/// How element decryption is scheduled.
#[derive(Debug, Clone, Default)]
pub struct AssembleOptions {
    /// Decrypt elements on a rayon pool
    pub parallel: bool,
    /// Dedicated pool size when parallel (0 = rayon's global pool); pools
    /// are built once per size and reused
    pub workers: usize,
}

impl From<&tgp_core::config::DecryptConfig> for AssembleOptions {
    fn from(config: &tgp_core::config::DecryptConfig) -> Self {
        Self {
            parallel: config.parallel,
            workers: config.workers,
        }
    }
}

/// Decrypt and reassemble every element of an envelope.
///
/// Fails on the first unknown or repeated element type before any
/// decryption starts; otherwise any element failure fails the whole call.
pub fn assemble_fields(
    elements: &[EncryptedPassportElement],
    secure_data: &SecureData,
    options: &AssembleOptions,
) -> PassportResult<RequestedFields> {
    let parsed = elements
        .iter()
        .map(Element::parse)
        .collect::<PassportResult<Vec<_>>>()?;
    reject_duplicates(&parsed)?;

    let orphaned: Vec<&str> = secure_data
        .keys()
        .map(String::as_str)
        .filter(|key| !parsed.iter().any(|e| e.field_type().as_str() == *key))
        .collect();
    if !orphaned.is_empty() {
        tracing::debug!(?orphaned, "secure_data entries without a matching element");
    }

    tracing::debug!(
        elements = parsed.len(),
        parallel = options.parallel,
        "assembling passport fields"
    );

    let decrypted = if options.parallel {
        let run = || {
            parsed
                .par_iter()
                .map(|element| assemble_element(element, secure_data))
                .collect::<PassportResult<Vec<_>>>()
        };
        if options.workers > 0 {
            worker_pool(options.workers)?.install(run)?
        } else {
            run()?
        }
    } else {
        parsed
            .iter()
            .map(|element| assemble_element(element, secure_data))
            .collect::<PassportResult<Vec<_>>>()?
    };

    let mut fields = RequestedFields::default();
    for field in decrypted {
        fields.insert(field);
    }
    Ok(fields)
}

/// Dedicated pool of `workers` threads, built on first use and shared by
/// every later call asking for the same size.
fn worker_pool(workers: usize) -> PassportResult<Arc<ThreadPool>> {
    static POOLS: OnceLock<Mutex<BTreeMap<usize, Arc<ThreadPool>>>> = OnceLock::new();

    let mut pools = POOLS
        .get_or_init(Default::default)
        .lock()
        .map_err(|_| PassportError::WorkerPool("pool cache lock poisoned".into()))?;
    if let Some(pool) = pools.get(&workers) {
        return Ok(Arc::clone(pool));
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("tgp-worker-{i}"))
        .build()
        .map_err(|e| PassportError::WorkerPool(e.to_string()))?;
    tracing::debug!(workers, "worker pool built");

    let pool = Arc::new(pool);
    pools.insert(workers, Arc::clone(&pool));
    Ok(pool)
}

fn reject_duplicates(elements: &[Element<'_>]) -> PassportResult<()> {
    let mut seen = std::collections::BTreeSet::new();
    for element in elements {
        let field_type = element.field_type();
        if !seen.insert(field_type) {
            return Err(PassportError::DuplicateFieldType(field_type));
        }
    }
    Ok(())
}

/// Decrypt a single validated element.
pub fn assemble_element(
    element: &Element<'_>,
    secure_data: &SecureData,
) -> PassportResult<DecryptedField> {
    let field_type = element.field_type();
    tracing::trace!(%field_type, "assembling element");

    let field = match *element {
        Element::PhoneNumber(value) => DecryptedField::PhoneNumber(value.to_string()),
        Element::Email(value) => DecryptedField::Email(value.to_string()),
        Element::PersonalDetails(data) => {
            DecryptedField::PersonalDetails(data_field(field_type, data, secure_data)?)
        }
        Element::Address(data) => {
            DecryptedField::Address(data_field(field_type, data, secure_data)?)
        }
        Element::Passport(doc) => {
            DecryptedField::Passport(id_document(field_type, doc, secure_data)?)
        }
        Element::InternalPassport(doc) => {
            DecryptedField::InternalPassport(id_document(field_type, doc, secure_data)?)
        }
        Element::DriverLicense(doc) => {
            DecryptedField::DriverLicense(id_document(field_type, doc, secure_data)?)
        }
        Element::IdentityCard(doc) => {
            DecryptedField::IdentityCard(id_document(field_type, doc, secure_data)?)
        }
        Element::UtilityBill(b) => DecryptedField::UtilityBill(bill(field_type, b, secure_data)?),
        Element::BankStatement(b) => {
            DecryptedField::BankStatement(bill(field_type, b, secure_data)?)
        }
        Element::RentalAgreement(b) => {
            DecryptedField::RentalAgreement(bill(field_type, b, secure_data)?)
        }
        Element::PassportRegistration(b) => {
            DecryptedField::PassportRegistration(bill(field_type, b, secure_data)?)
        }
        Element::TemporaryRegistration(b) => {
            DecryptedField::TemporaryRegistration(bill(field_type, b, secure_data)?)
        }
    };
    Ok(field)
}

fn secure_value(field_type: FieldType, secure_data: &SecureData) -> PassportResult<&SecureValue> {
    secure_data
        .get(field_type.as_str())
        .ok_or(PassportError::MissingCredentials {
            field_type,
            sub_field: None,
        })
}

fn data_field<T: DeserializeOwned>(
    field_type: FieldType,
    element: DataElement<'_>,
    secure_data: &SecureData,
) -> PassportResult<DataField<T>> {
    let value = secure_value(field_type, secure_data)?;
    let data = decrypt_json(field_type, element.data, value.data.as_ref())?;
    Ok(DataField { data })
}

fn id_document(
    field_type: FieldType,
    element: IdDocumentElement<'_>,
    secure_data: &SecureData,
) -> PassportResult<IdDocument> {
    let value = secure_value(field_type, secure_data)?;

    let data = element
        .data
        .map(|data| decrypt_json(field_type, data, value.data.as_ref()))
        .transpose()?;

    let front_side = merge_file(
        field_type,
        "front_side",
        element.front_side,
        value.front_side.as_ref(),
    )?;
    let reverse_side = merge_file(
        field_type,
        "reverse_side",
        element.reverse_side,
        value.reverse_side.as_ref(),
    )?;
    let selfie = merge_file(field_type, "selfie", element.selfie, value.selfie.as_ref())?;
    let translation = merge_files(
        field_type,
        "translation",
        element.translation,
        value.translation.as_deref(),
    )?;

    Ok(IdDocument {
        data,
        front_side,
        reverse_side,
        selfie,
        translation,
    })
}

fn bill(
    field_type: FieldType,
    element: BillElement<'_>,
    secure_data: &SecureData,
) -> PassportResult<BillLike> {
    let value = secure_value(field_type, secure_data)?;

    let files = merge_files(field_type, "files", element.files, value.files.as_deref())?;
    let translation = merge_files(
        field_type,
        "translation",
        element.translation,
        value.translation.as_deref(),
    )?;

    Ok(BillLike {
        files: files.unwrap_or_default(),
        translation,
    })
}

/// Decrypt an element's `data` and parse the plaintext JSON.
fn decrypt_json<T: DeserializeOwned>(
    field_type: FieldType,
    data: &str,
    credentials: Option<&DataCredentials>,
) -> PassportResult<T> {
    let credentials = credentials.ok_or(PassportError::MissingCredentials {
        field_type,
        sub_field: Some("data"),
    })?;

    let ciphertext = encoding::decode(data, || format!("{field_type}.data"))?;
    let secret = encoding::decode_secret(&credentials.secret, || {
        format!("secure_data.{field_type}.data.secret")
    })?;
    let hash = encoding::decode(&credentials.data_hash, || {
        format!("secure_data.{field_type}.data.data_hash")
    })?;

    let plaintext = zeroize::Zeroizing::new(tgp_crypto::decrypt_data(&ciphertext, &secret, &hash)?);
    serde_json::from_slice(&plaintext)
        .map_err(|e| PassportError::payload(format!("{field_type}.data"), &e))
}

fn merge_file(
    field_type: FieldType,
    sub_field: &'static str,
    file: Option<&PassportFile>,
    credentials: Option<&FileCredentials>,
) -> PassportResult<Option<FileWithCredentials>> {
    let Some(file) = file else {
        return Ok(None);
    };
    let credentials = credentials.ok_or(PassportError::MissingCredentials {
        field_type,
        sub_field: Some(sub_field),
    })?;
    Ok(Some(FileWithCredentials::new(file.clone(), credentials.clone())))
}

/// Zip a file list with its credential list by position.
fn merge_files(
    field_type: FieldType,
    sub_field: &'static str,
    files: Option<&[PassportFile]>,
    credentials: Option<&[FileCredentials]>,
) -> PassportResult<Option<Vec<FileWithCredentials>>> {
    let Some(files) = files else {
        return Ok(None);
    };
    let credentials: &[FileCredentials] = match credentials {
        Some(credentials) => credentials,
        None if files.is_empty() => &[],
        None => {
            return Err(PassportError::MissingCredentials {
                field_type,
                sub_field: Some(sub_field),
            })
        }
    };
    if files.len() != credentials.len() {
        return Err(PassportError::ArityMismatch {
            field_type,
            sub_field,
            files: files.len(),
            credentials: credentials.len(),
        });
    }

    Ok(Some(
        files
            .iter()
            .zip(credentials)
            .map(|(file, creds)| FileWithCredentials::new(file.clone(), creds.clone()))
            .collect(),
    ))
}
