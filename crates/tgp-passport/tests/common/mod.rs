//! Envelope fixtures: a shared test keypair and a builder that seals
//! elements the way the platform does.

#![allow(dead_code)]

use std::sync::OnceLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rsa::pkcs1::{EncodeRsaPrivateKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde_json::Value;

use tgp_core::types::{
    Credentials, DataCredentials, EncryptedCredentials, EncryptedPassportElement, FieldType,
    FileCredentials, PassportData, PassportFile, SecureData, SecureValue,
};

pub struct Keypair {
    pub public: RsaPublicKey,
    pub pem: String,
}

/// 1024-bit keys keep the suite fast; the pipeline does not depend on size.
pub fn keypair() -> &'static Keypair {
    static KEYPAIR: OnceLock<Keypair> = OnceLock::new();
    KEYPAIR.get_or_init(|| {
        let key = RsaPrivateKey::new(&mut rand::thread_rng(), 1024).expect("generate key");
        Keypair {
            public: RsaPublicKey::from(&key),
            pem: key
                .to_pkcs1_pem(LineEnding::LF)
                .expect("encode key")
                .to_string(),
        }
    })
}

pub fn pem() -> &'static [u8] {
    keypair().pem.as_bytes()
}

pub fn file(id: &str) -> PassportFile {
    PassportFile {
        file_id: id.to_string(),
        file_unique_id: format!("uniq-{id}"),
        file_size: 48_213,
        file_date: 1_700_000_000,
    }
}

pub fn file_credentials(tag: &str) -> FileCredentials {
    FileCredentials {
        file_hash: STANDARD.encode(format!("hash-of-{tag}")),
        secret: STANDARD.encode(format!("secret-of-{tag}")),
    }
}

/// Seal `value` as JSON; returns the Base64 ciphertext and its credentials.
pub fn seal_json(value: &Value) -> (String, DataCredentials) {
    let secret = tgp_crypto::generate_secret();
    let plaintext = serde_json::to_vec(value).expect("serialize");
    let sealed = tgp_crypto::encrypt_data(&plaintext, &secret);
    (
        STANDARD.encode(&sealed.data),
        DataCredentials {
            data_hash: STANDARD.encode(sealed.hash),
            secret: STANDARD.encode(&*secret),
        },
    )
}

/// Builds a [`PassportData`] envelope addressed to [`keypair`].
#[derive(Default)]
pub struct EnvelopeBuilder {
    elements: Vec<EncryptedPassportElement>,
    secure_data: SecureData,
    nonce: String,
}

impl EnvelopeBuilder {
    pub fn new(nonce: &str) -> Self {
        Self {
            nonce: nonce.to_string(),
            ..Default::default()
        }
    }

    pub fn element(mut self, element: EncryptedPassportElement) -> Self {
        self.elements.push(element);
        self
    }

    /// Register credentials under a raw type name, known or not.
    pub fn secure_value_named(mut self, name: &str, value: SecureValue) -> Self {
        self.secure_data.insert(name.to_string(), value);
        self
    }

    pub fn secure_value(mut self, field_type: FieldType, value: SecureValue) -> Self {
        self.secure_data.insert(field_type.as_str().to_string(), value);
        self
    }

    /// Add an element whose `data` is sealed from `payload`, with the data
    /// credentials registered under its type.
    pub fn data_element(
        mut self,
        field_type: FieldType,
        payload: Value,
        fill: impl FnOnce(&mut EncryptedPassportElement, &mut SecureValue),
    ) -> Self {
        let (data, credentials) = seal_json(&payload);
        let mut element = element(field_type);
        element.data = Some(data);
        let mut value = SecureValue {
            data: Some(credentials),
            ..Default::default()
        };
        fill(&mut element, &mut value);
        self.elements.push(element);
        self.secure_data.insert(field_type.as_str().to_string(), value);
        self
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            secure_data: self.secure_data.clone(),
            nonce: self.nonce.clone(),
        }
    }

    pub fn build(self) -> PassportData {
        let credentials = seal_credentials(&serde_json::to_vec(&self.credentials()).expect("json"));
        PassportData {
            data: self.elements,
            credentials,
        }
    }
}

pub fn element(field_type: FieldType) -> EncryptedPassportElement {
    EncryptedPassportElement {
        element_type: field_type.as_str().to_string(),
        hash: STANDARD.encode(format!("element-hash-{field_type}")),
        ..Default::default()
    }
}

/// Seal an arbitrary credentials plaintext for [`keypair`].
pub fn seal_credentials(plaintext: &[u8]) -> EncryptedCredentials {
    let secret = tgp_crypto::generate_secret();
    let sealed = tgp_crypto::encrypt_data(plaintext, &secret);
    let wrapped = tgp_crypto::wrap_secret(&keypair().public, &secret).expect("wrap");
    EncryptedCredentials {
        data: STANDARD.encode(&sealed.data),
        hash: STANDARD.encode(sealed.hash),
        secret: STANDARD.encode(wrapped),
    }
}
