use thiserror::Error;

use tgp_core::types::{FieldType, UnknownFieldType};
use tgp_crypto::CryptoError;

pub type PassportResult<T> = Result<T, PassportError>;

/// Every failure aborts the whole call; nothing is retried.
///
/// Messages name element types, sub-fields and positions only, never
/// payload bytes or key material.
#[derive(Debug, Error)]
pub enum PassportError {
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("{context}: payload decode failed: {reason}")]
    PayloadDecode { context: String, reason: String },

    #[error("{field_type}: {} missing", missing_what(.sub_field))]
    MissingCredentials {
        field_type: FieldType,
        sub_field: Option<&'static str>,
    },

    #[error("{field_type}.{sub_field}: {files} files but {credentials} credentials")]
    ArityMismatch {
        field_type: FieldType,
        sub_field: &'static str,
        files: usize,
        credentials: usize,
    },

    #[error("unknown element type '{0}'")]
    UnknownFieldType(String),

    #[error("element type '{0}' appears more than once")]
    DuplicateFieldType(FieldType),

    #[error("{field_type}: unexpected sub-field '{sub_field}'")]
    UnexpectedSubField {
        field_type: FieldType,
        sub_field: &'static str,
    },

    #[error("{field_type}: required sub-field '{sub_field}' is absent")]
    MissingSubField {
        field_type: FieldType,
        sub_field: &'static str,
    },

    #[error("invalid base64 in {context}")]
    InvalidBase64 { context: String },

    #[error("worker pool: {0}")]
    WorkerPool(String),
}

impl From<UnknownFieldType> for PassportError {
    fn from(e: UnknownFieldType) -> Self {
        PassportError::UnknownFieldType(e.0)
    }
}

impl PassportError {
    /// Build a `PayloadDecode` from a JSON error without echoing its input.
    ///
    /// serde_json messages can quote offending values, so only the error
    /// category and position are kept.
    pub(crate) fn payload(context: impl Into<String>, err: &serde_json::Error) -> Self {
        PassportError::PayloadDecode {
            context: context.into(),
            reason: format!(
                "{:?} error at line {} column {}",
                err.classify(),
                err.line(),
                err.column()
            ),
        }
    }
}

fn missing_what(sub_field: &Option<&'static str>) -> String {
    match sub_field {
        Some(sub) => format!("{sub} credential"),
        None => "secure_data entry".to_string(),
    }
}
