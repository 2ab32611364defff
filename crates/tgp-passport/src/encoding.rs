//! Base64 boundary between wire strings and the byte-level crypto core

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use zeroize::Zeroizing;

use crate::error::{PassportError, PassportResult};

/// Decode a Base64 wire field. `context` names the field in the error.
pub(crate) fn decode(value: &str, context: impl FnOnce() -> String) -> PassportResult<Vec<u8>> {
    STANDARD
        .decode(value)
        .map_err(|_| PassportError::InvalidBase64 { context: context() })
}

/// Decode a Base64 secret into a buffer that is wiped on drop.
pub(crate) fn decode_secret(
    value: &str,
    context: impl FnOnce() -> String,
) -> PassportResult<Zeroizing<Vec<u8>>> {
    decode(value, context).map(Zeroizing::new)
}
