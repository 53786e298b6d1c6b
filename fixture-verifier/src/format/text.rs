//! Plain UTF-8 text decoder.

use crate::error::VerifyError;
use crate::format::FormatKind;

/// Decode bytes as UTF-8 text, dropping a leading byte-order mark.
///
/// # Errors
///
/// Returns a decode error if the bytes are not valid UTF-8.
pub fn decode_text(bytes: &[u8], resource: &str) -> Result<String, VerifyError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| VerifyError::decode(resource, FormatKind::Text, e))
}
