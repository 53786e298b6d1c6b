//! JSON decoder with two interchangeable backends.
//!
//! `serde_json` is the default; `serde-saphyr` parses the same documents as
//! YAML flow syntax. Both produce a `serde_json::Value` or any
//! `DeserializeOwned` type, so assertions hold regardless of backend.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::JsonDecoder;
use crate::error::VerifyError;
use crate::format::FormatKind;

/// Decode a JSON document into an untyped object graph.
///
/// # Errors
///
/// Returns a decode error if the selected backend rejects the document.
pub fn decode_json(
    bytes: &[u8],
    decoder: JsonDecoder,
    resource: &str,
) -> Result<Value, VerifyError> {
    decode_json_as(bytes, decoder, resource)
}

/// Decode a JSON document into a caller-provided type.
///
/// # Errors
///
/// Returns a decode error if the bytes are not UTF-8 (saphyr backend) or the
/// document does not match `T`.
pub fn decode_json_as<T: DeserializeOwned>(
    bytes: &[u8],
    decoder: JsonDecoder,
    resource: &str,
) -> Result<T, VerifyError> {
    match decoder {
        JsonDecoder::SerdeJson => serde_json::from_slice(bytes)
            .map_err(|e| VerifyError::decode(resource, FormatKind::Json, e)),
        JsonDecoder::Saphyr => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| VerifyError::decode(resource, FormatKind::Json, e))?;
            serde_saphyr::from_str(text)
                .map_err(|e| VerifyError::decode(resource, FormatKind::Json, e))
        }
    }
}

/// Look up a value by dotted path (`address.streetAddress`, `phoneNumbers.0.type`).
///
/// Numeric segments index into arrays. An empty path returns the root.
#[must_use]
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }
    let pointer: String = path
        .split('.')
        .map(|segment| format!("/{}", segment.replace('~', "~0").replace('/', "~1")))
        .collect();
    value.pointer(&pointer)
}

/// Render a value for substring checks: strings verbatim, everything else as JSON.
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Whether any string value in the tree contains `needle`.
pub(crate) fn any_string_contains(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.contains(needle),
        Value::Array(items) => items.iter().any(|v| any_string_contains(v, needle)),
        Value::Object(map) => map.values().any(|v| any_string_contains(v, needle)),
        _ => false,
    }
}
