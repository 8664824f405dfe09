use std::borrow::Cow;

use serde_json::Value;

use crate::error::CoerceError;

/// Converts a scalar to `f64` through its textual form.
///
/// Strings are parsed from their contents, numbers from their JSON text.
/// Every other value has no numeric text and fails.
pub fn coerce_number(value: &Value) -> Result<f64, CoerceError> {
    let text: Cow<'_, str> = match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed("<nil>"),
        other => Cow::Owned(other.to_string()),
    };
    text.parse::<f64>().map_err(|source| CoerceError {
        text: text.into_owned(),
        source,
    })
}
