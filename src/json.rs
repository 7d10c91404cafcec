// src/json.rs
// JSON text for literal request and expected response bodies

use serde::Serialize;
use std::fmt;

#[derive(Debug)]
pub struct JsonEncodeError(serde_json::Error);

impl fmt::Display for JsonEncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to encode test fixture as JSON: {}", self.0)
    }
}

impl std::error::Error for JsonEncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<serde_json::Error> for JsonEncodeError {
    fn from(err: serde_json::Error) -> Self {
        JsonEncodeError(err)
    }
}

/// Compact JSON text of `value`.
pub fn try_json_encode<T: Serialize + ?Sized>(value: &T) -> Result<String, JsonEncodeError> {
    Ok(serde_json::to_string(value)?)
}

/// Compact JSON text of `value`, panicking if it cannot be encoded.
///
/// A value that does not encode is a broken fixture, so the calling test
/// (or, inside a generator, the current case) is stopped.
pub fn json_encode<T: Serialize + ?Sized>(value: &T) -> String {
    match try_json_encode(value) {
        Ok(text) => text,
        Err(err) => panic!("{}", err),
    }
}
