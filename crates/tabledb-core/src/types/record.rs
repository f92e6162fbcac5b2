//! Record field reflection and payload serialization.
//!
//! Records are opaque caller-defined structs. The indexing layer reads fields
//! out of them by name, which this module implements by serializing the
//! record through `serde_json` and holding on to the resulting field map.
//! The same JSON encoding doubles as the payload format stored under the
//! primary index, so field names and values survive a round-trip unchanged.
//!
//! Field lookup is case-insensitive: an index declared on `"ID"` finds a
//! field serialized as `"id"`. A missing field yields [`Value::Null`], which
//! encodes to the empty key component.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::Value;

/// The named scalar fields of one record.
///
/// Built either from a live record ([`Fields::from_record`]) or from a
/// stored payload ([`Fields::from_payload`]), so the index-maintenance path
/// can diff the old and new shape of a record without knowing its type.
#[derive(Debug, Clone)]
pub struct Fields(serde_json::Map<String, serde_json::Value>);

impl Fields {
    /// Reflect the fields out of a record.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Serialization`] if the record does not serialize
    /// to a JSON object (records must be structs or maps).
    pub fn from_record<R: Serialize>(record: &R) -> Result<Self, CoreError> {
        let value = serde_json::to_value(record)
            .map_err(|e| CoreError::Serialization(e.to_string()))?;
        Self::from_json(value)
    }

    /// Reflect the fields out of a stored payload.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Serialization`] if the payload is not a JSON
    /// object.
    pub fn from_payload(bytes: &[u8]) -> Result<Self, CoreError> {
        let value: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|e| CoreError::Serialization(e.to_string()))?;
        Self::from_json(value)
    }

    fn from_json(value: serde_json::Value) -> Result<Self, CoreError> {
        match value {
            serde_json::Value::Object(map) => Ok(Self(map)),
            other => Err(CoreError::Serialization(format!(
                "expected a struct or map record, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Look up a field by name, case-insensitively.
    ///
    /// An exact match wins over a case-insensitive one. A missing field
    /// yields [`Value::Null`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnsupportedField`] if the field exists but holds
    /// a value with no total ordering (an array or nested object), or an
    /// integer outside the `i64` range.
    pub fn value(&self, field: &str) -> Result<Value, CoreError> {
        let found = self.0.get(field).or_else(|| {
            self.0
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(field))
                .map(|(_, value)| value)
        });
        match found {
            None => Ok(Value::Null),
            Some(value) => scalar_from_json(field, value),
        }
    }
}

/// Serialize a record into its primary-index payload.
///
/// # Errors
///
/// Returns [`CoreError::Serialization`] if the record cannot be serialized.
pub fn to_payload<R: Serialize>(record: &R) -> Result<Vec<u8>, CoreError> {
    serde_json::to_vec(record).map_err(|e| CoreError::Serialization(e.to_string()))
}

/// Decode a primary-index payload back into a caller type.
///
/// # Errors
///
/// Returns [`CoreError::Serialization`] if the payload does not match the
/// target type.
pub fn from_payload<R: DeserializeOwned>(bytes: &[u8]) -> Result<R, CoreError> {
    serde_json::from_slice(bytes).map_err(|e| CoreError::Serialization(e.to_string()))
}

/// Convert a JSON field value to an indexable scalar.
fn scalar_from_json(field: &str, value: &serde_json::Value) -> Result<Value, CoreError> {
    match value {
        serde_json::Value::Null => Ok(Value::Null),
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float(f))
            } else {
                Err(CoreError::UnsupportedField {
                    field: field.to_owned(),
                    kind: "integer outside i64 range".to_owned(),
                })
            }
        }
        serde_json::Value::String(s) => Ok(Value::String(s.clone())),
        serde_json::Value::Array(_) => Err(CoreError::UnsupportedField {
            field: field.to_owned(),
            kind: "array".to_owned(),
        }),
        serde_json::Value::Object(_) => Err(CoreError::UnsupportedField {
            field: field.to_owned(),
            kind: "object".to_owned(),
        }),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a bool",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
