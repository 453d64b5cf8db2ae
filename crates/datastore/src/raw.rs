use std::collections::BTreeSet;

use datastore_state::RawValue;
use serde_json::Value;

use crate::DataStoreError;

/// Maps a dynamically typed JSON value onto the primitive kind a backend can store.
///
/// Integers become [`RawValue::Int`] when they fit in 32 bits and [`RawValue::Long`] otherwise.
/// Other numbers become [`RawValue::Float`]. Arrays of strings become [`RawValue::StringSet`],
/// collapsing duplicates. Anything else has no primitive representation and is rejected with
/// [`DataStoreError::UnsupportedValue`].
pub fn raw_from_json(value: &Value) -> Result<RawValue, DataStoreError> {
    match value {
        Value::Bool(b) => Ok(RawValue::Bool(*b)),
        Value::String(s) => Ok(RawValue::String(s.clone())),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(match i32::try_from(i) {
                    Ok(i) => RawValue::Int(i),
                    Err(_) => RawValue::Long(i),
                })
            } else if n.is_u64() {
                Err(DataStoreError::UnsupportedValue {
                    kind: "integer out of 64-bit range",
                })
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.abs() <= f64::from(f32::MAX) => {
                        Ok(RawValue::Float(f as f32))
                    }
                    _ => Err(DataStoreError::UnsupportedValue {
                        kind: "float out of 32-bit range",
                    }),
                }
            }
        }
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                _ => Err(DataStoreError::UnsupportedValue {
                    kind: "array with non-string members",
                }),
            })
            .collect::<Result<BTreeSet<String>, _>>()
            .map(RawValue::StringSet),
        Value::Null => Err(DataStoreError::UnsupportedValue { kind: "null" }),
        Value::Object(_) => Err(DataStoreError::UnsupportedValue { kind: "object" }),
    }
}
