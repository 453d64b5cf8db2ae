use std::{
    collections::{BTreeSet, HashSet},
    fmt,
};

use serde::{Deserialize, Serialize};

/// A primitive value stored directly by a backend, without JSON encoding.
///
/// Every backend can hold exactly these kinds. Structured values are stored as
/// [`RawValue::String`] containing their JSON representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RawValue {
    /// A boolean.
    Bool(bool),
    /// A 32-bit signed integer.
    Int(i32),
    /// A UTF-8 string.
    String(String),
    /// A 32-bit float. NaN and the infinities are stored as the strings `"NaN"`, `"Infinity"`
    /// and `"-Infinity"`, since JSON numbers cannot hold them.
    Float(#[serde(with = "lossless_f32")] f32),
    /// A 64-bit signed integer.
    Long(i64),
    /// An unordered set of strings.
    StringSet(BTreeSet<String>),
}

/// The discriminant of a [`RawValue`].
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawKind {
    Bool,
    Int,
    String,
    Float,
    Long,
    StringSet,
}

impl RawValue {
    /// Returns the kind of this value.
    pub fn kind(&self) -> RawKind {
        match self {
            RawValue::Bool(_) => RawKind::Bool,
            RawValue::Int(_) => RawKind::Int,
            RawValue::String(_) => RawKind::String,
            RawValue::Float(_) => RawKind::Float,
            RawValue::Long(_) => RawKind::Long,
            RawValue::StringSet(_) => RawKind::StringSet,
        }
    }

    /// Consumes the value, returning the contained string if this is a [`RawValue::String`].
    pub fn into_string(self) -> Option<String> {
        match self {
            RawValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for RawKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RawKind::Bool => "bool",
            RawKind::Int => "int",
            RawKind::String => "string",
            RawKind::Float => "float",
            RawKind::Long => "long",
            RawKind::StringSet => "string set",
        };
        f.write_str(name)
    }
}

mod lossless_f32 {
    use std::fmt;

    use serde::{de, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_infinite() {
            serializer.serialize_str(if value.is_sign_positive() {
                "Infinity"
            } else {
                "-Infinity"
            })
        } else {
            serializer.serialize_f32(*value)
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
        deserializer.deserialize_any(FloatVisitor)
    }

    struct FloatVisitor;

    impl de::Visitor<'_> for FloatVisitor {
        type Value = f32;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str(r#"a number, "NaN", "Infinity" or "-Infinity""#)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f32, E> {
            Ok(v as f32)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f32, E> {
            Ok(v as f32)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f32, E> {
            Ok(v as f32)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f32, E> {
            match v {
                "NaN" => Ok(f32::NAN),
                "Infinity" => Ok(f32::INFINITY),
                "-Infinity" => Ok(f32::NEG_INFINITY),
                _ => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
            }
        }
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        RawValue::Int(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Long(value)
    }
}

impl From<f32> for RawValue {
    fn from(value: f32) -> Self {
        RawValue::Float(value)
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::String(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::String(value.to_owned())
    }
}

impl From<BTreeSet<String>> for RawValue {
    fn from(value: BTreeSet<String>) -> Self {
        RawValue::StringSet(value)
    }
}

impl From<HashSet<String>> for RawValue {
    fn from(value: HashSet<String>) -> Self {
        RawValue::StringSet(value.into_iter().collect())
    }
}
