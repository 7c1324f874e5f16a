//! The decoded value tree.
//!
//! `Value` mirrors JSON but keeps integers and floats apart: integers are
//! arbitrary precision (`BigInt`) so that large literals survive exactly, and
//! floats stay floats even when their value happens to be whole. Objects are
//! `Vec<(String, Value)>` in insertion order.

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(BigInt),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    /// Key-value pairs in insertion order.
    Object(Vec<(String, Value)>),
}

impl Value {
    /// Short lowercase name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Look up `key` in an object. Returns `None` for non-objects.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Value::Integer(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(n) => n.to_f64(),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Serialize this value to script-safe text. See [`crate::encoder`].
    pub fn to_script(&self) -> Result<String> {
        crate::encoder::serialize_value(self)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n.into())
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

/// Conversion from `serde_json`. Numbers that fit `i64`/`u64` become
/// integers; everything else numeric becomes a float.
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i.into())
                } else if let Some(u) = n.as_u64() {
                    Value::Integer(u.into())
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

/// Serde support so a decoded tree can be handed to any serde format.
///
/// Integers outside the 128-bit range cannot be represented by serde's data
/// model and fail with a custom error.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(n) => {
                if let Some(i) = n.to_i64() {
                    serializer.serialize_i64(i)
                } else if let Some(u) = n.to_u64() {
                    serializer.serialize_u64(u)
                } else if let Some(i) = n.to_i128() {
                    serializer.serialize_i128(i)
                } else if let Some(u) = n.to_u128() {
                    serializer.serialize_u128(u)
                } else {
                    Err(S::Error::custom(format!("integer {n} exceeds 128 bits")))
                }
            }
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_finds_object_member() {
        let v = Value::Object(vec![
            ("a".to_string(), Value::from(1)),
            ("b".to_string(), Value::from("x")),
        ]);
        assert_eq!(v.get("b"), Some(&Value::from("x")));
        assert_eq!(v.get("c"), None);
        assert_eq!(Value::Null.get("a"), None);
    }

    #[test]
    fn serde_json_interop_keeps_integer_float_split() {
        let v = Value::from(json!({"i": 3, "f": 3.5, "u": u64::MAX, "l": [null, true]}));
        assert_eq!(v.get("i"), Some(&Value::from(3)));
        assert_eq!(v.get("f"), Some(&Value::Float(3.5)));
        assert_eq!(v.get("u"), Some(&Value::Integer(BigInt::from(u64::MAX))));

        let back = serde_json::to_value(&v).unwrap();
        assert_eq!(back, json!({"i": 3, "f": 3.5, "u": u64::MAX, "l": [null, true]}));
    }

    #[test]
    fn serialize_rejects_integers_beyond_128_bits() {
        let huge: BigInt = BigInt::from(u128::MAX) * 10;
        assert!(serde_json::to_string(&Value::Integer(huge)).is_err());
    }

    #[test]
    fn kind_names() {
        assert_eq!(Value::Null.kind(), "null");
        assert_eq!(Value::Array(vec![]).kind(), "array");
        assert_eq!(Value::Object(vec![]).kind(), "object");
    }
}
