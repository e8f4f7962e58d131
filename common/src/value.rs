//! Typed values crossing the emulator boundary.
//!
//! Script and transaction arguments are submitted as individually encoded
//! JSON blobs, and script return values come back as a [`Value`]. The
//! encoding is tagged (`{"type":"UInt64","value":"42"}`); integers are
//! carried as strings so that 64-bit values survive JSON number handling.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::Address;

#[derive(Debug, Error)]
pub enum ValueError {
    #[error("unexpected value type: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("value encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("value decoding failed: {0}")]
    Decode(#[source] serde_json::Error),
}

/// A typed value in the network's wire encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    UInt8(#[serde(with = "string_int")] u8),
    UInt64(#[serde(with = "string_int")] u64),
    Bool(bool),
    String(String),
    Address(Address),
    Array(Vec<Value>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::UInt8(_) => "UInt8",
            Value::UInt64(_) => "UInt64",
            Value::Bool(_) => "Bool",
            Value::String(_) => "String",
            Value::Address(_) => "Address",
            Value::Array(_) => "Array",
        }
    }

    pub fn as_uint8(&self) -> Result<u8, ValueError> {
        match self {
            Value::UInt8(v) => Ok(*v),
            other => Err(type_mismatch("UInt8", other)),
        }
    }

    pub fn as_uint64(&self) -> Result<u64, ValueError> {
        match self {
            Value::UInt64(v) => Ok(*v),
            other => Err(type_mismatch("UInt64", other)),
        }
    }

    pub fn as_bool(&self) -> Result<bool, ValueError> {
        match self {
            Value::Bool(v) => Ok(*v),
            other => Err(type_mismatch("Bool", other)),
        }
    }

    pub fn as_address(&self) -> Result<Address, ValueError> {
        match self {
            Value::Address(v) => Ok(*v),
            other => Err(type_mismatch("Address", other)),
        }
    }

    pub fn as_array(&self) -> Result<&[Value], ValueError> {
        match self {
            Value::Array(v) => Ok(v),
            other => Err(type_mismatch("Array", other)),
        }
    }

    /// Decodes an `Array` of `UInt8` into raw bytes.
    pub fn as_byte_array(&self) -> Result<Vec<u8>, ValueError> {
        self.as_array()?.iter().map(Value::as_uint8).collect()
    }

    /// Decodes an `Array` of `UInt64` into a vector.
    pub fn as_uint64_array(&self) -> Result<Vec<u64>, ValueError> {
        self.as_array()?.iter().map(Value::as_uint64).collect()
    }

    /// Serializes into the wire encoding.
    pub fn encode(&self) -> Result<Vec<u8>, ValueError> {
        serde_json::to_vec(self).map_err(ValueError::Encode)
    }

    /// Deserializes from the wire encoding.
    pub fn decode(bytes: &[u8]) -> Result<Value, ValueError> {
        serde_json::from_slice(bytes).map_err(ValueError::Decode)
    }
}

/// Wraps raw bytes as an `Array` of `UInt8`, the form seed arguments are
/// submitted in.
pub fn bytes_to_array(bytes: &[u8]) -> Value {
    Value::Array(bytes.iter().map(|b| Value::UInt8(*b)).collect())
}

/// Wraps a slice of values as an `Array` of `UInt64`.
pub fn uint64s_to_array(values: &[u64]) -> Value {
    Value::Array(values.iter().map(|v| Value::UInt64(*v)).collect())
}

fn type_mismatch(expected: &'static str, actual: &Value) -> ValueError {
    ValueError::TypeMismatch {
        expected,
        actual: actual.type_name(),
    }
}

mod string_int {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::{fmt::Display, str::FromStr};

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
