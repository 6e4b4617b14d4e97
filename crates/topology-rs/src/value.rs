// crates/topology-rs/src/value.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Represents any value that can be carried as an operation parameter or a
/// resource attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModelValue {
    Boolean(bool),
    Int(i32),
    Long(i64),
    String(String),
    Bytes(Vec<u8>),        // Content hashes
    List(Vec<ModelValue>), // Ordered, e.g. includes
    Object(BTreeMap<String, ModelValue>),
}

impl ModelValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ModelValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ModelValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as an `i32`, narrowing a `Long` when it fits.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            ModelValue::Int(v) => Some(*v),
            ModelValue::Long(v) => i32::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            ModelValue::Int(v) => Some(i64::from(*v)),
            ModelValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ModelValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ModelValue]> {
        match self {
            ModelValue::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, ModelValue>> {
        match self {
            ModelValue::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Renders scalar values the way they appear in an XML attribute.
    /// Returns `None` for bytes, lists and objects.
    pub fn to_attribute_string(&self) -> Option<String> {
        match self {
            ModelValue::Boolean(b) => Some(b.to_string()),
            ModelValue::Int(v) => Some(v.to_string()),
            ModelValue::Long(v) => Some(v.to_string()),
            ModelValue::String(s) => Some(s.clone()),
            ModelValue::Bytes(_) | ModelValue::List(_) | ModelValue::Object(_) => None,
        }
    }
}

impl From<&str> for ModelValue {
    fn from(s: &str) -> Self {
        ModelValue::String(s.to_string())
    }
}

impl From<String> for ModelValue {
    fn from(s: String) -> Self {
        ModelValue::String(s)
    }
}

impl From<bool> for ModelValue {
    fn from(b: bool) -> Self {
        ModelValue::Boolean(b)
    }
}

impl From<i32> for ModelValue {
    fn from(v: i32) -> Self {
        ModelValue::Int(v)
    }
}

impl From<i64> for ModelValue {
    fn from(v: i64) -> Self {
        ModelValue::Long(v)
    }
}

impl From<Vec<u8>> for ModelValue {
    fn from(b: Vec<u8>) -> Self {
        ModelValue::Bytes(b)
    }
}

impl From<Vec<ModelValue>> for ModelValue {
    fn from(l: Vec<ModelValue>) -> Self {
        ModelValue::List(l)
    }
}

impl From<BTreeMap<String, ModelValue>> for ModelValue {
    fn from(o: BTreeMap<String, ModelValue>) -> Self {
        ModelValue::Object(o)
    }
}
