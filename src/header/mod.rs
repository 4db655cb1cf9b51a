//! Header sidecar records.
//!
//! A header is a flat attribute map persisted next to a blob's data container
//! as a JSON object. Keys are case-insensitive: every key is lower-cased on
//! the way in, so callers must not rely on the original casing surviving.
//! Values are JSON scalars (string, number, bool or null).
//!
//! Additional header shapes can be introduced by implementing [`HeaderFormat`];
//! the store only talks to the trait plus the (de)serialization of
//! [`SimpleHeader`].

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeaderError {
    #[error("Header record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Header record must be a JSON object")]
    NotAnObject,
    #[error("Header attribute '{0}' is not a scalar value")]
    NonScalar(String),
}

/// Attribute map keyed by normalized (lower-case) name.
pub type Attributes = BTreeMap<String, Value>;

/// The capability set every header variant provides.
pub trait HeaderFormat {
    fn attributes(&self) -> &Attributes;
    /// Replace the whole attribute set. Keys are normalized.
    fn set_attributes(&mut self, attributes: Attributes);
    fn get(&self, key: &str) -> Option<&Value>;
    fn set(&mut self, key: &str, value: Value);
}

fn normalize(key: &str) -> String {
    key.to_lowercase()
}

/// Ordered attribute map; serializes with keys in alphabetical order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimpleHeader {
    attributes: Attributes,
}

impl SimpleHeader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a header from `(key, value)` pairs, normalizing each key.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut header = Self::new();
        for (k, v) in pairs {
            header.set(k.as_ref(), v.into());
        }
        header
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Overlay `other` onto `self`; keys present in both take `other`'s value.
    pub fn merge(&mut self, other: &dyn HeaderFormat) {
        for (k, v) in other.attributes() {
            self.set(k, v.clone());
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, HeaderError> {
        Ok(serde_json::to_vec(&self.attributes)?)
    }

    /// Parse a persisted record. Only a JSON object of scalars is accepted.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HeaderError> {
        let value: Value = serde_json::from_slice(bytes)?;
        let object: Map<String, Value> = match value {
            Value::Object(o) => o,
            _ => return Err(HeaderError::NotAnObject),
        };
        let mut header = Self::new();
        for (k, v) in object {
            if v.is_array() || v.is_object() {
                return Err(HeaderError::NonScalar(k));
            }
            header.set(&k, v);
        }
        Ok(header)
    }
}

impl HeaderFormat for SimpleHeader {
    fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn set_attributes(&mut self, attributes: Attributes) {
        self.attributes = attributes
            .into_iter()
            .map(|(k, v)| (normalize(&k), v))
            .collect();
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(&normalize(key))
    }

    fn set(&mut self, key: &str, value: Value) {
        self.attributes.insert(normalize(key), value);
    }
}
