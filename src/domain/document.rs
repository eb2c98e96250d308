//! Nested key/value document assembled by the builder and consumed by the renderer.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// A value stored under a document key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Bool(bool),
    Integer(i64),
    Array(Vec<Value>),
    Dict(Document),
    /// Placeholder for an index that has not been configured yet.
    Absent,
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Document> {
        match self {
            Value::Dict(doc) => Some(doc),
            _ => None,
        }
    }

    /// Short type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Array(_) => "array",
            Value::Dict(_) => "dictionary",
            Value::Absent => "absent",
        }
    }

    /// Type name plus a compact rendering of the value, e.g. `string "yes"`.
    pub fn describe(&self) -> String {
        match self {
            Value::String(s) => format!("string {:?}", s),
            Value::Bool(b) => format!("boolean {}", b),
            Value::Integer(i) => format!("integer {}", i),
            Value::Array(items) => format!("array of {} element(s)", items.len()),
            Value::Dict(doc) => format!("dictionary of {} key(s)", doc.len()),
            Value::Absent => "absent".to_string(),
        }
    }

    fn fill_placeholders(&mut self) {
        match self {
            Value::Array(items) => {
                for item in items {
                    if matches!(item, Value::Absent) {
                        *item = Value::Dict(Document::new());
                    } else {
                        item.fill_placeholders();
                    }
                }
            }
            Value::Dict(doc) => doc.fill_placeholders(),
            _ => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(entries: BTreeMap<K, V>) -> Self {
        Value::Dict(entries.into_iter().collect())
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Dict(doc)
    }
}

/// Mapping from plist key to value. Keys iterate in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Document(BTreeMap<String, Value>);

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Store a value, returning the one it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Replace unconfigured list slots with empty dictionaries, the form they
    /// take once written and read back.
    pub fn fill_placeholders(&mut self) {
        for value in self.0.values_mut() {
            value.fill_placeholders();
        }
    }

    /// Copy every entry of `other` over this document, last write wins per key.
    pub fn overlay(&mut self, other: &Document) {
        for (key, value) in other.iter() {
            self.0.insert(key.to_string(), value.clone());
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
