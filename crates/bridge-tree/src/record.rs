//! Command records and decision-field lookup
//!
//! A [`Record`] is the flat JSON object handed to the dispatcher. Decision
//! nodes never read a record directly; they go through the [`Fields`] trait so
//! richer evaluation contexts can wrap a record and still be routed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Read access to the top-level fields of a command
///
/// Lookups match the field name exactly first and fall back to a
/// case-insensitive scan. Nested objects are never searched.
pub trait Fields {
    /// Get the value stored under `name`, if any
    fn field(&self, name: &str) -> Option<&Value>;

    /// Whether `name` exists and holds a non-null value
    #[inline]
    fn is_present(&self, name: &str) -> bool {
        self.field(name).is_some_and(|v| !v.is_null())
    }
}

impl Fields for Map<String, Value> {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name).or_else(|| {
            self.iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v)
        })
    }
}

impl Fields for Value {
    fn field(&self, name: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.field(name))
    }
}

/// Ordered mapping from field names to JSON values
///
/// The record is passed to handlers in full and unmodified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create an empty record
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Read a string field
    #[must_use]
    pub fn str(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    /// Read an integer field, accepting integral floats and numeric strings
    #[must_use]
    pub fn int(&self, name: &str) -> Option<i64> {
        match self.field(name)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Read a boolean field
    #[must_use]
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.field(name).and_then(Value::as_bool)
    }

    /// Borrow the underlying map
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume into the underlying map
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl Fields for Record {
    #[inline]
    fn field(&self, name: &str) -> Option<&Value> {
        self.0.field(name)
    }
}

impl Deref for Record {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Record {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Record {
    type Error = RecordError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(RecordError::NotAnObject(json_kind(&other))),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(&self.0) {
            Ok(s) => f.write_str(&s),
            Err(_) => f.write_str("{}"),
        }
    }
}

/// Record conversion errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// The JSON value was not an object
    #[error("command record must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Normalized edge key used for lookups in a key decision
///
/// Text is lower-cased so string fields match case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EdgeKey {
    /// Lower-cased text
    Text(String),
    /// Integer literal
    Integer(i64),
    /// Boolean literal
    Bool(bool),
}

impl EdgeKey {
    /// Derive the lookup key for a record value
    ///
    /// Returns `None` for null, arrays and objects: those go straight to the
    /// default arm.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Text(s.to_lowercase())),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self::Integer(i))
                } else {
                    match n.as_f64() {
                        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
                            Some(Self::Integer(f as i64))
                        }
                        _ => Some(Self::Text(n.to_string())),
                    }
                }
            }
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

/// An edge value as written by the tree author
///
/// Keeps the original spelling for rendering; [`EdgeValue::key`] gives the
/// normalized lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeValue {
    /// Text value, matched case-insensitively
    Text(String),
    /// Integer value
    Integer(i64),
    /// Boolean value
    Bool(bool),
}

impl EdgeValue {
    /// Normalized lookup key
    #[must_use]
    pub fn key(&self) -> EdgeKey {
        match self {
            Self::Text(s) => EdgeKey::Text(s.to_lowercase()),
            Self::Integer(i) => EdgeKey::Integer(*i),
            Self::Bool(b) => EdgeKey::Bool(*b),
        }
    }
}

impl fmt::Display for EdgeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for EdgeValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for EdgeValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for EdgeValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for EdgeValue {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<u32> for EdgeValue {
    fn from(i: u32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<bool> for EdgeValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        Record::try_from(value).unwrap()
    }

    #[test]
    fn field_lookup_falls_back_to_case_insensitive() {
        let r = record(json!({"Action": "play", "action_x": 1}));
        assert_eq!(r.field("Action"), Some(&json!("play")));
        assert_eq!(r.field("action"), Some(&json!("play")));
        assert_eq!(r.field("missing"), None);
    }

    #[test]
    fn exact_match_wins_over_case_fold() {
        let r = record(json!({"ACTION": "a", "action": "b"}));
        assert_eq!(r.str("action"), Some("b"));
        assert_eq!(r.str("ACTION"), Some("a"));
    }

    #[test]
    fn null_is_not_present() {
        let r = record(json!({"count": null, "filterText": ""}));
        assert!(!r.is_present("count"));
        assert!(r.is_present("filterText"));
        assert!(!r.is_present("nothing"));
    }

    #[test]
    fn non_object_rejected() {
        let err = Record::try_from(json!([1, 2])).unwrap_err();
        assert_eq!(err, RecordError::NotAnObject("array"));
    }

    #[test]
    fn edge_key_normalization() {
        assert_eq!(EdgeKey::from_value(&json!("PLAY")), Some(EdgeKey::Text("play".into())));
        assert_eq!(EdgeKey::from_value(&json!(5)), Some(EdgeKey::Integer(5)));
        assert_eq!(EdgeKey::from_value(&json!(5.0)), Some(EdgeKey::Integer(5)));
        assert_eq!(EdgeKey::from_value(&json!(2.5)), Some(EdgeKey::Text("2.5".into())));
        assert_eq!(EdgeKey::from_value(&json!(true)), Some(EdgeKey::Bool(true)));
        assert_eq!(EdgeKey::from_value(&Value::Null), None);
        assert_eq!(EdgeKey::from_value(&json!({"a": 1})), None);
        assert_eq!(EdgeValue::from("Cube").key(), EdgeKey::Text("cube".into()));
    }

    #[test]
    fn int_accessor_is_lenient() {
        let r = record(json!({"a": 3, "b": 4.0, "c": " 7 ", "d": "x"}));
        assert_eq!(r.int("a"), Some(3));
        assert_eq!(r.int("b"), Some(4));
        assert_eq!(r.int("c"), Some(7));
        assert_eq!(r.int("d"), None);
    }
}
