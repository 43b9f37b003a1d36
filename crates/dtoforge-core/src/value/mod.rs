//! Dynamic value model for builder working data
//!
//! Field values are dynamically shaped: the builder does not type-check
//! them (type safety is assumed to come from the caller's static shape
//! description), it only stores, copies, and hands them back. The model
//! covers the JSON scalars and containers plus the non-JSON containers the
//! deep-clone contract names: sets, arbitrary-keyed maps, dates, and
//! compiled patterns. A function variant exists so the data-only contract
//! is enforceable: deep clone fails loudly when it reaches one.
//!
//! Copyright (c) 2025 DTOForge Team
//! Licensed under the Apache-2.0 license

mod clone;

pub use clone::{deep_clone, deep_clone_record};

use chrono::{DateTime, Utc};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::Error;

/// A partial data record: field name to field value, fields absent until set
pub type Record = BTreeMap<String, Value>;

/// An opaque callable carried inside a value graph
///
/// Functions are not data; they exist in the model only so that misuse is
/// detectable. Deep clone rejects any graph containing one.
#[derive(Clone)]
pub struct NativeFn {
    name: String,
    f: Arc<dyn Fn(&[Value]) -> Value + Send + Sync>,
}

impl NativeFn {
    /// Wrap a function under a diagnostic name
    pub fn new(name: impl Into<String>, f: impl Fn(&[Value]) -> Value + Send + Sync + 'static) -> Self {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    /// The diagnostic name given at construction
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the wrapped function
    pub fn invoke(&self, args: &[Value]) -> Value {
        (self.f)(args)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFn({})", self.name)
    }
}

impl PartialEq for NativeFn {
    fn eq(&self, other: &Self) -> bool {
        // identity, not structure: two closures are equal only if shared
        Arc::ptr_eq(&self.f, &other.f)
    }
}

/// A dynamically-shaped field value
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Ordered sequence, the backing type for `add`/`count` accessors
    List(Vec<Value>),
    /// Insertion-ordered, duplicate-free collection
    Set(Vec<Value>),
    /// Insertion-ordered map with arbitrary keys
    Map(Vec<(Value, Value)>),
    /// Nested partial data record
    Record(Record),
    Date(DateTime<Utc>),
    Pattern(Regex),
    Func(NativeFn),
}

impl Value {
    /// Build a set, dropping duplicates while keeping first-seen order
    pub fn set_of(items: impl IntoIterator<Item = Value>) -> Value {
        let mut out: Vec<Value> = Vec::new();
        for item in items {
            if !out.contains(&item) {
                out.push(item);
            }
        }
        Value::Set(out)
    }

    /// Build a map; a repeated key keeps its first position, last value wins
    pub fn map_of(entries: impl IntoIterator<Item = (Value, Value)>) -> Value {
        let mut out: Vec<(Value, Value)> = Vec::new();
        for (key, value) in entries {
            if let Some(slot) = out.iter_mut().find(|(existing, _)| *existing == key) {
                slot.1 = value;
            } else {
                out.push((key, value));
            }
        }
        Value::Map(out)
    }

    /// Build a nested record from name/value pairs
    pub fn record_of<S: Into<String>>(entries: impl IntoIterator<Item = (S, Value)>) -> Value {
        Value::Record(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Human-readable name of this value's type, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
            Value::Record(_) => "record",
            Value::Date(_) => "date",
            Value::Pattern(_) => "pattern",
            Value::Func(_) => "function",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Value::Record(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => set_eq(a, b),
            (Value::Map(a), Value::Map(b)) => map_eq(a, b),
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Pattern(a), Value::Pattern(b)) => a.as_str() == b.as_str(),
            (Value::Func(a), Value::Func(b)) => a == b,
            _ => false,
        }
    }
}

/// Order-insensitive comparison for sets
fn set_eq(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().all(|x| b.iter().any(|y| x == y))
}

/// Order-insensitive comparison for maps
fn map_eq(a: &[(Value, Value)], b: &[(Value, Value)]) -> bool {
    a.len() == b.len()
        && a.iter()
            .all(|(k, v)| b.iter().any(|(k2, v2)| k == k2 && v == v2))
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
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
        Value::List(items)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(date: DateTime<Utc>) -> Self {
        Value::Date(date)
    }
}

impl From<Regex> for Value {
    fn from(pattern: Regex) -> Self {
        Value::Pattern(pattern)
    }
}

impl From<NativeFn> for Value {
    fn from(f: NativeFn) -> Self {
        Value::Func(f)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Value::Int)
                .or_else(|| n.as_f64().map(Value::Float))
                .unwrap_or(Value::Null),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Record(
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ),
        }
    }
}

impl TryFrom<Value> for serde_json::Value {
    type Error = Error;

    /// JSON rendering of a value graph
    ///
    /// Dates become RFC 3339 strings, patterns become their source string,
    /// sets become arrays. Maps require string keys; functions and
    /// non-finite floats have no JSON form.
    fn try_from(value: Value) -> Result<serde_json::Value, Error> {
        match value {
            Value::Null => Ok(serde_json::Value::Null),
            Value::Bool(b) => Ok(serde_json::Value::Bool(b)),
            Value::Int(i) => Ok(serde_json::Value::Number(i.into())),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .ok_or(Error::JsonIncompatible { type_name: "float" }),
            Value::String(s) => Ok(serde_json::Value::String(s)),
            Value::List(items) | Value::Set(items) => items
                .into_iter()
                .map(serde_json::Value::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(serde_json::Value::Array),
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| match k {
                    Value::String(key) => serde_json::Value::try_from(v).map(|jv| (key, jv)),
                    _ => Err(Error::JsonIncompatible { type_name: "map" }),
                })
                .collect::<Result<serde_json::Map<String, serde_json::Value>, _>>()
                .map(serde_json::Value::Object),
            Value::Record(record) => record
                .into_iter()
                .map(|(k, v)| serde_json::Value::try_from(v).map(|jv| (k, jv)))
                .collect::<Result<serde_json::Map<String, serde_json::Value>, _>>()
                .map(serde_json::Value::Object),
            Value::Date(date) => Ok(serde_json::Value::String(date.to_rfc3339())),
            Value::Pattern(pattern) => Ok(serde_json::Value::String(pattern.as_str().to_string())),
            Value::Func(_) => Err(Error::JsonIncompatible {
                type_name: "function",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_set_of_deduplicates() {
        let set = Value::set_of([Value::from(1), Value::from(2), Value::from(1)]);
        match &set {
            Value::Set(items) => assert_eq!(items.len(), 2),
            other => panic!("expected set, got {}", other.type_name()),
        }
    }

    #[test]
    fn test_set_equality_is_order_insensitive() {
        let a = Value::set_of([Value::from(1), Value::from(2)]);
        let b = Value::set_of([Value::from(2), Value::from(1)]);
        assert_eq!(a, b);
        assert_ne!(a, Value::set_of([Value::from(1)]));
    }

    #[test]
    fn test_map_of_last_value_wins() {
        let map = Value::map_of([
            (Value::from("k"), Value::from(1)),
            (Value::from("k"), Value::from(2)),
        ]);
        assert_eq!(
            map,
            Value::map_of([(Value::from("k"), Value::from(2))])
        );
    }

    #[test]
    fn test_pattern_equality_by_source() {
        let a = Value::Pattern(Regex::new(r"\d+").expect("valid pattern"));
        let b = Value::Pattern(Regex::new(r"\d+").expect("valid pattern"));
        let c = Value::Pattern(Regex::new(r"\w+").expect("valid pattern"));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_func_equality_is_identity() {
        let f = NativeFn::new("id", |args| args.first().cloned().unwrap_or(Value::Null));
        let same = Value::Func(f.clone());
        let other = Value::Func(NativeFn::new("id", |args| {
            args.first().cloned().unwrap_or(Value::Null)
        }));
        assert_eq!(Value::Func(f), same);
        assert_ne!(same, other);
    }

    #[test]
    fn test_from_json_round_trip() {
        let json = serde_json::json!({
            "name": "widget",
            "count": 3,
            "ratio": 0.5,
            "tags": ["a", "b"],
            "nested": {"on": true, "none": null}
        });
        let value = Value::from(json.clone());
        let back = serde_json::Value::try_from(value).expect("JSON-sourced values convert back");
        assert_eq!(back, json);
    }

    #[test]
    fn test_date_renders_as_rfc3339() {
        let date = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let json = serde_json::Value::try_from(Value::Date(date)).expect("dates convert");
        assert_eq!(json, serde_json::json!("2025-06-01T12:00:00+00:00"));
    }

    #[test]
    fn test_func_has_no_json_form() {
        let value = Value::Func(NativeFn::new("noop", |_| Value::Null));
        let err = serde_json::Value::try_from(value).expect_err("functions must not convert");
        assert!(matches!(err, Error::JsonIncompatible { type_name: "function" }));
    }

    #[test]
    fn test_int_and_float_do_not_compare_equal() {
        assert_ne!(Value::from(1), Value::from(1.0));
    }
}
