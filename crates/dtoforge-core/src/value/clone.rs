//! Deep-clone utility for value graphs
//!
//! Produces a structurally equal copy that shares no mutable nested
//! container with its source. Scalars pass through unchanged; containers
//! are rebuilt recursively. Reaching a function value anywhere in the
//! graph is a type error: the domain model is data-only and a function
//! cannot be meaningfully duplicated.
//!
//! Rust's ownership already prevents two owned `Value` trees from aliasing
//! each other, so the copy itself is what the language would give you; the
//! utility's contract is the function-rejection walk with a precise failure
//! path, and it is the single intake gate every record passes through
//! before becoming builder state.
//!
//! Copyright (c) 2025 DTOForge Team
//! Licensed under the Apache-2.0 license

use super::{Record, Value};
use crate::error::{Error, Result};

/// Deep-clone a value graph, failing on any reachable function value
pub fn deep_clone(value: &Value) -> Result<Value> {
    clone_at(value, "$")
}

/// Deep-clone a record, failing on any reachable function value
pub fn deep_clone_record(record: &Record) -> Result<Record> {
    record
        .iter()
        .map(|(name, value)| clone_at(value, &format!("$.{name}")).map(|c| (name.clone(), c)))
        .collect()
}

fn clone_at(value: &Value, path: &str) -> Result<Value> {
    match value {
        Value::Func(f) => {
            log::debug!("deep clone rejected function `{}` at {path}", f.name());
            Err(Error::FunctionClone {
                path: path.to_string(),
            })
        }
        Value::Null | Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::String(_) => {
            Ok(value.clone())
        }
        Value::Date(date) => Ok(Value::Date(*date)),
        // a compiled pattern is immutable; a fresh handle is a full copy
        Value::Pattern(pattern) => Ok(Value::Pattern(pattern.clone())),
        Value::List(items) => clone_items(items, path).map(Value::List),
        Value::Set(items) => clone_items(items, path).map(Value::Set),
        Value::Map(entries) => entries
            .iter()
            .enumerate()
            .map(|(i, (key, value))| {
                let entry_path = format!("{path}[{i}]");
                Ok((clone_at(key, &entry_path)?, clone_at(value, &entry_path)?))
            })
            .collect::<Result<Vec<_>>>()
            .map(Value::Map),
        Value::Record(record) => record
            .iter()
            .map(|(name, value)| {
                clone_at(value, &format!("{path}.{name}")).map(|c| (name.clone(), c))
            })
            .collect::<Result<Record>>()
            .map(Value::Record),
    }
}

fn clone_items(items: &[Value], path: &str) -> Result<Vec<Value>> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| clone_at(item, &format!("{path}[{i}]")))
        .collect()
}
