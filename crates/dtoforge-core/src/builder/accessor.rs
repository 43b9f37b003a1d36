//! Accessor resolver and dynamic dispatch
//!
//! Maps a requested member name to its behavior at the moment it is first
//! used: caller-registered operations first, then the fixed builder
//! operations, then the four accessor naming patterns
//! (`get`/`set`/`add`/`count` + field name). Resolved field accessors are
//! cached in a per-builder registration table. Unresolvable names fail
//! loudly; symbol keys are a type error.
//!
//! Operation names shadow field-pattern matches, so a field literally
//! named `build` cannot be reached through `call` — a documented
//! limitation of the naming convention.
//!
//! Copyright (c) 2025 DTOForge Team
//! Licensed under the Apache-2.0 license

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::types::FieldKind;
use crate::value::{Record, Value};

use super::core::Builder;
use super::types::{CallArg, CallValue};

/// A requested member key
///
/// Member keys must be strings. The symbol variant models non-string key
/// access in dynamic callers; resolving one is always a type error rather
/// than a silent no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberKey {
    Name(String),
    Symbol(String),
}

impl MemberKey {
    /// A symbolic (non-string) key with a diagnostic description
    pub fn symbol(description: impl Into<String>) -> Self {
        MemberKey::Symbol(description.into())
    }
}

impl From<&str> for MemberKey {
    fn from(name: &str) -> Self {
        MemberKey::Name(name.to_string())
    }
}

impl From<String> for MemberKey {
    fn from(name: String) -> Self {
        MemberKey::Name(name)
    }
}

/// A resolved field accessor, cached per builder after first use
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Accessor {
    Get(String),
    Set(String),
    Add(String),
    Count(String),
}

/// The four accessor naming patterns, checked after operation names
fn accessor_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(get|set|add|count)(.+)$").expect("accessor pattern is valid")
    })
}

/// Field name extraction: strip the prefix, lower-case the first character
fn decapitalize(rest: &str) -> String {
    let mut chars = rest.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Builder {
    /// Resolve and invoke a member by name
    ///
    /// This is the dynamic dispatch surface: generated field accessors and
    /// the fixed operations are reached through the same entry point. An
    /// operation that returns the builder itself reports
    /// [`CallValue::Chained`]; the caller keeps using the handle the call
    /// was made on, which stays the builder's one public handle for its
    /// whole lifetime.
    pub fn call(&mut self, member: impl Into<MemberKey>, args: Vec<CallArg>) -> Result<CallValue> {
        let name = match member.into() {
            MemberKey::Name(name) => name,
            MemberKey::Symbol(symbol) => return Err(Error::SymbolMember { symbol }),
        };

        // registered operations shadow built-ins, subtype-override style
        if let Some(op) = self.custom_ops.get(&name).cloned() {
            log::debug!("dispatching registered operation `{name}`");
            return op(self, &args);
        }

        match name.as_str() {
            "clone" => {
                no_args(&name, &args)?;
                Ok(CallValue::Spawned(Box::new(self.try_clone()?)))
            }
            "extend" => {
                let arg = one_arg(&name, args)?;
                match arg {
                    CallArg::Shape(extra) => {
                        Ok(CallValue::Spawned(Box::new(self.extend(extra)?)))
                    }
                    other => Err(wrong_kind(&name, "shape", &other)),
                }
            }
            "patch" => {
                let partial = record_arg(&name, one_arg(&name, args)?)?;
                self.patch(partial);
                Ok(CallValue::Chained)
            }
            "build" => {
                let mut args = args.into_iter();
                match (args.next(), args.next()) {
                    (None, _) => Ok(CallValue::Built(self.build())),
                    (Some(arg), None) => {
                        let overrides = record_arg(&name, arg)?;
                        Ok(CallValue::Built(self.build_with(overrides)))
                    }
                    _ => Err(Error::InvalidArgument {
                        member: name,
                        message: "expected at most one override record".to_string(),
                    }),
                }
            }
            "reset" => {
                no_args(&name, &args)?;
                self.reset();
                Ok(CallValue::Chained)
            }
            "get" => {
                let mut args = args.into_iter();
                match (args.next(), args.next()) {
                    (None, _) => Ok(CallValue::Value(Value::Record(self.working.clone()))),
                    (Some(arg), None) => {
                        let field = string_arg(&name, arg)?;
                        Ok(match self.working.get(&field) {
                            Some(value) => CallValue::Value(value.clone()),
                            None => CallValue::Absent,
                        })
                    }
                    _ => Err(Error::InvalidArgument {
                        member: name,
                        message: "expected at most one field name".to_string(),
                    }),
                }
            }
            "set" => {
                let mut args = args.into_iter();
                match (args.next(), args.next(), args.next()) {
                    (Some(arg), None, _) => {
                        let record = record_arg(&name, arg)?;
                        self.set_data(record);
                        Ok(CallValue::Chained)
                    }
                    (Some(first), Some(second), None) => {
                        let field = string_arg(&name, first)?;
                        let value = value_arg(&name, second)?;
                        self.set_field(&field, value)?;
                        Ok(CallValue::Chained)
                    }
                    _ => Err(Error::InvalidArgument {
                        member: name,
                        message: "expected a whole record or a field/value pair".to_string(),
                    }),
                }
            }
            "useValidator" => {
                let mut args = args.into_iter();
                match (args.next(), args.next()) {
                    (None, _) => {
                        self.use_validator(None);
                        Ok(CallValue::Chained)
                    }
                    (Some(CallArg::Validator(validator)), None) => {
                        self.use_validator(Some(validator));
                        Ok(CallValue::Chained)
                    }
                    (Some(other), None) => Err(wrong_kind(&name, "validator", &other)),
                    _ => Err(Error::InvalidArgument {
                        member: name,
                        message: "expected at most one validator".to_string(),
                    }),
                }
            }
            "useTransformer" => {
                let mut args = args.into_iter();
                match (args.next(), args.next()) {
                    (None, _) => {
                        self.use_transformer(None);
                        Ok(CallValue::Chained)
                    }
                    (Some(CallArg::Transformer(transformer)), None) => {
                        self.use_transformer(Some(transformer));
                        Ok(CallValue::Chained)
                    }
                    (Some(other), None) => Err(wrong_kind(&name, "transformer", &other)),
                    _ => Err(Error::InvalidArgument {
                        member: name,
                        message: "expected at most one transformer".to_string(),
                    }),
                }
            }
            _ => self.call_accessor(&name, args),
        }
    }

    /// Resolve and invoke a self-returning member, keeping the fluent chain
    ///
    /// Fails if the member resolves to something that does not return the
    /// builder handle (a getter, count, build, clone, or extend).
    pub fn call_chain(&mut self, member: impl Into<MemberKey>, args: Vec<CallArg>) -> Result<&mut Self> {
        let member = member.into();
        let description = match &member {
            MemberKey::Name(name) => name.clone(),
            MemberKey::Symbol(symbol) => symbol.clone(),
        };
        match self.call(member, args)? {
            CallValue::Chained => Ok(self),
            _ => Err(Error::InvalidArgument {
                member: description,
                message: "operation does not return the builder handle; use call()".to_string(),
            }),
        }
    }

    fn call_accessor(&mut self, name: &str, args: Vec<CallArg>) -> Result<CallValue> {
        match self.resolve_accessor(name)? {
            Accessor::Get(field) => {
                no_args(name, &args)?;
                Ok(match self.working.get(&field) {
                    Some(value) => CallValue::Value(value.clone()),
                    None => CallValue::Absent,
                })
            }
            Accessor::Set(field) => {
                let value = value_arg(name, one_arg(name, args)?)?;
                self.working.insert(field, value);
                Ok(CallValue::Chained)
            }
            Accessor::Add(field) => {
                let items = args
                    .into_iter()
                    .map(|arg| value_arg(name, arg))
                    .collect::<Result<Vec<_>>>()?;
                self.append(&field, items)?;
                Ok(CallValue::Chained)
            }
            Accessor::Count(field) => {
                no_args(name, &args)?;
                Ok(CallValue::Count(self.count(&field)?))
            }
        }
    }

    /// Classify a member name against the accessor patterns, caching the
    /// result in the builder's registration table
    fn resolve_accessor(&mut self, name: &str) -> Result<Accessor> {
        if let Some(accessor) = self.accessors.get(name) {
            return Ok(accessor.clone());
        }

        let captures = accessor_pattern()
            .captures(name)
            .ok_or_else(|| Error::UnknownMember {
                name: name.to_string(),
            })?;
        let prefix = captures.get(1).map_or("", |m| m.as_str());
        let field = decapitalize(captures.get(2).map_or("", |m| m.as_str()));

        let kind = self.shape.kind_of(&field).ok_or_else(|| Error::UnknownField {
            member: name.to_string(),
            field: field.clone(),
        })?;

        let accessor = match prefix {
            "get" => Accessor::Get(field),
            "set" => Accessor::Set(field),
            "add" | "count" if kind != FieldKind::Sequence => {
                return Err(Error::NotSequence {
                    member: name.to_string(),
                    field,
                });
            }
            "add" => Accessor::Add(field),
            "count" => Accessor::Count(field),
            // the pattern alternation admits nothing else
            _ => {
                return Err(Error::UnknownMember {
                    name: name.to_string(),
                });
            }
        };

        log::debug!("resolved member `{name}` as {accessor:?}");
        self.accessors.insert(name.to_string(), accessor.clone());
        Ok(accessor)
    }
}

fn no_args(member: &str, args: &[CallArg]) -> Result<()> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(Error::InvalidArgument {
            member: member.to_string(),
            message: format!("expected no arguments, got {}", args.len()),
        })
    }
}

fn one_arg(member: &str, args: Vec<CallArg>) -> Result<CallArg> {
    let count = args.len();
    let mut args = args.into_iter();
    match (args.next(), args.next()) {
        (Some(arg), None) => Ok(arg),
        _ => Err(Error::InvalidArgument {
            member: member.to_string(),
            message: format!("expected exactly one argument, got {count}"),
        }),
    }
}

fn wrong_kind(member: &str, expected: &str, got: &CallArg) -> Error {
    Error::InvalidArgument {
        member: member.to_string(),
        message: format!("expected a {expected} argument, got {}", got.kind()),
    }
}

fn value_arg(member: &str, arg: CallArg) -> Result<Value> {
    match arg {
        CallArg::Value(value) => Ok(value),
        other => Err(wrong_kind(member, "value", &other)),
    }
}

fn record_arg(member: &str, arg: CallArg) -> Result<Record> {
    match value_arg(member, arg)? {
        Value::Record(record) => Ok(record),
        other => Err(Error::InvalidArgument {
            member: member.to_string(),
            message: format!("expected a record, got {}", other.type_name()),
        }),
    }
}

fn string_arg(member: &str, arg: CallArg) -> Result<String> {
    match value_arg(member, arg)? {
        Value::String(s) => Ok(s),
        other => Err(Error::InvalidArgument {
            member: member.to_string(),
            message: format!("expected a field name string, got {}", other.type_name()),
        }),
    }
}
