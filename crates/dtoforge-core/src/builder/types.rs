//! Hook and dispatch types for the builder module
//!
//! Copyright (c) 2025 DTOForge Team
//! Licensed under the Apache-2.0 license

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::types::ShapeDescription;
use crate::value::{Record, Value};

use super::{BuildResult, Builder};

/// Pluggable validation stage: inspects the merged pre-transform record
pub type Validator = Arc<dyn Fn(&Record) -> ValidationOutcome + Send + Sync>;

/// Pluggable transformation stage: turns the merged record into the
/// finished object (identity when none is installed)
pub type Transformer = Arc<dyn Fn(Record) -> Value + Send + Sync>;

/// A caller-defined operation dispatched by name, the subtype-method
/// surface of the dynamic dispatch layer
pub type CustomOp = Arc<dyn Fn(&mut Builder, &[CallArg]) -> Result<CallValue> + Send + Sync>;

/// One validator-raised error
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Short kind tag, e.g. `required` or `range`
    pub kind: String,
    /// Human-readable description of the problem
    pub message: String,
    /// Field the error refers to, if any single field is at fault
    pub field: Option<String>,
}

impl ValidationError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            field: None,
        }
    }

    /// An error attributed to one field
    pub fn on_field(
        kind: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Outcome of a validator run
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Valid,
    /// One or more errors, in the order the validator produced them
    Invalid(Vec<ValidationError>),
}

impl ValidationOutcome {
    /// Fail with a single error
    pub fn fail(error: ValidationError) -> Self {
        ValidationOutcome::Invalid(vec![error])
    }

    /// Fail with a list of errors
    pub fn fail_all(errors: Vec<ValidationError>) -> Self {
        ValidationOutcome::Invalid(errors)
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }
}

/// Options recognized at construction time
#[derive(Clone, Default)]
pub struct BuilderOptions {
    /// Equivalent to calling `use_validator` immediately after construction
    pub validate: Option<Validator>,
}

impl fmt::Debug for BuilderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderOptions")
            .field("validate", &self.validate.as_ref().map(|_| "<validator>"))
            .finish()
    }
}

/// An argument passed through the dynamic dispatch surface
///
/// Most operations take plain values; `useValidator`, `useTransformer`,
/// and `extend` take hooks or shapes, which travel as their own variants
/// and are type-checked at dispatch time.
#[derive(Clone)]
pub enum CallArg {
    Value(Value),
    Validator(Validator),
    Transformer(Transformer),
    Shape(ShapeDescription),
}

impl CallArg {
    pub(super) fn kind(&self) -> &'static str {
        match self {
            CallArg::Value(_) => "value",
            CallArg::Validator(_) => "validator",
            CallArg::Transformer(_) => "transformer",
            CallArg::Shape(_) => "shape",
        }
    }
}

impl fmt::Debug for CallArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallArg::Value(v) => f.debug_tuple("Value").field(v).finish(),
            CallArg::Validator(_) => f.write_str("Validator(..)"),
            CallArg::Transformer(_) => f.write_str("Transformer(..)"),
            CallArg::Shape(s) => f.debug_tuple("Shape").field(s).finish(),
        }
    }
}

impl From<Value> for CallArg {
    fn from(value: Value) -> Self {
        CallArg::Value(value)
    }
}

impl From<ShapeDescription> for CallArg {
    fn from(shape: ShapeDescription) -> Self {
        CallArg::Shape(shape)
    }
}

/// Result of a dynamically dispatched call
#[derive(Debug)]
pub enum CallValue {
    /// The operation returned the builder itself; keep chaining on the
    /// same handle the call was made on
    Chained,
    /// The operation produced a new, independent builder (clone, extend)
    Spawned(Box<Builder>),
    /// A field value or data snapshot
    Value(Value),
    /// A getter hit a field with no value yet
    Absent,
    /// A sequence length
    Count(usize),
    /// The outcome of the build pipeline
    Built(BuildResult),
}

impl CallValue {
    pub fn is_chained(&self) -> bool {
        matches!(self, CallValue::Chained)
    }

    /// The carried value, if this outcome carries one
    pub fn into_value(self) -> Option<Value> {
        match self {
            CallValue::Value(v) => Some(v),
            _ => None,
        }
    }
}
