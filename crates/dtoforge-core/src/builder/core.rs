//! Core Builder structure and state operations
//!
//! The builder owns exactly one working record plus the initial-data
//! snapshot captured at construction, and zero or one validator and
//! transformer. All mutating operations work in place and return the same
//! handle for chaining; clone and extend produce new, fully independent
//! builders.
//!
//! Copyright (c) 2025 DTOForge Team
//! Licensed under the Apache-2.0 license

use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::types::{FieldKind, ShapeDescription};
use crate::value::{deep_clone_record, Record, Value};

use super::accessor::Accessor;
use super::types::{CustomOp, Transformer, Validator};

/// A fluent builder over a dynamically described shape
///
/// Constructed through [`create_builder`](crate::create_builder) or
/// [`Builder::new`]; mutated in place by set/patch/add operations; builds
/// into a [`BuildResult`](super::BuildResult) without being consumed.
pub struct Builder {
    pub(super) shape: ShapeDescription,
    pub(super) working: Record,
    pub(super) initial: Record,
    pub(super) validator: Option<Validator>,
    pub(super) transformer: Option<Transformer>,
    pub(super) accessors: HashMap<String, Accessor>,
    pub(super) custom_ops: HashMap<String, CustomOp>,
}

impl Builder {
    /// Create a builder with no initial data
    pub fn new(shape: ShapeDescription) -> Self {
        Self {
            shape,
            working: Record::new(),
            initial: Record::new(),
            validator: None,
            transformer: None,
            accessors: HashMap::new(),
            custom_ops: HashMap::new(),
        }
    }

    /// Create a builder seeded with initial data
    ///
    /// The data is deep-cloned on intake, so the caller's record is never
    /// aliased by builder state. Fails if the record contains a function
    /// value anywhere in its graph.
    pub fn with_data(shape: ShapeDescription, initial: Record) -> Result<Self> {
        let working = deep_clone_record(&initial)?;
        Ok(Self {
            shape,
            initial: working.clone(),
            working,
            validator: None,
            transformer: None,
            accessors: HashMap::new(),
            custom_ops: HashMap::new(),
        })
    }

    /// The shape this builder targets
    pub fn shape(&self) -> &ShapeDescription {
        &self.shape
    }

    /// The full working data snapshot
    ///
    /// This is the live record, not an isolated copy; it reflects any
    /// subsequent mutation of the builder.
    pub fn data(&self) -> &Record {
        &self.working
    }

    /// One field's current value, if set
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.working.get(name)
    }

    /// Replace the entire working data
    ///
    /// Keys outside the declared shape are accepted but logged, since bulk
    /// intake mirrors a statically-checked record in the caller's code.
    pub fn set_data(&mut self, record: Record) -> &mut Self {
        self.warn_undeclared(&record, "set");
        self.working = record;
        self
    }

    /// Assign one field
    pub fn set_field(&mut self, name: &str, value: Value) -> Result<&mut Self> {
        if !self.shape.contains(name) {
            return Err(Error::UnknownField {
                member: "set".to_string(),
                field: name.to_string(),
            });
        }
        self.working.insert(name.to_string(), value);
        Ok(self)
    }

    /// Shallow-merge the given fields into working data, overwriting only
    /// the named keys
    pub fn patch(&mut self, partial: Record) -> &mut Self {
        self.warn_undeclared(&partial, "patch");
        for (name, value) in partial {
            self.working.insert(name, value);
        }
        self
    }

    /// Append items to a sequence field, in call order
    ///
    /// The field must be declared as a sequence. If it is absent, or its
    /// current value is not a list, it is re-initialized to an empty list
    /// before the items are appended.
    pub fn append(&mut self, name: &str, items: Vec<Value>) -> Result<&mut Self> {
        match self.shape.kind_of(name) {
            None => Err(Error::UnknownField {
                member: "add".to_string(),
                field: name.to_string(),
            }),
            Some(FieldKind::Single) => Err(Error::NotSequence {
                member: "add".to_string(),
                field: name.to_string(),
            }),
            Some(FieldKind::Sequence) => {
                let slot = self
                    .working
                    .entry(name.to_string())
                    .or_insert_with(|| Value::List(Vec::new()));
                if !slot.is_list() {
                    log::debug!(
                        "append re-initialized field `{name}` holding {} to an empty list",
                        slot.type_name()
                    );
                    *slot = Value::List(Vec::new());
                }
                if let Some(list) = slot.as_list_mut() {
                    list.extend(items);
                }
                Ok(self)
            }
        }
    }

    /// Length of a sequence field's list; 0 when the field is absent or
    /// its current value is not a list
    pub fn count(&self, name: &str) -> Result<usize> {
        match self.shape.kind_of(name) {
            None => Err(Error::UnknownField {
                member: "count".to_string(),
                field: name.to_string(),
            }),
            Some(FieldKind::Single) => Err(Error::NotSequence {
                member: "count".to_string(),
                field: name.to_string(),
            }),
            Some(FieldKind::Sequence) => Ok(self
                .working
                .get(name)
                .and_then(Value::as_list)
                .map_or(0, Vec::len)),
        }
    }

    /// Discard working data and restore the construction-time snapshot
    ///
    /// For a cloned builder, the snapshot is the state at which it was
    /// cloned, not the ultimate ancestor's.
    pub fn reset(&mut self) -> &mut Self {
        // initial passed the intake clone, so it is function-free and a
        // structural clone is a full deep copy
        self.working = self.initial.clone();
        self
    }

    /// Install or clear the validation stage
    pub fn use_validator(&mut self, validator: Option<Validator>) -> &mut Self {
        self.validator = validator;
        self
    }

    /// Install or clear the transformation stage
    pub fn use_transformer(&mut self, transformer: Option<Transformer>) -> &mut Self {
        self.transformer = transformer;
        self
    }

    /// Register a caller-defined operation dispatchable by name
    ///
    /// Registered operations shadow the built-in operations and the
    /// generated field accessors, matching subtype-override semantics.
    pub fn register_op(&mut self, name: impl Into<String>, op: CustomOp) -> &mut Self {
        self.custom_ops.insert(name.into(), op);
        self
    }

    /// Whether a validator is installed
    pub fn has_validator(&self) -> bool {
        self.validator.is_some()
    }

    /// Whether a transformer is installed
    pub fn has_transformer(&self) -> bool {
        self.transformer.is_some()
    }

    /// Construct an independent builder of the same shape, seeded with a
    /// deep clone of the current working data
    ///
    /// The clone carries the same validator and transformer references and
    /// its reset snapshot is the state at clone time. Mutations on either
    /// side never affect the other. Fails if the working data holds a
    /// function value.
    pub fn try_clone(&self) -> Result<Builder> {
        let working = deep_clone_record(&self.working)?;
        Ok(Builder {
            shape: self.shape.clone(),
            initial: working.clone(),
            working,
            validator: self.validator.clone(),
            transformer: self.transformer.clone(),
            accessors: self.accessors.clone(),
            custom_ops: self.custom_ops.clone(),
        })
    }

    fn warn_undeclared(&self, record: &Record, operation: &str) {
        for name in record.keys() {
            if !self.shape.contains(name) {
                log::warn!("{operation} received key `{name}` outside the declared shape");
            }
        }
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("shape", &self.shape)
            .field("working", &self.working)
            .field("has_validator", &self.validator.is_some())
            .field("has_transformer", &self.transformer.is_some())
            .field("custom_ops", &self.custom_ops.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl From<ShapeDescription> for Builder {
    fn from(shape: ShapeDescription) -> Self {
        Builder::new(shape)
    }
}
