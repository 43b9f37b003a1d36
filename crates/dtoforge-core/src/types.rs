//! Core types for the dtoforge builder engine
//!
//! This module defines the shape description: the set of field names a
//! builder targets and whether each field holds a single value or a
//! sequence. The shape is what the accessor resolver consults when it
//! derives `get`/`set`/`add`/`count` members from a requested name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Declared kind of a field in a shape description
///
/// `Sequence` fields additionally receive `add<Name>` and `count<Name>`
/// accessors; `Single` fields only receive `get<Name>` and `set<Name>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// One value of any supported type
    Single,
    /// An ordered list of values
    Sequence,
}

/// The set of field names and kinds a builder targets
///
/// Field ordering is deterministic (lexicographic), which keeps snapshots
/// and error output stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeDescription {
    fields: BTreeMap<String, FieldKind>,
}

impl ShapeDescription {
    /// Create an empty shape description
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a single-valued field
    pub fn single(mut self, name: impl Into<String>) -> Self {
        self.fields.insert(name.into(), FieldKind::Single);
        self
    }

    /// Declare a sequence-valued field
    pub fn sequence(mut self, name: impl Into<String>) -> Self {
        self.fields.insert(name.into(), FieldKind::Sequence);
        self
    }

    /// Declare a field with an explicit kind
    pub fn with_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.insert(name.into(), kind);
        self
    }

    /// Look up the declared kind of a field
    pub fn kind_of(&self, name: &str) -> Option<FieldKind> {
        self.fields.get(name).copied()
    }

    /// Whether the shape declares the given field
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Union of two shapes; `other` wins when both declare the same field
    pub fn merged(&self, other: &ShapeDescription) -> ShapeDescription {
        let mut fields = self.fields.clone();
        for (name, kind) in &other.fields {
            fields.insert(name.clone(), *kind);
        }
        ShapeDescription { fields }
    }

    /// Iterate over declared field names in deterministic order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Iterate over declared fields and their kinds
    pub fn fields(&self) -> impl Iterator<Item = (&str, FieldKind)> {
        self.fields.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    /// Number of declared fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the shape declares no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, FieldKind)> for ShapeDescription {
    fn from_iter<I: IntoIterator<Item = (String, FieldKind)>>(iter: I) -> Self {
        ShapeDescription {
            fields: iter.into_iter().collect(),
        }
    }
}
