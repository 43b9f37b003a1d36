//! Shape extension for Builder
//!
//! Copyright (c) 2025 DTOForge Team
//! Licensed under the Apache-2.0 license

use std::collections::HashMap;

use crate::error::Result;
use crate::types::ShapeDescription;
use crate::value::deep_clone_record;

use super::core::Builder;

impl Builder {
    /// Widen the declared shape with additional fields
    ///
    /// Returns a new builder accepting the union of both field sets
    /// (the extension wins where a field is re-declared), carrying over
    /// the current working data as a reference-free copy together with
    /// the validator, transformer, and registered operations. The new
    /// builder's reset snapshot is the state at extension time.
    pub fn extend(&self, extra: ShapeDescription) -> Result<Builder> {
        let working = deep_clone_record(&self.working)?;
        Ok(Builder {
            shape: self.shape.merged(&extra),
            initial: working.clone(),
            working,
            validator: self.validator.clone(),
            transformer: self.transformer.clone(),
            // the accessor table is re-derived lazily against the new shape
            accessors: HashMap::new(),
            custom_ops: self.custom_ops.clone(),
        })
    }
}
