//! Build pipeline and result model
//!
//! `build` merges the working data with an optional override record,
//! applies the transformer (identity when none is installed), and runs the
//! validator against the merged pre-transform record. Validation failure
//! is reported through the result union, never raised as an error: the
//! caller pattern-matches the outcome.
//!
//! Contract point: the validator sees the plain merged record, not the
//! transformed candidate. Validators stay reusable across transformers
//! that change the output representation.
//!
//! Copyright (c) 2025 DTOForge Team
//! Licensed under the Apache-2.0 license

use std::fmt;

use crate::value::{Record, Value};

use super::core::Builder;
use super::types::{ValidationError, ValidationOutcome};

/// The two-case outcome of the build pipeline
///
/// Callers must check which case they hold before accessing the payload;
/// there is no implicit unwrapping.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildResult {
    /// The finished object
    Success(Value),
    /// The attempted object together with every validator-raised error
    Failure(BuildFailure),
}

impl BuildResult {
    pub fn is_success(&self) -> bool {
        matches!(self, BuildResult::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, BuildResult::Failure(_))
    }

    pub fn as_success(&self) -> Option<&Value> {
        match self {
            BuildResult::Success(value) => Some(value),
            BuildResult::Failure(_) => None,
        }
    }

    pub fn as_failure(&self) -> Option<&BuildFailure> {
        match self {
            BuildResult::Success(_) => None,
            BuildResult::Failure(failure) => Some(failure),
        }
    }

    pub fn into_success(self) -> Option<Value> {
        match self {
            BuildResult::Success(value) => Some(value),
            BuildResult::Failure(_) => None,
        }
    }

    /// Bridge to `std::result::Result` for `?`-style callers
    pub fn into_result(self) -> Result<Value, BuildFailure> {
        match self {
            BuildResult::Success(value) => Ok(value),
            BuildResult::Failure(failure) => Err(failure),
        }
    }
}

/// A validation-failed build outcome
#[derive(Debug, Clone, PartialEq)]
pub struct BuildFailure {
    /// The candidate object the pipeline produced, post-transform
    pub attempted: Value,
    /// The underlying errors, ordered as the validator produced them
    pub errors: Vec<ValidationError>,
}

impl fmt::Display for BuildFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("validation failed")?;
        for error in &self.errors {
            write!(f, "\n{}: {}", error.kind, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for BuildFailure {}

impl Builder {
    /// Run the build pipeline with no overrides
    pub fn build(&self) -> BuildResult {
        self.build_with(Record::new())
    }

    /// Run the build pipeline, merging the override record over working
    /// data first (override wins on conflicting keys)
    pub fn build_with(&self, overrides: Record) -> BuildResult {
        let mut merged = self.working.clone();
        for (name, value) in overrides {
            merged.insert(name, value);
        }

        let outcome = self.validator.as_ref().map(|validate| validate(&merged));

        let candidate = match &self.transformer {
            Some(transform) => transform(merged),
            None => Value::Record(merged),
        };

        match outcome {
            Some(ValidationOutcome::Invalid(errors)) if errors.is_empty() => {
                log::warn!("validator reported failure with an empty error list; treating as valid");
                BuildResult::Success(candidate)
            }
            Some(ValidationOutcome::Invalid(errors)) => {
                log::debug!("build rejected by validator with {} error(s)", errors.len());
                BuildResult::Failure(BuildFailure {
                    attempted: candidate,
                    errors,
                })
            }
            Some(ValidationOutcome::Valid) | None => BuildResult::Success(candidate),
        }
    }
}
