//! Error types for the dtoforge core library
//!
//! This module defines the fatal error taxonomy for the builder engine,
//! using thiserror for ergonomic error definitions and anyhow for opaque
//! error sources raised by caller-registered operations.
//!
//! Fatal errors are programmer errors: a member name that resolves to
//! nothing, a symbol-keyed access, or a function value reached while deep
//! cloning. Validation failures are not errors in this taxonomy; they are
//! reported through [`BuildResult`](crate::BuildResult).

use thiserror::Error;

/// Main error type for dtoforge operations
#[derive(Error, Debug)]
pub enum Error {
    /// A member name that matches neither a builder operation nor an
    /// accessor naming pattern
    #[error("unknown member `{name}`: no builder operation or field accessor by that name")]
    UnknownMember { name: String },

    /// An accessor pattern matched, but the extracted field is not part of
    /// the builder's shape
    #[error("unknown field `{field}` requested via `{member}`: not declared in this builder's shape")]
    UnknownField { member: String, field: String },

    /// Member keys must be strings; symbol keys are rejected rather than
    /// silently ignored
    #[error("member keys must be strings: symbol key `{symbol}` cannot be resolved")]
    SymbolMember { symbol: String },

    /// An `add`/`count` accessor was requested for a field that is not
    /// declared as a sequence
    #[error("field `{field}` is not a sequence: `{member}` is only generated for sequence fields")]
    NotSequence { member: String, field: String },

    /// Deep clone reached a function value
    #[error("cannot clone a function value at {path}")]
    FunctionClone { path: String },

    /// A dispatched call received arguments of the wrong count or kind
    #[error("invalid argument for `{member}`: {message}")]
    InvalidArgument { member: String, message: String },

    /// A value has no JSON representation
    #[error("value of type {type_name} has no JSON representation")]
    JsonIncompatible { type_name: &'static str },

    /// Generic internal error with context, typically raised by a
    /// caller-registered operation
    #[error("internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}
