//! dtoforge Core - Dynamic fluent builder engine for data-transfer objects
//!
//! Given a data-shape description, this crate synthesizes a fluent builder
//! exposing a getter, setter, and (for sequence fields) append/count
//! operation per field, without the caller hand-writing any of those
//! methods. Builders support cloning, partial patching, shape extension,
//! pluggable validation, and pluggable transformation prior to finalizing
//! the built object.
//!
//! # Main Components
//!
//! - **Value Model**: dynamically shaped field values with deep-clone
//!   support across nested records, lists, sets, maps, dates, and patterns
//! - **Accessor Resolver**: maps a requested member name to a generated
//!   accessor at the moment it is first used
//! - **Builder Pipeline**: state operations plus the
//!   merge/transform/validate build pipeline and its result union
//! - **Error Handling**: fatal programmer errors via [`Error`], recoverable
//!   validation failures via [`BuildResult`]
//!
//! # Example
//!
//! ```
//! use dtoforge_core::{create_builder, BuilderOptions, ShapeDescription, Value};
//!
//! fn example() -> dtoforge_core::Result<()> {
//!     let shape = ShapeDescription::new().single("title").sequence("tags");
//!     let mut post = create_builder(shape, None, BuilderOptions::default())?;
//!
//!     post.call_chain("setTitle", vec![Value::from("hello").into()])?
//!         .call_chain("addTags", vec![Value::from("rust").into(), Value::from("builders").into()])?;
//!
//!     let result = post.build();
//!     assert!(result.is_success());
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod builder;
pub mod error;
pub mod types;
pub mod value;

// Re-export main types for convenience
pub use builder::{
    BuildFailure, BuildResult, Builder, BuilderOptions, CallArg, CallValue, CustomOp,
    MemberKey, Transformer, ValidationError, ValidationOutcome, Validator,
};
pub use error::{Error, Result};
pub use types::{FieldKind, ShapeDescription};
pub use value::{deep_clone, deep_clone_record, NativeFn, Record, Value};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Construct a builder for the given shape
///
/// `initial` is deep-cloned on intake so the caller's record is never
/// aliased by builder state; a record containing a function value is
/// rejected. `options.validate` installs a validator exactly as an
/// immediate [`Builder::use_validator`] call would.
pub fn create_builder(
    shape: ShapeDescription,
    initial: Option<Record>,
    options: BuilderOptions,
) -> Result<Builder> {
    let mut builder = match initial {
        Some(data) => Builder::with_data(shape, data)?,
        None => Builder::new(shape),
    };
    if let Some(validator) = options.validate {
        builder.use_validator(Some(validator));
    }
    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_create_builder_without_data() {
        let shape = ShapeDescription::new().single("name");
        let builder = create_builder(shape, None, BuilderOptions::default())
            .expect("empty construction should succeed");
        assert!(builder.data().is_empty());
    }

    #[test]
    fn test_create_builder_clones_intake() {
        let shape = ShapeDescription::new().sequence("items");
        let mut seed = Record::new();
        seed.insert("items".to_string(), Value::List(vec![Value::from(1)]));

        let builder = create_builder(shape, Some(seed.clone()), BuilderOptions::default())
            .expect("seeded construction should succeed");

        // mutating the caller's record leaves builder state untouched
        seed.insert("items".to_string(), Value::Null);
        assert_eq!(
            builder.field("items"),
            Some(&Value::List(vec![Value::from(1)]))
        );
    }

    #[test]
    fn test_create_builder_rejects_function_data() {
        let shape = ShapeDescription::new().single("hook");
        let mut seed = Record::new();
        seed.insert(
            "hook".to_string(),
            Value::Func(NativeFn::new("cb", |_| Value::Null)),
        );
        let err = create_builder(shape, Some(seed), BuilderOptions::default())
            .expect_err("function data must be rejected at intake");
        assert!(matches!(err, Error::FunctionClone { .. }));
    }
}
