//! Fluent builder over dynamically described shapes
//!
//! This module implements the builder engine: per-field accessors derived
//! from naming convention at first use, state operations (clone, extend,
//! patch, reset), and the build/validate/transform pipeline.
//!
//! The module is organized into focused submodules:
//! - `types`: hook types, construction options, and dispatch payloads
//! - `core`: the Builder structure and its state operations
//! - `accessor`: the accessor resolver and dynamic dispatch surface
//! - `build`: the build pipeline and its result union
//! - `extensions`: shape extension
//!
//! Copyright (c) 2025 DTOForge Team
//! Licensed under the Apache-2.0 license

mod accessor;
mod build;
mod core;
mod extensions;
mod types;

pub use accessor::MemberKey;
pub use build::{BuildFailure, BuildResult};
pub use self::core::Builder;
pub use types::{
    BuilderOptions, CallArg, CallValue, CustomOp, Transformer, ValidationError,
    ValidationOutcome, Validator,
};
