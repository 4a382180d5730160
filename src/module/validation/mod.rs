//! Module validation
//!
//! Checks the names modules are declared and required under.

pub mod name_validator;

pub use name_validator::{ModuleNameValidator, ValidationResult};
