#![forbid(unsafe_code)]

//! Form validation framework with composable validators.
//!
//! This crate provides a declarative validation system with:
//! - A core `Validator` trait for validating values
//! - Built-in validators for common patterns (required, min/max length, email, numbers)
//! - First-failure-wins chains via `All` and `ValidatorBuilder`
//! - Error messages with parameter interpolation for i18n support
//! - The concrete rule chains used by the widget (`rules`)
//!
//! # Example
//!
//! ```rust
//! use inputlab_validation::{MinLength, Required, Validator, ValidatorBuilder};
//!
//! // Simple validation
//! let required = Required::new();
//! assert!(required.validate("hello").is_valid());
//! assert!(!required.validate("").is_valid());
//!
//! // Composed validation
//! let username = ValidatorBuilder::<str>::new()
//!     .custom(Required::new())
//!     .custom(MinLength::new(3))
//!     .build();
//! assert!(username.validate("alice").is_valid());
//! assert!(!username.validate("ab").is_valid());
//! ```

pub mod rules;
mod validators;

pub use rules::{AgeRange, LengthLimits};
pub use validators::{
    // Composition
    All,
    // Error codes
    ERROR_CODE_EMAIL,
    ERROR_CODE_MAX_LENGTH,
    ERROR_CODE_MIN_LENGTH,
    ERROR_CODE_NUMBER,
    ERROR_CODE_RANGE,
    ERROR_CODE_REQUIRED,
    ERROR_CODE_WHOLE_NUMBER,
    // Built-in validators
    Email,
    ErrorKind,
    MaxLength,
    MinLength,
    Numeric,
    Parsed,
    Range,
    Required,
    // Core types
    ValidationError,
    ValidationResult,
    Validator,
    // Builder
    ValidatorBuilder,
    WholeNumber,
    // Numeric coercion
    parse_number,
    parse_whole_number,
};
