#![forbid(unsafe_code)]

//! Core validation types and built-in validators.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// Error Codes (for i18n lookup)
// ---------------------------------------------------------------------------

/// Error code for required field validation.
pub const ERROR_CODE_REQUIRED: &str = "required";
/// Error code for minimum length validation.
pub const ERROR_CODE_MIN_LENGTH: &str = "too_short";
/// Error code for maximum length validation.
pub const ERROR_CODE_MAX_LENGTH: &str = "too_long";
/// Error code for email validation.
pub const ERROR_CODE_EMAIL: &str = "email";
/// Error code for values that do not parse as a number.
pub const ERROR_CODE_NUMBER: &str = "number";
/// Error code for numbers with a fractional part.
pub const ERROR_CODE_WHOLE_NUMBER: &str = "whole_number";
/// Error code for range validation.
pub const ERROR_CODE_RANGE: &str = "range";

// ---------------------------------------------------------------------------
// ErrorKind
// ---------------------------------------------------------------------------

/// Coarse classification of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A value was required but missing.
    Required,
    /// Too few or too many characters.
    LengthBound,
    /// The value does not have the expected shape (email, number).
    Format,
    /// A number outside the allowed bounds.
    Range,
    /// A number with a fractional part where an integer was expected.
    NotInteger,
}

impl ErrorKind {
    /// Classify a stable error code. Unknown codes are treated as format errors.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            ERROR_CODE_REQUIRED => Self::Required,
            ERROR_CODE_MIN_LENGTH | ERROR_CODE_MAX_LENGTH => Self::LengthBound,
            ERROR_CODE_RANGE => Self::Range,
            ERROR_CODE_WHOLE_NUMBER => Self::NotInteger,
            _ => Self::Format,
        }
    }
}

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// A validation error with code, message, and interpolation parameters.
///
/// The `code` field is a stable identifier for i18n systems.
/// The `message` field is a human-readable default message.
/// The `params` field contains key-value pairs for message interpolation.
///
/// # Example
///
/// ```rust
/// use inputlab_validation::ValidationError;
///
/// let error = ValidationError::new("too_short", "Must be at least {min} characters")
///     .with_param("min", 8);
///
/// assert_eq!(error.format_message(), "Must be at least 8 characters");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Stable error code for programmatic handling and i18n.
    pub code: &'static str,
    /// Human-readable error message template.
    pub message: String,
    /// Parameters for message interpolation.
    pub params: HashMap<String, String>,
}

impl ValidationError {
    /// Create a new validation error with the given code and message.
    #[must_use]
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            params: HashMap::new(),
        }
    }

    /// Add a parameter for message interpolation.
    ///
    /// Parameters are substituted in the message using `{key}` syntax.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// Classification derived from the error code.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::from_code(self.code)
    }

    /// Format the message with parameter substitution.
    ///
    /// Replaces `{key}` patterns in the message with corresponding parameter values.
    #[must_use]
    pub fn format_message(&self) -> String {
        let mut result = self.message.clone();
        for (key, value) in &self.params {
            result = result.replace(&format!("{{{key}}}"), value);
        }
        result
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_message())
    }
}

impl std::error::Error for ValidationError {}

// ---------------------------------------------------------------------------
// ValidationResult
// ---------------------------------------------------------------------------

/// The result of a validation operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValidationResult {
    /// The value is valid.
    #[default]
    Valid,
    /// The value is invalid with an error.
    Invalid(ValidationError),
}

impl ValidationResult {
    /// Returns `true` if the result is `Valid`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Returns `true` if the result is `Invalid`.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    /// Returns the error if the result is `Invalid`, otherwise `None`.
    #[must_use]
    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            Self::Valid => None,
            Self::Invalid(e) => Some(e),
        }
    }

    /// Returns the error message if the result is `Invalid`, otherwise `None`.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error().map(ValidationError::format_message)
    }
}

// ---------------------------------------------------------------------------
// Validator Trait
// ---------------------------------------------------------------------------

/// A trait for validating values of type `T`.
///
/// Validators are composable through [`All`] and [`ValidatorBuilder`].
///
/// # Implementing a Custom Validator
///
/// ```rust
/// use inputlab_validation::{Validator, ValidationResult, ValidationError};
///
/// struct NoSpaces;
///
/// impl Validator<str> for NoSpaces {
///     fn validate(&self, value: &str) -> ValidationResult {
///         if value.contains(' ') {
///             ValidationResult::Invalid(
///                 ValidationError::new("no_spaces", "Value must not contain spaces")
///             )
///         } else {
///             ValidationResult::Valid
///         }
///     }
///
///     fn error_message(&self) -> &str {
///         "Value must not contain spaces"
///     }
/// }
/// ```
pub trait Validator<T: ?Sized>: Send + Sync {
    /// Validate the given value.
    fn validate(&self, value: &T) -> ValidationResult;

    /// Return the default error message for this validator.
    fn error_message(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Built-in Validators
// ---------------------------------------------------------------------------

/// Validates that a string is not empty.
///
/// By default, whitespace-only strings are considered empty.
#[derive(Debug, Clone)]
pub struct Required {
    /// If `true`, whitespace-only strings are considered valid.
    pub allow_whitespace: bool,
    /// Error message.
    pub message: String,
}

impl Default for Required {
    fn default() -> Self {
        Self {
            allow_whitespace: false,
            message: "This field is required".to_string(),
        }
    }
}

impl Required {
    /// Create a new `Required` validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow whitespace-only strings to pass validation.
    #[must_use]
    pub fn allow_whitespace(mut self) -> Self {
        self.allow_whitespace = true;
        self
    }

    /// Set a custom error message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl Validator<str> for Required {
    fn validate(&self, value: &str) -> ValidationResult {
        let is_empty = if self.allow_whitespace {
            value.is_empty()
        } else {
            value.trim().is_empty()
        };

        if is_empty {
            ValidationResult::Invalid(ValidationError::new(ERROR_CODE_REQUIRED, &self.message))
        } else {
            ValidationResult::Valid
        }
    }

    fn error_message(&self) -> &str {
        &self.message
    }
}

/// Count characters, optionally ignoring surrounding whitespace.
fn char_len(value: &str, trimmed: bool) -> usize {
    if trimmed {
        value.trim().chars().count()
    } else {
        value.chars().count()
    }
}

/// Validates that a string has at least `min` characters.
#[derive(Debug, Clone)]
pub struct MinLength {
    /// Minimum number of characters required.
    pub min: usize,
    /// Measure the trimmed value instead of the raw one.
    pub trimmed: bool,
    /// Error message template (`{min}` and `{actual}` are interpolated).
    pub message: String,
}

impl MinLength {
    /// Create a new `MinLength` validator.
    #[must_use]
    pub fn new(min: usize) -> Self {
        Self {
            min,
            trimmed: false,
            message: "Must be at least {min} characters".to_string(),
        }
    }

    /// Measure the value after trimming surrounding whitespace.
    #[must_use]
    pub fn trimmed(mut self) -> Self {
        self.trimmed = true;
        self
    }

    /// Set a custom error message template.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl Validator<str> for MinLength {
    fn validate(&self, value: &str) -> ValidationResult {
        let len = char_len(value, self.trimmed);
        if len < self.min {
            ValidationResult::Invalid(
                ValidationError::new(ERROR_CODE_MIN_LENGTH, &self.message)
                    .with_param("min", self.min)
                    .with_param("actual", len),
            )
        } else {
            ValidationResult::Valid
        }
    }

    fn error_message(&self) -> &str {
        &self.message
    }
}

/// Validates that a string has at most `max` characters.
#[derive(Debug, Clone)]
pub struct MaxLength {
    /// Maximum number of characters allowed.
    pub max: usize,
    /// Measure the trimmed value instead of the raw one.
    pub trimmed: bool,
    /// Error message template (`{max}` and `{actual}` are interpolated).
    pub message: String,
}

impl MaxLength {
    /// Create a new `MaxLength` validator.
    #[must_use]
    pub fn new(max: usize) -> Self {
        Self {
            max,
            trimmed: false,
            message: "Must be at most {max} characters".to_string(),
        }
    }

    /// Measure the value after trimming surrounding whitespace.
    #[must_use]
    pub fn trimmed(mut self) -> Self {
        self.trimmed = true;
        self
    }

    /// Set a custom error message template.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl Validator<str> for MaxLength {
    fn validate(&self, value: &str) -> ValidationResult {
        let len = char_len(value, self.trimmed);
        if len > self.max {
            ValidationResult::Invalid(
                ValidationError::new(ERROR_CODE_MAX_LENGTH, &self.message)
                    .with_param("max", self.max)
                    .with_param("actual", len),
            )
        } else {
            ValidationResult::Valid
        }
    }

    fn error_message(&self) -> &str {
        &self.message
    }
}

/// `local@domain.tld`: no whitespace or extra `@`, and a dot with text on
/// both sides after the `@`.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

/// Validates that a string is a plausible email address.
///
/// The trimmed value must look like `local@domain.tld`. Empty values are
/// valid (use [`Required`] for required fields).
#[derive(Debug, Clone)]
pub struct Email {
    /// Error message.
    pub message: String,
}

impl Default for Email {
    fn default() -> Self {
        Self {
            message: "Invalid email address".to_string(),
        }
    }
}

impl Email {
    /// Create a new `Email` validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom error message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl Validator<str> for Email {
    fn validate(&self, value: &str) -> ValidationResult {
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return ValidationResult::Valid; // Empty is valid (use Required for required)
        }

        if EMAIL_REGEX.is_match(trimmed) {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(ValidationError::new(ERROR_CODE_EMAIL, &self.message))
        }
    }

    fn error_message(&self) -> &str {
        &self.message
    }
}

// ---------------------------------------------------------------------------
// Numeric input
// ---------------------------------------------------------------------------

/// Coerce free text to a number the way a browser number field does.
///
/// Surrounding whitespace is ignored and an all-whitespace string is zero.
/// Decimal and exponent notation are accepted. Returns `None` for anything
/// that is not a number, including the literal `NaN`.
#[must_use]
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    // `f64::from_str` also accepts "inf" and "nan" spellings. Radix prefixes
    // (`0x1A`, `0b1`, `0o7`) are rejected on purpose; age is decimal only.
    if trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E'))
    {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Parse text as an integer, if it is a finite number without a fractional part.
///
/// Magnitudes beyond `i64` saturate, so they still fail any sensible range.
#[must_use]
pub fn parse_whole_number(value: &str) -> Option<i64> {
    let n = parse_number(value)?;
    if !n.is_finite() || n.fract() != 0.0 {
        return None;
    }
    Some(n as i64)
}

/// Validates that a string parses as a number.
#[derive(Debug, Clone)]
pub struct Numeric {
    /// Error message.
    pub message: String,
}

impl Default for Numeric {
    fn default() -> Self {
        Self {
            message: "Must be a number".to_string(),
        }
    }
}

impl Numeric {
    /// Create a new `Numeric` validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom error message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl Validator<str> for Numeric {
    fn validate(&self, value: &str) -> ValidationResult {
        if parse_number(value).is_some() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(ValidationError::new(ERROR_CODE_NUMBER, &self.message))
        }
    }

    fn error_message(&self) -> &str {
        &self.message
    }
}

/// Validates that a numeric string has no fractional part.
///
/// Non-numeric values pass; pair with [`Numeric`] to reject them.
#[derive(Debug, Clone)]
pub struct WholeNumber {
    /// Error message.
    pub message: String,
}

impl Default for WholeNumber {
    fn default() -> Self {
        Self {
            message: "Must be a whole number".to_string(),
        }
    }
}

impl WholeNumber {
    /// Create a new `WholeNumber` validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom error message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl Validator<str> for WholeNumber {
    fn validate(&self, value: &str) -> ValidationResult {
        if parse_number(value).is_none() || parse_whole_number(value).is_some() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(ValidationError::new(
                ERROR_CODE_WHOLE_NUMBER,
                &self.message,
            ))
        }
    }

    fn error_message(&self) -> &str {
        &self.message
    }
}

/// Validates that a value is within a range.
#[derive(Debug, Clone)]
pub struct Range<T> {
    /// Minimum value (inclusive).
    pub min: T,
    /// Maximum value (inclusive).
    pub max: T,
    /// Error message template (`{min}`, `{max}`, `{actual}` are interpolated).
    pub message: String,
}

impl<T: Copy> Range<T> {
    /// Create a new `Range` validator.
    #[must_use]
    pub fn new(min: T, max: T) -> Self {
        Self {
            min,
            max,
            message: "Must be between {min} and {max}".to_string(),
        }
    }

    /// Set a custom error message template.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl<T> Validator<T> for Range<T>
where
    T: PartialOrd + fmt::Display + Copy + Send + Sync,
{
    fn validate(&self, value: &T) -> ValidationResult {
        if *value >= self.min && *value <= self.max {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(
                ValidationError::new(ERROR_CODE_RANGE, &self.message)
                    .with_param("min", self.min)
                    .with_param("max", self.max)
                    .with_param("actual", *value),
            )
        }
    }

    fn error_message(&self) -> &str {
        &self.message
    }
}

/// Applies an integer validator to text.
///
/// Text that is not a whole number passes; pair with [`Numeric`] and
/// [`WholeNumber`] to reject it.
#[derive(Debug, Clone)]
pub struct Parsed<V> {
    /// Validator for the parsed integer.
    pub inner: V,
}

impl<V> Parsed<V> {
    /// Create a new `Parsed` adapter.
    #[must_use]
    pub fn new(inner: V) -> Self {
        Self { inner }
    }
}

impl<V: Validator<i64>> Validator<str> for Parsed<V> {
    fn validate(&self, value: &str) -> ValidationResult {
        match parse_whole_number(value) {
            Some(n) => self.inner.validate(&n),
            None => ValidationResult::Valid,
        }
    }

    fn error_message(&self) -> &str {
        self.inner.error_message()
    }
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// Combines multiple validators with AND logic.
///
/// Validators run in order and the first failure wins.
pub struct All<T: ?Sized> {
    validators: Vec<Box<dyn Validator<T>>>,
}

impl<T: ?Sized> All<T> {
    /// Create a new `All` validator with the given validators.
    #[must_use]
    pub fn new(validators: Vec<Box<dyn Validator<T>>>) -> Self {
        Self { validators }
    }

    /// Number of chained validators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Whether the chain is empty (always valid).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl<T: ?Sized> Validator<T> for All<T> {
    fn validate(&self, value: &T) -> ValidationResult {
        for validator in &self.validators {
            let result = validator.validate(value);
            if result.is_invalid() {
                return result;
            }
        }
        ValidationResult::Valid
    }

    fn error_message(&self) -> &str {
        self.validators
            .first()
            .map_or("Validation failed", |v| v.error_message())
    }
}

impl<T: ?Sized> fmt::Debug for All<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("All")
            .field(
                "validators",
                &format!("[{} validators]", self.validators.len()),
            )
            .finish()
    }
}

// ---------------------------------------------------------------------------
// ValidatorBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for a first-failure-wins chain of string validators.
///
/// ```rust
/// use inputlab_validation::{MinLength, Required, Validator, ValidatorBuilder};
///
/// let username = ValidatorBuilder::<str>::new()
///     .custom(Required::new())
///     .custom(MinLength::new(3))
///     .build();
/// assert!(username.validate("alice").is_valid());
/// assert!(!username.validate("ab").is_valid());
/// ```
pub struct ValidatorBuilder<T: ?Sized> {
    validators: Vec<Box<dyn Validator<T>>>,
}

impl<T: ?Sized> Default for ValidatorBuilder<T> {
    fn default() -> Self {
        Self {
            validators: Vec::new(),
        }
    }
}

impl<T: ?Sized> ValidatorBuilder<T> {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append any validator.
    #[must_use]
    pub fn custom(mut self, validator: impl Validator<T> + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Finish the chain.
    #[must_use]
    pub fn build(self) -> All<T> {
        All::new(self.validators)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
