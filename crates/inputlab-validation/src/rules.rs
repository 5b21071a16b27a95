#![forbid(unsafe_code)]

//! Ready-made rule chains for the widget's inputs.
//!
//! Each chain is first-failure-wins and reads only the value it is given.

use crate::validators::{
    All, Email, MaxLength, MinLength, Numeric, Parsed, Range, Required, ValidatorBuilder,
    WholeNumber,
};

/// Inclusive character-count bounds for a name input (measured after trimming).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthLimits {
    /// Fewest characters accepted.
    pub min: usize,
    /// Most characters accepted.
    pub max: usize,
}

impl LengthLimits {
    /// Create new bounds.
    #[must_use]
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Whether `len` falls inside the bounds.
    #[must_use]
    pub const fn contains(&self, len: usize) -> bool {
        len >= self.min && len <= self.max
    }
}

/// Inclusive integer bounds for the age input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeRange {
    /// Youngest accepted age.
    pub min: i64,
    /// Oldest accepted age.
    pub max: i64,
}

impl AgeRange {
    /// Create new bounds.
    #[must_use]
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Clamp `age` into the bounds.
    #[must_use]
    pub fn clamp(&self, age: i64) -> i64 {
        age.clamp(self.min, self.max)
    }
}

impl Default for AgeRange {
    fn default() -> Self {
        Self::new(13, 120)
    }
}

/// Greeting name: "Please enter your name", then the length bounds.
#[must_use]
pub fn greeting_name(limits: LengthLimits) -> All<str> {
    ValidatorBuilder::<str>::new()
        .custom(Required::new().with_message("Please enter your name"))
        .custom(name_min(limits.min))
        .custom(name_max(limits.max))
        .build()
}

/// Form name: "Name is required", then the length bounds.
#[must_use]
pub fn form_name(limits: LengthLimits) -> All<str> {
    ValidatorBuilder::<str>::new()
        .custom(Required::new().with_message("Name is required"))
        .custom(name_min(limits.min))
        .custom(name_max(limits.max))
        .build()
}

fn name_min(min: usize) -> MinLength {
    MinLength::new(min)
        .trimmed()
        .with_message("Name must be at least {min} characters")
}

fn name_max(max: usize) -> MaxLength {
    MaxLength::new(max)
        .trimmed()
        .with_message("Name must be at most {max} characters")
}

/// Age: required (only the empty string counts as missing), numeric, whole,
/// then in range.
#[must_use]
pub fn age(range: AgeRange) -> All<str> {
    ValidatorBuilder::<str>::new()
        .custom(
            Required::new()
                .allow_whitespace()
                .with_message("Age is required"),
        )
        .custom(Numeric::new().with_message("Age must be a number"))
        .custom(WholeNumber::new().with_message("Age must be a whole number"))
        .custom(Parsed::new(
            Range::new(range.min, range.max).with_message("Age must be between {min}–{max}"),
        ))
        .build()
}

/// Email: required after trimming, then `local@domain.tld`.
#[must_use]
pub fn email() -> All<str> {
    ValidatorBuilder::<str>::new()
        .custom(Required::new().with_message("Email is required"))
        .custom(Email::new().with_message("Enter a valid email address"))
        .build()
}
