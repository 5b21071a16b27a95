#![forbid(unsafe_code)]

//! The multi-field form: name, age and email with touched-gated errors and a
//! whole-form validity gate.
//!
//! Errors are never stored. Every read runs the field's rule chain against
//! its current raw value, so an error can only describe what is in the
//! field right now.
//!
//! # Invariants
//!
//! 1. A field's error depends only on that field's value.
//! 2. An error is *visible* only once the field is touched; validity ignores
//!    touched state.
//! 3. `touched` only moves false → true, except on reset.
//! 4. A submit attempt touches every field, whether or not it succeeds.

use std::fmt;

use inputlab_core::{debug, FieldId};
use inputlab_validation::{
    parse_whole_number, rules, AgeRange, All, LengthLimits, ValidationError, Validator,
};

/// Hint shown under a field with no visible error.
pub const LOOKS_GOOD: &str = "Looks good";

/// Hint shown under the submit button while the form is invalid.
pub const SUBMIT_HINT: &str = "All fields must be valid to submit.";

/// Values reported by a successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Submission {
    /// Trimmed name.
    pub name: String,
    /// Parsed age, clamped into the accepted range.
    pub age: i64,
    /// Trimmed email.
    pub email: String,
}

impl fmt::Display for Submission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Submitted!\nName: {}\nAge: {}\nEmail: {}",
            self.name, self.age, self.email
        )
    }
}

/// Current error (if any) of every field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldErrors {
    errors: [Option<ValidationError>; 3],
}

impl FieldErrors {
    /// Error for one field.
    #[must_use]
    pub fn get(&self, field: FieldId) -> Option<&ValidationError> {
        self.errors[field.index()].as_ref()
    }

    /// Whether no field has an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.iter().all(Option::is_none)
    }

    /// Fields with errors, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &ValidationError)> {
        FieldId::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|err| (field, err)))
    }
}

struct FormRules {
    name: All<str>,
    age: All<str>,
    email: All<str>,
}

impl FormRules {
    fn new(name_limits: LengthLimits, age_range: AgeRange) -> Self {
        Self {
            name: rules::form_name(name_limits),
            age: rules::age(age_range),
            email: rules::email(),
        }
    }

    fn for_field(&self, field: FieldId) -> &All<str> {
        match field {
            FieldId::Name => &self.name,
            FieldId::Age => &self.age,
            FieldId::Email => &self.email,
        }
    }
}

/// State of the multi-field form.
pub struct MultiFieldForm {
    values: [String; 3],
    touched: [bool; 3],
    name_limits: LengthLimits,
    age_range: AgeRange,
    rules: FormRules,
}

impl MultiFieldForm {
    /// Create an empty, untouched form.
    #[must_use]
    pub fn new(name_limits: LengthLimits, age_range: AgeRange) -> Self {
        Self {
            values: Default::default(),
            touched: [false; 3],
            name_limits,
            age_range,
            rules: FormRules::new(name_limits, age_range),
        }
    }

    /// Replace a field's raw value. Touched state is left alone.
    pub fn edit_field(&mut self, field: FieldId, raw: &str) {
        self.values[field.index()] = raw.to_string();
    }

    /// Mark a field as touched, revealing its error.
    pub fn blur_field(&mut self, field: FieldId) {
        self.touched[field.index()] = true;
    }

    /// Raw value of a field.
    #[must_use]
    pub fn value(&self, field: FieldId) -> &str {
        &self.values[field.index()]
    }

    /// Whether a field has been touched.
    #[must_use]
    pub fn is_touched(&self, field: FieldId) -> bool {
        self.touched[field.index()]
    }

    /// Whether any field has been touched.
    #[must_use]
    pub fn any_touched(&self) -> bool {
        self.touched.iter().any(|&t| t)
    }

    /// Current error of a field, regardless of touched state.
    #[must_use]
    pub fn error(&self, field: FieldId) -> Option<ValidationError> {
        self.rules
            .for_field(field)
            .validate(self.value(field))
            .error()
            .cloned()
    }

    /// Error message of a field, but only once it is touched.
    #[must_use]
    pub fn visible_error(&self, field: FieldId) -> Option<String> {
        if !self.is_touched(field) {
            return None;
        }
        self.error(field).map(|err| err.format_message())
    }

    /// Errors of all fields.
    #[must_use]
    pub fn errors(&self) -> FieldErrors {
        FieldErrors {
            errors: FieldId::ALL.map(|field| self.error(field)),
        }
    }

    /// Whether every field passes validation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        FieldId::ALL
            .into_iter()
            .all(|field| self.rules.for_field(field).validate(self.value(field)).is_valid())
    }

    /// Whether the submit button should be disabled.
    #[must_use]
    pub fn submit_disabled(&self) -> bool {
        !self.is_valid()
    }

    /// Character counter for the name field, such as `"2/50"`.
    #[must_use]
    pub fn name_counter(&self) -> String {
        format!(
            "{}/{}",
            self.value(FieldId::Name).trim().chars().count(),
            self.name_limits.max
        )
    }

    /// Attempt a submission.
    ///
    /// Every field becomes touched. When the form is valid the trimmed and
    /// parsed values are returned and the form resets; otherwise nothing
    /// else changes.
    pub fn submit(&mut self) -> Option<Submission> {
        self.touched = [true; 3];
        if !self.is_valid() {
            debug!(
                invalid = ?self.errors().iter().map(|(f, _)| f).collect::<Vec<_>>(),
                "form submit blocked"
            );
            return None;
        }

        let age = parse_whole_number(self.value(FieldId::Age))?;
        let submission = Submission {
            name: self.value(FieldId::Name).trim().to_string(),
            age: self.age_range.clamp(age),
            email: self.value(FieldId::Email).trim().to_string(),
        };
        self.reset();
        Some(submission)
    }

    /// Empty every field and clear touched flags.
    pub fn reset(&mut self) {
        self.values = Default::default();
        self.touched = [false; 3];
    }

    /// Read-only view for the presentation layer.
    #[must_use]
    pub fn snapshot(&self) -> FormSnapshot {
        let valid = self.is_valid();
        FormSnapshot {
            fields: FieldId::ALL.map(|field| {
                let error = self.error(field).map(|e| e.format_message());
                let visible_error = self.visible_error(field);
                FieldSnapshot {
                    id: field,
                    value: self.value(field).to_string(),
                    touched: self.is_touched(field),
                    hint: visible_error
                        .clone()
                        .unwrap_or_else(|| LOOKS_GOOD.to_string()),
                    error,
                    visible_error,
                }
            }),
            name_counter: self.name_counter(),
            is_valid: valid,
            submit_disabled: !valid,
            submit_hint: (!valid).then_some(SUBMIT_HINT),
        }
    }
}

impl fmt::Debug for MultiFieldForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiFieldForm")
            .field("values", &self.values)
            .field("touched", &self.touched)
            .field("name_limits", &self.name_limits)
            .field("age_range", &self.age_range)
            .finish_non_exhaustive()
    }
}

/// One form field as rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldSnapshot {
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_field_id"))]
    pub id: FieldId,
    pub value: String,
    pub touched: bool,
    /// Current error, visible or not.
    pub error: Option<String>,
    /// Error as shown to the user (requires `touched`).
    pub visible_error: Option<String>,
    /// The visible error or "Looks good".
    pub hint: String,
}

/// Everything the form card renders.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FormSnapshot {
    pub fields: [FieldSnapshot; 3],
    pub name_counter: String,
    pub is_valid: bool,
    pub submit_disabled: bool,
    pub submit_hint: Option<&'static str>,
}

impl FormSnapshot {
    /// Snapshot of one field.
    #[must_use]
    pub fn field(&self, field: FieldId) -> &FieldSnapshot {
        &self.fields[field.index()]
    }
}

#[cfg(feature = "serde")]
fn serialize_field_id<S: serde::Serializer>(field: &FieldId, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(field.as_str())
}
