#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! Defaults reproduce the widget as shipped: names of 2–30 characters for
//! the greeting, 2–50 for the form, ages 13–120, and the remembered name
//! stored under `name_field`.

use inputlab_validation::{AgeRange, LengthLimits};

/// Default store key for the remembered greeting name.
pub const DEFAULT_STORE_KEY: &str = "name_field";

/// Environment variable overriding the store key.
pub const STORE_KEY_ENV: &str = "INPUTLAB_STORE_KEY";

/// Limits and keys used by [`LiveDemo`](crate::LiveDemo).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// Key the greeting name is stored under.
    pub store_key: String,
    /// Trimmed-length bounds for the greeting name.
    pub greeting_limits: LengthLimits,
    /// Trimmed-length bounds for the form's name field.
    pub form_name_limits: LengthLimits,
    /// Accepted ages.
    pub age_range: AgeRange,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            store_key: DEFAULT_STORE_KEY.to_string(),
            greeting_limits: LengthLimits::new(2, 30),
            form_name_limits: LengthLimits::new(2, 50),
            age_range: AgeRange::default(),
        }
    }
}

impl DemoConfig {
    /// Defaults, with the store key taken from `INPUTLAB_STORE_KEY` when set
    /// and non-blank.
    #[must_use]
    pub fn from_env() -> Self {
        let config = Self::default();
        match std::env::var(STORE_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => config.with_store_key(key.trim()),
            _ => config,
        }
    }

    /// Set the store key.
    #[must_use]
    pub fn with_store_key(mut self, key: impl Into<String>) -> Self {
        self.store_key = key.into();
        self
    }

    /// Set the greeting name bounds.
    #[must_use]
    pub fn with_greeting_limits(mut self, limits: LengthLimits) -> Self {
        self.greeting_limits = limits;
        self
    }

    /// Set the form name bounds.
    #[must_use]
    pub fn with_form_name_limits(mut self, limits: LengthLimits) -> Self {
        self.form_name_limits = limits;
        self
    }

    /// Set the accepted ages.
    #[must_use]
    pub fn with_age_range(mut self, range: AgeRange) -> Self {
        self.age_range = range;
        self
    }
}
