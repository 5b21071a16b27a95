#![forbid(unsafe_code)]

//! The simple greeting flow: a counter, a validated name with a greeting,
//! a background color picker, and a message toggle.
//!
//! # State machine
//!
//! ```text
//!            submit_name (valid)          edit_name / clear_name
//!   Clean ──────────────────────▶ Greeting ─────────────────────▶ Clean
//!     │                                                            ▲
//!     │ submit_name (invalid)                                      │
//!     └──────────────────────────▶ Rejected ───────────────────────┘
//! ```
//!
//! The greeting and the error live in one [`NameOutcome`], so both can never
//! show at once.

use inputlab_core::Swatch;
use inputlab_validation::{
    rules, All, LengthLimits, ValidationError, ValidationResult, Validator,
};

/// Text shown while the message toggle is on.
pub const TOGGLED_MESSAGE: &str = "This message can be toggled!";

/// Result of the most recent name submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NameOutcome {
    /// Nothing submitted since the last edit.
    #[default]
    Clean,
    /// The name passed validation.
    Greeting(String),
    /// The name failed validation.
    Rejected(ValidationError),
}

/// State of the greeting card.
#[derive(Debug)]
pub struct GreetingFlow {
    counter: u64,
    name_input: String,
    outcome: NameOutcome,
    char_count: usize,
    background: Swatch,
    message_visible: bool,
    limits: LengthLimits,
    rules: All<str>,
}

impl GreetingFlow {
    /// Create a flow in its initial state.
    #[must_use]
    pub fn new(limits: LengthLimits) -> Self {
        Self {
            counter: 0,
            name_input: String::new(),
            outcome: NameOutcome::Clean,
            char_count: 0,
            background: Swatch::default(),
            message_visible: true,
            limits,
            rules: rules::greeting_name(limits),
        }
    }

    /// Seed the name from a previously stored value.
    ///
    /// Absent and empty values leave the name untouched.
    pub fn restore(&mut self, saved: Option<&str>) {
        if let Some(saved) = saved.filter(|s| !s.is_empty()) {
            self.name_input = saved.to_string();
            self.char_count = trimmed_len(saved);
        }
    }

    /// Add one to the counter.
    pub fn increment(&mut self) {
        self.counter = self.counter.saturating_add(1);
    }

    /// Replace the name input; any greeting or error is cleared.
    pub fn edit_name(&mut self, raw: &str) {
        self.name_input = raw.to_string();
        self.outcome = NameOutcome::Clean;
        self.char_count = trimmed_len(raw);
    }

    /// Validate the trimmed name and show either a greeting or an error.
    pub fn submit_name(&mut self) -> &NameOutcome {
        let trimmed = self.name_input.trim();
        self.outcome = match self.rules.validate(trimmed) {
            ValidationResult::Valid => NameOutcome::Greeting(format!("Hello, {trimmed}!")),
            ValidationResult::Invalid(err) => NameOutcome::Rejected(err),
        };
        &self.outcome
    }

    /// Empty the name input and drop any greeting or error.
    pub fn clear_name(&mut self) {
        self.name_input.clear();
        self.outcome = NameOutcome::Clean;
        self.char_count = 0;
    }

    /// Change the card background.
    pub fn pick_color(&mut self, color: Swatch) {
        self.background = color;
    }

    /// Show or hide the toggled message.
    pub fn toggle_message(&mut self) {
        self.message_visible = !self.message_visible;
    }

    /// Return every field to its initial value.
    pub fn reset_all(&mut self) {
        self.clear_name();
        self.counter = 0;
        self.background = Swatch::default();
        self.message_visible = true;
    }

    /// Current counter value.
    #[must_use]
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Raw, untrimmed name input.
    #[must_use]
    pub fn name_input(&self) -> &str {
        &self.name_input
    }

    /// Characters in the trimmed name.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.char_count
    }

    /// Outcome of the last submission.
    #[must_use]
    pub fn outcome(&self) -> &NameOutcome {
        &self.outcome
    }

    /// The greeting, if one is showing.
    #[must_use]
    pub fn greeting(&self) -> Option<&str> {
        match &self.outcome {
            NameOutcome::Greeting(text) => Some(text),
            _ => None,
        }
    }

    /// The name error, if one is showing.
    #[must_use]
    pub fn name_error(&self) -> Option<String> {
        match &self.outcome {
            NameOutcome::Rejected(err) => Some(err.format_message()),
            _ => None,
        }
    }

    /// Current background color.
    #[must_use]
    pub fn background(&self) -> Swatch {
        self.background
    }

    /// Whether the toggled message is shown.
    #[must_use]
    pub fn message_visible(&self) -> bool {
        self.message_visible
    }

    /// Whether "Say Hello" should be disabled.
    ///
    /// Independent of [`submit_name`](Self::submit_name): the gate blocks
    /// the button, it never produces text.
    #[must_use]
    pub fn say_hello_disabled(&self) -> bool {
        !self.limits.contains(trimmed_len(&self.name_input))
    }

    /// Status line under the name input.
    #[must_use]
    pub fn name_hint(&self) -> String {
        if let Some(err) = self.name_error() {
            err
        } else if self.say_hello_disabled() {
            format!("Enter {}–{} characters", self.limits.min, self.limits.max)
        } else {
            "Looks good".to_string()
        }
    }

    /// Character counter such as `"4/30"`.
    #[must_use]
    pub fn char_counter(&self) -> String {
        format!("{}/{}", self.char_count, self.limits.max)
    }

    /// Read-only view for the presentation layer.
    #[must_use]
    pub fn snapshot(&self) -> GreetingSnapshot {
        GreetingSnapshot {
            counter: self.counter,
            name_input: self.name_input.clone(),
            char_count: self.char_count,
            char_counter: self.char_counter(),
            greeting: self.greeting().map(str::to_string),
            name_error: self.name_error(),
            name_hint: self.name_hint(),
            say_hello_disabled: self.say_hello_disabled(),
            background: self.background,
            message_visible: self.message_visible,
            message: self.message_visible.then_some(TOGGLED_MESSAGE),
            toggle_label: if self.message_visible {
                "Hide Message"
            } else {
                "Show Message"
            },
        }
    }
}

fn trimmed_len(value: &str) -> usize {
    value.trim().chars().count()
}

/// Everything the greeting card renders.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GreetingSnapshot {
    pub counter: u64,
    pub name_input: String,
    pub char_count: usize,
    pub char_counter: String,
    pub greeting: Option<String>,
    pub name_error: Option<String>,
    pub name_hint: String,
    pub say_hello_disabled: bool,
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_swatch"))]
    pub background: Swatch,
    pub message_visible: bool,
    pub message: Option<&'static str>,
    pub toggle_label: &'static str,
}

#[cfg(feature = "serde")]
fn serialize_swatch<S: serde::Serializer>(swatch: &Swatch, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(swatch.hex())
}
