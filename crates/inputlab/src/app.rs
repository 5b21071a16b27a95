#![forbid(unsafe_code)]

//! The live demo: both cards behind one [`Model`].
//!
//! Presentation events become [`Msg`]s; store effects and form submissions
//! leave the model as [`Cmd`]s so the runtime (or a simulator) decides how
//! they happen.

use inputlab_core::{debug, Event, FieldId, Swatch};
use inputlab_runtime::{Cmd, Model};

use crate::config::DemoConfig;
use crate::greeting::{GreetingFlow, GreetingSnapshot, NameOutcome};
use crate::multi_field::{FormSnapshot, MultiFieldForm, Submission};

/// Messages handled by [`LiveDemo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Increment,
    EditName(String),
    SubmitName,
    ClearName,
    PickColor(Swatch),
    ToggleMessage,
    ResetAll,
    EditField(FieldId, String),
    BlurField(FieldId),
    Submit,
    /// Stored greeting name, read once at startup.
    NameRestored(Option<String>),
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        match event {
            Event::Increment => Msg::Increment,
            Event::EditName(raw) => Msg::EditName(raw),
            Event::SubmitName => Msg::SubmitName,
            Event::ClearName => Msg::ClearName,
            Event::PickColor(color) => Msg::PickColor(color),
            Event::ToggleMessage => Msg::ToggleMessage,
            Event::ResetAll => Msg::ResetAll,
            Event::EditField(field, raw) => Msg::EditField(field, raw),
            Event::BlurField(field) => Msg::BlurField(field),
            Event::Submit => Msg::Submit,
        }
    }
}

/// Snapshot of both cards.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DemoSnapshot {
    pub greeting: GreetingSnapshot,
    pub form: FormSnapshot,
}

/// Greeting card and multi-field form, driven by one message stream.
#[derive(Debug)]
pub struct LiveDemo {
    greeting: GreetingFlow,
    form: MultiFieldForm,
    config: DemoConfig,
}

impl LiveDemo {
    /// Build the demo from a configuration.
    #[must_use]
    pub fn new(config: DemoConfig) -> Self {
        Self {
            greeting: GreetingFlow::new(config.greeting_limits),
            form: MultiFieldForm::new(config.form_name_limits, config.age_range),
            config,
        }
    }

    /// The greeting card.
    #[must_use]
    pub fn greeting(&self) -> &GreetingFlow {
        &self.greeting
    }

    /// The multi-field form.
    #[must_use]
    pub fn form(&self) -> &MultiFieldForm {
        &self.form
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    fn store_key(&self) -> String {
        self.config.store_key.clone()
    }
}

impl Default for LiveDemo {
    fn default() -> Self {
        Self::new(DemoConfig::default())
    }
}

impl Model for LiveDemo {
    type Message = Msg;
    type Output = Submission;
    type Snapshot = DemoSnapshot;

    fn init(&mut self) -> Cmd<Msg, Submission> {
        Cmd::restore(self.store_key(), Msg::NameRestored)
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg, Submission> {
        match msg {
            Msg::Increment => {
                self.greeting.increment();
                Cmd::none()
            }
            Msg::EditName(raw) => {
                self.greeting.edit_name(&raw);
                Cmd::persist(self.store_key(), raw)
            }
            Msg::SubmitName => {
                match self.greeting.submit_name() {
                    NameOutcome::Greeting(text) => debug!(greeting = %text, "name accepted"),
                    NameOutcome::Rejected(err) => debug!(code = err.code, "name rejected"),
                    NameOutcome::Clean => {}
                }
                Cmd::none()
            }
            Msg::ClearName => {
                self.greeting.clear_name();
                Cmd::forget(self.store_key())
            }
            Msg::PickColor(color) => {
                self.greeting.pick_color(color);
                Cmd::none()
            }
            Msg::ToggleMessage => {
                self.greeting.toggle_message();
                Cmd::none()
            }
            Msg::ResetAll => {
                self.greeting.reset_all();
                Cmd::forget(self.store_key())
            }
            Msg::EditField(field, raw) => {
                self.form.edit_field(field, &raw);
                Cmd::none()
            }
            Msg::BlurField(field) => {
                self.form.blur_field(field);
                Cmd::none()
            }
            Msg::Submit => match self.form.submit() {
                Some(submission) => {
                    debug!(name = %submission.name, age = submission.age, "form submitted");
                    Cmd::emit(submission)
                }
                None => Cmd::none(),
            },
            Msg::NameRestored(saved) => {
                debug!(found = saved.is_some(), "greeting name restored");
                self.greeting.restore(saved.as_deref());
                Cmd::none()
            }
        }
    }

    fn view(&self) -> DemoSnapshot {
        DemoSnapshot {
            greeting: self.greeting.snapshot(),
            form: self.form.snapshot(),
        }
    }
}
