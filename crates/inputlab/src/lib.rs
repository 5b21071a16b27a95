#![forbid(unsafe_code)]

//! Form-state and validation engine behind an interactive input widget.
//!
//! Two cards share one message stream:
//!
//! - [`GreetingFlow`]: a counter, a validated name that produces a greeting,
//!   a background color picker, and a message toggle. The raw name is
//!   remembered across sessions through the runtime's field store.
//! - [`MultiFieldForm`]: name, age and email fields whose errors appear once
//!   a field is touched, with submission gated on whole-form validity.
//!
//! [`LiveDemo`] implements [`Model`](inputlab_runtime::Model), so it runs
//! under [`Program`](inputlab_runtime::Program) with any presenter, or under
//! [`ProgramSimulator`](inputlab_runtime::ProgramSimulator) in tests.
//!
//! # Example
//!
//! ```rust
//! use inputlab::prelude::*;
//!
//! let mut sim = ProgramSimulator::new(LiveDemo::default());
//! sim.init();
//! sim.inject_events(&[
//!     Event::EditName("  Ada ".into()),
//!     Event::SubmitName,
//! ]);
//! assert_eq!(sim.snapshot().greeting.greeting.as_deref(), Some("Hello, Ada!"));
//! ```

pub mod app;
pub mod config;
pub mod greeting;
pub mod multi_field;

pub use app::{DemoSnapshot, LiveDemo, Msg};
pub use config::{DemoConfig, DEFAULT_STORE_KEY, STORE_KEY_ENV};
pub use greeting::{GreetingFlow, GreetingSnapshot, NameOutcome, TOGGLED_MESSAGE};
pub use multi_field::{
    FieldErrors, FieldSnapshot, FormSnapshot, MultiFieldForm, Submission, LOOKS_GOOD, SUBMIT_HINT,
};

pub use inputlab_core::{Event, FieldId, Swatch};

/// Everything needed to drive the demo.
pub mod prelude {
    pub use crate::{
        DemoConfig, DemoSnapshot, GreetingFlow, LiveDemo, MultiFieldForm, Msg, NameOutcome,
        Submission,
    };
    pub use inputlab_core::{Event, FieldId, Swatch};
    pub use inputlab_runtime::{
        Cmd, FieldStore, Model, PersistenceConfig, Presenter, Program, ProgramSimulator,
    };
}
