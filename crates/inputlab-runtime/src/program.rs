#![forbid(unsafe_code)]

//! Program runtime implementing the Elm architecture.
//!
//! A [`Model`] owns application state, turns messages into state transitions
//! in [`Model::update`], and exposes a read-only snapshot through
//! [`Model::view`]. Side effects never happen inside `update`; they are
//! returned as [`Cmd`] values and carried out by the [`Program`].
//!
//! # Example
//!
//! ```ignore
//! use inputlab_runtime::program::{Cmd, Model, Program};
//!
//! struct Counter { count: i32 }
//!
//! enum Msg { Increment, Ignore }
//!
//! impl From<Event> for Msg {
//!     fn from(event: Event) -> Self {
//!         match event {
//!             Event::Increment => Msg::Increment,
//!             _ => Msg::Ignore,
//!         }
//!     }
//! }
//!
//! impl Model for Counter {
//!     type Message = Msg;
//!     type Output = ();
//!     type Snapshot = i32;
//!
//!     fn update(&mut self, msg: Msg) -> Cmd<Msg> {
//!         if let Msg::Increment = msg { self.count += 1; }
//!         Cmd::none()
//!     }
//!
//!     fn view(&self) -> i32 { self.count }
//! }
//! ```
//!
//! # Event loop
//!
//! The runtime is single-threaded and cooperative: each event is dispatched
//! to completion (including every command it produces) before the next one
//! is accepted, and the presenter re-renders once per event.

use std::fmt;
use std::sync::Arc;

use inputlab_core::event::Event;

use crate::state_persistence::FieldStore;

/// The Model trait defines application state and behavior.
pub trait Model: Sized {
    /// The message type for this model.
    ///
    /// Messages represent actions that update the model state.
    /// Must be convertible from presentation events.
    type Message: From<Event> + Send + 'static;

    /// Values handed to the presenter through `Cmd::Emit`.
    type Output: fmt::Debug;

    /// Read-only view of the state handed to the presenter.
    type Snapshot;

    /// Initialize the model with startup commands.
    ///
    /// Called once when the program starts. Return commands to execute
    /// initial side effects like restoring stored fields.
    fn init(&mut self) -> Cmd<Self::Message, Self::Output> {
        Cmd::none()
    }

    /// Update the model in response to a message.
    ///
    /// This is the core state transition function. Returns commands
    /// for any side effects that should be executed.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message, Self::Output>;

    /// Produce the snapshot the presenter renders.
    fn view(&self) -> Self::Snapshot;
}

/// Callback that turns a restored value into a message.
pub type RestoreFn<M> = Box<dyn FnOnce(Option<String>) -> M + Send>;

/// Commands represent side effects to be executed by the runtime.
///
/// Commands are returned from `init()` and `update()`.
#[derive(Default)]
pub enum Cmd<M, O = ()> {
    /// No operation.
    #[default]
    None,
    /// Execute multiple commands in order.
    Batch(Vec<Cmd<M, O>>),
    /// Send a message to the model.
    Msg(M),
    /// Write a log line through the presenter.
    Log(String),
    /// Write a value through to the field store.
    ///
    /// Fire-and-forget: failures are logged and never reach the model.
    Persist {
        /// Store key.
        key: String,
        /// Value to store.
        value: String,
    },
    /// Remove a value from the field store.
    Forget {
        /// Store key.
        key: String,
    },
    /// Read a value from the field store and send it back as a message.
    ///
    /// Without a configured store the callback receives `None`.
    Restore {
        /// Store key.
        key: String,
        /// Builds the message carrying the stored value.
        on_load: RestoreFn<M>,
    },
    /// Hand a value to the presenter.
    Emit(O),
}

impl<M: fmt::Debug, O: fmt::Debug> fmt::Debug for Cmd<M, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Batch(cmds) => f.debug_tuple("Batch").field(cmds).finish(),
            Self::Msg(m) => f.debug_tuple("Msg").field(m).finish(),
            Self::Log(s) => f.debug_tuple("Log").field(s).finish(),
            Self::Persist { key, value } => f
                .debug_struct("Persist")
                .field("key", key)
                .field("value", value)
                .finish(),
            Self::Forget { key } => f.debug_struct("Forget").field("key", key).finish(),
            Self::Restore { key, .. } => f.debug_struct("Restore").field("key", key).finish(),
            Self::Emit(o) => f.debug_tuple("Emit").field(o).finish(),
        }
    }
}

impl<M, O> Cmd<M, O> {
    /// Create a no-op command.
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    /// Create a message command.
    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    /// Create a log command.
    #[inline]
    pub fn log(msg: impl Into<String>) -> Self {
        Self::Log(msg.into())
    }

    /// Create a store write command.
    #[inline]
    pub fn persist(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Persist {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a store removal command.
    #[inline]
    pub fn forget(key: impl Into<String>) -> Self {
        Self::Forget { key: key.into() }
    }

    /// Create a store read command.
    pub fn restore<F>(key: impl Into<String>, on_load: F) -> Self
    where
        F: FnOnce(Option<String>) -> M + Send + 'static,
    {
        Self::Restore {
            key: key.into(),
            on_load: Box::new(on_load),
        }
    }

    /// Create an emit command.
    #[inline]
    pub fn emit(output: O) -> Self {
        Self::Emit(output)
    }

    /// Create a batch of commands.
    ///
    /// Empty batches collapse to `None` and single-element batches unwrap.
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.remove(0),
            _ => Self::Batch(cmds),
        }
    }

    /// Whether this is the no-op command.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Count of leaf commands (batches are flattened, `None` counts zero).
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Batch(cmds) => cmds.iter().map(Self::count).sum(),
            _ => 1,
        }
    }

    /// Short name of the variant, for logs.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Batch(_) => "Batch",
            Self::Msg(_) => "Msg",
            Self::Log(_) => "Log",
            Self::Persist { .. } => "Persist",
            Self::Forget { .. } => "Forget",
            Self::Restore { .. } => "Restore",
            Self::Emit(_) => "Emit",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Presenter
// ─────────────────────────────────────────────────────────────────────────────

/// The presentation layer the program drives.
///
/// A presenter draws whatever snapshot it is given and receives emitted
/// values (notifications, submissions). It never mutates the model; user
/// input flows back through [`Program::dispatch`].
pub trait Presenter<S, O> {
    /// Draw the current snapshot.
    fn render(&mut self, snapshot: &S);

    /// Receive a value from `Cmd::Emit`.
    fn deliver(&mut self, output: O);

    /// Receive a line from `Cmd::Log`.
    fn log(&mut self, line: &str) {
        tracing::info!(target: "inputlab::program", "{line}");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for field persistence in the program runtime.
#[derive(Clone)]
pub struct PersistenceConfig {
    /// Field store. If None, persistence is disabled.
    pub store: Option<Arc<FieldStore>>,
    /// Load the store eagerly before `Model::init`. When off, the store
    /// loads itself on first access.
    pub auto_load: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            store: None,
            auto_load: true,
        }
    }
}

impl fmt::Debug for PersistenceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistenceConfig")
            .field("store", &self.store.as_ref().map(|s| s.backend_name()))
            .field("auto_load", &self.auto_load)
            .finish()
    }
}

impl PersistenceConfig {
    /// Create a disabled persistence config.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Create a persistence config with the given store.
    #[must_use]
    pub fn with_store(store: Arc<FieldStore>) -> Self {
        Self {
            store: Some(store),
            ..Default::default()
        }
    }

    /// Enable or disable the eager load on start.
    #[must_use]
    pub fn auto_load(mut self, enabled: bool) -> Self {
        self.auto_load = enabled;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Program
// ─────────────────────────────────────────────────────────────────────────────

/// Drives a [`Model`] against a [`Presenter`] and an optional field store.
pub struct Program<M: Model, P> {
    model: M,
    presenter: P,
    persistence: PersistenceConfig,
    initialized: bool,
}

impl<M, P> Program<M, P>
where
    M: Model,
    P: Presenter<M::Snapshot, M::Output>,
{
    /// Create a program without persistence.
    pub fn new(model: M, presenter: P) -> Self {
        Self {
            model,
            presenter,
            persistence: PersistenceConfig::disabled(),
            initialized: false,
        }
    }

    /// Attach persistence.
    #[must_use]
    pub fn with_persistence(mut self, persistence: PersistenceConfig) -> Self {
        self.persistence = persistence;
        self
    }

    /// Load the store (if configured), run `Model::init`, and render.
    ///
    /// Calling this more than once has no further effect.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        if self.persistence.auto_load
            && let Some(store) = &self.persistence.store
            && let Err(error) = store.load()
        {
            tracing::warn!(backend = %store.backend_name(), %error, "failed to load field store");
        }

        let cmd = self.model.init();
        self.execute_cmd(cmd);
        self.render();
    }

    /// Handle one presentation event to completion, then re-render.
    pub fn dispatch(&mut self, event: Event) {
        tracing::trace!(?event, "dispatch");
        self.send(M::Message::from(event));
    }

    /// Send a message directly to the model, then re-render.
    pub fn send(&mut self, msg: M::Message) {
        if !self.initialized {
            self.init();
        }
        let cmd = self.model.update(msg);
        self.execute_cmd(cmd);
        self.render();
    }

    /// Get a reference to the model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Get a reference to the presenter.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Get a mutable reference to the presenter.
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Consume the program, returning the model and presenter.
    pub fn into_parts(self) -> (M, P) {
        (self.model, self.presenter)
    }

    fn render(&mut self) {
        let snapshot = self.model.view();
        self.presenter.render(&snapshot);
    }

    fn execute_cmd(&mut self, cmd: Cmd<M::Message, M::Output>) {
        match cmd {
            Cmd::None => {}
            Cmd::Batch(cmds) => {
                for c in cmds {
                    self.execute_cmd(c);
                }
            }
            Cmd::Msg(m) => {
                let cmd = self.model.update(m);
                self.execute_cmd(cmd);
            }
            Cmd::Log(line) => self.presenter.log(&line),
            Cmd::Persist { key, value } => {
                if let Some(store) = &self.persistence.store {
                    store.persist(&key, &value);
                }
            }
            Cmd::Forget { key } => {
                if let Some(store) = &self.persistence.store {
                    store.forget(&key);
                }
            }
            Cmd::Restore { key, on_load } => {
                let value = self.persistence.store.as_ref().and_then(|s| s.get(&key));
                let cmd = self.model.update(on_load(value));
                self.execute_cmd(cmd);
            }
            Cmd::Emit(output) => {
                tracing::debug!(?output, "emit");
                self.presenter.deliver(output);
            }
        }
    }
}

impl<M: Model, P> fmt::Debug for Program<M, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program")
            .field("persistence", &self.persistence)
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}
