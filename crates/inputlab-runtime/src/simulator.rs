#![forbid(unsafe_code)]

//! Deterministic program simulator for testing.
//!
//! `ProgramSimulator` runs a [`Model`] without any presenter, enabling
//! deterministic event injection, snapshot capture, and effect inspection.
//!
//! # Example
//!
//! ```ignore
//! use inputlab_runtime::simulator::ProgramSimulator;
//!
//! let mut sim = ProgramSimulator::new(Counter { value: 0 });
//! sim.init();
//! sim.inject_event(Event::Increment);
//! assert_eq!(sim.model().value, 1);
//! ```

use crate::program::{Cmd, Model};
use crate::state_persistence::FieldStore;
use inputlab_core::event::Event;
use std::sync::Arc;

/// Record of a command that was executed during simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CmdRecord {
    /// No-op command.
    None,
    /// Message sent to model (not stored, just noted).
    Msg,
    /// Batch of commands.
    Batch(usize),
    /// Log message emitted.
    Log(String),
    /// Store write.
    Persist { key: String, value: String },
    /// Store removal.
    Forget { key: String },
    /// Store read.
    Restore { key: String, found: bool },
    /// Value handed to the presenter.
    Emit,
}

/// Deterministic simulator for [`Model`] testing.
pub struct ProgramSimulator<M: Model> {
    /// The application model.
    model: M,
    /// Record of all executed commands.
    command_log: Vec<CmdRecord>,
    /// Values emitted via `Cmd::Emit`.
    outputs: Vec<M::Output>,
    /// Log messages emitted via `Cmd::Log`.
    logs: Vec<String>,
    /// Optional field store for persistence integration.
    store: Option<Arc<FieldStore>>,
}

impl<M: Model> ProgramSimulator<M> {
    /// Create a new simulator with the given model.
    ///
    /// The model is not initialized until [`init`](Self::init) is called.
    pub fn new(model: M) -> Self {
        Self {
            model,
            command_log: Vec::new(),
            outputs: Vec::new(),
            logs: Vec::new(),
            store: None,
        }
    }

    /// Create a new simulator with the given model and field store.
    ///
    /// `Cmd::Persist`/`Cmd::Forget`/`Cmd::Restore` go through the store,
    /// mirroring runtime behavior. The store loads itself on first access.
    pub fn with_store(model: M, store: Arc<FieldStore>) -> Self {
        let mut sim = Self::new(model);
        sim.store = Some(store);
        sim
    }

    /// Initialize the model by calling `Model::init()` and executing returned commands.
    pub fn init(&mut self) {
        let cmd = self.model.init();
        self.execute_cmd(cmd);
    }

    /// Inject presentation events into the model.
    ///
    /// Each event is converted to a message via `From<Event>` and dispatched
    /// through `Model::update()`. Commands returned from update are executed.
    pub fn inject_events(&mut self, events: &[Event]) {
        for event in events {
            let msg = M::Message::from(event.clone());
            let cmd = self.model.update(msg);
            self.execute_cmd(cmd);
        }
    }

    /// Inject a single presentation event into the model.
    pub fn inject_event(&mut self, event: Event) {
        self.inject_events(&[event]);
    }

    /// Send a specific message to the model.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.execute_cmd(cmd);
    }

    /// Capture the current snapshot.
    pub fn snapshot(&self) -> M::Snapshot {
        self.model.view()
    }

    /// Get a reference to the model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Get a mutable reference to the model.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Values emitted so far, oldest first.
    pub fn outputs(&self) -> &[M::Output] {
        &self.outputs
    }

    /// Take and clear emitted values.
    pub fn drain_outputs(&mut self) -> Vec<M::Output> {
        std::mem::take(&mut self.outputs)
    }

    /// Get all log messages emitted via `Cmd::Log`.
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    /// Get the command execution log.
    pub fn command_log(&self) -> &[CmdRecord] {
        &self.command_log
    }

    /// Clear the command and log history.
    pub fn clear_logs(&mut self) {
        self.command_log.clear();
        self.logs.clear();
    }

    /// Execute a command without IO.
    fn execute_cmd(&mut self, cmd: Cmd<M::Message, M::Output>) {
        match cmd {
            Cmd::None => {
                self.command_log.push(CmdRecord::None);
            }
            Cmd::Batch(cmds) => {
                self.command_log.push(CmdRecord::Batch(cmds.len()));
                for c in cmds {
                    self.execute_cmd(c);
                }
            }
            Cmd::Msg(m) => {
                self.command_log.push(CmdRecord::Msg);
                let cmd = self.model.update(m);
                self.execute_cmd(cmd);
            }
            Cmd::Log(text) => {
                self.command_log.push(CmdRecord::Log(text.clone()));
                self.logs.push(text);
            }
            Cmd::Persist { key, value } => {
                if let Some(store) = &self.store {
                    store.persist(&key, &value);
                }
                self.command_log.push(CmdRecord::Persist { key, value });
            }
            Cmd::Forget { key } => {
                if let Some(store) = &self.store {
                    store.forget(&key);
                }
                self.command_log.push(CmdRecord::Forget { key });
            }
            Cmd::Restore { key, on_load } => {
                let value = self.store.as_ref().and_then(|s| s.get(&key));
                self.command_log.push(CmdRecord::Restore {
                    key,
                    found: value.is_some(),
                });
                let cmd = self.model.update(on_load(value));
                self.execute_cmd(cmd);
            }
            Cmd::Emit(output) => {
                self.command_log.push(CmdRecord::Emit);
                self.outputs.push(output);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo {
        text: String,
    }

    #[derive(Debug)]
    enum Msg {
        Text(String),
        Loaded(Option<String>),
        Shout,
        Other,
    }

    impl From<Event> for Msg {
        fn from(event: Event) -> Self {
            match event {
                Event::EditName(text) => Msg::Text(text),
                Event::SubmitName => Msg::Shout,
                _ => Msg::Other,
            }
        }
    }

    impl Model for Echo {
        type Message = Msg;
        type Output = String;
        type Snapshot = String;

        fn init(&mut self) -> Cmd<Msg, String> {
            Cmd::restore("echo", Msg::Loaded)
        }

        fn update(&mut self, msg: Msg) -> Cmd<Msg, String> {
            match msg {
                Msg::Text(text) => {
                    self.text = text;
                    Cmd::persist("echo", self.text.clone())
                }
                Msg::Loaded(value) => {
                    self.text = value.unwrap_or_default();
                    Cmd::none()
                }
                Msg::Shout => Cmd::batch(vec![
                    Cmd::log("shouting"),
                    Cmd::emit(self.text.to_uppercase()),
                ]),
                Msg::Other => Cmd::forget("echo"),
            }
        }

        fn view(&self) -> String {
            self.text.clone()
        }
    }

    #[test]
    fn records_commands_in_order() {
        let mut sim = ProgramSimulator::new(Echo {
            text: String::new(),
        });
        sim.init();
        sim.inject_event(Event::EditName("hi".into()));
        sim.inject_event(Event::SubmitName);

        assert_eq!(sim.snapshot(), "hi");
        assert_eq!(sim.outputs(), ["HI".to_string()]);
        assert_eq!(sim.logs(), ["shouting".to_string()]);
        assert_eq!(
            sim.command_log(),
            [
                CmdRecord::Restore {
                    key: "echo".into(),
                    found: false
                },
                CmdRecord::None,
                CmdRecord::Persist {
                    key: "echo".into(),
                    value: "hi".into()
                },
                CmdRecord::Batch(2),
                CmdRecord::Log("shouting".into()),
                CmdRecord::Emit,
            ]
        );
    }

    #[test]
    fn store_backed_simulation() {
        let store = FieldStore::in_memory().shared();
        store.set("echo", "remembered");

        let mut sim = ProgramSimulator::with_store(
            Echo {
                text: String::new(),
            },
            Arc::clone(&store),
        );
        sim.init();
        assert_eq!(sim.model().text, "remembered");

        sim.inject_event(Event::Increment);
        assert!(store.get("echo").is_none());
    }

    #[test]
    fn drain_outputs_empties_buffer() {
        let mut sim = ProgramSimulator::new(Echo {
            text: "x".into(),
        });
        sim.send(Msg::Shout);
        assert_eq!(sim.drain_outputs(), vec!["X".to_string()]);
        assert!(sim.outputs().is_empty());
        sim.clear_logs();
        assert!(sim.command_log().is_empty());
        sim.model_mut().text.clear();
        assert_eq!(sim.snapshot(), "");
    }
}
