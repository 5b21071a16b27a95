#![forbid(unsafe_code)]

//! Runtime for inputlab models: the Elm-style program loop, a deterministic
//! simulator for tests, and durable field storage.

pub mod program;
pub mod simulator;
pub mod state_persistence;

pub use program::{Cmd, Model, PersistenceConfig, Presenter, Program};
pub use simulator::{CmdRecord, ProgramSimulator};
#[cfg(feature = "state-persistence")]
pub use state_persistence::FileStorage;
pub use state_persistence::{FieldStore, MemoryStorage, StorageBackend, StorageError, StorageResult};
