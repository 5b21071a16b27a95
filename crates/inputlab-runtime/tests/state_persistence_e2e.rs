//! Field store end-to-end tests.
//!
//! # Invariants
//!
//! 1. **Round-trip integrity**: a value persisted in one session is restored
//!    in the next.
//! 2. **Removal is durable**: a forgotten key stays gone after restart.
//! 3. **Graceful degradation**: corrupt or unreadable storage yields an
//!    error from `load`, never a panic, and the program still runs.
//! 4. **Late loading**: a skipped or failed startup load never hides stored
//!    values or turns a later removal into a no-op.
//! 5. **Concurrent safety**: a shared store can be written from many threads.

use inputlab_core::event::Event;
use inputlab_runtime::program::{Cmd, Model, PersistenceConfig, Presenter, Program};
use inputlab_runtime::state_persistence::{
    FieldStore, MemoryStorage, StorageBackend, StorageError, StorageResult,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

// ============================================================================
// Test Utilities
// ============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
struct Remember {
    name: String,
}

#[derive(Debug)]
enum Msg {
    Type(String),
    Clear,
    Loaded(Option<String>),
    Ignore,
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        match event {
            Event::EditName(text) => Msg::Type(text),
            Event::ClearName => Msg::Clear,
            _ => Msg::Ignore,
        }
    }
}

impl Model for Remember {
    type Message = Msg;
    type Output = ();
    type Snapshot = String;

    fn init(&mut self) -> Cmd<Msg> {
        Cmd::restore("name_field", Msg::Loaded)
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::Type(text) => {
                self.name = text;
                Cmd::persist("name_field", self.name.clone())
            }
            Msg::Clear => {
                self.name.clear();
                Cmd::forget("name_field")
            }
            Msg::Loaded(value) => {
                self.name = value.unwrap_or_default();
                Cmd::none()
            }
            Msg::Ignore => Cmd::none(),
        }
    }

    fn view(&self) -> String {
        self.name.clone()
    }
}

#[derive(Default)]
struct LastFrame(String);

impl Presenter<String, ()> for LastFrame {
    fn render(&mut self, snapshot: &String) {
        self.0.clone_from(snapshot);
    }

    fn deliver(&mut self, _output: ()) {}
}

fn session(storage: &MemoryStorage) -> Program<Remember, LastFrame> {
    let store = FieldStore::new(Box::new(storage.clone())).shared();
    let mut program = Program::new(Remember::default(), LastFrame::default())
        .with_persistence(PersistenceConfig::with_store(store));
    program.init();
    program
}

// ============================================================================
// 1. Save/Restore Cycle
// ============================================================================

#[test]
fn value_survives_restart() {
    init_tracing();
    let storage = MemoryStorage::new();
    let mut first = session(&storage);
    first.dispatch(Event::EditName("Ada".into()));
    drop(first);

    let second = session(&storage);
    assert_eq!(second.presenter().0, "Ada");
}

#[test]
fn forgotten_value_stays_gone() {
    let storage = MemoryStorage::new();
    let mut first = session(&storage);
    first.dispatch(Event::EditName("Ada".into()));
    first.dispatch(Event::ClearName);
    assert_eq!(storage.peek("name_field"), None);

    let second = session(&storage);
    assert_eq!(second.presenter().0, "");
}

fn seeded(name: &str) -> MemoryStorage {
    MemoryStorage::with_entries(HashMap::from([("name_field".to_string(), name.to_string())]))
}

fn lazy_session(storage: &MemoryStorage) -> Program<Remember, LastFrame> {
    let store = FieldStore::new(Box::new(storage.clone())).shared();
    let mut program = Program::new(Remember::default(), LastFrame::default())
        .with_persistence(PersistenceConfig::with_store(store).auto_load(false));
    program.init();
    program
}

#[test]
fn auto_load_disabled_still_restores() {
    let storage = seeded("Ada");
    let program = lazy_session(&storage);
    assert_eq!(program.presenter().0, "Ada");
}

#[test]
fn auto_load_disabled_clear_reaches_backend() {
    let storage = seeded("Ada");
    let mut program = lazy_session(&storage);
    program.dispatch(Event::ClearName);
    assert_eq!(storage.peek("name_field"), None);

    let next = session(&storage);
    assert_eq!(next.presenter().0, "");
}

/// Backend whose first read fails; later reads and all writes work.
struct ColdStart {
    inner: MemoryStorage,
    reads: AtomicUsize,
}

impl StorageBackend for ColdStart {
    fn name(&self) -> &str {
        "ColdStart"
    }

    fn load_all(&self) -> StorageResult<HashMap<String, String>> {
        if self.reads.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(StorageError::Unavailable("device busy".into()));
        }
        self.inner.load_all()
    }

    fn save_all(&self, entries: &HashMap<String, String>) -> StorageResult<()> {
        self.inner.save_all(entries)
    }

    fn clear(&self) -> StorageResult<()> {
        self.inner.clear()
    }
}

#[test]
fn clear_after_failed_startup_load_reaches_backend() {
    init_tracing();
    let storage = seeded("Ada");
    let store = FieldStore::new(Box::new(ColdStart {
        inner: storage.clone(),
        reads: AtomicUsize::new(0),
    }))
    .shared();
    let mut program = Program::new(Remember::default(), LastFrame::default())
        .with_persistence(PersistenceConfig::with_store(store));
    program.init();
    // The retried read inside the restore still finds the stored name.
    assert_eq!(program.presenter().0, "Ada");

    program.dispatch(Event::ClearName);
    assert_eq!(storage.peek("name_field"), None);
}

// ============================================================================
// 2. File Storage
// ============================================================================

#[cfg(feature = "state-persistence")]
mod file {
    use super::*;
    use inputlab_runtime::state_persistence::FileStorage;

    fn file_session(path: &std::path::Path) -> Program<Remember, LastFrame> {
        let store = FieldStore::with_file(path).shared();
        let mut program = Program::new(Remember::default(), LastFrame::default())
            .with_persistence(PersistenceConfig::with_store(store));
        program.init();
        program
    }

    #[test]
    fn file_round_trip_across_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        file_session(&path).dispatch(Event::EditName("Grace Hopper".into()));
        assert!(path.exists());

        let restored = file_session(&path);
        assert_eq!(restored.presenter().0, "Grace Hopper");
    }

    #[test]
    fn corrupt_file_degrades_to_empty() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(FileStorage::new(&path).load_all().is_err());

        let mut program = file_session(&path);
        assert_eq!(program.presenter().0, "");
        program.dispatch(Event::EditName("Ada".into()));
        // A successful write replaces the corrupt file.
        assert_eq!(
            FileStorage::new(&path)
                .load_all()
                .unwrap()
                .get("name_field")
                .map(String::as_str),
            Some("Ada")
        );
    }
}

// ============================================================================
// 3. Concurrency
// ============================================================================

#[test]
fn shared_store_accepts_concurrent_writes() {
    let storage = MemoryStorage::new();
    let store = FieldStore::new(Box::new(storage.clone())).shared();
    let barrier = Arc::new(Barrier::new(4));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for n in 0..25 {
                    store.persist(&format!("field_{i}"), &n.to_string());
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let stored = storage.load_all().unwrap();
    assert_eq!(stored.len(), 4);
    for i in 0..4 {
        assert_eq!(stored.get(&format!("field_{i}")).map(String::as_str), Some("24"));
    }
}
