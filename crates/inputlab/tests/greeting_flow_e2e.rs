//! End-to-end tests for the greeting card running under the simulator with a
//! field store attached.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use inputlab::prelude::*;
use inputlab_runtime::state_persistence::{MemoryStorage, StorageBackend, StorageError, StorageResult};
use inputlab_runtime::CmdRecord;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn store_with(storage: &MemoryStorage) -> Arc<FieldStore> {
    let store = FieldStore::new(Box::new(storage.clone())).shared();
    store.load().expect("memory storage loads");
    store
}

#[test]
fn typed_name_survives_a_restart() {
    init_tracing();
    let storage = MemoryStorage::new();

    let mut first = ProgramSimulator::with_store(LiveDemo::default(), store_with(&storage));
    first.init();
    first.inject_event(Event::EditName("Grace".into()));
    assert_eq!(storage.peek("name_field").as_deref(), Some("Grace"));

    let mut second = ProgramSimulator::with_store(LiveDemo::default(), store_with(&storage));
    second.init();
    let snap = second.snapshot().greeting;
    assert_eq!(snap.name_input, "Grace");
    assert_eq!(snap.char_count, 5);
    assert_eq!(snap.greeting, None);
    assert!(
        second.command_log().contains(&CmdRecord::Restore {
            key: "name_field".into(),
            found: true
        })
    );
}

#[test]
fn raw_value_is_stored_untrimmed() {
    let storage = MemoryStorage::new();
    let mut sim = ProgramSimulator::with_store(LiveDemo::default(), store_with(&storage));
    sim.init();
    sim.inject_event(Event::EditName("  Ada  ".into()));
    assert_eq!(storage.peek("name_field").as_deref(), Some("  Ada  "));
}

#[test]
fn greeting_scenario() {
    let mut sim = ProgramSimulator::new(LiveDemo::default());
    sim.init();
    sim.inject_events(&[
        Event::Increment,
        Event::Increment,
        Event::Increment,
        Event::EditName("  Ada  ".into()),
        Event::SubmitName,
        Event::PickColor(Swatch::Blue),
    ]);

    let snap = sim.snapshot().greeting;
    assert_eq!(snap.counter, 3);
    assert_eq!(snap.greeting.as_deref(), Some("Hello, Ada!"));
    assert_eq!(snap.name_error, None);
    assert_eq!(snap.background, Swatch::Blue);
    assert_eq!(snap.background.hex(), "#60a5fa");
    assert!(sim.outputs().is_empty());
}

#[test]
fn short_name_is_rejected_then_cleared_by_edit() {
    let mut sim = ProgramSimulator::new(LiveDemo::default());
    sim.init();
    sim.inject_events(&[Event::EditName("A".into()), Event::SubmitName]);
    let snap = sim.snapshot().greeting;
    assert_eq!(
        snap.name_error.as_deref(),
        Some("Name must be at least 2 characters")
    );
    assert_eq!(snap.greeting, None);

    sim.inject_event(Event::EditName("Al".into()));
    let snap = sim.snapshot().greeting;
    assert_eq!(snap.name_error, None);
    assert_eq!(snap.greeting, None);
}

#[test]
fn reset_all_is_idempotent_and_forgets_the_name() {
    let storage = MemoryStorage::new();
    let mut sim = ProgramSimulator::with_store(LiveDemo::default(), store_with(&storage));
    sim.init();
    let pristine = sim.snapshot();

    sim.inject_events(&[
        Event::Increment,
        Event::EditName("Linus".into()),
        Event::SubmitName,
        Event::PickColor(Swatch::Amber),
        Event::ToggleMessage,
        Event::EditField(FieldId::Age, "44".into()),
    ]);
    assert!(storage.peek("name_field").is_some());

    sim.inject_event(Event::ResetAll);
    let once = sim.snapshot();
    sim.inject_event(Event::ResetAll);
    let twice = sim.snapshot();

    assert_eq!(once, twice);
    assert_eq!(once.greeting, pristine.greeting);
    assert_eq!(once.form.field(FieldId::Age).value, "44");
    assert_eq!(storage.peek("name_field"), None);
}

#[test]
fn clear_name_keeps_other_state() {
    let storage = MemoryStorage::new();
    let mut sim = ProgramSimulator::with_store(LiveDemo::default(), store_with(&storage));
    sim.init();
    sim.inject_events(&[
        Event::Increment,
        Event::PickColor(Swatch::Red),
        Event::EditName("Ada".into()),
        Event::ClearName,
    ]);
    let snap = sim.snapshot().greeting;
    assert_eq!(snap.name_input, "");
    assert_eq!(snap.counter, 1);
    assert_eq!(snap.background, Swatch::Red);
    assert_eq!(storage.peek("name_field"), None);
}

#[test]
fn custom_store_key_is_used() {
    let storage = MemoryStorage::new();
    let config = DemoConfig::default().with_store_key("greeting.name");
    let mut sim = ProgramSimulator::with_store(LiveDemo::new(config), store_with(&storage));
    sim.init();
    sim.inject_event(Event::EditName("Ada".into()));
    assert_eq!(storage.peek("greeting.name").as_deref(), Some("Ada"));
    assert_eq!(storage.peek("name_field"), None);
}

#[test]
fn reset_without_startup_load_forgets_stored_name() {
    let storage =
        MemoryStorage::with_entries(HashMap::from([("name_field".to_string(), "Ada".to_string())]));
    let store = FieldStore::new(Box::new(storage.clone())).shared();
    let mut sim = ProgramSimulator::with_store(LiveDemo::default(), Arc::clone(&store));
    sim.init();
    assert_eq!(sim.snapshot().greeting.name_input, "Ada");

    sim.inject_event(Event::ResetAll);
    assert_eq!(storage.peek("name_field"), None);
}

/// Memory backend that refuses the first read only.
struct SlowToWake {
    inner: MemoryStorage,
    woke: AtomicBool,
}

impl StorageBackend for SlowToWake {
    fn name(&self) -> &str {
        "SlowToWake"
    }

    fn load_all(&self) -> StorageResult<HashMap<String, String>> {
        if !self.woke.swap(true, Ordering::SeqCst) {
            return Err(StorageError::Unavailable("not ready".into()));
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
fn clear_after_failed_load_forgets_stored_name() {
    init_tracing();
    let storage =
        MemoryStorage::with_entries(HashMap::from([("name_field".to_string(), "Ada".to_string())]));
    let store = FieldStore::new(Box::new(SlowToWake {
        inner: storage.clone(),
        woke: AtomicBool::new(false),
    }))
    .shared();
    assert!(store.load().is_err());

    let mut sim = ProgramSimulator::with_store(LiveDemo::default(), store);
    sim.init();
    sim.inject_event(Event::ClearName);

    assert_eq!(sim.snapshot().greeting.name_input, "");
    assert_eq!(storage.peek("name_field"), None);
}

struct FullDisk;

impl StorageBackend for FullDisk {
    fn name(&self) -> &str {
        "FullDisk"
    }

    fn load_all(&self) -> StorageResult<HashMap<String, String>> {
        Err(StorageError::Unavailable("denied".into()))
    }

    fn save_all(&self, _entries: &HashMap<String, String>) -> StorageResult<()> {
        Err(StorageError::Unavailable("quota exceeded".into()))
    }

    fn clear(&self) -> StorageResult<()> {
        Err(StorageError::Unavailable("denied".into()))
    }
}

#[test]
fn store_failures_never_reach_the_user() {
    init_tracing();
    let store = FieldStore::new(Box::new(FullDisk)).shared();
    assert!(store.load().is_err());

    let mut sim = ProgramSimulator::with_store(LiveDemo::default(), store);
    sim.init();
    sim.inject_events(&[
        Event::EditName("Ada".into()),
        Event::SubmitName,
        Event::ClearName,
        Event::EditName("Bo".into()),
        Event::ResetAll,
    ]);

    let snap = sim.snapshot().greeting;
    assert_eq!(snap.name_input, "");
    assert_eq!(snap.counter, 0);
    assert_eq!(snap.name_error, None);
}
