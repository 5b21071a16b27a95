//! Durable field storage for values that survive across sessions.
//!
//! This module provides the [`FieldStore`] and [`StorageBackend`] infrastructure
//! the runtime uses to carry out `Cmd::Persist`, `Cmd::Forget`, and
//! `Cmd::Restore`.
//!
//! # Layers
//!
//! ```text
//!   Cmd::Persist / Cmd::Forget / Cmd::Restore
//!                 │
//!            FieldStore        key → String cache, dirty flag
//!                 │ load / flush
//!          dyn StorageBackend
//!        ├── MemoryStorage     shared map, tests and ephemeral sessions
//!        └── FileStorage       versioned JSON document (state-persistence)
//! ```
//!
//! A flush always writes the whole map. Writes go to a sibling `.tmp` file
//! that is renamed over the target, so a crash leaves either the old or the
//! new document.
//!
//! Storage trouble never panics. `load`, `flush` and `clear` report a
//! [`StorageError`]; `persist` and `forget` log it at `warn` and keep the
//! cache updated, so the current session still reads back what it wrote.
//! An unknown `format_version` on disk is treated as an empty store.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error during file operations.
    Io(std::io::Error),
    /// Serialization or deserialization error.
    #[cfg(feature = "state-persistence")]
    Serialization(String),
    /// Storage is corrupted or a lock was poisoned.
    Corruption(String),
    /// Backend is not available (quota exceeded, private mode, read-only).
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "state-persistence")]
            StorageError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            StorageError::Corruption(msg) => write!(f, "storage corruption: {msg}"),
            StorageError::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            #[cfg(feature = "state-persistence")]
            StorageError::Serialization(_) => None,
            StorageError::Corruption(_) => None,
            StorageError::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// ─────────────────────────────────────────────────────────────────────────────
// Storage Backend Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for pluggable field storage backends.
///
/// Implementations must be thread-safe (`Send + Sync`) so a store can be
/// shared behind an `Arc`.
pub trait StorageBackend: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Load all stored entries.
    ///
    /// Returns an empty map if nothing has been stored yet (first run).
    fn load_all(&self) -> StorageResult<HashMap<String, String>>;

    /// Save all entries atomically, replacing what was stored.
    fn save_all(&self, entries: &HashMap<String, String>) -> StorageResult<()>;

    /// Clear all stored entries.
    fn clear(&self) -> StorageResult<()>;

    /// Check if the backend is available and functional.
    fn is_available(&self) -> bool {
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory Storage (always available)
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory storage backend for testing and ephemeral state.
///
/// Cloning shares the underlying map, so a test can keep a handle and
/// inspect what the runtime wrote.
#[derive(Default, Clone)]
pub struct MemoryStorage {
    data: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create memory storage pre-populated with entries.
    #[must_use]
    pub fn with_entries(entries: HashMap<String, String>) -> Self {
        Self {
            data: Arc::new(RwLock::new(entries)),
        }
    }

    /// Read one stored value directly, bypassing any cache.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<String> {
        self.data.read().ok()?.get(key).cloned()
    }
}

impl StorageBackend for MemoryStorage {
    fn name(&self) -> &str {
        "MemoryStorage"
    }

    fn load_all(&self) -> StorageResult<HashMap<String, String>> {
        let guard = self
            .data
            .read()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        Ok(guard.clone())
    }

    fn save_all(&self, entries: &HashMap<String, String>) -> StorageResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        *guard = entries.clone();
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        guard.clear();
        Ok(())
    }
}

impl fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.data.read().map(|g| g.len()).unwrap_or(0);
        f.debug_struct("MemoryStorage")
            .field("entries", &count)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Storage (requires state-persistence feature)
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "state-persistence")]
mod file_storage {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::fs::{self, File};
    use std::io::{BufReader, BufWriter, Write};
    use std::path::{Path, PathBuf};

    /// File format for stored fields (JSON).
    #[derive(Serialize, Deserialize)]
    struct StoreFile {
        /// Format version for future migrations.
        format_version: u32,
        /// Map of key -> value.
        entries: HashMap<String, String>,
    }

    impl StoreFile {
        const FORMAT_VERSION: u32 = 1;
    }

    /// File-based storage backend using JSON.
    ///
    /// # File Format
    ///
    /// ```json
    /// {
    ///   "format_version": 1,
    ///   "entries": {
    ///     "name_field": "Ada"
    ///   }
    /// }
    /// ```
    ///
    /// # Atomic Writes
    ///
    /// Writes use a temporary file + rename pattern to prevent corruption:
    /// 1. Write to `{path}.tmp`
    /// 2. Flush and sync
    /// 3. Rename `{path}.tmp` -> `{path}`
    pub struct FileStorage {
        path: PathBuf,
    }

    impl FileStorage {
        /// Create a file storage at the given path.
        ///
        /// The file does not need to exist; it will be created on first save.
        #[must_use]
        pub fn new(path: impl AsRef<Path>) -> Self {
            Self {
                path: path.as_ref().to_path_buf(),
            }
        }

        /// Create storage at the default location for the application.
        ///
        /// Uses `$XDG_STATE_HOME/inputlab/{app_name}/state.json`, falling back
        /// to `~/.local/state` and then the current directory.
        #[must_use]
        pub fn default_for_app(app_name: &str) -> Self {
            let base = dirs_or_fallback();
            let path = base.join("inputlab").join(app_name).join("state.json");
            Self { path }
        }

        /// Location of the backing file.
        #[must_use]
        pub fn path(&self) -> &Path {
            &self.path
        }

        fn temp_path(&self) -> PathBuf {
            let mut tmp = self.path.clone();
            tmp.set_extension("json.tmp");
            tmp
        }
    }

    fn dirs_or_fallback() -> PathBuf {
        if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
            return PathBuf::from(state_home);
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".local").join("state");
        }
        PathBuf::from(".")
    }

    impl StorageBackend for FileStorage {
        fn name(&self) -> &str {
            "FileStorage"
        }

        fn load_all(&self) -> StorageResult<HashMap<String, String>> {
            if !self.path.exists() {
                return Ok(HashMap::new());
            }

            let file = File::open(&self.path)?;
            let reader = BufReader::new(file);

            let store_file: StoreFile = serde_json::from_reader(reader).map_err(|e| {
                StorageError::Serialization(format!("failed to parse store file: {e}"))
            })?;

            if store_file.format_version != StoreFile::FORMAT_VERSION {
                tracing::warn!(
                    stored = store_file.format_version,
                    expected = StoreFile::FORMAT_VERSION,
                    "store file format version mismatch, ignoring stored fields"
                );
                return Ok(HashMap::new());
            }

            Ok(store_file.entries)
        }

        fn save_all(&self, entries: &HashMap<String, String>) -> StorageResult<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }

            let store_file = StoreFile {
                format_version: StoreFile::FORMAT_VERSION,
                entries: entries.clone(),
            };

            let tmp_path = self.temp_path();
            {
                let file = File::create(&tmp_path)?;
                let mut writer = BufWriter::new(file);
                serde_json::to_writer_pretty(&mut writer, &store_file).map_err(|e| {
                    StorageError::Serialization(format!("failed to serialize fields: {e}"))
                })?;
                writer.flush()?;
                writer.get_ref().sync_all()?;
            }

            fs::rename(&tmp_path, &self.path)?;

            tracing::debug!(
                path = %self.path.display(),
                entries = entries.len(),
                "saved fields"
            );

            Ok(())
        }

        fn clear(&self) -> StorageResult<()> {
            if self.path.exists() {
                fs::remove_file(&self.path)?;
            }
            Ok(())
        }

        fn is_available(&self) -> bool {
            if let Some(parent) = self.path.parent() {
                if !parent.exists() {
                    return std::fs::create_dir_all(parent).is_ok();
                }
                let test_path = parent.join(".inputlab_test_write");
                if std::fs::write(&test_path, b"test").is_ok() {
                    let _ = std::fs::remove_file(&test_path);
                    return true;
                }
            }
            false
        }
    }

    impl fmt::Debug for FileStorage {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("FileStorage")
                .field("path", &self.path)
                .finish()
        }
    }
}

#[cfg(feature = "state-persistence")]
pub use file_storage::FileStorage;

// ─────────────────────────────────────────────────────────────────────────────
// Field Store
// ─────────────────────────────────────────────────────────────────────────────

/// Keyed string store backing the runtime's persistence commands.
///
/// The store keeps an in-memory cache and delegates to a [`StorageBackend`].
/// [`persist`](Self::persist) and [`forget`](Self::forget) write through
/// immediately and swallow failures, which is what a model's effects need.
/// The checked operations (`load`, `flush`, `clear`) return errors.
///
/// Until a load has succeeded, [`get`](Self::get), `persist` and `forget`
/// retry it first, so a skipped or failed startup read neither hides stored
/// values nor turns a later removal into a no-op.
///
/// # Example
///
/// ```
/// use inputlab_runtime::state_persistence::FieldStore;
///
/// let store = FieldStore::in_memory();
/// store.persist("name_field", "Ada");
/// assert_eq!(store.get("name_field").as_deref(), Some("Ada"));
///
/// store.forget("name_field");
/// assert!(store.get("name_field").is_none());
/// ```
pub struct FieldStore {
    backend: Box<dyn StorageBackend>,
    cache: RwLock<HashMap<String, String>>,
    dirty: RwLock<bool>,
    loaded: AtomicBool,
}

impl FieldStore {
    /// Create a new store with the given storage backend.
    ///
    /// Nothing is read until [`load`](Self::load) or the first access.
    #[must_use]
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self {
            backend,
            cache: RwLock::new(HashMap::new()),
            dirty: RwLock::new(false),
            loaded: AtomicBool::new(false),
        }
    }

    /// Create a store with memory storage (ephemeral, for testing).
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::new()))
    }

    /// Create a store with file storage at the given path.
    #[cfg(feature = "state-persistence")]
    #[must_use]
    pub fn with_file(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(Box::new(FileStorage::new(path)))
    }

    /// Load all entries from the storage backend, replacing the cache.
    pub fn load(&self) -> StorageResult<usize> {
        let entries = self.backend.load_all()?;
        let count = entries.len();

        let mut cache = self
            .cache
            .write()
            .map_err(|_| StorageError::Corruption("cache lock poisoned".into()))?;
        *cache = entries;

        let mut dirty = self
            .dirty
            .write()
            .map_err(|_| StorageError::Corruption("dirty lock poisoned".into()))?;
        *dirty = false;
        self.loaded.store(true, Ordering::Release);

        tracing::debug!(backend = %self.backend.name(), count, "loaded fields");
        Ok(count)
    }

    /// Whether a load from the backend has succeeded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Load from the backend if no load has succeeded yet.
    ///
    /// Values already in the cache win over stored ones. Failures are
    /// logged and retried on the next access.
    fn ensure_loaded(&self) {
        if self.is_loaded() {
            return;
        }
        let Ok(mut cache) = self.cache.write() else {
            return;
        };
        if self.is_loaded() {
            return;
        }
        match self.backend.load_all() {
            Ok(entries) => {
                let count = entries.len();
                for (key, value) in entries {
                    cache.entry(key).or_insert(value);
                }
                self.loaded.store(true, Ordering::Release);
                tracing::debug!(backend = %self.backend.name(), count, "loaded fields on demand");
            }
            Err(error) => {
                tracing::warn!(backend = %self.backend.name(), %error, "failed to load field store");
            }
        }
    }

    fn mark_dirty(&self) {
        if let Ok(mut dirty) = self.dirty.write() {
            *dirty = true;
        }
    }

    /// Flush dirty entries to the storage backend.
    ///
    /// Returns `Ok(true)` if data was written, `Ok(false)` if no changes.
    pub fn flush(&self) -> StorageResult<bool> {
        let dirty = {
            let guard = self
                .dirty
                .read()
                .map_err(|_| StorageError::Corruption("dirty lock poisoned".into()))?;
            *guard
        };

        if !dirty {
            return Ok(false);
        }

        let cache = self
            .cache
            .read()
            .map_err(|_| StorageError::Corruption("cache lock poisoned".into()))?;

        self.backend.save_all(&cache)?;

        let mut dirty_guard = self
            .dirty
            .write()
            .map_err(|_| StorageError::Corruption("dirty lock poisoned".into()))?;
        *dirty_guard = false;

        Ok(true)
    }

    /// Get a value by key, loading from the backend first if needed.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.ensure_loaded();
        let cache = self.cache.read().ok()?;
        cache.get(key).cloned()
    }

    /// Set a value in the cache.
    ///
    /// Marks the store as dirty; call [`flush`](Self::flush) to persist.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key.into(), value.into());
            if let Ok(mut dirty) = self.dirty.write() {
                *dirty = true;
            }
        }
    }

    /// Remove a value from the cache.
    ///
    /// Returns the removed value if it existed.
    pub fn remove(&self, key: &str) -> Option<String> {
        let result = self.cache.write().ok()?.remove(key);
        if result.is_some()
            && let Ok(mut dirty) = self.dirty.write()
        {
            *dirty = true;
        }
        result
    }

    /// Set a value and write it through to the backend.
    ///
    /// A failed write is logged and otherwise ignored.
    pub fn persist(&self, key: &str, value: &str) {
        self.ensure_loaded();
        self.set(key, value);
        if let Err(error) = self.flush() {
            tracing::warn!(
                backend = %self.backend.name(),
                key,
                %error,
                "failed to persist field"
            );
        }
    }

    /// Remove a value and write the removal through to the backend.
    ///
    /// The backend is rewritten even when the key was not cached. A failed
    /// write is logged and otherwise ignored.
    pub fn forget(&self, key: &str) {
        self.ensure_loaded();
        self.remove(key);
        self.mark_dirty();
        if let Err(error) = self.flush() {
            tracing::warn!(
                backend = %self.backend.name(),
                key,
                %error,
                "failed to forget field"
            );
        }
    }

    /// Clear all entries from both cache and storage.
    pub fn clear(&self) -> StorageResult<()> {
        self.backend.clear()?;
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }
        if let Ok(mut dirty) = self.dirty.write() {
            *dirty = false;
        }
        self.loaded.store(true, Ordering::Release);
        Ok(())
    }

    /// Get the number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }

    /// Check if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if there are unsaved changes.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.read().map(|d| *d).unwrap_or(false)
    }

    /// Get the backend name for logging.
    #[must_use]
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Check if the storage backend is available.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    /// Wrap in Arc for shared ownership.
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl fmt::Debug for FieldStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldStore")
            .field("backend", &self.backend.name())
            .field("entries", &self.len())
            .field("dirty", &self.is_dirty())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
