//! Progress persistence.
//!
//! `StorageBackend` is the seam: `FileStorage` keeps the blob in the user's
//! data directory, `MemoryStorage` keeps it for the session only. The
//! backend is chosen once at startup by `select_backend`; `ProgressStore`
//! never lets a backend failure reach its callers.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{Preference, Preferences, ProgressRecord, SavedPrompt, ThemeSetting};
use crate::config::{ColorScheme, Config};
use crate::error::StorageError;

/// The single key the record is stored under.
pub const STORAGE_KEY: &str = "userProgress";

/// Key/value storage for the serialized record.
pub trait StorageBackend {
    /// The stored blob, or `None` if nothing has been written yet.
    fn read(&self) -> Result<Option<String>, StorageError>;
    fn write(&mut self, blob: &str) -> Result<(), StorageError>;
    fn name(&self) -> &'static str;

    /// Keep a copy of an undecodable blob before it is overwritten.
    fn preserve(&mut self, _blob: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Blob at `<dir>/userProgress.json`, replaced atomically on write.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Open storage in `dir`, creating it and checking it is writable.
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        fs::create_dir_all(dir)?;
        let probe = dir.join(".probe");
        fs::write(&probe, b"ok")?;
        fs::remove_file(&probe)?;
        Ok(Self {
            path: dir.join(format!("{}.json", STORAGE_KEY)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for FileStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, blob: &str) -> Result<(), StorageError> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, blob)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }

    /// Copies the blob to `userProgress.json.bak`.
    fn preserve(&mut self, blob: &str) -> Result<(), StorageError> {
        let backup = self.path.with_extension("json.bak");
        fs::write(&backup, blob)?;
        log::warn!("corrupt progress saved to {}", backup.display());
        Ok(())
    }
}

/// Session-only storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blob: Option<String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Some(blob.into()),
        }
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.blob.clone())
    }

    fn write(&mut self, blob: &str) -> Result<(), StorageError> {
        self.blob = Some(blob.to_string());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Capability probe: persistent storage when it works, memory otherwise.
pub fn select_backend(config: &Config) -> Box<dyn StorageBackend> {
    if config.force_in_memory {
        log::info!("progress kept in memory (forced)");
        return Box::new(MemoryStorage::new());
    }
    let Some(dir) = config.data_dir.as_deref() else {
        log::warn!("no data directory; progress kept in memory");
        return Box::new(MemoryStorage::new());
    };
    match FileStorage::open(dir) {
        Ok(storage) => {
            log::info!("progress stored at {}", storage.path().display());
            Box::new(storage)
        }
        Err(e) => {
            log::warn!("progress storage unavailable ({}); kept in memory", e);
            Box::new(MemoryStorage::new())
        }
    }
}

/// Decode a stored blob field by field.
///
/// A field that is missing or has the wrong shape falls back to its default
/// on its own; list entries are kept or dropped one at a time. Only a blob
/// that is not a JSON object at all is an error.
fn decode(blob: &str) -> Result<ProgressRecord, StorageError> {
    let Value::Object(mut map) = serde_json::from_str::<Value>(blob)? else {
        return Err(StorageError::NotAnObject);
    };
    let preferences = match map.remove("preferences") {
        Some(Value::Object(mut prefs)) => Preferences {
            audio_enabled: field(&mut prefs, "audioEnabled"),
            reduced_motion: field(&mut prefs, "reducedMotion"),
            dark_mode: field(&mut prefs, "darkMode"),
        },
        None | Some(Value::Null) => Preferences::default(),
        Some(other) => {
            log::warn!("progress field `preferences` is {}; using defaults", other);
            Preferences::default()
        }
    };
    Ok(ProgressRecord {
        visited_chapters: list(&mut map, "visitedChapters"),
        saved_prompts: list(&mut map, "savedPrompts"),
        last_visited: field(&mut map, "lastVisited"),
        preferences,
    })
}

fn field<T: DeserializeOwned + Default>(map: &mut Map<String, Value>, key: &str) -> T {
    match map.remove(key) {
        None | Some(Value::Null) => T::default(),
        Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
            log::warn!("progress field `{}` unreadable ({}); using default", key, e);
            T::default()
        }),
    }
}

fn list<T: DeserializeOwned>(map: &mut Map<String, Value>, key: &str) -> Vec<T> {
    match map.remove(key) {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(v) => Some(v),
                Err(e) => {
                    log::warn!("dropping unreadable `{}` entry: {}", key, e);
                    None
                }
            })
            .collect(),
        None | Some(Value::Null) => Vec::new(),
        Some(other) => {
            log::warn!("progress field `{}` is not a list ({}); using default", key, other);
            Vec::new()
        }
    }
}

/// What the backend holds right now.
enum Stored {
    Empty,
    Record(ProgressRecord),
    /// Not JSON at all; the raw text is kept so it can be set aside.
    Garbage(String),
}

/// Read-modify-write wrapper around the selected backend.
pub struct ProgressStore {
    backend: Box<dyn StorageBackend>,
    /// Last record read from or written to the backend.
    snapshot: ProgressRecord,
    theme: ThemeSetting,
}

impl ProgressStore {
    /// Select a backend for `config` and open the store on it.
    pub fn open(config: &Config) -> Self {
        Self::with_backend(select_backend(config), config.signals.color_scheme)
    }

    /// Open on an explicit backend. Writes a default record if none exists.
    ///
    /// The theme starts from the stored dark-mode choice, or from `system`
    /// when the reader has not chosen yet.
    pub fn with_backend(backend: Box<dyn StorageBackend>, system: ColorScheme) -> Self {
        let mut store = Self {
            backend,
            snapshot: ProgressRecord::default(),
            theme: ThemeSetting::new(system == ColorScheme::Dark),
        };
        match store.read_stored() {
            Ok(Stored::Empty) => store.persist(ProgressRecord::default()),
            Ok(Stored::Record(record)) => store.snapshot = record,
            Ok(Stored::Garbage(_)) => {}
            Err(e) => store.fall_back_to_memory("read", &e),
        }
        if let Some(dark) = store.snapshot.preferences.dark_mode {
            store.theme.set_dark(dark);
        }
        store
    }

    /// Current record.
    ///
    /// Empty or corrupt storage reads as the default record; a backend that
    /// cannot be read at all yields the last record this store saw.
    pub fn load(&self) -> ProgressRecord {
        match self.read_stored() {
            Ok(Stored::Record(record)) => record,
            Ok(Stored::Empty | Stored::Garbage(_)) => ProgressRecord::default(),
            Err(e) => {
                log::warn!("progress unreadable ({}); using last known record", e);
                self.snapshot.clone()
            }
        }
    }

    pub fn append_saved_prompt(&mut self, chapter_id: &str, prompt_index: usize, response: &str) {
        let entry = SavedPrompt {
            chapter_id: chapter_id.to_string(),
            prompt_index,
            response: response.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        self.mutate(|record| record.saved_prompts.push(entry));
    }

    /// Store a preference. A dark-mode change also flips the shared theme.
    pub fn set_preference(&mut self, pref: Preference) {
        self.mutate(|record| record.preferences.apply(pref));
        if let Preference::DarkMode(dark) = pref {
            self.theme.set_dark(dark);
        }
    }

    pub fn mark_visited(&mut self, chapter_id: &str) {
        self.mutate(|record| record.mark_visited(chapter_id));
    }

    pub fn theme(&self) -> &ThemeSetting {
        &self.theme
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    fn read_stored(&self) -> Result<Stored, StorageError> {
        let Some(blob) = self.backend.read()? else {
            return Ok(Stored::Empty);
        };
        match decode(&blob) {
            Ok(record) => Ok(Stored::Record(record)),
            Err(e) => {
                log::warn!("progress blob corrupt ({}); treating as empty", e);
                Ok(Stored::Garbage(blob))
            }
        }
    }

    /// A failed read never turns into a write of defaults: the change is
    /// applied to the last known record in memory and the backend is left
    /// alone.
    fn mutate(&mut self, f: impl FnOnce(&mut ProgressRecord)) {
        let mut record = match self.read_stored() {
            Ok(Stored::Record(record)) => record,
            Ok(Stored::Empty) => ProgressRecord::default(),
            Ok(Stored::Garbage(blob)) => {
                if let Err(e) = self.backend.preserve(&blob) {
                    log::warn!("could not set corrupt progress aside: {}", e);
                }
                ProgressRecord::default()
            }
            Err(e) => {
                self.fall_back_to_memory("read", &e);
                self.snapshot.clone()
            }
        };
        f(&mut record);
        self.persist(record);
    }

    /// Write the record; on failure switch to memory for the rest of the
    /// session so the reader's changes are not lost while the app runs.
    fn persist(&mut self, record: ProgressRecord) {
        let result = serde_json::to_string(&record)
            .map_err(StorageError::from)
            .and_then(|blob| self.backend.write(&blob));
        self.snapshot = record;
        if let Err(e) = result {
            self.fall_back_to_memory("write", &e);
        }
    }

    /// Replace the backend with memory holding the current snapshot.
    fn fall_back_to_memory(&mut self, op: &str, e: &StorageError) {
        log::warn!(
            "progress {} on {} backend failed ({}); continuing in memory",
            op,
            self.backend.name(),
            e
        );
        let mut fallback = MemoryStorage::new();
        if let Ok(blob) = serde_json::to_string(&self.snapshot) {
            fallback.blob = Some(blob);
        }
        self.backend = Box::new(fallback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    #[derive(Default)]
    struct FlakyState {
        blob: Option<String>,
        fail_reads: bool,
    }

    /// Backend whose reads can be switched off from the outside.
    struct FlakyStorage(Rc<RefCell<FlakyState>>);

    impl StorageBackend for FlakyStorage {
        fn read(&self) -> Result<Option<String>, StorageError> {
            let state = self.0.borrow();
            if state.fail_reads {
                return Err(StorageError::Unavailable("read denied".into()));
            }
            Ok(state.blob.clone())
        }
        fn write(&mut self, blob: &str) -> Result<(), StorageError> {
            self.0.borrow_mut().blob = Some(blob.to_string());
            Ok(())
        }
        fn name(&self) -> &'static str {
            "flaky"
        }
    }

    struct BrokenStorage;

    impl StorageBackend for BrokenStorage {
        fn read(&self) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("access denied".into()))
        }
        fn write(&mut self, _blob: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".into()))
        }
        fn name(&self) -> &'static str {
            "broken"
        }
    }

    fn memory_store(blob: Option<&str>) -> ProgressStore {
        let backend = match blob {
            Some(b) => MemoryStorage::with_blob(b),
            None => MemoryStorage::new(),
        };
        ProgressStore::with_backend(Box::new(backend), ColorScheme::Light)
    }

    #[test]
    fn saved_prompt_round_trip() {
        let mut store = memory_store(None);
        store.append_saved_prompt("fear", 1, "hello");
        let record = store.load();
        let hit = record
            .saved_prompts
            .iter()
            .find(|p| p.chapter_id == "fear" && p.prompt_index == 1)
            .unwrap();
        assert_eq!(hit.response, "hello");
        assert!(chrono::DateTime::parse_from_rfc3339(&hit.timestamp).is_ok());
    }

    #[test]
    fn corrupt_blob_loads_default() {
        let store = memory_store(Some("{not json"));
        let record = store.load();
        assert!(record.visited_chapters.is_empty());
        assert!(record.saved_prompts.is_empty());
        assert_eq!(record.last_visited, None);
    }

    #[test]
    fn corrupt_blob_is_replaced_on_next_write() {
        let mut store = memory_store(Some("{not json"));
        store.mark_visited("memory");
        assert_eq!(store.load().visited_chapters, vec!["memory"]);
    }

    #[test]
    fn resave_appends() {
        let mut store = memory_store(None);
        store.append_saved_prompt("empathy", 0, "one");
        store.append_saved_prompt("empathy", 0, "two");
        let record = store.load();
        assert_eq!(record.saved_prompts.len(), 2);
        assert_eq!(record.latest_response("empathy", 0).unwrap().response, "two");
    }

    #[test]
    fn creates_default_record_when_absent() {
        let store = memory_store(None);
        assert_eq!(store.backend.read().unwrap().as_deref().map(|b| b.starts_with('{')), Some(true));
    }

    #[test]
    fn dark_mode_preference_flips_theme() {
        let mut store = memory_store(None);
        let rx = store.theme().subscribe();
        assert!(!store.theme().is_dark());
        store.set_preference(Preference::DarkMode(true));
        assert!(store.theme().is_dark());
        assert_eq!(rx.try_recv().map(|c| c.dark), Ok(true));
        assert_eq!(store.load().preferences.dark_mode, Some(true));

        store.set_preference(Preference::ReducedMotion(true));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn system_scheme_is_default_until_chosen() {
        let store = ProgressStore::with_backend(Box::new(MemoryStorage::new()), ColorScheme::Dark);
        assert!(store.theme().is_dark());

        let chosen = ProgressStore::with_backend(
            Box::new(MemoryStorage::with_blob(r#"{"preferences":{"darkMode":false}}"#)),
            ColorScheme::Dark,
        );
        assert!(!chosen.theme().is_dark());
    }

    #[test]
    fn broken_backend_degrades_to_memory() {
        let mut store = ProgressStore::with_backend(Box::new(BrokenStorage), ColorScheme::Light);
        assert_eq!(store.backend_name(), "memory");
        assert_eq!(store.load(), ProgressRecord::default());
        store.append_saved_prompt("fear", 0, "still works");
        assert_eq!(store.load().saved_prompts.len(), 1);
    }

    #[test]
    fn file_storage_persists_across_opens() {
        let dir = TempDir::new().unwrap();
        {
            let backend = FileStorage::open(dir.path()).unwrap();
            let mut store = ProgressStore::with_backend(Box::new(backend), ColorScheme::Light);
            store.append_saved_prompt("fear", 1, "hello");
            store.mark_visited("fear");
        }
        let backend = FileStorage::open(dir.path()).unwrap();
        assert!(backend.path().ends_with("userProgress.json"));
        let store = ProgressStore::with_backend(Box::new(backend), ColorScheme::Light);
        let record = store.load();
        assert_eq!(record.visited_chapters, vec!["fear"]);
        assert_eq!(record.saved_prompts[0].response, "hello");
        assert!(!dir.path().join("userProgress.json.tmp").exists());
    }

    #[test]
    fn file_storage_tolerates_corruption() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("userProgress.json"), "{not json").unwrap();
        let backend = FileStorage::open(dir.path()).unwrap();
        let store = ProgressStore::with_backend(Box::new(backend), ColorScheme::Light);
        assert_eq!(store.load(), ProgressRecord::default());
    }

    #[test]
    fn select_backend_honours_config() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::from_lookup(|_| None);
        config.data_dir = Some(dir.path().join("nested"));
        assert_eq!(select_backend(&config).name(), "file");

        config.force_in_memory = true;
        assert_eq!(select_backend(&config).name(), "memory");

        config.force_in_memory = false;
        config.data_dir = None;
        assert_eq!(select_backend(&config).name(), "memory");
    }

    #[test]
    fn failed_read_never_overwrites_saved_progress() {
        let state = Rc::new(RefCell::new(FlakyState::default()));
        let mut store =
            ProgressStore::with_backend(Box::new(FlakyStorage(Rc::clone(&state))), ColorScheme::Light);
        store.append_saved_prompt("fear", 1, "hello");
        store.mark_visited("fear");
        let stored = state.borrow().blob.clone();

        state.borrow_mut().fail_reads = true;
        store.set_preference(Preference::ReducedMotion(true));
        state.borrow_mut().fail_reads = false;

        // The failing backend keeps what it had.
        assert_eq!(state.borrow().blob, stored);
        // The session continues in memory with everything plus the change.
        assert_eq!(store.backend_name(), "memory");
        let record = store.load();
        assert_eq!(record.saved_prompts.len(), 1);
        assert_eq!(record.visited_chapters, vec!["fear"]);
        assert!(record.preferences.reduced_motion);
    }

    #[test]
    fn unreadable_backend_loads_last_known_record() {
        let state = Rc::new(RefCell::new(FlakyState::default()));
        let mut store =
            ProgressStore::with_backend(Box::new(FlakyStorage(Rc::clone(&state))), ColorScheme::Light);
        store.mark_visited("memory");
        state.borrow_mut().fail_reads = true;
        assert_eq!(store.load().visited_chapters, vec!["memory"]);
    }

    #[test]
    fn wrong_typed_field_only_loses_that_field() {
        let blob = r#"{
            "visitedChapters": ["fear", "memory", 3],
            "savedPrompts": [
                {"chapterId": "fear", "promptIndex": 1, "response": "hello", "timestamp": "2026-01-01T00:00:00Z"},
                {"chapterId": "fear", "promptIndex": "one"}
            ],
            "lastVisited": 7,
            "preferences": {"audioEnabled": "yes", "reducedMotion": true}
        }"#;
        let mut store = memory_store(Some(blob));
        let record = store.load();
        assert_eq!(record.visited_chapters, vec!["fear", "memory"]);
        assert_eq!(record.saved_prompts.len(), 1);
        assert_eq!(record.last_visited, None);
        assert!(!record.preferences.audio_enabled);
        assert!(record.preferences.reduced_motion);

        store.set_preference(Preference::AudioEnabled(true));
        let record = store.load();
        assert_eq!(record.visited_chapters, vec!["fear", "memory"]);
        assert_eq!(record.saved_prompts[0].response, "hello");
        assert!(record.preferences.audio_enabled);
    }

    #[test]
    fn non_object_blob_is_corrupt() {
        assert!(matches!(decode("[1, 2]"), Err(StorageError::NotAnObject)));
        assert!(matches!(decode("{not json"), Err(StorageError::Serde(_))));
        assert_eq!(decode("{}").unwrap(), ProgressRecord::default());
    }

    #[test]
    fn corrupt_file_is_set_aside_before_overwrite() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("userProgress.json"), "{not json").unwrap();
        let backend = FileStorage::open(dir.path()).unwrap();
        let mut store = ProgressStore::with_backend(Box::new(backend), ColorScheme::Light);
        store.mark_visited("fear");
        assert_eq!(
            fs::read_to_string(dir.path().join("userProgress.json.bak")).unwrap(),
            "{not json"
        );
        assert_eq!(store.load().visited_chapters, vec!["fear"]);
    }
}
