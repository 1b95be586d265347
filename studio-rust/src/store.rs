use crate::{History, StoreError};
use serde_json::Value;
use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};
use uigen::ProviderConfiguration;

pub const HISTORY_KEY: &str = "gemini-ui-history";
pub const SETTINGS_KEY: &str = "gemini-ui-settings";

/// String-keyed, string-valued durable storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// One file per key inside a directory. Writes go through a temporary file
/// and a rename so a crash never leaves a half-written value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value).map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &path).map_err(|source| StoreError::Io { path, source })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}

/// In-process store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries().remove(key);
        Ok(())
    }
}

/// History and settings persisted as two independent JSON values.
///
/// Loads are best-effort: a missing, unreadable or corrupt value is logged
/// and replaced by the empty history or the default settings. Saves write
/// the whole value.
#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn load_history(&self) -> History {
        let Some(raw) = self.read(HISTORY_KEY) else {
            return History::new();
        };
        serde_json::from_str::<History>(&raw).unwrap_or_else(|error| {
            tracing::warn!(key = HISTORY_KEY, %error, "Failed to parse history");
            History::new()
        })
    }

    pub fn save_history(&self, history: &History) -> Result<(), StoreError> {
        let raw = serde_json::to_string(history)?;
        self.store.set(HISTORY_KEY, &raw)
    }

    /// Saved settings merged field by field over the defaults, so values
    /// written by an older version are backfilled.
    pub fn load_settings(&self) -> ProviderConfiguration {
        let Some(raw) = self.read(SETTINGS_KEY) else {
            return ProviderConfiguration::default();
        };
        merge_settings(&raw).unwrap_or_else(|error| {
            tracing::warn!(key = SETTINGS_KEY, %error, "Failed to parse settings");
            ProviderConfiguration::default()
        })
    }

    pub fn save_settings(&self, settings: &ProviderConfiguration) -> Result<(), StoreError> {
        let raw = serde_json::to_string(settings)?;
        self.store.set(SETTINGS_KEY, &raw)
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(key, %error, "Failed to read stored value");
                None
            }
        }
    }
}

fn merge_settings(raw: &str) -> Result<ProviderConfiguration, serde_json::Error> {
    let mut saved: serde_json::Map<String, Value> = serde_json::from_str(raw)?;
    saved.retain(|_, value| !value.is_null());
    let mut merged = match serde_json::to_value(ProviderConfiguration::default())? {
        Value::Object(defaults) => defaults,
        _ => serde_json::Map::new(),
    };
    merged.extend(saved);
    serde_json::from_value(Value::Object(merged))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uigen::Provider;

    #[test]
    fn missing_values_load_as_defaults() {
        let session = SessionStore::new(MemoryStore::new());
        assert!(session.load_history().is_empty());
        assert_eq!(session.load_settings(), ProviderConfiguration::default());
    }

    #[test]
    fn partial_settings_are_backfilled() {
        let store = MemoryStore::new();
        store
            .set(SETTINGS_KEY, r#"{"provider":"openai","apiKey":"sk-test"}"#)
            .unwrap();
        let settings = SessionStore::new(store).load_settings();

        assert_eq!(settings.provider, Provider::OpenAI);
        assert_eq!(settings.api_key, "sk-test");
        assert_eq!(settings.model, "gemini-2.5-flash");
        assert_eq!(settings.base_url, None);
    }

    #[test]
    fn unknown_provider_survives_loading() {
        let store = MemoryStore::new();
        store
            .set(SETTINGS_KEY, r#"{"provider":"mistral","apiKey":"k","model":"m"}"#)
            .unwrap();
        let settings = SessionStore::new(store).load_settings();
        assert_eq!(settings.provider, Provider::Other("mistral".to_string()));
    }

    #[test]
    fn corrupt_values_fall_back() {
        let store = MemoryStore::new();
        store.set(HISTORY_KEY, "[{\"id\": 1").unwrap();
        store.set(SETTINGS_KEY, r#"{"apiKey": 42}"#).unwrap();
        let session = SessionStore::new(store);

        assert!(session.load_history().is_empty());
        assert_eq!(session.load_settings(), ProviderConfiguration::default());
    }

    #[test]
    fn null_fields_keep_their_defaults() {
        let store = MemoryStore::new();
        store
            .set(
                SETTINGS_KEY,
                r#"{"provider":"anthropic","apiKey":"sk-ant","model":null,"baseUrl":null}"#,
            )
            .unwrap();
        let settings = SessionStore::new(store).load_settings();

        assert_eq!(settings.provider, Provider::Anthropic);
        assert_eq!(settings.api_key, "sk-ant");
        assert_eq!(settings.model, "gemini-2.5-flash");
        assert_eq!(settings.base_url, None);
    }

    #[test]
    fn settings_that_are_not_an_object_fall_back() {
        let store = MemoryStore::new();
        store.set(SETTINGS_KEY, "\"gemini\"").unwrap();
        assert_eq!(
            SessionStore::new(store).load_settings(),
            ProviderConfiguration::default()
        );
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.set("../escape", "x"),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(store.get(""), Err(StoreError::InvalidKey(_))));
    }

    #[test]
    fn file_store_round_trips_and_removes() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("state")).unwrap();

        assert_eq!(store.get(HISTORY_KEY).unwrap(), None);
        store.set(HISTORY_KEY, "[]").unwrap();
        store.set(HISTORY_KEY, "[1]").unwrap();
        assert_eq!(store.get(HISTORY_KEY).unwrap().as_deref(), Some("[1]"));
        assert!(!store.dir().join(format!("{HISTORY_KEY}.json.tmp")).exists());

        store.remove(HISTORY_KEY).unwrap();
        store.remove(HISTORY_KEY).unwrap();
        assert_eq!(store.get(HISTORY_KEY).unwrap(), None);
    }
}
