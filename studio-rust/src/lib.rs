pub mod config;
mod errors;
pub mod export;
mod history;
mod id_utils;
mod store;
mod studio;
pub mod suggestions;

pub use config::StudioConfig;
pub use errors::{ExportError, StoreError, StudioError};
pub use history::History;
pub use store::{FileStore, KeyValueStore, MemoryStore, SessionStore, HISTORY_KEY, SETTINGS_KEY};
pub use studio::Studio;
pub use suggestions::{find_suggestion, Suggestion, SUGGESTIONS};
