use std::path::PathBuf;
use uigen::DispatcherOptions;

const DATA_DIR_VAR: &str = "UIGEN_DATA_DIR";
/// Checked in order for a Gemini key to use when the settings have none.
const GEMINI_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Process-level configuration, read from the environment (and a `.env`
/// file if present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioConfig {
    /// Where history and settings are stored.
    pub data_dir: PathBuf,
    pub gemini_fallback_api_key: Option<String>,
}

impl StudioConfig {
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup(DATA_DIR_VAR)
            .filter(|dir| !dir.trim().is_empty())
            .map_or_else(default_data_dir, PathBuf::from);

        let gemini_fallback_api_key = GEMINI_KEY_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|key| !key.trim().is_empty());

        Self {
            data_dir,
            gemini_fallback_api_key,
        }
    }

    #[must_use]
    pub fn dispatcher_options(&self) -> DispatcherOptions {
        DispatcherOptions {
            gemini_fallback_api_key: self.gemini_fallback_api_key.clone(),
            ..Default::default()
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from(".uigen"), |dir| dir.join("uigen"))
}
