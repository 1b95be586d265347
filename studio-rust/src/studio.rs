use crate::{
    id_utils, History, KeyValueStore, SessionStore, StudioError,
};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, MutexGuard, PoisonError,
};
use uigen::{Dispatcher, GeneratedArtifact, ProviderConfiguration};

struct StudioState {
    history: History,
    settings: ProviderConfiguration,
    /// Id of the artifact on display, if any.
    current: Option<String>,
}

/// A generation session: history, settings and the artifact on display,
/// with at most one generation in flight.
///
/// State is loaded from the store once in [`Studio::open`] and written back
/// in full after every change. A failed generation leaves every piece of
/// state as it was.
pub struct Studio<S> {
    dispatcher: Dispatcher,
    store: SessionStore<S>,
    state: Mutex<StudioState>,
    busy: AtomicBool,
}

/// Marks a generation as in flight for as long as it lives.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, StudioError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| StudioError::Busy)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<S: KeyValueStore> Studio<S> {
    pub fn open(dispatcher: Dispatcher, store: SessionStore<S>) -> Self {
        let history = store.load_history();
        let settings = store.load_settings();
        tracing::debug!(
            artifacts = history.len(),
            provider = %settings.provider,
            "studio opened"
        );

        Self {
            dispatcher,
            store,
            state: Mutex::new(StudioState {
                history,
                settings,
                current: None,
            }),
            busy: AtomicBool::new(false),
        }
    }

    fn state(&self) -> MutexGuard<'_, StudioState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Generate a component from `prompt` with the current settings, record
    /// it at the front of the history and put it on display.
    pub async fn generate(&self, prompt: &str) -> Result<GeneratedArtifact, StudioError> {
        let _in_flight = InFlight::acquire(&self.busy)?;

        let settings = self.state().settings.clone();
        let issued_at = id_utils::now_millis();

        let generation = self.dispatcher.generate(prompt, &settings).await?;
        tracing::debug!(
            provider = generation.provider,
            model = %generation.model,
            credential = generation.credential.as_str(),
            "generation completed"
        );

        let mut state = self.state();
        let timestamp = id_utils::now_millis()
            .max(issued_at)
            .max(state.history.latest_timestamp().unwrap_or(i64::MIN));
        let id = id_utils::fresh_id(&state.history, id_utils::generate_id);
        let artifact = GeneratedArtifact::new(generation.component, id, timestamp);

        let inserted = state.history.prepend(artifact.clone());
        debug_assert!(inserted, "fresh id already in history");
        state.current = Some(artifact.id.clone());
        self.persist_history(&state.history);

        Ok(artifact)
    }

    /// Put a history entry on display.
    pub fn select(&self, id: &str) -> Result<GeneratedArtifact, StudioError> {
        let mut state = self.state();
        let artifact = state
            .history
            .resolve(id)
            .cloned()
            .ok_or_else(|| StudioError::NotFound(id.to_string()))?;
        state.current = Some(artifact.id.clone());
        Ok(artifact)
    }

    #[must_use]
    pub fn current(&self) -> Option<GeneratedArtifact> {
        let state = self.state();
        state
            .current
            .as_deref()
            .and_then(|id| state.history.get(id))
            .cloned()
    }

    /// Clear the display to start a new design.
    pub fn clear_current(&self) {
        self.state().current = None;
    }

    /// Remove an entry from the history, clearing the display if it was
    /// shown.
    pub fn delete(&self, id: &str) -> Result<GeneratedArtifact, StudioError> {
        let mut state = self.state();
        let id = state
            .history
            .resolve(id)
            .map(|artifact| artifact.id.clone())
            .ok_or_else(|| StudioError::NotFound(id.to_string()))?;
        let removed = state
            .history
            .remove(&id)
            .ok_or_else(|| StudioError::NotFound(id.clone()))?;

        if state.current.as_deref() == Some(removed.id.as_str()) {
            state.current = None;
        }
        self.persist_history(&state.history);

        Ok(removed)
    }

    /// Look up a history entry by id or unambiguous id prefix.
    pub fn find(&self, id: &str) -> Result<GeneratedArtifact, StudioError> {
        self.state()
            .history
            .resolve(id)
            .cloned()
            .ok_or_else(|| StudioError::NotFound(id.to_string()))
    }

    #[must_use]
    pub fn history(&self) -> History {
        self.state().history.clone()
    }

    #[must_use]
    pub fn settings(&self) -> ProviderConfiguration {
        self.state().settings.clone()
    }

    /// Replace the settings. Existing history entries are untouched.
    pub fn update_settings(&self, settings: ProviderConfiguration) -> Result<(), StudioError> {
        self.store.save_settings(&settings)?;
        self.state().settings = settings;
        Ok(())
    }

    fn persist_history(&self, history: &History) {
        if let Err(error) = self.store.save_history(history) {
            tracing::warn!(%error, "Failed to save history");
        }
    }
}
