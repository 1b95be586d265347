use std::{collections::VecDeque, sync::Mutex};

use crate::{
    CredentialSource, GeneratedComponent, Generation, GenerationError, GenerationRequest,
    GenerationResult, GenerationStrategy,
};

/// Result for a mocked `generate` call.
/// It can either be a component to return or an error.
pub enum MockGenerateResult {
    Component(GeneratedComponent),
    Error(GenerationError),
}

impl MockGenerateResult {
    /// Construct a result that yields the provided component.
    pub fn component(component: GeneratedComponent) -> Self {
        Self::Component(component)
    }

    /// Construct a result that yields the provided error.
    pub fn error(error: GenerationError) -> Self {
        Self::Error(error)
    }
}

impl From<GeneratedComponent> for MockGenerateResult {
    fn from(component: GeneratedComponent) -> Self {
        Self::component(component)
    }
}

impl From<GenerationError> for MockGenerateResult {
    fn from(error: GenerationError) -> Self {
        Self::error(error)
    }
}

#[derive(Default)]
struct MockStrategyState {
    mocked_results: VecDeque<MockGenerateResult>,
    tracked_requests: Vec<GenerationRequest>,
}

/// A strategy for testing that records requests and replays queued results
/// without touching the network.
pub struct MockStrategy {
    provider: &'static str,
    state: Mutex<MockStrategyState>,
}

impl Default for MockStrategy {
    fn default() -> Self {
        Self {
            provider: "mock",
            state: Mutex::new(MockStrategyState::default()),
        }
    }
}

impl MockStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the provider name reported by the mock.
    #[must_use]
    pub fn with_provider(mut self, provider: &'static str) -> Self {
        self.provider = provider;
        self
    }

    /// Enqueue one or more mocked results.
    pub fn enqueue_results<I>(&self, results: I) -> &Self
    where
        I: IntoIterator<Item = MockGenerateResult>,
    {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.mocked_results.extend(results);
        drop(state);
        self
    }

    /// Convenience to enqueue a single mocked result.
    pub fn enqueue<R>(&self, result: R) -> &Self
    where
        R: Into<MockGenerateResult>,
    {
        self.enqueue_results(std::iter::once(result.into()))
    }

    /// Requests received so far.
    pub fn tracked_requests(&self) -> Vec<GenerationRequest> {
        let state = self.state.lock().expect("mock state poisoned");
        state.tracked_requests.clone()
    }

    /// Clear both tracked requests and queued results.
    pub fn restore(&self) {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.mocked_results.clear();
        state.tracked_requests.clear();
    }
}

#[async_trait::async_trait]
impl GenerationStrategy for MockStrategy {
    fn provider(&self) -> &'static str {
        self.provider
    }

    async fn generate(&self, request: GenerationRequest) -> GenerationResult<Generation> {
        let model = request.configuration.model.clone();
        let mut state = self.state.lock().expect("mock state poisoned");
        state.tracked_requests.push(request);

        let result = state.mocked_results.pop_front().ok_or_else(|| {
            GenerationError::InvalidInput(format!(
                "{}: no mocked generate results available",
                self.provider
            ))
        })?;

        match result {
            MockGenerateResult::Component(component) => Ok(Generation {
                component,
                provider: self.provider,
                model,
                credential: CredentialSource::Configuration,
            }),
            MockGenerateResult::Error(error) => Err(error),
        }
    }
}
