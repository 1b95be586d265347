use crate::{
    anthropic::{AnthropicStrategy, AnthropicStrategyOptions},
    google::{GoogleStrategy, GoogleStrategyOptions},
    openai::{OpenAICompatibleStrategy, OpenAICompatibleStrategyOptions},
    Generation, GenerationError, GenerationRequest, GenerationResult, GenerationStrategy,
    Provider, ProviderConfiguration,
};
use reqwest::Client;
use std::{collections::HashMap, sync::Arc};

/// Maps provider identifiers to the strategy that serves them. New
/// providers are added by registering a strategy.
#[derive(Clone, Default)]
pub struct StrategyRegistry {
    strategies: HashMap<Provider, Arc<dyn GenerationStrategy>>,
}

/// Settings for the built-in strategies.
///
/// The endpoint overrides exist for proxies and tests; the active
/// configuration's `baseUrl` is applied on top of them by the chat
/// completion strategies only.
#[derive(Clone, Default)]
pub struct DispatcherOptions {
    /// Gemini key used when the configuration leaves `apiKey` empty.
    pub gemini_fallback_api_key: Option<String>,
    pub client: Option<Client>,
    pub gemini_base_url: Option<String>,
    pub openai_base_url: Option<String>,
    pub deepseek_base_url: Option<String>,
    pub xai_base_url: Option<String>,
    pub anthropic_base_url: Option<String>,
}

impl StrategyRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with all five built-in providers.
    #[must_use]
    pub fn with_defaults(options: DispatcherOptions) -> Self {
        let DispatcherOptions {
            gemini_fallback_api_key,
            client,
            gemini_base_url,
            openai_base_url,
            deepseek_base_url,
            xai_base_url,
            anthropic_base_url,
        } = options;

        let chat_options = |base_url: Option<String>| OpenAICompatibleStrategyOptions {
            base_url,
            client: client.clone(),
            ..Default::default()
        };

        let mut registry = Self::new();
        registry
            .register(
                Provider::Gemini,
                GoogleStrategy::new(GoogleStrategyOptions {
                    base_url: gemini_base_url,
                    fallback_api_key: gemini_fallback_api_key,
                    client: client.clone(),
                    ..Default::default()
                }),
            )
            .register(
                Provider::OpenAI,
                OpenAICompatibleStrategy::openai(chat_options(openai_base_url)),
            )
            .register(
                Provider::DeepSeek,
                OpenAICompatibleStrategy::deepseek(chat_options(deepseek_base_url)),
            )
            .register(
                Provider::XAI,
                OpenAICompatibleStrategy::xai(chat_options(xai_base_url)),
            )
            .register(
                Provider::Anthropic,
                AnthropicStrategy::new(AnthropicStrategyOptions {
                    base_url: anthropic_base_url,
                    client: client.clone(),
                    ..Default::default()
                }),
            );
        registry
    }

    /// Register (or replace) the strategy for `provider`.
    pub fn register<S>(&mut self, provider: Provider, strategy: S) -> &mut Self
    where
        S: GenerationStrategy + 'static,
    {
        self.strategies.insert(provider, Arc::new(strategy));
        self
    }

    pub fn register_arc(
        &mut self,
        provider: Provider,
        strategy: Arc<dyn GenerationStrategy>,
    ) -> &mut Self {
        self.strategies.insert(provider, strategy);
        self
    }

    #[must_use]
    pub fn get(&self, provider: &Provider) -> Option<&dyn GenerationStrategy> {
        self.strategies.get(provider).map(AsRef::as_ref)
    }

    /// Registered providers, sorted by identifier.
    #[must_use]
    pub fn providers(&self) -> Vec<Provider> {
        let mut providers: Vec<Provider> = self.strategies.keys().cloned().collect();
        providers.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        providers
    }
}

/// Entry point for generating a component from a prompt.
///
/// Stateless between calls: the outcome depends only on the prompt, the
/// configuration passed in and the provider's answer.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<StrategyRegistry>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(registry: StrategyRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    #[must_use]
    pub fn with_defaults(options: DispatcherOptions) -> Self {
        Self::new(StrategyRegistry::with_defaults(options))
    }

    #[must_use]
    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// Generate one component. Fails before any network call when the
    /// prompt is blank or no strategy serves the configured provider.
    pub async fn generate(
        &self,
        prompt: &str,
        configuration: &ProviderConfiguration,
    ) -> GenerationResult<Generation> {
        if prompt.trim().is_empty() {
            return Err(GenerationError::InvalidInput(
                "Prompt must not be empty".to_string(),
            ));
        }

        let strategy = self.registry.get(&configuration.provider).ok_or_else(|| {
            GenerationError::UnsupportedProvider(configuration.provider.to_string())
        })?;

        tracing::debug!(
            provider = %configuration.provider,
            strategy = strategy.provider(),
            "dispatching generation"
        );

        strategy
            .generate(GenerationRequest {
                prompt: prompt.to_string(),
                configuration: configuration.clone(),
            })
            .await
    }
}
