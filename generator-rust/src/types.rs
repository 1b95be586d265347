use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Identifies which provider strategy handles a generation.
///
/// Identifiers without a built-in strategy are kept verbatim in
/// [`Provider::Other`] so that they survive a round trip through persisted
/// settings and fail at dispatch time rather than at load time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Provider {
    Gemini,
    OpenAI,
    Anthropic,
    DeepSeek,
    XAI,
    Other(String),
}

impl Provider {
    pub const BUILT_IN: [Self; 5] = [
        Self::Gemini,
        Self::OpenAI,
        Self::Anthropic,
        Self::DeepSeek,
        Self::XAI,
    ];

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAI => "openai",
            Self::Anthropic => "anthropic",
            Self::DeepSeek => "deepseek",
            Self::XAI => "xai",
            Self::Other(id) => id,
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Gemini => "Google Gemini",
            Self::OpenAI => "OpenAI (ChatGPT)",
            Self::Anthropic => "Anthropic (Claude)",
            Self::DeepSeek => "DeepSeek",
            Self::XAI => "xAI (Grok)",
            Self::Other(id) => id,
        }
    }

    /// Model used when the configuration leaves `model` empty.
    #[must_use]
    pub fn default_model(&self) -> Option<&'static str> {
        match self {
            Self::Gemini => Some("gemini-2.5-flash"),
            Self::OpenAI => Some("gpt-4o"),
            Self::Anthropic => Some("claude-3-5-sonnet-latest"),
            Self::DeepSeek => Some("deepseek-chat"),
            Self::XAI => Some("grok-beta"),
            Self::Other(_) => None,
        }
    }
}

impl From<String> for Provider {
    fn from(value: String) -> Self {
        match value.as_str() {
            "gemini" => Self::Gemini,
            "openai" => Self::OpenAI,
            "anthropic" => Self::Anthropic,
            "deepseek" => Self::DeepSeek,
            "xai" => Self::XAI,
            _ => Self::Other(value),
        }
    }
}

impl From<Provider> for String {
    fn from(value: Provider) -> Self {
        match value {
            Provider::Other(id) => id,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for Provider {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The provider settings a generation runs under. Treated as a value: a new
/// configuration replaces the old one wholesale.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfiguration {
    pub provider: Provider,
    /// May be empty. Only Gemini can proceed without it, and only when a
    /// fallback key was supplied to the dispatcher.
    pub api_key: String,
    /// May be empty, in which case the strategy picks its default model.
    pub model: String,
    /// Overrides the endpoint host for chat-completion providers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for ProviderConfiguration {
    fn default() -> Self {
        Self {
            provider: Provider::Gemini,
            api_key: String::new(),
            model: "gemini-2.5-flash".to_string(),
            base_url: None,
        }
    }
}

impl ProviderConfiguration {
    /// Switch provider, resetting the model to the new provider's default.
    /// Unknown providers keep the current model.
    #[must_use]
    pub fn with_provider(mut self, provider: Provider) -> Self {
        if let Some(model) = provider.default_model() {
            self.model = model.to_string();
        }
        self.provider = provider;
        self
    }
}

impl fmt::Debug for ProviderConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfiguration")
            .field("provider", &self.provider)
            .field(
                "api_key",
                &if self.api_key.is_empty() {
                    "<empty>"
                } else {
                    "<redacted>"
                },
            )
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// The provider-supplied part of an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedComponent {
    /// Short human label.
    pub name: String,
    /// The model's explanation of its design choices.
    pub description: String,
    /// Copy-paste ready component source.
    pub code: String,
    /// Self-contained HTML document that renders the component without a
    /// build step. Untrusted.
    pub preview_html: String,
}

/// A generated component stamped with its identity and creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedArtifact {
    pub id: String,
    pub name: String,
    pub description: String,
    pub code: String,
    pub preview_html: String,
    /// Creation time in epoch milliseconds.
    pub timestamp: i64,
}

impl GeneratedArtifact {
    #[must_use]
    pub fn new(component: GeneratedComponent, id: impl Into<String>, timestamp: i64) -> Self {
        let GeneratedComponent {
            name,
            description,
            code,
            preview_html,
        } = component;
        Self {
            id: id.into(),
            name,
            description,
            code,
            preview_html,
            timestamp,
        }
    }
}

/// Input handed to a strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub configuration: ProviderConfiguration,
}

/// Where the API key used for a call came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Configuration,
    Fallback,
}

impl CredentialSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Fallback => "fallback",
        }
    }
}

/// A successful generation together with how it was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub component: GeneratedComponent,
    pub provider: &'static str,
    /// The model identifier that was actually sent.
    pub model: String,
    pub credential: CredentialSource,
}
