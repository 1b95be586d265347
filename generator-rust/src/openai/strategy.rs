use super::api::{
    ChatCompletionRequestMessage, ChatRole, CreateChatCompletionRequest,
    CreateChatCompletionResponse, ResponseFormat,
};
use crate::{
    client_utils, opentelemetry::trace_generate, payload_utils, prompts,
    strategy::{non_empty, resolve_model},
    CredentialSource, Generation, GenerationError, GenerationRequest, GenerationResult,
    GenerationStrategy, Provider,
};
use reqwest::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    Client,
};
use std::collections::HashMap;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";
const XAI_BASE_URL: &str = "https://api.x.ai/v1";

/// JSON-mode generation over an OpenAI-compatible Chat Completions endpoint.
pub struct OpenAICompatibleStrategy {
    provider: &'static str,
    default_base_url: String,
    default_model: String,
    client: Client,
    headers: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct OpenAICompatibleStrategyOptions {
    /// Replaces the provider's default host. A `baseUrl` in the active
    /// configuration still takes precedence.
    pub base_url: Option<String>,
    pub headers: Option<HashMap<String, String>>,
    pub client: Option<Client>,
}

impl OpenAICompatibleStrategy {
    #[must_use]
    pub fn new(
        provider: &'static str,
        default_base_url: impl Into<String>,
        default_model: impl Into<String>,
        options: OpenAICompatibleStrategyOptions,
    ) -> Self {
        let OpenAICompatibleStrategyOptions {
            base_url,
            headers,
            client,
        } = options;

        let default_base_url = base_url.unwrap_or_else(|| default_base_url.into());

        Self {
            provider,
            default_base_url,
            default_model: default_model.into(),
            client: client.unwrap_or_default(),
            headers: headers.unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn openai(options: OpenAICompatibleStrategyOptions) -> Self {
        Self::new("openai", OPENAI_BASE_URL, default_model(&Provider::OpenAI), options)
    }

    #[must_use]
    pub fn deepseek(options: OpenAICompatibleStrategyOptions) -> Self {
        Self::new(
            "deepseek",
            DEEPSEEK_BASE_URL,
            default_model(&Provider::DeepSeek),
            options,
        )
    }

    #[must_use]
    pub fn xai(options: OpenAICompatibleStrategyOptions) -> Self {
        Self::new("xai", XAI_BASE_URL, default_model(&Provider::XAI), options)
    }

    fn completions_url(&self, base_url: Option<&str>) -> String {
        let base = non_empty(base_url).unwrap_or(self.default_base_url.as_str());
        format!("{}/chat/completions", base.trim_end_matches('/'))
    }

    fn request_headers(&self, api_key: &str) -> GenerationResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        let auth_header = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|error| {
            GenerationError::InvalidInput(format!(
                "Invalid {} API key header value: {error}",
                self.provider
            ))
        })?;
        headers.insert(header::AUTHORIZATION, auth_header);

        for (key, value) in &self.headers {
            let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|error| {
                GenerationError::InvalidInput(format!(
                    "Invalid {} header name '{key}': {error}",
                    self.provider
                ))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|error| {
                GenerationError::InvalidInput(format!(
                    "Invalid {} header value for '{key}': {error}",
                    self.provider
                ))
            })?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }
}

fn default_model(provider: &Provider) -> &'static str {
    provider.default_model().unwrap_or_default()
}

#[async_trait::async_trait]
impl GenerationStrategy for OpenAICompatibleStrategy {
    fn provider(&self) -> &'static str {
        self.provider
    }

    async fn generate(&self, request: GenerationRequest) -> GenerationResult<Generation> {
        let GenerationRequest {
            prompt,
            configuration,
        } = request;

        let api_key = non_empty(Some(configuration.api_key.as_str()))
            .ok_or(GenerationError::MissingCredential(self.provider))?;
        let model = resolve_model(&configuration, &self.default_model);
        let url = self.completions_url(configuration.base_url.as_deref());

        trace_generate(self.provider, &model, CredentialSource::Configuration, async {
            let payload = convert_to_chat_completion_request(prompt, model.clone());
            let headers = self.request_headers(api_key)?;

            let response: CreateChatCompletionResponse =
                client_utils::send_json(&self.client, &url, &payload, headers, self.provider)
                    .await?;

            let content = response
                .first_content()
                .ok_or(GenerationError::EmptyResponse(self.provider))?;

            let component = payload_utils::parse_fenced_component(self.provider, &content)?;

            Ok(Generation {
                component,
                provider: self.provider,
                model: model.clone(),
                credential: CredentialSource::Configuration,
            })
        })
        .await
    }
}

fn convert_to_chat_completion_request(prompt: String, model: String) -> CreateChatCompletionRequest {
    CreateChatCompletionRequest {
        model,
        messages: vec![
            ChatCompletionRequestMessage {
                role: ChatRole::System,
                content: prompts::system_prompt_with(prompts::RAW_JSON_DIRECTIVE),
            },
            ChatCompletionRequestMessage {
                role: ChatRole::User,
                content: prompt,
            },
        ],
        response_format: Some(ResponseFormat::JsonObject),
    }
}
