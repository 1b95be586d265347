use super::api::{CreateMessageParams, InputMessage, InputMessageRole, Message};
use crate::{
    client_utils, opentelemetry::trace_generate, payload_utils, prompts,
    strategy::{non_empty, resolve_model},
    CredentialSource, Generation, GenerationError, GenerationRequest, GenerationResult,
    GenerationStrategy, Provider,
};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client,
};
use std::collections::HashMap;

const PROVIDER: &str = "anthropic";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_API_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Generation through the Anthropic Messages API. The configuration's
/// `baseUrl` does not apply; the endpoint is fixed unless overridden in
/// [`AnthropicStrategyOptions`].
pub struct AnthropicStrategy {
    base_url: String,
    api_version: String,
    max_tokens: u32,
    client: Client,
    headers: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct AnthropicStrategyOptions {
    pub base_url: Option<String>,
    pub api_version: Option<String>,
    pub max_tokens: Option<u32>,
    pub headers: Option<HashMap<String, String>>,
    pub client: Option<Client>,
}

impl AnthropicStrategy {
    #[must_use]
    pub fn new(mut options: AnthropicStrategyOptions) -> Self {
        let base_url = options
            .base_url
            .take()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let api_version = options
            .api_version
            .take()
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        Self {
            base_url,
            api_version,
            max_tokens: options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            client: options.client.take().unwrap_or_default(),
            headers: options.headers.unwrap_or_default(),
        }
    }

    fn request_headers(&self, api_key: &str) -> GenerationResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key).map_err(|error| {
                GenerationError::InvalidInput(format!(
                    "Invalid Anthropic API key header value: {error}"
                ))
            })?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_str(&self.api_version).map_err(|error| {
                GenerationError::InvalidInput(format!(
                    "Invalid Anthropic version header value: {error}"
                ))
            })?,
        );

        for (key, value) in &self.headers {
            let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|error| {
                GenerationError::InvalidInput(format!(
                    "Invalid Anthropic header name '{key}': {error}"
                ))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|error| {
                GenerationError::InvalidInput(format!(
                    "Invalid Anthropic header value for '{key}': {error}"
                ))
            })?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }
}

#[async_trait::async_trait]
impl GenerationStrategy for AnthropicStrategy {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn generate(&self, request: GenerationRequest) -> GenerationResult<Generation> {
        let GenerationRequest {
            prompt,
            configuration,
        } = request;

        let api_key = non_empty(Some(configuration.api_key.as_str()))
            .ok_or(GenerationError::MissingCredential(PROVIDER))?;
        let model = resolve_model(
            &configuration,
            Provider::Anthropic.default_model().unwrap_or_default(),
        );

        trace_generate(PROVIDER, &model, CredentialSource::Configuration, async {
            let payload = convert_to_create_message_params(prompt, model.clone(), self.max_tokens);
            let headers = self.request_headers(api_key)?;

            let response: Message = client_utils::send_json(
                &self.client,
                &format!("{}/v1/messages", self.base_url),
                &payload,
                headers,
                PROVIDER,
            )
            .await?;

            let text = response
                .first_text()
                .ok_or(GenerationError::EmptyResponse(PROVIDER))?;

            let component = payload_utils::parse_fenced_component(PROVIDER, &text)?;

            Ok(Generation {
                component,
                provider: PROVIDER,
                model: model.clone(),
                credential: CredentialSource::Configuration,
            })
        })
        .await
    }
}

fn convert_to_create_message_params(
    prompt: String,
    model: String,
    max_tokens: u32,
) -> CreateMessageParams {
    CreateMessageParams {
        model,
        max_tokens,
        system: prompts::system_prompt_with(prompts::NO_MARKDOWN_DIRECTIVE),
        messages: vec![InputMessage {
            role: InputMessageRole::User,
            content: prompt,
        }],
    }
}
