use super::api::{Content, GenerateContentParameters, GenerateContentResponse, GenerationConfig, Part};
use crate::{
    client_utils, opentelemetry::trace_generate, payload_utils, prompts,
    strategy::{non_empty, resolve_model},
    CredentialSource, Generation, GenerationError, GenerationRequest, GenerationResult,
    GenerationStrategy, Provider, ProviderConfiguration,
};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client,
};
use std::collections::HashMap;

const PROVIDER: &str = "gemini";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Schema-constrained generation against the Gemini API.
pub struct GoogleStrategy {
    base_url: String,
    fallback_api_key: Option<String>,
    client: Client,
    headers: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct GoogleStrategyOptions {
    pub base_url: Option<String>,
    /// Used when the configuration carries no key.
    pub fallback_api_key: Option<String>,
    pub headers: Option<HashMap<String, String>>,
    pub client: Option<Client>,
}

impl GoogleStrategy {
    #[must_use]
    pub fn new(options: GoogleStrategyOptions) -> Self {
        let GoogleStrategyOptions {
            base_url,
            fallback_api_key,
            headers,
            client,
        } = options;

        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let fallback_api_key = fallback_api_key.filter(|key| !key.trim().is_empty());

        Self {
            base_url,
            fallback_api_key,
            client: client.unwrap_or_default(),
            headers: headers.unwrap_or_default(),
        }
    }

    fn resolve_credential<'a>(
        &'a self,
        configuration: &'a ProviderConfiguration,
    ) -> GenerationResult<(&'a str, CredentialSource)> {
        if let Some(key) = non_empty(Some(configuration.api_key.as_str())) {
            return Ok((key, CredentialSource::Configuration));
        }
        self.fallback_api_key
            .as_deref()
            .map(|key| (key, CredentialSource::Fallback))
            .ok_or(GenerationError::MissingCredential(PROVIDER))
    }

    /// The key travels in `x-goog-api-key` so it never appears in a URL.
    fn request_headers(&self, api_key: &str) -> GenerationResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        let key_header = HeaderValue::from_str(api_key).map_err(|error| {
            GenerationError::InvalidInput(format!("Invalid Gemini API key header value: {error}"))
        })?;
        headers.insert(HeaderName::from_static("x-goog-api-key"), key_header);

        for (key, value) in &self.headers {
            let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|error| {
                GenerationError::InvalidInput(format!(
                    "Invalid Gemini header name '{key}': {error}"
                ))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|error| {
                GenerationError::InvalidInput(format!(
                    "Invalid Gemini header value for '{key}': {error}"
                ))
            })?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }
}

#[async_trait::async_trait]
impl GenerationStrategy for GoogleStrategy {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn generate(&self, request: GenerationRequest) -> GenerationResult<Generation> {
        let GenerationRequest {
            prompt,
            configuration,
        } = request;

        let (api_key, credential) = self.resolve_credential(&configuration)?;
        let model = resolve_model(
            &configuration,
            Provider::Gemini.default_model().unwrap_or_default(),
        );
        if credential == CredentialSource::Fallback {
            tracing::debug!("gemini: no key configured, using fallback credential");
        }

        trace_generate(PROVIDER, &model, credential, async {
            let params = convert_to_generate_content_parameters(prompt);
            let url = format!("{}/models/{}:generateContent", self.base_url, model);

            let headers = self.request_headers(api_key)?;
            let response: GenerateContentResponse =
                client_utils::send_json(&self.client, &url, &params, headers, PROVIDER).await?;

            let text = response
                .text()
                .ok_or(GenerationError::EmptyResponse(PROVIDER))?;

            // responseSchema guarantees raw JSON, so no fence stripping here.
            let component = payload_utils::parse_component(PROVIDER, &text)?;

            Ok(Generation {
                component,
                provider: PROVIDER,
                model: model.clone(),
                credential,
            })
        })
        .await
    }
}

fn convert_to_generate_content_parameters(prompt: String) -> GenerateContentParameters {
    GenerateContentParameters {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: Some(vec![Part::text(prompt)]),
        }],
        system_instruction: Some(Content {
            role: None,
            parts: Some(vec![Part::text(prompts::SYSTEM_INSTRUCTION)]),
        }),
        generation_config: Some(GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(prompts::component_schema()),
        }),
    }
}
