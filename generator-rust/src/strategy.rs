use crate::{Generation, GenerationRequest, GenerationResult, ProviderConfiguration};

/// Provider-specific translation between a prompt and a generated component.
///
/// A strategy issues at most one outbound request per call and never
/// retries. Configuration problems it can detect up front (such as a
/// missing key) must be reported before any network traffic.
#[async_trait::async_trait]
pub trait GenerationStrategy: Send + Sync {
    fn provider(&self) -> &'static str;
    async fn generate(&self, request: GenerationRequest) -> GenerationResult<Generation>;
}

/// `configuration.model` if set, else the strategy default.
pub(crate) fn resolve_model(configuration: &ProviderConfiguration, default_model: &str) -> String {
    let model = configuration.model.trim();
    if model.is_empty() {
        default_model.to_string()
    } else {
        model.to_string()
    }
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
