use crate::{CredentialSource, Generation, GenerationResult};
use opentelemetry::trace::Status;
use std::time::Instant;
use tracing::{info_span, Span};
use tracing_futures::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub struct GenerationSpan {
    span: Span,
    start_time: Instant,
}

impl GenerationSpan {
    pub fn new(provider: &str, model: &str, credential: CredentialSource) -> Self {
        let span = info_span!("uigen.generate");
        span.set_attribute("gen_ai.operation.name", "generate_content");
        span.set_attribute("gen_ai.provider.name", provider.to_string());
        span.set_attribute("gen_ai.request.model", model.to_string());
        span.set_attribute("uigen.credential_source", credential.as_str());

        Self {
            span,
            start_time: Instant::now(),
        }
    }

    pub async fn instrument_future<F>(&self, future: F) -> F::Output
    where
        F: std::future::Future,
    {
        future.instrument(self.span.clone()).await
    }

    pub fn on_generation(&self, generation: &Generation) {
        self.span
            .set_attribute("uigen.component.name", generation.component.name.clone());
        self.span.set_attribute(
            "uigen.component.code_length",
            i64::try_from(generation.component.code.len()).unwrap_or(i64::MAX),
        );
    }

    pub fn on_error(&self, error: &(dyn std::error::Error + 'static)) {
        self.span
            .set_attribute("exception.message", error.to_string());
        self.span.set_status(Status::error(error.to_string()));
    }

    pub fn on_end(&self) {
        self.span.set_attribute(
            "uigen.duration_seconds",
            self.start_time.elapsed().as_secs_f64(),
        );
    }
}

/// Run one provider call inside a `uigen.generate` span.
pub async fn trace_generate<Fut>(
    provider: &str,
    model: &str,
    credential: CredentialSource,
    call: Fut,
) -> GenerationResult<Generation>
where
    Fut: std::future::Future<Output = GenerationResult<Generation>>,
{
    let span = GenerationSpan::new(provider, model, credential);
    let result = span.instrument_future(call).await;

    match &result {
        Ok(generation) => span.on_generation(generation),
        Err(error) => span.on_error(error),
    }

    span.on_end();
    result
}
