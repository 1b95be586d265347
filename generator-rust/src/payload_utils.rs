use crate::{GeneratedComponent, GenerationError, GenerationResult};

/// Remove markdown code-fence markers that chat models like to wrap JSON in.
#[must_use]
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse a payload that is expected to be raw JSON.
///
/// All four component fields must be present and be strings; anything else
/// is reported as malformed with the original text attached.
pub fn parse_component(provider: &'static str, text: &str) -> GenerationResult<GeneratedComponent> {
    serde_json::from_str::<GeneratedComponent>(text).map_err(|error| {
        GenerationError::MalformedResponse {
            provider,
            reason: error.to_string(),
            raw: text.to_string(),
        }
    })
}

/// Strip fences, then parse. The error keeps the text as the provider sent it.
pub fn parse_fenced_component(
    provider: &'static str,
    text: &str,
) -> GenerationResult<GeneratedComponent> {
    parse_component(provider, &strip_code_fences(text)).map_err(|error| match error {
        GenerationError::MalformedResponse { reason, .. } => GenerationError::MalformedResponse {
            provider,
            reason,
            raw: text.to_string(),
        },
        other => other,
    })
}
