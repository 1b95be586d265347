use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    /// The configuration names a provider with no registered strategy.
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),
    /// The selected provider requires an API key and none was available.
    #[error("API Key is missing for {0}")]
    MissingCredential(&'static str),
    /// The provider endpoint answered with a non-success status.
    #[error("{message} ({provider}, status {status})")]
    ProviderError {
        provider: &'static str,
        status: reqwest::StatusCode,
        message: String,
    },
    /// The call succeeded but carried no text to parse.
    #[error("No content received from {0}")]
    EmptyResponse(&'static str),
    /// The payload was not a JSON object with the four component fields.
    #[error("Malformed response from {provider}: {reason}")]
    MalformedResponse {
        provider: &'static str,
        reason: String,
        raw: String,
    },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The request never produced an HTTP response, or its body could not be
    /// read.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl GenerationError {
    /// The raw provider text that failed to parse, kept for diagnostics.
    #[must_use]
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            Self::MalformedResponse { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

pub type GenerationResult<T> = Result<T, GenerationError>;
