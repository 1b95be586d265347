use crate::{GenerationError, GenerationResult};
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// Create a JSON request, parse the response.
/// Throws error on non-success status code. Transport errors are stripped of
/// the request URL.
pub async fn send_json<T: Serialize, R: DeserializeOwned>(
    client: &Client,
    url: &str,
    data: &T,
    headers: reqwest::header::HeaderMap,
    provider: &'static str,
) -> GenerationResult<R> {
    let response = client
        .post(url)
        .headers(headers)
        .json(data)
        .send()
        .await
        .map_err(reqwest::Error::without_url)?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GenerationError::ProviderError {
            provider,
            status,
            message: provider_error_message(&body, status),
        });
    }

    let body = response.text().await.map_err(reqwest::Error::without_url)?;
    serde_json::from_str(&body).map_err(|error| GenerationError::MalformedResponse {
        provider,
        reason: format!("Unexpected response body: {error}"),
        raw: body,
    })
}

/// Every supported provider reports failures as `{"error": {"message": ...}}`.
fn provider_error_message(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| {
            format!(
                "API Error: {}",
                status.canonical_reason().unwrap_or(status.as_str())
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_the_provider_message() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(
            provider_error_message(body, StatusCode::UNAUTHORIZED),
            "Incorrect API key provided"
        );
    }

    #[test]
    fn falls_back_to_status_text() {
        assert_eq!(
            provider_error_message("<html>bad gateway</html>", StatusCode::BAD_GATEWAY),
            "API Error: Bad Gateway"
        );
        assert_eq!(
            provider_error_message(r#"{"error":{}}"#, StatusCode::TOO_MANY_REQUESTS),
            "API Error: Too Many Requests"
        );
    }
}
