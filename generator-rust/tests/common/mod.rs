#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    Router,
};
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use uigen::{Dispatcher, DispatcherOptions, GeneratedComponent};

pub const CARD_JSON: &str =
    r#"{"name":"Card","description":"d","code":"c","previewHtml":"<html></html>"}"#;

pub fn card() -> GeneratedComponent {
    GeneratedComponent {
        name: "Card".to_string(),
        description: "d".to_string(),
        code: "c".to_string(),
        preview_html: "<html></html>".to_string(),
    }
}

pub fn gemini_body(text: &str) -> String {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "modelVersion": "gemini-2.5-flash"
    })
    .to_string()
}

pub fn chat_completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

pub fn anthropic_body(text: &str) -> String {
    json!({
        "id": "msg_1",
        "type": "message",
        "role": "assistant",
        "model": "claude-3-5-sonnet-latest",
        "content": [{ "type": "text", "text": text }],
        "stop_reason": "end_turn"
    })
    .to_string()
}

pub fn error_body(message: &str) -> String {
    json!({ "error": { "message": message, "type": "invalid_request_error" } }).to_string()
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HashMap<String, String>,
    pub body: Value,
}

struct StubState {
    status: StatusCode,
    body: String,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Local HTTP server that answers every request with one canned response
/// and records what it received.
pub struct StubServer {
    pub url: String,
    state: Arc<StubState>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl StubServer {
    pub async fn start(status: u16, body: impl Into<String>) -> Self {
        let state = Arc::new(StubState {
            status: StatusCode::from_u16(status).expect("valid status"),
            body: body.into(),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub server");
        let addr = listener.local_addr().expect("stub server address");
        let url = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            });

            if let Err(err) = server.await {
                eprintln!("stub server error: {err}");
            }
        });

        Self {
            url,
            state,
            shutdown: Some(shutdown_tx),
            handle,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().expect("stub state poisoned").clone()
    }

    /// Dispatcher whose built-in strategies all point at this server.
    pub fn dispatcher(&self, gemini_fallback_api_key: Option<&str>) -> Dispatcher {
        Dispatcher::with_defaults(DispatcherOptions {
            gemini_fallback_api_key: gemini_fallback_api_key.map(str::to_string),
            gemini_base_url: Some(self.url.clone()),
            openai_base_url: Some(self.url.clone()),
            deepseek_base_url: Some(self.url.clone()),
            xai_base_url: Some(self.url.clone()),
            anthropic_base_url: Some(self.url.clone()),
            ..Default::default()
        })
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        self.handle.abort();
    }
}

async fn handle(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let recorded = RecordedRequest {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers: headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect(),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    };
    state
        .requests
        .lock()
        .expect("stub state poisoned")
        .push(recorded);

    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body.clone(),
    )
}

/// Base URL of a local port with nothing listening on it.
pub fn closed_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}
