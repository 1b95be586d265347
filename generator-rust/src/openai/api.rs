//! Chat Completions request/response shapes shared by OpenAI, DeepSeek and
//! xAI.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug, Clone)]
pub struct CreateChatCompletionRequest {
    /// Model ID used to generate the response, like `gpt-4o`.
    pub model: String,
    pub messages: Vec<ChatCompletionRequestMessage>,
    /// Setting to `{ "type": "json_object" }` enables JSON mode, which
    /// ensures the message the model generates is valid JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

#[derive(Serialize, Debug, Clone)]
pub struct ChatCompletionRequestMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    JsonObject,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CreateChatCompletionResponse {
    /// A list of chat completion choices.
    #[serde(default)]
    pub choices: Vec<ChatCompletionChoice>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ChatCompletionChoice {
    #[serde(default)]
    pub message: Option<ChatCompletionResponseMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ChatCompletionResponseMessage {
    /// The contents of the message.
    #[serde(default)]
    pub content: Option<String>,
    /// The refusal message generated by the model.
    #[serde(default)]
    pub refusal: Option<String>,
}

impl CreateChatCompletionResponse {
    /// Content of the first choice, if it has any.
    pub fn first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()?
            .message?
            .content
            .filter(|content| !content.is_empty())
    }
}
