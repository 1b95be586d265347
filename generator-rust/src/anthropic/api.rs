//! Messages API shapes used for component generation.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug, Clone)]
pub struct CreateMessageParams {
    pub model: String,
    /// The maximum number of tokens to generate before stopping.
    pub max_tokens: u32,
    /// System prompt.
    pub system: String,
    pub messages: Vec<InputMessage>,
}

#[derive(Serialize, Debug, Clone)]
pub struct InputMessage {
    pub role: InputMessageRole,
    pub content: String,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InputMessageRole {
    User,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Message {
    /// Content generated by the model.
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

/// Only text blocks carry a payload we use; other block types deserialize
/// with `text` unset.
#[derive(Deserialize, Debug, Clone)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl Message {
    /// Text of the first content block.
    pub fn first_text(self) -> Option<String> {
        self.content
            .into_iter()
            .next()?
            .text
            .filter(|text| !text.is_empty())
    }
}
