use serde::{Deserialize, Serialize};

use crate::models::Request;

/// Envelope of every Bot API response
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

impl Update {
    /// The request to handle, if this update is a plain text message
    pub fn into_request(self) -> Option<Request> {
        let message = self.message?;
        if message.is_command() {
            return None;
        }
        let text = message.text?;
        Some(Request::new(message.chat.id, message.message_id, text))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub entities: Vec<MessageEntity>,
}

impl Message {
    /// A message is a command when it opens with a `bot_command` entity
    pub fn is_command(&self) -> bool {
        self.entities
            .iter()
            .any(|e| e.kind == "bot_command" && e.offset == 0)
            || self
                .text
                .as_deref()
                .is_some_and(|text| text.starts_with('/'))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEntity {
    #[serde(rename = "type")]
    pub kind: String,
    pub offset: i64,
    pub length: i64,
}
