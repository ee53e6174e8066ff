use serde::{Deserialize, Serialize};

/// Request body LINE posts to the webhook.
#[derive(Debug, Deserialize)]
pub struct WebhookBody {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub reply_token: Option<String>,
    pub source: Option<EventSource>,
    pub message: Option<EventMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventMessage {
    Text { text: String },
    Image { id: String },
    #[serde(other)]
    Unsupported,
}

/// A message event the bot knows how to answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub user_id: String,
    pub reply_token: String,
    pub content: MessageContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    Text(String),
    Image { message_id: String },
}

impl WebhookEvent {
    /// `None` for non-message events, unsupported message types and events without a user.
    pub fn into_incoming(self) -> Option<IncomingMessage> {
        if self.kind != "message" {
            return None;
        }
        let user_id = self.source?.user_id?;
        let reply_token = self.reply_token?;
        let content = match self.message? {
            EventMessage::Text { text } => MessageContent::Text(text),
            EventMessage::Image { id } => MessageContent::Image { message_id: id },
            EventMessage::Unsupported => return None,
        };
        Some(IncomingMessage {
            user_id,
            reply_token,
            content,
        })
    }
}

// ---- outbound ----

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundMessage {
    Text { text: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest<'a> {
    pub reply_token: &'a str,
    pub messages: Vec<OutboundMessage>,
}

#[derive(Debug, Serialize)]
pub struct PushRequest<'a> {
    pub to: &'a str,
    pub messages: Vec<OutboundMessage>,
}
