use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use super::dto::{OutboundMessage, PushRequest, ReplyRequest};
use crate::config::LineConfig;

/// LINE rejects text messages longer than this.
const MAX_TEXT_CHARS: usize = 5000;

/// Outbound side of the chat platform.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn reply_text(&self, reply_token: &str, text: &str) -> anyhow::Result<()>;
    async fn push_text(&self, user_id: &str, text: &str) -> anyhow::Result<()>;
    async fn message_content(&self, message_id: &str) -> anyhow::Result<Bytes>;
}

#[derive(Clone)]
pub struct LineClient {
    http: reqwest::Client,
    config: LineConfig,
}

fn text_message(text: &str) -> OutboundMessage {
    OutboundMessage::Text {
        text: text.chars().take(MAX_TEXT_CHARS).collect(),
    }
}

impl LineClient {
    pub fn new(config: LineConfig, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build LINE http client")?;
        Ok(Self { http, config })
    }

    async fn post_json<T: serde::Serialize + ?Sized>(&self, path: &str, body: &T) -> anyhow::Result<()> {
        let url = format!("{}{}", self.config.api_base, path);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.channel_access_token)
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {}", path))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("LINE API error {} on {}: {}", status, path, body);
        }
        Ok(())
    }
}

#[async_trait]
impl Messenger for LineClient {
    async fn reply_text(&self, reply_token: &str, text: &str) -> anyhow::Result<()> {
        let req = ReplyRequest {
            reply_token,
            messages: vec![text_message(text)],
        };
        self.post_json("/v2/bot/message/reply", &req).await?;
        debug!("reply sent");
        Ok(())
    }

    async fn push_text(&self, user_id: &str, text: &str) -> anyhow::Result<()> {
        let req = PushRequest {
            to: user_id,
            messages: vec![text_message(text)],
        };
        self.post_json("/v2/bot/message/push", &req).await?;
        debug!(user_id = %user_id, "push sent");
        Ok(())
    }

    async fn message_content(&self, message_id: &str) -> anyhow::Result<Bytes> {
        let url = format!(
            "{}/v2/bot/message/{}/content",
            self.config.data_api_base, message_id
        );
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.config.channel_access_token)
            .send()
            .await
            .context("GET message content")?
            .error_for_status()
            .context("LINE content API")?;
        let bytes = response.bytes().await.context("read message content")?;
        debug!(message_id = %message_id, size = bytes.len(), "message content downloaded");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_text_is_cut_to_line_limit() {
        let OutboundMessage::Text { text } = text_message(&"鈉".repeat(MAX_TEXT_CHARS + 10));
        assert_eq!(text.chars().count(), MAX_TEXT_CHARS);
    }
}
