use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use base64ct::{Base64, Encoding};
use bytes::Bytes;
use tracing::{debug, warn};

use super::dto::{GenerateContentRequest, GenerateContentResponse, Part};
use crate::config::GeminiConfig;

/// Generative model behind the bot's replies.
#[async_trait]
pub trait AiClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
    async fn generate_with_image(
        &self,
        prompt: &str,
        image: Bytes,
        mime_type: &str,
    ) -> anyhow::Result<String>;
}

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build Gemini http client")?;
        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base, self.config.model
        )
    }

    async fn generate_content(&self, request: &GenerateContentRequest) -> anyhow::Result<String> {
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await
            .context("Gemini request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error {}: {}", status, body);
        }

        let parsed: GenerateContentResponse =
            response.json().await.context("decode Gemini response")?;
        match parsed.text() {
            Some(text) => {
                debug!(chars = text.chars().count(), "Gemini reply received");
                Ok(text)
            }
            None => {
                let reason = parsed
                    .candidates
                    .first()
                    .and_then(|c| c.finish_reason.clone())
                    .unwrap_or_else(|| "no candidates".into());
                warn!(%reason, "Gemini returned no text");
                anyhow::bail!("Gemini returned no text ({})", reason)
            }
        }
    }
}

#[async_trait]
impl AiClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let request = GenerateContentRequest::user(vec![Part::text(prompt)]);
        self.generate_content(&request).await
    }

    async fn generate_with_image(
        &self,
        prompt: &str,
        image: Bytes,
        mime_type: &str,
    ) -> anyhow::Result<String> {
        anyhow::ensure!(!image.is_empty(), "empty image");
        let request = GenerateContentRequest::user(vec![
            Part::text(prompt),
            Part::inline(mime_type, Base64::encode_string(&image)),
        ]);
        self.generate_content(&request).await
    }
}
