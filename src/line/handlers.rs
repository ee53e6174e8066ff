use axum::{extract::State, http::HeaderMap, routing::post, Router};
use bytes::Bytes;
use tracing::{debug, instrument};

use super::{
    dto::{WebhookBody, WebhookEvent},
    signature::verify_signature,
};
use crate::{
    bot,
    error::{AppError, AppResult},
    state::AppState,
};

const SIGNATURE_HEADER: &str = "x-line-signature";

pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/callback", post(callback))
}

/// LINE webhook: verify, decode, then answer each message event in order.
#[instrument(skip_all)]
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<&'static str> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::MissingSignature)?;
    verify_signature(&body, signature, &state.config.line.channel_secret)?;

    let payload: WebhookBody = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid webhook payload: {}", e)))?;
    debug!(
        destination = payload.destination.as_deref().unwrap_or(""),
        events = payload.events.len(),
        "webhook received"
    );

    for message in payload
        .events
        .into_iter()
        .filter_map(WebhookEvent::into_incoming)
    {
        bot::handle_message(&state, message).await;
    }

    Ok("OK")
}
