pub mod client;
pub mod dto;
pub mod handlers;
mod signature;

use crate::state::AppState;
use axum::Router;

pub use client::{LineClient, Messenger};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::webhook_routes())
}

#[cfg(test)]
pub(crate) use signature::sign;
