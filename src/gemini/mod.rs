mod client;
mod dto;

pub use client::{AiClient, GeminiClient};
