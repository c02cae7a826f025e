//! Adapters - LLM service integrations.
//!
//! The coach only needs prompt in, text out. Everything else about the
//! service stays behind [`LlmClient`].

mod anthropic;

use async_trait::async_trait;

use crate::error::Result;

pub use anthropic::AnthropicClient;

/// One piece of the user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    Text(String),
    /// Base64-encoded image with its media type, e.g. `image/png`.
    Image { media_type: String, data: String },
}

/// A single-turn completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub model: String,
    pub max_tokens: u32,
    pub system: Option<String>,
    pub content: Vec<ContentBlock>,
}

impl CompletionRequest {
    /// Text-only request with a system prompt.
    pub fn text(model: impl Into<String>, max_tokens: u32, system: &str, user: String) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            system: Some(system.to_string()),
            content: vec![ContentBlock::Text(user)],
        }
    }
}

/// Trait for LLM service clients.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one request and return the first text block of the answer.
    async fn complete(&self, request: CompletionRequest) -> Result<String>;

    /// Service name for logs
    fn name(&self) -> &'static str;
}
