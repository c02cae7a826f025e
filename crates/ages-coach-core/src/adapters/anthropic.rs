//! Anthropic adapter - Messages API over HTTPS.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{CompletionRequest, ContentBlock, LlmClient};
use crate::config::CoachConfig;
use crate::error::{CoachError, Result};

/// Client for `POST {base}/v1/messages`.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    http: Client,
    endpoint: String,
    api_key: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Vec<WireBlock<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WireBlock<'a> {
    Text { text: &'a str },
    Image { source: ImageSource<'a> },
}

#[derive(Debug, Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>, config: &CoachConfig) -> Self {
        Self {
            http: Client::new(),
            endpoint: format!("{}/v1/messages", config.api_base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            version: config.anthropic_version.clone(),
        }
    }

    /// Build a client, resolving the credential from the environment or config.
    pub fn from_config(config: &CoachConfig) -> Result<Self> {
        Ok(Self::new(config.api_key()?, config))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        tracing::info!(
            model = %request.model,
            max_tokens = request.max_tokens,
            blocks = request.content.len(),
            "Calling Anthropic Messages API"
        );

        let body = wire_request(&request);
        let response = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", self.api_key.as_str())
            .header("anthropic-version", self.version.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| CoachError::upstream(e.status().map(|s| s.as_u16()), e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CoachError::upstream(Some(status.as_u16()), e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Anthropic API returned an error");
            return Err(CoachError::upstream(Some(status.as_u16()), error_message(&text)));
        }

        first_text(&text).map_err(|message| CoachError::upstream(Some(status.as_u16()), message))
    }

    fn name(&self) -> &'static str {
        "anthropic"
    }
}

fn wire_request(request: &CompletionRequest) -> MessagesRequest<'_> {
    let content = request
        .content
        .iter()
        .map(|block| match block {
            ContentBlock::Text(text) => WireBlock::Text { text },
            ContentBlock::Image { media_type, data } => WireBlock::Image {
                source: ImageSource {
                    kind: "base64",
                    media_type,
                    data,
                },
            },
        })
        .collect();

    MessagesRequest {
        model: &request.model,
        max_tokens: request.max_tokens,
        system: request.system.as_deref(),
        messages: vec![Message {
            role: "user",
            content,
        }],
    }
}

/// Text of the first text block in a successful response body.
fn first_text(body: &str) -> std::result::Result<String, String> {
    let response: MessagesResponse =
        serde_json::from_str(body).map_err(|e| format!("response decode failed: {e}"))?;
    response
        .content
        .into_iter()
        .find(|b| b.kind == "text")
        .and_then(|b| b.text)
        .ok_or_else(|| "response contained no text block".to_string())
}

/// Human-readable message from an error body, or the body itself.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}
