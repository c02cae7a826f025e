//! Request and response types for the coaching operations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::default_model;
use crate::error::CoachError;
use crate::state::GameState;

fn default_media_type() -> String {
    "image/png".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestMovesRequest {
    pub game_state: GameState,
    #[serde(default = "default_model")]
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluateMoveRequest {
    pub game_state: GameState,
    pub proposed_move: String,
    #[serde(default = "default_model")]
    pub model: String,
}

/// Advice text and the model that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachResponse {
    pub advice: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseScreenshotRequest {
    pub image_base64: String,
    #[serde(default = "default_media_type")]
    pub media_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseScreenshotResponse {
    pub game_state: Map<String, Value>,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub strategy_loaded: bool,
}

/// JSON error body with a stable `kind` label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub kind: String,
    pub status: u16,
    pub detail: String,
}

impl From<&CoachError> for ErrorResponse {
    fn from(err: &CoachError) -> Self {
        Self {
            kind: err.kind().to_string(),
            status: err.status_code(),
            detail: err.to_string(),
        }
    }
}
