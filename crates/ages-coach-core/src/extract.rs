//! Response extraction - recover a game-state mapping from model output.
//!
//! Two steps: [`lex_payload`] decides whether the text is fenced and cuts out
//! the candidate payload, then [`parse_payload`] decodes and unwraps it.
//! This is the only place model-generated text becomes structured data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoachError, Result};
use crate::state::GameState;

const FENCE: &str = "```";

/// Key under which a wrapped response nests the state.
pub const STATE_KEY: &str = "game_state";
pub const NOTES_KEY: &str = "notes";
pub const DEFAULT_NOTES: &str = "Game state extracted from screenshot.";

/// Characters of offending text kept in a parse error.
pub const EXCERPT_CHARS: usize = 300;

/// Candidate payload found by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload<'a> {
    /// Text opened with a fence; `body` is the interior of the first block.
    Fenced { language: Option<&'a str>, body: &'a str },
    /// No fence, the whole trimmed text.
    Bare(&'a str),
}

impl<'a> Payload<'a> {
    pub fn text(&self) -> &'a str {
        match *self {
            Self::Fenced { body, .. } => body,
            Self::Bare(text) => text,
        }
    }
}

/// Structured result of extraction. Not guaranteed to be a valid
/// [`GameState`]; see [`ExtractedState::into_game_state`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedState {
    pub game_state: Map<String, Value>,
    pub notes: String,
}

impl ExtractedState {
    /// Typed validation of the extracted mapping.
    pub fn into_game_state(self) -> Result<GameState> {
        GameState::from_value(Value::Object(self.game_state))
    }
}

/// Trim the text and, if it opens with a fence, keep only the interior of
/// the first fenced block.
pub fn lex_payload(raw: &str) -> Payload<'_> {
    let text = raw.trim();
    let Some(after_open) = text.strip_prefix(FENCE) else {
        return Payload::Bare(text);
    };

    // An unterminated block runs to the end of the text.
    let interior = match after_open.find(FENCE) {
        Some(end) => &after_open[..end],
        None => after_open,
    };

    let (language, body) = split_language_tag(interior);
    Payload::Fenced {
        language,
        body: body.trim(),
    }
}

/// A language tag is a run of letters, digits, `-`, `_` or `+` that starts
/// with a letter and sits right after the opening fence. JSON payloads never
/// start with a letter here, except bare literals, which are not objects.
fn split_language_tag(interior: &str) -> (Option<&str>, &str) {
    if !interior.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return (None, interior);
    }
    let end = interior
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+')))
        .unwrap_or(interior.len());
    (Some(&interior[..end]), &interior[end..])
}

/// Decode the payload text and unwrap the optional `game_state` envelope.
pub fn parse_payload(payload: &str) -> Result<ExtractedState> {
    let value: Value = serde_json::from_str(payload).map_err(|e| CoachError::Parse {
        message: e.to_string(),
        line: e.line(),
        column: e.column(),
        excerpt: excerpt(payload),
    })?;

    let mut object = match value {
        Value::Object(object) => object,
        other => {
            return Err(CoachError::Parse {
                message: format!("expected a JSON object, found {}", json_type(&other)),
                line: 1,
                column: 1,
                excerpt: excerpt(payload),
            })
        }
    };

    let notes = match object.get(NOTES_KEY) {
        Some(Value::String(notes)) => notes.clone(),
        _ => DEFAULT_NOTES.to_string(),
    };

    let game_state = match object.remove(STATE_KEY) {
        Some(Value::Object(inner)) => inner,
        Some(other) => {
            // Not a wrapper after all; keep the flat object intact.
            object.insert(STATE_KEY.to_string(), other);
            object
        }
        None => object,
    };

    Ok(ExtractedState { game_state, notes })
}

/// Full extraction: lex, then parse.
pub fn extract(raw: &str) -> Result<ExtractedState> {
    let payload = lex_payload(raw);
    tracing::debug!(
        fenced = matches!(payload, Payload::Fenced { .. }),
        bytes = payload.text().len(),
        "Extracting state from model response"
    );
    parse_payload(payload.text())
}

fn excerpt(text: &str) -> String {
    text.chars().take(EXCERPT_CHARS).collect()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
