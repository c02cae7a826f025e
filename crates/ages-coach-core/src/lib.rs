//! Ages Coach Core - strategic advice for Through the Ages from an LLM
//!
//! This crate turns a structured game state into a stable text block and
//! prompt, sends it to an LLM service, and recovers structured game state
//! from free-form model output when reading screenshots.

pub mod adapters;
pub mod api;
pub mod coach;
pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod military;
pub mod prompt;
pub mod state;
pub mod strategy;

pub use adapters::{AnthropicClient, LlmClient};
pub use coach::Coach;
pub use config::CoachConfig;
pub use error::{CoachError, Result};
pub use extract::{extract, ExtractedState};
pub use format::format_game_state;
pub use military::{MilitaryGap, MilitaryRisk, MilitarySummary};
pub use prompt::{CoachingMode, SystemPrompt};
pub use state::GameState;
pub use strategy::{KnowledgeSource, StrategyLibrary};
