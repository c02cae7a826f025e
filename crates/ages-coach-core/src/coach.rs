//! Coaching orchestrator - state to prompt to model to answer.

use anyhow::Context;
use tracing::Instrument;
use uuid::Uuid;

use crate::adapters::{CompletionRequest, ContentBlock, LlmClient};
use crate::api::{
    CoachResponse, EvaluateMoveRequest, HealthStatus, ParseScreenshotRequest,
    ParseScreenshotResponse, SuggestMovesRequest,
};
use crate::config::CoachConfig;
use crate::error::{CoachError, Result};
use crate::extract;
use crate::format::format_game_state;
use crate::prompt::{self, CoachingMode, SystemPrompt};
use crate::state::GameState;
use crate::strategy::{KnowledgeSource, StrategyLibrary};

/// System prompts shorter than this are taken to be missing the knowledge base.
const STRATEGY_LOADED_MIN_LEN: usize = 500;

/// Runs coaching requests against an LLM client. The system prompt is fixed
/// at construction.
pub struct Coach<C> {
    client: C,
    system_prompt: SystemPrompt,
    screenshot_prompt: Option<String>,
    max_tokens: u32,
    vision_model: String,
    vision_max_tokens: u32,
}

impl<C: LlmClient> Coach<C> {
    pub fn new(client: C, system_prompt: SystemPrompt, config: &CoachConfig) -> Self {
        Self {
            client,
            system_prompt,
            screenshot_prompt: None,
            max_tokens: config.max_tokens,
            vision_model: config.model.clone(),
            vision_max_tokens: config.vision_max_tokens,
        }
    }

    /// Build the system prompt from the configured prompt and strategy
    /// directories. `inject_strategy = false` skips the knowledge base.
    pub fn from_config(client: C, config: &CoachConfig, inject_strategy: bool) -> anyhow::Result<Self> {
        let base = prompt::load_base_system_prompt(&config.prompts_dir);
        let knowledge = if inject_strategy {
            Some(
                StrategyLibrary::new(&config.strategy_dir)
                    .load_ordered_knowledge()
                    .context("Failed to load strategy knowledge")?,
            )
        } else {
            None
        };

        let system_prompt = SystemPrompt::assemble(&base, knowledge.as_deref());
        tracing::info!(
            client = client.name(),
            system_prompt_len = system_prompt.len(),
            strategy = inject_strategy,
            "Coach ready"
        );

        let mut coach = Self::new(client, system_prompt, config);
        coach.screenshot_prompt = prompt::load_screenshot_prompt(&config.prompts_dir);
        Ok(coach)
    }

    pub fn with_screenshot_prompt(mut self, text: impl Into<String>) -> Self {
        self.screenshot_prompt = Some(text.into());
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn system_prompt(&self) -> &SystemPrompt {
        &self.system_prompt
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "ok".to_string(),
            strategy_loaded: self.system_prompt.len() > STRATEGY_LOADED_MIN_LEN,
        }
    }

    /// Format the state, build the prompt for `mode` and return the advice.
    pub async fn advise(&self, state: &GameState, mode: &CoachingMode, model: &str) -> Result<String> {
        let state_text = format_game_state(state);
        let user_prompt = mode.build_prompt(&state_text);
        let request = CompletionRequest::text(model, self.max_tokens, self.system_prompt.as_str(), user_prompt);

        let span = tracing::info_span!(
            "coach_request",
            request_id = %Uuid::new_v4(),
            mode = mode.label(),
            model = %model
        );
        async {
            let advice = self.client.complete(request).await?;
            tracing::info!(chars = advice.len(), "Advice received");
            Ok::<_, CoachError>(advice)
        }
        .instrument(span)
        .await
    }

    pub async fn suggest_moves(&self, req: &SuggestMovesRequest) -> Result<CoachResponse> {
        req.game_state.validate()?;
        let advice = self
            .advise(&req.game_state, &CoachingMode::Suggest, &req.model)
            .await?;
        Ok(CoachResponse {
            advice,
            model: req.model.clone(),
        })
    }

    pub async fn evaluate_move(&self, req: &EvaluateMoveRequest) -> Result<CoachResponse> {
        req.game_state.validate()?;
        let mode = CoachingMode::Evaluate {
            proposed_move: req.proposed_move.clone(),
        };
        let advice = self.advise(&req.game_state, &mode, &req.model).await?;
        Ok(CoachResponse {
            advice,
            model: req.model.clone(),
        })
    }

    /// Ask the model to read a screenshot and extract the game state from
    /// its answer.
    pub async fn parse_screenshot(&self, req: &ParseScreenshotRequest) -> Result<ParseScreenshotResponse> {
        let instructions = self
            .screenshot_prompt
            .as_deref()
            .ok_or_else(|| CoachError::configuration(format!("{} prompt not found", prompt::SCREENSHOT_PROMPT_FILE)))?;

        let request = CompletionRequest {
            model: self.vision_model.clone(),
            max_tokens: self.vision_max_tokens,
            system: None,
            content: vec![
                ContentBlock::Image {
                    media_type: req.media_type.clone(),
                    data: req.image_base64.clone(),
                },
                ContentBlock::Text(instructions.to_string()),
            ],
        };

        let span = tracing::info_span!(
            "coach_request",
            request_id = %Uuid::new_v4(),
            mode = "SCREENSHOT",
            media_type = %req.media_type
        );
        async {
            let raw = self.client.complete(request).await?;
            let extracted = extract::extract(&raw).map_err(|err| {
                tracing::warn!(error = %err, "Model response was not parseable");
                err
            })?;
            Ok::<_, CoachError>(ParseScreenshotResponse {
                game_state: extracted.game_state,
                notes: extracted.notes,
            })
        }
        .instrument(span)
        .await
    }
}
