//! Prompt assembly - user prompt templates and the system prompt.

use std::path::Path;

/// Base instructions used when `coach_system.md` is not available.
pub const FALLBACK_SYSTEM_PROMPT: &str = "You are an expert Through the Ages coach specializing in tournament-level \
adaptive play for 4-player games with military escalation dynamics.";

const KNOWLEDGE_PREFACE: &str = "Use the following strategy knowledge when evaluating moves. \
All principles here represent tournament-level best practices.";

/// File names inside the prompts directory.
pub const SYSTEM_PROMPT_FILE: &str = "coach_system.md";
pub const SCREENSHOT_PROMPT_FILE: &str = "parse_screenshot.md";

/// What the caller wants from the coach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoachingMode {
    /// Top three ranked moves.
    Suggest,
    /// Score a move the player is considering.
    Evaluate { proposed_move: String },
}

impl CoachingMode {
    /// Section title used when displaying the answer.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Suggest => "COACHING ADVICE",
            Self::Evaluate { .. } => "MOVE EVALUATION",
        }
    }

    /// Build the user prompt for this mode around a formatted state block.
    pub fn build_prompt(&self, game_state_text: &str) -> String {
        match self {
            Self::Suggest => build_suggest_prompt(game_state_text),
            Self::Evaluate { proposed_move } => build_evaluate_prompt(game_state_text, proposed_move),
        }
    }
}

pub fn build_suggest_prompt(game_state_text: &str) -> String {
    format!(
        "Here is the current game state:

{game_state_text}

Please analyze this game state and suggest the top 3 moves I should consider this turn,
ranked by strategic priority.

For each move:
1. Name the action clearly
2. Explain why it is the right move given the current numbers
3. Note any trade-offs or conditions that could change the recommendation

Then provide one overall strategic insight about my current game state:
what is my biggest structural advantage or risk right now?"
    )
}

pub fn build_evaluate_prompt(game_state_text: &str, proposed_move: &str) -> String {
    format!(
        "Here is the current game state:

{game_state_text}

PROPOSED MOVE: {proposed_move}

Please evaluate this move with:
1. A score from 1-10 (10 = perfectly optimal given the situation)
2. Your assessment: why is this move good or bad given this specific game state?
3. Specific reasoning referencing actual numbers (military gaps, civil actions,
   science production, culture rate, etc.)
4. If the score is below 8: the top 2 alternative moves you would recommend instead
5. One specific action or situation to watch for next turn"
    )
}

/// The system prompt sent with every coaching call. Built once and never
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPrompt {
    text: String,
}

impl SystemPrompt {
    /// Combine base instructions with optional strategy knowledge. Blank
    /// knowledge leaves the base untouched.
    pub fn assemble(base: &str, knowledge: Option<&str>) -> Self {
        let text = match knowledge {
            Some(k) if !k.trim().is_empty() => format!(
                "{base}\n\n---\n\n## Strategy Knowledge Base\n\n{KNOWLEDGE_PREFACE}\n\n{k}"
            ),
            _ => base.to_string(),
        };
        Self { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl Default for SystemPrompt {
    fn default() -> Self {
        Self::assemble(FALLBACK_SYSTEM_PROMPT, None)
    }
}

/// Read `coach_system.md` from the prompts directory, falling back to the
/// built-in instructions.
pub fn load_base_system_prompt(prompts_dir: &Path) -> String {
    let path = prompts_dir.join(SYSTEM_PROMPT_FILE);
    match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "Using fallback system prompt");
            FALLBACK_SYSTEM_PROMPT.to_string()
        }
    }
}

/// Read the screenshot-extraction instructions, if present.
pub fn load_screenshot_prompt(prompts_dir: &Path) -> Option<String> {
    let path = prompts_dir.join(SCREENSHOT_PROMPT_FILE);
    std::fs::read_to_string(&path)
        .map_err(|err| {
            tracing::debug!(path = %path.display(), error = %err, "Screenshot prompt not available");
        })
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggest_prompt_literal() {
        let expected = "Here is the current game state:

AGE: 1

Please analyze this game state and suggest the top 3 moves I should consider this turn,
ranked by strategic priority.

For each move:
1. Name the action clearly
2. Explain why it is the right move given the current numbers
3. Note any trade-offs or conditions that could change the recommendation

Then provide one overall strategic insight about my current game state:
what is my biggest structural advantage or risk right now?";
        assert_eq!(build_suggest_prompt("AGE: 1"), expected);
    }

    #[test]
    fn test_evaluate_prompt_embeds_move() {
        let prompt = build_evaluate_prompt("AGE: 2", "Draft Code of Laws");
        assert!(prompt.starts_with("Here is the current game state:\n\nAGE: 2\n\nPROPOSED MOVE: Draft Code of Laws\n\n"));
        assert!(prompt.contains("1. A score from 1-10"));
        assert!(prompt.contains("4. If the score is below 8: the top 2 alternative moves"));
        assert!(prompt.ends_with("5. One specific action or situation to watch for next turn"));
    }

    #[test]
    fn test_mode_dispatch() {
        let evaluate = CoachingMode::Evaluate {
            proposed_move: "Build a mine".into(),
        };
        assert_eq!(evaluate.build_prompt("S"), build_evaluate_prompt("S", "Build a mine"));
        assert_eq!(CoachingMode::Suggest.build_prompt("S"), build_suggest_prompt("S"));
        assert_eq!(evaluate.label(), "MOVE EVALUATION");
        assert_eq!(CoachingMode::Suggest.label(), "COACHING ADVICE");
    }

    #[test]
    fn test_system_prompt_with_knowledge() {
        let prompt = SystemPrompt::assemble("BASE", Some("### Military\n\nstuff"));
        assert_eq!(
            prompt.as_str(),
            "BASE\n\n---\n\n## Strategy Knowledge Base\n\n\
Use the following strategy knowledge when evaluating moves. \
All principles here represent tournament-level best practices.\n\n### Military\n\nstuff"
        );
    }

    #[test]
    fn test_system_prompt_without_knowledge() {
        assert_eq!(SystemPrompt::assemble("BASE", None).as_str(), "BASE");
        assert_eq!(SystemPrompt::assemble("BASE", Some("  \n")).as_str(), "BASE");
        assert_eq!(SystemPrompt::default().as_str(), FALLBACK_SYSTEM_PROMPT);
    }

    #[test]
    fn test_prompt_files_fallback() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_base_system_prompt(dir.path()), FALLBACK_SYSTEM_PROMPT);
        assert_eq!(load_screenshot_prompt(dir.path()), None);

        std::fs::write(dir.path().join(SYSTEM_PROMPT_FILE), "Coach well.").unwrap();
        std::fs::write(dir.path().join(SCREENSHOT_PROMPT_FILE), "Read the board.").unwrap();
        assert_eq!(load_base_system_prompt(dir.path()), "Coach well.");
        assert_eq!(load_screenshot_prompt(dir.path()).as_deref(), Some("Read the board."));
    }
}
