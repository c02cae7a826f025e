//! Game state model - one snapshot of a Through the Ages table.
//!
//! Every numeric field is optional. Absence means "unknown" and is rendered
//! as a placeholder downstream; it is never defaulted to zero.

use serde::{Deserialize, Serialize};

use crate::error::{CoachError, Result};
use crate::military::{self, MilitarySummary};

/// A snapshot of the game from the coached player's seat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    pub meta: Meta,
    pub player: PlayerState,
    /// Opponents in seating order as supplied by the caller.
    pub opponents: Vec<OpponentState>,
    pub card_row: CardRow,
    pub events: Events,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    /// Current age (1-3)
    pub age: Option<i32>,
    pub round: Option<i32>,
    pub player_count: Option<i32>,
}

/// The coached player's civilization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerState {
    pub civil_actions: Option<i32>,
    pub military_actions: Option<i32>,
    pub food_production: Option<i32>,
    pub ore_production: Option<i32>,
    pub science_production: Option<i32>,
    pub culture_production: Option<i32>,
    pub military_strength: Option<i32>,
    pub culture_points: Option<i32>,
    pub leader: Option<String>,
    /// Lists keep caller order, which is the display priority.
    pub wonders_complete: Vec<String>,
    pub wonders_in_progress: Vec<String>,
    pub technologies: Vec<String>,
    pub hand_cards: Vec<String>,
}

/// What is known about an opponent. Culture figures are estimates since
/// opponents' exact state is hidden information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpponentState {
    pub id: String,
    pub military_strength: Option<i32>,
    pub culture_production_estimate: Option<i32>,
    pub culture_points_estimate: Option<i32>,
    /// Free-text remark, older files use `_note`.
    #[serde(rename = "_note", skip_serializing_if = "Option::is_none")]
    pub legacy_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Default for OpponentState {
    fn default() -> Self {
        Self {
            id: "opponent".to_string(),
            military_strength: None,
            culture_production_estimate: None,
            culture_points_estimate: None,
            legacy_note: None,
            notes: None,
        }
    }
}

impl OpponentState {
    /// The trailing remark for this opponent, preferring `_note` over `notes`.
    pub fn note(&self) -> Option<&str> {
        non_blank(self.legacy_note.as_deref()).or_else(|| non_blank(self.notes.as_deref()))
    }
}

/// Purchasable cards currently visible, grouped by age.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardRow {
    pub age_1_cards: Vec<String>,
    pub age_2_cards: Vec<String>,
    pub age_3_cards: Vec<String>,
}

impl CardRow {
    /// All visible cards, age 1 first, then age 2, then age 3.
    pub fn in_age_order(&self) -> impl Iterator<Item = &str> {
        self.age_1_cards
            .iter()
            .chain(&self.age_2_cards)
            .chain(&self.age_3_cards)
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.age_1_cards.is_empty() && self.age_2_cards.is_empty() && self.age_3_cards.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Events {
    pub next_visible: Option<String>,
}

impl GameState {
    /// Parse a game-state JSON document and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let state: Self = serde_json::from_str(json)
            .map_err(|e| CoachError::validation("game_state", e.to_string()))?;
        state.validate()?;
        Ok(state)
    }

    /// Convert a loosely typed mapping (e.g. screenshot extraction output)
    /// into a validated state.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let state: Self = serde_json::from_value(value)
            .map_err(|e| CoachError::validation("game_state", e.to_string()))?;
        state.validate()?;
        Ok(state)
    }

    /// Check the schema constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        check_range("meta.age", self.meta.age, 1, 3)?;
        check_range("meta.round", self.meta.round, 1, i32::MAX)?;
        check_range("meta.player_count", self.meta.player_count, 2, 4)?;
        check_range("player.civil_actions", self.player.civil_actions, 0, i32::MAX)?;
        check_range("player.military_actions", self.player.military_actions, 0, i32::MAX)?;
        check_range("player.military_strength", self.player.military_strength, 0, i32::MAX)?;

        for (i, opp) in self.opponents.iter().enumerate() {
            check_range(
                &format!("opponents[{i}].military_strength"),
                opp.military_strength,
                0,
                i32::MAX,
            )?;
        }
        Ok(())
    }

    /// Known opponent military strengths, skipping unknown ones.
    pub fn opponent_strengths(&self) -> Vec<i32> {
        self.opponents
            .iter()
            .filter_map(|o| o.military_strength)
            .collect()
    }

    /// Military situation against the strongest known opponent.
    pub fn military_summary(&self) -> Option<MilitarySummary> {
        military::summarize(self.player.military_strength, &self.opponent_strengths())
    }
}

fn check_range(field: &str, value: Option<i32>, min: i32, max: i32) -> Result<()> {
    match value {
        Some(v) if v < min || v > max => {
            let expected = if max == i32::MAX {
                format!("must be at least {min}, got {v}")
            } else {
                format!("must be between {min} and {max}, got {v}")
            };
            Err(CoachError::validation(field, expected))
        }
        _ => Ok(()),
    }
}

pub(crate) fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}
