//! Game state formatter - fixed-layout text block for the prompt.
//!
//! The layout is part of the prompt contract: identical states must produce
//! byte-identical text so small edits do not shift the model's reading.

use std::fmt;

use crate::military::MilitaryGap;
use crate::state::{non_blank, GameState, OpponentState, PlayerState};

/// Rendered in place of any numeric value the caller did not supply.
pub const UNKNOWN: &str = "?";

/// Displays a value or the unknown placeholder.
struct Known<T>(Option<T>);

impl<T: fmt::Display> fmt::Display for Known<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(v) => fmt::Display::fmt(v, f),
            None => f.write_str(UNKNOWN),
        }
    }
}

/// Convert a game state into the text block embedded in prompts.
pub fn format_game_state(state: &GameState) -> String {
    let mut lines = Vec::new();

    let meta = &state.meta;
    lines.push(format!(
        "AGE: {}  |  ROUND: {}  |  PLAYERS: {}",
        Known(meta.age),
        Known(meta.round),
        Known(meta.player_count)
    ));

    push_civilization(&mut lines, &state.player);

    if !state.opponents.is_empty() {
        lines.push("\nOPPONENTS:".to_string());
        for (i, opp) in state.opponents.iter().enumerate() {
            lines.push(opponent_line(i + 1, opp, state.player.military_strength));
        }
    }

    if !state.card_row.is_empty() {
        let cards: Vec<&str> = state.card_row.in_age_order().collect();
        lines.push(format!("\nCARD ROW: {}", cards.join(", ")));
    }

    if let Some(event) = non_blank(state.events.next_visible.as_deref()) {
        lines.push(format!("\nNEXT EVENT: {event}"));
    }

    lines.join("\n")
}

fn push_civilization(lines: &mut Vec<String>, player: &PlayerState) {
    lines.push("\nYOUR CIVILIZATION:".to_string());
    lines.push(format!(
        "  Civil Actions: {}  |  Military Actions: {}",
        Known(player.civil_actions),
        Known(player.military_actions)
    ));
    lines.push(format!(
        "  Food Production: {}/turn  |  Ore Production: {}/turn",
        Known(player.food_production),
        Known(player.ore_production)
    ));
    lines.push(format!(
        "  Science: {}/turn  |  Culture Production: {}/turn",
        Known(player.science_production),
        Known(player.culture_production)
    ));
    lines.push(format!(
        "  Military Strength: {}  |  Culture Points: {}",
        Known(player.military_strength),
        Known(player.culture_points)
    ));

    if let Some(leader) = non_blank(player.leader.as_deref()) {
        lines.push(format!("  Leader: {leader}"));
    }

    let optional_lists = [
        ("Wonders Complete", &player.wonders_complete),
        ("Wonders In Progress", &player.wonders_in_progress),
        ("Technologies", &player.technologies),
        ("Cards in Hand", &player.hand_cards),
    ];
    for (label, items) in optional_lists {
        if !items.is_empty() {
            lines.push(format!("  {label}: {}", items.join(", ")));
        }
    }
}

fn opponent_line(position: usize, opp: &OpponentState, player_strength: Option<i32>) -> String {
    let annotation = match (player_strength, opp.military_strength) {
        (Some(player), Some(theirs)) => gap_annotation(MilitaryGap::between(player, theirs)),
        _ => String::new(),
    };

    let mut line = format!(
        "  Opponent {position}: Military {}{annotation}  |  ~{} culture/turn  |  ~{} pts",
        Known(opp.military_strength),
        Known(opp.culture_production_estimate),
        Known(opp.culture_points_estimate)
    );
    if let Some(note) = opp.note() {
        line.push_str(&format!("  [{note}]"));
    }
    line
}

fn gap_annotation(gap: MilitaryGap) -> String {
    if gap.is_tied() {
        format!("  [{gap}]")
    } else {
        format!("  [GAP: {gap} vs you]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CardRow, Events, Meta};

    fn sample_state() -> GameState {
        GameState {
            meta: Meta {
                age: Some(2),
                round: Some(7),
                player_count: Some(4),
            },
            player: PlayerState {
                civil_actions: Some(5),
                military_actions: Some(3),
                food_production: Some(3),
                ore_production: Some(4),
                science_production: Some(5),
                culture_production: Some(6),
                military_strength: Some(9),
                culture_points: Some(41),
                leader: Some("Michelangelo".into()),
                wonders_complete: vec!["Pyramids".into(), "Library of Alexandria".into()],
                wonders_in_progress: vec!["St. Peter's Basilica".into()],
                technologies: vec!["Monarchy".into(), "Iron".into()],
                hand_cards: vec!["Code of Laws".into()],
            },
            opponents: vec![
                OpponentState {
                    id: "red".into(),
                    military_strength: Some(12),
                    culture_production_estimate: Some(4),
                    culture_points_estimate: Some(30),
                    legacy_note: Some("has Genghis Khan".into()),
                    notes: None,
                },
                OpponentState {
                    id: "blue".into(),
                    military_strength: Some(9),
                    culture_production_estimate: None,
                    culture_points_estimate: Some(38),
                    legacy_note: None,
                    notes: None,
                },
                OpponentState {
                    id: "green".into(),
                    military_strength: Some(6),
                    ..Default::default()
                },
            ],
            card_row: CardRow {
                age_1_cards: vec!["Engineering Genius".into()],
                age_2_cards: vec!["Navigation".into(), "Knights".into()],
                age_3_cards: vec![],
            },
            events: Events {
                next_visible: Some("Crusades".into()),
            },
        }
    }

    #[test]
    fn test_full_layout() {
        let expected = "\
AGE: 2  |  ROUND: 7  |  PLAYERS: 4

YOUR CIVILIZATION:
  Civil Actions: 5  |  Military Actions: 3
  Food Production: 3/turn  |  Ore Production: 4/turn
  Science: 5/turn  |  Culture Production: 6/turn
  Military Strength: 9  |  Culture Points: 41
  Leader: Michelangelo
  Wonders Complete: Pyramids, Library of Alexandria
  Wonders In Progress: St. Peter's Basilica
  Technologies: Monarchy, Iron
  Cards in Hand: Code of Laws

OPPONENTS:
  Opponent 1: Military 12  [GAP: +3 vs you]  |  ~4 culture/turn  |  ~30 pts  [has Genghis Khan]
  Opponent 2: Military 9  [TIED]  |  ~? culture/turn  |  ~38 pts
  Opponent 3: Military 6  [GAP: -3 vs you]  |  ~? culture/turn  |  ~? pts

CARD ROW: Engineering Genius, Navigation, Knights

NEXT EVENT: Crusades";

        assert_eq!(format_game_state(&sample_state()), expected);
    }

    #[test]
    fn test_deterministic() {
        let state = sample_state();
        assert_eq!(format_game_state(&state), format_game_state(&state.clone()));
    }

    #[test]
    fn test_empty_state_renders_placeholders() {
        let expected = "\
AGE: ?  |  ROUND: ?  |  PLAYERS: ?

YOUR CIVILIZATION:
  Civil Actions: ?  |  Military Actions: ?
  Food Production: ?/turn  |  Ore Production: ?/turn
  Science: ?/turn  |  Culture Production: ?/turn
  Military Strength: ?  |  Culture Points: ?";

        assert_eq!(format_game_state(&GameState::default()), expected);
    }

    #[test]
    fn test_zero_is_not_unknown() {
        let mut state = GameState::default();
        state.player.military_strength = Some(0);
        let text = format_game_state(&state);
        assert!(text.contains("Military Strength: 0  |  Culture Points: ?"));
    }

    #[test]
    fn test_no_gap_when_player_strength_unknown() {
        let mut state = sample_state();
        state.player.military_strength = None;
        let text = format_game_state(&state);
        assert!(text.contains("  Opponent 1: Military 12  |  ~4 culture/turn"));
        assert!(!text.contains("GAP"));
        assert!(!text.contains("TIED"));
    }

    #[test]
    fn test_empty_sections_omitted() {
        let mut state = sample_state();
        state.opponents.clear();
        state.card_row = CardRow::default();
        state.events.next_visible = Some("   ".into());
        state.player.leader = Some(String::new());
        state.player.hand_cards.clear();

        let text = format_game_state(&state);
        assert!(!text.contains("OPPONENTS:"));
        assert!(!text.contains("CARD ROW"));
        assert!(!text.contains("NEXT EVENT"));
        assert!(!text.contains("Leader:"));
        assert!(!text.contains("Cards in Hand"));
        assert!(text.contains("Technologies: Monarchy, Iron"));
    }

    #[test]
    fn test_card_row_keeps_age_order() {
        let mut state = GameState::default();
        state.card_row.age_3_cards = vec!["Computers".into()];
        state.card_row.age_1_cards = vec!["Warfare".into()];
        let text = format_game_state(&state);
        assert!(text.ends_with("\nCARD ROW: Warfare, Computers"));
    }
}
