//! Military gap analysis.
//!
//! Sign convention: a positive gap means the opponent is stronger.

use std::fmt;

/// Gap above which the player is considered exposed to aggressions and wars.
pub const WARNING_THRESHOLD: i32 = 2;

/// Signed difference between an opponent's and the player's strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MilitaryGap(pub i32);

impl MilitaryGap {
    pub fn between(player_strength: i32, opponent_strength: i32) -> Self {
        Self(opponent_strength.saturating_sub(player_strength))
    }

    pub fn is_tied(self) -> bool {
        self.0 == 0
    }
}

/// `+N` when the opponent is ahead, `-N` when behind, `TIED` when equal.
impl fmt::Display for MilitaryGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => f.write_str("TIED"),
            n if n > 0 => write!(f, "+{n}"),
            n => write!(f, "{n}"),
        }
    }
}

/// Risk category against the strongest opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MilitaryRisk {
    Warning,
    Caution,
    Safe,
}

impl MilitaryRisk {
    pub fn classify(gap: MilitaryGap) -> Self {
        match gap.0 {
            g if g > WARNING_THRESHOLD => Self::Warning,
            g if g > 0 => Self::Caution,
            _ => Self::Safe,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Warning => "WARNING",
            Self::Caution => "CAUTION",
            Self::Safe => "SAFE",
        }
    }
}

/// Advisory military situation against the single strongest opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MilitarySummary {
    pub gap: MilitaryGap,
    pub risk: MilitaryRisk,
}

impl fmt::Display for MilitarySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.risk {
            MilitaryRisk::Warning => write!(
                f,
                "!! MILITARY WARNING: Gap of {} vs strongest opponent (threshold is {WARNING_THRESHOLD})",
                self.gap.0
            ),
            MilitaryRisk::Caution => write!(
                f,
                "Military gap: {} vs strongest opponent (within safe threshold)",
                self.gap.0
            ),
            MilitaryRisk::Safe => f.write_str("Military: you are leading or tied with all opponents"),
        }
    }
}

/// Summarize against the strongest opponent. `None` when the player's
/// strength is unknown or there is no opponent to compare with.
pub fn summarize(player_strength: Option<i32>, opponent_strengths: &[i32]) -> Option<MilitarySummary> {
    let player = player_strength?;
    let strongest = opponent_strengths.iter().copied().max()?;
    let gap = MilitaryGap::between(player, strongest);
    Some(MilitarySummary {
        gap,
        risk: MilitaryRisk::classify(gap),
    })
}
