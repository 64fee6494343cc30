//! Confrontation resolution: clue power against a random roll.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    BACKFIRE_PENALTY, CRITICAL_SHARE_MAX, CRITICAL_SHARE_MIN, CRITICAL_THRESHOLD,
    SUCCESS_SHARE_MAX, SUCCESS_SHARE_MIN, SUCCESS_THRESHOLD,
};
use crate::content::DialogueLines;
use crate::scenario::{Clue, round_share};

/// Band the combined score lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeBand {
    CriticalSuccess,
    Success,
    Failure,
}

impl OutcomeBand {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CriticalSuccess => "critical_success",
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

/// Result of pressing a clue against a character.
///
/// `share_change` is the raw engine delta: positive means the player takes
/// that much from the target, negative is the fixed backfire penalty. The
/// session clamps it before applying (see `GameSession::use_clue`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleResult {
    pub dialogue: String,
    pub share_change: f64,
    pub band: OutcomeBand,
}

impl BattleResult {
    /// True only for the critical-success band.
    #[must_use]
    pub const fn is_critical(&self) -> bool {
        matches!(self.band, OutcomeBand::CriticalSuccess)
    }
}

/// Classify a combined score (`clue power + roll`).
#[must_use]
pub fn outcome_band(score: f64) -> OutcomeBand {
    if score > CRITICAL_THRESHOLD {
        OutcomeBand::CriticalSuccess
    } else if score > SUCCESS_THRESHOLD {
        OutcomeBand::Success
    } else {
        OutcomeBand::Failure
    }
}

/// Resolve a confrontation, drawing the roll from `rng`.
pub fn resolve_confrontation<R: Rng>(
    clue: &Clue,
    dialogues: &DialogueLines,
    rng: &mut R,
) -> BattleResult {
    let roll = rng.random_range(0.0..100.0);
    resolve_with_roll(clue, dialogues, roll, rng)
}

/// Resolve with an explicit roll in [0,100); the transfer magnitude is
/// still drawn from `rng`. Split out so tests can force a band.
pub fn resolve_with_roll<R: Rng>(
    clue: &Clue,
    dialogues: &DialogueLines,
    roll: f64,
    rng: &mut R,
) -> BattleResult {
    let score = f64::from(clue.power) + roll;
    let band = outcome_band(score);
    let (dialogue, share_change) = match band {
        OutcomeBand::CriticalSuccess => (
            format!("{} ({})", dialogues.win, dialogues.critical),
            round_share(rng.random_range(CRITICAL_SHARE_MIN..CRITICAL_SHARE_MAX)),
        ),
        OutcomeBand::Success => (
            dialogues.win.clone(),
            round_share(rng.random_range(SUCCESS_SHARE_MIN..SUCCESS_SHARE_MAX)),
        ),
        OutcomeBand::Failure => (dialogues.lose.clone(), -BACKFIRE_PENALTY),
    };
    BattleResult {
        dialogue,
        share_change,
        band,
    }
}
