//! End-of-session summary for the result screen.
use serde::{Deserialize, Serialize};

use crate::scenario::round_share;
use crate::session::{GameOutcome, GameSession, LogEntry};

/// One row of the final equity table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub name: String,
    pub relation: String,
    pub share: f64,
    pub is_defeated: bool,
}

/// Complete summary of a play-through for display on the result screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// None while the session is still in progress.
    pub outcome: Option<GameOutcome>,
    pub scenario_title: String,
    pub total_asset_value: String,
    pub player_share: f64,
    pub standings: Vec<Standing>,
    pub cycles_played: u32,
    pub clues_found: u32,
    pub clues_used: u32,
    pub characters_defeated: u32,
    /// The full session ledger, in append order.
    pub log_entries: Vec<LogEntry>,
}

/// Build the summary from a session in any phase.
#[must_use]
pub fn session_summary(session: &GameSession) -> SessionSummary {
    let standings = session
        .scenario
        .characters
        .iter()
        .map(|c| Standing {
            name: c.name.clone(),
            relation: c.relation.clone(),
            share: round_share(c.share),
            is_defeated: c.is_defeated,
        })
        .collect::<Vec<_>>();
    let characters_defeated = standings.iter().filter(|s| s.is_defeated).count() as u32;
    SessionSummary {
        outcome: session.outcome,
        scenario_title: session.scenario.title.clone(),
        total_asset_value: session.scenario.total_asset_value.clone(),
        player_share: round_share(session.scenario.player_share),
        standings,
        cycles_played: session.cycle,
        clues_found: session.clues_found,
        clues_used: session.clues_used,
        characters_defeated,
        log_entries: session.logs.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Language, StaticContentSource};
    use crate::scenario::Difficulty;
    use crate::GameEngine;

    #[test]
    fn summary_carries_the_session_ledger_and_standings() {
        let engine = GameEngine::new(StaticContentSource::builtin());
        let mut session = engine
            .create_session(13, Difficulty::Medium, Language::En)
            .unwrap();
        session.begin();
        let first = session.scenario.locations[0].id.clone();
        assert!(session.move_to(&first));
        session.action_points = 0;
        // Exhausted-AP warning adds a danger log entry.
        session.move_to(&first);

        let summary = session_summary(&session);
        assert_eq!(summary.outcome, None);
        assert_eq!(summary.log_entries, session.logs);
        assert_eq!(summary.standings.len(), session.scenario.characters.len());
        assert_eq!(summary.clues_found, session.clues_found);
        assert_eq!(summary.cycles_played, session.cycle);
        assert!((summary.player_share - session.scenario.player_share).abs() < 1e-9);
    }
}
