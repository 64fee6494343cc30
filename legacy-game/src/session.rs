//! The session state machine: phases, action points, cycles, and logs.
//!
//! One [`GameSession`] owns all mutable play-through state. Every player
//! action is a method that checks its guards, mutates, and appends to the
//! log ledger; guard violations never panic or error, they no-op (most
//! silently, some with a warning entry) and return `false`.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::constants::{
    ACTION_POINTS_PER_CYCLE, BACKFIRE_PENALTY, MAX_CYCLES, MAX_INVENTORY, WIN_SHARE,
};
use crate::content::ContentTables;
use crate::generate::stamp_clue;
use crate::resolve::resolve_confrontation;
use crate::rng::RngBundle;
use crate::scenario::{Character, Clue, Direction, Interactable, Scenario, round_share};

const LOG_SESSION_INIT: &str = "log.session.init";
const LOG_AP_EXHAUSTED: &str = "log.ap.exhausted";
const LOG_SEARCH_EMPTY: &str = "log.search.empty";
const LOG_SEARCH_FAILED: &str = "log.search.failed";
const LOG_ITEM_KEPT: &str = "log.item.kept";
const LOG_ITEM_DISCARDED: &str = "log.item.discarded";
const LOG_INVENTORY_FULL: &str = "log.inventory.full";
const LOG_SHARE_GAIN: &str = "log.share.gain";
const LOG_SHARE_LOSS: &str = "log.share.loss";
const LOG_ELIMINATED: &str = "log.character.eliminated";
const LOG_CYCLE_START: &str = "log.cycle.start";
const LOG_RESULT_WIN: &str = "log.result.win";
const LOG_RESULT_LOSE: &str = "log.result.lose";

/// Clues carried in the inventory, capacity-bounded.
pub type ClueSatchel = SmallVec<[Clue; MAX_INVENTORY]>;

/// Where the session currently is in the play-through.
///
/// `Menu` and `Loading` belong to the frontend shell between sessions; a
/// constructed session starts in `Prologue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Menu,
    Loading,
    Prologue,
    Navigation,
    LocationView,
    Confrontation,
    GameOver,
}

/// Severity class of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Info,
    Success,
    Danger,
    Neutral,
}

impl LogKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Danger => "danger",
            Self::Neutral => "neutral",
        }
    }
}

/// Who a log entry is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    System,
    Player,
    Character(String),
}

/// Append-only ledger entry; `seq` is strictly increasing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub seq: u32,
    pub speaker: Speaker,
    pub text: String,
    pub kind: LogKind,
}

/// Terminal result of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameOutcome {
    Win,
    Lose,
}

impl GameOutcome {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::Lose => "lose",
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// View rotation request inside a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Left,
    Right,
}

/// Mutable play-through state and the rules that mutate it.
#[derive(Debug)]
pub struct GameSession {
    pub scenario: Scenario,
    pub tables: ContentTables,
    pub phase: GamePhase,
    /// Facing inside the current location; reset to north on entry.
    pub facing: Direction,
    pub current_location: Option<String>,
    pub inventory: ClueSatchel,
    pub action_points: u8,
    /// Current cycle, starting at 1.
    pub cycle: u32,
    pub logs: Vec<LogEntry>,
    /// Target of the open confrontation, if any.
    pub selected_character: Option<String>,
    /// Discovered clue awaiting a keep/discard decision.
    pub pending_clue: Option<Clue>,
    /// Interactable the pending discovery came from; cleared with it.
    pub pending_interactable: Option<String>,
    /// Set while a resolution call is outstanding; always cleared on exit.
    pub processing: bool,
    pub outcome: Option<GameOutcome>,
    pub clues_found: u32,
    pub clues_used: u32,
    pub rng: RngBundle,
    next_log_seq: u32,
    next_clue_seq: u32,
}

impl GameSession {
    /// Start a session over a freshly generated scenario, in `Prologue`.
    #[must_use]
    pub fn new(scenario: Scenario, tables: ContentTables, rng: RngBundle) -> Self {
        let mut session = Self {
            scenario,
            tables,
            phase: GamePhase::Prologue,
            facing: Direction::North,
            current_location: None,
            inventory: ClueSatchel::new(),
            action_points: ACTION_POINTS_PER_CYCLE,
            cycle: 1,
            logs: Vec::new(),
            selected_character: None,
            pending_clue: None,
            pending_interactable: None,
            processing: false,
            outcome: None,
            clues_found: 0,
            clues_used: 0,
            rng,
            next_log_seq: 0,
            next_clue_seq: 0,
        };
        session.push_log(Speaker::System, LOG_SESSION_INIT, LogKind::Info);
        session
    }

    /// Leave the prologue and enter the map view.
    pub fn begin(&mut self) -> bool {
        if self.phase != GamePhase::Prologue {
            return false;
        }
        self.phase = GamePhase::Navigation;
        true
    }

    /// Enter a location from the map (or from another location). Costs 1 AP.
    pub fn move_to(&mut self, location_id: &str) -> bool {
        if !matches!(self.phase, GamePhase::Navigation | GamePhase::LocationView)
            || self.processing
            || self.pending_clue.is_some()
        {
            return false;
        }
        if self.scenario.location(location_id).is_none() {
            return false;
        }
        if self.action_points == 0 {
            self.push_log(Speaker::System, LOG_AP_EXHAUSTED, LogKind::Danger);
            return false;
        }
        self.action_points -= 1;
        self.current_location = Some(location_id.to_string());
        self.facing = Direction::North;
        self.phase = GamePhase::LocationView;
        true
    }

    /// Return to the map. Always free, always allowed from a location.
    pub fn exit_location(&mut self) -> bool {
        if self.phase != GamePhase::LocationView
            || self.processing
            || self.pending_clue.is_some()
        {
            return false;
        }
        self.current_location = None;
        self.phase = GamePhase::Navigation;
        true
    }

    /// Rotate the view; only meaningful inside a location.
    pub fn rotate(&mut self, rotation: Rotation) -> Direction {
        if self.phase == GamePhase::LocationView {
            self.facing = match rotation {
                Rotation::Left => self.facing.rotated_left(),
                Rotation::Right => self.facing.rotated_right(),
            };
        }
        self.facing
    }

    /// The interactable on the current facing, if any.
    #[must_use]
    pub fn facing_interactable(&self) -> Option<&Interactable> {
        let location_id = self.current_location.as_deref()?;
        self.scenario.location(location_id)?.interactable(self.facing)
    }

    /// Non-defeated characters present in the current location.
    #[must_use]
    pub fn characters_present(&self) -> Vec<&Character> {
        match self.current_location.as_deref() {
            Some(location_id) => self
                .scenario
                .characters_in(location_id)
                .filter(|c| !c.is_defeated)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Search the interactable on the current facing. Costs 1 AP; marks it
    /// searched immediately. A clue opens the pending-item slot; discovery
    /// failure is logged and leaves no pending item. Re-inspecting a
    /// searched object is a silent no-op with no cost.
    pub fn inspect_facing(&mut self) -> bool {
        if self.phase != GamePhase::LocationView
            || self.processing
            || self.pending_clue.is_some()
        {
            return false;
        }
        let Some(location_id) = self.current_location.clone() else {
            return false;
        };
        let facing = self.facing;
        let Some((interactable_id, name, searched, has_clue)) = self
            .scenario
            .location(&location_id)
            .and_then(|l| l.interactable(facing))
            .map(|i| (i.id.clone(), i.name.clone(), i.is_searched, i.has_clue))
        else {
            return false;
        };
        if searched {
            return false;
        }
        if self.action_points == 0 {
            self.push_log(Speaker::System, LOG_AP_EXHAUSTED, LogKind::Danger);
            return false;
        }

        self.action_points -= 1;
        if let Some(slot) = self
            .scenario
            .location_mut(&location_id)
            .and_then(|l| l.interactable_mut(facing))
        {
            slot.is_searched = true;
        }

        if has_clue {
            self.processing = true;
            self.next_clue_seq += 1;
            let clue_id = format!("clue-{}", self.next_clue_seq);
            let discovered = {
                let mut rng = self.rng.discovery();
                stamp_clue(&self.tables, &location_id, clue_id, &mut *rng)
            };
            self.processing = false;
            match discovered {
                Ok(clue) => {
                    self.clues_found += 1;
                    // Both pending fields live only while the modal is open.
                    self.pending_interactable = Some(interactable_id);
                    self.pending_clue = Some(clue);
                }
                Err(err) => {
                    // Search stays paid and marked; only the modal is lost.
                    let text = format!("{LOG_SEARCH_FAILED}:{err}");
                    self.push_log(Speaker::System, text, LogKind::Danger);
                }
            }
        } else {
            let text = format!("{LOG_SEARCH_EMPTY}:{name}");
            self.push_log(Speaker::System, text, LogKind::Neutral);
        }
        true
    }

    /// Keep the pending clue. Rejected (pending stays open) when the
    /// inventory is full.
    pub fn keep_item(&mut self) -> bool {
        if self.pending_clue.is_none() {
            return false;
        }
        if self.inventory.len() >= MAX_INVENTORY {
            self.push_log(Speaker::System, LOG_INVENTORY_FULL, LogKind::Danger);
            return false;
        }
        let Some(clue) = self.pending_clue.take() else {
            return false;
        };
        self.pending_interactable = None;
        let text = format!("{LOG_ITEM_KEPT}:{}", clue.name);
        self.inventory.push(clue);
        self.push_log(Speaker::System, text, LogKind::Success);
        true
    }

    /// Discard the pending clue. Always succeeds when one is open.
    pub fn discard_item(&mut self) -> bool {
        let Some(clue) = self.pending_clue.take() else {
            return false;
        };
        self.pending_interactable = None;
        let text = format!("{LOG_ITEM_DISCARDED}:{}", clue.name);
        self.push_log(Speaker::System, text, LogKind::Neutral);
        true
    }

    /// Open a confrontation with a non-defeated character present here. Free.
    pub fn talk(&mut self, character_id: &str) -> bool {
        if self.phase != GamePhase::LocationView
            || self.processing
            || self.pending_clue.is_some()
        {
            return false;
        }
        let Some(current) = self.current_location.as_deref() else {
            return false;
        };
        let Some(character) = self.scenario.character(character_id) else {
            return false;
        };
        if character.is_defeated || character.location_id != current {
            return false;
        }
        self.selected_character = Some(character_id.to_string());
        self.phase = GamePhase::Confrontation;
        true
    }

    /// Back out of the confrontation without spending anything.
    pub fn cancel_confrontation(&mut self) -> bool {
        if self.phase != GamePhase::Confrontation || self.processing {
            return false;
        }
        self.selected_character = None;
        self.phase = GamePhase::LocationView;
        true
    }

    /// Spend a clue against the selected character. Costs 1 AP; the clue is
    /// consumed before the resolution commits and is not refunded on a
    /// backfire. The share delta is clamped so no share leaves [0, 100].
    pub fn use_clue(&mut self, clue_id: &str) -> bool {
        if self.phase != GamePhase::Confrontation || self.processing {
            return false;
        }
        let Some(target_id) = self.selected_character.clone() else {
            return false;
        };
        if self.action_points == 0 {
            self.push_log(Speaker::System, LOG_AP_EXHAUSTED, LogKind::Danger);
            return false;
        }
        let Some(slot) = self
            .inventory
            .iter_mut()
            .find(|c| c.id == clue_id && !c.is_used)
        else {
            return false;
        };

        // Spend first: no refund regardless of how the resolution lands.
        self.action_points -= 1;
        slot.is_used = true;
        let spent = slot.clone();
        self.clues_used += 1;

        self.processing = true;
        let result = {
            let mut rng = self.rng.battle();
            resolve_confrontation(&spent, &self.tables.dialogues, &mut *rng)
        };
        self.processing = false;

        let player_share = self.scenario.player_share;
        let Some(target) = self.scenario.character_mut(&target_id) else {
            return false;
        };
        let target_name = target.name.clone();

        let applied = if result.share_change > 0.0 {
            let change = result.share_change.min(target.share);
            target.share = round_share(target.share - change);
            change
        } else {
            // Backfire transfers share the other way, floored at the
            // player's remaining stake so the 100% pool stays exact.
            let transfer = BACKFIRE_PENALTY.min(player_share).max(0.0);
            target.share = round_share(target.share + transfer);
            -transfer
        };
        self.scenario.player_share = round_share(self.scenario.player_share + applied);

        let dialogue_kind = if result.is_critical() {
            LogKind::Success
        } else {
            LogKind::Neutral
        };
        self.push_log(
            Speaker::Character(target_name.clone()),
            result.dialogue.clone(),
            dialogue_kind,
        );
        if applied > 0.0 {
            let text = format!("{LOG_SHARE_GAIN}:+{applied:.1}");
            self.push_log(Speaker::System, text, LogKind::Success);
        } else {
            let text = format!("{LOG_SHARE_LOSS}:{applied:.1}");
            self.push_log(Speaker::System, text, LogKind::Danger);
        }

        let defeated = self
            .scenario
            .character_mut(&target_id)
            .map(|target| {
                if target.share <= 0.0 {
                    target.share = 0.0;
                    target.is_defeated = true;
                }
                target.is_defeated
            })
            .unwrap_or(false);
        if defeated {
            let text = format!("{LOG_ELIMINATED}:{target_name}");
            self.push_log(Speaker::System, text, LogKind::Success);
            self.selected_character = None;
            self.phase = GamePhase::LocationView;
        }

        self.evaluate_outcome();
        true
    }

    /// Close the cycle. Only at 0 AP with nothing pending; refills AP and
    /// logs a cycle header.
    pub fn end_cycle(&mut self) -> bool {
        if self.action_points != 0
            || self.processing
            || self.pending_clue.is_some()
            || !matches!(self.phase, GamePhase::Navigation | GamePhase::LocationView)
        {
            return false;
        }
        self.cycle += 1;
        self.action_points = ACTION_POINTS_PER_CYCLE;
        let text = format!("{LOG_CYCLE_START}:{}", self.cycle);
        self.push_log(Speaker::System, text, LogKind::Info);
        self.evaluate_outcome();
        true
    }

    /// Standing win/lose check; runs after every share mutation and cycle
    /// increment. Win takes precedence and fires even mid-cycle.
    fn evaluate_outcome(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        if self.scenario.player_share >= WIN_SHARE {
            self.outcome = Some(GameOutcome::Win);
            self.phase = GamePhase::GameOver;
            self.push_log(Speaker::System, LOG_RESULT_WIN, LogKind::Success);
        } else if self.cycle > MAX_CYCLES {
            self.outcome = Some(GameOutcome::Lose);
            self.phase = GamePhase::GameOver;
            self.push_log(Speaker::System, LOG_RESULT_LOSE, LogKind::Danger);
        }
    }

    fn push_log(&mut self, speaker: Speaker, text: impl Into<String>, kind: LogKind) {
        let seq = self.next_log_seq;
        self.next_log_seq += 1;
        self.logs.push(LogEntry {
            seq,
            speaker,
            text: text.into(),
            kind,
        });
    }
}
