//! Scenario data model: the generated game world and its inhabitants.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

use crate::constants::{CHARACTER_COUNT, SHARE_SUM_TOLERANCE};

/// Interactables carried inline per location (one per compass direction).
pub type InteractableSet = SmallVec<[Interactable; 4]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(()),
        }
    }
}

/// Compass facing of an interactable within a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Every direction, in generation order.
    pub const ALL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// Clockwise rotation order used by the location view.
    pub const ROTATION: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
        }
    }

    /// Next facing when turning clockwise (right).
    #[must_use]
    pub fn rotated_right(self) -> Self {
        let idx = Self::ROTATION
            .iter()
            .position(|d| *d == self)
            .unwrap_or(0);
        Self::ROTATION[(idx + 1) % 4]
    }

    /// Next facing when turning counter-clockwise (left).
    #[must_use]
    pub fn rotated_left(self) -> Self {
        let idx = Self::ROTATION
            .iter()
            .position(|d| *d == self)
            .unwrap_or(0);
        Self::ROTATION[(idx + 3) % 4]
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Narrative role of an opposing character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Rival,
    Lawyer,
    Witness,
    Neutral,
    Relative,
}

impl Role {
    /// Roles assigned to the generated cast, in slot order.
    pub const CAST: [Self; CHARACTER_COUNT] = [Self::Rival, Self::Lawyer, Self::Witness];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rival => "rival",
            Self::Lawyer => "lawyer",
            Self::Witness => "witness",
            Self::Neutral => "neutral",
            Self::Relative => "relative",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a searchable object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractableKind {
    Furniture,
    Decor,
    Hidden,
}

impl InteractableKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Furniture => "furniture",
            Self::Decor => "decor",
            Self::Hidden => "hidden",
        }
    }
}

impl fmt::Display for InteractableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A searchable object on one compass facing of a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interactable {
    pub id: String,
    pub name: String,
    pub kind: InteractableKind,
    /// Localized placement note ("Located on the north side...").
    pub description: String,
    pub direction: Direction,
    /// One-way false -> true, flipped the first time the object is inspected.
    #[serde(default)]
    pub is_searched: bool,
    /// Fixed at generation; whether inspecting yields a clue.
    #[serde(default)]
    pub has_clue: bool,
}

/// A visitable room holding exactly one interactable per direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub description: String,
    pub interactables: InteractableSet,
}

impl Location {
    /// The interactable on the given facing, if generation produced one.
    #[must_use]
    pub fn interactable(&self, direction: Direction) -> Option<&Interactable> {
        self.interactables.iter().find(|i| i.direction == direction)
    }

    pub fn interactable_mut(&mut self, direction: Direction) -> Option<&mut Interactable> {
        self.interactables
            .iter_mut()
            .find(|i| i.direction == direction)
    }
}

/// An opposing claimant on the estate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub role: Role,
    /// Relationship label drawn from the role pool ("Greedy Uncle", ...).
    pub relation: String,
    pub personality: String,
    pub weakness: String,
    /// Equity percentage; floor 0, never raised except by backfire transfer.
    pub share: f64,
    pub avatar_color: String,
    /// Derived: true once `share` reaches 0. One-way.
    #[serde(default)]
    pub is_defeated: bool,
    pub dialogue_intro: String,
    /// Home location; always references a generated location id.
    pub location_id: String,
}

/// A piece of evidence carried in the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clue {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Strength used in confrontation scoring; fixed at discovery.
    pub power: i32,
    /// One-way false -> true, set when spent in a confrontation.
    #[serde(default)]
    pub is_used: bool,
    /// Id of the location the clue was discovered in.
    pub found_in_location: String,
}

/// Immutable-once-generated snapshot of the game world instance.
///
/// After generation only `player_share`, `characters[].share`,
/// `characters[].is_defeated`, and `interactables[].is_searched` mutate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub title: String,
    pub description: String,
    pub prologue: String,
    /// Display metadata only ("412 M"); no gameplay effect.
    pub total_asset_value: String,
    pub player_share: f64,
    pub locations: Vec<Location>,
    pub characters: Vec<Character>,
}

impl Scenario {
    #[must_use]
    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    pub fn location_mut(&mut self, id: &str) -> Option<&mut Location> {
        self.locations.iter_mut().find(|l| l.id == id)
    }

    #[must_use]
    pub fn character(&self, id: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn character_mut(&mut self, id: &str) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.id == id)
    }

    /// Characters whose home is the given location.
    pub fn characters_in(&self, location_id: &str) -> impl Iterator<Item = &Character> {
        self.characters
            .iter()
            .filter(move |c| c.location_id == location_id)
    }

    /// Player share plus all character shares; 100.0 by invariant.
    #[must_use]
    pub fn share_total(&self) -> f64 {
        self.player_share + self.characters.iter().map(|c| c.share).sum::<f64>()
    }

    /// Whether the equity pool still sums to 100% within rounding slack.
    #[must_use]
    pub fn shares_balanced(&self) -> bool {
        (self.share_total() - 100.0).abs() <= SHARE_SUM_TOLERANCE
    }
}

/// Round an equity value to the one-decimal grid shares live on.
#[must_use]
pub fn round_share(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
