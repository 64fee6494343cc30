//! Legacy Protocol Game Engine
//!
//! Platform-agnostic core game logic for the Legacy Protocol inheritance
//! negotiation game. This crate provides scenario generation, exploration,
//! and confrontation mechanics without UI or platform-specific dependencies.

pub mod constants;
pub mod content;
pub mod generate;
pub mod resolve;
pub mod result;
pub mod rng;
pub mod scenario;
pub mod session;

// Re-export commonly used types
pub use content::{
    ClueTemplate, ContentError, ContentTables, DialogueLines, Language, LocationTemplate,
    StaticContentSource,
};
pub use generate::{DifficultyTuning, GenerateError, generate_scenario, stamp_clue};
pub use resolve::{BattleResult, OutcomeBand, outcome_band, resolve_confrontation};
pub use result::{SessionSummary, Standing, session_summary};
pub use rng::RngBundle;
pub use scenario::{
    Character, Clue, Difficulty, Direction, Interactable, InteractableKind, Location, Role,
    Scenario, round_share,
};
pub use session::{
    GameOutcome, GamePhase, GameSession, LogEntry, LogKind, Rotation, Speaker,
};

/// Trait for abstracting content-pool loading.
/// Platform-specific implementations should provide this.
pub trait ContentSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the full content tables for a language.
    ///
    /// # Errors
    ///
    /// Returns an error if no content exists for the language or it cannot
    /// be parsed.
    fn tables(&self, language: Language) -> Result<ContentTables, Self::Error>;

    /// Load only the prologue pool, for the menu screen shown before a
    /// session exists.
    ///
    /// # Errors
    ///
    /// Returns an error if no content exists for the language.
    fn prologue_pool(&self, language: Language) -> Result<Vec<String>, Self::Error>;
}

/// Main game engine for creating sessions over a content backend.
pub struct GameEngine<C: ContentSource> {
    content: C,
}

impl<C: ContentSource> GameEngine<C> {
    /// Create a new game engine with the provided content backend.
    pub const fn new(content: C) -> Self {
        Self { content }
    }

    /// Generate a scenario and open a session over it, in `Prologue`.
    ///
    /// # Errors
    ///
    /// Returns an error if the content tables cannot be loaded or a content
    /// pool is too small for generation.
    pub fn create_session(
        &self,
        seed: u64,
        difficulty: Difficulty,
        language: Language,
    ) -> Result<GameSession, anyhow::Error> {
        let tables = self.content.tables(language)?;
        let rng = RngBundle::from_user_seed(seed);
        let scenario = {
            let mut stream = rng.scenario();
            generate_scenario(&tables, difficulty, &mut *stream)?
        };
        Ok(GameSession::new(scenario, tables, rng))
    }

    /// Prologue lines for the pre-session menu.
    ///
    /// # Errors
    ///
    /// Returns an error if no content exists for the language.
    pub fn prologue_pool(&self, language: Language) -> Result<Vec<String>, C::Error> {
        self.content.prologue_pool(language)
    }
}
