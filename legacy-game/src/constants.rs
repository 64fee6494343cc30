//! Tuning constants shared across the engine.

/// Environment variable enabling verbose debug output in dev builds.
pub const DEBUG_ENV_VAR: &str = "LEGACY_DEBUG_LOGS";

/// Locations assembled per scenario.
pub const LOCATION_COUNT: usize = 4;
/// Characters in the opposing cast.
pub const CHARACTER_COUNT: usize = 3;
/// Hard cap on carried clues.
pub const MAX_INVENTORY: usize = 5;
/// Action points granted at the start of every cycle.
pub const ACTION_POINTS_PER_CYCLE: u8 = 5;
/// Cycles the player has before the estate settles without them.
pub const MAX_CYCLES: u32 = 8;

/// Equity percentage the player starts with.
pub const PLAYER_START_SHARE: f64 = 5.0;
/// Equity percentage distributed across the cast at generation.
pub const CHARACTER_SHARE_POOL: f64 = 95.0;
/// Equity percentage at which the player wins outright.
pub const WIN_SHARE: f64 = 51.0;
/// Rounding slack tolerated when checking the 100% equity invariant.
pub const SHARE_SUM_TOLERANCE: f64 = 0.1;

// Interactable kind weights, out of 100.
pub const HIDDEN_WEIGHT: u32 = 20;
pub const FURNITURE_WEIGHT: u32 = 40;
pub const DECOR_WEIGHT: u32 = 40;

/// Magnitude of the symmetric power jitter applied at clue discovery.
pub const CLUE_POWER_JITTER: i32 = 10;

/// Confrontation score above which the attempt succeeds.
pub const SUCCESS_THRESHOLD: f64 = 100.0;
/// Confrontation score above which the attempt is a critical success.
pub const CRITICAL_THRESHOLD: f64 = 150.0;
/// Share transfer range on a plain success (half-open).
pub const SUCCESS_SHARE_MIN: f64 = 5.0;
pub const SUCCESS_SHARE_MAX: f64 = 15.0;
/// Share transfer range on a critical success (half-open).
pub const CRITICAL_SHARE_MIN: f64 = 15.0;
pub const CRITICAL_SHARE_MAX: f64 = 25.0;
/// Fixed share forfeited to the target when a confrontation backfires.
pub const BACKFIRE_PENALTY: f64 = 5.0;

/// Avatar colors assigned to generated characters.
pub const AVATAR_PALETTE: [&str; 6] = [
    "#f87171", "#fbbf24", "#34d399", "#60a5fa", "#a78bfa", "#f472b6",
];

// Display-only bounds for the randomized estate valuation, in millions.
pub const ASSET_VALUE_MIN: u32 = 100;
pub const ASSET_VALUE_MAX: u32 = 999;
