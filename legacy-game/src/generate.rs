//! Scenario assembly: locations, interactables, cast, and share spread.
#[cfg(debug_assertions)]
use crate::constants::DEBUG_ENV_VAR;
use crate::constants::{
    ASSET_VALUE_MAX, ASSET_VALUE_MIN, AVATAR_PALETTE, CHARACTER_COUNT, CHARACTER_SHARE_POOL,
    CLUE_POWER_JITTER, DECOR_WEIGHT, FURNITURE_WEIGHT, HIDDEN_WEIGHT, LOCATION_COUNT,
    PLAYER_START_SHARE,
};
use crate::content::ContentTables;
use crate::scenario::{
    Character, Clue, Difficulty, Direction, Interactable, InteractableKind, InteractableSet,
    Location, Role, Scenario, round_share,
};
use rand::Rng;
use thiserror::Error;

#[cfg(debug_assertions)]
fn debug_log_enabled() -> bool {
    matches!(std::env::var(DEBUG_ENV_VAR), Ok(val) if val != "0")
}

#[cfg(not(debug_assertions))]
const fn debug_log_enabled() -> bool {
    false
}

/// Errors raised while assembling a scenario or stamping a clue.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("content pool `{pool}` exhausted (needed {needed}, had {available})")]
    ContentExhausted {
        pool: &'static str,
        needed: usize,
        available: usize,
    },
}

/// Generation knobs selected by difficulty.
///
/// Difficulty deliberately leaves every threshold pinned by the resolution
/// engine and the cycle economy untouched; it only moves how generously
/// clues are seeded through the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyTuning {
    /// Probability that a generated interactable hides a clue.
    pub clue_chance: f64,
}

impl DifficultyTuning {
    /// Tuning for a difficulty level. Medium is the baseline 40%.
    #[must_use]
    pub const fn for_difficulty(difficulty: Difficulty) -> Self {
        let clue_chance = match difficulty {
            Difficulty::Easy => 0.50,
            Difficulty::Medium => 0.40,
            Difficulty::Hard => 0.30,
        };
        Self { clue_chance }
    }
}

/// Running id allocator; ids are unique within one generated scenario.
#[derive(Debug, Default)]
struct IdAlloc {
    next: u32,
}

impl IdAlloc {
    fn next(&mut self, prefix: &str) -> String {
        self.next += 1;
        format!("{prefix}-{}", self.next)
    }
}

fn pick<'a, T, R: Rng>(
    rng: &mut R,
    items: &'a [T],
    pool: &'static str,
) -> Result<&'a T, GenerateError> {
    if items.is_empty() {
        return Err(GenerateError::ContentExhausted {
            pool,
            needed: 1,
            available: 0,
        });
    }
    Ok(&items[rng.random_range(0..items.len())])
}

/// Draw `count` distinct indices into `len` items without replacement.
fn sample_indices<R: Rng>(
    rng: &mut R,
    len: usize,
    count: usize,
    pool: &'static str,
) -> Result<Vec<usize>, GenerateError> {
    if len < count {
        return Err(GenerateError::ContentExhausted {
            pool,
            needed: count,
            available: len,
        });
    }
    let mut indices: Vec<usize> = (0..len).collect();
    for slot in 0..count {
        let swap_with = rng.random_range(slot..len);
        indices.swap(slot, swap_with);
    }
    indices.truncate(count);
    Ok(indices)
}

fn weighted_kind<R: Rng>(rng: &mut R) -> InteractableKind {
    debug_assert_eq!(HIDDEN_WEIGHT + FURNITURE_WEIGHT + DECOR_WEIGHT, 100);
    let roll = rng.random_range(0..100u32);
    if roll < HIDDEN_WEIGHT {
        InteractableKind::Hidden
    } else if roll < HIDDEN_WEIGHT + FURNITURE_WEIGHT {
        InteractableKind::Furniture
    } else {
        InteractableKind::Decor
    }
}

/// Assemble a complete scenario from content pools.
///
/// Output guarantees: 4 locations with one interactable per direction,
/// 3 characters with unique names and resolvable home locations, all ids
/// unique, all one-way flags false, and shares summing to exactly 100
/// after one-decimal rounding.
///
/// # Errors
///
/// Returns [`GenerateError::ContentExhausted`] when a pool is too small
/// for the draw (fewer than 4 location templates, fewer than 3 names, or
/// any empty pool the draw touches).
pub fn generate_scenario<R: Rng>(
    tables: &ContentTables,
    difficulty: Difficulty,
    rng: &mut R,
) -> Result<Scenario, GenerateError> {
    let tuning = DifficultyTuning::for_difficulty(difficulty);
    let mut ids = IdAlloc::default();

    let title = pick(rng, &tables.titles, "titles")?.clone();
    let description = pick(rng, &tables.descriptions, "descriptions")?.clone();
    let prologue = pick(rng, &tables.prologues, "prologues")?.clone();
    let total_asset_value = format!("{} M", rng.random_range(ASSET_VALUE_MIN..=ASSET_VALUE_MAX));

    let locations = generate_locations(tables, &tuning, &mut ids, rng)?;
    let characters = generate_cast(tables, &locations, &mut ids, rng)?;

    let mut scenario = Scenario {
        title,
        description,
        prologue,
        total_asset_value,
        player_share: PLAYER_START_SHARE,
        locations,
        characters,
    };
    distribute_shares(&mut scenario.characters, rng);

    if debug_log_enabled() {
        println!(
            "Scenario generation | difficulty:{difficulty} locations:{} cast:{} total:{:.1}",
            scenario.locations.len(),
            scenario.characters.len(),
            scenario.share_total()
        );
    }
    debug_assert!(scenario.shares_balanced());
    Ok(scenario)
}

fn generate_locations<R: Rng>(
    tables: &ContentTables,
    tuning: &DifficultyTuning,
    ids: &mut IdAlloc,
    rng: &mut R,
) -> Result<Vec<Location>, GenerateError> {
    let template_indices = sample_indices(rng, tables.locations.len(), LOCATION_COUNT, "locations")?;

    let mut locations = Vec::with_capacity(LOCATION_COUNT);
    for template_idx in template_indices {
        let template = &tables.locations[template_idx];
        let mut interactables = InteractableSet::new();
        for direction in Direction::ALL {
            let kind = weighted_kind(rng);
            let name = pick(rng, tables.interactable_pool(kind), "interactables")?.clone();
            interactables.push(Interactable {
                id: ids.next("obj"),
                name,
                kind,
                description: tables.facing_note(direction).to_string(),
                direction,
                is_searched: false,
                has_clue: rng.random_bool(tuning.clue_chance),
            });
        }
        locations.push(Location {
            id: ids.next("loc"),
            name: template.name.clone(),
            description: template.desc.clone(),
            interactables,
        });
    }
    Ok(locations)
}

fn generate_cast<R: Rng>(
    tables: &ContentTables,
    locations: &[Location],
    ids: &mut IdAlloc,
    rng: &mut R,
) -> Result<Vec<Character>, GenerateError> {
    // Unique names across the cast: draw indices without replacement.
    let name_indices = sample_indices(rng, tables.names.len(), CHARACTER_COUNT, "names")?;

    let mut cast = Vec::with_capacity(CHARACTER_COUNT);
    for (slot, role) in Role::CAST.into_iter().enumerate() {
        let relation = pick(rng, tables.role_pool(role), "roles")?.clone();
        let personality = pick(rng, &tables.personalities, "personalities")?.clone();
        let weakness = pick(rng, &tables.weaknesses, "weaknesses")?.clone();
        let dialogue_intro = pick(rng, &tables.dialogues.intro, "dialogue.intro")?.clone();
        let home = pick(rng, locations, "locations")?;
        let avatar_color = AVATAR_PALETTE[rng.random_range(0..AVATAR_PALETTE.len())].to_string();
        cast.push(Character {
            id: ids.next("chr"),
            name: tables.names[name_indices[slot]].clone(),
            role,
            relation,
            personality,
            weakness,
            share: 0.0, // distributed below
            avatar_color,
            is_defeated: false,
            dialogue_intro,
            location_id: home.id.clone(),
        });
    }
    Ok(cast)
}

/// Spread the 95% character pool across the cast.
///
/// One uniform weight per character, normalized to the pool, rounded to one
/// decimal. The rounding residual is folded into the first character so the
/// grand total (with the player's 5%) is exactly 100. The index-0 tie-break
/// is deliberate and relied on by replays.
fn distribute_shares<R: Rng>(cast: &mut [Character], rng: &mut R) {
    let weights: Vec<f64> = cast.iter().map(|_| rng.random::<f64>()).collect();
    let total: f64 = weights.iter().sum();

    let mut rounded_sum = 0.0;
    for (character, weight) in cast.iter_mut().zip(&weights) {
        let fraction = if total > f64::EPSILON {
            weight / total
        } else {
            1.0 / CHARACTER_COUNT as f64
        };
        character.share = round_share(fraction * CHARACTER_SHARE_POOL);
        rounded_sum += character.share;
    }

    let residual = CHARACTER_SHARE_POOL - rounded_sum;
    if let Some(first) = cast.first_mut() {
        first.share = round_share(first.share + residual);
    }
}

/// Stamp a clue from a template for a discovery at `location_id`.
///
/// The caller guarantees the searched interactable actually hides a clue;
/// this function only draws the template and applies the power jitter.
///
/// # Errors
///
/// Returns [`GenerateError::ContentExhausted`] when the clue pool is empty.
pub fn stamp_clue<R: Rng>(
    tables: &ContentTables,
    location_id: &str,
    id: String,
    rng: &mut R,
) -> Result<Clue, GenerateError> {
    let template = pick(rng, &tables.clues, "clues")?;
    let jitter = rng.random_range(-CLUE_POWER_JITTER..=CLUE_POWER_JITTER);
    Ok(Clue {
        id,
        name: template.name.clone(),
        description: template.desc.clone(),
        power: template.power + jitter,
        is_used: false,
        found_in_location: location_id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContentSource;
    use crate::content::{Language, StaticContentSource};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use std::collections::HashSet;

    fn tables() -> ContentTables {
        StaticContentSource::builtin().tables(Language::En).unwrap()
    }

    #[test]
    fn shares_sum_to_one_hundred_across_seeds() {
        let tables = tables();
        for seed in 0..200 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let scenario = generate_scenario(&tables, Difficulty::Medium, &mut rng).unwrap();
            assert!(
                scenario.shares_balanced(),
                "seed {seed}: total {}",
                scenario.share_total()
            );
            let exact: f64 = scenario.player_share
                + scenario.characters.iter().map(|c| c.share).sum::<f64>();
            assert!((exact - 100.0).abs() < 1e-9, "seed {seed}: {exact}");
        }
    }

    #[test]
    fn rounding_residual_lands_on_first_character() {
        let tables = tables();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut cast = generate_scenario(&tables, Difficulty::Medium, &mut rng)
            .unwrap()
            .characters;
        // Re-derive what naive rounding would give characters 1..: only the
        // first slot may differ from a plain one-decimal grid by the residual.
        for character in &cast {
            let on_grid = (character.share * 10.0).round() / 10.0;
            assert!((character.share - on_grid).abs() < 1e-9);
        }
        let total: f64 = cast.iter().map(|c| c.share).sum();
        assert!((total - CHARACTER_SHARE_POOL).abs() < 1e-9);
        // Zero-weight fallback splits evenly and still lands exactly.
        for c in &mut cast {
            c.share = 0.0;
        }
        let mut rng = SmallRng::seed_from_u64(4);
        distribute_shares(&mut cast, &mut rng);
        let total: f64 = cast.iter().map(|c| c.share).sum();
        assert!((total - CHARACTER_SHARE_POOL).abs() < 1e-9);
    }

    #[test]
    fn locations_have_one_interactable_per_direction() {
        let tables = tables();
        let mut rng = SmallRng::seed_from_u64(11);
        let scenario = generate_scenario(&tables, Difficulty::Medium, &mut rng).unwrap();
        assert_eq!(scenario.locations.len(), LOCATION_COUNT);
        for location in &scenario.locations {
            assert_eq!(location.interactables.len(), 4);
            let directions: HashSet<Direction> = location
                .interactables
                .iter()
                .map(|i| i.direction)
                .collect();
            assert_eq!(directions.len(), 4, "{}: duplicate facing", location.name);
            assert!(location.interactables.iter().all(|i| !i.is_searched));
        }
    }

    #[test]
    fn interactables_carry_the_localized_facing_note() {
        for language in [Language::En, Language::Zh] {
            let tables = StaticContentSource::builtin().tables(language).unwrap();
            let mut rng = SmallRng::seed_from_u64(21);
            let scenario = generate_scenario(&tables, Difficulty::Medium, &mut rng).unwrap();
            for interactable in scenario
                .locations
                .iter()
                .flat_map(|l| l.interactables.iter())
            {
                assert!(!interactable.description.is_empty());
                assert_eq!(
                    interactable.description,
                    tables.facing_note(interactable.direction)
                );
            }
        }
    }

    #[test]
    fn location_templates_are_distinct() {
        let tables = tables();
        for seed in 0..50 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let scenario = generate_scenario(&tables, Difficulty::Medium, &mut rng).unwrap();
            let names: HashSet<&str> = scenario
                .locations
                .iter()
                .map(|l| l.name.as_str())
                .collect();
            assert_eq!(names.len(), LOCATION_COUNT, "seed {seed}");
        }
    }

    #[test]
    fn cast_has_unique_names_resolvable_homes_and_fresh_flags() {
        let tables = tables();
        for seed in 0..50 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let scenario = generate_scenario(&tables, Difficulty::Medium, &mut rng).unwrap();
            assert_eq!(scenario.characters.len(), CHARACTER_COUNT);
            let names: HashSet<&str> = scenario
                .characters
                .iter()
                .map(|c| c.name.as_str())
                .collect();
            assert_eq!(names.len(), CHARACTER_COUNT, "seed {seed}: duplicate name");
            for character in &scenario.characters {
                assert!(scenario.location(&character.location_id).is_some());
                assert!(!character.is_defeated);
            }
        }
    }

    #[test]
    fn all_ids_are_unique_within_a_scenario() {
        let tables = tables();
        let mut rng = SmallRng::seed_from_u64(8);
        let scenario = generate_scenario(&tables, Difficulty::Medium, &mut rng).unwrap();
        let mut ids = HashSet::new();
        for location in &scenario.locations {
            assert!(ids.insert(location.id.as_str()));
            for interactable in &location.interactables {
                assert!(ids.insert(interactable.id.as_str()));
            }
        }
        for character in &scenario.characters {
            assert!(ids.insert(character.id.as_str()));
        }
    }

    #[test]
    fn too_few_location_templates_exhausts_the_pool() {
        let mut tables = tables();
        tables.locations.truncate(3);
        let mut rng = SmallRng::seed_from_u64(1);
        let err = generate_scenario(&tables, Difficulty::Medium, &mut rng).unwrap_err();
        assert_eq!(
            err,
            GenerateError::ContentExhausted {
                pool: "locations",
                needed: 4,
                available: 3,
            }
        );
    }

    #[test]
    fn too_few_names_exhausts_the_pool() {
        let mut tables = tables();
        tables.names.truncate(2);
        let mut rng = SmallRng::seed_from_u64(1);
        let err = generate_scenario(&tables, Difficulty::Medium, &mut rng).unwrap_err();
        assert_eq!(
            err,
            GenerateError::ContentExhausted {
                pool: "names",
                needed: 3,
                available: 2,
            }
        );
    }

    #[test]
    fn difficulty_tuning_is_monotone_in_clue_chance() {
        let easy = DifficultyTuning::for_difficulty(Difficulty::Easy);
        let medium = DifficultyTuning::for_difficulty(Difficulty::Medium);
        let hard = DifficultyTuning::for_difficulty(Difficulty::Hard);
        assert!(easy.clue_chance > medium.clue_chance);
        assert!(medium.clue_chance > hard.clue_chance);
        assert!((medium.clue_chance - 0.40).abs() < f64::EPSILON);
    }

    #[test]
    fn clue_chance_shifts_generated_density() {
        let tables = tables();
        let count_clues = |difficulty| {
            let mut total = 0usize;
            for seed in 0..80 {
                let mut rng = SmallRng::seed_from_u64(seed);
                let scenario = generate_scenario(&tables, difficulty, &mut rng).unwrap();
                total += scenario
                    .locations
                    .iter()
                    .flat_map(|l| l.interactables.iter())
                    .filter(|i| i.has_clue)
                    .count();
            }
            total
        };
        assert!(count_clues(Difficulty::Easy) > count_clues(Difficulty::Hard));
    }

    #[test]
    fn stamped_clue_jitters_within_bounds_and_keeps_provenance() {
        let tables = tables();
        let base_powers: HashSet<i32> = tables.clues.iter().map(|c| c.power).collect();
        let mut rng = SmallRng::seed_from_u64(5);
        for n in 0..100 {
            let clue = stamp_clue(&tables, "loc-2", format!("clue-{n}"), &mut rng).unwrap();
            assert!(!clue.is_used);
            assert_eq!(clue.found_in_location, "loc-2");
            assert!(
                base_powers
                    .iter()
                    .any(|base| (clue.power - base).abs() <= crate::constants::CLUE_POWER_JITTER),
                "power {} outside jitter of any template",
                clue.power
            );
        }
    }

    #[test]
    fn empty_clue_pool_is_exhausted() {
        let mut tables = tables();
        tables.clues.clear();
        let mut rng = SmallRng::seed_from_u64(5);
        let err = stamp_clue(&tables, "loc-1", "clue-1".to_string(), &mut rng).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::ContentExhausted { pool: "clues", .. }
        ));
    }

    #[test]
    fn generation_is_deterministic_for_a_seed() {
        let tables = tables();
        let mut rng_a = SmallRng::seed_from_u64(99);
        let mut rng_b = SmallRng::seed_from_u64(99);
        let a = generate_scenario(&tables, Difficulty::Hard, &mut rng_a).unwrap();
        let b = generate_scenario(&tables, Difficulty::Hard, &mut rng_b).unwrap();
        assert_eq!(a, b);
    }
}
