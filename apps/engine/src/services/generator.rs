//! Constrained random puzzle generation over a curated category pool.

use std::collections::{HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::config::{EngineConfig, GeneratorPolicy};
use crate::domain::category::{Category, Group};
use crate::domain::puzzle::Puzzle;
use crate::domain::seed::derive_generation_seed;
use crate::domain::title::normalize;
use crate::errors::domain::{DomainError, GenerationKind};

/// Generate a puzzle: `grid_size * grid_size` grid articles plus one
/// starting article, all distinct by normalized key, group caps respected.
///
/// Deterministic for a given `(pool, groups, config, game_seed)`: the
/// category pool is shuffled with a seeded RNG, then walked in order. The
/// first `grid_size * grid_size` accepted articles become the grid in
/// generation order; the next accepted article is the starting one.
///
/// With `GeneratorPolicy::RelaxGroups`, a failed attempt is retried once
/// ignoring group caps (drawing a fresh sub-seed) before the error is
/// surfaced.
pub fn generate(
    pool: &[Category],
    groups: &[Group],
    config: &EngineConfig,
    game_seed: u64,
) -> Result<Puzzle, DomainError> {
    match attempt(pool, groups, config, derive_generation_seed(game_seed, 0), true) {
        Ok(puzzle) => Ok(puzzle),
        Err(err) if config.generator_policy == GeneratorPolicy::RelaxGroups => {
            warn!(error = %err, "Generation failed under group caps; retrying relaxed");
            attempt(pool, groups, config, derive_generation_seed(game_seed, 1), false)
        }
        Err(err) => Err(err),
    }
}

fn attempt(
    pool: &[Category],
    groups: &[Group],
    config: &EngineConfig,
    seed: u64,
    enforce_caps: bool,
) -> Result<Puzzle, DomainError> {
    let target = config.grid_size * config.grid_size + 1;
    let caps: HashMap<&str, usize> = groups
        .iter()
        .map(|g| (g.name.as_str(), g.max_per_game))
        .collect();

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut order: Vec<&Category> = pool.iter().collect();
    order.shuffle(&mut rng);

    let mut group_usage: HashMap<&str, usize> = HashMap::new();
    let mut seen_keys: HashSet<String> = HashSet::with_capacity(target);
    let mut accepted: Vec<String> = Vec::with_capacity(target);

    for category in order {
        if accepted.len() == target {
            break;
        }
        if category.articles.is_empty() {
            continue;
        }
        if enforce_caps {
            if let Some(group) = category.group.as_deref() {
                if let Some(cap) = caps.get(group) {
                    if group_usage.get(group).copied().unwrap_or(0) >= *cap {
                        debug!(category = %category.name, group, "Group cap reached; skipping");
                        continue;
                    }
                }
            }
        }

        let article = &category.articles[rng.random_range(0..category.articles.len())];
        let key = normalize(article).key;
        if key.is_empty() || !seen_keys.insert(key) {
            // The drawn article collides with one already accepted; the
            // category is passed over without counting against its group.
            continue;
        }

        if let Some(group) = category.group.as_deref() {
            *group_usage.entry(group).or_insert(0) += 1;
        }
        accepted.push(article.clone());
    }

    if accepted.len() < target {
        return Err(DomainError::generation(
            GenerationKind::InsufficientPool,
            format!(
                "Category pool yielded {} of {target} required articles",
                accepted.len()
            ),
        ));
    }

    let start = accepted.pop().expect("target is at least 5");
    Puzzle::new(config.grid_size, accepted, start)
}
