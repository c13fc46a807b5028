//! RNG seed derivation for deterministic puzzle generation.
//!
//! A game carries one base seed; each generation attempt derives its own
//! sub-seed so a relaxed-constraints retry draws a fresh-but-reproducible
//! stream instead of replaying the attempt that just failed.

/// Derive the seed for one generation attempt (0-based).
pub fn derive_generation_seed(game_seed: u64, attempt: u32) -> u64 {
    // Arithmetic derivation keeps attempts deterministic but distinct.
    game_seed
        .wrapping_add((attempt as u64).wrapping_mul(1_000_003))
        .wrapping_add(1)
}
