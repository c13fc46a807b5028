//! Curated category pool types consumed by the puzzle generator.

use serde::{Deserialize, Serialize};

/// Named bucket of candidate articles, optionally tagged with a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    /// Group tag (e.g. "occupations"); categories without a group are
    /// never capped.
    pub group: Option<String>,
    pub articles: Vec<String>,
}

/// Cap on how many selected categories may belong to a named group within
/// one puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub max_per_game: usize,
}
