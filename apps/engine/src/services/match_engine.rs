//! Canonical-form matching between navigated articles and grid cells.

use std::collections::BTreeSet;
use std::sync::Arc;

use futures::future::join_all;
use tracing::debug;

use crate::domain::puzzle::Puzzle;
use crate::domain::title::CanonicalTitle;
use crate::services::resolver::RedirectResolver;

/// A grid cell that just transitioned from unmatched to matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchHit {
    pub index: usize,
    pub canonical: CanonicalTitle,
}

/// Decides whether the player's current article is "the same article" as a
/// grid cell. Both sides are resolved to canonical form, so matching is
/// symmetric: it holds whether the clicked article is the redirect source
/// and the grid title the target, or the other way around.
pub struct MatchEngine {
    resolver: Arc<RedirectResolver>,
}

impl MatchEngine {
    pub fn new(resolver: Arc<RedirectResolver>) -> Self {
        Self { resolver }
    }

    /// Resolve every puzzle title once at puzzle-creation time, so
    /// per-navigation checks run against a warm cache.
    pub async fn prewarm(&self, puzzle: &Puzzle) {
        let titles = puzzle
            .grid()
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(puzzle.start()));
        join_all(titles.map(|title| self.resolver.resolve(title))).await;
        debug!(
            titles = puzzle.cell_count() + 1,
            "Pre-warmed redirect cache for puzzle"
        );
    }

    /// Compare a navigated title against every unmatched cell.
    ///
    /// Returns only indices transitioning unmatched -> matched, so match
    /// side effects (confetti, feedback) fire exactly once per cell. Cells
    /// already in `matched` are never re-reported.
    pub async fn check(
        &self,
        navigated_raw: &str,
        puzzle: &Puzzle,
        matched: &BTreeSet<usize>,
    ) -> Vec<MatchHit> {
        let navigated = self.resolver.resolve(navigated_raw).await;

        let mut hits = Vec::new();
        for (index, cell) in puzzle.grid().iter().enumerate() {
            if matched.contains(&index) {
                continue;
            }
            let cell_canonical = self.resolver.resolve(cell).await;
            if cell_canonical.same_article(&navigated) {
                hits.push(MatchHit {
                    index,
                    canonical: cell_canonical,
                });
            }
        }
        hits
    }
}
