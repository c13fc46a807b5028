//! Game session state: everything one running game owns.
//!
//! The session is mutated exclusively by the navigation controller, inside
//! a single active navigation. Everything here is pure state; timing lives
//! with the controller.

use std::collections::BTreeSet;

use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::lines::LineId;
use crate::domain::puzzle::Puzzle;
use crate::domain::title::CanonicalTitle;

/// Navigation state machine phases.
///
/// `Won` is terminal: once a winning line is detected no further navigation
/// mutates the session.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Phase {
    /// No navigation in flight.
    Idle,
    /// A navigation holds the lock; redirect/content work in progress.
    Navigating,
    /// Resolved title being compared against unmatched cells.
    MatchChecking,
    /// Matched set merged; timer being synchronized.
    TimerSync,
    /// A winning line is complete.
    Won,
}

/// State owned by one game, created at game start and replaced wholesale on
/// a new game.
#[derive(Debug)]
pub struct GameSession {
    puzzle: Puzzle,
    pub(crate) phase: Phase,
    /// Grid indices the player has reached. Grows monotonically.
    pub(crate) matched: BTreeSet<usize>,
    /// Canonical titles behind `matched`, in match order.
    pub(crate) matched_titles: Vec<CanonicalTitle>,
    pub(crate) click_count: u32,
    /// Canonical titles of every accepted navigation, in order.
    pub(crate) history: Vec<CanonicalTitle>,
    pub(crate) current_article: Option<CanonicalTitle>,
    /// Sequence stamp of the most recently accepted navigation. Results
    /// carrying an older stamp are stale and must be discarded.
    pub(crate) generation: u64,
    pub(crate) winning_lines: Vec<LineId>,
}

impl GameSession {
    pub fn new(puzzle: Puzzle) -> Self {
        Self {
            puzzle,
            phase: Phase::Idle,
            matched: BTreeSet::new(),
            matched_titles: Vec::new(),
            click_count: 0,
            history: Vec::new(),
            current_article: None,
            generation: 0,
            winning_lines: Vec::new(),
        }
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_won(&self) -> bool {
        self.phase == Phase::Won
    }

    pub fn click_count(&self) -> u32 {
        self.click_count
    }

    pub fn matched_indices(&self) -> &BTreeSet<usize> {
        &self.matched
    }

    pub fn current_article(&self) -> Option<&CanonicalTitle> {
        self.current_article.as_ref()
    }

    pub fn winning_lines(&self) -> &[LineId] {
        &self.winning_lines
    }

    /// Record a newly matched cell. Returns false (and leaves the set
    /// untouched) if the index was already matched; the matched set never
    /// shrinks and never double-records.
    pub(crate) fn insert_match(&mut self, index: usize, title: CanonicalTitle) -> bool {
        if self.matched.insert(index) {
            self.matched_titles.push(title);
            true
        } else {
            false
        }
    }

    /// Final score snapshot, available once the session is won.
    pub fn score_report(&self, elapsed_seconds: u64) -> ScoreReport {
        ScoreReport {
            elapsed_seconds,
            click_count: self.click_count,
            matched_canonical_titles: self
                .matched_titles
                .iter()
                .map(|t| t.display.clone())
                .collect(),
            navigation_history: self.history.iter().map(|t| t.display.clone()).collect(),
            completed_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Final score/time/click totals exposed for the surrounding application's
/// score reporting sink. The engine never submits this itself.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub elapsed_seconds: u64,
    pub click_count: u32,
    pub matched_canonical_titles: Vec<String>,
    pub navigation_history: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub completed_at: OffsetDateTime,
}
