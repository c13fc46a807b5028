//! Navigation controller: the state machine every player navigation passes
//! through.
//!
//! A navigation event acquires the navigation lock (or is dropped), resolves
//! its title, fetches content, runs the match check, and synchronizes the
//! play timer. At most one navigation is in flight; concurrent events are
//! dropped, not queued, so a stale network response can never overwrite a
//! newer navigation.

mod orchestration;
mod timer;

use std::sync::Arc;

use parking_lot::Mutex as StateMutex;
use tokio::time::Instant;

use crate::config::EngineConfig;
use crate::domain::lines::LineId;
use crate::domain::session::GameSession;
use crate::domain::title::CanonicalTitle;
use crate::services::match_engine::{MatchEngine, MatchHit};
use crate::services::resolver::RedirectResolver;
use crate::wiki::{ArticleContentService, ArticleMarkup, ContentError};

pub use timer::PlayTimer;

/// What triggered a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationSource {
    /// An in-article hyperlink click.
    Link,
    /// A click on a history entry.
    History,
    /// An externally supplied title (e.g. a grid-cell jump).
    Jump,
}

/// One player navigation, consumed by [`NavigationController::navigate`].
#[derive(Debug, Clone)]
pub struct NavigationEvent {
    pub title: String,
    pub source: NavigationSource,
}

impl NavigationEvent {
    pub fn link(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source: NavigationSource::Link,
        }
    }

    pub fn history(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source: NavigationSource::History,
        }
    }

    pub fn jump(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source: NavigationSource::Jump,
        }
    }
}

/// Why an event was dropped without touching session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Another navigation already holds the lock.
    Busy,
    /// The event repeated within the debounce window.
    Debounced,
    /// The game is already won.
    AlreadyWon,
    /// A newer navigation superseded this one mid-flight.
    Superseded,
}

/// Content fetch result, surfaced for the caller's replacement-article
/// policy. Failures never abort the navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentStatus {
    Loaded(ArticleMarkup),
    Failed(ContentError),
}

/// Everything one processed navigation produced.
#[derive(Debug, Clone)]
pub struct NavigationSummary {
    pub resolved: CanonicalTitle,
    pub content: ContentStatus,
    pub newly_matched: Vec<MatchHit>,
    pub winning_lines: Vec<LineId>,
    pub won: bool,
}

#[derive(Debug, Clone)]
pub enum NavigationOutcome {
    Completed(NavigationSummary),
    /// The event was suppressed; callers may still show visual feedback,
    /// but no session state changed.
    Dropped(DropReason),
}

/// Orchestrates navigation events against one game session.
pub struct NavigationController {
    config: EngineConfig,
    session: StateMutex<GameSession>,
    timer: StateMutex<PlayTimer>,
    /// The navigation lock: `try_lock` on entry, dropped events never wait.
    nav_lock: tokio::sync::Mutex<()>,
    last_accepted_at: StateMutex<Option<Instant>>,
    resolver: Arc<RedirectResolver>,
    matcher: MatchEngine,
    content: Arc<dyn ArticleContentService>,
}
