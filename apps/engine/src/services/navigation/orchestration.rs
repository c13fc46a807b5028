use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex as StateMutex;
use tokio::time::{timeout, Instant};
use tracing::{debug, error, info, warn};

use super::{
    ContentStatus, DropReason, NavigationController, NavigationEvent, NavigationOutcome,
    NavigationSummary, PlayTimer,
};
use crate::config::EngineConfig;
use crate::domain::lines::{detect_winning_lines, LineId};
use crate::domain::puzzle::Puzzle;
use crate::domain::session::{GameSession, Phase, ScoreReport};
use crate::domain::title::CanonicalTitle;
use crate::services::match_engine::MatchEngine;
use crate::services::resolver::RedirectResolver;
use crate::wiki::{ArticleContentService, ContentError};

impl NavigationController {
    pub(crate) fn new(
        config: EngineConfig,
        session: GameSession,
        resolver: Arc<RedirectResolver>,
        matcher: MatchEngine,
        content: Arc<dyn ArticleContentService>,
    ) -> Self {
        Self {
            config,
            session: StateMutex::new(session),
            timer: StateMutex::new(PlayTimer::new()),
            nav_lock: tokio::sync::Mutex::new(()),
            last_accepted_at: StateMutex::new(None),
            resolver,
            matcher,
            content,
        }
    }

    /// Load the starting article's content. Called once by the embedding
    /// application when the game screen mounts; the play clock starts when
    /// this load completes. Not a navigation: no click is counted and no
    /// match check runs, since the starting article is never on the grid.
    pub async fn load_start(&self) -> ContentStatus {
        let _nav_guard = self.nav_lock.lock().await;

        let start = { self.session.lock().puzzle().start().to_string() };
        let resolved = self.resolver.resolve(&start).await;
        {
            let mut session = self.session.lock();
            if session.current_article.is_none() {
                session.current_article = Some(resolved.clone());
                session.history.push(resolved.clone());
            }
        }

        self.timer.lock().load_started();
        let status = self.fetch_content_bounded(&resolved.display).await;
        self.timer.lock().load_finished();
        status
    }

    /// Process one navigation event through the full state machine:
    /// `Idle -> Navigating -> MatchChecking -> TimerSync -> Idle`, or into
    /// the terminal `Won`.
    ///
    /// Events arriving while a navigation is in flight, within the debounce
    /// window, or after the game is won are dropped without mutating any
    /// state; the returned [`DropReason`] lets the caller still render
    /// feedback for them.
    pub async fn navigate(&self, event: NavigationEvent) -> NavigationOutcome {
        if self.session.lock().is_won() {
            debug!(title = %event.title, "Game already won; dropping navigation");
            return NavigationOutcome::Dropped(DropReason::AlreadyWon);
        }

        // Drop, never queue: a queued event would race its network results
        // against a newer navigation's.
        let Ok(_nav_guard) = self.nav_lock.try_lock() else {
            debug!(title = %event.title, "Navigation already in flight; dropping event");
            return NavigationOutcome::Dropped(DropReason::Busy);
        };

        let now = Instant::now();
        {
            let mut last = self.last_accepted_at.lock();
            if let Some(previous) = *last {
                if now.duration_since(previous) < self.config.debounce_window {
                    debug!(title = %event.title, "Repeat event within debounce window; dropping");
                    return NavigationOutcome::Dropped(DropReason::Debounced);
                }
            }
            *last = Some(now);
        }

        let generation = {
            let mut session = self.session.lock();
            session.generation += 1;
            session.phase = Phase::Navigating;
            session.click_count += 1;
            session.generation
        };
        info!(title = %event.title, source = ?event.source, "Navigation accepted");

        // Bounded internally: falls back to the normalized title rather than
        // blocking navigation.
        let resolved = self.resolver.resolve(&event.title).await;

        if !self.still_current(generation) {
            return NavigationOutcome::Dropped(DropReason::Superseded);
        }
        {
            let mut session = self.session.lock();
            session.current_article = Some(resolved.clone());
            session.history.push(resolved.clone());
        }

        // Content fetch brackets the timer pause; the timer starts on the
        // very first completed load and resumes on every later one, whether
        // the load succeeded or not.
        self.timer.lock().load_started();
        let content = self.fetch_content_bounded(&resolved.display).await;
        self.timer.lock().load_finished();

        let (puzzle, matched) = {
            let mut session = self.session.lock();
            session.phase = Phase::MatchChecking;
            (session.puzzle().clone(), session.matched_indices().clone())
        };

        let hits = self.matcher.check(&event.title, &puzzle, &matched).await;

        if !self.still_current(generation) {
            return NavigationOutcome::Dropped(DropReason::Superseded);
        }
        let (winning_lines, won) = {
            let mut session = self.session.lock();
            for hit in &hits {
                session.insert_match(hit.index, hit.canonical.clone());
            }
            session.phase = Phase::TimerSync;
            let lines = detect_winning_lines(session.matched_indices(), puzzle.grid_size());
            if lines.is_empty() {
                session.phase = Phase::Idle;
                (lines, false)
            } else {
                session.winning_lines = lines.clone();
                session.phase = Phase::Won;
                (lines, true)
            }
        };

        if won {
            self.timer.lock().stop();
            info!(
                lines = ?winning_lines.iter().map(ToString::to_string).collect::<Vec<_>>(),
                "Winning line complete; timer stopped"
            );
        } else if !hits.is_empty() {
            debug!(newly_matched = hits.len(), "Grid cells matched");
        }

        NavigationOutcome::Completed(NavigationSummary {
            resolved,
            content,
            newly_matched: hits,
            winning_lines,
            won,
        })
    }

    async fn fetch_content_bounded(&self, title: &str) -> ContentStatus {
        match timeout(self.config.content_timeout, self.content.fetch_content(title)).await {
            Ok(Ok(markup)) => ContentStatus::Loaded(markup),
            Ok(Err(err)) => {
                warn!(title, error = %err, "Content fetch failed");
                ContentStatus::Failed(err)
            }
            Err(_) => {
                warn!(
                    title,
                    timeout_ms = self.config.content_timeout.as_millis() as u64,
                    "Content fetch timed out"
                );
                ContentStatus::Failed(ContentError::Transient("content fetch timed out".into()))
            }
        }
    }

    /// Guard against a result outliving its navigation. The stamp can only
    /// move while the navigation lock is held, so a mismatch is a
    /// programming error: loud in development, refuse-to-mutate in release.
    fn still_current(&self, generation: u64) -> bool {
        let session = self.session.lock();
        if session.generation == generation {
            return true;
        }
        debug_assert!(
            false,
            "navigation result arrived after being superseded (held {generation}, current {})",
            session.generation
        );
        error!(
            held = generation,
            current = session.generation,
            "Stale navigation result discarded"
        );
        false
    }

    // --- read-only session views ---

    pub fn puzzle(&self) -> Puzzle {
        self.session.lock().puzzle().clone()
    }

    pub fn phase(&self) -> Phase {
        self.session.lock().phase()
    }

    pub fn is_won(&self) -> bool {
        self.session.lock().is_won()
    }

    pub fn click_count(&self) -> u32 {
        self.session.lock().click_count()
    }

    pub fn matched_indices(&self) -> BTreeSet<usize> {
        self.session.lock().matched_indices().clone()
    }

    pub fn current_article(&self) -> Option<CanonicalTitle> {
        self.session.lock().current_article().cloned()
    }

    pub fn winning_lines(&self) -> Vec<LineId> {
        self.session.lock().winning_lines().to_vec()
    }

    pub fn elapsed(&self) -> Duration {
        self.timer.lock().elapsed()
    }

    /// Final totals for the score reporting sink; available once won.
    pub fn score_report(&self) -> Option<ScoreReport> {
        let session = self.session.lock();
        if !session.is_won() {
            return None;
        }
        Some(session.score_report(self.timer.lock().elapsed().as_secs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fake_wiki::{FakeContentService, FakeRedirectService};
    use tokio::time::advance;

    fn test_config() -> EngineConfig {
        EngineConfig {
            grid_size: 3,
            debounce_window: Duration::ZERO,
            resolve_retry_backoff: Duration::from_millis(1),
            ..EngineConfig::default()
        }
    }

    fn puzzle_3x3() -> Puzzle {
        let grid = vec![
            "Dog".into(),
            "Cat".into(),
            "Bird".into(),
            "Fish".into(),
            "Horse".into(),
            "Sheep".into(),
            "Goat".into(),
            "Duck".into(),
            "Crow".into(),
        ];
        Puzzle::new(3, grid, "Animal".into()).unwrap()
    }

    fn controller_with(
        config: EngineConfig,
        redirects: FakeRedirectService,
        content: FakeContentService,
    ) -> NavigationController {
        let resolver = Arc::new(RedirectResolver::new(Arc::new(redirects), &config));
        let matcher = MatchEngine::new(resolver.clone());
        NavigationController::new(
            config,
            GameSession::new(puzzle_3x3()),
            resolver,
            matcher,
            Arc::new(content),
        )
    }

    fn controller() -> NavigationController {
        controller_with(
            test_config(),
            FakeRedirectService::new().with_redirect("Canine", "Dog"),
            FakeContentService::new(),
        )
    }

    #[tokio::test]
    async fn navigation_through_a_redirect_matches_the_grid_cell() {
        let controller = controller();

        let outcome = controller.navigate(NavigationEvent::link("Canine")).await;
        let NavigationOutcome::Completed(summary) = outcome else {
            panic!("expected completed navigation, got {outcome:?}");
        };

        assert_eq!(summary.resolved.key, "dog");
        assert_eq!(summary.newly_matched.len(), 1);
        assert_eq!(summary.newly_matched[0].index, 0);
        assert!(!summary.won);
        assert_eq!(controller.click_count(), 1);
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(
            controller.current_article().map(|t| t.key),
            Some("dog".into())
        );
    }

    #[tokio::test]
    async fn renavigating_a_matched_article_matches_nothing_new() {
        let controller = controller();

        controller.navigate(NavigationEvent::link("Canine")).await;
        // Revisiting through the history panel still costs a click but
        // cannot re-match the cell.
        let outcome = controller.navigate(NavigationEvent::history("Canine")).await;

        let NavigationOutcome::Completed(summary) = outcome else {
            panic!("second navigation should complete");
        };
        assert!(summary.newly_matched.is_empty());
        assert_eq!(controller.matched_indices().len(), 1);
        assert_eq!(controller.click_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_event_is_dropped_and_costs_no_click() {
        let controller = Arc::new(controller_with(
            test_config(),
            FakeRedirectService::new(),
            FakeContentService::new().with_delay(Duration::from_millis(500)),
        ));

        let first = tokio::spawn({
            let controller = controller.clone();
            async move { controller.navigate(NavigationEvent::link("Dog")).await }
        });
        // Let the first navigation take the lock and park on its content
        // fetch before firing the second event.
        tokio::task::yield_now().await;

        let second = controller.navigate(NavigationEvent::link("Cat")).await;
        assert!(matches!(
            second,
            NavigationOutcome::Dropped(DropReason::Busy)
        ));

        let first = first.await.unwrap();
        assert!(matches!(first, NavigationOutcome::Completed(_)));
        assert_eq!(controller.click_count(), 1);
        assert_eq!(controller.matched_indices(), BTreeSet::from([0usize]));
    }

    #[tokio::test(start_paused = true)]
    async fn debounce_window_suppresses_rapid_repeats() {
        let config = EngineConfig {
            debounce_window: Duration::from_millis(300),
            ..test_config()
        };
        let controller = controller_with(config, FakeRedirectService::new(), FakeContentService::new());

        let first = controller.navigate(NavigationEvent::link("Dog")).await;
        assert!(matches!(first, NavigationOutcome::Completed(_)));

        let repeat = controller.navigate(NavigationEvent::link("Dog")).await;
        assert!(matches!(
            repeat,
            NavigationOutcome::Dropped(DropReason::Debounced)
        ));
        assert_eq!(controller.click_count(), 1);

        advance(Duration::from_millis(301)).await;
        let later = controller.navigate(NavigationEvent::link("Cat")).await;
        assert!(matches!(later, NavigationOutcome::Completed(_)));
        assert_eq!(controller.click_count(), 2);
    }

    #[tokio::test]
    async fn completing_a_row_wins_and_stops_the_game() {
        let controller = controller();

        controller.navigate(NavigationEvent::link("Dog")).await;
        controller.navigate(NavigationEvent::link("Cat")).await;
        let outcome = controller.navigate(NavigationEvent::link("Bird")).await;

        let NavigationOutcome::Completed(summary) = outcome else {
            panic!("winning navigation should complete");
        };
        assert!(summary.won);
        assert_eq!(summary.winning_lines, vec![LineId::Row(0)]);
        assert_eq!(controller.phase(), Phase::Won);

        let report = controller.score_report().expect("won game has a report");
        assert_eq!(report.click_count, 3);
        assert_eq!(
            report.matched_canonical_titles,
            vec!["Dog", "Cat", "Bird"]
        );
        assert_eq!(report.navigation_history, vec!["Dog", "Cat", "Bird"]);

        let after = controller.navigate(NavigationEvent::link("Fish")).await;
        assert!(matches!(
            after,
            NavigationOutcome::Dropped(DropReason::AlreadyWon)
        ));
        assert_eq!(controller.click_count(), 3);
    }

    #[tokio::test]
    async fn content_failure_is_surfaced_but_matching_proceeds() {
        let controller = controller_with(
            test_config(),
            FakeRedirectService::new(),
            FakeContentService::new().with_not_found("Dog"),
        );

        let outcome = controller.navigate(NavigationEvent::link("Dog")).await;
        let NavigationOutcome::Completed(summary) = outcome else {
            panic!("navigation should complete despite content failure");
        };
        assert!(matches!(
            summary.content,
            ContentStatus::Failed(ContentError::NotFound(_))
        ));
        // The match check is independent of the content outcome.
        assert_eq!(summary.newly_matched.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn content_timeout_degrades_to_a_transient_failure() {
        let config = EngineConfig {
            content_timeout: Duration::from_secs(2),
            ..test_config()
        };
        let controller = controller_with(
            config,
            FakeRedirectService::new(),
            FakeContentService::new().with_delay(Duration::from_secs(30)),
        );

        let outcome = controller.navigate(NavigationEvent::link("Sheep")).await;
        let NavigationOutcome::Completed(summary) = outcome else {
            panic!("navigation should complete despite the timeout");
        };
        assert!(matches!(
            summary.content,
            ContentStatus::Failed(ContentError::Transient(_))
        ));
    }

    #[tokio::test]
    async fn load_start_costs_no_click_and_skips_matching() {
        let controller = controller();

        let status = controller.load_start().await;
        assert!(matches!(status, ContentStatus::Loaded(_)));
        assert_eq!(controller.click_count(), 0);
        assert!(controller.matched_indices().is_empty());
        assert_eq!(
            controller.current_article().map(|t| t.display),
            Some("Animal".into())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn timer_counts_play_time_and_excludes_loading() {
        let content = FakeContentService::new()
            .with_delay_for("Animal", Duration::from_secs(2))
            .with_delay_for("Dog", Duration::from_secs(3));
        let controller = controller_with(test_config(), FakeRedirectService::new(), content);

        // Initial load: 2s of loading, none of it counted.
        controller.load_start().await;
        assert_eq!(controller.elapsed(), Duration::ZERO);

        // 10s of reading time.
        advance(Duration::from_secs(10)).await;
        assert_eq!(controller.elapsed(), Duration::from_secs(10));

        // Second navigation: the 3s load pause is excluded.
        controller.navigate(NavigationEvent::link("Dog")).await;
        assert_eq!(controller.elapsed(), Duration::from_secs(10));

        advance(Duration::from_secs(5)).await;
        assert_eq!(controller.elapsed(), Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn winning_freezes_the_clock() {
        let controller = controller();

        controller.navigate(NavigationEvent::link("Dog")).await;
        advance(Duration::from_secs(4)).await;
        controller.navigate(NavigationEvent::link("Cat")).await;
        controller.navigate(NavigationEvent::link("Bird")).await;
        assert!(controller.is_won());

        let at_win = controller.elapsed();
        advance(Duration::from_secs(60)).await;
        assert_eq!(controller.elapsed(), at_win);
        assert_eq!(
            controller.score_report().unwrap().elapsed_seconds,
            at_win.as_secs()
        );
    }

    #[tokio::test]
    async fn unresolvable_titles_still_navigate() {
        let controller = controller_with(
            test_config(),
            FakeRedirectService::new().with_failure("Mystery Page"),
            FakeContentService::new(),
        );

        let outcome = controller
            .navigate(NavigationEvent::link("Mystery  Page"))
            .await;
        let NavigationOutcome::Completed(summary) = outcome else {
            panic!("resolution failure must not break navigation");
        };
        assert_eq!(summary.resolved.key, "mystery_page");
        assert!(summary.newly_matched.is_empty());
    }
}
