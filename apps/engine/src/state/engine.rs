//! Engine state containing shared resources: the validated configuration
//! and the injected encyclopedia services.

use std::sync::Arc;

use tracing::info;

use crate::config::EngineConfig;
use crate::domain::category::{Category, Group};
use crate::domain::session::GameSession;
use crate::errors::domain::DomainError;
use crate::services::generator;
use crate::services::match_engine::MatchEngine;
use crate::services::navigation::NavigationController;
use crate::services::resolver::RedirectResolver;
use crate::wiki::{ArticleContentService, RedirectResolutionService};

/// Long-lived engine handle, shared across games. Per-game state (session,
/// redirect cache) is created fresh by [`GameEngine::start_game`].
#[derive(Clone)]
pub struct GameEngine {
    config: EngineConfig,
    redirects: Arc<dyn RedirectResolutionService>,
    content: Arc<dyn ArticleContentService>,
}

impl std::fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GameEngine {
    pub(crate) fn new(
        config: EngineConfig,
        redirects: Arc<dyn RedirectResolutionService>,
        content: Arc<dyn ArticleContentService>,
    ) -> Self {
        Self {
            config,
            redirects,
            content,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Start a new game: generate a puzzle from the curated pool, build a
    /// fresh session-owned redirect cache, pre-warm it with every puzzle
    /// title, and hand back the navigation controller.
    ///
    /// Each call replaces the previous game wholesale; the old controller
    /// keeps its own (now unreachable) state, so a reset can never leak
    /// matches or cache entries into the next game.
    pub async fn start_game(
        &self,
        pool: &[Category],
        groups: &[Group],
        game_seed: u64,
    ) -> Result<NavigationController, DomainError> {
        let puzzle = generator::generate(pool, groups, &self.config, game_seed)?;
        info!(
            grid_size = puzzle.grid_size(),
            start = %puzzle.start(),
            "Puzzle generated"
        );

        let resolver = Arc::new(RedirectResolver::new(self.redirects.clone(), &self.config));
        let matcher = MatchEngine::new(resolver.clone());
        matcher.prewarm(&puzzle).await;

        Ok(NavigationController::new(
            self.config.clone(),
            GameSession::new(puzzle),
            resolver,
            matcher,
            self.content.clone(),
        ))
    }
}
