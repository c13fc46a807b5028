use std::sync::Arc;

use crate::config::EngineConfig;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::state::engine::GameEngine;
use crate::wiki::{ArticleContentService, RedirectResolutionService};

/// Builder for creating GameEngine instances (used in both tests and the
/// embedding application).
pub struct EngineBuilder {
    config: Option<EngineConfig>,
    redirects: Option<Arc<dyn RedirectResolutionService>>,
    content: Option<Arc<dyn ArticleContentService>>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            redirects: None,
            content: None,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_redirect_service(mut self, service: Arc<dyn RedirectResolutionService>) -> Self {
        self.redirects = Some(service);
        self
    }

    pub fn with_content_service(mut self, service: Arc<dyn ArticleContentService>) -> Self {
        self.content = Some(service);
        self
    }

    /// Validate and assemble. Without an explicit config, defaults plus
    /// `LINKBINGO_*` environment overrides are used.
    pub fn build(self) -> Result<GameEngine, DomainError> {
        let config = match self.config {
            Some(config) => {
                config.validate()?;
                config
            }
            None => EngineConfig::from_env()?,
        };
        let redirects = self.redirects.ok_or_else(|| {
            DomainError::validation(
                ValidationKind::InvalidConfig,
                "A redirect resolution service is required",
            )
        })?;
        let content = self.content.ok_or_else(|| {
            DomainError::validation(
                ValidationKind::InvalidConfig,
                "An article content service is required",
            )
        })?;
        Ok(GameEngine::new(config, redirects, content))
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_engine() -> EngineBuilder {
    EngineBuilder::new()
}
