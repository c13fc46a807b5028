#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod wiki;

#[cfg(test)]
pub mod test_support;

// Re-exports for public API
pub use config::{EngineConfig, GeneratorPolicy};
pub use domain::{Category, Group, LineId, Phase, Puzzle, ScoreReport};
pub use errors::DomainError;
pub use infra::state::{build_engine, EngineBuilder};
pub use services::navigation::{
    ContentStatus, DropReason, NavigationController, NavigationEvent, NavigationOutcome,
    NavigationSource, NavigationSummary,
};
pub use state::GameEngine;
pub use wiki::{
    ArticleContentService, ArticleMarkup, ContentError, RedirectResolutionService,
    ResolutionError,
};

// Prelude for embedding-application convenience
pub mod prelude {
    pub use super::config::*;
    pub use super::errors::*;
    pub use super::services::navigation::*;
    pub use super::state::*;
    pub use super::wiki::*;
}

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    engine_test_support::logging::init();
}
