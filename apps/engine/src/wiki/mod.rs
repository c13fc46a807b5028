//! Encyclopedia gateway trait definitions.
//!
//! The engine consumes two external services, specified here at their
//! interface only. Implementations (HTTP clients against a live wiki,
//! in-memory fakes for tests) are supplied by the caller and injected
//! through the engine builder.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::title::CanonicalTitle;

/// Raw article markup as returned by the content service. The engine never
/// parses or sanitizes it; rendering belongs to the surrounding application.
pub type ArticleMarkup = String;

/// Content fetch failures. `NotFound` and `Transient` are handled
/// identically by the engine (both trigger the caller's replacement-article
/// policy) but stay distinct so logs can tell them apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("article not found: {0}")]
    NotFound(String),
    #[error("content service failure: {0}")]
    Transient(String),
}

/// Redirect service failure: unreachable, malformed response, or internal
/// error. "Page does not exist" is not an error; see
/// [`RedirectResolutionService::resolve_canonical`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("redirect resolution failed: {0}")]
pub struct ResolutionError(pub String);

/// Resolves a title to its canonical target by following the encyclopedia's
/// redirect graph.
#[async_trait]
pub trait RedirectResolutionService: Send + Sync {
    /// Resolve `title` to its canonical form.
    ///
    /// Must be called with the exact raw/normalized title that was
    /// originally referenced, never a pre-resolved one; the service itself
    /// performs the graph walk. `Ok(None)` means the page does not exist.
    async fn resolve_canonical(
        &self,
        title: &str,
    ) -> Result<Option<CanonicalTitle>, ResolutionError>;
}

/// Fetches raw article markup for a canonical title.
#[async_trait]
pub trait ArticleContentService: Send + Sync {
    async fn fetch_content(&self, canonical_title: &str) -> Result<ArticleMarkup, ContentError>;
}
