//! In-memory encyclopedia fakes with scripted redirects, failures, and
//! latency, plus call counters so tests can assert exactly how many service
//! round trips happened.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::title::{normalize, CanonicalTitle};
use crate::wiki::{
    ArticleContentService, ArticleMarkup, ContentError, RedirectResolutionService, ResolutionError,
};

/// Fake redirect service over an explicit redirect graph.
///
/// Unknown titles resolve to themselves (a plain article with no redirect).
/// The graph walk follows chains to their terminal target, like the real
/// service would.
#[derive(Default)]
pub struct FakeRedirectService {
    redirects: HashMap<String, String>,
    missing: HashSet<String>,
    failing: HashSet<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeRedirectService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script `source` to redirect to `target` (display form).
    pub fn with_redirect(mut self, source: &str, target: &str) -> Self {
        self.redirects
            .insert(normalize(source).key, target.to_string());
        self
    }

    /// Script `title` as a page that does not exist.
    pub fn with_missing(mut self, title: &str) -> Self {
        self.missing.insert(normalize(title).key);
        self
    }

    /// Script `title` to fail with a transient service error.
    pub fn with_failure(mut self, title: &str) -> Self {
        self.failing.insert(normalize(title).key);
        self
    }

    /// Delay every resolution by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RedirectResolutionService for FakeRedirectService {
    async fn resolve_canonical(
        &self,
        title: &str,
    ) -> Result<Option<CanonicalTitle>, ResolutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let key = normalize(title).key;
        if self.failing.contains(&key) {
            return Err(ResolutionError("injected transient failure".into()));
        }
        if self.missing.contains(&key) {
            return Ok(None);
        }

        // Follow the redirect chain to its terminal target.
        let mut current = title.to_string();
        let mut seen = HashSet::new();
        while let Some(target) = self.redirects.get(&normalize(&current).key) {
            if !seen.insert(normalize(target).key) {
                break; // cycle guard
            }
            current = target.clone();
        }
        Ok(Some(CanonicalTitle::from_display(&current)))
    }
}

/// Fake content service with per-title latency and failure scripting.
#[derive(Default)]
pub struct FakeContentService {
    not_found: HashSet<String>,
    transient: HashSet<String>,
    delays: HashMap<String, Duration>,
    default_delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeContentService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_not_found(mut self, title: &str) -> Self {
        self.not_found.insert(normalize(title).key);
        self
    }

    pub fn with_transient_failure(mut self, title: &str) -> Self {
        self.transient.insert(normalize(title).key);
        self
    }

    /// Delay every fetch by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.default_delay = Some(delay);
        self
    }

    /// Delay fetches of one specific title, for scripted timer scenarios.
    pub fn with_delay_for(mut self, title: &str, delay: Duration) -> Self {
        self.delays.insert(normalize(title).key, delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArticleContentService for FakeContentService {
    async fn fetch_content(&self, canonical_title: &str) -> Result<ArticleMarkup, ContentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let key = normalize(canonical_title).key;
        if let Some(delay) = self.delays.get(&key).copied().or(self.default_delay) {
            tokio::time::sleep(delay).await;
        }

        if self.not_found.contains(&key) {
            return Err(ContentError::NotFound(canonical_title.to_string()));
        }
        if self.transient.contains(&key) {
            return Err(ContentError::Transient(format!(
                "injected failure fetching {canonical_title}"
            )));
        }
        Ok(format!("== {canonical_title} ==\nFake article body."))
    }
}
