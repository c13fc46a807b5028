//! Redirect resolution with a session-owned, append-only cache.
//!
//! Resolution failures never reach the caller: the resolver falls back to
//! the normalized input title and caches that fallback, so one flaky lookup
//! does not turn into a retry storm over the rest of the session.

use std::collections::VecDeque;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex as StateMutex;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::domain::title::{normalize, CanonicalTitle, NormalizedTitle};
use crate::wiki::RedirectResolutionService;

/// Caching front for the redirect resolution service.
///
/// Owned by one game session and injected into the match engine and the
/// navigation controller, so a new game starts with a clean cache.
///
/// Uses DashMap for lock-free concurrent reads and per-key mutexes for
/// deduplication: a second caller for a title already being resolved awaits
/// the same outcome instead of issuing a second service call.
pub struct RedirectResolver {
    service: Arc<dyn RedirectResolutionService>,
    cache: DashMap<String, CanonicalTitle>,
    /// Insertion order of cache keys, for oldest-first eviction.
    insertion_order: StateMutex<VecDeque<String>>,
    init_locks: DashMap<String, Arc<Mutex<()>>>,
    capacity: usize,
    resolve_timeout: std::time::Duration,
    attempts: u32,
    retry_backoff: std::time::Duration,
}

impl RedirectResolver {
    pub fn new(service: Arc<dyn RedirectResolutionService>, config: &EngineConfig) -> Self {
        Self {
            service,
            cache: DashMap::new(),
            insertion_order: StateMutex::new(VecDeque::new()),
            init_locks: DashMap::new(),
            capacity: config.redirect_cache_capacity,
            resolve_timeout: config.resolve_timeout,
            attempts: config.resolve_attempts,
            retry_backoff: config.resolve_retry_backoff,
        }
    }

    /// Resolve a raw title to canonical form. Infallible: on service
    /// failure, timeout, or a nonexistent page this returns the normalized
    /// input title.
    pub async fn resolve(&self, raw: &str) -> CanonicalTitle {
        let normalized = normalize(raw);
        if normalized.key.is_empty() {
            return normalized.into();
        }

        // Fast path: check cache outside any lock.
        if let Some(hit) = self.cache.get(&normalized.key) {
            return hit.value().clone();
        }

        // Get or create the per-key init mutex.
        let lock = {
            let maybe = self.init_locks.get(&normalized.key).map(|e| e.value().clone());
            match maybe {
                Some(l) => l,
                None => {
                    let new_mutex = Arc::new(Mutex::new(()));
                    self.init_locks
                        .insert(normalized.key.clone(), new_mutex.clone());
                    new_mutex
                }
            }
        };

        let _guard = lock.lock().await;

        // Double-check: a concurrent caller may have resolved this title
        // while we waited for the mutex.
        if let Some(hit) = self.cache.get(&normalized.key) {
            return hit.value().clone();
        }

        let resolved = self.resolve_uncached(&normalized).await;
        // Cache under the input's normalized key (not re-normalized from the
        // target) so repeated lookups of the same raw spelling stay cheap.
        self.insert(normalized.key.clone(), resolved.clone());
        self.init_locks.remove(&normalized.key);

        resolved
    }

    /// Number of cached resolutions. Exposed for bound/eviction tests.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    async fn resolve_uncached(&self, normalized: &NormalizedTitle) -> CanonicalTitle {
        for attempt in 1..=self.attempts {
            // The service receives the originally referenced title; it walks
            // the redirect graph itself.
            match timeout(
                self.resolve_timeout,
                self.service.resolve_canonical(&normalized.display),
            )
            .await
            {
                Ok(Ok(Some(canonical))) => {
                    debug!(
                        title = %normalized.display,
                        canonical = %canonical.display,
                        "Resolved redirect"
                    );
                    return canonical;
                }
                Ok(Ok(None)) => {
                    // A missing page will not appear between retries.
                    warn!(
                        title = %normalized.display,
                        "Page does not exist; falling back to original title"
                    );
                    break;
                }
                Ok(Err(err)) => {
                    warn!(
                        title = %normalized.display,
                        attempt,
                        error = %err,
                        "Redirect resolution failed"
                    );
                }
                Err(_) => {
                    warn!(
                        title = %normalized.display,
                        attempt,
                        timeout_ms = self.resolve_timeout.as_millis() as u64,
                        "Redirect resolution timed out"
                    );
                }
            }
            if attempt < self.attempts {
                tokio::time::sleep(self.retry_backoff).await;
            }
        }
        normalized.clone().into()
    }

    fn insert(&self, key: String, value: CanonicalTitle) {
        if self.cache.insert(key.clone(), value).is_none() {
            let mut order = self.insertion_order.lock();
            order.push_back(key);
            while order.len() > self.capacity {
                if let Some(oldest) = order.pop_front() {
                    self.cache.remove(&oldest);
                }
            }
        }
    }
}
