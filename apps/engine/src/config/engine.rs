//! Engine configuration with environment overrides.
//!
//! Defaults are playable out of the box; every knob can be overridden via a
//! `LINKBINGO_*` environment variable. `validate` is called by the engine
//! builder, so a misconfigured engine fails at construction rather than
//! mid-game.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::domain::{DomainError, ValidationKind};

/// What the generator does when group constraints cannot be satisfied at the
/// requested grid size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratorPolicy {
    /// Surface the insufficient-pool error to the caller immediately.
    #[default]
    FailFast,
    /// Retry once ignoring group caps before surfacing the error.
    RelaxGroups,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Grid side length N; the puzzle has N*N cells plus a starting article.
    pub grid_size: usize,
    /// Bound on one redirect-resolution round trip.
    pub resolve_timeout: Duration,
    /// Attempts per title before falling back to the unresolved form.
    pub resolve_attempts: u32,
    /// Pause between resolution attempts.
    pub resolve_retry_backoff: Duration,
    /// Bound on one content fetch.
    pub content_timeout: Duration,
    /// Window within which a repeat navigation event is suppressed.
    pub debounce_window: Duration,
    /// Redirect cache bound; oldest entries are evicted beyond this.
    pub redirect_cache_capacity: usize,
    pub generator_policy: GeneratorPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_size: 5,
            resolve_timeout: Duration::from_secs(3),
            resolve_attempts: 2,
            resolve_retry_backoff: Duration::from_millis(150),
            content_timeout: Duration::from_secs(8),
            debounce_window: Duration::from_millis(300),
            redirect_cache_capacity: 2048,
            generator_policy: GeneratorPolicy::FailFast,
        }
    }
}

impl EngineConfig {
    /// Build a config from defaults plus `LINKBINGO_*` environment overrides.
    pub fn from_env() -> Result<Self, DomainError> {
        let defaults = Self::default();
        let cfg = Self {
            grid_size: env_parse("LINKBINGO_GRID_SIZE", defaults.grid_size)?,
            resolve_timeout: Duration::from_millis(env_parse(
                "LINKBINGO_RESOLVE_TIMEOUT_MS",
                defaults.resolve_timeout.as_millis() as u64,
            )?),
            resolve_attempts: env_parse("LINKBINGO_RESOLVE_ATTEMPTS", defaults.resolve_attempts)?,
            resolve_retry_backoff: Duration::from_millis(env_parse(
                "LINKBINGO_RESOLVE_RETRY_BACKOFF_MS",
                defaults.resolve_retry_backoff.as_millis() as u64,
            )?),
            content_timeout: Duration::from_millis(env_parse(
                "LINKBINGO_CONTENT_TIMEOUT_MS",
                defaults.content_timeout.as_millis() as u64,
            )?),
            debounce_window: Duration::from_millis(env_parse(
                "LINKBINGO_DEBOUNCE_MS",
                defaults.debounce_window.as_millis() as u64,
            )?),
            redirect_cache_capacity: env_parse(
                "LINKBINGO_REDIRECT_CACHE_CAPACITY",
                defaults.redirect_cache_capacity,
            )?,
            generator_policy: generator_policy_from_env(defaults.generator_policy)?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.grid_size < 2 {
            return Err(DomainError::validation(
                ValidationKind::InvalidGridSize,
                format!("Grid size must be at least 2, got {}", self.grid_size),
            ));
        }
        if self.resolve_timeout.is_zero() || self.content_timeout.is_zero() {
            return Err(DomainError::validation(
                ValidationKind::InvalidConfig,
                "Service timeouts must be non-zero",
            ));
        }
        if self.resolve_attempts == 0 {
            return Err(DomainError::validation(
                ValidationKind::InvalidConfig,
                "At least one resolution attempt is required",
            ));
        }
        // The whole grid plus start article is pre-warmed into the cache at
        // game start; a smaller bound would evict it immediately.
        let min_capacity = self.grid_size * self.grid_size + 1;
        if self.redirect_cache_capacity < min_capacity {
            return Err(DomainError::validation(
                ValidationKind::InvalidConfig,
                format!(
                    "Redirect cache capacity {} cannot hold the {} pre-warmed puzzle titles",
                    self.redirect_cache_capacity, min_capacity
                ),
            ));
        }
        Ok(())
    }
}

fn env_parse<T: FromStr>(name: &str, default: T) -> Result<T, DomainError> {
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| {
            DomainError::validation(
                ValidationKind::InvalidConfig,
                format!("{name} is not a valid value: '{raw}'"),
            )
        }),
        Err(_) => Ok(default),
    }
}

fn generator_policy_from_env(default: GeneratorPolicy) -> Result<GeneratorPolicy, DomainError> {
    match env::var("LINKBINGO_GENERATOR_POLICY") {
        Ok(raw) => match raw.as_str() {
            "fail_fast" => Ok(GeneratorPolicy::FailFast),
            "relax_groups" => Ok(GeneratorPolicy::RelaxGroups),
            other => Err(DomainError::validation(
                ValidationKind::InvalidConfig,
                format!(
                    "LINKBINGO_GENERATOR_POLICY must be 'fail_fast' or 'relax_groups', got '{other}'"
                ),
            )),
        },
        Err(_) => Ok(default),
    }
}
