//! Serialized environment-variable overrides for configuration tests.
//!
//! Process environment is global; tests that set variables race with each
//! other unless they share a lock. `with_env` takes that lock, applies the
//! overrides, runs the closure, and restores the previous values.

use std::env;

use once_cell::sync::Lazy;
use std::sync::Mutex;

static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Run `f` with the given environment variables set, restoring the previous
/// environment afterwards. Overrides with value `None` unset the variable.
pub fn with_env<T>(vars: &[(&str, Option<&str>)], f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    let previous: Vec<(String, Option<String>)> = vars
        .iter()
        .map(|(name, _)| ((*name).to_string(), env::var(name).ok()))
        .collect();

    for (name, value) in vars {
        match value {
            Some(v) => env::set_var(name, v),
            None => env::remove_var(name),
        }
    }

    let result = f();

    for (name, value) in previous {
        match value {
            Some(v) => env::set_var(&name, v),
            None => env::remove_var(&name),
        }
    }

    result
}
