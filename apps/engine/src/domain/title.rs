//! Title normalization: the comparison form under which two spellings of an
//! article name are "the same article".
//!
//! Normalization is deterministic, total, and does no I/O. Redirect
//! resolution (the other half of canonicalization) lives in
//! `services::resolver`.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// A title after normalization but before redirect resolution.
///
/// `key` is the comparison form: NFC, separator runs collapsed to single
/// underscores, lowercased. `display` keeps the original casing with
/// separator runs collapsed to single spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTitle {
    pub key: String,
    pub display: String,
}

/// A title after normalization *and* redirect resolution. The only form used
/// for article equality: two titles name the same article iff their canonical
/// keys are identical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalTitle {
    pub key: String,
    pub display: String,
}

impl CanonicalTitle {
    /// Wrap a display-form title (e.g. one returned by the redirect service)
    /// into canonical form by normalizing it.
    pub fn from_display(display: &str) -> Self {
        let n = normalize(display);
        Self {
            key: n.key,
            display: n.display,
        }
    }

    /// Article equality, independent of casing and separators.
    pub fn same_article(&self, other: &CanonicalTitle) -> bool {
        self.key == other.key
    }
}

impl From<NormalizedTitle> for CanonicalTitle {
    fn from(n: NormalizedTitle) -> Self {
        Self {
            key: n.key,
            display: n.display,
        }
    }
}

/// Normalize a raw title.
///
/// Trims, applies Unicode NFC, and collapses every run of whitespace and/or
/// underscores into a single separator. Empty input normalizes to the empty
/// title.
pub fn normalize(raw: &str) -> NormalizedTitle {
    let composed: String = raw.nfc().collect();
    let words: Vec<&str> = composed
        .split(|c: char| c.is_whitespace() || c == '_')
        .filter(|w| !w.is_empty())
        .collect();

    let display = words.join(" ");
    let key = words.join("_").to_lowercase();

    NormalizedTitle { key, display }
}
