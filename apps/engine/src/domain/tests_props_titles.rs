//! Property tests for title normalization (pure domain).
//!
//! Contract under test:
//! - Titles differing only in whitespace, underscores, or casing share a key
//! - Normalization is idempotent on its own display output
//! - The key never carries separators at the edges

use proptest::prelude::*;

use crate::domain::title::normalize;

/// Words without separator characters, so decorating them with separators
/// below is the only source of whitespace/underscores.
fn word() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9]{1,8}"
}

/// A separator run: any non-empty mix of spaces, tabs, and underscores.
fn separator() -> impl Strategy<Value = String> {
    proptest::collection::vec(prop_oneof![Just(' '), Just('\t'), Just('_')], 1..4)
        .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    /// Two decorations of the same words normalize to the same key.
    #[test]
    fn separator_and_case_variants_share_a_key(
        words in proptest::collection::vec(word(), 1..6),
        seps_a in proptest::collection::vec(separator(), 8),
        seps_b in proptest::collection::vec(separator(), 8),
        uppercase_a in any::<bool>(),
    ) {
        let join = |seps: &[String]| -> String {
            let mut s = String::new();
            for (i, w) in words.iter().enumerate() {
                if i > 0 {
                    s.push_str(&seps[i % seps.len()]);
                }
                s.push_str(w);
            }
            s
        };

        let a = if uppercase_a { join(&seps_a).to_uppercase() } else { join(&seps_a) };
        let b = join(&seps_b).to_lowercase();

        prop_assert_eq!(normalize(&a).key, normalize(&b).key);
    }

    /// Normalizing a display form again changes nothing.
    #[test]
    fn normalize_is_idempotent_on_display(raw in ".{0,64}") {
        let once = normalize(&raw);
        let twice = normalize(&once.display);
        prop_assert_eq!(&once.key, &twice.key);
        prop_assert_eq!(&once.display, &twice.display);
    }

    /// Keys never start or end with an underscore and never contain runs.
    #[test]
    fn keys_have_no_separator_runs(raw in ".{0,64}") {
        let key = normalize(&raw).key;
        prop_assert!(!key.starts_with('_'));
        prop_assert!(!key.ends_with('_'));
        prop_assert!(!key.contains("__"));
    }
}
