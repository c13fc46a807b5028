//! Property tests for winning line detection (pure domain).

use std::collections::BTreeSet;

use proptest::prelude::*;

use crate::domain::lines::{all_lines, detect_winning_lines, line_indices, LineId};

fn line_for(grid_size: usize, pick: usize) -> LineId {
    let lines = all_lines(grid_size);
    lines[pick % lines.len()]
}

proptest! {
    /// Completing any line is always detected, regardless of extra matches.
    #[test]
    fn completed_line_is_detected(
        grid_size in 2usize..=8,
        pick in 0usize..100,
        extras in proptest::collection::btree_set(0usize..64, 0..10),
    ) {
        let line = line_for(grid_size, pick);
        let mut matched: BTreeSet<usize> =
            line_indices(line, grid_size).into_iter().collect();
        matched.extend(extras.into_iter().filter(|i| *i < grid_size * grid_size));

        prop_assert!(detect_winning_lines(&matched, grid_size).contains(&line));
    }

    /// A line missing one cell, with nothing else matched, wins nothing.
    #[test]
    fn incomplete_line_alone_never_wins(
        grid_size in 2usize..=8,
        pick in 0usize..100,
        hole in 0usize..8,
    ) {
        let line = line_for(grid_size, pick);
        let indices = line_indices(line, grid_size);
        let hole = indices[hole % indices.len()];
        let matched: BTreeSet<usize> =
            indices.into_iter().filter(|i| *i != hole).collect();

        prop_assert!(detect_winning_lines(&matched, grid_size).is_empty());
    }

    /// Every grid has exactly 2N + 2 candidate lines, each N cells long.
    #[test]
    fn line_enumeration_shape(grid_size in 2usize..=10) {
        let lines = all_lines(grid_size);
        prop_assert_eq!(lines.len(), grid_size * 2 + 2);
        for line in lines {
            let indices = line_indices(line, grid_size);
            prop_assert_eq!(indices.len(), grid_size);
            for i in indices {
                prop_assert!(i < grid_size * grid_size);
            }
        }
    }
}
