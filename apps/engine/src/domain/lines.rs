//! Winning line enumeration and detection.
//!
//! Pure and stateless: given the set of matched grid indices, report which
//! rows, columns, or diagonals are fully matched. The grid size is a
//! parameter everywhere; nothing here assumes 5x5.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Identifier of one potential winning line on an N x N grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LineId {
    Row(usize),
    Col(usize),
    MainDiagonal,
    AntiDiagonal,
}

impl Display for LineId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            LineId::Row(i) => write!(f, "row-{i}"),
            LineId::Col(i) => write!(f, "col-{i}"),
            LineId::MainDiagonal => write!(f, "diag-main"),
            LineId::AntiDiagonal => write!(f, "diag-anti"),
        }
    }
}

/// Row-major grid indices belonging to a line.
pub fn line_indices(line: LineId, grid_size: usize) -> Vec<usize> {
    match line {
        LineId::Row(r) => (0..grid_size).map(|c| r * grid_size + c).collect(),
        LineId::Col(c) => (0..grid_size).map(|r| r * grid_size + c).collect(),
        LineId::MainDiagonal => (0..grid_size).map(|i| i * grid_size + i).collect(),
        LineId::AntiDiagonal => (0..grid_size)
            .map(|i| i * grid_size + (grid_size - 1 - i))
            .collect(),
    }
}

/// All candidate lines in fixed enumeration order: rows, columns, then the
/// two diagonals. The order is part of the contract so callers can rely on
/// deterministic output.
pub fn all_lines(grid_size: usize) -> Vec<LineId> {
    let mut lines = Vec::with_capacity(grid_size * 2 + 2);
    lines.extend((0..grid_size).map(LineId::Row));
    lines.extend((0..grid_size).map(LineId::Col));
    lines.push(LineId::MainDiagonal);
    lines.push(LineId::AntiDiagonal);
    lines
}

/// Report every line fully contained in `matched`.
///
/// Multiple simultaneous winners are all returned (a single new match can
/// complete a row and a diagonal at once). A line missing even one index is
/// not winning.
pub fn detect_winning_lines(matched: &BTreeSet<usize>, grid_size: usize) -> Vec<LineId> {
    all_lines(grid_size)
        .into_iter()
        .filter(|line| line_indices(*line, grid_size).iter().all(|i| matched.contains(i)))
        .collect()
}
