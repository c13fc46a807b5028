//! The bingo puzzle: N*N grid article titles plus one starting article.

use serde::{Deserialize, Serialize};

use crate::domain::title::normalize;
use crate::errors::domain::{DomainError, ValidationKind};

/// Immutable puzzle produced by the generator.
///
/// Titles are stored in their raw display form (pre-resolution); grid cells
/// are row-major. All `grid_size * grid_size + 1` titles are pairwise
/// distinct by normalized key. `new` enforces this, so a constructed puzzle
/// can be trusted downstream.
///
/// The type serializes verbatim so the surrounding application can persist
/// or share it; the engine does not define that storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    grid_size: usize,
    grid: Vec<String>,
    start: String,
}

impl Puzzle {
    pub fn new(grid_size: usize, grid: Vec<String>, start: String) -> Result<Self, DomainError> {
        if grid_size < 2 {
            return Err(DomainError::validation(
                ValidationKind::InvalidGridSize,
                format!("Grid size must be at least 2, got {grid_size}"),
            ));
        }
        if grid.len() != grid_size * grid_size {
            return Err(DomainError::validation(
                ValidationKind::InvalidGridSize,
                format!(
                    "Grid must hold {} titles for size {grid_size}, got {}",
                    grid_size * grid_size,
                    grid.len()
                ),
            ));
        }

        let mut seen = std::collections::HashSet::with_capacity(grid.len() + 1);
        for title in grid.iter().chain(std::iter::once(&start)) {
            let key = normalize(title).key;
            if key.is_empty() {
                return Err(DomainError::validation(
                    ValidationKind::Other("EMPTY_TITLE".into()),
                    format!("Title {title:?} normalizes to empty"),
                ));
            }
            if !seen.insert(key) {
                return Err(DomainError::validation(
                    ValidationKind::DuplicateTitle,
                    format!("Title {title:?} duplicates another puzzle title"),
                ));
            }
        }

        Ok(Self {
            grid_size,
            grid,
            start,
        })
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Number of grid cells (`grid_size` squared).
    pub fn cell_count(&self) -> usize {
        self.grid.len()
    }

    /// Row-major grid titles.
    pub fn grid(&self) -> &[String] {
        &self.grid
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn cell(&self, index: usize) -> Option<&str> {
        self.grid.get(index).map(String::as_str)
    }

    /// Row-major index of a (row, col) position.
    pub fn index_of(&self, row: usize, col: usize) -> usize {
        row * self.grid_size + col
    }
}
