//! Grid dimensions and the immutable grid value.
//!
//! A [`Grid`] is a value type. Cells live in a reference-counted flat
//! buffer in row-major order, so cloning a grid (for example to push it
//! onto an undo history) is O(1) and shares storage with the original.
//! Any single-cell edit goes through [`Grid::with_cell`], which copies the
//! buffer on write when it is shared. A snapshot taken earlier can
//! therefore never be changed by a later edit.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::Serialize;

use crate::cell::Cell;
use crate::error::GridError;

/// Default number of grid rows.
pub const NUM_ROWS: usize = 50;

/// Default number of grid columns.
pub const NUM_COLS: usize = 50;

/// Validated grid dimensions. Both axes are non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Dimensions {
    /// Number of rows (grid height).
    rows: usize,
    /// Number of columns (grid width).
    cols: usize,
}

impl Dimensions {
    /// Create dimensions of `rows x cols`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::EmptyDimensions`] if either axis is zero, or
    /// [`GridError::TooManyCells`] if `rows * cols` overflows `usize`.
    pub const fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::EmptyDimensions { rows, cols });
        }
        if rows.checked_mul(cols).is_none() {
            return Err(GridError::TooManyCells { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    /// Number of rows.
    pub const fn rows(self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub const fn cols(self) -> usize {
        self.cols
    }

    /// Total number of cells. Never overflows: [`Dimensions::new`] rejects
    /// shapes whose product does not fit in `usize`.
    pub const fn cell_count(self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    /// Whether `(row, col)` addresses a cell inside the grid.
    pub const fn contains(self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// Row-major buffer index of `(row, col)`, or `None` when out of range.
    pub const fn index_of(self, row: usize, col: usize) -> Option<usize> {
        if !self.contains(row, col) {
            return None;
        }
        // row < rows and col < cols, so this is below rows * cols.
        Some(row.saturating_mul(self.cols).saturating_add(col))
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            rows: NUM_ROWS,
            cols: NUM_COLS,
        }
    }
}

/// A fixed-size rectangular grid of cells.
///
/// Equality and hashing compare dimensions and cell contents, not storage
/// identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    /// Grid shape.
    dims: Dimensions,
    /// Row-major cell buffer of length `dims.cell_count()`.
    cells: Arc<Vec<Cell>>,
}

impl Grid {
    /// Create a grid with every cell dead.
    pub fn empty(dims: Dimensions) -> Self {
        Self {
            dims,
            cells: Arc::new(vec![Cell::Dead; dims.cell_count()]),
        }
    }

    /// Wrap an already-sized row-major buffer.
    ///
    /// Callers inside the crate guarantee `cells.len() == dims.cell_count()`.
    pub(crate) fn from_cells(dims: Dimensions, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), dims.cell_count());
        Self {
            dims,
            cells: Arc::new(cells),
        }
    }

    /// Build a grid from nested rows of `0` / `1` values.
    ///
    /// # Errors
    ///
    /// - [`GridError::EmptyDimensions`] if there are no rows or the first
    ///   row is empty.
    /// - [`GridError::RaggedRow`] if any row's length differs from the
    ///   first row's.
    /// - [`GridError::InvalidCellValue`] for any value other than 0 or 1.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, GridError> {
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let dims = Dimensions::new(rows.len(), width)?;

        let mut cells = Vec::with_capacity(dims.cell_count());
        for (row_idx, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(GridError::RaggedRow {
                    row: row_idx,
                    expected: width,
                    found: row.len(),
                });
            }
            for (col_idx, &value) in row.iter().enumerate() {
                let cell = Cell::try_from(value).map_err(|value| GridError::InvalidCellValue {
                    row: row_idx,
                    col: col_idx,
                    value,
                })?;
                cells.push(cell);
            }
        }

        Ok(Self::from_cells(dims, cells))
    }

    /// Grid shape.
    pub const fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Number of rows.
    pub const fn rows(&self) -> usize {
        self.dims.rows()
    }

    /// Number of columns.
    pub const fn cols(&self) -> usize {
        self.dims.cols()
    }

    /// The cell at `(row, col)`, or `None` when out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.dims
            .index_of(row, col)
            .and_then(|idx| self.cells.get(idx))
            .copied()
    }

    /// Whether the cell at `(row, col)` is alive. Out-of-range is dead.
    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_some_and(Cell::is_alive)
    }

    /// Return a new grid with `(row, col)` set to `cell`.
    ///
    /// The receiver is left untouched; storage is copied only if it is
    /// shared with another grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if the address lies outside the grid.
    pub fn with_cell(&self, row: usize, col: usize, cell: Cell) -> Result<Self, GridError> {
        let out_of_bounds = || GridError::OutOfBounds {
            row,
            col,
            rows: self.rows(),
            cols: self.cols(),
        };
        let idx = self.dims.index_of(row, col).ok_or_else(out_of_bounds)?;

        let mut next = self.clone();
        let slot = Arc::make_mut(&mut next.cells)
            .get_mut(idx)
            .ok_or_else(out_of_bounds)?;
        *slot = cell;
        Ok(next)
    }

    /// Return a new grid with the cell at `(row, col)` flipped.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if the address lies outside the grid.
    pub fn with_toggled(&self, row: usize, col: usize) -> Result<Self, GridError> {
        let current = self.get(row, col).unwrap_or_default();
        self.with_cell(row, col, current.toggled())
    }

    /// Number of live cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    /// The row-major cell buffer.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate over rows as slices.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(self.cols())
    }

    /// Copy the grid out as nested `0` / `1` rows.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.iter_rows()
            .map(|row| row.iter().map(|&c| u8::from(c)).collect())
            .collect()
    }

    /// A 64-bit hash of the grid's shape and contents.
    ///
    /// Equal grids always share a fingerprint, which makes it cheap to spot
    /// repeated states across generations.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// Whether both grids point at the same cell buffer.
    #[cfg(test)]
    fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cells, &other.cells)
    }
}
