//! Error types for the `life-grid` crate.
//!
//! Simulation operations on well-formed grids are total and never fail.
//! [`GridError`] covers the precondition violations: building a grid from
//! malformed input, or addressing a cell outside the grid.

/// Errors that can occur while constructing or addressing a grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// A grid must have at least one row and one column.
    #[error("grid dimensions must be non-zero (got {rows}x{cols})")]
    EmptyDimensions {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
    },

    /// `rows * cols` does not fit in `usize`.
    #[error("grid of {rows}x{cols} cells is too large to address")]
    TooManyCells {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
    },

    /// A row's length differs from the first row's length.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },

    /// A raw cell value was neither 0 nor 1.
    #[error("invalid cell value {value} at ({row}, {col})")]
    InvalidCellValue {
        /// Row of the offending cell.
        row: usize,
        /// Column of the offending cell.
        col: usize,
        /// The rejected value.
        value: u8,
    },

    /// A cell address lies outside the grid.
    #[error("cell ({row}, {col}) is outside a {rows}x{cols} grid")]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Grid height.
        rows: usize,
        /// Grid width.
        cols: usize,
    },
}
