//! Grid construction, toroidal neighbor counting, and the B3/S23 rule.
//!
//! The grid is a torus: row `-1` is the last row and column `cols` is
//! column 0. Every lookup goes through [`wrap_index`], so no neighbor
//! access can fall outside the grid.
//!
//! [`next_generation`] reads only from its input grid and writes into a
//! fresh buffer, so every cell is updated simultaneously.

use rand::Rng;

use crate::cell::Cell;
use crate::grid::{Dimensions, Grid};

/// A random draw strictly above this value seeds a live cell, giving each
/// cell an independent 30% chance of starting alive.
pub const ALIVE_THRESHOLD: f64 = 0.7;

/// `(row, col)` offsets of the eight Moore-neighborhood cells.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Create a grid with every cell dead.
pub fn empty_grid(dims: Dimensions) -> Grid {
    Grid::empty(dims)
}

/// Create a grid where each cell is independently alive with
/// probability 0.3.
///
/// The random source is injected so callers can seed it for reproducible
/// runs.
pub fn random_grid<R: Rng + ?Sized>(dims: Dimensions, rng: &mut R) -> Grid {
    let cells = (0..dims.cell_count())
        .map(|_| Cell::from(rng.random::<f64>() > ALIVE_THRESHOLD))
        .collect();
    Grid::from_cells(dims, cells)
}

/// Shift `index` by `delta` on an axis of length `dim`, wrapping around
/// both ends.
///
/// This is a non-negative modulo: `wrap_index(0, -1, 5) == 4`. An `index`
/// that is already out of range is wrapped first. Returns 0 when `dim`
/// is 0.
pub fn wrap_index(index: usize, delta: isize, dim: usize) -> usize {
    let base = index.checked_rem(dim).unwrap_or(0);
    let step = delta.unsigned_abs().checked_rem(dim).unwrap_or(0);
    // base < dim and step < dim, so neither branch can overflow.
    let shifted = if delta < 0 {
        base.wrapping_add(dim.wrapping_sub(step))
    } else {
        base.wrapping_add(step)
    };
    shifted.checked_rem(dim).unwrap_or(0)
}

/// Count the live cells among the eight neighbors of `(row, col)`.
///
/// Both axes wrap around. The result is always in `0..=8`.
pub fn count_neighbors(grid: &Grid, row: usize, col: usize) -> u8 {
    let (rows, cols) = (grid.rows(), grid.cols());
    let mut count: u8 = 0;
    for &(dr, dc) in &NEIGHBOR_OFFSETS {
        if grid.is_alive(wrap_index(row, dr, rows), wrap_index(col, dc, cols)) {
            count = count.saturating_add(1);
        }
    }
    count
}

/// The next state of a single cell given its live-neighbor count.
pub const fn next_state(cell: Cell, neighbors: u8) -> Cell {
    match (cell, neighbors) {
        (Cell::Alive, 2 | 3) | (Cell::Dead, 3) => Cell::Alive, // survival, birth
        _ => Cell::Dead,                                        // death or stays dead
    }
}

/// Compute the next generation of `grid`.
///
/// Live cells with fewer than two or more than three live neighbors die;
/// dead cells with exactly three live neighbors are born; every other cell
/// keeps its state. The input grid is not modified.
pub fn next_generation(grid: &Grid) -> Grid {
    let dims = grid.dimensions();
    let mut cells = Vec::with_capacity(dims.cell_count());
    for (row, cells_in_row) in grid.iter_rows().enumerate() {
        for (col, &cell) in cells_in_row.iter().enumerate() {
            cells.push(next_state(cell, count_neighbors(grid, row, col)));
        }
    }
    Grid::from_cells(dims, cells)
}
