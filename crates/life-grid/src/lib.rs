//! Grid engine for the Life simulation.
//!
//! Everything in this crate is a pure function over immutable grid values:
//! a transformation always returns a new [`Grid`] and never mutates its
//! input. The simulation controller in `life-core` is the only owner of
//! mutable state; it hands grids to this crate and stores what comes back.
//!
//! # Modules
//!
//! - [`cell`] -- The binary [`Cell`] state (`Dead` / `Alive`).
//! - [`error`] -- Error types for grid construction and cell access.
//! - [`grid`] -- [`Dimensions`] and the copy-on-write [`Grid`] value.
//! - [`rules`] -- Toroidal neighbor counting and the B3/S23
//!   next-generation rule.

pub mod cell;
pub mod error;
pub mod grid;
pub mod rules;

// Re-export primary types at crate root.
pub use cell::Cell;
pub use error::GridError;
pub use grid::{Dimensions, Grid, NUM_COLS, NUM_ROWS};
pub use rules::{
    ALIVE_THRESHOLD, NEIGHBOR_OFFSETS, count_neighbors, empty_grid, next_generation, random_grid,
    wrap_index,
};
