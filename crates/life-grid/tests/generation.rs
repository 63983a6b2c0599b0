//! Integration tests for the grid engine's public API.
//!
//! These exercise the rule on literal fixtures and on well-known patterns
//! that travel across the toroidal boundary.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use life_grid::{Cell, Dimensions, Grid, count_neighbors, empty_grid, next_generation};

fn fixture() -> Grid {
    Grid::from_rows(&[
        vec![1u8, 1, 0, 0, 1],
        vec![0, 1, 0, 0, 0],
        vec![1, 0, 0, 1, 1],
        vec![0, 1, 0, 1, 1],
        vec![0, 0, 0, 0, 1],
    ])
    .unwrap()
}

#[test]
fn fixture_next_generation() {
    let next = next_generation(&fixture()).to_rows();
    assert_eq!(next[1][1], 1);
    assert_eq!(next[3][1], 0);
    assert_eq!(next[3][3], 0);
    assert_eq!(next[1][3], 1);
}

#[test]
fn fixture_neighbor_counts_wrap() {
    let grid = fixture();
    // (0, 0) sees (4, 4), (0, 4), (0, 1), (1, 1) and (1, 4) is dead.
    assert_eq!(count_neighbors(&grid, 0, 0), 4);
    for row in 0..5 {
        for col in 0..5 {
            assert!(count_neighbors(&grid, row, col) <= 8);
        }
    }
}

#[test]
fn glider_crosses_the_edge_and_returns() {
    let dims = Dimensions::new(8, 8).unwrap();
    let mut grid = empty_grid(dims);
    for (r, c) in [(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)] {
        grid = grid.with_cell(r, c, Cell::Alive).unwrap();
    }
    let start = grid.clone();

    // A glider moves one cell diagonally every 4 generations; on an 8x8
    // torus it is back where it started after 32.
    let mut current = grid;
    for generation in 1..=32 {
        current = next_generation(&current);
        assert_eq!(current.population(), 5, "generation {generation}");
    }
    assert_eq!(current, start);
}

#[test]
fn empty_stays_empty() {
    let grid = empty_grid(Dimensions::default());
    assert_eq!(next_generation(&grid), grid);
}
