//! Bounded undo history of previous grids.
//!
//! Forward steps push the grid they are leaving; backward steps pop it.
//! Because grids share storage, each entry costs one reference count
//! until the grid is actually edited.
//!
//! The history is a ring: once `capacity` snapshots are held, pushing a
//! new one evicts the oldest. Undo past the eviction point is impossible,
//! and [`History::len`] stops tracking the generation counter from then
//! on. A capacity of 0 disables eviction.

use std::collections::VecDeque;

use life_grid::Grid;

/// Default number of snapshots retained.
pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// Ordered stack of previously visited grids, oldest first.
#[derive(Debug, Clone)]
pub struct History {
    /// Retained snapshots; the back is the most recent.
    snapshots: VecDeque<Grid>,
    /// Maximum retained snapshots (0 = unbounded).
    capacity: usize,
    /// Number of snapshots evicted since the last clear.
    evicted: u64,
}

impl History {
    /// Create a history that keeps at most `capacity` snapshots.
    ///
    /// A capacity of 0 keeps every snapshot.
    pub const fn new(capacity: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            capacity,
            evicted: 0,
        }
    }

    /// Create a history that never evicts.
    pub const fn unbounded() -> Self {
        Self::new(0)
    }

    /// Push a snapshot, returning the evicted oldest snapshot if the
    /// history was full.
    pub fn push(&mut self, grid: Grid) -> Option<Grid> {
        self.snapshots.push_back(grid);
        if self.capacity > 0 && self.snapshots.len() > self.capacity {
            self.evicted = self.evicted.saturating_add(1);
            return self.snapshots.pop_front();
        }
        None
    }

    /// Remove and return the most recent snapshot.
    pub fn pop(&mut self) -> Option<Grid> {
        self.snapshots.pop_back()
    }

    /// The most recent snapshot, if any.
    pub fn latest(&self) -> Option<&Grid> {
        self.snapshots.back()
    }

    /// Drop every snapshot and reset the eviction counter.
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.evicted = 0;
    }

    /// Number of retained snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether there is nothing to undo.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Configured capacity (0 = unbounded).
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshots evicted since the last clear.
    pub const fn evicted(&self) -> u64 {
        self.evicted
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use life_grid::{Cell, Dimensions, Grid};

    use super::*;

    fn marked(col: usize) -> Grid {
        Grid::empty(Dimensions::new(1, 8).unwrap())
            .with_cell(0, col, Cell::Alive)
            .unwrap()
    }

    #[test]
    fn push_then_pop_is_lifo() {
        let mut history = History::unbounded();
        history.push(marked(0));
        history.push(marked(1));
        assert_eq!(history.len(), 2);
        assert_eq!(history.pop(), Some(marked(1)));
        assert_eq!(history.pop(), Some(marked(0)));
        assert_eq!(history.pop(), None);
        assert!(history.is_empty());
    }

    #[test]
    fn full_history_evicts_oldest() {
        let mut history = History::new(3);
        for col in 0..3 {
            assert!(history.push(marked(col)).is_none());
        }
        assert_eq!(history.push(marked(3)), Some(marked(0)));
        assert_eq!(history.len(), 3);
        assert_eq!(history.evicted(), 1);
        assert_eq!(history.latest(), Some(&marked(3)));

        // Only the three newest remain.
        assert_eq!(history.pop(), Some(marked(3)));
        assert_eq!(history.pop(), Some(marked(2)));
        assert_eq!(history.pop(), Some(marked(1)));
        assert_eq!(history.pop(), None);
    }

    #[test]
    fn unbounded_never_evicts() {
        let mut history = History::unbounded();
        for col in 0..8 {
            assert!(history.push(marked(col)).is_none());
        }
        assert_eq!(history.len(), 8);
        assert_eq!(history.evicted(), 0);
    }

    #[test]
    fn clear_resets_everything() {
        let mut history = History::new(1);
        history.push(marked(0));
        history.push(marked(1));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.evicted(), 0);
        assert_eq!(history.capacity(), 1);
    }
}
