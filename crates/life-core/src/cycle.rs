//! Detection of repeating grids.
//!
//! Keeps the fingerprints of the last few grids in a ring. When a new
//! fingerprint matches one of them, the simulation has entered a cycle
//! (or a still life, which is a cycle of period 1) and will never produce
//! anything new.

use std::collections::VecDeque;

/// Ring of recent grid fingerprints.
#[derive(Debug, Clone)]
pub struct CycleDetector {
    /// Most recent fingerprint at the back.
    recent: VecDeque<u64>,
    /// Maximum fingerprints remembered.
    window: usize,
}

impl CycleDetector {
    /// Remember up to `window` fingerprints. A window of 0 never reports.
    pub fn new(window: usize) -> Self {
        Self {
            recent: VecDeque::with_capacity(window),
            window,
        }
    }

    /// Record a fingerprint.
    ///
    /// Returns the period of the cycle if the fingerprint was seen within
    /// the window: 1 for a still life, 2 for a blinker, and so on.
    pub fn observe(&mut self, fingerprint: u64) -> Option<usize> {
        if self.window == 0 {
            return None;
        }
        let period = self
            .recent
            .iter()
            .rev()
            .position(|&seen| seen == fingerprint)
            .map(|distance| distance.saturating_add(1));

        if self.recent.len() >= self.window {
            self.recent.pop_front();
        }
        self.recent.push_back(fingerprint);
        period
    }

    /// Forget everything seen so far.
    pub fn clear(&mut self) {
        self.recent.clear();
    }

    /// Configured window size.
    pub const fn window(&self) -> usize {
        self.window
    }
}
