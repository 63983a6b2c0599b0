//! The simulation state machine.
//!
//! [`Simulation`] owns every piece of mutable state: the current grid, the
//! generation counter, the running flag, the autoplay speed, the undo
//! history, the display pattern, and the random source used for seeding.
//! It is synchronous and knows nothing about timers; the
//! [`SimulationController`](crate::controller::SimulationController) wraps
//! it and drives [`Simulation::step`] on a schedule.
//!
//! # States
//!
//! ```text
//!        play()             pause()
//!   Idle -------> Running -------> Idle
//!    ^                                |
//!    +------------ reset() -----------+
//! ```
//!
//! Every operation is total. Calls that make no sense in the current state
//! (undo with an empty history, editing a cell after the simulation has
//! advanced, seeding after generation 0) are ignored and report `false`.

use life_grid::{Dimensions, Grid, empty_grid, next_generation, random_grid};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::{ConfigError, LifeConfig};
use crate::history::{DEFAULT_HISTORY_CAPACITY, History};
use crate::pattern::DisplayPattern;

/// Default milliseconds between autoplay ticks.
pub const DEFAULT_SPEED_MS: u64 = 500;

/// Speeds offered by the speed selector, fastest first.
pub const SPEED_PRESETS_MS: [u64; 5] = [100, 200, 500, 1000, 2000];

/// Whether autoplay is armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// Not advancing on its own.
    Idle,
    /// Advancing once every `speed_ms`.
    Running,
}

/// Emitted after every forward step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSummary {
    /// Generation reached by the step.
    pub generation: u64,
    /// Live cells in the new grid.
    pub population: usize,
    /// [`Grid::fingerprint`] of the new grid.
    pub fingerprint: u64,
}

/// Serializable read model of the whole simulation, for renderers and logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStatus {
    /// Current generation.
    pub generation: u64,
    /// Idle or running.
    pub state: RunState,
    /// Milliseconds between autoplay ticks.
    pub speed_ms: u64,
    /// Live cells in the current grid.
    pub population: usize,
    /// Snapshots available to step back through.
    pub history_depth: usize,
    /// Snapshots dropped from a full history since the last reset.
    pub history_evicted: u64,
    /// Grid height.
    pub rows: usize,
    /// Grid width.
    pub cols: usize,
    /// Selected display pattern.
    pub display_pattern: DisplayPattern,
}

/// The Game of Life state machine.
#[derive(Debug, Clone)]
pub struct Simulation {
    /// The grid being displayed and advanced.
    grid: Grid,
    /// Forward steps taken since the last clear or reset.
    generation: u64,
    /// Whether autoplay is armed.
    running: bool,
    /// Milliseconds between autoplay ticks. Never 0.
    speed_ms: u64,
    /// Grids left behind by forward steps.
    history: History,
    /// Selected display pattern.
    display_pattern: DisplayPattern,
    /// Random source for [`Simulation::seed_random`].
    rng: StdRng,
}

impl Simulation {
    /// Create an idle simulation on an all-dead grid.
    ///
    /// Uses the default speed and history capacity, and seeds its random
    /// source from the operating system.
    pub fn new(dims: Dimensions) -> Self {
        Self {
            grid: empty_grid(dims),
            generation: 0,
            running: false,
            speed_ms: DEFAULT_SPEED_MS,
            history: History::new(DEFAULT_HISTORY_CAPACITY),
            display_pattern: DisplayPattern::default(),
            rng: StdRng::from_os_rng(),
        }
    }

    /// Build a simulation from validated configuration.
    ///
    /// The grid starts empty regardless of `simulation.start`; seeding is
    /// left to the caller so it can be logged and observed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration fails validation.
    pub fn from_config(config: &LifeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let settings = &config.simulation;
        let mut simulation = Self::new(config.grid.dimensions()?)
            .with_speed_ms(settings.speed_ms)
            .with_history_capacity(settings.history_capacity);
        if let Some(seed) = settings.seed {
            simulation = simulation.with_seed(seed);
        }
        simulation.display_pattern = settings.display_pattern;
        Ok(simulation)
    }

    /// Use a fixed seed for random grids.
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(StdRng::seed_from_u64(seed))
    }

    /// Use the given random source for random grids.
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Set the autoplay speed. A speed of 0 is ignored.
    #[must_use]
    pub fn with_speed_ms(mut self, speed_ms: u64) -> Self {
        let _ = self.set_speed(speed_ms);
        self
    }

    /// Replace the history with an empty one of the given capacity
    /// (0 = unbounded).
    #[must_use]
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history = History::new(capacity);
        self
    }

    // -----------------------------------------------------------------------
    // Stepping
    // -----------------------------------------------------------------------

    /// Advance one generation.
    ///
    /// Pushes the current grid onto the history, replaces it with the next
    /// generation, and increments the generation counter. Works whether or
    /// not autoplay is running.
    pub fn step(&mut self) -> GenerationSummary {
        let next = next_generation(&self.grid);
        let previous = std::mem::replace(&mut self.grid, next);
        if self.history.push(previous).is_some() {
            trace!(
                capacity = self.history.capacity(),
                "history full, evicted oldest snapshot"
            );
        }
        self.generation = self.generation.saturating_add(1);

        let summary = GenerationSummary {
            generation: self.generation,
            population: self.grid.population(),
            fingerprint: self.grid.fingerprint(),
        };
        trace!(
            generation = summary.generation,
            population = summary.population,
            "stepped forward"
        );
        summary
    }

    /// Return to the previous grid.
    ///
    /// Returns `false` and changes nothing when the history is empty.
    pub fn step_back(&mut self) -> bool {
        let Some(previous) = self.history.pop() else {
            debug!(generation = self.generation, "step back ignored: history empty");
            return false;
        };
        self.grid = previous;
        self.generation = self.generation.saturating_sub(1);
        trace!(generation = self.generation, "stepped back");
        true
    }

    // -----------------------------------------------------------------------
    // Play / Pause
    // -----------------------------------------------------------------------

    /// Move from Idle to Running. Returns `false` if already running.
    pub const fn play(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        true
    }

    /// Move from Running to Idle. Returns `false` if already idle.
    pub const fn pause(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        true
    }

    /// Play when idle, pause when running. Returns the new state.
    pub const fn toggle_running(&mut self) -> RunState {
        if self.running {
            self.pause();
        } else {
            self.play();
        }
        self.run_state()
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Whether cells can be edited and the grid reseeded: idle and not
    /// yet advanced.
    pub const fn is_editable(&self) -> bool {
        !self.running && self.generation == 0
    }

    /// Flip one cell.
    ///
    /// Only allowed while [`is_editable`](Self::is_editable); otherwise, or
    /// when the address is outside the grid, nothing changes and `false` is
    /// returned. The history is never touched.
    pub fn toggle_cell(&mut self, row: usize, col: usize) -> bool {
        if !self.is_editable() {
            debug!(
                row,
                col,
                generation = self.generation,
                running = self.running,
                "toggle ignored: simulation has started"
            );
            return false;
        }
        match self.grid.with_toggled(row, col) {
            Ok(grid) => {
                self.grid = grid;
                true
            }
            Err(e) => {
                debug!(error = %e, "toggle ignored");
                false
            }
        }
    }

    /// Replace the grid with a random one (30% alive).
    ///
    /// Ignored unless the generation is 0. Returns whether the grid changed.
    pub fn seed_random(&mut self) -> bool {
        if self.generation != 0 {
            debug!(
                generation = self.generation,
                "random seed ignored: simulation has advanced"
            );
            return false;
        }
        self.grid = random_grid(self.grid.dimensions(), &mut self.rng);
        debug!(population = self.grid.population(), "grid seeded randomly");
        true
    }

    /// Empty the grid and zero the generation counter.
    ///
    /// The running flag and the history are left as they are; use
    /// [`reset`](Self::reset) for a full return to the initial state.
    pub fn clear(&mut self) {
        self.grid = empty_grid(self.grid.dimensions());
        self.generation = 0;
    }

    /// Return to the initial state: empty grid, generation 0, idle, and
    /// an empty history. Speed and display pattern are kept.
    pub fn reset(&mut self) {
        self.grid = empty_grid(self.grid.dimensions());
        self.generation = 0;
        self.running = false;
        self.history.clear();
    }

    // -----------------------------------------------------------------------
    // Settings
    // -----------------------------------------------------------------------

    /// Change the autoplay speed, effective from the next scheduled tick.
    ///
    /// Returns the previous speed, or `None` if `speed_ms` was 0 (rejected).
    pub const fn set_speed(&mut self, speed_ms: u64) -> Option<u64> {
        if speed_ms == 0 {
            return None;
        }
        Some(std::mem::replace(&mut self.speed_ms, speed_ms))
    }

    /// Select how renderers draw live cells.
    pub const fn set_display_pattern(&mut self, pattern: DisplayPattern) {
        self.display_pattern = pattern;
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The current grid.
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Grid shape.
    pub const fn dimensions(&self) -> Dimensions {
        self.grid.dimensions()
    }

    /// Current generation.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether autoplay is armed.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Idle or running.
    pub const fn run_state(&self) -> RunState {
        if self.running {
            RunState::Running
        } else {
            RunState::Idle
        }
    }

    /// Milliseconds between autoplay ticks.
    pub const fn speed_ms(&self) -> u64 {
        self.speed_ms
    }

    /// Snapshots available to step back through.
    pub fn history_depth(&self) -> usize {
        self.history.len()
    }

    /// The undo history.
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Selected display pattern.
    pub const fn display_pattern(&self) -> DisplayPattern {
        self.display_pattern
    }

    /// Live cells in the current grid, counted on demand.
    pub fn population(&self) -> usize {
        self.grid.population()
    }

    /// Snapshot of every read accessor.
    pub fn status(&self) -> SimulationStatus {
        SimulationStatus {
            generation: self.generation,
            state: self.run_state(),
            speed_ms: self.speed_ms,
            population: self.population(),
            history_depth: self.history_depth(),
            history_evicted: self.history.evicted(),
            rows: self.grid.rows(),
            cols: self.grid.cols(),
            display_pattern: self.display_pattern,
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(Dimensions::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn small() -> Simulation {
        Simulation::new(Dimensions::new(8, 8).unwrap()).with_seed(42)
    }

    /// A blinker, so every step changes the grid.
    fn with_blinker() -> Simulation {
        let mut sim = small();
        for col in 2..5 {
            assert!(sim.toggle_cell(3, col));
        }
        sim
    }

    #[test]
    fn starts_idle_and_empty() {
        let sim = Simulation::default();
        assert_eq!(sim.generation(), 0);
        assert!(!sim.is_running());
        assert_eq!(sim.population(), 0);
        assert_eq!(sim.history_depth(), 0);
        assert_eq!(sim.speed_ms(), DEFAULT_SPEED_MS);
        assert_eq!(sim.dimensions(), Dimensions::default());
    }

    #[test]
    fn step_pushes_history_and_advances() {
        let mut sim = with_blinker();
        let before = sim.grid().clone();
        let summary = sim.step();
        assert_eq!(summary.generation, 1);
        assert_eq!(summary.population, 3);
        assert_eq!(summary.fingerprint, sim.grid().fingerprint());
        assert_eq!(sim.history_depth(), 1);
        assert_eq!(sim.history().latest(), Some(&before));
        assert_ne!(sim.grid(), &before);
    }

    #[test]
    fn history_law() {
        let mut sim = with_blinker();
        sim.seed_random();
        let original = sim.grid().clone();

        for n in 1..=7u64 {
            sim.step();
            assert_eq!(sim.generation(), n);
            assert_eq!(sim.history_depth(), usize::try_from(n).unwrap());
        }
        for _ in 0..7 {
            assert!(sim.step_back());
        }
        assert_eq!(sim.grid(), &original);
        assert_eq!(sim.generation(), 0);

        // One more is a no-op.
        assert!(!sim.step_back());
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.grid(), &original);
    }

    #[test]
    fn step_back_on_empty_history_is_noop() {
        let mut sim = with_blinker();
        let before = sim.grid().clone();
        assert!(!sim.step_back());
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.grid(), &before);
    }

    #[test]
    fn bounded_history_limits_undo() {
        let mut sim = with_blinker().with_history_capacity(2);
        for _ in 0..5 {
            sim.step();
        }
        assert_eq!(sim.history_depth(), 2);
        assert!(sim.step_back());
        assert!(sim.step_back());
        assert!(!sim.step_back());
        // Undo stopped at the eviction point.
        assert_eq!(sim.generation(), 3);
        assert_eq!(sim.status().history_evicted, 3);

        sim.reset();
        assert_eq!(sim.status().history_evicted, 0);
    }

    #[test]
    fn play_and_pause_are_idempotent() {
        let mut sim = small();
        assert!(sim.play());
        assert!(!sim.play());
        assert_eq!(sim.run_state(), RunState::Running);
        assert!(sim.pause());
        assert!(!sim.pause());
        assert_eq!(sim.run_state(), RunState::Idle);
    }

    #[test]
    fn toggle_running_flips() {
        let mut sim = small();
        assert_eq!(sim.toggle_running(), RunState::Running);
        assert_eq!(sim.toggle_running(), RunState::Idle);
    }

    #[test]
    fn population_counts_toggled_cells() {
        let mut sim = small();
        for (r, c) in [(0, 0), (1, 1), (2, 2), (7, 7), (0, 7)] {
            assert!(sim.toggle_cell(r, c));
        }
        assert_eq!(sim.population(), 5);
        assert_eq!(sim.history_depth(), 0);
    }

    #[test]
    fn toggle_twice_restores_cell() {
        let mut sim = small();
        assert!(sim.toggle_cell(4, 4));
        assert!(sim.toggle_cell(4, 4));
        assert_eq!(sim.population(), 0);
    }

    #[test]
    fn toggle_ignored_while_running() {
        let mut sim = small();
        sim.play();
        assert!(!sim.toggle_cell(1, 1));
        assert_eq!(sim.population(), 0);
    }

    #[test]
    fn toggle_ignored_after_first_generation() {
        let mut sim = with_blinker();
        sim.step();
        let before = sim.grid().clone();
        assert!(!sim.toggle_cell(0, 0));
        assert_eq!(sim.grid(), &before);
        assert_eq!(sim.history_depth(), 1);
    }

    #[test]
    fn toggle_out_of_range_is_ignored() {
        let mut sim = small();
        assert!(!sim.toggle_cell(8, 0));
        assert!(!sim.toggle_cell(0, 100));
        assert_eq!(sim.population(), 0);
    }

    #[test]
    fn seed_random_only_at_generation_zero() {
        let mut sim = small();
        assert!(sim.seed_random());
        sim.step();
        let before = sim.grid().clone();
        assert!(!sim.seed_random());
        assert_eq!(sim.grid(), &before);
    }

    #[test]
    fn seeded_simulations_agree() {
        let mut a = small();
        let mut b = small();
        a.seed_random();
        b.seed_random();
        assert_eq!(a.grid(), b.grid());
    }

    #[test]
    fn clear_keeps_history_and_running() {
        let mut sim = with_blinker();
        sim.step();
        sim.step();
        sim.play();
        sim.clear();
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.population(), 0);
        assert!(sim.is_running());
        assert_eq!(sim.history_depth(), 2);
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let mut sim = with_blinker();
        sim.step();
        sim.play();
        sim.set_speed(100);
        sim.reset();
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.population(), 0);
        assert!(!sim.is_running());
        assert_eq!(sim.history_depth(), 0);
        assert_eq!(sim.speed_ms(), 100);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut sim = with_blinker();
        sim.step();
        sim.play();
        sim.reset();
        let once = sim.status();
        let grid_once = sim.grid().clone();
        sim.reset();
        assert_eq!(sim.status(), once);
        assert_eq!(sim.grid(), &grid_once);
    }

    #[test]
    fn zero_speed_rejected() {
        let mut sim = small();
        assert_eq!(sim.set_speed(0), None);
        assert_eq!(sim.speed_ms(), DEFAULT_SPEED_MS);
        assert_eq!(sim.set_speed(200), Some(DEFAULT_SPEED_MS));
        assert_eq!(sim.speed_ms(), 200);
    }

    #[test]
    fn status_reflects_state() {
        let mut sim = with_blinker();
        sim.set_display_pattern(DisplayPattern::Spaceship);
        sim.step();
        let status = sim.status();
        assert_eq!(status.generation, 1);
        assert_eq!(status.state, RunState::Idle);
        assert_eq!(status.population, 3);
        assert_eq!(status.history_depth, 1);
        assert_eq!((status.rows, status.cols), (8, 8));
        assert_eq!(status.display_pattern, DisplayPattern::Spaceship);

        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["state"], "idle");
        assert_eq!(json["display_pattern"], "spaceship");
    }

    #[test]
    fn from_config_applies_settings() {
        let config = LifeConfig::parse(
            "grid:\n  rows: 10\n  cols: 12\nsimulation:\n  speed_ms: 200\n  history_capacity: 3\n  seed: 5\n  display_pattern: spaceship\n",
        )
        .unwrap();
        let sim = Simulation::from_config(&config).unwrap();
        assert_eq!(sim.dimensions(), Dimensions::new(10, 12).unwrap());
        assert_eq!(sim.speed_ms(), 200);
        assert_eq!(sim.history().capacity(), 3);
        assert_eq!(sim.display_pattern(), DisplayPattern::Spaceship);
        assert_eq!(sim.population(), 0);
    }
}
