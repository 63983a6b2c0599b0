//! Async façade over [`Simulation`] that owns the autoplay timer.
//!
//! # Architecture
//!
//! The simulation lives behind an `Arc<tokio::sync::Mutex<_>>` shared by
//! the controller and at most one autoplay task. The task holds only a
//! [`Weak`] reference, so it never keeps the simulation alive on its own.
//!
//! Every arming of the timer gets a new epoch. On each fire the task
//! re-locks the simulation and steps only if its epoch is still current
//! and the simulation is still running. [`SimulationController::pause`]
//! and [`SimulationController::reset`] bump the epoch and abort the task
//! while holding the lock, so no tick can step after they return.
//!
//! Every forward step, manual or automatic, is broadcast as a
//! [`GenerationSummary`] to subscribers.

use std::sync::{Arc, Weak};
use std::time::Duration;

use life_grid::Grid;
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

use crate::pattern::DisplayPattern;
use crate::simulation::{GenerationSummary, RunState, Simulation, SimulationStatus};

/// Capacity of the generation summary broadcast channel.
const SUMMARY_CHANNEL_CAPACITY: usize = 256;

/// State guarded by the controller's mutex.
#[derive(Debug)]
struct Shared {
    /// The state machine.
    simulation: Simulation,
    /// Incremented every time the timer is armed or disarmed.
    epoch: u64,
    /// The armed autoplay task, if any.
    timer: Option<JoinHandle<()>>,
}

impl Shared {
    /// Invalidate and abort the armed timer.
    fn disarm(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        self.disarm();
    }
}

/// Handle driving a [`Simulation`] in real time.
#[derive(Debug)]
pub struct SimulationController {
    /// Simulation and timer state, shared weakly with the autoplay task.
    shared: Arc<Mutex<Shared>>,
    /// Publisher for every forward step.
    summaries: broadcast::Sender<GenerationSummary>,
}

impl SimulationController {
    /// Wrap a simulation. The controller starts idle; the timer is armed
    /// by [`play`](Self::play).
    pub fn new(mut simulation: Simulation) -> Self {
        simulation.pause();
        let (summaries, _) = broadcast::channel(SUMMARY_CHANNEL_CAPACITY);
        Self {
            shared: Arc::new(Mutex::new(Shared {
                simulation,
                epoch: 0,
                timer: None,
            })),
            summaries,
        }
    }

    /// Receive a [`GenerationSummary`] for every forward step from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<GenerationSummary> {
        self.summaries.subscribe()
    }

    // -----------------------------------------------------------------------
    // Play / Pause
    // -----------------------------------------------------------------------

    /// Start autoplay. Returns `false` if already running.
    ///
    /// Any previously armed timer is cancelled before the new one is
    /// spawned, so at most one timer exists at a time.
    pub async fn play(&self) -> bool {
        let mut shared = self.shared.lock().await;
        if !shared.simulation.play() {
            return false;
        }
        self.arm(&mut shared);
        info!(
            generation = shared.simulation.generation(),
            speed_ms = shared.simulation.speed_ms(),
            "autoplay started"
        );
        true
    }

    /// Stop autoplay. Returns `false` if already idle.
    ///
    /// Once this returns, no further automatic step will happen.
    pub async fn pause(&self) -> bool {
        let mut shared = self.shared.lock().await;
        shared.disarm();
        let paused = shared.simulation.pause();
        if paused {
            info!(generation = shared.simulation.generation(), "autoplay paused");
        }
        paused
    }

    /// Play when idle, pause when running. Returns the new state.
    pub async fn toggle_running(&self) -> RunState {
        let mut shared = self.shared.lock().await;
        let state = shared.simulation.toggle_running();
        match state {
            RunState::Running => self.arm(&mut shared),
            RunState::Idle => shared.disarm(),
        }
        debug!(?state, "run state toggled");
        state
    }

    /// Cancel any armed timer and spawn a new one for a fresh epoch.
    fn arm(&self, shared: &mut Shared) {
        shared.disarm();
        let epoch = shared.epoch;
        let task = autoplay(Arc::downgrade(&self.shared), epoch, self.summaries.clone());
        shared.timer = Some(tokio::spawn(task));
    }

    // -----------------------------------------------------------------------
    // Forwarded operations
    // -----------------------------------------------------------------------

    /// Advance one generation and broadcast the summary.
    pub async fn step(&self) -> GenerationSummary {
        let mut shared = self.shared.lock().await;
        let summary = shared.simulation.step();
        publish(&self.summaries, summary);
        summary
    }

    /// Return to the previous grid. See [`Simulation::step_back`].
    pub async fn step_back(&self) -> bool {
        self.shared.lock().await.simulation.step_back()
    }

    /// Flip one cell. See [`Simulation::toggle_cell`].
    pub async fn toggle_cell(&self, row: usize, col: usize) -> bool {
        self.shared.lock().await.simulation.toggle_cell(row, col)
    }

    /// Empty the grid and zero the generation. Autoplay keeps running if
    /// it was running.
    pub async fn clear(&self) {
        self.shared.lock().await.simulation.clear();
    }

    /// Stop autoplay and return to the initial state.
    pub async fn reset(&self) {
        let mut shared = self.shared.lock().await;
        shared.disarm();
        shared.simulation.reset();
        info!("simulation reset");
    }

    /// Replace the grid with a random one. See [`Simulation::seed_random`].
    pub async fn seed_random(&self) -> bool {
        self.shared.lock().await.simulation.seed_random()
    }

    /// Change the autoplay speed. The armed timer picks it up when it next
    /// schedules a tick. Returns the previous speed, or `None` for 0.
    pub async fn set_speed(&self, speed_ms: u64) -> Option<u64> {
        let previous = self.shared.lock().await.simulation.set_speed(speed_ms);
        if let Some(previous) = previous {
            info!(previous, speed_ms, "autoplay speed changed");
        }
        previous
    }

    /// Select how renderers draw live cells.
    pub async fn set_display_pattern(&self, pattern: DisplayPattern) {
        self.shared
            .lock()
            .await
            .simulation
            .set_display_pattern(pattern);
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Snapshot of the simulation state.
    pub async fn status(&self) -> SimulationStatus {
        self.shared.lock().await.simulation.status()
    }

    /// The current grid. Cheap: storage is shared with the simulation.
    pub async fn grid(&self) -> Grid {
        self.shared.lock().await.simulation.grid().clone()
    }

    /// Current generation.
    pub async fn generation(&self) -> u64 {
        self.shared.lock().await.simulation.generation()
    }

    /// Whether autoplay is armed.
    pub async fn is_running(&self) -> bool {
        self.shared.lock().await.simulation.is_running()
    }

    /// Live cells in the current grid.
    pub async fn population(&self) -> usize {
        self.shared.lock().await.simulation.population()
    }
}

/// The autoplay loop for one epoch.
///
/// Exits as soon as the epoch is stale, the simulation is no longer
/// running, or the controller is gone.
async fn autoplay(
    shared: Weak<Mutex<Shared>>,
    epoch: u64,
    summaries: broadcast::Sender<GenerationSummary>,
) {
    loop {
        // Speed is re-read at every scheduling point.
        let speed_ms = {
            let Some(strong) = shared.upgrade() else {
                return;
            };
            let guard = strong.lock().await;
            if guard.epoch != epoch || !guard.simulation.is_running() {
                return;
            }
            guard.simulation.speed_ms()
        };

        tokio::time::sleep(Duration::from_millis(speed_ms)).await;

        let Some(strong) = shared.upgrade() else {
            return;
        };
        let mut guard = strong.lock().await;
        if guard.epoch != epoch || !guard.simulation.is_running() {
            return;
        }
        publish(&summaries, guard.simulation.step());
    }
}

/// Broadcast a summary, returning how many subscribers received it.
fn publish(summaries: &broadcast::Sender<GenerationSummary>, summary: GenerationSummary) -> usize {
    let receivers = summaries.send(summary).unwrap_or(0);
    trace!(generation = summary.generation, receivers, "summary published");
    receivers
}
