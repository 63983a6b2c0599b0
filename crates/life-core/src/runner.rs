//! Headless simulation runner with end conditions.
//!
//! [`run_simulation`] starts autoplay on a [`SimulationController`] and
//! watches the summary stream until one of these happens:
//!
//! - **Generation limit**: `max_generations` reached
//! - **Time limit**: `max_real_time_seconds` of wall-clock time elapsed
//! - **Extinction**: no live cells remain
//! - **Stagnation**: the grid repeats one of the recent grids
//! - **Operator stop**: the shutdown future resolves (e.g. Ctrl-C)
//!
//! Autoplay is paused before the runner returns. If the runner falls
//! behind and summaries are dropped, cycle detection starts over so no
//! period is measured across the gap.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::config::RunBoundsConfig;
use crate::controller::SimulationController;
use crate::cycle::CycleDetector;
use crate::simulation::{GenerationSummary, SimulationStatus};

/// Errors that can occur during a headless run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The generation summary stream closed while the run was active.
    #[error("generation summary channel closed unexpectedly")]
    ChannelClosed,
}

/// Reason why the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SimulationEndReason {
    /// Reached the configured `max_generations` limit.
    MaxGenerationsReached,
    /// Reached the configured `max_real_time_seconds` limit.
    MaxRealTimeReached,
    /// No live cells remain.
    Extinction,
    /// The grid repeats with the given period (1 = still life).
    Stagnation {
        /// Generations between repeats.
        period: usize,
    },
    /// The shutdown signal fired.
    OperatorStop,
}

/// Result of a headless run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
    /// The reason the run ended.
    pub end_reason: SimulationEndReason,
    /// State after autoplay was paused.
    pub final_status: SimulationStatus,
    /// Number of generation summaries the runner processed.
    pub generations_observed: u64,
    /// Wall-clock time the run started.
    pub started_at: DateTime<Utc>,
    /// Elapsed run time in milliseconds.
    pub elapsed_ms: u64,
}

/// Run autoplay until an end condition is met.
///
/// The starting grid is checked before autoplay begins, so an empty grid
/// ends with [`SimulationEndReason::Extinction`] without stepping.
///
/// # Errors
///
/// Returns [`RunnerError::ChannelClosed`] if the summary stream closes
/// before an end condition is met.
pub async fn run_simulation<F>(
    controller: &SimulationController,
    bounds: &RunBoundsConfig,
    shutdown: F,
) -> Result<SimulationResult, RunnerError>
where
    F: Future<Output = ()>,
{
    let started_at = Utc::now();
    let start = Instant::now();
    let mut summaries = controller.subscribe();
    let mut watch = EndConditions::new(bounds);

    let initial = GenerationSummary {
        generation: controller.generation().await,
        population: controller.population().await,
        fingerprint: controller.grid().await.fingerprint(),
    };

    info!(
        generation = initial.generation,
        population = initial.population,
        max_generations = bounds.max_generations,
        max_real_time_seconds = bounds.max_real_time_seconds,
        "Headless run starting"
    );

    let mut generations_observed: u64 = 0;
    let end_reason = if let Some(reason) = watch.check(&initial) {
        reason
    } else {
        controller.play().await;

        let time_limited = bounds.max_real_time_seconds > 0;
        let deadline = tokio::time::sleep(Duration::from_secs(bounds.max_real_time_seconds));
        tokio::pin!(deadline);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("Shutdown signal received, stopping run");
                    break SimulationEndReason::OperatorStop;
                }
                () = &mut deadline, if time_limited => {
                    break SimulationEndReason::MaxRealTimeReached;
                }
                received = summaries.recv() => match received {
                    Ok(summary) => {
                        generations_observed = generations_observed.saturating_add(1);
                        if let Some(reason) = watch.check(&summary) {
                            break reason;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Runner fell behind, generation summaries dropped");
                        watch.forget_recent();
                    }
                    Err(RecvError::Closed) => {
                        controller.pause().await;
                        return Err(RunnerError::ChannelClosed);
                    }
                },
            }
        }
    };

    controller.pause().await;

    Ok(SimulationResult {
        end_reason,
        final_status: controller.status().await,
        generations_observed,
        started_at,
        elapsed_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
    })
}

/// Per-summary end conditions.
struct EndConditions {
    /// Generation limit (0 = unlimited).
    max_generations: u64,
    /// End when a summary reports no live cells.
    stop_on_extinction: bool,
    /// Recent fingerprints, when stagnation ends the run.
    cycles: Option<CycleDetector>,
}

impl EndConditions {
    fn new(bounds: &RunBoundsConfig) -> Self {
        Self {
            max_generations: bounds.max_generations,
            stop_on_extinction: bounds.stop_on_extinction,
            cycles: bounds
                .stop_on_cycle
                .then(|| CycleDetector::new(bounds.cycle_window)),
        }
    }

    /// Checked in order: extinction, stagnation, generation limit.
    fn check(&mut self, summary: &GenerationSummary) -> Option<SimulationEndReason> {
        if self.stop_on_extinction && summary.population == 0 {
            return Some(SimulationEndReason::Extinction);
        }
        if let Some(period) = self
            .cycles
            .as_mut()
            .and_then(|cycles| cycles.observe(summary.fingerprint))
        {
            return Some(SimulationEndReason::Stagnation { period });
        }
        if self.max_generations > 0 && summary.generation >= self.max_generations {
            return Some(SimulationEndReason::MaxGenerationsReached);
        }
        None
    }

    /// Drop remembered fingerprints after summaries were skipped.
    fn forget_recent(&mut self) {
        if let Some(cycles) = self.cycles.as_mut() {
            cycles.clear();
        }
    }
}

/// Log the final result of a headless run.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        generations_observed = result.generations_observed,
        elapsed_ms = result.elapsed_ms,
        started_at = %result.started_at,
        "Simulation ended"
    );

    let status = &result.final_status;
    if result.generations_observed == 0 {
        warn!(generation = status.generation, "Simulation ended with no generations run");
    } else {
        info!(
            generation = status.generation,
            population = status.population,
            history_depth = status.history_depth,
            history_evicted = status.history_evicted,
            "Final generation"
        );
    }
}
