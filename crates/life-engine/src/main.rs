//! Headless engine binary for the Life simulation.
//!
//! Loads configuration, seeds the grid, and runs autoplay until one of
//! the configured end conditions is met or the operator presses Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `life-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Build the simulation and its controller
//! 4. Seed the grid when `simulation.start` is `random`
//! 5. Run autoplay under the configured bounds
//! 6. Log the result and print the final status as JSON

mod error;

use std::path::Path;

use life_core::config::{LifeConfig, LoggingConfig, StartMode};
use life_core::controller::SimulationController;
use life_core::runner;
use life_core::simulation::Simulation;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Configuration file looked up in the working directory.
const CONFIG_PATH: &str = "life-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the run fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging depends on it, so report afterwards.
    let config_path = Path::new(CONFIG_PATH);
    let config_found = config_path.exists();
    let config = load_config(config_path)?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!("life-engine starting");
    if !config_found {
        info!("Config file not found, using defaults");
    }
    info!(
        rows = config.grid.rows,
        cols = config.grid.cols,
        speed_ms = config.simulation.speed_ms,
        seed = ?config.simulation.seed,
        start = ?config.simulation.start,
        display_pattern = %config.simulation.display_pattern,
        "Configuration loaded"
    );

    // 3. Build the controller.
    let simulation = Simulation::from_config(&config).map_err(EngineError::from)?;
    let controller = SimulationController::new(simulation);

    // 4. Seed the starting grid.
    if config.simulation.start == StartMode::Random {
        controller.seed_random().await;
    }
    info!(population = controller.population().await, "Starting grid ready");

    if config.bounds.max_generations == 0 && config.bounds.max_real_time_seconds == 0 {
        warn!("No generation or time limit configured, running until stopped");
    }

    // 5. Run until an end condition or Ctrl-C.
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C, stop signal disabled");
            std::future::pending::<()>().await;
        }
    };
    let result = runner::run_simulation(&controller, &config.bounds, shutdown)
        .await
        .map_err(EngineError::from)?;

    // 6. Report.
    runner::log_simulation_end(&result);
    let status = serde_json::to_string_pretty(&result).map_err(EngineError::from)?;
    println!("{status}");

    Ok(())
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Load configuration from `path`, falling back to defaults when the
/// file does not exist. Environment overrides apply either way.
fn load_config(path: &Path) -> Result<LifeConfig, EngineError> {
    if path.exists() {
        return Ok(LifeConfig::from_file(path)?);
    }
    let mut config = LifeConfig::default();
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}
