//! Configuration loading and typed config structures for the Life simulation.
//!
//! The configuration lives in `life-config.yaml` next to the binary's
//! working directory. Every section and field is optional; anything left
//! out falls back to the defaults below, so an empty file is a valid
//! configuration.
//!
//! ```yaml
//! grid:
//!   rows: 50
//!   cols: 50
//! simulation:
//!   speed_ms: 500
//!   history_capacity: 1000
//!   seed: 42
//!   start: random
//!   display_pattern: square
//! bounds:
//!   max_generations: 0
//!   max_real_time_seconds: 0
//!   stop_on_extinction: true
//!   stop_on_cycle: true
//!   cycle_window: 10
//! logging:
//!   level: info
//!   json: false
//! ```

use std::path::Path;

use life_grid::{Dimensions, GridError, NUM_COLS, NUM_ROWS};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;

use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::pattern::DisplayPattern;
use crate::simulation::DEFAULT_SPEED_MS;

/// Largest grid, in cells, that a configuration may request.
pub const MAX_GRID_CELLS: usize = 1_000_000;

/// Environment variable overriding `simulation.seed`.
pub const ENV_SEED: &str = "LIFE_SEED";

/// Environment variable overriding `simulation.speed_ms`.
pub const ENV_SPEED_MS: &str = "LIFE_SPEED_MS";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configured grid shape is unusable.
    #[error("invalid grid configuration: {source}")]
    Grid {
        /// The underlying grid error.
        #[from]
        source: GridError,
    },

    /// A value parsed but is out of range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LifeConfig {
    /// Grid shape.
    #[serde(default)]
    pub grid: GridConfig,

    /// Controller settings (speed, history, seeding).
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// End conditions for a headless run.
    #[serde(default)]
    pub bounds: RunBoundsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LifeConfig {
    /// Load configuration from a YAML file, apply environment overrides,
    /// and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or a
    /// validation error from [`LifeConfig::validate`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// Environment overrides are not applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or a
    /// validation error from [`LifeConfig::validate`].
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `LIFE_SEED` and `LIFE_SPEED_MS` from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Values that fail to parse are ignored with a warning.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_SEED) {
            match raw.trim().parse::<u64>() {
                Ok(seed) => self.simulation.seed = Some(seed),
                Err(e) => tracing::warn!(key = ENV_SEED, value = raw, error = %e, "ignoring override"),
            }
        }
        if let Some(raw) = lookup(ENV_SPEED_MS) {
            match raw.trim().parse::<u64>() {
                Ok(speed) => self.simulation.speed_ms = speed,
                Err(e) => tracing::warn!(key = ENV_SPEED_MS, value = raw, error = %e, "ignoring override"),
            }
        }
    }

    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Grid`] for a zero-sized or unaddressable
    /// grid, or [`ConfigError::Invalid`] for a grid above
    /// [`MAX_GRID_CELLS`], a zero speed, a zero cycle window while cycle
    /// detection is enabled, or an unknown log level.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dims = self.grid.dimensions()?;
        if dims.cell_count() > MAX_GRID_CELLS {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "grid of {}x{} exceeds the limit of {MAX_GRID_CELLS} cells",
                    dims.rows(),
                    dims.cols()
                ),
            });
        }
        if self.simulation.speed_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "simulation.speed_ms must be at least 1".to_owned(),
            });
        }
        if self.bounds.stop_on_cycle && self.bounds.cycle_window == 0 {
            return Err(ConfigError::Invalid {
                reason: "bounds.cycle_window must be at least 1 when stop_on_cycle is set"
                    .to_owned(),
            });
        }
        self.logging.validate()?;
        Ok(())
    }
}

/// Grid shape configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GridConfig {
    /// Number of rows.
    #[serde(default = "default_rows")]
    pub rows: usize,

    /// Number of columns.
    #[serde(default = "default_cols")]
    pub cols: usize,
}

impl GridConfig {
    /// Validated dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::EmptyDimensions`] if either axis is zero.
    pub const fn dimensions(&self) -> Result<Dimensions, GridError> {
        Dimensions::new(self.rows, self.cols)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
        }
    }
}

/// How the initial grid is populated by the engine binary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartMode {
    /// Start from an all-dead grid.
    Empty,
    /// Start from a random grid (30% alive).
    #[default]
    Random,
}

/// Controller configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Milliseconds between autoplay ticks.
    #[serde(default = "default_speed_ms")]
    pub speed_ms: u64,

    /// Undo snapshots retained (0 = unbounded).
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Seed for random grids. `None` seeds from the operating system.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Initial grid population.
    #[serde(default)]
    pub start: StartMode,

    /// Initial display pattern.
    #[serde(default)]
    pub display_pattern: DisplayPattern,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            speed_ms: default_speed_ms(),
            history_capacity: default_history_capacity(),
            seed: None,
            start: StartMode::default(),
            display_pattern: DisplayPattern::default(),
        }
    }
}

/// End conditions for a headless run.
///
/// A value of 0 for `max_generations` or `max_real_time_seconds` means
/// unlimited.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunBoundsConfig {
    /// Stop once this generation is reached (0 = unlimited).
    #[serde(default)]
    pub max_generations: u64,

    /// Stop after this many wall-clock seconds (0 = unlimited).
    #[serde(default)]
    pub max_real_time_seconds: u64,

    /// Stop when no live cells remain.
    #[serde(default = "default_true")]
    pub stop_on_extinction: bool,

    /// Stop when the grid repeats one of the last `cycle_window` grids.
    #[serde(default = "default_true")]
    pub stop_on_cycle: bool,

    /// How many recent grids cycle detection remembers.
    #[serde(default = "default_cycle_window")]
    pub cycle_window: usize,
}

impl Default for RunBoundsConfig {
    fn default() -> Self {
        Self {
            max_generations: 0,
            max_real_time_seconds: 0,
            stop_on_extinction: true,
            stop_on_cycle: true,
            cycle_window: default_cycle_window(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    /// (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    /// Check that every comma-separated directive in `level` ends in a
    /// level name (`info`, `life_core=debug`, `warn,life_engine=trace`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad directive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for directive in self.level.split(',') {
            let level = directive.rsplit('=').next().unwrap_or(directive).trim();
            if let Err(e) = level.parse::<LevelFilter>() {
                return Err(ConfigError::Invalid {
                    reason: format!("logging.level directive {directive:?}: {e}"),
                });
            }
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_rows() -> usize {
    NUM_ROWS
}

const fn default_cols() -> usize {
    NUM_COLS
}

const fn default_speed_ms() -> u64 {
    DEFAULT_SPEED_MS
}

const fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

const fn default_cycle_window() -> usize {
    10
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_true() -> bool {
    true
}
