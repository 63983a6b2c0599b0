//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode during startup and the
//! headless run so `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: life_core::config::ConfigError,
    },

    /// The headless run failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: life_core::runner::RunnerError,
    },

    /// The final status could not be serialized.
    #[error("status serialization error: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
