//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and serving.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: wsn_core::ConfigError,
    },

    /// The simulation could not be built from the configuration.
    #[error("simulation error: {source}")]
    Simulation {
        /// The underlying simulation error.
        #[from]
        source: wsn_core::SimulationError,
    },

    /// Observer API server failed to start or stopped with an error.
    #[error("observer error: {source}")]
    Observer {
        /// The underlying server error.
        #[from]
        source: wsn_observer::ServerError,
    },
}
