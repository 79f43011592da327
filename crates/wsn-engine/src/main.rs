//! Engine binary for the WSN cluster simulation.
//!
//! Loads configuration, builds one simulation, and serves it through the
//! observer API. The simulation only advances when a client calls
//! `GET /step`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `wsn-config.yaml` (or `$WSN_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Build the simulation and its initial population
//! 4. Serve the observer API until the process is terminated

mod error;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;
use wsn_core::SimulationConfig;
use wsn_core::config::LoggingConfig;
use wsn_observer::{AppState, ServerConfig, start_server};

use crate::error::EngineError;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "wsn-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the server cannot bind.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration (before logging, which it configures).
    let config_path = config_path();
    let (config, loaded_from_file) = load_config(&config_path)?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!("wsn-engine starting");
    if loaded_from_file {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }
    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        cluster_count = config.area.cluster_count,
        initial_nodes = config.population.initial_nodes,
        max_tenure_ticks = config.election.max_tenure_ticks,
        "Simulation parameters"
    );

    // 3. Build the simulation.
    let state = Arc::new(AppState::from_config(&config).map_err(EngineError::from)?);
    info!(
        nodes = config.population.initial_nodes,
        max_nodes = state.max_nodes,
        "Simulation ready"
    );

    // 4. Serve.
    let server_config = ServerConfig::from(&config.observer);
    start_server(&server_config, state)
        .await
        .map_err(EngineError::from)?;

    info!("wsn-engine stopped");
    Ok(())
}

/// Resolve the configuration path from `WSN_CONFIG`, falling back to
/// `wsn-config.yaml` in the working directory.
fn config_path() -> PathBuf {
    std::env::var_os("WSN_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

/// Load and validate the configuration.
///
/// A missing file yields the defaults. Returns whether the file was read.
fn load_config(path: &std::path::Path) -> Result<(SimulationConfig, bool), EngineError> {
    let (config, loaded) = if path.exists() {
        (SimulationConfig::from_file(path)?, true)
    } else {
        let mut config = SimulationConfig::default();
        config.observer.apply_env_overrides();
        (config, false)
    };
    config.validate()?;
    Ok((config, loaded))
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `logging.level`. Setting
/// `WSN_LOG_FORMAT=json` switches to JSON lines.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let json = std::env::var("WSN_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}
