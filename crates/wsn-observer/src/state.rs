//! Shared application state for the Observer API server.
//!
//! [`AppState`] holds the broadcast channel for tick summaries and the one
//! simulation instance the endpoints drive. Every reset, step, and read
//! goes through a single [`Mutex`], so requests never observe a
//! half-finished tick.

use std::sync::Arc;

use tokio::sync::{Mutex, broadcast};
use wsn_core::{DefaultSimulation, SimulationConfig, SimulationError, TickSummary};
use wsn_types::Point;

/// Capacity of the broadcast channel for tick summaries.
///
/// If a subscriber falls behind by more than this many messages it will
/// receive a [`broadcast::error::RecvError::Lagged`] and skip to the
/// newest message.
const BROADCAST_CAPACITY: usize = 256;

/// JSON-serializable tick summary pushed over the `WebSocket`.
///
/// A counts-only projection of [`TickSummary`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TickBroadcast {
    /// The tick number.
    pub tick: u64,
    /// Where the tick's event occurred.
    pub event: Point,
    /// Number of living nodes.
    pub nodes_alive: u32,
    /// Number of living cluster heads.
    pub heads: u32,
    /// Number of deaths this tick.
    pub deaths_this_tick: u32,
    /// Number of elections held this tick.
    pub elections_this_tick: u32,
}

impl From<&TickSummary> for TickBroadcast {
    fn from(summary: &TickSummary) -> Self {
        Self {
            tick: summary.tick,
            event: summary.event,
            nodes_alive: summary.nodes_alive,
            heads: summary.heads,
            deaths_this_tick: u32::try_from(summary.deaths.len()).unwrap_or(u32::MAX),
            elections_this_tick: u32::try_from(summary.elections.len()).unwrap_or(u32::MAX),
        }
    }
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Broadcast sender for tick summary messages.
    pub tx: broadcast::Sender<TickBroadcast>,
    /// The simulation driven by the REST endpoints.
    pub simulation: Arc<Mutex<DefaultSimulation>>,
    /// Largest population `POST /start` accepts.
    pub max_nodes: u32,
}

impl AppState {
    /// Wrap an existing simulation.
    pub fn new(simulation: DefaultSimulation) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        let max_nodes = simulation.config().population.max_nodes;
        Self {
            tx,
            simulation: Arc::new(Mutex::new(simulation)),
            max_nodes,
        }
    }

    /// Build a simulation from `config` (seeded from `world.seed`) and wrap it.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, SimulationError> {
        Ok(Self::new(DefaultSimulation::from_config(config)?))
    }

    /// Subscribe to the tick broadcast channel.
    ///
    /// Returns a receiver that will yield [`TickBroadcast`] messages
    /// for every tick the simulation completes.
    pub fn subscribe(&self) -> broadcast::Receiver<TickBroadcast> {
        self.tx.subscribe()
    }

    /// Publish a tick summary to all connected clients.
    ///
    /// Returns the number of receivers that received the message.
    /// Returns 0 if no clients are connected (this is not an error).
    pub fn broadcast(&self, summary: &TickBroadcast) -> usize {
        // send returns Err only when there are zero receivers.
        self.tx.send(summary.clone()).unwrap_or(0)
    }
}
