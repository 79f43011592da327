//! Observer API server for the WSN cluster simulation.
//!
//! This crate provides an Axum HTTP server around one
//! [`ClusterSimulation`](wsn_core::ClusterSimulation):
//!
//! - **Control endpoints** (`POST /start`, `GET /step`, `GET /state`) that
//!   reset, advance, and read the simulation
//! - **REST endpoints** for querying nodes and clusters
//! - **`WebSocket` endpoint** (`/ws/ticks`) for real-time tick summary
//!   streaming via [`tokio::sync::broadcast`]
//! - **Minimal HTML dashboard** (`GET /`) showing tick, population, and
//!   links to the API
//!
//! The simulation advances only when a client calls `GET /step`; the
//! server never ticks on its own.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use error::ObserverError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::{AppState, TickBroadcast};
