//! Axum router construction for the Observer API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for cross-origin dashboard access.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the Observer server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `POST /start` -- reset the simulation
/// - `GET /step` -- advance one tick
/// - `GET /state` -- current snapshot
/// - `GET /ws/ticks` -- `WebSocket` tick summary stream
/// - `GET /api/nodes` -- list nodes
/// - `GET /api/nodes/{id}` -- single node
/// - `GET /api/clusters` -- cluster leadership
///
/// CORS allows any origin so a browser client served from elsewhere can
/// drive the simulation.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // Simulation control
        .route("/start", post(handlers::start))
        .route("/step", get(handlers::step))
        .route("/state", get(handlers::get_state))
        // WebSocket
        .route("/ws/ticks", get(ws::ws_ticks))
        // REST API
        .route("/api/nodes", get(handlers::list_nodes))
        .route("/api/nodes/{id}", get(handlers::get_node))
        .route("/api/clusters", get(handlers::list_clusters))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
