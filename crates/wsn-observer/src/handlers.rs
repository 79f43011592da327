//! REST API endpoint handlers for the Observer server.
//!
//! All handlers go through the simulation mutex in the shared
//! [`AppState`]. Only `POST /start` and `GET /step` mutate it.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `POST` | `/start` | Reset with `{ "n_nodes": N }` |
//! | `GET` | `/step` | Advance one tick, return the snapshot |
//! | `GET` | `/state` | Current snapshot without advancing |
//! | `GET` | `/api/nodes` | List nodes (`?status=alive\|dead\|heads\|all`) |
//! | `GET` | `/api/nodes/{id}` | Single node with utility breakdown |
//! | `GET` | `/api/clusters` | Per-cluster leadership |

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse};
use tracing::{debug, info};
use wsn_types::{NodeId, NodeRecord};

use crate::error::ObserverError;
use crate::state::{AppState, TickBroadcast};

/// Population used by `POST /start` when the body omits `n_nodes`.
pub const DEFAULT_START_NODES: i64 = 50;

// ---------------------------------------------------------------------------
// Request and query structs
// ---------------------------------------------------------------------------

/// Body of `POST /start`.
#[derive(Debug, serde::Deserialize)]
pub struct StartRequest {
    /// Requested population. Negative values mean an empty simulation.
    #[serde(default = "default_start_nodes")]
    pub n_nodes: i64,
}

impl Default for StartRequest {
    fn default() -> Self {
        Self {
            n_nodes: DEFAULT_START_NODES,
        }
    }
}

const fn default_start_nodes() -> i64 {
    DEFAULT_START_NODES
}

/// Query parameters for the `GET /api/nodes` endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct NodesQuery {
    /// Accepted values: `alive`, `dead`, `heads`, `all` (default).
    pub status: Option<String>,
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing simulation status and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (tick, population, clusters) = {
        let sim = state.simulation.lock().await;
        let snapshot = sim.snapshot();
        (snapshot.sim_time, snapshot.population, snapshot.clusters.len())
    };
    let alive = population.alive;
    let dead = population.dead;
    let heads = population.heads;
    let downtime = population.total_downtime;
    let mean_battery = format!("{:.1}", population.mean_battery);

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>WSN Cluster Observer</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        .dead {{ color: #ff0000; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        a:hover {{ text-decoration: underline; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        hr {{ border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }}
    </style>
</head>
<body>
    <h1>WSN Cluster Observer</h1>
    <p class="subtitle">Energy-aware cluster head election</p>

    <div>
        <div class="metric">
            <div class="label">Tick</div>
            <div class="value">{tick}</div>
        </div>
        <div class="metric">
            <div class="label">Alive</div>
            <div class="value">{alive}</div>
        </div>
        <div class="metric">
            <div class="label">Dead</div>
            <div class="value dead">{dead}</div>
        </div>
        <div class="metric">
            <div class="label">Heads</div>
            <div class="value">{heads} / {clusters}</div>
        </div>
        <div class="metric">
            <div class="label">Total downtime</div>
            <div class="value">{downtime}</div>
        </div>
        <div class="metric">
            <div class="label">Mean battery</div>
            <div class="value">{mean_battery}</div>
        </div>
    </div>

    <hr>

    <h2>API Endpoints</h2>
    <ul>
        <li><b>POST</b> /start -- Reset with <code>{{"n_nodes": 50}}</code></li>
        <li><b>GET</b> <a href="/step">/step</a> -- Advance one tick</li>
        <li><b>GET</b> <a href="/state">/state</a> -- Current snapshot</li>
        <li><b>GET</b> <a href="/api/nodes">/api/nodes</a> -- Nodes (?status=alive|dead|heads|all)</li>
        <li><b>GET</b> /api/nodes/{{id}} -- Single node with utility terms</li>
        <li><b>GET</b> <a href="/api/clusters">/api/clusters</a> -- Cluster leadership</li>
    </ul>

    <h2>WebSocket</h2>
    <ul>
        <li><code>ws://host:port/ws/ticks</code> -- Live tick summary stream</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// POST /start -- reset the simulation
// ---------------------------------------------------------------------------

/// Reset the simulation with a fresh population.
///
/// An empty body uses the default population. Negative counts produce an
/// empty simulation; counts above `max_nodes` are rejected.
pub async fn start(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ObserverError> {
    let request: StartRequest = if body.iter().all(u8::is_ascii_whitespace) {
        StartRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ObserverError::InvalidQuery(format!("invalid start request: {e}")))?
    };

    let n_nodes = u32::try_from(request.n_nodes.max(0)).map_err(|e| {
        ObserverError::InvalidQuery(format!("n_nodes {} is out of range: {e}", request.n_nodes))
    })?;
    if n_nodes > state.max_nodes {
        return Err(ObserverError::InvalidQuery(format!(
            "n_nodes {n_nodes} exceeds the maximum of {}",
            state.max_nodes
        )));
    }

    state.simulation.lock().await.reset(n_nodes);
    info!(n_nodes, "Simulation restarted");

    Ok(Json(serde_json::json!({
        "status": "ok",
        "n_nodes": n_nodes,
    })))
}

// ---------------------------------------------------------------------------
// GET /step -- advance one tick
// ---------------------------------------------------------------------------

/// Advance one tick, broadcast its summary, and return the new snapshot.
pub async fn step(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let (summary, snapshot) = {
        let mut sim = state.simulation.lock().await;
        let summary = sim.advance()?;
        (summary, sim.snapshot())
    };

    let receivers = state.broadcast(&TickBroadcast::from(&summary));
    debug!(tick = summary.tick, receivers, "Tick broadcast");

    Ok(Json(snapshot))
}

// ---------------------------------------------------------------------------
// GET /state -- current snapshot
// ---------------------------------------------------------------------------

/// Return the current snapshot without advancing time.
pub async fn get_state(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.simulation.lock().await.snapshot();
    Json(snapshot)
}

// ---------------------------------------------------------------------------
// GET /api/nodes -- list nodes
// ---------------------------------------------------------------------------

/// List nodes, optionally filtered by status.
///
/// # Query Parameters
///
/// - `status`: `alive` | `dead` | `heads` | `all` (default: `all`)
pub async fn list_nodes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NodesQuery>,
) -> Result<impl IntoResponse, ObserverError> {
    let filter = params.status.as_deref().unwrap_or("all");
    let keep: fn(&NodeRecord) -> bool = match filter {
        "alive" => |n| !n.dead,
        "dead" => |n| n.dead,
        "heads" => |n| n.is_head,
        "all" => |_| true,
        other => {
            return Err(ObserverError::InvalidQuery(format!(
                "unknown status filter '{other}' (expected alive, dead, heads, or all)"
            )));
        }
    };

    let snapshot = state.simulation.lock().await.snapshot();
    let nodes: Vec<NodeRecord> = snapshot.nodes.into_iter().filter(|n| keep(n)).collect();

    Ok(Json(serde_json::json!({
        "count": nodes.len(),
        "nodes": nodes,
    })))
}

// ---------------------------------------------------------------------------
// GET /api/nodes/{id} -- single node detail
// ---------------------------------------------------------------------------

/// Return one node's record, its downtime if dead, its cluster's head, and
/// the utility terms it would be scored with right now.
pub async fn get_node(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ObserverError> {
    let id = parse_node_id(&id_str)?;

    let sim = state.simulation.lock().await;
    let node = sim
        .node(id)
        .ok_or_else(|| ObserverError::NotFound(format!("node {id}")))?;

    let model = &sim.state().utility;
    let terms = model.terms(node, sim.gateway());
    let utility = serde_json::json!({
        "event": terms.event,
        "energy": terms.energy,
        "fairness": terms.fairness,
        "link_quality": terms.link_quality,
        "total": terms.weighted(model.weights()),
    });
    let cluster_head = sim.head_of(node.cluster_id()).map(|head| head.id());
    let death_tick = node.death_tick();
    let downtime = death_tick.map(|tick| sim.state().clock.elapsed_since(tick));
    let cluster_id = node.cluster_id();

    let snapshot = sim.snapshot();
    drop(sim);

    let record = snapshot
        .node(id)
        .cloned()
        .ok_or_else(|| ObserverError::Internal(format!("node {id} missing from snapshot")))?;

    Ok(Json(serde_json::json!({
        "node": record,
        "cluster": cluster_id,
        "cluster_head": cluster_head,
        "death_tick": death_tick,
        "downtime": downtime,
        "utility": utility,
    })))
}

// ---------------------------------------------------------------------------
// GET /api/clusters -- cluster leadership
// ---------------------------------------------------------------------------

/// List every cluster with its living head and member counts.
pub async fn list_clusters(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let clusters = state.simulation.lock().await.snapshot().clusters;
    Json(serde_json::json!({
        "count": clusters.len(),
        "clusters": clusters,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_node_id(s: &str) -> Result<NodeId, ObserverError> {
    s.parse::<u32>()
        .map(NodeId::new)
        .map_err(|e| ObserverError::InvalidQuery(format!("invalid node id {s}: {e}")))
}
