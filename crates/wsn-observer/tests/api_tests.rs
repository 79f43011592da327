//! Integration tests for the Observer API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic and routing
//! without needing a live network connection.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use wsn_core::{DefaultSimulation, SimulationConfig};
use wsn_observer::router::build_router;
use wsn_observer::state::AppState;

fn make_test_state() -> Arc<AppState> {
    let mut config = SimulationConfig::default();
    config.population.initial_nodes = 10;
    config.population.max_nodes = 100;
    let simulation = DefaultSimulation::from_seed(&config, 7).unwrap();
    Arc::new(AppState::new(simulation))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(router: &Router, path: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(Request::get(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn post_start(router: &Router, body: &'static str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::post("/start")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_index_returns_html() {
    let router = build_router(make_test_state());

    let response = router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.contains("text/html"));
}

#[tokio::test]
async fn test_state_does_not_advance() {
    let router = build_router(make_test_state());

    let (status, json) = get(&router, "/state").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["sim_time"], 0);
    assert_eq!(json["nodes"].as_array().unwrap().len(), 10);
    assert_eq!(json["gateway"], serde_json::json!([500.0, 500.0]));

    let (_, again) = get(&router, "/state").await;
    assert_eq!(again["sim_time"], 0);
}

#[tokio::test]
async fn test_step_advances_and_elects() {
    let router = build_router(make_test_state());

    let (status, json) = get(&router, "/step").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["sim_time"], 1);
    assert!(json["population"]["heads"].as_u64().unwrap() >= 1);

    let (_, json) = get(&router, "/step").await;
    assert_eq!(json["sim_time"], 2);

    let node = &json["nodes"][0];
    assert!(node["batt"].as_f64().unwrap() < 100.0);
    assert!(node["cluster"].is_u64());
    assert!(node["color"].as_str().unwrap().starts_with('#'));
}

#[tokio::test]
async fn test_step_broadcasts_tick() {
    let state = make_test_state();
    let mut rx = state.subscribe();
    let router = build_router(Arc::clone(&state));

    let (status, _) = get(&router, "/step").await;
    assert_eq!(status, StatusCode::OK);

    let broadcast = rx.try_recv().unwrap();
    assert_eq!(broadcast.tick, 1);
    assert_eq!(broadcast.nodes_alive, 10);
    assert!(broadcast.elections_this_tick >= 1);
}

#[tokio::test]
async fn test_start_resets_population() {
    let router = build_router(make_test_state());
    get(&router, "/step").await;

    let (status, json) = post_start(&router, r#"{"n_nodes": 20}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["n_nodes"], 20);

    let (_, state) = get(&router, "/state").await;
    assert_eq!(state["sim_time"], 0);
    assert_eq!(state["nodes"].as_array().unwrap().len(), 20);
    assert!(state["links"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_start_without_n_nodes_uses_default() {
    let router = build_router(make_test_state());

    let (status, json) = post_start(&router, "{}").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["n_nodes"], 50);

    let (status, json) = post_start(&router, "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["n_nodes"], 50);
}

#[tokio::test]
async fn test_start_negative_yields_empty_simulation() {
    let router = build_router(make_test_state());

    let (status, json) = post_start(&router, r#"{"n_nodes": -5}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["n_nodes"], 0);

    let (status, state) = get(&router, "/step").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state["sim_time"], 1);
    assert!(state["nodes"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_start_above_max_is_rejected() {
    let router = build_router(make_test_state());

    let (status, json) = post_start(&router, r#"{"n_nodes": 101}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
    assert!(json["error"].as_str().unwrap().contains("exceeds"));

    // The running simulation is untouched.
    let (_, state) = get(&router, "/state").await;
    assert_eq!(state["nodes"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_start_malformed_body_is_rejected() {
    let router = build_router(make_test_state());

    let (status, _) = post_start(&router, r#"{"n_nodes": "many"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_nodes_filters() {
    let router = build_router(make_test_state());
    get(&router, "/step").await;

    let (status, all) = get(&router, "/api/nodes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["count"], 10);

    let (_, alive) = get(&router, "/api/nodes?status=alive").await;
    assert_eq!(alive["count"], 10);

    let (_, dead) = get(&router, "/api/nodes?status=dead").await;
    assert_eq!(dead["count"], 0);

    let (_, heads) = get(&router, "/api/nodes?status=heads").await;
    let head_count = heads["count"].as_u64().unwrap();
    assert!((1..=5).contains(&head_count));
    assert!(
        heads["nodes"]
            .as_array()
            .unwrap()
            .iter()
            .all(|n| n["is_head"] == true)
    );
}

#[tokio::test]
async fn test_list_nodes_unknown_status() {
    let router = build_router(make_test_state());

    let (status, json) = get(&router, "/api/nodes?status=sleeping").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn test_get_node_by_id() {
    let router = build_router(make_test_state());

    let (status, json) = get(&router, "/api/nodes/0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["node"]["id"], 0);
    assert!(json["death_tick"].is_null());
    assert_eq!(json["node"]["color"], "#00ff00");
    assert!(json["utility"]["total"].is_f64());
    let energy = json["utility"]["energy"].as_f64().unwrap();
    assert!((energy - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_get_node_not_found() {
    let router = build_router(make_test_state());

    let (status, json) = get(&router, "/api/nodes/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn test_get_node_invalid_id() {
    let router = build_router(make_test_state());

    let (status, _) = get(&router, "/api/nodes/not-a-number").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_clusters() {
    let router = build_router(make_test_state());

    let (status, json) = get(&router, "/api/clusters").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 5);
    let clusters = json["clusters"].as_array().unwrap();
    assert!(clusters.iter().all(|c| c["head"].is_null()));

    get(&router, "/step").await;
    let (_, json) = get(&router, "/api/clusters").await;
    let members: u64 = json["clusters"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["members"].as_u64().unwrap())
        .sum();
    assert_eq!(members, 10);
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let router = build_router(make_test_state());

    let response = router
        .oneshot(Request::get("/api/towers").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tick_stream_requires_upgrade() {
    let router = build_router(make_test_state());

    let response = router
        .oneshot(Request::get("/ws/ticks").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.status().is_client_error());
    assert_ne!(response.status(), StatusCode::NOT_FOUND);
}
