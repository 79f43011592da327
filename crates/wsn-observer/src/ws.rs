//! `WebSocket` stream of tick summaries.
//!
//! `GET /ws/ticks` upgrades to a socket that receives one JSON
//! [`TickBroadcast`] text frame per `GET /step`. Slow clients that lag
//! behind the broadcast buffer skip ahead to the newest tick.

use std::ops::ControlFlow;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::state::{AppState, TickBroadcast};

/// Upgrade to a `WebSocket` and stream tick summaries.
///
/// # Route
///
/// `GET /ws/ticks`
pub async fn ws_ticks(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| stream_ticks(socket, state))
}

async fn stream_ticks(mut socket: WebSocket, state: Arc<AppState>) {
    let mut rx = state.subscribe();
    debug!(subscribers = state.tx.receiver_count(), "Tick stream opened");

    loop {
        let flow = tokio::select! {
            received = rx.recv() => match received {
                Ok(tick) => send_tick(&mut socket, &tick).await,
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Tick stream lagged");
                    ControlFlow::Continue(())
                }
                Err(RecvError::Closed) => ControlFlow::Break(()),
            },
            incoming = socket.recv() => answer_client(&mut socket, incoming).await,
        };
        if flow.is_break() {
            break;
        }
    }

    debug!("Tick stream closed");
}

async fn send_tick(socket: &mut WebSocket, tick: &TickBroadcast) -> ControlFlow<()> {
    let json = match serde_json::to_string(tick) {
        Ok(json) => json,
        Err(e) => {
            warn!(tick = tick.tick, "Failed to encode tick broadcast: {e}");
            return ControlFlow::Continue(());
        }
    };
    if socket.send(Message::Text(json.into())).await.is_err() {
        return ControlFlow::Break(());
    }
    ControlFlow::Continue(())
}

/// Clients only ever ping or close.
async fn answer_client(
    socket: &mut WebSocket,
    incoming: Option<Result<Message, axum::Error>>,
) -> ControlFlow<()> {
    match incoming {
        Some(Ok(Message::Ping(payload))) => {
            if socket.send(Message::Pong(payload)).await.is_err() {
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        }
        Some(Ok(Message::Close(_))) | None => ControlFlow::Break(()),
        Some(Err(e)) => {
            debug!("Tick stream socket error: {e}");
            ControlFlow::Break(())
        }
        Some(Ok(_)) => ControlFlow::Continue(()),
    }
}
