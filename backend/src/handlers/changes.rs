//! Change feed over WebSocket
//!
//! Each committed write is pushed to connected dashboards as a JSON
//! `ChangeEvent`. Clients re-fetch the affected snapshot on receipt.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use shared::ChangeEvent;
use tokio::sync::broadcast;

use crate::services::changes::ChangeFeed;
use crate::AppState;

/// Upgrade to a WebSocket that streams change events
pub async fn subscribe_changes(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let receiver = state.changes.subscribe();
    ws.on_upgrade(move |socket| stream_changes(socket, receiver))
}

async fn stream_changes(mut socket: WebSocket, mut receiver: broadcast::Receiver<ChangeEvent>) {
    tracing::debug!("Change subscriber connected");

    loop {
        tokio::select! {
            event = ChangeFeed::next_event(&mut receiver) => {
                let Some(event) = event else { break };
                let payload = match serde_json::to_string(&event) {
                    Ok(payload) => payload,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to encode change event");
                        continue;
                    }
                };
                if socket.send(Message::Text(payload)).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    tracing::debug!("Change subscriber disconnected");
}
