//! WebSocket streaming of airspace frames.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use std::sync::Arc;

use crate::state::AppState;

/// Handler for WebSocket connections.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let mut rx = state.frames_tx.subscribe();

    tokio::spawn(async move {
        while let Ok(frame) = rx.recv().await {
            if socket.send(Message::Text(frame)).await.is_err() {
                break;
            }
        }
    });
}
