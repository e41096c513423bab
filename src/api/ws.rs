// WebSocket handler for round state streaming and steering input.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use serde::Deserialize;

use crate::engine::chain::Heading;
use crate::metrics;

use super::AppState;

/// Inbound client frame: a steering request.
#[derive(Deserialize)]
#[serde(tag = "type")]
enum ClientMessage {
    #[serde(rename = "input")]
    Input { heading: Heading },
}

/// WebSocket upgrade handler for round state streaming.
pub async fn ws_round(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: AppState) {
    let mut rx = state.round_server.subscribe();
    metrics::CONNECTED_WEBSOCKETS.inc();

    // Forward all broadcast messages to the WebSocket client and apply
    // steering frames the client sends back. When the client
    // disconnects or the broadcast channel closes, we stop.
    loop {
        tokio::select! {
            // Round message from broadcast channel
            result = rx.recv() => {
                match result {
                    Ok(msg) => {
                        if socket.send(Message::Text(msg.into())).await.is_err() {
                            // Client disconnected
                            break;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        break;
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!("WebSocket client lagged, skipped {n} messages");
                        // Continue receiving
                    }
                }
            }
            // Client message: steering input or disconnect
            result = socket.recv() => {
                match result {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(ClientMessage::Input { heading }) => {
                                state.round_server.steer(heading);
                            }
                            Err(_) => {
                                // Malformed frames are dropped, not fatal
                                tracing::debug!("Ignoring unparseable client frame");
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        break;
                    }
                    _ => {
                        // Ignore pings/pongs/binary
                    }
                }
            }
        }
    }

    metrics::CONNECTED_WEBSOCKETS.dec();
}
