//! WebSocket handler, the hub's single relay loop.
//!
//! DESIGN
//! ======
//! On upgrade, generates a client ID, assigns a random profile, and enters a
//! `select!` loop:
//! - Inbound client messages are decoded and rebroadcast to peers
//! - Broadcast messages from peers are forwarded down the socket
//!
//! The hub never interprets event payloads. A chat line, an emoji glyph, and
//! an unknown kind from a newer client all take the same path: stamp nothing,
//! store nothing, forward to everyone else.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade, register, send `profile_info` to the newcomer
//! 2. Broadcast `new_user` to peers (excluding the newcomer)
//! 3. Relay loop until the socket closes or errors
//! 4. Part, then broadcast `roommate_disconnect` to the survivors

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use events::{ClientMessage, ServerMessage, decode_client, encode_server};

use crate::profile;
use crate::services::room;
use crate::state::AppState;

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();
    let assigned = profile::assign();

    // Per-connection channel for receiving broadcast messages from peers.
    let (client_tx, mut client_rx) = mpsc::channel::<ServerMessage>(256);

    room::join(&state, client_id, assigned.clone(), client_tx).await;
    info!(%client_id, name = %assigned.name, "ws: participant connected");

    // Tell the newcomer who it is, and everyone else that it exists.
    let welcome = ServerMessage::ProfileInfo { profile: assigned };
    if send_message(&mut socket, &welcome).await.is_err() {
        room::part(&state, client_id).await;
        return;
    }
    room::broadcast(&state, &ServerMessage::NewUser, Some(client_id)).await;

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(msg) = msg else { break };
                let Ok(msg) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        process_inbound_text(&state, client_id, &text).await;
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(message) = client_rx.recv() => {
                if send_message(&mut socket, &message).await.is_err() {
                    break;
                }
            }
        }
    }

    // Part BEFORE notifying survivors so the departed never receives its
    // own disconnect notice through a racing broadcast.
    room::part(&state, client_id).await;
    room::broadcast(&state, &ServerMessage::RoommateDisconnect { client_id }, None).await;
    info!(%client_id, "ws: participant disconnected");
}

// =============================================================================
// INBOUND DISPATCH
// =============================================================================

/// Decode one inbound text message and rebroadcast it to peers.
///
/// Split out from the socket loop so tests can drive the relay path without
/// a live websocket.
pub(crate) async fn process_inbound_text(state: &AppState, client_id: Uuid, text: &str) {
    let message = match decode_client(text) {
        Ok(m) => m,
        Err(e) => {
            warn!(%client_id, error = %e, "ws: invalid inbound message, dropped");
            return;
        }
    };

    match message {
        ClientMessage::CursorMove { x, y } => {
            // Profile lookup can only miss if the client raced its own
            // disconnect; dropping the sample is correct then.
            let Some(profile) = room::profile_of(state, client_id).await else {
                debug!(%client_id, "ws: cursor from unregistered client, dropped");
                return;
            };
            let out = ServerMessage::CursorMove { client_id, x, y, profile };
            room::broadcast(state, &out, Some(client_id)).await;
        }
        ClientMessage::Event { key, value } => {
            let out = ServerMessage::Event { key, value };
            room::broadcast(state, &out, Some(client_id)).await;
        }
    }
}

// =============================================================================
// HELPERS
// =============================================================================

async fn send_message(socket: &mut WebSocket, message: &ServerMessage) -> Result<(), ()> {
    let json = encode_server(message);
    socket.send(Message::Text(json.into())).await.map_err(|_| ())
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
