//! Room service: join/part and fan-out.
//!
//! DESIGN
//! ======
//! The hub keeps no canvas content. Joining registers a sender and a
//! profile; parting removes both; broadcast forwards a message to every
//! registered sender except an optional excluded one. Nothing here is
//! persisted, so a disconnect erases every trace of the participant.

use events::{Profile, ServerMessage};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use crate::state::AppState;

// =============================================================================
// JOIN / PART
// =============================================================================

/// Register a participant in the room with a freshly assigned profile.
pub async fn join(
    state: &AppState,
    client_id: Uuid,
    profile: Profile,
    tx: mpsc::Sender<ServerMessage>,
) {
    let mut room = state.room.write().await;
    room.clients.insert(client_id, tx);
    room.profiles.insert(client_id, profile);
    info!(%client_id, participants = room.clients.len(), "participant joined room");
}

/// Remove a participant. Idempotent; parting twice is harmless.
pub async fn part(state: &AppState, client_id: Uuid) {
    let mut room = state.room.write().await;
    room.clients.remove(&client_id);
    room.profiles.remove(&client_id);
    info!(%client_id, remaining = room.clients.len(), "participant left room");
}

/// Look up the profile assigned to a connection, if it is still present.
pub async fn profile_of(state: &AppState, client_id: Uuid) -> Option<Profile> {
    let room = state.room.read().await;
    room.profiles.get(&client_id).cloned()
}

// =============================================================================
// BROADCAST
// =============================================================================

/// Broadcast a message to every participant, optionally excluding one.
pub async fn broadcast(state: &AppState, message: &ServerMessage, exclude: Option<Uuid>) {
    let room = state.room.read().await;
    for (client_id, tx) in &room.clients {
        if exclude == Some(*client_id) {
            continue;
        }
        // Best-effort: if a client's channel is full, skip it.
        let _ = tx.try_send(message.clone());
    }
}

#[cfg(test)]
#[path = "room_test.rs"]
mod tests;
