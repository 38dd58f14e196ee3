//! Shared hub state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! There is exactly one room; its connection table and profile map are owned
//! behind a single `RwLock` so connect/disconnect/broadcast can interleave
//! across connection tasks without corrupting iteration. The hub holds no
//! event state at all; events pass through and are gone.

use std::collections::HashMap;
use std::sync::Arc;

use events::{Profile, ServerMessage};
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

// =============================================================================
// ROOM STATE
// =============================================================================

/// The single shared room: who is connected, and the profile assigned to
/// each connection on arrival.
#[derive(Default)]
pub struct RoomState {
    /// Connected participants: `client_id` -> sender for outgoing messages.
    pub clients: HashMap<Uuid, mpsc::Sender<ServerMessage>>,
    /// Immutable per-connection profiles, assigned once on connect.
    pub profiles: HashMap<Uuid, Profile>,
}

impl RoomState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state. Clone is required by Axum; the inner room is
/// Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub room: Arc<RwLock<RoomState>>,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self { room: Arc::new(RwLock::new(RoomState::new())) }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;

    /// Register a client directly into the room and return its receiver.
    pub async fn seed_client(state: &AppState, client_id: Uuid) -> mpsc::Receiver<ServerMessage> {
        let (tx, rx) = mpsc::channel(16);
        let mut room = state.room.write().await;
        room.clients.insert(client_id, tx);
        room.profiles.insert(
            client_id,
            Profile { name: format!("tester-{client_id}"), avatar: "gryphon".into() },
        );
        rx
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
