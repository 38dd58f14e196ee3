//! Presence roster: the eventually-consistent cache of peer cursors and
//! profiles.
//!
//! Each client owns its roster exclusively. A cursor update replaces the
//! whole entry in one step, so stale coordinates can never end up paired
//! with a newer profile or vice versa. Entries appear the first time a peer
//! moves and disappear on the peer's disconnect notification.

#[cfg(test)]
#[path = "presence_test.rs"]
mod tests;

use std::collections::HashMap;

use events::Profile;
use uuid::Uuid;

use crate::placement::Viewport;
use crate::throttle::CursorSample;

/// A peer as currently known: profile plus cursor position denormalized to
/// local viewport pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Roommate {
    pub profile: Profile,
    pub x: f64,
    pub y: f64,
}

/// Ownership-keyed table of live peers. Last write wins; no history.
#[derive(Debug, Default)]
pub struct Roster {
    entries: HashMap<Uuid, Roommate>,
}

impl Roster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a remote cursor update: denormalize against the local viewport
    /// and replace the peer's entire entry atomically.
    pub fn apply_cursor(
        &mut self,
        client_id: Uuid,
        sample: CursorSample,
        profile: Profile,
        viewport: Viewport,
    ) {
        let roommate = Roommate {
            profile,
            x: sample.x * viewport.width,
            y: sample.y * viewport.height,
        };
        self.entries.insert(client_id, roommate);
    }

    /// Evict a disconnected peer. Idempotent; returns whether it was known.
    pub fn evict(&mut self, client_id: Uuid) -> bool {
        self.entries.remove(&client_id).is_some()
    }

    #[must_use]
    pub fn get(&self, client_id: Uuid) -> Option<&Roommate> {
        self.entries.get(&client_id)
    }

    #[must_use]
    pub fn contains(&self, client_id: Uuid) -> bool {
        self.entries.contains_key(&client_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Uuid, &Roommate)> {
        self.entries.iter()
    }
}
