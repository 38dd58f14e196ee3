//! Event dispatcher: pure mapping between actions, relay events, and effects.
//!
//! DESIGN
//! ======
//! Dispatch is split from the transport so it can be tested on its own. A
//! local user action maps to an optimistic local effect plus the relay event
//! to emit; an inbound relay event maps to the same local effect a sender
//! produced for itself. The hub never reflects a sender's own events back,
//! so every action that should be visible to the sender carries its own
//! local echo.
//!
//! Malformed input (unknown kind, missing or unrecognized value) dispatches
//! to an empty effect list, never an error; one bad message must not take
//! down the session.

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod tests;

use events::{EventKind, RelayEvent};

/// Sounds the room knows how to play. Anything else is dropped.
pub const SOUNDS: [&str; 4] = ["drum", "cymbal", "guitar", "meme"];

/// A local user action, as raised by the input surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Chat(String),
    Emoji(String),
    Sound(String),
    Gif(String),
}

/// A local effect to apply against the ephemeral store (or audio output).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a chat bubble with centered placement.
    SpawnChat { text: String },
    /// Append an emoji burst with full-viewport placement.
    SpawnEmoji { emoji: String },
    /// Play the named sound and spawn a decorative music note.
    PlaySound { sound: String },
    /// Resolve the gif id asynchronously, then append on success.
    FetchGif { gif_id: String },
}

/// The two halves of an outbound dispatch: what happens locally right now,
/// and what goes over the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub local: Vec<Effect>,
    pub relay: Option<RelayEvent>,
}

/// Map a user action to its optimistic local effects and relay event.
#[must_use]
pub fn dispatch_action(action: &Action) -> Outbound {
    match action {
        Action::Chat(text) => Outbound {
            local: vec![Effect::SpawnChat { text: text.clone() }],
            relay: Some(RelayEvent::new(EventKind::Chat, text.clone())),
        },
        Action::Emoji(emoji) => Outbound {
            local: vec![Effect::SpawnEmoji { emoji: emoji.clone() }],
            relay: Some(RelayEvent::new(EventKind::Emoji, emoji.clone())),
        },
        Action::Sound(sound) if is_known_sound(sound) => Outbound {
            local: vec![Effect::PlaySound { sound: sound.clone() }],
            relay: Some(RelayEvent::new(EventKind::Sound, sound.clone())),
        },
        Action::Sound(_) => Outbound { local: Vec::new(), relay: None },
        Action::Gif(gif_id) => Outbound {
            local: vec![Effect::FetchGif { gif_id: gif_id.clone() }],
            relay: Some(RelayEvent::new(EventKind::Gif, gif_id.clone())),
        },
    }
}

/// Map an inbound relay event to local effects. Unknown kinds and missing
/// values are no-ops.
#[must_use]
pub fn dispatch_event(event: &RelayEvent) -> Vec<Effect> {
    let Some(value) = event.value.as_deref() else {
        return Vec::new();
    };

    match event.key {
        EventKind::Chat => vec![Effect::SpawnChat { text: value.to_owned() }],
        EventKind::Emoji => vec![Effect::SpawnEmoji { emoji: value.to_owned() }],
        EventKind::Sound if is_known_sound(value) => {
            vec![Effect::PlaySound { sound: value.to_owned() }]
        }
        EventKind::Gif => vec![Effect::FetchGif { gif_id: value.to_owned() }],
        EventKind::Sound | EventKind::Unknown => Vec::new(),
    }
}

/// Whether the sound name is part of the room's palette.
#[must_use]
pub fn is_known_sound(sound: &str) -> bool {
    SOUNDS.contains(&sound)
}
