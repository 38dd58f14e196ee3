//! Shared message model and JSON codec for the realtime WS transport.
//!
//! This crate owns the wire representation used by both `hub` and `room`.
//! Messages are small internally-tagged JSON objects; the transport below
//! them guarantees per-connection ordering and nothing else, so every type
//! here is consumed once and never stored.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error returned by [`decode_client`] and [`decode_server`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The raw text could not be decoded as a known message.
    #[error("failed to decode message: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Per-connection participant profile, assigned by the hub on connect and
/// immutable for the lifetime of the connection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Display name shown next to the participant's cursor.
    pub name: String,
    /// Avatar reference (an asset key, not a URL).
    pub avatar: String,
}

/// Discriminant of a relayed ephemeral event.
///
/// Unknown kinds decode successfully and dispatch as no-ops; a peer running
/// a newer build must never be able to crash or desync an older one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Chat,
    Emoji,
    Sound,
    Gif,
    #[serde(other)]
    Unknown,
}

/// A fire-and-forget ephemeral event, relayed verbatim to every other
/// participant in the room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayEvent {
    /// Event discriminant.
    pub key: EventKind,
    /// Kind-specific payload: chat text, emoji glyph, sound name, or gif id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl RelayEvent {
    #[must_use]
    pub fn new(key: EventKind, value: impl Into<String>) -> Self {
        Self { key, value: Some(value.into()) }
    }
}

/// Messages a client sends to the hub.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Throttled pointer position, normalized to viewport fractions so that
    /// recipients with different viewport sizes render it proportionally.
    CursorMove { x: f64, y: f64 },
    /// An ephemeral event to rebroadcast to every other participant.
    Event {
        key: EventKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
}

impl From<RelayEvent> for ClientMessage {
    fn from(event: RelayEvent) -> Self {
        Self::Event { key: event.key, value: event.value }
    }
}

/// Messages the hub sends to a client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A peer's cursor moved. Carries the sender's profile so recipients can
    /// replace their cached entry atomically with the coordinates.
    CursorMove {
        client_id: Uuid,
        x: f64,
        y: f64,
        profile: Profile,
    },
    /// A relayed ephemeral event, forwarded verbatim.
    Event {
        key: EventKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    /// A new participant connected. Payload-free: recipients learn the
    /// newcomer's profile only once it moves or emits.
    NewUser,
    /// A participant disconnected; recipients evict it from local caches.
    RoommateDisconnect { client_id: Uuid },
    /// Self-addressed on connect: the profile the hub assigned to you.
    ProfileInfo { profile: Profile },
}

impl ServerMessage {
    /// Rebroadcast form of an inbound [`ClientMessage::Event`].
    #[must_use]
    pub fn relayed(event: RelayEvent) -> Self {
        Self::Event { key: event.key, value: event.value }
    }

    /// The relayed event carried by this message, if it is one.
    #[must_use]
    pub fn as_relay_event(&self) -> Option<RelayEvent> {
        match self {
            Self::Event { key, value } => Some(RelayEvent { key: *key, value: value.clone() }),
            _ => None,
        }
    }
}

/// Encode a client message as JSON text.
///
/// # Panics
///
/// Never panics in practice; serializing these types cannot fail.
#[must_use]
pub fn encode_client(message: &ClientMessage) -> String {
    serde_json::to_string(message).unwrap_or_default()
}

/// Encode a server message as JSON text.
#[must_use]
pub fn encode_server(message: &ServerMessage) -> String {
    serde_json::to_string(message).unwrap_or_default()
}

/// Decode JSON text into a client message.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] for malformed or unrecognized text.
pub fn decode_client(text: &str) -> Result<ClientMessage, CodecError> {
    Ok(serde_json::from_str(text)?)
}

/// Decode JSON text into a server message.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] for malformed or unrecognized text.
pub fn decode_server(text: &str) -> Result<ServerMessage, CodecError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
