//! Ephemeral object store: the transient visual objects currently on screen.
//!
//! DESIGN
//! ======
//! One append-only set per object kind, keyed by a collision-resistant random
//! `Uuid`. Objects are never mutated after insertion; the only transition is
//! removal by key, scheduled independently per object by whoever owns the
//! display duration. Nothing here survives process exit; loss on teardown is
//! expected and acceptable.
//!
//! The store is transport-agnostic: a locally-sourced tutorial append and a
//! relayed live event are indistinguishable from its point of view.

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::gif::GifPayload;

/// Unique key for an ephemeral object, valid for the object's lifetime.
pub type ObjectKey = Uuid;

/// A floating chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatBubble {
    pub key: ObjectKey,
    pub top: f64,
    pub left: f64,
    pub text: String,
    /// Scripted messages are laid out as a centered column and styled so.
    pub is_centered: bool,
}

/// A single emoji burst.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmojiBurst {
    pub key: ObjectKey,
    pub top: f64,
    pub left: f64,
    pub emoji: String,
}

/// A dropped gif, present only after its payload resolved successfully.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GifDrop {
    pub key: ObjectKey,
    pub top: f64,
    pub left: f64,
    pub gif: GifPayload,
}

/// Decorative music note spawned alongside a sound event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MusicNote {
    pub key: ObjectKey,
    pub top: f64,
    pub left: f64,
}

/// Decorative creature kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FigureKind {
    Gryphon,
}

/// A decorative figure. Carries no coordinates: the renderer owns figure
/// layout entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Figure {
    pub key: ObjectKey,
    pub kind: FigureKind,
}

/// In-memory store of all currently-visible ephemeral objects.
#[derive(Debug, Default)]
pub struct EphemeralStore {
    chats: Vec<ChatBubble>,
    emojis: Vec<EmojiBurst>,
    gifs: Vec<GifDrop>,
    notes: Vec<MusicNote>,
    figures: Vec<Figure>,
}

impl EphemeralStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_chat(&mut self, bubble: ChatBubble) {
        self.chats.push(bubble);
    }

    pub fn push_emoji(&mut self, burst: EmojiBurst) {
        self.emojis.push(burst);
    }

    pub fn push_gif(&mut self, drop: GifDrop) {
        self.gifs.push(drop);
    }

    pub fn push_note(&mut self, note: MusicNote) {
        self.notes.push(note);
    }

    pub fn push_figure(&mut self, figure: Figure) {
        self.figures.push(figure);
    }

    /// Remove the object with the given key, whatever its kind.
    ///
    /// Keys are globally unique across kinds, so at most one object matches.
    /// Removing an absent key is a no-op and returns `false`.
    pub fn remove(&mut self, key: ObjectKey) -> bool {
        let before = self.len();
        self.chats.retain(|o| o.key != key);
        self.emojis.retain(|o| o.key != key);
        self.gifs.retain(|o| o.key != key);
        self.notes.retain(|o| o.key != key);
        self.figures.retain(|o| o.key != key);
        self.len() != before
    }

    /// Total number of live objects across every kind.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chats.len() + self.emojis.len() + self.gifs.len() + self.notes.len() + self.figures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Chat bubbles in insertion (render) order.
    #[must_use]
    pub fn chats(&self) -> &[ChatBubble] {
        &self.chats
    }

    #[must_use]
    pub fn emojis(&self) -> &[EmojiBurst] {
        &self.emojis
    }

    #[must_use]
    pub fn gifs(&self) -> &[GifDrop] {
        &self.gifs
    }

    #[must_use]
    pub fn notes(&self) -> &[MusicNote] {
        &self.notes
    }

    #[must_use]
    pub fn figures(&self) -> &[Figure] {
        &self.figures
    }
}
