//! Scripted onboarding sequence and ambient figure trigger.
//!
//! DESIGN
//! ======
//! A one-shot, local-only playback for first-time viewers: a fixed gif
//! schedule where each cue is independently offset from the start, and a
//! fixed chat script appended strictly sequentially with a constant delay
//! between messages. Both ride the same spawn primitives as live events and
//! never touch the network, which is what makes the store transport-agnostic.
//!
//! The figure ticker is the separate low-probability ambient trigger: every
//! period it flips a biased coin and maybe spawns a decorative figure,
//! locally only. The coin is a pure function of an injected RNG so the
//! probability is testable with a seeded generator.

#[cfg(test)]
#[path = "tutorial_test.rs"]
mod tests;

use std::time::Duration;

use rand::Rng;

use crate::placement::{Point, Viewport};

/// Delay between consecutive scripted chat messages.
pub const CHAT_STEP: Duration = Duration::from_millis(1000);

/// Chat script shown to every fresh session, top to bottom.
pub const CHAT_SCRIPT: [&str; 14] = [
    "welcome to the room",
    "everyone at this url",
    "sees 👀 & hears 👂",
    "the same things",
    "text",
    "sounds",
    "emojis 🙌",
    "gifs",
    "cursors too",
    "nothing is saved",
    "everything fades",
    "try it !",
    "😊 bring a friend 😊",
    "have fun",
];

/// A gif cue: which gif to resolve and when, relative to sequence start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GifCue {
    pub id: &'static str,
    pub at: Duration,
}

/// Gif schedule; each cue is independently time-offset, not sequential.
pub const GIF_SCRIPT: [GifCue; 4] = [
    GifCue { id: "cPZ582I9Mxtk6crJ37", at: Duration::from_millis(0) },
    GifCue { id: "l4pT6w42S93xNKz2U", at: Duration::from_millis(3000) },
    GifCue { id: "42YlR8u9gV5Cw", at: Duration::from_millis(10_000) },
    GifCue { id: "3og0IzoPfRVwyxjDUs", at: Duration::from_millis(15_000) },
];

/// Position of the `index`-th scripted chat message: a column centered
/// horizontally on the message text, stepping down from the top tenth of
/// the viewport.
#[must_use]
pub fn script_position(viewport: Viewport, index: usize, text: &str) -> Point {
    let chars = text.chars().count();
    #[allow(clippy::cast_precision_loss)]
    Point {
        x: viewport.width / 2.0 - (chars as f64) * 5.0,
        y: viewport.height * 0.1 + (index as f64) * 25.0,
    }
}

// =============================================================================
// FIGURE TICKER
// =============================================================================

/// Recurring low-probability local figure spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureTicker {
    pub period: Duration,
    pub probability: f64,
}

impl FigureTicker {
    #[must_use]
    pub const fn new() -> Self {
        Self { period: Duration::from_secs(10), probability: 0.1 }
    }

    /// One tick of the biased coin.
    pub fn should_spawn(&self, rng: &mut impl Rng) -> bool {
        rng.random::<f64>() < self.probability
    }
}

impl Default for FigureTicker {
    fn default() -> Self {
        Self::new()
    }
}
