//! Placement policy: where new ephemeral objects land on screen.
//!
//! Two sampling bands over the local viewport: the full viewport for
//! decorative bursts (emoji, music notes) and the middle half of each axis
//! for readable content (chat, gifs), keeping it away from screen edges.
//! Pure functions over an injected RNG so placement is testable with a
//! seeded generator.

#[cfg(test)]
#[path = "placement_test.rs"]
mod tests;

use rand::Rng;

/// Local viewport dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Sampling band for a new object's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// Uniform over the whole viewport.
    Full,
    /// Uniform over the middle half of each axis: `[w/4, 3w/4] × [h/4, 3h/4]`.
    Centered,
}

/// An on-screen position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Sample a position within the band. Degenerate viewports (zero or negative
/// extents) collapse to the band's lower corner rather than panicking.
pub fn random_point(rng: &mut impl Rng, viewport: Viewport, band: Band) -> Point {
    match band {
        Band::Full => Point {
            x: uniform(rng, 0.0, viewport.width),
            y: uniform(rng, 0.0, viewport.height),
        },
        Band::Centered => Point {
            x: uniform(rng, viewport.width / 4.0, viewport.width * 3.0 / 4.0),
            y: uniform(rng, viewport.height / 4.0, viewport.height * 3.0 / 4.0),
        },
    }
}

fn uniform(rng: &mut impl Rng, lo: f64, hi: f64) -> f64 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}
