//! Cursor broadcast throttler: rate-bounded, trailing-edge pointer relay.
//!
//! DESIGN
//! ======
//! At most one outbound cursor message per interval. Bursts collapse to the
//! most recent sample (last-write-wins); the trailing flush guarantees the
//! final resting position of a burst is always eventually sent, so peers
//! never see a cursor frozen mid-move.
//!
//! Timing is passed in explicitly (`Instant` arguments) rather than read
//! from the clock, so tests control time without sleeping.

#[cfg(test)]
#[path = "throttle_test.rs"]
mod tests;

use std::time::{Duration, Instant};

use crate::placement::Viewport;

/// Default minimum spacing between outbound cursor messages.
pub const CURSOR_INTERVAL: Duration = Duration::from_millis(200);

/// A pointer position normalized to viewport fractions in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorSample {
    pub x: f64,
    pub y: f64,
}

/// Normalize pixel coordinates against the local viewport, clamped to
/// `[0, 1]`. A degenerate viewport axis maps to `0.0`.
#[must_use]
pub fn normalize(x: f64, y: f64, viewport: Viewport) -> CursorSample {
    CursorSample { x: fraction(x, viewport.width), y: fraction(y, viewport.height) }
}

fn fraction(value: f64, extent: f64) -> f64 {
    if extent > 0.0 { (value / extent).clamp(0.0, 1.0) } else { 0.0 }
}

/// Leading-plus-trailing-edge throttler for cursor samples.
#[derive(Debug)]
pub struct CursorThrottler {
    interval: Duration,
    last_emit: Option<Instant>,
    pending: Option<CursorSample>,
}

impl CursorThrottler {
    #[must_use]
    pub fn new() -> Self {
        Self::with_interval(CURSOR_INTERVAL)
    }

    #[must_use]
    pub fn with_interval(interval: Duration) -> Self {
        Self { interval, last_emit: None, pending: None }
    }

    /// Offer a fresh pointer sample. Returns the sample when it should be
    /// sent immediately (leading edge); otherwise retains it as the pending
    /// trailing sample, replacing any previous one.
    pub fn offer(&mut self, sample: CursorSample, now: Instant) -> Option<CursorSample> {
        if self.is_open(now) {
            self.last_emit = Some(now);
            self.pending = None;
            Some(sample)
        } else {
            self.pending = Some(sample);
            None
        }
    }

    /// Emit the pending trailing sample if the interval has elapsed.
    pub fn flush(&mut self, now: Instant) -> Option<CursorSample> {
        let sample = self.pending?;
        if self.is_open(now) {
            self.last_emit = Some(now);
            self.pending = None;
            Some(sample)
        } else {
            None
        }
    }

    /// When the pending trailing sample becomes eligible, if there is one.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending?;
        // A pending sample implies a prior emission within the interval.
        self.last_emit.map(|at| at + self.interval)
    }

    fn is_open(&self, now: Instant) -> bool {
        self.last_emit
            .is_none_or(|at| now.duration_since(at) >= self.interval)
    }
}

impl Default for CursorThrottler {
    fn default() -> Self {
        Self::new()
    }
}
