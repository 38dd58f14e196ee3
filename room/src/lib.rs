//! Client-side engine for the shared ephemeral canvas.
//!
//! Everything a participant runs locally: the ephemeral object store, the
//! pure action/event dispatcher, the cursor broadcast throttler, placement
//! policy, the presence roster, the gif provider seam, the scripted
//! onboarding sequence, and the engine task that owns all of it. The
//! transport binding (websocket or otherwise) lives with the caller; this
//! crate only consumes and produces `events` messages.

pub mod dispatch;
pub mod engine;
pub mod gif;
pub mod placement;
pub mod presence;
pub mod store;
pub mod throttle;
pub mod tutorial;

pub use dispatch::{Action, Effect};
pub use engine::{Engine, EngineConfig, ExpirySchedule, Internal};
pub use gif::{GifError, GifPayload, GifProvider, GiphyClient};
pub use placement::{Band, Point, Viewport};
pub use presence::{Roommate, Roster};
pub use store::EphemeralStore;
pub use throttle::{CURSOR_INTERVAL, CursorSample, CursorThrottler};
pub use tutorial::FigureTicker;
