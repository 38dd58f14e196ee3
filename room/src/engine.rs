//! The client-side lifecycle engine: one task owning all ephemeral state.
//!
//! DESIGN
//! ======
//! The engine exclusively owns the object store, the presence roster, the
//! cursor throttler, and the RNG. Every mutation funnels through `&mut self`
//! methods driven from a single caller loop, so there is no locking; the
//! cooperative scheduler serializes everything.
//!
//! Suspension points (gif resolution, scheduled expiry, tutorial delays) run
//! as fire-and-forget tasks that report back through the engine's internal
//! inbox instead of touching state directly. None of them are cancellable;
//! teardown drops the receiver and stops listening rather than rewinding
//! in-flight effects.
//!
//! LIFECYCLE
//! =========
//! 1. Caller feeds user input via `handle_action` / `handle_pointer`
//! 2. Caller feeds hub traffic via `handle_server`
//! 3. Background tasks feed the inbox; caller pumps `recv_internal` →
//!    `apply_internal`
//! 4. Each spawned object gets a kind-specific display duration, after which
//!    an `Expire` message deletes it by key

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;

use std::sync::Arc;
use std::time::{Duration, Instant};

use events::{ClientMessage, Profile, RelayEvent, ServerMessage};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::dispatch::{Action, Effect, dispatch_action, dispatch_event};
use crate::gif::{GifPayload, GifProvider};
use crate::placement::{Band, Viewport, random_point};
use crate::presence::Roster;
use crate::store::{
    ChatBubble, EmojiBurst, EphemeralStore, Figure, FigureKind, GifDrop, MusicNote, ObjectKey,
};
use crate::throttle::{CursorThrottler, normalize};
use crate::tutorial::{CHAT_SCRIPT, CHAT_STEP, FigureTicker, GIF_SCRIPT, script_position};

const INBOX_CAPACITY: usize = 256;

// =============================================================================
// CONFIG
// =============================================================================

/// How long each object kind stays visible before its scheduled removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirySchedule {
    pub chat: Duration,
    pub emoji: Duration,
    pub gif: Duration,
    pub note: Duration,
    pub figure: Duration,
}

impl Default for ExpirySchedule {
    fn default() -> Self {
        Self {
            chat: Duration::from_secs(12),
            emoji: Duration::from_secs(4),
            gif: Duration::from_secs(15),
            note: Duration::from_secs(2),
            figure: Duration::from_secs(20),
        }
    }
}

/// Engine construction parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub viewport: Viewport,
    pub expiry: ExpirySchedule,
    /// Seed for deterministic placement in tests; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(1280.0, 800.0),
            expiry: ExpirySchedule::default(),
            seed: None,
        }
    }
}

// =============================================================================
// INTERNAL MESSAGES
// =============================================================================

/// Messages from the engine's own background tasks back into the state owner.
#[derive(Debug, Clone, PartialEq)]
pub enum Internal {
    /// A gif resolved successfully and should be appended.
    SpawnGif(GifPayload),
    /// An object's display duration elapsed.
    Expire(ObjectKey),
    /// The next scripted tutorial chat message is due.
    ScriptChat { index: usize },
    /// The ambient figure ticker fired.
    SpawnFigure,
}

// =============================================================================
// ENGINE
// =============================================================================

pub struct Engine {
    viewport: Viewport,
    expiry: ExpirySchedule,
    rng: StdRng,
    store: EphemeralStore,
    roster: Roster,
    throttler: CursorThrottler,
    profile: Option<Profile>,
    provider: Arc<dyn GifProvider>,
    outbound: mpsc::Sender<ClientMessage>,
    inbox_tx: mpsc::Sender<Internal>,
    inbox_rx: mpsc::Receiver<Internal>,
}

impl Engine {
    #[must_use]
    pub fn new(
        config: EngineConfig,
        provider: Arc<dyn GifProvider>,
        outbound: mpsc::Sender<ClientMessage>,
    ) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::channel(INBOX_CAPACITY);
        let rng = config
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self {
            viewport: config.viewport,
            expiry: config.expiry,
            rng,
            store: EphemeralStore::new(),
            roster: Roster::new(),
            throttler: CursorThrottler::new(),
            profile: None,
            provider,
            outbound,
            inbox_tx,
            inbox_rx,
        }
    }

    /// Current ephemeral objects, for the rendering collaborator.
    #[must_use]
    pub fn store(&self) -> &EphemeralStore {
        &self.store
    }

    /// Current peer table, for the rendering collaborator.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The profile the hub assigned to this connection, once received.
    #[must_use]
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    // -------------------------------------------------------------------------
    // User input
    // -------------------------------------------------------------------------

    /// Dispatch a local user action: apply the optimistic echo and emit the
    /// relay event. Fire-and-forget: a full outbound channel drops the
    /// event rather than blocking input.
    pub fn handle_action(&mut self, action: &Action) {
        let out = dispatch_action(action);
        for effect in out.local {
            self.apply_effect(effect);
        }
        if let Some(relay) = out.relay {
            let _ = self.outbound.try_send(ClientMessage::from(relay));
        }
    }

    /// Feed a raw pointer position in local viewport pixels.
    pub fn handle_pointer(&mut self, x: f64, y: f64) {
        self.handle_pointer_at(x, y, Instant::now());
    }

    /// Pointer input with an explicit timestamp (tests).
    pub fn handle_pointer_at(&mut self, x: f64, y: f64, now: Instant) {
        let sample = normalize(x, y, self.viewport);
        if let Some(sample) = self.throttler.offer(sample, now) {
            let _ = self
                .outbound
                .try_send(ClientMessage::CursorMove { x: sample.x, y: sample.y });
        }
    }

    /// Emit the trailing cursor sample if due. Call on a short timer so the
    /// final resting position of a burst always goes out.
    pub fn flush_cursor(&mut self) {
        self.flush_cursor_at(Instant::now());
    }

    /// Trailing flush with an explicit timestamp (tests).
    pub fn flush_cursor_at(&mut self, now: Instant) {
        if let Some(sample) = self.throttler.flush(now) {
            let _ = self
                .outbound
                .try_send(ClientMessage::CursorMove { x: sample.x, y: sample.y });
        }
    }

    /// When the trailing cursor sample becomes due, if one is pending.
    #[must_use]
    pub fn cursor_deadline(&self) -> Option<Instant> {
        self.throttler.next_deadline()
    }

    /// Reserved-keypress path: spawn a decorative figure locally. Not
    /// broadcast; figures are the one ephemeral kind peers don't share.
    pub fn spawn_figure(&mut self) {
        self.spawn_figure_now();
    }

    // -------------------------------------------------------------------------
    // Hub traffic
    // -------------------------------------------------------------------------

    /// Apply one message from the hub. Never fails; malformed or unknown
    /// content degrades to a no-op.
    pub fn handle_server(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::CursorMove { client_id, x, y, profile } => {
                let sample = crate::throttle::CursorSample { x, y };
                self.roster.apply_cursor(client_id, sample, profile, self.viewport);
            }
            ServerMessage::Event { key, value } => {
                let event = RelayEvent { key, value };
                for effect in dispatch_event(&event) {
                    self.apply_effect(effect);
                }
            }
            ServerMessage::NewUser => {
                // Enter chime; audio output is the renderer's concern.
                debug!("roommate arrived");
            }
            ServerMessage::RoommateDisconnect { client_id } => {
                self.roster.evict(client_id);
                debug!(%client_id, "roommate disconnected");
            }
            ServerMessage::ProfileInfo { profile } => {
                debug!(name = %profile.name, "profile assigned");
                self.profile = Some(profile);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Internal inbox
    // -------------------------------------------------------------------------

    /// Receive the next message from background tasks. Pends while idle.
    pub async fn recv_internal(&mut self) -> Option<Internal> {
        self.inbox_rx.recv().await
    }

    /// Drain one internal message without waiting, for callers that poll the
    /// inbox between other loop arms.
    pub fn try_recv_internal(&mut self) -> Option<Internal> {
        self.inbox_rx.try_recv().ok()
    }

    /// Apply one internal message against the state.
    pub fn apply_internal(&mut self, message: Internal) {
        match message {
            Internal::SpawnGif(payload) => {
                let key = Uuid::new_v4();
                let at = random_point(&mut self.rng, self.viewport, Band::Centered);
                self.store
                    .push_gif(GifDrop { key, top: at.y, left: at.x, gif: payload });
                self.schedule_expiry(key, self.expiry.gif);
            }
            Internal::Expire(key) => {
                self.store.remove(key);
            }
            Internal::ScriptChat { index } => {
                let Some(text) = CHAT_SCRIPT.get(index) else {
                    return;
                };
                let key = Uuid::new_v4();
                let at = script_position(self.viewport, index, text);
                self.store.push_chat(ChatBubble {
                    key,
                    top: at.y,
                    left: at.x,
                    text: (*text).to_owned(),
                    is_centered: true,
                });
                self.schedule_expiry(key, self.expiry.chat);
            }
            Internal::SpawnFigure => self.spawn_figure_now(),
        }
    }

    // -------------------------------------------------------------------------
    // Scheduled sequences
    // -------------------------------------------------------------------------

    /// Play the one-shot onboarding sequence: independently-offset gif cues
    /// plus the strictly sequential chat script. Local only, no relay
    /// traffic, which is what makes the store transport-agnostic.
    pub fn play_tutorial(&self) {
        for cue in GIF_SCRIPT {
            let provider = Arc::clone(&self.provider);
            let inbox = self.inbox_tx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(cue.at).await;
                resolve_and_report(provider, inbox, cue.id).await;
            });
        }

        let inbox = self.inbox_tx.clone();
        tokio::spawn(async move {
            for index in 0..CHAT_SCRIPT.len() {
                if inbox.send(Internal::ScriptChat { index }).await.is_err() {
                    return;
                }
                tokio::time::sleep(CHAT_STEP).await;
            }
        });
    }

    /// Start the ambient figure ticker. Runs until the engine is dropped.
    pub fn start_figure_ticker(&self, ticker: FigureTicker) -> tokio::task::JoinHandle<()> {
        let inbox = self.inbox_tx.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(ticker.period);
            interval.tick().await; // first tick completes immediately
            loop {
                interval.tick().await;
                if ticker.should_spawn(&mut rand::rng()) {
                    if inbox.send(Internal::SpawnFigure).await.is_err() {
                        return;
                    }
                }
            }
        })
    }

    // -------------------------------------------------------------------------
    // Effects
    // -------------------------------------------------------------------------

    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::SpawnChat { text } => {
                let key = Uuid::new_v4();
                let at = random_point(&mut self.rng, self.viewport, Band::Centered);
                self.store
                    .push_chat(ChatBubble { key, top: at.y, left: at.x, text, is_centered: false });
                self.schedule_expiry(key, self.expiry.chat);
            }
            Effect::SpawnEmoji { emoji } => {
                let key = Uuid::new_v4();
                let at = random_point(&mut self.rng, self.viewport, Band::Full);
                self.store
                    .push_emoji(EmojiBurst { key, top: at.y, left: at.x, emoji });
                self.schedule_expiry(key, self.expiry.emoji);
            }
            Effect::PlaySound { sound } => {
                // Audio playback belongs to the renderer; the note is ours.
                debug!(%sound, "playing sound");
                let key = Uuid::new_v4();
                let at = random_point(&mut self.rng, self.viewport, Band::Full);
                self.store.push_note(MusicNote { key, top: at.y, left: at.x });
                self.schedule_expiry(key, self.expiry.note);
            }
            Effect::FetchGif { gif_id } => {
                let provider = Arc::clone(&self.provider);
                let inbox = self.inbox_tx.clone();
                tokio::spawn(async move {
                    resolve_and_report(provider, inbox, &gif_id).await;
                });
            }
        }
    }

    fn spawn_figure_now(&mut self) {
        let key = Uuid::new_v4();
        self.store.push_figure(Figure { key, kind: FigureKind::Gryphon });
        self.schedule_expiry(key, self.expiry.figure);
    }

    fn schedule_expiry(&self, key: ObjectKey, after: Duration) {
        let inbox = self.inbox_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = inbox.send(Internal::Expire(key)).await;
        });
    }
}

/// Resolve a gif and report success to the inbox. Failure is a dropped
/// event: logged at debug, surfaced to no one.
async fn resolve_and_report(
    provider: Arc<dyn GifProvider>,
    inbox: mpsc::Sender<Internal>,
    gif_id: &str,
) {
    match provider.resolve(gif_id).await {
        Ok(payload) => {
            let _ = inbox.send(Internal::SpawnGif(payload)).await;
        }
        Err(error) => {
            debug!(%error, gif_id, "gif lookup failed; event dropped");
        }
    }
}
