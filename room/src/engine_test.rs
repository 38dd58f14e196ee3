use events::EventKind;
use tokio::time::timeout;

use super::*;
use crate::gif::GifError;

// =============================================================================
// TEST HELPERS
// =============================================================================

struct MockGif {
    fail: bool,
}

#[async_trait::async_trait]
impl GifProvider for MockGif {
    async fn resolve(&self, id: &str) -> Result<GifPayload, GifError> {
        if self.fail {
            return Err(GifError::Status { status: 404 });
        }
        Ok(GifPayload {
            id: id.to_owned(),
            title: "mock".into(),
            url: format!("https://media.example/{id}.gif"),
            width: 480,
            height: 270,
        })
    }
}

fn test_engine(fail_gifs: bool) -> (Engine, mpsc::Receiver<ClientMessage>) {
    let (outbound_tx, outbound_rx) = mpsc::channel(64);
    let config = EngineConfig {
        viewport: Viewport::new(1000.0, 800.0),
        expiry: ExpirySchedule::default(),
        seed: Some(7),
    };
    let engine = Engine::new(config, Arc::new(MockGif { fail: fail_gifs }), outbound_tx);
    (engine, outbound_rx)
}

fn profile(name: &str) -> Profile {
    Profile { name: name.into(), avatar: "gryphon".into() }
}

/// Pump internal messages until `done` returns true or the deadline hits.
async fn pump_until(
    engine: &mut Engine,
    seen: &mut Vec<Internal>,
    done: impl Fn(&[Internal]) -> bool,
) {
    while !done(seen) {
        let message = timeout(Duration::from_secs(60), engine.recv_internal())
            .await
            .expect("internal message timed out")
            .expect("engine inbox closed");
        engine.apply_internal(message.clone());
        seen.push(message);
    }
}

// =============================================================================
// OPTIMISTIC ECHO + RELAY
// =============================================================================

#[tokio::test]
async fn chat_action_echoes_locally_and_relays() {
    let (mut engine, mut outbound) = test_engine(false);

    engine.handle_action(&Action::Chat("hi".into()));

    // Optimistic echo, independent of any relay round trip.
    assert_eq!(engine.store().chats().len(), 1);
    let bubble = &engine.store().chats()[0];
    assert_eq!(bubble.text, "hi");
    assert!(!bubble.is_centered);
    // Centered placement band.
    assert!(bubble.left >= 250.0 && bubble.left <= 750.0);
    assert!(bubble.top >= 200.0 && bubble.top <= 600.0);

    let sent = outbound.try_recv().unwrap();
    assert_eq!(
        sent,
        ClientMessage::Event { key: EventKind::Chat, value: Some("hi".into()) }
    );
}

#[tokio::test]
async fn emoji_action_uses_full_viewport_band() {
    let (mut engine, mut outbound) = test_engine(false);

    engine.handle_action(&Action::Emoji("🙌".into()));

    assert_eq!(engine.store().emojis().len(), 1);
    let burst = &engine.store().emojis()[0];
    assert!(burst.left >= 0.0 && burst.left < 1000.0);
    assert!(burst.top >= 0.0 && burst.top < 800.0);
    assert!(outbound.try_recv().is_ok());
}

#[tokio::test]
async fn sound_action_spawns_note_and_relays() {
    let (mut engine, mut outbound) = test_engine(false);

    engine.handle_action(&Action::Sound("drum".into()));

    assert_eq!(engine.store().notes().len(), 1);
    assert_eq!(
        outbound.try_recv().unwrap(),
        ClientMessage::Event { key: EventKind::Sound, value: Some("drum".into()) }
    );
}

// =============================================================================
// REMOTE EVENTS
// =============================================================================

#[tokio::test]
async fn remote_chat_event_appends_exactly_one_bubble() {
    let (mut engine, mut outbound) = test_engine(false);

    engine.handle_server(ServerMessage::Event {
        key: EventKind::Chat,
        value: Some("hi".into()),
    });

    assert_eq!(engine.store().chats().len(), 1);
    assert_eq!(engine.store().chats()[0].text, "hi");
    // Remote events never produce outbound traffic.
    assert!(outbound.try_recv().is_err());
}

#[tokio::test]
async fn unknown_or_valueless_events_are_noops() {
    let (mut engine, _outbound) = test_engine(false);

    engine.handle_server(ServerMessage::Event { key: EventKind::Unknown, value: Some("x".into()) });
    engine.handle_server(ServerMessage::Event { key: EventKind::Chat, value: None });
    engine.handle_server(ServerMessage::Event { key: EventKind::Sound, value: Some("kazoo".into()) });

    assert!(engine.store().is_empty());
}

#[tokio::test(start_paused = true)]
async fn remote_gif_event_resolves_then_appends() {
    let (mut engine, _outbound) = test_engine(false);

    engine.handle_server(ServerMessage::Event {
        key: EventKind::Gif,
        value: Some("abc123".into()),
    });

    let mut seen = Vec::new();
    pump_until(&mut engine, &mut seen, |s| {
        s.iter().any(|m| matches!(m, Internal::SpawnGif(_)))
    })
    .await;

    assert_eq!(engine.store().gifs().len(), 1);
    assert_eq!(engine.store().gifs()[0].gif.id, "abc123");
}

#[tokio::test(start_paused = true)]
async fn failed_gif_resolution_is_swallowed() {
    let (mut engine, _outbound) = test_engine(true);

    engine.handle_server(ServerMessage::Event {
        key: EventKind::Gif,
        value: Some("missing".into()),
    });

    // The lookup fails; nothing reaches the inbox and nothing appends.
    let quiet = timeout(Duration::from_millis(200), engine.recv_internal()).await;
    assert!(quiet.is_err());
    assert!(engine.store().gifs().is_empty());
}

// =============================================================================
// EXPIRY
// =============================================================================

#[tokio::test(start_paused = true)]
async fn objects_expire_after_display_duration() {
    let (mut engine, _outbound) = test_engine(false);

    engine.handle_action(&Action::Emoji("🙌".into()));
    assert_eq!(engine.store().len(), 1);

    let expired = engine.recv_internal().await.unwrap();
    assert!(matches!(expired, Internal::Expire(_)));
    engine.apply_internal(expired);
    assert!(engine.store().is_empty());
}

#[tokio::test(start_paused = true)]
async fn expiry_of_already_removed_key_is_harmless() {
    let (mut engine, _outbound) = test_engine(false);

    engine.handle_action(&Action::Emoji("🙌".into()));
    let key = engine.store().emojis()[0].key;
    engine.apply_internal(Internal::Expire(key));
    assert!(engine.store().is_empty());

    // The scheduled timer fires later for the same key.
    let expired = engine.recv_internal().await.unwrap();
    engine.apply_internal(expired);
    assert!(engine.store().is_empty());
}

// =============================================================================
// CURSOR
// =============================================================================

#[tokio::test]
async fn pointer_burst_is_throttled_with_trailing_flush() {
    let (mut engine, mut outbound) = test_engine(false);
    let start = Instant::now();

    for i in 0..10u32 {
        let at = start + Duration::from_millis(u64::from(i) * 10);
        engine.handle_pointer_at(500.0, f64::from(i) * 10.0, at);
    }

    // Leading edge only within the burst window.
    let first = outbound.try_recv().unwrap();
    assert!(matches!(first, ClientMessage::CursorMove { .. }));
    assert!(outbound.try_recv().is_err());

    // Trailing flush carries the final sample, normalized.
    engine.flush_cursor_at(start + Duration::from_millis(200));
    let ClientMessage::CursorMove { x, y } = outbound.try_recv().unwrap() else {
        panic!("expected trailing cursor move");
    };
    assert!((x - 0.5).abs() < f64::EPSILON);
    assert!((y - 90.0 / 800.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn remote_cursor_updates_roster_atomically() {
    let (mut engine, _outbound) = test_engine(false);
    let peer = Uuid::new_v4();

    engine.handle_server(ServerMessage::CursorMove {
        client_id: peer,
        x: 0.5,
        y: 0.5,
        profile: profile("ada"),
    });

    let roommate = engine.roster().get(peer).unwrap();
    assert!((roommate.x - 500.0).abs() < f64::EPSILON);
    assert!((roommate.y - 400.0).abs() < f64::EPSILON);
    assert_eq!(roommate.profile.name, "ada");
}

#[tokio::test]
async fn roommate_disconnect_evicts_peer() {
    let (mut engine, _outbound) = test_engine(false);
    let peer = Uuid::new_v4();

    engine.handle_server(ServerMessage::CursorMove {
        client_id: peer,
        x: 0.1,
        y: 0.1,
        profile: profile("ada"),
    });
    assert!(engine.roster().contains(peer));

    engine.handle_server(ServerMessage::RoommateDisconnect { client_id: peer });
    assert!(!engine.roster().contains(peer));
}

// =============================================================================
// PROFILE / FIGURES
// =============================================================================

#[tokio::test]
async fn profile_info_is_stored() {
    let (mut engine, _outbound) = test_engine(false);
    assert!(engine.profile().is_none());

    engine.handle_server(ServerMessage::ProfileInfo { profile: profile("amber gryphon") });
    assert_eq!(engine.profile().unwrap().name, "amber gryphon");
}

#[tokio::test]
async fn figure_spawn_is_local_only() {
    let (mut engine, mut outbound) = test_engine(false);

    engine.spawn_figure();

    assert_eq!(engine.store().figures().len(), 1);
    assert_eq!(engine.store().figures()[0].kind, FigureKind::Gryphon);
    assert!(outbound.try_recv().is_err());
}

// =============================================================================
// TUTORIAL
// =============================================================================

#[tokio::test(start_paused = true)]
async fn tutorial_plays_chat_script_sequentially_and_resolves_gifs() {
    let (mut engine, mut outbound) = test_engine(false);

    engine.play_tutorial();

    let mut seen = Vec::new();
    pump_until(&mut engine, &mut seen, |s| {
        let chats = s.iter().filter(|m| matches!(m, Internal::ScriptChat { .. })).count();
        let gifs = s.iter().filter(|m| matches!(m, Internal::SpawnGif(_))).count();
        chats == CHAT_SCRIPT.len() && gifs == GIF_SCRIPT.len()
    })
    .await;

    // Chat script arrived strictly in order.
    let indices: Vec<usize> = seen
        .iter()
        .filter_map(|m| match m {
            Internal::ScriptChat { index } => Some(*index),
            _ => None,
        })
        .collect();
    let expected: Vec<usize> = (0..CHAT_SCRIPT.len()).collect();
    assert_eq!(indices, expected);

    // Scripted bubbles are styled as centered.
    assert!(engine.store().chats().iter().all(|c| c.is_centered));

    // Entirely local: the tutorial emits no relay traffic.
    assert!(outbound.try_recv().is_err());
}

#[tokio::test]
async fn out_of_range_script_index_is_ignored() {
    let (mut engine, _outbound) = test_engine(false);
    engine.apply_internal(Internal::ScriptChat { index: CHAT_SCRIPT.len() + 5 });
    assert!(engine.store().is_empty());
}
