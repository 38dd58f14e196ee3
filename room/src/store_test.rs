use uuid::Uuid;

use super::*;

fn chat(text: &str) -> ChatBubble {
    ChatBubble { key: Uuid::new_v4(), top: 10.0, left: 20.0, text: text.into(), is_centered: false }
}

fn emoji(glyph: &str) -> EmojiBurst {
    EmojiBurst { key: Uuid::new_v4(), top: 1.0, left: 2.0, emoji: glyph.into() }
}

#[test]
fn new_store_is_empty() {
    let store = EphemeralStore::new();
    assert!(store.is_empty());
    assert_eq!(store.len(), 0);
}

#[test]
fn len_tracks_appends_minus_removals() {
    let mut store = EphemeralStore::new();
    let a = chat("one");
    let b = emoji("🙌");
    let c = MusicNote { key: Uuid::new_v4(), top: 0.0, left: 0.0 };
    let b_key = b.key;

    store.push_chat(a);
    store.push_emoji(b);
    store.push_note(c);
    assert_eq!(store.len(), 3);

    assert!(store.remove(b_key));
    assert_eq!(store.len(), 2);
    assert!(store.emojis().is_empty());
    assert_eq!(store.chats().len(), 1);
}

#[test]
fn removing_absent_key_is_a_noop() {
    let mut store = EphemeralStore::new();
    store.push_chat(chat("hi"));

    assert!(!store.remove(Uuid::new_v4()));
    assert_eq!(store.len(), 1);
}

#[test]
fn remove_is_idempotent() {
    let mut store = EphemeralStore::new();
    let bubble = chat("hi");
    let key = bubble.key;
    store.push_chat(bubble);

    assert!(store.remove(key));
    assert!(!store.remove(key));
    assert!(store.is_empty());
}

#[test]
fn insertion_order_is_preserved_per_kind() {
    let mut store = EphemeralStore::new();
    store.push_chat(chat("first"));
    store.push_chat(chat("second"));
    store.push_chat(chat("third"));

    let texts: Vec<&str> = store.chats().iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, ["first", "second", "third"]);
}

#[test]
fn figures_carry_no_coordinates() {
    let mut store = EphemeralStore::new();
    store.push_figure(Figure { key: Uuid::new_v4(), kind: FigureKind::Gryphon });
    assert_eq!(store.figures().len(), 1);
    assert_eq!(store.figures()[0].kind, FigureKind::Gryphon);
}

#[test]
fn figure_kind_serde_is_lowercase() {
    let json = serde_json::to_string(&FigureKind::Gryphon).unwrap();
    assert_eq!(json, "\"gryphon\"");
}
