use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

#[test]
fn gif_cues_are_independently_offset_and_ordered() {
    assert_eq!(GIF_SCRIPT[0].at, Duration::ZERO);
    for pair in GIF_SCRIPT.windows(2) {
        assert!(pair[0].at < pair[1].at);
    }
}

#[test]
fn chat_script_is_nonempty_and_short_lines() {
    assert!(!CHAT_SCRIPT.is_empty());
    for line in CHAT_SCRIPT {
        assert!(!line.is_empty());
        assert!(line.chars().count() < 40);
    }
}

#[test]
fn script_positions_step_down_in_a_column() {
    let viewport = Viewport::new(1000.0, 800.0);

    let first = script_position(viewport, 0, "hello");
    let second = script_position(viewport, 1, "hello");
    assert!((first.y - 80.0).abs() < f64::EPSILON);
    assert!((second.y - first.y - 25.0).abs() < f64::EPSILON);
}

#[test]
fn script_position_centers_on_text_length() {
    let viewport = Viewport::new(1000.0, 800.0);

    // 4 chars: offset 20px left of center.
    let p = script_position(viewport, 0, "abcd");
    assert!((p.x - 480.0).abs() < f64::EPSILON);

    // Multi-byte glyphs count as single characters.
    let emoji = script_position(viewport, 0, "🙌🙌");
    assert!((emoji.x - 490.0).abs() < f64::EPSILON);
}

#[test]
fn figure_ticker_probability_holds_under_seeded_rng() {
    let ticker = FigureTicker::new();
    let mut rng = StdRng::seed_from_u64(1234);

    let spawns = (0..10_000).filter(|_| ticker.should_spawn(&mut rng)).count();
    // ~10% of ticks.
    assert!((700..1300).contains(&spawns), "spawns = {spawns}");
}

#[test]
fn figure_ticker_extremes() {
    let mut rng = StdRng::seed_from_u64(5);

    let never = FigureTicker { period: Duration::from_secs(10), probability: 0.0 };
    assert!((0..100).all(|_| !never.should_spawn(&mut rng)));

    let always = FigureTicker { period: Duration::from_secs(10), probability: 1.0 };
    assert!((0..100).all(|_| always.should_spawn(&mut rng)));
}
