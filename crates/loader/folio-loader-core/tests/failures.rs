mod common;

use common::{Behavior, SimHost};
use folio_loader::{Completion, Effect, FailureKind, HandleState, LoaderConfig, LoaderEvent};

#[test]
fn missing_source_fails_without_blocking() {
    let mut sim = SimHost::new(LoaderConfig::default());
    let (card_a, a) = sim.add_image(None, Behavior::Never);
    let (_, b) = sim.add_image(Some("b.jpg"), Behavior::DecodeAfter(10));
    sim.visible(a);
    sim.visible(b);

    assert_eq!(
        sim.loader.state(a),
        Some(HandleState::Done(Completion::Failed(FailureKind::MissingSource)))
    );
    assert!(!sim.has_class(card_a, "reveal-from-bottom"));
    sim.advance(1_000);
    assert_eq!(sim.started_at(b), Some(120));
    assert_eq!(
        sim.loader.state(b),
        Some(HandleState::Done(Completion::Loaded))
    );
    assert!(sim.skeletons.is_empty());
}

#[test]
fn load_error_skips_reveal_and_advances() {
    let mut sim = SimHost::new(LoaderConfig::default());
    let (card_a, a) = sim.add_image(Some("broken.jpg"), Behavior::ErrorAfter(60));
    let (card_b, b) = sim.add_image(Some("ok.jpg"), Behavior::DecodeAfter(60));
    sim.visible(a);
    sim.visible(b);
    sim.advance(2_000);

    assert_eq!(
        sim.loader.state(a),
        Some(HandleState::Done(Completion::Failed(FailureKind::LoadError)))
    );
    assert!(sim.shown.contains(&a));
    assert!(sim.skeleton_removed_at(card_a).is_some());
    assert!(!sim
        .effects
        .iter()
        .any(|(_, e)| matches!(e, Effect::AddCardClass { card, .. } if *card == card_a)));
    assert!(sim
        .effects
        .iter()
        .any(|(_, e)| matches!(e, Effect::AddCardClass { card, .. } if *card == card_b)));
    assert_eq!(sim.completed_at(b), Some(60 + 120 + 60));
}

#[test]
fn stalled_image_is_forced_after_timeout() {
    let mut sim = SimHost::new(LoaderConfig::default());
    let (card, a) = sim.add_image(Some("slow.jpg"), Behavior::Never);
    let (_, b) = sim.add_image(Some("b.jpg"), Behavior::DecodeAfter(10));
    sim.advance(250);
    sim.visible(a);
    sim.visible(b);

    sim.advance(4_999);
    assert_eq!(sim.loader.state(a), Some(HandleState::Loading));
    sim.advance(1);
    assert_eq!(sim.completed_at(a), Some(250 + 5_000));
    assert_eq!(
        sim.loader.state(a),
        Some(HandleState::Done(Completion::Failed(FailureKind::Stalled)))
    );
    sim.advance(300);
    assert!(!sim.skeletons.contains(&card));
    assert_eq!(sim.started_at(b), Some(250 + 5_000 + 120));
}

#[test]
fn silent_decode_is_caught_by_probe() {
    let mut sim = SimHost::new(LoaderConfig::default());
    let (_, a) = sim.add_image(Some("cached.jpg"), Behavior::SilentDecodeAfter(70));
    sim.visible(a);
    sim.advance(1_000);
    // Probes run every 50ms; the first one at or after 70ms is at 100ms.
    assert_eq!(sim.completed_at(a), Some(100));
    assert_eq!(
        sim.loader.state(a),
        Some(HandleState::Done(Completion::Loaded))
    );
}

#[test]
fn fallback_sweep_forces_discovered_images_three_seconds_after_load() {
    let mut sim = SimHost::new(LoaderConfig::default());
    let (card_a, a) = sim.add_image(Some("hang.jpg"), Behavior::Never);
    let (card_b, b) = sim.add_image(Some("queued.jpg"), Behavior::DecodeAfter(10));
    let (card_c, c) = sim.add_image(Some("offscreen.jpg"), Behavior::DecodeAfter(10));
    sim.page_loaded();
    sim.visible(a);
    sim.visible(b);

    sim.advance(3_000);
    for h in [a, b] {
        assert_eq!(
            sim.loader.state(h),
            Some(HandleState::Done(Completion::Failed(FailureKind::Stalled))),
            "{h:?}"
        );
        assert!(sim.shown.contains(&h));
        assert_eq!(sim.completion_count(h), 1);
    }
    assert_eq!(sim.loader.queue_len(), 0);
    assert!(sim
        .events
        .iter()
        .any(|(at, e)| *at == 3_000 && *e == LoaderEvent::FallbackSwept { forced: 2 }));

    // Never discovered: untouched and still waiting for visibility.
    assert_eq!(sim.loader.state(c), Some(HandleState::Pending));
    assert!(sim.observed.contains(&c));
    assert!(!sim.shown.contains(&c));

    sim.advance(300);
    for card in [card_a, card_b] {
        assert!(!sim.skeletons.contains(&card));
        assert!(!sim.has_class(card, "loading"));
    }
    assert!(sim.skeletons.contains(&card_c));

    // The per-image timeout of the hung image fires later and changes nothing.
    sim.advance(10_000);
    assert_eq!(sim.completion_count(a), 1);
}

#[test]
fn image_discovered_after_the_sweep_still_loads_in_turn() {
    let mut sim = SimHost::new(LoaderConfig::default());
    let (_, a) = sim.add_image(Some("a.jpg"), Behavior::DecodeAfter(40));
    let (card_b, b) = sim.add_image(Some("below-fold.jpg"), Behavior::DecodeAfter(40));
    sim.visible(a);
    sim.page_loaded();
    sim.advance(3_000);
    assert_eq!(sim.loader.state(b), Some(HandleState::Pending));

    sim.visible(b);
    assert_eq!(sim.started_at(b), Some(3_000));
    sim.advance(40);
    assert_eq!(sim.completed_at(b), Some(3_040));
    assert_eq!(
        sim.loader.state(b),
        Some(HandleState::Done(Completion::Loaded))
    );
    assert!(sim.has_class(card_b, "reveal-from-bottom"));
    sim.advance(300);
    assert!(!sim.skeletons.contains(&card_b));
}

#[test]
fn late_arming_sweeps_on_the_original_deadline() {
    let mut sim = SimHost::new(LoaderConfig::default());
    let (_, a) = sim.add_image(Some("hang.jpg"), Behavior::Never);
    sim.visible(a);
    // The load event fired 2.5s before the loader came up.
    sim.page_loaded_ago(2_500);

    sim.advance(499);
    assert_eq!(sim.loader.state(a), Some(HandleState::Loading));
    sim.advance(1);
    assert_eq!(sim.completed_at(a), Some(500));
    assert!(sim
        .events
        .iter()
        .any(|(at, e)| *at == 500 && *e == LoaderEvent::FallbackSwept { forced: 1 }));
}
