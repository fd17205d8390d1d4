mod common;

use common::{Behavior, SimHost};
use folio_loader::{Completion, HandleState, LoaderConfig, LoaderEvent, Phase};

#[test]
fn three_images_reveal_one_after_another() {
    let mut sim = SimHost::new(LoaderConfig::default());
    let (card_a, a) = sim.add_image(Some("a.jpg"), Behavior::DecodeAfter(200));
    let (card_b, b) = sim.add_image(Some("b.jpg"), Behavior::DecodeAfter(200));
    let (card_c, c) = sim.add_image(Some("c.jpg"), Behavior::DecodeAfter(200));

    // All three enter the margin in the same intersection batch.
    sim.visible(a);
    sim.visible(b);
    sim.visible(c);
    assert_eq!(sim.loader.in_flight(), Some(a));
    assert_eq!(sim.loader.queue_len(), 2);

    sim.advance(10_000);

    let done_a = sim.completed_at(a).unwrap();
    let done_b = sim.completed_at(b).unwrap();
    let done_c = sim.completed_at(c).unwrap();
    assert_eq!(done_a, 200);
    // Next load begins after the 120ms desktop delay, then takes 200ms.
    assert_eq!(sim.started_at(b), Some(done_a + 120));
    assert_eq!(done_b, done_a + 120 + 200);
    assert_eq!(sim.started_at(c), Some(done_b + 120));
    assert_eq!(done_c, done_b + 120 + 200);

    let gone_a = sim.skeleton_removed_at(card_a).unwrap();
    let gone_b = sim.skeleton_removed_at(card_b).unwrap();
    let gone_c = sim.skeleton_removed_at(card_c).unwrap();
    assert!(gone_a < gone_b && gone_b < gone_c);
    assert!(done_a < gone_b);
    assert_eq!(sim.max_in_flight, 1);
    assert!(sim.skeletons.is_empty());
    assert_eq!(sim.loader.phase(), Phase::Idle);
}

#[test]
fn dequeue_follows_discovery_order_not_registration_order() {
    let mut sim = SimHost::new(LoaderConfig::default());
    let (_, a) = sim.add_image(Some("a.jpg"), Behavior::DecodeAfter(10));
    let (_, b) = sim.add_image(Some("b.jpg"), Behavior::DecodeAfter(10));
    let (_, c) = sim.add_image(Some("c.jpg"), Behavior::DecodeAfter(10));

    sim.visible(c);
    sim.visible(a);
    sim.visible(b);
    sim.advance(5_000);

    let started: Vec<_> = sim
        .events
        .iter()
        .filter_map(|(_, e)| match e {
            LoaderEvent::Started { handle } => Some(*handle),
            _ => None,
        })
        .collect();
    assert_eq!(started, vec![c, a, b]);
}

#[test]
fn mobile_uses_shorter_delay() {
    let mut sim = SimHost::new(LoaderConfig::for_viewport(true));
    let (_, a) = sim.add_image(Some("a.jpg"), Behavior::DecodeAfter(30));
    let (_, b) = sim.add_image(Some("b.jpg"), Behavior::DecodeAfter(30));
    sim.visible(a);
    sim.visible(b);
    sim.advance(1_000);
    assert_eq!(sim.started_at(b), Some(30 + 80));
}

#[test]
fn discovery_while_idle_restarts_the_drain() {
    let mut sim = SimHost::new(LoaderConfig::default());
    let (_, a) = sim.add_image(Some("a.jpg"), Behavior::DecodeAfter(50));
    let (_, b) = sim.add_image(Some("b.jpg"), Behavior::DecodeAfter(50));
    sim.visible(a);
    sim.advance(1_000);
    assert_eq!(sim.loader.phase(), Phase::Idle);
    assert!(sim.events.iter().any(|(_, e)| *e == LoaderEvent::Idle));

    sim.visible(b);
    assert_eq!(sim.started_at(b), Some(1_000));
    sim.advance(1_000);
    assert_eq!(
        sim.loader.state(b),
        Some(HandleState::Done(Completion::Loaded))
    );
}

#[test]
fn reveal_direction_follows_scroll_and_expires() {
    let mut sim = SimHost::new(LoaderConfig::default());
    let (card, a) = sim.add_image(Some("a.jpg"), Behavior::DecodeAfter(100));
    sim.scroll_to(900.0);
    sim.scroll_to(600.0);
    sim.visible(a);

    sim.advance(100);
    assert!(sim.has_class(card, "reveal-from-top"));
    assert!(!sim.has_class(card, "reveal-from-bottom"));
    assert!(!sim.has_class(card, "loading"));

    sim.advance(799);
    assert!(sim.has_class(card, "reveal-from-top"));
    sim.advance(1);
    assert!(!sim.has_class(card, "reveal-from-top"));
}

#[test]
fn scrolling_down_reveals_from_bottom() {
    let mut sim = SimHost::new(LoaderConfig::default());
    let (card, a) = sim.add_image(Some("a.jpg"), Behavior::DecodeAfter(100));
    sim.scroll_to(120.0);
    sim.visible(a);
    sim.advance(100);
    assert!(sim.has_class(card, "reveal-from-bottom"));
}

#[test]
fn each_handle_completes_exactly_once() {
    let mut sim = SimHost::new(LoaderConfig::default());
    let handles: Vec<_> = (0..6)
        .map(|i| {
            let behavior = match i % 3 {
                0 => Behavior::DecodeAfter(40),
                1 => Behavior::ErrorAfter(40),
                _ => Behavior::SilentDecodeAfter(40),
            };
            sim.add_image(Some(&format!("{i}.jpg")), behavior).1
        })
        .collect();
    for h in &handles {
        sim.visible(*h);
        sim.visible(*h);
    }
    sim.page_loaded();
    sim.advance(20_000);

    for h in &handles {
        assert_eq!(sim.completion_count(*h), 1, "{h:?}");
        assert!(sim.loader.is_loaded(*h));
        assert!(sim.shown.contains(h));
    }
    assert_eq!(sim.loader.loaded_count(), handles.len());
    assert_eq!(sim.loader.queue_len(), 0);
}
