//! Deterministic virtual-time host used by the loader integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use folio_loader::{
    CardId, Effect, HandleId, HandleState, ImageAttrs, LoadReport, LoaderConfig, LoaderEvent,
    SequentialLoader, TimerId,
};

/// How the simulated browser resolves an image once its load begins.
#[derive(Copy, Clone, Debug)]
pub enum Behavior {
    /// `load` event after the given delay.
    DecodeAfter(u64),
    /// `error` event after the given delay.
    ErrorAfter(u64),
    /// Decodes after the delay but fires no event; only a probe notices.
    SilentDecodeAfter(u64),
    /// Never resolves.
    Never,
}

#[derive(Copy, Clone, Debug)]
enum Scheduled {
    Timer(TimerId),
    Report(HandleId, LoadReport),
}

pub struct SimHost {
    pub loader: SequentialLoader,
    pub now: u64,
    queue: Vec<(u64, u64, Scheduled)>,
    seq: u64,
    behaviors: HashMap<HandleId, Behavior>,
    load_started: HashMap<HandleId, u64>,
    pub effects: Vec<(u64, Effect)>,
    pub events: Vec<(u64, LoaderEvent)>,
    pub observed: HashSet<HandleId>,
    pub skeletons: HashSet<CardId>,
    pub card_classes: HashMap<CardId, HashSet<&'static str>>,
    pub shown: HashSet<HandleId>,
    pub max_in_flight: usize,
}

impl SimHost {
    pub fn new(cfg: LoaderConfig) -> Self {
        Self {
            loader: SequentialLoader::new(cfg),
            now: 0,
            queue: Vec::new(),
            seq: 0,
            behaviors: HashMap::new(),
            load_started: HashMap::new(),
            effects: Vec::new(),
            events: Vec::new(),
            observed: HashSet::new(),
            skeletons: HashSet::new(),
            card_classes: HashMap::new(),
            shown: HashSet::new(),
            max_in_flight: 0,
        }
    }

    /// Register one card holding one image with the given source and behavior.
    pub fn add_image(&mut self, src: Option<&str>, behavior: Behavior) -> (CardId, HandleId) {
        let card = self.loader.register_card();
        let attrs = ImageAttrs {
            src: src.map(str::to_string),
            data_src: None,
            class_list: String::new(),
        };
        let handle = self
            .loader
            .register_image(card, &attrs)
            .unwrap()
            .expect("not excluded");
        self.behaviors.insert(handle, behavior);
        self.apply();
        (card, handle)
    }

    pub fn visible(&mut self, handle: HandleId) {
        self.loader.on_visible(handle).unwrap();
        self.apply();
    }

    pub fn scroll_to(&mut self, y: f64) {
        self.loader.on_scroll(y);
    }

    pub fn page_loaded(&mut self) {
        self.loader.on_page_load();
        self.apply();
    }

    /// Arm the fallback for a `load` event that fired `elapsed_ms` earlier.
    pub fn page_loaded_ago(&mut self, elapsed_ms: u32) {
        self.loader.on_page_load_after(elapsed_ms);
        self.apply();
    }

    /// Fire everything due up to and including `t`, in time order.
    pub fn run_until(&mut self, t: u64) {
        while let Some(pos) = self.next_due(t) {
            let (at, _, what) = self.queue.remove(pos);
            self.now = at;
            match what {
                Scheduled::Timer(timer) => self.loader.on_timer(timer).unwrap(),
                Scheduled::Report(handle, report) => {
                    self.loader.report(handle, report).unwrap();
                }
            }
            self.apply();
        }
        self.now = t;
    }

    pub fn advance(&mut self, ms: u64) {
        let t = self.now + ms;
        self.run_until(t);
    }

    pub fn completed_at(&self, handle: HandleId) -> Option<u64> {
        self.events.iter().find_map(|(at, e)| match e {
            LoaderEvent::Completed { handle: h, .. } if *h == handle => Some(*at),
            _ => None,
        })
    }

    pub fn started_at(&self, handle: HandleId) -> Option<u64> {
        self.load_started.get(&handle).copied()
    }

    pub fn completion_count(&self, handle: HandleId) -> usize {
        self.events
            .iter()
            .filter(|(_, e)| matches!(e, LoaderEvent::Completed { handle: h, .. } if *h == handle))
            .count()
    }

    /// Time the skeleton element of `card` was removed from the simulated DOM.
    pub fn skeleton_removed_at(&self, card: CardId) -> Option<u64> {
        self.effects.iter().find_map(|(at, e)| match e {
            Effect::RemoveSkeleton { card: c } if *c == card => Some(*at),
            _ => None,
        })
    }

    pub fn has_class(&self, card: CardId, class: &str) -> bool {
        self.card_classes
            .get(&card)
            .is_some_and(|set| set.contains(class))
    }

    fn next_due(&self, t: u64) -> Option<usize> {
        self.queue
            .iter()
            .enumerate()
            .filter(|(_, (at, _, _))| *at <= t)
            .min_by_key(|(_, (at, seq, _))| (*at, *seq))
            .map(|(pos, _)| pos)
    }

    fn push(&mut self, at: u64, what: Scheduled) {
        self.seq += 1;
        self.queue.push((at, self.seq, what));
    }

    fn apply(&mut self) {
        let outputs = self.loader.take_outputs();
        for event in outputs.events {
            self.events.push((self.now, event));
        }
        for effect in outputs.effects {
            match &effect {
                Effect::PrepareCard { card } => {
                    self.skeletons.insert(*card);
                    self.card_classes.entry(*card).or_default().insert("loading");
                }
                Effect::Observe { handle } => {
                    self.observed.insert(*handle);
                }
                Effect::Unobserve { handle } => {
                    self.observed.remove(handle);
                }
                Effect::BeginLoad { handle, .. } => {
                    self.load_started.insert(*handle, self.now);
                    match self.behaviors.get(handle).copied() {
                        Some(Behavior::DecodeAfter(d)) => {
                            self.push(self.now + d, Scheduled::Report(*handle, LoadReport::Decoded))
                        }
                        Some(Behavior::ErrorAfter(d)) => {
                            self.push(self.now + d, Scheduled::Report(*handle, LoadReport::Errored))
                        }
                        _ => {}
                    }
                }
                Effect::Probe { handle } => {
                    if let (Some(Behavior::SilentDecodeAfter(d)), Some(start)) = (
                        self.behaviors.get(handle).copied(),
                        self.load_started.get(handle).copied(),
                    ) {
                        if self.now >= start + d {
                            self.push(self.now, Scheduled::Report(*handle, LoadReport::Decoded));
                        }
                    }
                }
                Effect::RemoveSkeleton { card } => {
                    self.skeletons.remove(card);
                }
                Effect::ClearCardLoading { card } => {
                    if let Some(set) = self.card_classes.get_mut(card) {
                        set.remove("loading");
                    }
                }
                Effect::ShowImage { handle } => {
                    self.shown.insert(*handle);
                }
                Effect::AddCardClass { card, class } => {
                    self.card_classes
                        .entry(*card)
                        .or_default()
                        .insert(class.as_str());
                }
                Effect::RemoveCardClass { card, class } => {
                    if let Some(set) = self.card_classes.get_mut(card) {
                        set.remove(class.as_str());
                    }
                }
                Effect::Schedule { timer, after_ms } => {
                    self.push(self.now + u64::from(*after_ms), Scheduled::Timer(*timer));
                }
                Effect::PrepareImage { .. }
                | Effect::AssignSource { .. }
                | Effect::FadeSkeleton { .. } => {}
            }
            self.effects.push((self.now, effect));
        }

        let in_flight = self
            .loader
            .handles()
            .filter(|h| h.state == HandleState::Loading)
            .count();
        assert!(in_flight <= 1, "{in_flight} images loading at t={}", self.now);
        self.max_in_flight = self.max_in_flight.max(in_flight);
    }
}
