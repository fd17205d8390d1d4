//! SequentialLoader: queue ownership, the single in-flight slot, and completion side effects.
//!
//! Methods:
//! - register_card, register_image (startup)
//! - on_visible, on_scroll, report, on_timer, on_page_load (host signals)
//! - take_outputs (effects/events for the host to apply)

use std::collections::VecDeque;

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::config::LoaderConfig;
use crate::error::{FailureKind, LoaderError};
use crate::handle::{Completion, HandleState, ImageAttrs, ImageHandle};
use crate::ids::{CardId, HandleId, TimerId};
use crate::outputs::{Effect, LoaderEvent, Outputs};
use crate::scroll::{RevealClass, ScrollDirection, ScrollTracker};

/// What the loader is doing with its single in-flight slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Nothing in flight, no delay pending. A discovery starts the drain.
    Idle,
    Loading(HandleId),
    /// Inter-item delay after a completion; discoveries only enqueue.
    Cooldown,
}

/// Browser outcome for the in-flight image.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadReport {
    /// Decoded with a non-zero natural size.
    Decoded,
    Errored,
}

/// Purpose of an armed timer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimerKind {
    Advance,
    Probe(HandleId),
    LoadTimeout(HandleId),
    SkeletonRemoval(CardId),
    RevealExpiry(CardId, RevealClass),
    FallbackSweep,
}

#[derive(Debug, Default)]
struct CardState {
    prepared: bool,
    skeleton: bool,
    loading: bool,
}

#[derive(Debug)]
pub struct SequentialLoader {
    cfg: LoaderConfig,
    next_timer: u32,
    // Dense: HandleId(n) lives at handles[n], CardId(n) at cards[n].
    handles: Vec<ImageHandle>,
    cards: Vec<CardState>,
    loaded: HashSet<HandleId>,
    queue: VecDeque<HandleId>,
    phase: Phase,
    scroll: ScrollTracker,
    timers: HashMap<TimerId, TimerKind>,
    fallback_armed: bool,
    outputs: Outputs,
}

impl SequentialLoader {
    pub fn new(cfg: LoaderConfig) -> Self {
        Self::with_scroll_offset(cfg, 0.0)
    }

    /// Create a loader whose direction tracking starts from the current page offset.
    pub fn with_scroll_offset(cfg: LoaderConfig, scroll_y: f64) -> Self {
        Self {
            cfg,
            next_timer: 0,
            handles: Vec::new(),
            cards: Vec::new(),
            loaded: HashSet::new(),
            queue: VecDeque::new(),
            phase: Phase::Idle,
            scroll: ScrollTracker::new(scroll_y),
            timers: HashMap::new(),
            fallback_armed: false,
            outputs: Outputs::default(),
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.cfg
    }

    /// Register a card element. The host keeps the CardId → element mapping.
    pub fn register_card(&mut self) -> CardId {
        let id = CardId(self.cards.len() as u32);
        self.cards.push(CardState::default());
        id
    }

    /// Register a lazy image inside `card`.
    ///
    /// Returns `Ok(None)` for images carrying the excluded class; those are
    /// left entirely to the browser.
    pub fn register_image(
        &mut self,
        card: CardId,
        attrs: &ImageAttrs,
    ) -> Result<Option<HandleId>, LoaderError> {
        if self.cfg.is_excluded(&attrs.class_list) {
            return Ok(None);
        }
        let state = self
            .cards
            .get_mut(card.index())
            .ok_or(LoaderError::UnknownCard(card))?;
        if !state.prepared {
            state.prepared = true;
            state.skeleton = true;
            state.loading = true;
            self.outputs.push_effect(Effect::PrepareCard { card });
        }

        let id = HandleId(self.handles.len() as u32);
        self.handles.push(ImageHandle::new(id, card, attrs));
        self.outputs.push_effect(Effect::PrepareImage { handle: id });
        self.outputs.push_effect(Effect::Observe { handle: id });
        Ok(Some(id))
    }

    /// The image entered the discovery margin. Only the first report counts.
    pub fn on_visible(&mut self, id: HandleId) -> Result<bool, LoaderError> {
        let handle = self.handle_mut(id)?;
        if handle.state != HandleState::Pending {
            return Ok(false);
        }
        handle.state = HandleState::Queued;
        self.queue.push_back(id);
        self.outputs.push_effect(Effect::Unobserve { handle: id });
        self.outputs.push_event(LoaderEvent::Queued {
            handle: id,
            position: self.queue.len() - 1,
        });
        log::debug!("image {:?} queued ({} waiting)", id, self.queue.len());

        if self.phase == Phase::Idle {
            self.drain();
        }
        Ok(true)
    }

    pub fn on_scroll(&mut self, y: f64) -> ScrollDirection {
        self.scroll.observe(y)
    }

    /// Browser result for an image. Reports for images that are not loading
    /// (late listeners, probe after error, timeout already fired) are ignored.
    pub fn report(&mut self, id: HandleId, report: LoadReport) -> Result<bool, LoaderError> {
        let handle = self.handle(id).ok_or(LoaderError::UnknownHandle(id))?;
        if handle.state != HandleState::Loading {
            log::debug!("ignoring {:?} for {:?} in state {:?}", report, id, handle.state);
            return Ok(false);
        }
        let completion = match report {
            LoadReport::Decoded => Completion::Loaded,
            LoadReport::Errored => Completion::Failed(FailureKind::LoadError),
        };
        Ok(self.complete(id, completion, false))
    }

    /// A timer armed through [`Effect::Schedule`] fired.
    pub fn on_timer(&mut self, timer: TimerId) -> Result<(), LoaderError> {
        let kind = self
            .timers
            .remove(&timer)
            .ok_or(LoaderError::UnknownTimer(timer))?;
        match kind {
            TimerKind::Advance => {
                if self.phase == Phase::Cooldown {
                    self.phase = Phase::Idle;
                    self.drain();
                }
            }
            TimerKind::Probe(id) => {
                if self.state(id) == Some(HandleState::Loading) {
                    self.outputs.push_effect(Effect::Probe { handle: id });
                    self.schedule(TimerKind::Probe(id), self.cfg.probe_interval_ms);
                }
            }
            TimerKind::LoadTimeout(id) => {
                if self.state(id) == Some(HandleState::Loading) {
                    self.complete(id, Completion::Failed(FailureKind::Stalled), false);
                }
            }
            TimerKind::SkeletonRemoval(card) => {
                self.outputs.push_effect(Effect::RemoveSkeleton { card });
            }
            TimerKind::RevealExpiry(card, class) => {
                self.outputs
                    .push_effect(Effect::RemoveCardClass { card, class });
            }
            TimerKind::FallbackSweep => self.sweep(),
        }
        Ok(())
    }

    /// The page `load` event just fired: arm the fallback sweep.
    pub fn on_page_load(&mut self) -> bool {
        self.on_page_load_after(0)
    }

    /// The page `load` event fired `elapsed_ms` ago. The sweep still runs
    /// `fallback_delay_ms` after that event, immediately if the deadline has
    /// passed. Only the first call arms it.
    pub fn on_page_load_after(&mut self, elapsed_ms: u32) -> bool {
        if self.fallback_armed {
            return false;
        }
        self.fallback_armed = true;
        let remaining = self.cfg.fallback_delay_ms.saturating_sub(elapsed_ms);
        log::debug!("fallback sweep in {remaining}ms");
        self.schedule(TimerKind::FallbackSweep, remaining);
        true
    }

    /// Drain pending effects and events.
    pub fn take_outputs(&mut self) -> Outputs {
        std::mem::take(&mut self.outputs)
    }

    pub fn handle(&self, id: HandleId) -> Option<&ImageHandle> {
        self.handles.get(id.index())
    }

    pub fn handles(&self) -> impl Iterator<Item = &ImageHandle> {
        self.handles.iter()
    }

    pub fn state(&self, id: HandleId) -> Option<HandleState> {
        self.handle(id).map(|h| h.state)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn in_flight(&self) -> Option<HandleId> {
        match self.phase {
            Phase::Loading(id) => Some(id),
            _ => None,
        }
    }

    pub fn queued(&self) -> impl Iterator<Item = HandleId> + '_ {
        self.queue.iter().copied()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_loaded(&self, id: HandleId) -> bool {
        self.loaded.contains(&id)
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    pub fn scroll_direction(&self) -> ScrollDirection {
        self.scroll.direction()
    }

    pub fn pending_timer(&self, timer: TimerId) -> Option<TimerKind> {
        self.timers.get(&timer).copied()
    }

    fn handle_mut(&mut self, id: HandleId) -> Result<&mut ImageHandle, LoaderError> {
        self.handles
            .get_mut(id.index())
            .ok_or(LoaderError::UnknownHandle(id))
    }

    fn schedule(&mut self, kind: TimerKind, after_ms: u32) -> TimerId {
        let timer = TimerId(self.next_timer);
        self.next_timer = self.next_timer.wrapping_add(1);
        self.timers.insert(timer, kind);
        self.outputs
            .push_effect(Effect::Schedule { timer, after_ms });
        timer
    }

    fn drain(&mut self) {
        while self.phase == Phase::Idle {
            let Some(next) = self.queue.pop_front() else {
                self.outputs.push_event(LoaderEvent::Idle);
                return;
            };
            if self.loaded.contains(&next) {
                continue;
            }
            self.start(next);
        }
    }

    fn start(&mut self, id: HandleId) {
        let idx = id.index();
        self.handles[idx].state = HandleState::Loading;
        self.phase = Phase::Loading(id);
        self.outputs.push_event(LoaderEvent::Started { handle: id });

        match self.handles[idx].src.clone() {
            None => {
                self.complete(id, Completion::Failed(FailureKind::MissingSource), false);
            }
            Some(src) => {
                log::debug!("loading image {:?} from {}", id, src);
                self.outputs
                    .push_effect(Effect::BeginLoad { handle: id, src });
                self.schedule(TimerKind::LoadTimeout(id), self.cfg.load_timeout_ms);
                self.schedule(TimerKind::Probe(id), self.cfg.probe_interval_ms);
            }
        }
    }

    /// Move a handle to `Done`. Returns false if it already was.
    fn complete(&mut self, id: HandleId, completion: Completion, forced: bool) -> bool {
        let idx = id.index();
        let Some(handle) = self.handles.get_mut(idx) else {
            return false;
        };
        if handle.state.is_done() {
            return false;
        }
        let prior = handle.state;
        handle.state = HandleState::Done(completion);
        let card = handle.card;
        let deferred_src = handle.src.clone().filter(|_| handle.deferred);

        if prior == HandleState::Queued {
            self.queue.retain(|queued| *queued != id);
        }
        if prior != HandleState::Loading {
            if let Some(src) = deferred_src {
                self.outputs
                    .push_effect(Effect::AssignSource { handle: id, src });
            }
        }

        match completion {
            Completion::Failed(FailureKind::LoadError) => {
                let src = self.handles[idx].src.as_deref().unwrap_or_default();
                log::error!("failed to load image {:?}: {}", id, src);
            }
            Completion::Failed(kind) => log::warn!("image {:?} finished without loading: {}", id, kind),
            Completion::Loaded => log::debug!("image {:?} loaded", id),
        }

        self.release_card(card);
        if completion.is_success() {
            let class = self.scroll.reveal_class();
            self.outputs
                .push_effect(Effect::AddCardClass { card, class });
            self.schedule(
                TimerKind::RevealExpiry(card, class),
                self.cfg.reveal_duration_ms,
            );
        }
        self.outputs.push_effect(Effect::ShowImage { handle: id });
        self.loaded.insert(id);
        self.outputs.push_event(LoaderEvent::Completed {
            handle: id,
            completion,
            forced,
        });

        if self.phase == Phase::Loading(id) {
            self.phase = Phase::Cooldown;
            self.schedule(TimerKind::Advance, self.cfg.inter_item_delay());
        }
        true
    }

    /// Fade the card skeleton and clear the card `loading` class, once each.
    fn release_card(&mut self, card: CardId) {
        let Some(state) = self.cards.get_mut(card.index()) else {
            return;
        };
        let fade = state.skeleton;
        let clear = state.loading;
        state.skeleton = false;
        state.loading = false;
        if fade {
            self.outputs.push_effect(Effect::FadeSkeleton { card });
            self.schedule(TimerKind::SkeletonRemoval(card), self.cfg.skeleton_fade_ms);
        }
        if clear {
            self.outputs.push_effect(Effect::ClearCardLoading { card });
        }
    }

    /// Force-complete everything discovered but not done: the queue and the
    /// in-flight image. Undiscovered handles stay observed and load in turn
    /// once they become visible.
    fn sweep(&mut self) {
        let stuck: Vec<HandleId> = self
            .handles
            .iter()
            .filter(|h| matches!(h.state, HandleState::Queued | HandleState::Loading))
            .map(|h| h.id)
            .collect();
        let mut forced = 0;
        for id in stuck {
            if self.complete(id, Completion::Failed(FailureKind::Stalled), true) {
                forced += 1;
            }
        }
        if forced > 0 {
            log::warn!("fallback sweep force-completed {} image(s)", forced);
        }
        self.outputs
            .push_event(LoaderEvent::FallbackSwept { forced });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(src: &str) -> ImageAttrs {
        ImageAttrs {
            src: Some(src.to_string()),
            data_src: None,
            class_list: String::new(),
        }
    }

    fn scheduled(outputs: &Outputs) -> Vec<(TimerId, u32)> {
        outputs
            .effects
            .iter()
            .filter_map(|e| match e {
                Effect::Schedule { timer, after_ms } => Some((*timer, *after_ms)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn registration_prepares_card_once() {
        let mut loader = SequentialLoader::new(LoaderConfig::default());
        let card = loader.register_card();
        let a = loader.register_image(card, &attrs("a.jpg")).unwrap().unwrap();
        let b = loader.register_image(card, &attrs("b.jpg")).unwrap().unwrap();
        let out = loader.take_outputs();
        assert_eq!(
            out.effects,
            vec![
                Effect::PrepareCard { card },
                Effect::PrepareImage { handle: a },
                Effect::Observe { handle: a },
                Effect::PrepareImage { handle: b },
                Effect::Observe { handle: b },
            ]
        );
    }

    #[test]
    fn excluded_class_is_skipped() {
        let mut loader = SequentialLoader::new(LoaderConfig::default());
        let card = loader.register_card();
        let hero = ImageAttrs {
            class_list: "hero-large-image".into(),
            ..attrs("hero.jpg")
        };
        assert_eq!(loader.register_image(card, &hero), Ok(None));
        assert!(loader.take_outputs().is_empty());
    }

    #[test]
    fn unknown_ids_are_errors() {
        let mut loader = SequentialLoader::new(LoaderConfig::default());
        assert_eq!(
            loader.register_image(CardId(3), &attrs("a.jpg")),
            Err(LoaderError::UnknownCard(CardId(3)))
        );
        assert_eq!(
            loader.on_visible(HandleId(9)),
            Err(LoaderError::UnknownHandle(HandleId(9)))
        );
        assert_eq!(
            loader.on_timer(TimerId(0)),
            Err(LoaderError::UnknownTimer(TimerId(0)))
        );
    }

    #[test]
    fn first_visible_starts_loading_immediately() {
        let mut loader = SequentialLoader::new(LoaderConfig::default());
        let card = loader.register_card();
        let a = loader.register_image(card, &attrs("a.jpg")).unwrap().unwrap();
        loader.take_outputs();

        assert_eq!(loader.on_visible(a), Ok(true));
        assert_eq!(loader.on_visible(a), Ok(false));
        assert_eq!(loader.phase(), Phase::Loading(a));
        let out = loader.take_outputs();
        assert!(out.effects.contains(&Effect::Unobserve { handle: a }));
        assert!(out.effects.contains(&Effect::BeginLoad {
            handle: a,
            src: "a.jpg".into()
        }));
        let delays: Vec<u32> = scheduled(&out).into_iter().map(|(_, ms)| ms).collect();
        assert_eq!(delays, vec![5_000, 50]);
    }

    #[test]
    fn discoveries_during_cooldown_wait_for_the_delay() {
        let mut loader = SequentialLoader::new(LoaderConfig::default());
        let card_a = loader.register_card();
        let card_b = loader.register_card();
        let a = loader.register_image(card_a, &attrs("a.jpg")).unwrap().unwrap();
        let b = loader.register_image(card_b, &attrs("b.jpg")).unwrap().unwrap();
        loader.on_visible(a).unwrap();
        loader.take_outputs();

        assert_eq!(loader.report(a, LoadReport::Decoded), Ok(true));
        assert_eq!(loader.phase(), Phase::Cooldown);
        let out = loader.take_outputs();
        let advance = scheduled(&out)
            .into_iter()
            .find(|(t, _)| loader.pending_timer(*t) == Some(TimerKind::Advance))
            .unwrap();
        assert_eq!(advance.1, 120);

        loader.on_visible(b).unwrap();
        assert_eq!(loader.state(b), Some(HandleState::Queued));
        loader.on_timer(advance.0).unwrap();
        assert_eq!(loader.phase(), Phase::Loading(b));
    }

    #[test]
    fn late_reports_are_ignored() {
        let mut loader = SequentialLoader::new(LoaderConfig::default());
        let card = loader.register_card();
        let a = loader.register_image(card, &attrs("a.jpg")).unwrap().unwrap();
        loader.on_visible(a).unwrap();
        assert_eq!(loader.report(a, LoadReport::Errored), Ok(true));
        assert_eq!(loader.report(a, LoadReport::Decoded), Ok(false));
        assert_eq!(
            loader.state(a),
            Some(HandleState::Done(Completion::Failed(FailureKind::LoadError)))
        );
        let out = loader.take_outputs();
        assert!(!out
            .effects
            .iter()
            .any(|e| matches!(e, Effect::AddCardClass { .. })));
    }

    #[test]
    fn late_arming_keeps_the_load_deadline() {
        let mut loader = SequentialLoader::new(LoaderConfig::default());
        assert!(loader.on_page_load_after(2_200));
        assert!(!loader.on_page_load());
        assert_eq!(scheduled(&loader.take_outputs())[0].1, 800);

        let mut overdue = SequentialLoader::new(LoaderConfig::default());
        overdue.on_page_load_after(6_000);
        assert_eq!(scheduled(&overdue.take_outputs())[0].1, 0);
    }

    #[test]
    fn page_load_arms_fallback_once() {
        let mut loader = SequentialLoader::new(LoaderConfig::default());
        assert!(loader.on_page_load());
        assert!(!loader.on_page_load());
        let out = loader.take_outputs();
        assert_eq!(scheduled(&out).len(), 1);
        assert_eq!(scheduled(&out)[0].1, 3_000);
    }
}
