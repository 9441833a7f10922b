//! Carousel controller: wires the deck, the scroll surface, the observer
//! chain and the autoscroll driver together.
//!
//! Every writer of the offset (pointer drag, momentum, autoscroll tick,
//! keyboard nudge) goes through the surface and then through
//! [`Carousel::pump`], so wrap correction always runs before anything reads
//! the new value.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

use super::active::ActiveItemResolver;
use super::autoscroll::{AutoscrollDriver, DEFAULT_TICK_DELTA, DEFAULT_TICK_MS};
use super::card::{CardDeck, CardItem};
use super::loop_engine::LoopEngine;
use super::measure::{self, LayoutMetrics};
use super::observer::{ScrollObserver, ScrollPhase, ScrollTarget, TraceObserver};
use super::repeat::{self, RepetitionPlan};
use super::surface::{ScrollSurface, DEFAULT_DECELERATION_RATE};

/// Horizontal padding inside a card around its caption.
const CARD_PADDING: u16 = 4;

/// Tunables for the strip and its motion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselSettings {
    /// Minimum card width in columns; long captions widen their card.
    pub card_width: u16,
    pub item_spacing: u16,
    pub tick_ms: u64,
    pub tick_delta: f64,
    pub deceleration_rate: f64,
    /// Start with the timer running.
    pub autoscroll: bool,
    /// Stop the timer for good on the first drag, not only on the primary
    /// action.
    pub stop_autoscroll_on_drag: bool,
}

impl Default for CarouselSettings {
    fn default() -> Self {
        Self {
            card_width: 22,
            item_spacing: 2,
            tick_ms: DEFAULT_TICK_MS,
            tick_delta: DEFAULT_TICK_DELTA,
            deceleration_rate: DEFAULT_DECELERATION_RATE,
            autoscroll: true,
            stop_autoscroll_on_drag: false,
        }
    }
}

impl CarouselSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

/// The observer chain attached to the surface, head first.
pub type ObserverChain = LoopEngine<ActiveItemResolver<TraceObserver>>;

/// One rendered card position on the strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    /// Left edge in strip coordinates (before subtracting the offset).
    pub x: f64,
    pub width: f64,
    /// Index into the deck.
    pub item: usize,
}

/// Read-only outputs for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselSnapshot {
    pub offset: f64,
    pub active_index: Option<usize>,
    pub active_card_id: Option<String>,
    pub phase: ScrollPhase,
    pub autoscroll_running: bool,
}

#[derive(Debug)]
pub struct Carousel {
    deck: CardDeck,
    settings: CarouselSettings,
    surface: ScrollSurface,
    chain: ObserverChain,
    driver: AutoscrollDriver,
    item_widths: Vec<f64>,
    metrics: LayoutMetrics,
    plan: RepetitionPlan,
    viewport_width: Option<f64>,
}

impl Carousel {
    pub fn new(deck: CardDeck, settings: CarouselSettings) -> Self {
        let item_widths = card_widths(&deck, &settings);
        let mut chain = LoopEngine::new(ActiveItemResolver::new(deck.len(), TraceObserver::default()));
        chain.set_deceleration_rate(settings.deceleration_rate);

        let driver = if settings.autoscroll {
            AutoscrollDriver::new(settings.tick_delta)
        } else {
            AutoscrollDriver::stopped(settings.tick_delta)
        };
        let metrics = LayoutMetrics::default();
        let plan = repeat::plan(&metrics, 0.0);

        Self {
            deck,
            settings,
            surface: ScrollSurface::default(),
            chain,
            driver,
            item_widths,
            metrics,
            plan,
            viewport_width: None,
        }
    }

    // ── layout ─────────────────────────────────────────────────

    /// Layout pass.  Re-measures and re-plans when the viewport changed,
    /// then republishes the current offset so it is folded into the new
    /// content width.  Returns `true` if anything was recomputed.
    pub fn layout(&mut self, viewport_width: f64) -> bool {
        if self.viewport_width == Some(viewport_width) {
            return false;
        }
        self.viewport_width = Some(viewport_width);
        self.metrics = measure::measure(&self.item_widths, f64::from(self.settings.item_spacing));
        self.plan = repeat::plan(&self.metrics, viewport_width);
        self.chain.set_metrics(&self.metrics);
        self.chain.next_mut().set_metrics(&self.metrics);

        tracing::debug!(
            viewport_width,
            content_width = self.metrics.measured_content_width,
            repeat_count = self.plan.repeat_count,
            "carousel layout"
        );

        self.surface.scroll_to(self.surface.offset());
        self.pump();
        true
    }

    /// Deliver queued surface notifications to the observer chain.
    fn pump(&mut self) {
        while let Some(event) = self.surface.next_event() {
            self.chain.handle(event, &mut self.surface);
        }
    }

    // ── writers ────────────────────────────────────────────────

    /// One autoscroll tick.  Paused while the user's gesture (or its
    /// momentum) owns the offset.  Returns `true` if the offset moved.
    pub fn tick_autoscroll(&mut self) -> bool {
        if self.surface.is_dragging() || self.surface.phase() == ScrollPhase::Decelerating {
            return false;
        }
        let Some(target) = self.driver.tick(self.surface.offset()) else {
            return false;
        };
        self.surface.scroll_to(target);
        self.pump();
        true
    }

    /// Primary action: stop the timer permanently.
    pub fn stop_autoscroll(&mut self) -> bool {
        self.driver.stop()
    }

    pub fn begin_drag(&mut self, pointer_x: f64, now: Instant) {
        if self.settings.stop_autoscroll_on_drag {
            self.driver.stop();
        }
        self.surface.begin_drag(pointer_x, now);
        self.pump();
    }

    pub fn drag_to(&mut self, pointer_x: f64, now: Instant) {
        self.surface.drag_to(pointer_x, now);
        self.pump();
    }

    pub fn end_drag(&mut self, now: Instant) {
        if !self.surface.is_dragging() {
            return;
        }
        self.surface.end_drag(now);
        tracing::debug!(
            velocity = self.surface.velocity(),
            rate = self.surface.deceleration_rate(),
            "drag released"
        );
        self.pump();
    }

    /// Advance momentum.  Returns `true` while the strip is still gliding.
    pub fn step(&mut self, dt: Duration) -> bool {
        self.surface.step(dt);
        self.pump();
        self.surface.phase() == ScrollPhase::Decelerating
    }

    /// Jump by whole cards (keyboard).  Ignored mid-gesture.
    pub fn nudge(&mut self, cards: i32) {
        if self.surface.is_dragging() || !self.metrics.is_measured() {
            return;
        }
        let target = self.surface.offset() + f64::from(cards) * self.metrics.average_item_width;
        self.surface.scroll_to(target);
        self.pump();
    }

    // ── readers ────────────────────────────────────────────────

    pub fn deck(&self) -> &CardDeck {
        &self.deck
    }

    pub fn settings(&self) -> &CarouselSettings {
        &self.settings
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    pub fn plan(&self) -> &RepetitionPlan {
        &self.plan
    }

    pub fn offset(&self) -> f64 {
        self.chain.offset()
    }

    pub fn phase(&self) -> ScrollPhase {
        self.surface.phase()
    }

    pub fn autoscroll_running(&self) -> bool {
        self.driver.is_running()
    }

    pub fn autoscroll_ticks(&self) -> u64 {
        self.driver.ticks()
    }

    pub fn chain(&self) -> &ObserverChain {
        &self.chain
    }

    pub fn active_card(&self) -> Option<&CardItem> {
        self.chain.next().active().and_then(|i| self.deck.get(i))
    }

    pub fn snapshot(&self) -> CarouselSnapshot {
        let active_index = self.chain.next().active();
        CarouselSnapshot {
            offset: self.offset(),
            active_index,
            active_card_id: self.active_card().map(|c| c.id.clone()),
            phase: self.phase(),
            autoscroll_running: self.autoscroll_running(),
        }
    }

    /// Render slots in strip order: the base sequence, then the repeated
    /// tail.
    pub fn slots(&self) -> Vec<Slot> {
        let spacing = f64::from(self.settings.item_spacing);
        let mut x = 0.0;
        let mut out = Vec::with_capacity(self.plan.slot_count());
        if self.plan.item_count == 0 {
            return out;
        }
        for item in (0..self.plan.item_count).chain(self.plan.repeated_indices()) {
            let width = self.item_widths[item];
            out.push(Slot { x, width, item });
            x += width + spacing;
        }
        out
    }
}

/// Rendered width of each card.  All cards share one width (the configured
/// width, widened to fit the longest caption) so the average item width is
/// exact and a tail of `repeat_count` cards always spans the viewport.
fn card_widths(deck: &CardDeck, settings: &CarouselSettings) -> Vec<f64> {
    let widest = deck
        .iter()
        .map(|card| caption_width(card.label()))
        .max()
        .unwrap_or(0);
    let width = f64::from(settings.card_width.max(widest));
    vec![width; deck.len()]
}

fn caption_width(label: &str) -> u16 {
    u16::try_from(label.width())
        .unwrap_or(u16::MAX)
        .saturating_add(CARD_PADDING)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(n: usize) -> CardDeck {
        CardDeck::new(
            (0..n)
                .map(|i| CardItem::new(format!("card-{i}"), format!("{i}.png")))
                .collect(),
        )
        .unwrap()
    }

    fn settings() -> CarouselSettings {
        CarouselSettings {
            card_width: 20,
            item_spacing: 2,
            ..CarouselSettings::default()
        }
    }

    fn carousel(n: usize) -> Carousel {
        let mut c = Carousel::new(deck(n), settings());
        c.layout(80.0);
        c
    }

    #[test]
    fn test_layout_measures_and_plans() {
        let c = carousel(5);
        assert!((c.metrics().measured_content_width - 110.0).abs() < 1e-9);
        assert!((c.metrics().average_item_width - 22.0).abs() < 1e-9);
        // round(80 / 22) + 1
        assert_eq!(c.plan().repeat_count, 5);
        assert_eq!(c.slots().len(), 10);
    }

    #[test]
    fn test_layout_is_skipped_when_unchanged() {
        let mut c = carousel(5);
        assert!(!c.layout(80.0));
        assert!(c.layout(120.0));
    }

    #[test]
    fn test_slots_tile_the_strip() {
        let c = carousel(3);
        let slots = c.slots();
        assert_eq!(slots[0].x, 0.0);
        assert_eq!(slots[1].x, 22.0);
        assert_eq!(slots[3].item, 0);
        assert!((slots[3].x - c.metrics().measured_content_width).abs() < 1e-9);
    }

    #[test]
    fn test_long_captions_widen_every_card() {
        let d = CardDeck::new(vec![
            CardItem::new("a", "a.png"),
            CardItem::new("b", "b.png").with_title("An exceptionally long caption"),
        ])
        .unwrap();
        let mut c = Carousel::new(d, settings());
        c.layout(80.0);
        let slots = c.slots();
        assert_eq!(slots[0].width, 33.0);
        assert_eq!(slots[1].width, 33.0);
    }

    #[test]
    fn test_mixed_captions_still_cover_viewport_at_wrap_edge() {
        let mut cards: Vec<CardItem> = (0..4)
            .map(|i| CardItem::new(format!("card-{i}"), format!("{i}.png")))
            .collect();
        cards.push(CardItem::new("long", "long.png").with_title("x".repeat(196)));
        let viewport = 80.0;
        let mut c = Carousel::new(CardDeck::new(cards).unwrap(), settings());
        c.layout(viewport);

        let width = c.metrics().measured_content_width;
        let last = *c.slots().last().unwrap();
        let strip_end = last.x + last.width;
        // Largest steady-state offset the engine allows.
        let offset = width - 1e-6;
        assert!(
            strip_end >= offset + viewport,
            "W={width} repeat={} strip_end={strip_end}",
            c.plan().repeat_count
        );
    }

    #[test]
    fn test_oversized_caption_saturates_width() {
        let huge = "w".repeat(usize::from(u16::MAX) + 10);
        assert_eq!(caption_width(&huge), u16::MAX);
        assert_eq!(caption_width("abc"), 3 + CARD_PADDING);
    }

    #[test]
    fn test_autoscroll_advances_then_stops() {
        let mut c = carousel(5);
        for _ in 0..100 {
            assert!(c.tick_autoscroll());
        }
        assert!((c.offset() - 35.0).abs() < 1e-6);

        assert!(c.stop_autoscroll());
        let frozen = c.offset();
        for _ in 0..1_000 {
            assert!(!c.tick_autoscroll());
        }
        assert_eq!(c.offset(), frozen);
        assert!(!c.snapshot().autoscroll_running);
    }

    #[test]
    fn test_autoscroll_wraps_through_engine() {
        let mut c = carousel(5);
        let ticks = 400;
        for _ in 0..ticks {
            c.tick_autoscroll();
        }
        let expected = (0.35 * ticks as f64).rem_euclid(110.0);
        assert!((c.offset() - expected).abs() < 1e-6);
        assert!(c.chain().wraps() >= 1);
        assert!((0.0..110.0).contains(&c.offset()));
    }

    #[test]
    fn test_autoscroll_pauses_during_drag() {
        let t0 = Instant::now();
        let mut c = carousel(5);
        c.begin_drag(40.0, t0);
        assert!(!c.tick_autoscroll());
        c.end_drag(t0 + Duration::from_millis(10));
        assert!(c.tick_autoscroll());
        assert!(c.autoscroll_running());
    }

    #[test]
    fn test_drag_can_stop_autoscroll_when_configured() {
        let mut s = settings();
        s.stop_autoscroll_on_drag = true;
        let mut c = Carousel::new(deck(5), s);
        c.layout(80.0);
        c.begin_drag(10.0, Instant::now());
        assert!(!c.autoscroll_running());
    }

    #[test]
    fn test_drag_backwards_past_zero_wraps() {
        let t0 = Instant::now();
        let mut c = carousel(5);
        c.begin_drag(10.0, t0);
        c.drag_to(15.0, t0 + Duration::from_millis(16));
        assert!((c.offset() - 105.0).abs() < 1e-9);
        c.drag_to(16.0, t0 + Duration::from_millis(32));
        assert!((c.offset() - 104.0).abs() < 1e-9);
    }

    #[test]
    fn test_active_card_follows_drag_but_not_fling() {
        let t0 = Instant::now();
        let mut c = carousel(5);
        assert_eq!(c.snapshot().active_card_id.as_deref(), Some("card-0"));

        c.begin_drag(50.0, t0);
        c.drag_to(6.0, t0 + Duration::from_millis(16));
        assert_eq!(c.snapshot().active_index, Some(2));

        // Fast release hands over to momentum; the committed card holds.
        c.end_drag(t0 + Duration::from_millis(20));
        assert_eq!(c.phase(), ScrollPhase::Decelerating);
        let held = c.snapshot().active_index;
        c.step(Duration::from_millis(16));
        assert_eq!(c.snapshot().active_index, held);

        while c.step(Duration::from_millis(16)) {}
        assert_eq!(c.phase(), ScrollPhase::Idle);
        c.tick_autoscroll();
        let expected = crate::core::active::candidate_index(c.offset(), 22.0, 5);
        assert_eq!(c.snapshot().active_index, expected);
    }

    #[test]
    fn test_nudge_moves_whole_cards() {
        let mut c = carousel(5);
        c.nudge(2);
        assert!((c.offset() - 44.0).abs() < 1e-9);
        assert_eq!(c.snapshot().active_index, Some(2));
        c.nudge(-3);
        assert!((c.offset() - 88.0).abs() < 1e-9);
        assert_eq!(c.snapshot().active_index, Some(4));
    }

    #[test]
    fn test_empty_deck_is_inert() {
        let mut c = Carousel::new(CardDeck::new(Vec::new()).unwrap(), settings());
        assert!(c.layout(80.0));
        let seen = c.chain().next().next().events_seen;
        assert!(!c.layout(80.0));
        assert_eq!(c.chain().next().next().events_seen, seen);
        assert_eq!(c.plan().repeat_count, 1);
        assert!(c.slots().is_empty());
        c.tick_autoscroll();
        c.nudge(1);
        assert!((c.offset() - 0.35).abs() < 1e-9);
        assert_eq!(c.snapshot().active_card_id, None);
    }

    #[test]
    fn test_events_reach_preexisting_observer() {
        let mut c = carousel(5);
        let seen = c.chain().next().next().events_seen;
        c.tick_autoscroll();
        assert_eq!(c.chain().next().next().events_seen, seen + 1);
    }
}
