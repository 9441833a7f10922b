//! Active-card resolution: continuous offset → discrete deck index.
//!
//! Commits are held back while the surface is decelerating or animating so
//! the ambient background doesn't flicker through every card of a fling.
//! The stale value is replaced by the first update after the phase settles.

use super::measure::LayoutMetrics;
use super::observer::{ScrollEvent, ScrollObserver, ScrollPhase, ScrollTarget};

/// `round(offset / average_item_width) mod item_count`.
///
/// `None` when nothing has been measured (no valid index).
pub fn candidate_index(offset: f64, average_item_width: f64, item_count: usize) -> Option<usize> {
    if item_count == 0 || average_item_width.is_nan() || average_item_width <= 0.0 {
        return None;
    }
    let slot = (offset / average_item_width).round();
    if !slot.is_finite() {
        return None;
    }
    Some(slot.rem_euclid(item_count as f64) as usize)
}

/// Whether a position update may change the committed card in `phase`.
pub fn commits_in(phase: ScrollPhase) -> bool {
    phase != ScrollPhase::Decelerating && phase != ScrollPhase::Animating
}

/// Observer link that tracks the active card.
#[derive(Debug)]
pub struct ActiveItemResolver<N> {
    average_item_width: f64,
    item_count: usize,
    phase: ScrollPhase,
    active: Option<usize>,
    next: N,
}

impl<N: ScrollObserver> ActiveItemResolver<N> {
    /// Starts on card 0 when the deck is non-empty.
    pub fn new(item_count: usize, next: N) -> Self {
        Self {
            average_item_width: 0.0,
            item_count,
            phase: ScrollPhase::Idle,
            active: (item_count > 0).then_some(0),
            next,
        }
    }

    pub fn set_metrics(&mut self, metrics: &LayoutMetrics) {
        self.average_item_width = metrics.average_item_width;
        self.item_count = metrics.item_count;
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn next(&self) -> &N {
        &self.next
    }

    fn on_position_change(&mut self, offset: f64) {
        let Some(candidate) = candidate_index(offset, self.average_item_width, self.item_count)
        else {
            return;
        };
        if !commits_in(self.phase) || self.active == Some(candidate) {
            return;
        }
        tracing::debug!(from = ?self.active, to = candidate, offset, "active card changed");
        self.active = Some(candidate);
    }
}

impl<N: ScrollObserver> ScrollObserver for ActiveItemResolver<N> {
    fn handle(&mut self, event: ScrollEvent, target: &mut dyn ScrollTarget) {
        match event {
            ScrollEvent::PositionChanged(offset) => self.on_position_change(offset),
            ScrollEvent::PhaseChanged(phase) => self.phase = phase,
            _ => {}
        }
        self.next.handle(event, target);
    }
}
