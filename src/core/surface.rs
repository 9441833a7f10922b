//! Headless scrollable surface: drag tracking, momentum and programmatic
//! scrolling over a single horizontal offset.
//!
//! The surface knows nothing about wrapping.  It queues notifications that
//! the controller drains and pushes through the observer chain, and it
//! accepts silent corrections through [`ScrollTarget`].

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use super::observer::{ScrollEvent, ScrollPhase, ScrollTarget};

/// Release speed (columns/sec) below which a drag ends without momentum.
const MIN_FLING_SPEED: f64 = 20.0;
/// Momentum stops once velocity drops under this (columns/sec).
const SETTLE_SPEED: f64 = 2.0;
/// Pointer samples older than this don't contribute to release velocity.
const VELOCITY_WINDOW: Duration = Duration::from_millis(100);

/// Default per-millisecond velocity retention (a "normal" feel).
pub const DEFAULT_DECELERATION_RATE: f64 = 0.998;

#[derive(Debug, Clone, Copy)]
struct DragAnchor {
    pointer_x: f64,
    offset: f64,
    last_pointer_x: f64,
    last_at: Instant,
}

#[derive(Debug)]
pub struct ScrollSurface {
    offset: f64,
    phase: ScrollPhase,
    /// Columns per second, positive = content moving toward higher offsets.
    velocity: f64,
    deceleration_rate: f64,
    drag: Option<DragAnchor>,
    pending: VecDeque<ScrollEvent>,
}

impl Default for ScrollSurface {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl ScrollSurface {
    pub fn new(offset: f64) -> Self {
        Self {
            offset,
            phase: ScrollPhase::Idle,
            velocity: 0.0,
            deceleration_rate: DEFAULT_DECELERATION_RATE,
            drag: None,
            pending: VecDeque::new(),
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn deceleration_rate(&self) -> f64 {
        self.deceleration_rate
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Pop the oldest queued notification.
    pub fn next_event(&mut self) -> Option<ScrollEvent> {
        self.pending.pop_front()
    }

    fn set_phase(&mut self, phase: ScrollPhase) {
        if self.phase != phase {
            self.phase = phase;
            self.pending.push_back(ScrollEvent::PhaseChanged(phase));
        }
    }

    fn move_to(&mut self, offset: f64) {
        self.offset = offset;
        self.pending.push_back(ScrollEvent::PositionChanged(offset));
    }

    // ── gestures ───────────────────────────────────────────────

    /// Pointer pressed on the content.  Interrupts any momentum.
    pub fn begin_drag(&mut self, pointer_x: f64, now: Instant) {
        self.velocity = 0.0;
        self.drag = Some(DragAnchor {
            pointer_x,
            offset: self.offset,
            last_pointer_x: pointer_x,
            last_at: now,
        });
        self.pending.push_back(ScrollEvent::DragBegan);
        self.set_phase(ScrollPhase::Dragging);
    }

    /// Pointer moved.  Dragging right reveals earlier content (offset falls).
    pub fn drag_to(&mut self, pointer_x: f64, now: Instant) {
        let Some(mut anchor) = self.drag else {
            return;
        };

        let dt = now.saturating_duration_since(anchor.last_at).as_secs_f64();
        if dt > 0.0 {
            self.velocity = -(pointer_x - anchor.last_pointer_x) / dt;
        }
        anchor.last_pointer_x = pointer_x;
        anchor.last_at = now;
        self.drag = Some(anchor);

        self.move_to(anchor.offset - (pointer_x - anchor.pointer_x));
    }

    /// Pointer released.  Fast releases hand over to momentum.
    pub fn end_drag(&mut self, now: Instant) {
        let Some(anchor) = self.drag.take() else {
            return;
        };
        if now.saturating_duration_since(anchor.last_at) > VELOCITY_WINDOW {
            self.velocity = 0.0;
        }

        self.pending.push_back(ScrollEvent::DragEnded {
            velocity: self.velocity,
        });
        if self.velocity.abs() >= MIN_FLING_SPEED {
            self.pending.push_back(ScrollEvent::WillBeginDecelerating);
            self.set_phase(ScrollPhase::Decelerating);
        } else {
            self.velocity = 0.0;
            self.set_phase(ScrollPhase::Idle);
        }
    }

    /// Advance momentum by `dt`.  No-op unless decelerating.
    pub fn step(&mut self, dt: Duration) {
        if self.phase != ScrollPhase::Decelerating {
            return;
        }
        let secs = dt.as_secs_f64();
        if secs <= 0.0 {
            return;
        }

        let next = self.offset + self.velocity * secs;
        self.velocity *= self.deceleration_rate.powf(secs * 1000.0);
        self.move_to(next);

        if self.velocity.abs() < SETTLE_SPEED {
            self.velocity = 0.0;
            self.set_phase(ScrollPhase::Idle);
        }
    }

    /// Programmatic jump to an absolute offset.  Leaves the phase alone.
    pub fn scroll_to(&mut self, offset: f64) {
        self.move_to(offset);
    }
}

impl ScrollTarget for ScrollSurface {
    fn content_offset(&self) -> f64 {
        self.offset
    }

    /// Rebases an active drag by the same delta so the content stays put
    /// under the pointer.
    fn set_content_offset(&mut self, offset: f64) {
        let delta = offset - self.offset;
        self.offset = offset;
        if let Some(anchor) = self.drag.as_mut() {
            anchor.offset += delta;
        }
    }

    fn set_deceleration_rate(&mut self, rate: f64) {
        self.deceleration_rate = rate.clamp(0.9, 0.9999);
    }

    fn phase(&self) -> ScrollPhase {
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(surface: &mut ScrollSurface) -> Vec<ScrollEvent> {
        std::iter::from_fn(|| surface.next_event()).collect()
    }

    #[test]
    fn test_drag_moves_opposite_to_pointer() {
        let t0 = Instant::now();
        let mut s = ScrollSurface::new(50.0);
        s.begin_drag(10.0, t0);
        s.drag_to(4.0, t0 + Duration::from_millis(16));
        assert!((s.offset() - 56.0).abs() < 1e-9);

        let events = drain(&mut s);
        assert_eq!(events[0], ScrollEvent::DragBegan);
        assert_eq!(events[1], ScrollEvent::PhaseChanged(ScrollPhase::Dragging));
        assert_eq!(events[2], ScrollEvent::PositionChanged(56.0));
    }

    #[test]
    fn test_slow_release_goes_idle() {
        let t0 = Instant::now();
        let mut s = ScrollSurface::new(0.0);
        s.begin_drag(10.0, t0);
        s.drag_to(9.9, t0 + Duration::from_millis(50));
        s.end_drag(t0 + Duration::from_millis(60));
        assert_eq!(s.phase(), ScrollPhase::Idle);
        assert_eq!(s.velocity(), 0.0);
    }

    #[test]
    fn test_fling_decelerates_then_settles() {
        let t0 = Instant::now();
        let mut s = ScrollSurface::new(0.0);
        s.begin_drag(40.0, t0);
        s.drag_to(30.0, t0 + Duration::from_millis(20));
        s.end_drag(t0 + Duration::from_millis(25));
        assert_eq!(s.phase(), ScrollPhase::Decelerating);
        let events = drain(&mut s);
        assert!(events.contains(&ScrollEvent::WillBeginDecelerating));

        let before = s.offset();
        s.step(Duration::from_millis(16));
        assert!(s.offset() > before);

        for _ in 0..2_000 {
            s.step(Duration::from_millis(16));
        }
        assert_eq!(s.phase(), ScrollPhase::Idle);
    }

    #[test]
    fn test_stale_release_has_no_momentum() {
        let t0 = Instant::now();
        let mut s = ScrollSurface::new(0.0);
        s.begin_drag(40.0, t0);
        s.drag_to(30.0, t0 + Duration::from_millis(20));
        s.end_drag(t0 + Duration::from_millis(500));
        assert_eq!(s.phase(), ScrollPhase::Idle);
    }

    #[test]
    fn test_correction_rebases_drag_anchor() {
        let t0 = Instant::now();
        let mut s = ScrollSurface::new(95.0);
        s.begin_drag(10.0, t0);
        s.drag_to(0.0, t0 + Duration::from_millis(16));
        assert!((s.offset() - 105.0).abs() < 1e-9);

        s.set_content_offset(5.0);
        s.drag_to(-1.0, t0 + Duration::from_millis(32));
        assert!((s.offset() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_scroll_to_keeps_phase() {
        let mut s = ScrollSurface::new(0.0);
        s.scroll_to(12.5);
        assert_eq!(drain(&mut s), vec![ScrollEvent::PositionChanged(12.5)]);
        assert_eq!(s.phase(), ScrollPhase::Idle);
    }

    #[test]
    fn test_corrections_are_silent() {
        let mut s = ScrollSurface::new(0.0);
        s.set_content_offset(3.0);
        assert!(s.next_event().is_none());
    }
}
