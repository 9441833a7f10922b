//! The loop engine: keeps the shared scroll offset inside one content width
//! so a finite, repeated strip reads as endless.
//!
//! Because the rendered strip repeats the whole sequence, moving the offset
//! by exactly one `measured_content_width` is invisible.  The engine applies
//! that move whenever a position update leaves `[0, width)`, writes the
//! corrected value back to the surface before anything downstream sees it,
//! and then forwards the event to the next link.

use super::measure::LayoutMetrics;
use super::observer::{ScrollEvent, ScrollObserver, ScrollTarget};
use super::surface::DEFAULT_DECELERATION_RATE;

/// Fold `offset` into `[0, content_width)`.
///
/// A zero (unmeasured) width leaves the offset alone.  The result is stable
/// under repeated application.
pub fn wrap_correct(offset: f64, content_width: f64) -> f64 {
    if content_width.is_nan() || content_width <= 0.0 || !offset.is_finite() {
        return offset;
    }
    if (0.0..content_width).contains(&offset) {
        return offset;
    }
    let wrapped = offset.rem_euclid(content_width);
    // rem_euclid can round up to exactly `content_width` for tiny negatives.
    if wrapped >= content_width {
        0.0
    } else {
        wrapped
    }
}

/// Wrap-correcting link in the scroll observer chain.
#[derive(Debug)]
pub struct LoopEngine<N> {
    content_width: f64,
    deceleration_rate: f64,
    offset: f64,
    wraps: u64,
    next: N,
}

impl<N: ScrollObserver> LoopEngine<N> {
    pub fn new(next: N) -> Self {
        Self {
            content_width: 0.0,
            deceleration_rate: DEFAULT_DECELERATION_RATE,
            offset: 0.0,
            wraps: 0,
            next,
        }
    }

    /// Adopt fresh measurements.  Unmeasured metrics disable wrapping.
    pub fn set_metrics(&mut self, metrics: &LayoutMetrics) {
        self.content_width = if metrics.is_measured() {
            metrics.measured_content_width
        } else {
            0.0
        };
    }

    pub fn set_deceleration_rate(&mut self, rate: f64) {
        self.deceleration_rate = rate;
    }

    /// Authoritative, already-corrected offset.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Number of boundary corrections applied so far.
    pub fn wraps(&self) -> u64 {
        self.wraps
    }

    pub fn next(&self) -> &N {
        &self.next
    }

    pub fn next_mut(&mut self) -> &mut N {
        &mut self.next
    }

    fn on_position_change(&mut self, raw: f64, target: &mut dyn ScrollTarget) -> f64 {
        let corrected = wrap_correct(raw, self.content_width);
        if corrected != raw {
            self.wraps += 1;
            target.set_content_offset(corrected);
            tracing::debug!(raw, corrected, width = self.content_width, "wrapped offset");
        }
        self.offset = corrected;
        corrected
    }
}

impl<N: ScrollObserver> ScrollObserver for LoopEngine<N> {
    fn handle(&mut self, event: ScrollEvent, target: &mut dyn ScrollTarget) {
        target.set_deceleration_rate(self.deceleration_rate);

        let event = match event {
            ScrollEvent::PositionChanged(raw) => {
                ScrollEvent::PositionChanged(self.on_position_change(raw, target))
            }
            other => other,
        };
        self.next.handle(event, target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::observer::{ScrollPhase, TraceObserver};
    use crate::core::surface::ScrollSurface;

    const W: f64 = 1100.0;

    fn metrics(width: f64) -> LayoutMetrics {
        LayoutMetrics {
            item_spacing: 0.0,
            measured_content_width: width,
            average_item_width: width / 5.0,
            item_count: 5,
        }
    }

    #[test]
    fn test_in_range_passes_through() {
        for x in [0.0, 0.35, 550.0, W - 0.001] {
            assert_eq!(wrap_correct(x, W), x);
        }
    }

    #[test]
    fn test_overflow_subtracts_one_width() {
        for x in [W, W + 0.35, 1.5 * W, 2.0 * W - 0.5] {
            let c = wrap_correct(x, W);
            assert!((c - (x - W)).abs() < 1e-9, "x={x}");
            assert!((0.0..W).contains(&c));
        }
    }

    #[test]
    fn test_underflow_adds_one_width() {
        let c = wrap_correct(-10.0, W);
        assert!((c - (W - 10.0)).abs() < 1e-9);
        assert_eq!(wrap_correct(-1e-18, W), 0.0);
    }

    #[test]
    fn test_correction_is_idempotent() {
        for i in -40..=80 {
            let x = i as f64 * 37.3;
            let once = wrap_correct(x, W);
            assert_eq!(wrap_correct(once, W), once, "x={x}");
        }
    }

    #[test]
    fn test_zero_width_never_corrects() {
        assert_eq!(wrap_correct(-50.0, 0.0), -50.0);
        assert_eq!(wrap_correct(5000.0, 0.0), 5000.0);
    }

    #[test]
    fn test_engine_writes_back_and_forwards() {
        let mut engine = LoopEngine::new(TraceObserver::default());
        engine.set_metrics(&metrics(W));
        let mut surface = ScrollSurface::new(0.0);

        surface.scroll_to(W + 4.0);
        let event = surface.next_event().unwrap();
        engine.handle(event, &mut surface);

        assert!((surface.offset() - 4.0).abs() < 1e-9);
        assert!((engine.offset() - 4.0).abs() < 1e-9);
        assert_eq!(engine.wraps(), 1);
        assert_eq!(engine.next().events_seen, 1);
        match engine.next().last_event {
            Some(ScrollEvent::PositionChanged(x)) => assert!((x - 4.0).abs() < 1e-9),
            other => panic!("unexpected forwarded event: {other:?}"),
        }
    }

    #[test]
    fn test_non_position_events_forwarded_verbatim() {
        let mut engine = LoopEngine::new(TraceObserver::default());
        let mut surface = ScrollSurface::new(0.0);
        engine.handle(ScrollEvent::DragBegan, &mut surface);
        engine.handle(ScrollEvent::PhaseChanged(ScrollPhase::Dragging), &mut surface);
        assert_eq!(engine.next().events_seen, 2);
        assert_eq!(
            engine.next().last_event,
            Some(ScrollEvent::PhaseChanged(ScrollPhase::Dragging))
        );
    }

    #[test]
    fn test_deceleration_rate_applied_every_update() {
        let mut engine = LoopEngine::new(());
        engine.set_deceleration_rate(0.99);
        let mut surface = ScrollSurface::new(0.0);
        engine.handle(ScrollEvent::PositionChanged(1.0), &mut surface);
        assert!((surface.deceleration_rate() - 0.99).abs() < 1e-12);
    }

    #[test]
    fn test_unmeasured_engine_passes_out_of_range() {
        let mut engine = LoopEngine::new(());
        let mut surface = ScrollSurface::new(0.0);
        engine.handle(ScrollEvent::PositionChanged(-7.0), &mut surface);
        assert_eq!(engine.offset(), -7.0);
        assert_eq!(engine.wraps(), 0);
    }
}
