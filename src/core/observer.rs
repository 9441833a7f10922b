//! Scroll notifications and the observer chain they travel through.
//!
//! The surface queues [`ScrollEvent`]s; the controller hands each one to the
//! head of the chain.  Every link does its own work and then explicitly
//! re-dispatches to its successor, so observers attached before the loop
//! engine keep seeing every event.

/// Gesture/momentum state of the scrollable surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollPhase {
    #[default]
    Idle,
    Dragging,
    Decelerating,
    Animating,
}

/// A notification emitted by the scrollable surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollEvent {
    /// The content offset changed (drag, momentum or programmatic scroll).
    PositionChanged(f64),
    DragBegan,
    /// Pointer released.  `velocity` is in columns per second.
    DragEnded { velocity: f64 },
    WillBeginDecelerating,
    PhaseChanged(ScrollPhase),
}

/// Write-back handle an observer receives alongside each event.
pub trait ScrollTarget {
    fn content_offset(&self) -> f64;
    /// Move the content without emitting a new event.
    fn set_content_offset(&mut self, offset: f64);
    fn set_deceleration_rate(&mut self, rate: f64);
    fn phase(&self) -> ScrollPhase;
}

/// One link of the observer chain.
pub trait ScrollObserver {
    fn handle(&mut self, event: ScrollEvent, target: &mut dyn ScrollTarget);
}

/// End of chain.
impl ScrollObserver for () {
    fn handle(&mut self, _event: ScrollEvent, _target: &mut dyn ScrollTarget) {}
}

/// The observer that was watching the surface before the carousel core was
/// attached.  Logs every event and keeps a count, then passes it on.
#[derive(Debug, Default)]
pub struct TraceObserver {
    pub events_seen: u64,
    pub last_event: Option<ScrollEvent>,
}

impl ScrollObserver for TraceObserver {
    fn handle(&mut self, event: ScrollEvent, target: &mut dyn ScrollTarget) {
        self.events_seen += 1;
        self.last_event = Some(event);
        tracing::trace!(
            ?event,
            offset = target.content_offset(),
            phase = ?target.phase(),
            "scroll event"
        );
    }
}
