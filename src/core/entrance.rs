//! One-shot entrance animation: cards fade/scale in, then the headline is
//! revealed glyph by glyph.
//!
//! Progress only ever moves forward.  Rendering code receives an
//! [`EntranceSnapshot`] by value and never reads the sequencer directly.

use std::time::{Duration, Instant};

/// Stages of the entrance sequence, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum EntrancePhase {
    #[default]
    NotStarted,
    ElementsRevealing,
    /// Headline reveal underway (element reveal may still be finishing).
    TitleRevealing,
    Complete,
}

/// Timing of the sequence.  `title_offset` is measured from the end of the
/// startup delay, so a value shorter than `elements_duration` overlaps the
/// two reveals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntranceTimeline {
    pub startup_delay: Duration,
    pub elements_duration: Duration,
    pub title_offset: Duration,
    pub title_duration: Duration,
}

impl Default for EntranceTimeline {
    fn default() -> Self {
        Self {
            startup_delay: Duration::from_millis(350),
            elements_duration: Duration::from_millis(900),
            title_offset: Duration::from_millis(500),
            title_duration: Duration::from_millis(1200),
        }
    }
}

/// Read-only view of the sequence handed to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EntranceSnapshot {
    pub phase: EntrancePhase,
    /// Card reveal progress in `[0, 1]`.
    pub elements: f64,
    /// Headline reveal progress in `[0, 1]`.
    pub title: f64,
}

impl EntranceSnapshot {
    /// Everything fully shown, used when the entrance is disabled.
    pub fn finished() -> Self {
        Self {
            phase: EntrancePhase::Complete,
            elements: 1.0,
            title: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EntranceSequencer {
    timeline: EntranceTimeline,
    started_at: Option<Instant>,
    snapshot: EntranceSnapshot,
}

fn ratio(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

impl EntranceSequencer {
    pub fn new(timeline: EntranceTimeline) -> Self {
        Self {
            timeline,
            started_at: None,
            snapshot: EntranceSnapshot::default(),
        }
    }

    pub fn phase(&self) -> EntrancePhase {
        self.snapshot.phase
    }

    pub fn snapshot(&self) -> EntranceSnapshot {
        self.snapshot
    }

    /// Called once the startup delay elapsed.  Ignored unless not started.
    pub fn begin(&mut self, now: Instant) -> bool {
        if self.snapshot.phase != EntrancePhase::NotStarted {
            return false;
        }
        self.started_at = Some(now);
        self.snapshot.phase = EntrancePhase::ElementsRevealing;
        tracing::debug!("entrance started");
        true
    }

    /// Advance progress to `now`.  Returns `true` while still animating.
    pub fn update(&mut self, now: Instant) -> bool {
        let Some(start) = self.started_at else {
            return false;
        };
        if self.snapshot.phase == EntrancePhase::Complete {
            return false;
        }

        let t = &self.timeline;
        let elapsed = now.saturating_duration_since(start);
        let elements = ratio(elapsed, t.elements_duration);
        let title = ratio(elapsed.saturating_sub(t.title_offset), t.title_duration);
        let title = if elapsed < t.title_offset { 0.0 } else { title };

        let s = &mut self.snapshot;
        s.elements = s.elements.max(elements);
        s.title = s.title.max(title);
        let phase = if s.elements >= 1.0 && s.title >= 1.0 {
            EntrancePhase::Complete
        } else if elapsed >= t.title_offset {
            EntrancePhase::TitleRevealing
        } else {
            EntrancePhase::ElementsRevealing
        };
        s.phase = s.phase.max(phase);

        if s.phase == EntrancePhase::Complete {
            tracing::debug!("entrance complete");
        }
        s.phase != EntrancePhase::Complete
    }
}

// ───────────────────────────────────────── styles ────────────

/// Visual parameters for one headline slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceStyle {
    pub blur: f64,
    pub opacity: f64,
    pub y_offset: f64,
}

impl SliceStyle {
    pub fn from_progress(local: f64) -> Self {
        let local = local.clamp(0.0, 1.0);
        Self {
            blur: 5.0 * (1.0 - local),
            opacity: local,
            y_offset: 5.0 * (1.0 - local),
        }
    }
}

/// Local progress of slice `index` out of `count`:
/// `clamp(count · progress / (index + 1), 0, 1)`.
///
/// Later slices run at `1 / (index + 1)` of the global rate, so the reveal
/// cascades left to right.
pub fn slice_progress(progress: f64, count: usize, index: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    (count as f64 * progress / (index + 1) as f64).clamp(0.0, 1.0)
}

/// Split `text` into glyph slices with their styles at `progress`.
pub fn reveal_slices(text: &str, progress: f64) -> Vec<(char, SliceStyle)> {
    let count = text.chars().count();
    text.chars()
        .enumerate()
        .map(|(i, c)| (c, SliceStyle::from_progress(slice_progress(progress, count, i))))
        .collect()
}

/// Visual parameters for the card strip during the element reveal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementStyle {
    pub opacity: f64,
    pub blur: f64,
    pub scale: f64,
}

impl ElementStyle {
    /// Ease-out cubic on the raw progress, then map.
    pub fn from_progress(progress: f64) -> Self {
        let p = progress.clamp(0.0, 1.0);
        let eased = 1.0 - (1.0 - p).powi(3);
        Self {
            opacity: eased,
            blur: 10.0 * (1.0 - eased),
            scale: 0.85 + 0.15 * eased,
        }
    }
}
