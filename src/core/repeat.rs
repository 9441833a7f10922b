//! Repetition planning: how many extra cards must trail the base sequence
//! so the viewport is covered at every wrap position.

use super::measure::LayoutMetrics;

/// Output of [`plan`].  Pure data; recomputed whenever viewport or metrics
/// change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepetitionPlan {
    /// Number of repeated cards appended after the base sequence.
    pub repeat_count: usize,
    /// Cards in the base (unrepeated) sequence.
    pub item_count: usize,
}

impl RepetitionPlan {
    /// Total slots to render: one full pass plus the repeated tail.
    pub fn slot_count(&self) -> usize {
        if self.item_count == 0 {
            0
        } else {
            self.item_count + self.repeat_count
        }
    }

    /// Deck index shown in render slot `slot`.
    pub fn item_for_slot(&self, slot: usize) -> Option<usize> {
        (self.item_count > 0).then(|| slot % self.item_count)
    }

    /// Deck indices of the repeated tail: `index mod item_count` for
    /// `index` in `[0, repeat_count)`.
    pub fn repeated_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.repeat_count).filter_map(move |i| self.item_for_slot(i))
    }
}

/// `round(viewport / average_item_width) + 1` once measured, else `1`.
///
/// The `+1` leaves a whole spare card so fractional overscroll at either
/// edge still shows content.
pub fn plan(metrics: &LayoutMetrics, viewport_width: f64) -> RepetitionPlan {
    let repeat_count = if metrics.is_measured() && metrics.average_item_width > 0.0 {
        (viewport_width.max(0.0) / metrics.average_item_width).round() as usize + 1
    } else {
        1
    };
    RepetitionPlan {
        repeat_count,
        item_count: metrics.item_count,
    }
}
