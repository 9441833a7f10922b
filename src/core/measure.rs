//! Content measurement: the natural width of one unrepeated pass over the
//! deck.

/// Result of measuring the unrepeated card sequence.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutMetrics {
    /// Gap between adjacent cards (columns).
    pub item_spacing: f64,
    /// `Σ item_width + spacing × item_count`.  Zero until something has been
    /// measured; downstream code treats zero as "not measurable yet".
    pub measured_content_width: f64,
    /// `measured_content_width / item_count`, or zero for an empty deck.
    pub average_item_width: f64,
    pub item_count: usize,
}

impl LayoutMetrics {
    /// `true` once there is a positive width to wrap and divide by.
    pub fn is_measured(&self) -> bool {
        self.item_count > 0 && self.measured_content_width > 0.0
    }
}

/// Measure rendered item widths.  Every item contributes its width plus one
/// trailing gap, so the sequence tiles seamlessly when repeated.
pub fn measure(item_widths: &[f64], item_spacing: f64) -> LayoutMetrics {
    let item_count = item_widths.len();
    if item_count == 0 {
        return LayoutMetrics {
            item_spacing,
            ..LayoutMetrics::default()
        };
    }

    let total: f64 = item_widths.iter().sum();
    let measured_content_width = (total + item_spacing * item_count as f64).max(0.0);

    LayoutMetrics {
        item_spacing,
        measured_content_width,
        average_item_width: measured_content_width / item_count as f64,
        item_count,
    }
}
