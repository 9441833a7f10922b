//! Autoscroll indicator: a small spinner + label rendered in the top-right
//! corner of a given area.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Braille-dot spinner frames.  Cycles through these on each frame.
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
/// Frames each spinner glyph is held for.
const FRAMES_PER_GLYPH: u64 = 4;

/// "auto" badge with a spinning icon while the carousel advances itself.
pub struct AutoscrollIndicator {
    /// Whether the autoscroll driver is still running.
    pub running: bool,
    /// Monotonically increasing frame counter (drives the spinner frame).
    pub tick: u64,
}

impl Widget for AutoscrollIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.running || area.width < 12 || area.height == 0 {
            return;
        }

        let idx = (self.tick / FRAMES_PER_GLYPH) as usize % SPINNER_FRAMES.len();
        let label = format!(" {} auto ", SPINNER_FRAMES[idx]);

        let label_width = label.chars().count() as u16;
        let x = area.x + area.width.saturating_sub(label_width + 1);
        let y = area.y;

        let line = Line::from(Span::styled(
            label,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));

        buf.set_line(x, y, &line, label_width);
    }
}
