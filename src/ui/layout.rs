//! Layout helpers: split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Primary screen layout: headline, card strip, action button, status bar.
pub struct AppLayout {
    pub headline_area: Rect,
    pub carousel_area: Rect,
    pub button_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // top margin
                Constraint::Length(3), // headline (room for the rise-in)
                Constraint::Min(5),    // card strip (takes all remaining space)
                Constraint::Length(3), // primary action button
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            headline_area: chunks[1],
            carousel_area: chunks[2],
            button_area: chunks[3],
            status_area: chunks[4],
        }
    }

    /// Centre a one-row button of `label_width` columns in the button area.
    pub fn button_rect(&self, label_width: u16) -> Rect {
        let area = self.button_area;
        let width = label_width.min(area.width);
        Rect::new(
            area.x + (area.width - width) / 2,
            area.y + area.height / 2,
            width,
            area.height.min(1),
        )
    }
}
