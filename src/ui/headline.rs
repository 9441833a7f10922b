//! Headline with a per-glyph cascading reveal.
//!
//! Each glyph fades in, sharpens and rises into place on its own schedule
//! (see [`reveal_slices`]).  Terminal cells can't blur, so blur maps to DIM
//! and the vertical offset to whole rows.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::entrance::reveal_slices;

use super::theme::{fade, Theme};

/// Offset units per terminal row.
const UNITS_PER_ROW: f64 = 2.5;
/// Blur above which a glyph is drawn dimmed.
const DIM_BLUR: f64 = 2.0;
/// Glyphs fainter than this aren't drawn at all.
const MIN_OPACITY: f64 = 0.08;

pub struct HeadlineWidget<'a> {
    pub text: &'a str,
    /// Headline reveal progress in `[0, 1]`.
    pub progress: f64,
}

impl Widget for HeadlineWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let text_w = self.text.width() as u16;
        let mut x = area.x + area.width.saturating_sub(text_w) / 2;
        let right = area.x + area.width;

        for (glyph, style) in reveal_slices(self.text, self.progress) {
            let w = glyph.width().unwrap_or(0) as u16;
            if x + w > right {
                break;
            }
            if style.opacity >= MIN_OPACITY && w > 0 {
                let drop = (style.y_offset / UNITS_PER_ROW).round() as u16;
                let y = area.y + drop.min(area.height - 1);

                let mut cell_style = Style::default()
                    .fg(fade(Theme::TEXT, style.opacity))
                    .add_modifier(Modifier::BOLD);
                if style.blur > DIM_BLUR {
                    cell_style = cell_style.add_modifier(Modifier::DIM);
                }
                buf.set_string(x, y, glyph.to_string(), cell_style);
            }
            x += w;
        }
    }
}
