//! Ratatui widget for the looping card strip.
//!
//! Each card is drawn into a scratch buffer at full size and then copied
//! column by column into the target, so cards straddling either edge are
//! clipped cleanly instead of being squashed.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::core::card::{CardDeck, CardItem};
use crate::core::carousel::Slot;
use crate::core::entrance::ElementStyle;

use super::theme::{fade, mix, Theme, BASE};

/// Element blur above which card content is drawn dimmed.
const DIM_BLUR: f64 = 3.0;

/// The card strip.
pub struct CarouselWidget<'a> {
    pub deck: &'a CardDeck,
    pub slots: &'a [Slot],
    /// Wrapped scroll offset (columns).
    pub offset: f64,
    /// Deck index of the active card.
    pub active: Option<usize>,
    /// Entrance reveal state for the whole strip.
    pub style: ElementStyle,
}

impl Widget for CarouselWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height < 3 || self.style.opacity <= 0.0 {
            return;
        }

        let card_h = ((f64::from(area.height) * self.style.scale).round() as u16).clamp(3, area.height);
        let top = area.y + (area.height - card_h) / 2;
        let view_w = f64::from(area.width);

        for slot in self.slots {
            let left = slot.x - self.offset;
            if left + slot.width <= 0.0 || left >= view_w {
                continue;
            }
            let Some(card) = self.deck.get(slot.item) else {
                continue;
            };

            let card_w = slot.width.round() as u16;
            let mut scratch = Buffer::empty(Rect::new(0, 0, card_w, card_h));
            render_card(
                card,
                self.active == Some(slot.item),
                &self.style,
                scratch.area,
                &mut scratch,
            );

            let left_col = left.round() as i32;
            for dx in 0..card_w {
                let sx = left_col + i32::from(dx);
                if sx < 0 || sx >= i32::from(area.width) {
                    continue;
                }
                for dy in 0..card_h {
                    let dst = (area.x + sx as u16, top + dy);
                    if let (Some(src), Some(cell)) = (scratch.cell((dx, dy)), buf.cell_mut(dst)) {
                        *cell = src.clone();
                    }
                }
            }
        }
    }
}

fn render_card(card: &CardItem, active: bool, style: &ElementStyle, area: Rect, buf: &mut Buffer) {
    let accent = card.accent_rgb().unwrap_or(Theme::FALLBACK_ACCENT);
    let opacity = style.opacity;

    let mut border = Style::default().fg(fade(accent, opacity));
    if active {
        border = border.add_modifier(Modifier::BOLD);
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if active { BorderType::Thick } else { BorderType::Rounded })
        .border_style(border)
        .style(Style::default().bg(mix(BASE, accent, 0.35 * opacity)));
    let inner = block.inner(area);
    block.render(area, buf);

    if inner.height == 0 {
        return;
    }

    let mut text = Style::default().fg(fade(Theme::TEXT, opacity));
    if style.blur > DIM_BLUR {
        text = text.add_modifier(Modifier::DIM);
    } else if active {
        text = text.add_modifier(Modifier::BOLD);
    }

    let caption_row = Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 1);
    Paragraph::new(Line::from(card.label()))
        .style(text)
        .alignment(Alignment::Center)
        .render(caption_row, buf);

    if inner.height >= 3 {
        let footer = Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1);
        Paragraph::new(Line::from(card.image_ref.as_str()))
            .style(Style::default().fg(fade(Theme::MUTED, opacity * 0.8)))
            .alignment(Alignment::Center)
            .render(footer, buf);
    }
}
