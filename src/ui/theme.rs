//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Terminal backdrop the fades start from.
pub const BASE: (u8, u8, u8) = (16, 16, 20);

/// Blend `color` over the backdrop at `opacity` (0 = invisible).
pub fn fade(color: (u8, u8, u8), opacity: f64) -> Color {
    mix(BASE, color, opacity)
}

/// Linear blend from `a` to `b`.
pub fn mix(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    let lerp = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * t).round() as u8;
    Color::Rgb(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

/// Central theme: change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    pub const TEXT: (u8, u8, u8) = (236, 236, 240);
    pub const MUTED: (u8, u8, u8) = (140, 140, 150);
    /// Card accent when a card has none.
    pub const FALLBACK_ACCENT: (u8, u8, u8) = (120, 120, 135);

    // ── backdrop ───────────────────────────────────────────────
    /// Ambient fill: the active accent pulled most of the way to black.
    pub fn ambient_style(accent: (u8, u8, u8)) -> Style {
        Style::default().bg(mix(BASE, accent, 0.22))
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn button_style(enabled: bool) -> Style {
        if enabled {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray).add_modifier(Modifier::DIM)
        }
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_endpoints() {
        assert_eq!(fade((200, 100, 0), 0.0), Color::Rgb(16, 16, 20));
        assert_eq!(fade((200, 100, 0), 1.0), Color::Rgb(200, 100, 0));
        assert_eq!(fade((200, 100, 0), 7.0), Color::Rgb(200, 100, 0));
    }
}
