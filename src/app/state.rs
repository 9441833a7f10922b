//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::time::Instant;

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::core::carousel::Carousel;
use crate::core::entrance::{EntranceSequencer, EntranceSnapshot};
use crate::ui::ambient::AmbientFade;

/// Screen regions recorded by the last draw, for mouse hit-testing.
#[derive(Debug, Clone, Copy, Default)]
pub struct HitZones {
    pub carousel: Rect,
    pub button: Rect,
}

impl HitZones {
    pub fn in_carousel(&self, column: u16, row: u16) -> bool {
        contains(self.carousel, column, row)
    }

    pub fn in_button(&self, column: u16, row: u16) -> bool {
        contains(self.button, column, row)
    }
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

/// Top-level application state.
pub struct AppState {
    /// Scroll core: deck, offset, autoscroll and active card.
    pub carousel: Carousel,
    /// One-shot entrance sequence.
    pub entrance: EntranceSequencer,
    /// When `false` the entrance is skipped and everything is fully shown.
    pub entrance_enabled: bool,
    /// Crossfading background colour that follows the active card.
    pub ambient: AmbientFade,
    /// User configuration (headline, keybindings).
    pub config: AppConfig,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Regions from the previous frame.
    pub hit: HitZones,
    /// Time of the previous frame tick (momentum integration).
    pub last_frame: Instant,
    /// Frames drawn so far (drives the autoscroll indicator).
    pub frame_count: u64,
}

impl AppState {
    pub fn new(config: AppConfig, now: Instant) -> Self {
        if config.deck.is_empty() {
            tracing::warn!("card deck is empty; nothing to scroll");
        }
        let carousel = Carousel::new(config.deck.clone(), config.carousel.clone());
        let accent = carousel.active_card().and_then(|c| c.accent_rgb());
        Self {
            carousel,
            entrance: EntranceSequencer::new(config.entrance),
            entrance_enabled: config.entrance_enabled,
            ambient: AmbientFade::new(accent, 0.12),
            config,
            should_quit: false,
            status_message: None,
            hit: HitZones::default(),
            last_frame: now,
            frame_count: 0,
        }
    }

    /// What the renderer should show of the entrance right now.
    pub fn entrance_snapshot(&self) -> EntranceSnapshot {
        if self.entrance_enabled {
            self.entrance.snapshot()
        } else {
            EntranceSnapshot::finished()
        }
    }
}
