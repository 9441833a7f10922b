//! Card records and the immutable deck the carousel loops over.
//!
//! The deck is built once (from config or the built-in sample) and handed to
//! the [`Carousel`](super::carousel::Carousel) by value.  Nothing mutates it
//! afterwards.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ───────────────────────────────────────── card ──────────────

/// A single card in the carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardItem {
    /// Unique identifier within the deck.
    pub id: String,
    /// Opaque reference to the card artwork.  Never loaded by the core.
    pub image_ref: String,
    /// Caption drawn inside the card.  Falls back to `id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// `#rrggbb` accent used for the ambient background.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
}

impl CardItem {
    pub fn new(id: impl Into<String>, image_ref: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            image_ref: image_ref.into(),
            title: None,
            accent: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_accent(mut self, accent: impl Into<String>) -> Self {
        self.accent = Some(accent.into());
        self
    }

    /// Caption shown on the card.
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }

    /// Parse `accent` as an RGB triple.  Malformed values yield `None`.
    pub fn accent_rgb(&self) -> Option<(u8, u8, u8)> {
        let hex = self.accent.as_deref()?.trim().strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some((channel(0)?, channel(2)?, channel(4)?))
    }
}

// ───────────────────────────────────────── deck ──────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeckError {
    #[error("card #{0} has an empty id")]
    EmptyId(usize),
    #[error("duplicate card id `{0}`")]
    DuplicateId(String),
}

/// Ordered, validated, immutable list of cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDeck {
    cards: Vec<CardItem>,
}

impl CardDeck {
    /// Validate and wrap `cards`.  An empty deck is allowed; the carousel
    /// treats it as "not measurable" and never wraps or resolves.
    pub fn new(cards: Vec<CardItem>) -> Result<Self, DeckError> {
        let mut seen = HashSet::with_capacity(cards.len());
        for (i, card) in cards.iter().enumerate() {
            if card.id.trim().is_empty() {
                return Err(DeckError::EmptyId(i));
            }
            if !seen.insert(card.id.as_str()) {
                return Err(DeckError::DuplicateId(card.id.clone()));
            }
        }
        Ok(Self { cards })
    }

    /// Built-in demo deck used when the config has no `[[cards]]`.
    pub fn sample() -> Self {
        let cards = [
            ("aurora", "Aurora", "#3fb6a8"),
            ("canyon", "Canyon", "#c8643b"),
            ("harbor", "Harbor", "#3b6fc8"),
            ("meadow", "Meadow", "#6fae3a"),
            ("dunes", "Dunes", "#d1a54a"),
            ("glacier", "Glacier", "#8fc6e0"),
        ]
        .into_iter()
        .map(|(id, title, accent)| {
            CardItem::new(id, format!("cards/{id}.jpg"))
                .with_title(title)
                .with_accent(accent)
        })
        .collect();
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CardItem> {
        self.cards.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CardItem> {
        self.cards.iter()
    }
}
