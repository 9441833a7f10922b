//! User configuration: carousel tuning, entrance timing, keybindings and
//! the card deck.
//!
//! Stored as TOML at `$XDG_CONFIG_HOME/loop-carousel/config.toml` (default
//! `~/.config/loop-carousel/config.toml`).  A missing default file means
//! "use the built-in defaults"; a missing file passed explicitly is an error.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::card::{CardDeck, CardItem, DeckError};
use crate::core::carousel::CarouselSettings;
use crate::core::entrance::EntranceTimeline;

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    PrimaryAction,
    NudgeLeft,
    NudgeRight,
    Quit,
}

impl Action {
    pub const ALL: &[Action] = &[
        Action::PrimaryAction,
        Action::NudgeLeft,
        Action::NudgeRight,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::PrimaryAction => "Get started",
            Action::NudgeLeft => "Previous card",
            Action::NudgeRight => "Next card",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the `[keys]` table.
    fn config_key(self) -> &'static str {
        match self {
            Action::PrimaryAction => "primary_action",
            Action::NudgeLeft => "nudge_left",
            Action::NudgeRight => "nudge_right",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding: key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Only CTRL/ALT/SHIFT are compared.
    pub fn matches(&self, event: KeyEvent) -> bool {
        self.code == event.code && (self.modifiers & MODIFIER_MASK) == (event.modifiers & MODIFIER_MASK)
    }

    /// User-friendly display string (e.g. `"Ctrl+c"`, `"←"`, `"Enter"`).
    pub fn display(&self) -> String {
        let mut s = modifier_prefix(self.modifiers);
        s.push_str(&match self.code {
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            _ => key_name(self.code),
        });
        s
    }

    /// Config-file form (e.g. `"Ctrl+c"`, `"Left"`).
    fn to_config_string(&self) -> String {
        let mut s = modifier_prefix(self.modifiers);
        s.push_str(&key_name(self.code));
        s
    }

    /// Parse a key string like `"Ctrl+c"`, `"Alt+Left"`, `"q"`, `"Enter"`.
    pub fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let (key_part, mods) = parts.split_last()?;

        for part in mods {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "space" => KeyCode::Char(' '),
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            k if k.starts_with('f') && k.len() > 1 => KeyCode::F(k[1..].parse().ok()?),
            _ => {
                let mut chars = key_part.chars();
                let c = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                KeyCode::Char(c)
            }
        };

        Some(KeyBind { code, modifiers })
    }
}

fn modifier_prefix(modifiers: KeyModifiers) -> String {
    let mut s = String::new();
    if modifiers.contains(KeyModifiers::CONTROL) {
        s.push_str("Ctrl+");
    }
    if modifiers.contains(KeyModifiers::ALT) {
        s.push_str("Alt+");
    }
    if modifiers.contains(KeyModifiers::SHIFT) {
        s.push_str("Shift+");
    }
    s
}

fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".into(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Up => "Up".into(),
        KeyCode::Down => "Down".into(),
        KeyCode::Left => "Left".into(),
        KeyCode::Right => "Right".into(),
        KeyCode::Enter => "Enter".into(),
        KeyCode::Esc => "Esc".into(),
        KeyCode::Tab => "Tab".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    }
}

// ───────────────────────────────────────── errors ────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("cannot serialise config: {0}")]
    Serialise(#[from] toml::ser::Error),
    #[error("unknown action `{0}` in [keys]")]
    UnknownAction(String),
    #[error("cannot parse key `{key}` for `{action}`")]
    BadKey { action: String, key: String },
    #[error("invalid card deck: {0}")]
    Deck(#[from] DeckError),
}

// ───────────────────────────────────────── file format ───────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct EntranceSection {
    enabled: bool,
    startup_delay_ms: u64,
    elements_ms: u64,
    title_offset_ms: u64,
    title_ms: u64,
}

impl Default for EntranceSection {
    fn default() -> Self {
        Self::from_timeline(true, &EntranceTimeline::default())
    }
}

impl EntranceSection {
    fn from_timeline(enabled: bool, t: &EntranceTimeline) -> Self {
        Self {
            enabled,
            startup_delay_ms: t.startup_delay.as_millis() as u64,
            elements_ms: t.elements_duration.as_millis() as u64,
            title_offset_ms: t.title_offset.as_millis() as u64,
            title_ms: t.title_duration.as_millis() as u64,
        }
    }

    fn timeline(&self) -> EntranceTimeline {
        EntranceTimeline {
            startup_delay: Duration::from_millis(self.startup_delay_ms),
            elements_duration: Duration::from_millis(self.elements_ms),
            title_offset: Duration::from_millis(self.title_offset_ms),
            title_duration: Duration::from_millis(self.title_ms),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct ConfigFile {
    headline: String,
    carousel: CarouselSettings,
    entrance: EntranceSection,
    keys: BTreeMap<String, Vec<String>>,
    cards: Vec<CardItem>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            headline: DEFAULT_HEADLINE.to_string(),
            carousel: CarouselSettings::default(),
            entrance: EntranceSection::default(),
            keys: BTreeMap::new(),
            cards: Vec::new(),
        }
    }
}

const DEFAULT_HEADLINE: &str = "Wander somewhere new";

// ───────────────────────────────────────── config ────────────

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub headline: String,
    pub carousel: CarouselSettings,
    pub entrance: EntranceTimeline,
    /// `false` shows everything immediately.
    pub entrance_enabled: bool,
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    pub deck: CardDeck,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            headline: DEFAULT_HEADLINE.to_string(),
            carousel: CarouselSettings::default(),
            entrance: EntranceTimeline::default(),
            entrance_enabled: true,
            bindings: Self::default_bindings(),
            deck: CardDeck::sample(),
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(PrimaryAction, vec![KeyBind::new(Enter, n), KeyBind::new(Char(' '), n)]);
        m.insert(NudgeLeft, vec![KeyBind::new(Left, n), KeyBind::new(Char('h'), n)]);
        m.insert(NudgeRight, vec![KeyBind::new(Right, n), KeyBind::new(Char('l'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n), KeyBind::new(Esc, n)]);

        m
    }

    /// Find the action bound to a key event.  The binding with the most
    /// modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<(Action, u32)> = None;
        for (&action, binds) in &self.bindings {
            for bind in binds.iter().filter(|b| b.matches(event)) {
                let mc = bind.modifiers.bits().count_ones();
                if best.map_or(true, |(_, count)| mc > count) {
                    best = Some((action, mc));
                }
            }
        }
        best.map(|(action, _)| action)
    }

    /// First binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    pub fn status_bar_hint(&self) -> String {
        format!(
            "drag: scroll | {}/{}: step | {}: {} | {}: quit",
            self.short_binding(Action::NudgeLeft),
            self.short_binding(Action::NudgeRight),
            self.short_binding(Action::PrimaryAction),
            Action::PrimaryAction.label().to_lowercase(),
            self.short_binding(Action::Quit),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load from `path`, or from the default location when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (config_path(), false),
        };
        if !required && !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::info!(path = %path.display(), cards = config.deck.len(), "config loaded");
        Ok(config)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(s)?;

        let mut bindings = Self::default_bindings();
        for (name, keys) in &file.keys {
            let action =
                Action::from_config_key(name).ok_or_else(|| ConfigError::UnknownAction(name.clone()))?;
            let parsed = keys
                .iter()
                .map(|k| {
                    KeyBind::parse(k.trim()).ok_or_else(|| ConfigError::BadKey {
                        action: name.clone(),
                        key: k.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            if !parsed.is_empty() {
                bindings.insert(action, parsed);
            }
        }

        let deck = if file.cards.is_empty() {
            CardDeck::sample()
        } else {
            CardDeck::new(file.cards)?
        };

        Ok(Self {
            headline: file.headline,
            carousel: file.carousel,
            entrance: file.entrance.timeline(),
            entrance_enabled: file.entrance.enabled,
            bindings,
            deck,
        })
    }

    /// Render the full configuration as TOML (for `--print-config`).
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        let keys = Action::ALL
            .iter()
            .filter_map(|&action| {
                let binds = self.bindings.get(&action)?;
                let keys = binds.iter().map(KeyBind::to_config_string).collect();
                Some((action.config_key().to_string(), keys))
            })
            .collect();

        let file = ConfigFile {
            headline: self.headline.clone(),
            carousel: self.carousel.clone(),
            entrance: EntranceSection::from_timeline(self.entrance_enabled, &self.entrance),
            keys,
            cards: self.deck.iter().cloned().collect(),
        };
        Ok(toml::to_string_pretty(&file)?)
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/loop-carousel/config.toml`).
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join(env!("CARGO_PKG_NAME")).join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_keybind_parse() {
        assert_eq!(
            KeyBind::parse("Ctrl+c"),
            Some(KeyBind::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
        );
        assert_eq!(
            KeyBind::parse("alt+Left"),
            Some(KeyBind::new(KeyCode::Left, KeyModifiers::ALT))
        );
        assert_eq!(KeyBind::parse("F5"), Some(KeyBind::new(KeyCode::F(5), KeyModifiers::NONE)));
        assert_eq!(KeyBind::parse("Hyper+x"), None);
        assert_eq!(KeyBind::parse("xyz"), None);
    }

    #[test]
    fn test_default_bindings_match() {
        let config = AppConfig::default();
        assert_eq!(
            config.match_key(key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(Action::PrimaryAction)
        );
        assert_eq!(
            config.match_key(key(KeyCode::Char('l'), KeyModifiers::NONE)),
            Some(Action::NudgeRight)
        );
        assert_eq!(config.match_key(key(KeyCode::Char('z'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.deck, CardDeck::sample());
        assert_eq!(config.headline, DEFAULT_HEADLINE);
        assert_eq!(config.carousel.tick_ms, 10);
        assert!((config.carousel.tick_delta - 0.35).abs() < 1e-12);
        assert!(config.entrance_enabled);
        assert!(!config.carousel.stop_autoscroll_on_drag);
    }

    #[test]
    fn test_parse_full_file() {
        let src = r##"
            headline = "Pick a place"

            [carousel]
            card_width = 30
            tick_delta = 0.5
            stop_autoscroll_on_drag = true

            [entrance]
            enabled = false
            startup_delay_ms = 0

            [keys]
            quit = ["Ctrl+q"]

            [[cards]]
            id = "one"
            image_ref = "one.png"
            accent = "#112233"

            [[cards]]
            id = "two"
            image_ref = "two.png"
            title = "Second"
        "##;
        let config = AppConfig::from_toml_str(src).unwrap();
        assert_eq!(config.headline, "Pick a place");
        assert_eq!(config.carousel.card_width, 30);
        assert_eq!(config.carousel.item_spacing, 2);
        assert!(config.carousel.stop_autoscroll_on_drag);
        assert!(!config.entrance_enabled);
        assert_eq!(config.entrance.startup_delay, Duration::ZERO);
        assert_eq!(config.deck.len(), 2);
        assert_eq!(config.deck.get(1).map(|c| c.label()), Some("Second"));
        assert_eq!(
            config.match_key(key(KeyCode::Char('q'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(config.match_key(key(KeyCode::Char('q'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_rejects_bad_keys_and_decks() {
        assert!(matches!(
            AppConfig::from_toml_str("[keys]\nfly = [\"f\"]"),
            Err(ConfigError::UnknownAction(_))
        ));
        assert!(matches!(
            AppConfig::from_toml_str("[keys]\nquit = [\"Meta+q\"]"),
            Err(ConfigError::BadKey { .. })
        ));
        let dup = "[[cards]]\nid = \"a\"\nimage_ref = \"a\"\n[[cards]]\nid = \"a\"\nimage_ref = \"b\"\n";
        assert!(matches!(
            AppConfig::from_toml_str(dup),
            Err(ConfigError::Deck(DeckError::DuplicateId(_)))
        ));
    }

    #[test]
    fn test_printed_config_reloads() {
        let config = AppConfig::default();
        let printed = config.to_toml_string().unwrap();
        let reloaded = AppConfig::from_toml_str(&printed).unwrap();
        assert_eq!(reloaded.deck, config.deck);
        assert_eq!(reloaded.entrance, config.entrance);
        assert_eq!(reloaded.bindings, config.bindings);
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let missing = Path::new("/definitely/not/here/loop-carousel.toml");
        assert!(matches!(AppConfig::load(Some(missing)), Err(ConfigError::Read { .. })));
    }
}
