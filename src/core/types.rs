//! src/core/types.rs
//!
//! Core type definitions for shortcut management
//!
//! This module defines the fundamental types used throughout the crate:
//! - `Modifier`: Modifier keys that may appear in a shortcut (Ctrl, Alt, Meta, Shift)
//! - `KeySequence`: The canonical, platform-portable form of a shortcut
//! - `ShortcutMetadata`: Display name and description of an action
//! - `ShortcutEntry`: One action in the registry with its current binding
//!
//! Two sequences are equal exactly when their portable text is equal.
//! `KeySequence::new()` and the `FromStr` impl both normalise, so the
//! derived `Eq`/`Hash`/`Ord` agree with the portable text.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

use crate::core::key::{char_key_name, Platform};

/// Modifier keys recorded in a shortcut
///
/// Declaration order is the canonical output order: Ctrl, Alt, Meta, Shift.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum Modifier {
    /// Control key (Command on macOS)
    Ctrl,
    /// Alt/Option key
    Alt,
    /// Meta key (Control on macOS, Windows key elsewhere)
    Meta,
    /// Shift key
    Shift,
}

impl Modifier {
    /// macOS glyph; Qt-style mapping puts Command on `Ctrl`
    fn mac_glyph(&self) -> &'static str {
        match self {
            Modifier::Ctrl => "⌘",
            Modifier::Alt => "⌥",
            Modifier::Meta => "⌃",
            Modifier::Shift => "⇧",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "ctrl" | "control" => Some(Modifier::Ctrl),
            "alt" | "option" => Some(Modifier::Alt),
            "meta" | "cmd" | "command" | "super" => Some(Modifier::Meta),
            "shift" => Some(Modifier::Shift),
            _ => None,
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::Ctrl => write!(f, "Ctrl"),
            Modifier::Alt => write!(f, "Alt"),
            Modifier::Meta => write!(f, "Meta"),
            Modifier::Shift => write!(f, "Shift"),
        }
    }
}

/// Errors from parsing the textual form of a sequence
#[derive(Debug, Error, PartialEq)]
pub enum SequenceParseError {
    #[error("Unknown modifier '{0}'")]
    UnknownModifier(String),

    #[error("Unknown key '{0}'")]
    UnknownKey(String),

    #[error("Sequence '{0}' has no key")]
    MissingKey(String),

    #[error("Empty component in sequence '{0}'")]
    EmptyComponent(String),
}

/// A canonical key sequence: zero or more modifiers plus one key
///
/// The empty sequence (no key) means "unbound".
///
/// # Example
/// ```
/// use sigil_shortcuts::core::{KeySequence, Modifier};
///
/// let seq = KeySequence::new(vec![Modifier::Shift, Modifier::Ctrl], "k")?;
/// assert_eq!(seq.to_string(), "Ctrl+Shift+K");
/// assert_eq!("ctrl+shift+K".parse::<KeySequence>()?, seq);
/// # Ok::<(), sigil_shortcuts::core::SequenceParseError>(())
/// ```
#[derive(
    Clone, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct KeySequence {
    /// Sorted, de-duplicated modifiers
    modifiers: Vec<Modifier>,

    /// Portable key name, empty for the unbound sequence
    key: String,
}

impl KeySequence {
    /// Create a sequence with normalised modifiers and key name
    ///
    /// Normalisation includes:
    /// - Sorting modifiers into canonical order
    /// - Removing duplicate modifiers
    /// - Mapping key aliases to their portable spelling
    ///
    /// An empty key gives the unbound sequence. A key with no portable
    /// spelling is an error, so every sequence survives a round trip
    /// through its text form.
    pub fn new(mut modifiers: Vec<Modifier>, key: &str) -> Result<Self, SequenceParseError> {
        // Modifiers alone are not a binding
        if key.is_empty() {
            return Ok(Self::empty());
        }

        let key = canonical_key_name(key)?;
        modifiers.sort();
        modifiers.dedup();

        Ok(Self { modifiers, key })
    }

    /// The unbound sequence
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    /// Text shown to the user on `platform`
    ///
    /// macOS gets native glyphs (`⇧⌘S`); every other platform gets the
    /// portable text. Never use this for comparisons.
    pub fn display_text(&self, platform: Platform) -> String {
        if self.is_empty() {
            return String::new();
        }

        match platform {
            Platform::MacOs => {
                // Native order is Control, Option, Shift, Command
                let order = [Modifier::Meta, Modifier::Alt, Modifier::Shift, Modifier::Ctrl];
                let mut text: String = order
                    .iter()
                    .filter(|m| self.has_modifier(**m))
                    .map(|m| m.mac_glyph())
                    .collect();
                text.push_str(mac_key_glyph(&self.key).unwrap_or(&self.key));
                text
            }
            Platform::Generic | Platform::Windows => self.to_string(),
        }
    }
}

fn mac_key_glyph(key: &str) -> Option<&'static str> {
    let glyph = match key {
        "Backspace" => "⌫",
        "Del" => "⌦",
        "Return" => "↩",
        "Enter" => "⌤",
        "Esc" => "⎋",
        "Tab" => "⇥",
        "Backtab" => "⇤",
        "Left" => "←",
        "Up" => "↑",
        "Right" => "→",
        "Down" => "↓",
        "PgUp" => "⇞",
        "PgDown" => "⇟",
        "Home" => "↖",
        "End" => "↘",
        "Space" => "Space",
        _ => return None,
    };
    Some(glyph)
}

/// Map a key name (any accepted spelling) to its portable spelling
pub fn canonical_key_name(token: &str) -> Result<String, SequenceParseError> {
    let lowered = token.to_lowercase();

    let named = match lowered.as_str() {
        "esc" | "escape" => Some("Esc"),
        "tab" => Some("Tab"),
        "backtab" => Some("Backtab"),
        "backspace" => Some("Backspace"),
        "return" => Some("Return"),
        "enter" => Some("Enter"),
        "ins" | "insert" => Some("Ins"),
        "del" | "delete" => Some("Del"),
        "pause" => Some("Pause"),
        "print" => Some("Print"),
        "sysreq" => Some("SysReq"),
        "home" => Some("Home"),
        "end" => Some("End"),
        "left" => Some("Left"),
        "up" => Some("Up"),
        "right" => Some("Right"),
        "down" => Some("Down"),
        "pgup" | "pageup" => Some("PgUp"),
        "pgdown" | "pagedown" => Some("PgDown"),
        "space" => Some("Space"),
        "menu" => Some("Menu"),
        "help" => Some("Help"),
        _ => None,
    };
    if let Some(name) = named {
        return Ok(name.to_string());
    }

    let mut chars = token.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return char_key_name(c).ok_or_else(|| SequenceParseError::UnknownKey(token.to_string()));
    }

    if let Some(number) = lowered.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        if (1..=35).contains(&number) {
            return Ok(format!("F{}", number));
        }
    }

    Err(SequenceParseError::UnknownKey(token.to_string()))
}

impl fmt::Display for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier)?;
        }
        write!(f, "{}", self.key)
    }
}

impl FromStr for KeySequence {
    type Err = SequenceParseError;

    /// Parse portable text such as `Ctrl+Shift+K` or `Ctrl++`
    ///
    /// Matching is case-insensitive and accepts the usual aliases.
    /// The empty string parses to the unbound sequence.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Self::empty());
        }

        // `+` as the key itself: "+" or "...++"
        let (prefix, key_token) = if trimmed == "+" {
            ("", "+")
        } else if let Some(rest) = trimmed.strip_suffix("++") {
            (rest, "+")
        } else {
            match trimmed.rsplit_once('+') {
                Some((rest, key)) => (rest, key),
                None => ("", trimmed),
            }
        };

        let mut modifiers = Vec::new();
        if !prefix.is_empty() {
            for part in prefix.split('+') {
                let part = part.trim();
                if part.is_empty() {
                    return Err(SequenceParseError::EmptyComponent(s.to_string()));
                }
                let modifier = Modifier::from_name(part)
                    .ok_or_else(|| SequenceParseError::UnknownModifier(part.to_string()))?;
                modifiers.push(modifier);
            }
        }

        let key_token = key_token.trim();
        if key_token.is_empty() {
            return Err(SequenceParseError::EmptyComponent(s.to_string()));
        }
        if Modifier::from_name(key_token).is_some() {
            return Err(SequenceParseError::MissingKey(s.to_string()));
        }

        Self::new(modifiers, key_token)
    }
}

impl TryFrom<String> for KeySequence {
    type Error = SequenceParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeySequence> for String {
    fn from(seq: KeySequence) -> Self {
        seq.to_string()
    }
}

/// Static display data for an action, keyed by shortcut id
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ShortcutMetadata {
    /// Human-readable action name
    pub name: String,

    /// Tooltip/help text
    pub description: String,
}

/// One action in the shortcut registry
///
/// # Example
/// ```
/// use sigil_shortcuts::core::{KeySequence, ShortcutEntry};
///
/// let entry = ShortcutEntry {
///     id: "MainWindow.Save".to_string(),
///     name: "Save".to_string(),
///     description: "Save the current book".to_string(),
///     sequence: "Ctrl+S".parse().unwrap(),
/// };
/// assert!(!entry.is_unbound());
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ShortcutEntry {
    /// Stable external identifier, unique within a registry
    pub id: String,

    pub name: String,

    pub description: String,

    /// Current binding; empty when unbound
    pub sequence: KeySequence,
}

impl ShortcutEntry {
    pub fn is_unbound(&self) -> bool {
        self.sequence.is_empty()
    }
}

impl fmt::Display for ShortcutEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sequence.is_empty() {
            write!(f, "{} (unbound)", self.name)
        } else {
            write!(f, "{} = {}", self.name, self.sequence)
        }
    }
}
