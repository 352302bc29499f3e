// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! src/core/key.rs
//!
//! Raw key-press input as delivered by the windowing toolkit
//!
//! These types describe what the toolkit reports *before* normalisation:
//! - `Key`: the key code of the pressed key
//! - `ModifierSet`: the modifier bitset held during the press
//! - `RawKeyEvent`: key + modifiers + produced text + native virtual key
//! - `Platform`: the platform family the event originated from
//!
//! Nothing here decides what a shortcut *is*; that is the job of
//! the translators in `normalizer.rs`.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// Modifier keys held while a key was pressed.
    ///
    /// `GROUP_SWITCH` is what Windows reports for AltGr when the
    /// AltGr option is enabled; it is never part of a shortcut.
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    pub struct ModifierSet: u8 {
        const SHIFT = 0b0000_0001;
        const CTRL = 0b0000_0010;
        const ALT = 0b0000_0100;
        const META = 0b0000_1000;
        const GROUP_SWITCH = 0b0001_0000;
    }
}

/// Key code of a single key press.
///
/// Character-producing keys carry the character printed on the key
/// (letters in either case; the translators uppercase them).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Key {
    // Bare modifiers
    Control,
    Shift,
    Meta,
    Alt,
    AltGr,

    // Lock keys
    CapsLock,
    NumLock,
    ScrollLock,

    // Focus navigation
    Tab,
    Backtab,

    Backspace,
    Escape,
    Return,
    Enter,
    Insert,
    Delete,
    Pause,
    Print,
    SysReq,
    Home,
    End,
    Left,
    Up,
    Right,
    Down,
    PageUp,
    PageDown,
    Space,
    Menu,
    Help,

    /// Function key F1..=F35
    F(u8),

    /// Any character-producing key
    Char(char),

    /// Key code 0 or a key the toolkit could not identify
    Unknown,
}

impl Key {
    /// True for Ctrl/Shift/Meta/Alt/AltGr pressed on their own
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            Key::Control | Key::Shift | Key::Meta | Key::Alt | Key::AltGr
        )
    }

    pub fn is_lock(&self) -> bool {
        matches!(self, Key::CapsLock | Key::NumLock | Key::ScrollLock)
    }

    /// Looks a key up by name (case-insensitive).
    ///
    /// Accepts portable names, common aliases, bare modifier and lock
    /// key names, and single characters. Anything else is `Unknown`.
    pub fn from_name(name: &str) -> Key {
        let lowered = name.trim().to_lowercase();
        match lowered.as_str() {
            "ctrl" | "control" => Key::Control,
            "shift" => Key::Shift,
            "meta" | "cmd" | "command" | "super" => Key::Meta,
            "alt" | "option" => Key::Alt,
            "altgr" => Key::AltGr,
            "capslock" => Key::CapsLock,
            "numlock" => Key::NumLock,
            "scrolllock" => Key::ScrollLock,
            "tab" => Key::Tab,
            "backtab" => Key::Backtab,
            "backspace" => Key::Backspace,
            "esc" | "escape" => Key::Escape,
            "return" => Key::Return,
            "enter" => Key::Enter,
            "ins" | "insert" => Key::Insert,
            "del" | "delete" => Key::Delete,
            "pause" => Key::Pause,
            "print" => Key::Print,
            "sysreq" => Key::SysReq,
            "home" => Key::Home,
            "end" => Key::End,
            "left" => Key::Left,
            "up" => Key::Up,
            "right" => Key::Right,
            "down" => Key::Down,
            "pgup" | "pageup" => Key::PageUp,
            "pgdown" | "pagedown" => Key::PageDown,
            "space" => Key::Space,
            "menu" => Key::Menu,
            "help" => Key::Help,
            _ => {
                let mut chars = name.trim().chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => match lowered.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                        Some(n) if (1..=35).contains(&n) => Key::F(n),
                        _ => Key::Unknown,
                    },
                }
            }
        }
    }

    /// Portable name of the key, as used in canonical sequences.
    ///
    /// Returns `None` for keys that can never appear in a shortcut.
    pub fn portable_name(&self) -> Option<String> {
        let name = match self {
            Key::Tab => "Tab",
            Key::Backtab => "Backtab",
            Key::Backspace => "Backspace",
            Key::Escape => "Esc",
            Key::Return => "Return",
            Key::Enter => "Enter",
            Key::Insert => "Ins",
            Key::Delete => "Del",
            Key::Pause => "Pause",
            Key::Print => "Print",
            Key::SysReq => "SysReq",
            Key::Home => "Home",
            Key::End => "End",
            Key::Left => "Left",
            Key::Up => "Up",
            Key::Right => "Right",
            Key::Down => "Down",
            Key::PageUp => "PgUp",
            Key::PageDown => "PgDown",
            Key::Space => "Space",
            Key::Menu => "Menu",
            Key::Help => "Help",
            Key::F(n) if (1..=35).contains(n) => return Some(format!("F{}", n)),
            Key::Char(c) => return char_key_name(*c),
            _ => return None,
        };
        Some(name.to_string())
    }
}

/// Portable name for a character key.
///
/// Letters are uppercased unless their uppercase form is more than one
/// character (`ß` stays `ß`), a literal space becomes `Space`. Control
/// characters and other whitespace have no name.
pub fn char_key_name(c: char) -> Option<String> {
    if c == ' ' {
        return Some("Space".to_string());
    }
    if c.is_control() || c.is_whitespace() {
        return None;
    }

    let mut upper = c.to_uppercase();
    let name = match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => c,
    };
    Some(name.to_string())
}

/// A key press as reported by the toolkit.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawKeyEvent {
    /// Key code
    pub key: Key,

    /// Modifiers held during the press
    pub modifiers: ModifierSet,

    /// Text the key press produced (may be empty)
    pub text: String,

    /// Native virtual-key code (only meaningful on Windows)
    pub native_virtual_key: u32,
}

impl RawKeyEvent {
    pub fn new(key: Key, modifiers: ModifierSet, text: &str) -> Self {
        Self {
            key,
            modifiers,
            text: text.to_string(),
            native_virtual_key: 0,
        }
    }

    /// Attach the native virtual-key code
    pub fn with_virtual_key(mut self, vk: u32) -> Self {
        self.native_virtual_key = vk;
        self
    }
}

/// Platform family a key event came from.
///
/// Selects the translator once at startup and decides how sequences
/// are rendered for display.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Platform {
    /// Linux and other X11/Wayland desktops
    Generic,
    MacOs,
    Windows,
}

impl Platform {
    /// Platform family of the running binary
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Generic
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Generic => write!(f, "generic"),
            Platform::MacOs => write!(f, "macos"),
            Platform::Windows => write!(f, "windows"),
        }
    }
}
