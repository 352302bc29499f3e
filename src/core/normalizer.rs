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

//! Key event normalisation
//!
//! Turns a raw key press into a canonical `KeySequence`, or rejects it.
//!
//! Key event generation is one of the least portable things a toolkit
//! does, so each platform family gets its own `KeyEventTranslator`:
//! - `GenericTranslator`: Linux and other X11/Wayland desktops
//! - `MacTranslator`: drops Shift from Meta+Shift+symbol presses
//! - `WindowsTranslator`: resolves characters through a virtual-key map,
//!   rejects dead keys and AltGr
//!
//! Pick one with `translator_for()` at startup and keep it.
//!
//! # Rejections
//! Rejected events are expected and frequent (pressing Ctrl before K
//! produces a bare-modifier event). They carry no error state; callers
//! simply ignore them, except for Backspace and Tab/Backtab which the
//! assignment controller turns into "clear" and focus moves.

use thiserror::Error;
use tracing::debug;

use crate::core::key::{char_key_name, Key, ModifierSet, Platform, RawKeyEvent};
use crate::core::types::{KeySequence, Modifier};

/// Why a key event produced no sequence
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum Rejection {
    /// Ctrl/Shift/Meta/Alt/AltGr pressed on its own
    #[error("Bare modifier key")]
    ModifierKey,

    /// CapsLock/NumLock/ScrollLock
    #[error("Lock key")]
    LockKey,

    /// Tab or Backtab, reserved for moving focus
    #[error("Tab and Backtab are reserved for focus navigation")]
    FocusNavigation { backwards: bool },

    /// Backspace clears the current binding instead
    #[error("Backspace clears the binding")]
    Backspace,

    /// Key code 0, unknown, or a key with no portable name
    #[error("Unrecognised key")]
    Unrecognized,

    /// Diacritic composition key
    #[error("Dead key")]
    DeadKey,

    /// AltGr (GroupSwitch) is never part of a shortcut
    #[error("AltGr is not allowed in shortcuts")]
    AltGr,
}

/// Platform-specific key event translation
pub trait KeyEventTranslator {
    /// Platform family this translator handles
    fn platform(&self) -> Platform;

    /// Normalise a raw key press into a canonical sequence
    ///
    /// Must be a pure function of the event: the same event always
    /// yields the same result.
    fn normalize(&self, event: &RawKeyEvent) -> Result<KeySequence, Rejection>;
}

/// Returns the translator for `platform`
///
/// Windows uses the US layout table; build a `WindowsTranslator`
/// directly to supply a different `VirtualKeyMap`.
pub fn translator_for(platform: Platform) -> Box<dyn KeyEventTranslator> {
    match platform {
        Platform::Generic => Box::new(GenericTranslator),
        Platform::MacOs => Box::new(MacTranslator),
        Platform::Windows => Box::new(WindowsTranslator::new(UsLayout)),
    }
}

/// Rejects keys that can never be recorded, on every platform
fn check_reserved(key: &Key) -> Result<(), Rejection> {
    match key {
        k if k.is_modifier() => Err(Rejection::ModifierKey),
        k if k.is_lock() => Err(Rejection::LockKey),
        Key::Tab => Err(Rejection::FocusNavigation { backwards: false }),
        Key::Backtab => Err(Rejection::FocusNavigation { backwards: true }),
        Key::Backspace => Err(Rejection::Backspace),
        Key::Unknown => Err(Rejection::Unrecognized),
        k if k.portable_name().is_none() => Err(Rejection::Unrecognized),
        _ => Ok(()),
    }
}

fn log_event(platform: Platform, event: &RawKeyEvent) {
    debug!(
        %platform,
        key = ?event.key,
        text = %event.text.escape_debug(),
        native_virtual_key = event.native_virtual_key,
        modifiers = ?event.modifiers,
        "Translating key event"
    );
}

/// Modifiers that count towards a shortcut
///
/// Shift only counts when it is not used to type a symbol that is only
/// reachable with Shift anyway: it is kept when no text was produced,
/// or the first produced character is non-printable, a letter or digit,
/// or whitespace. Ctrl, Meta and Alt are always kept.
pub fn translate_modifiers(state: ModifierSet, text: &str) -> Vec<Modifier> {
    let mut modifiers = Vec::new();

    let shift_counts = match text.chars().next() {
        None => true,
        Some(c) => c.is_control() || c.is_alphanumeric() || c.is_whitespace(),
    };
    if state.contains(ModifierSet::SHIFT) && shift_counts {
        modifiers.push(Modifier::Shift);
    }

    if state.contains(ModifierSet::CTRL) {
        modifiers.push(Modifier::Ctrl);
    }
    if state.contains(ModifierSet::META) {
        modifiers.push(Modifier::Meta);
    }
    if state.contains(ModifierSet::ALT) {
        modifiers.push(Modifier::Alt);
    }

    modifiers
}

/// Every modifier in `state`, Shift included
fn verbatim_modifiers(state: ModifierSet) -> Vec<Modifier> {
    [
        (ModifierSet::CTRL, Modifier::Ctrl),
        (ModifierSet::ALT, Modifier::Alt),
        (ModifierSet::META, Modifier::Meta),
        (ModifierSet::SHIFT, Modifier::Shift),
    ]
    .into_iter()
    .filter(|(flag, _)| state.contains(*flag))
    .map(|(_, modifier)| modifier)
    .collect()
}

/// Symbol a Shift press typed: the first produced character, unless it
/// is a control character, a letter or digit, or whitespace
fn typed_symbol(text: &str) -> Option<String> {
    let c = text.chars().next()?;
    if c.is_control() || c.is_alphanumeric() || c.is_whitespace() {
        return None;
    }
    char_key_name(c)
}

/// Sequence for `key`; keys with no portable spelling are unrecognised
fn build_sequence(modifiers: Vec<Modifier>, key: &str) -> Result<KeySequence, Rejection> {
    KeySequence::new(modifiers, key).map_err(|e| {
        debug!(error = %e, "Key has no portable spelling");
        Rejection::Unrecognized
    })
}

/// Builds the sequence once Shift policy has been applied to `state`
///
/// `shift_swallowed` is set when a platform fixup already removed Shift
/// from `state` as a typing modifier.
fn sequence_from_typed(
    event: &RawKeyEvent,
    state: ModifierSet,
    shift_swallowed: bool,
) -> Result<KeySequence, Rejection> {
    let modifiers = translate_modifiers(state, &event.text);

    // Shift was swallowed as a typing modifier: record the symbol it typed
    let shift_typed = shift_swallowed
        || (state.contains(ModifierSet::SHIFT) && !modifiers.contains(&Modifier::Shift));

    let key = match typed_symbol(&event.text).filter(|_| shift_typed) {
        Some(symbol) => symbol,
        None => event.key.portable_name().ok_or(Rejection::Unrecognized)?,
    };

    build_sequence(modifiers, &key)
}

/// Linux and other X11/Wayland desktops
#[derive(Clone, Copy, Debug, Default)]
pub struct GenericTranslator;

impl KeyEventTranslator for GenericTranslator {
    fn platform(&self) -> Platform {
        Platform::Generic
    }

    fn normalize(&self, event: &RawKeyEvent) -> Result<KeySequence, Rejection> {
        check_reserved(&event.key)?;
        log_event(self.platform(), event);

        sequence_from_typed(event, event.modifiers, false)
    }
}

/// macOS
///
/// Meta+Shift+key presses misreport whether the character is printable,
/// so Shift is dropped whenever Meta is held and the key is not a letter.
/// The symbol Shift typed, if any, is still what gets recorded.
#[derive(Clone, Copy, Debug, Default)]
pub struct MacTranslator;

impl KeyEventTranslator for MacTranslator {
    fn platform(&self) -> Platform {
        Platform::MacOs
    }

    fn normalize(&self, event: &RawKeyEvent) -> Result<KeySequence, Rejection> {
        check_reserved(&event.key)?;
        log_event(self.platform(), event);

        let letter = event.key.portable_name().ok_or(Rejection::Unrecognized)?;

        let mut state = event.modifiers;
        let fixup = state.contains(ModifierSet::META | ModifierSet::SHIFT)
            && letter.to_uppercase() == letter.to_lowercase();
        if fixup {
            state.remove(ModifierSet::SHIFT);
        }

        sequence_from_typed(event, state, fixup)
    }
}

/// Virtual-key to character lookup, as done by `MapVirtualKeyW`
///
/// The result packs the unshifted character into the low 16 bits;
/// bit 31 marks a dead key. Zero means "no character".
pub trait VirtualKeyMap {
    fn map_vk_to_char(&self, vk: u32) -> u32;
}

impl<F> VirtualKeyMap for F
where
    F: Fn(u32) -> u32,
{
    fn map_vk_to_char(&self, vk: u32) -> u32 {
        self(vk)
    }
}

/// Dead-key flag in a `VirtualKeyMap` result
pub const DEAD_KEY_FLAG: u32 = 0x8000_0000;

/// US keyboard layout table
#[derive(Clone, Copy, Debug, Default)]
pub struct UsLayout;

impl VirtualKeyMap for UsLayout {
    fn map_vk_to_char(&self, vk: u32) -> u32 {
        let c = match vk {
            0x20 => ' ',
            // Digits and letters share their ASCII codes
            0x30..=0x39 | 0x41..=0x5A => return vk,
            // Numpad
            0x60..=0x69 => return u32::from(b'0') + (vk - 0x60),
            0x6A => '*',
            0x6B => '+',
            0x6D => '-',
            0x6E => '.',
            0x6F => '/',
            // OEM keys
            0xBA => ';',
            0xBB => '=',
            0xBC => ',',
            0xBD => '-',
            0xBE => '.',
            0xBF => '/',
            0xC0 => '`',
            0xDB => '[',
            0xDC => '\\',
            0xDD => ']',
            0xDE => '\'',
            _ => return 0,
        };
        u32::from(c)
    }
}

/// Windows
///
/// Characters come from the virtual-key map, which knows about the
/// active layout; the toolkit's key code is only used for keys that
/// map to no character (F-keys, arrows, ...).
pub struct WindowsTranslator<M: VirtualKeyMap> {
    keymap: M,
}

impl<M: VirtualKeyMap> WindowsTranslator<M> {
    pub fn new(keymap: M) -> Self {
        Self { keymap }
    }
}

impl<M: VirtualKeyMap> KeyEventTranslator for WindowsTranslator<M> {
    fn platform(&self) -> Platform {
        Platform::Windows
    }

    fn normalize(&self, event: &RawKeyEvent) -> Result<KeySequence, Rejection> {
        check_reserved(&event.key)?;
        log_event(self.platform(), event);

        if event.modifiers.contains(ModifierSet::GROUP_SWITCH) {
            return Err(Rejection::AltGr);
        }

        let mapped = self.keymap.map_vk_to_char(event.native_virtual_key);
        let is_dead_key = mapped & DEAD_KEY_FLAG == DEAD_KEY_FLAG;
        let code = mapped & 0x0000_FFFF;
        debug!(code, is_dead_key, "Virtual key lookup");

        if code != 0 {
            if is_dead_key {
                return Err(Rejection::DeadKey);
            }
            let key = char::from_u32(code)
                .and_then(char_key_name)
                .ok_or(Rejection::Unrecognized)?;
            return build_sequence(verbatim_modifiers(event.modifiers), &key);
        }

        let letter = event.key.portable_name().ok_or(Rejection::Unrecognized)?;

        // Shift is already part of a non-letter key code
        let mut state = event.modifiers;
        if state.contains(ModifierSet::SHIFT) && letter.to_uppercase() == letter.to_lowercase() {
            state.remove(ModifierSet::SHIFT);
        }

        build_sequence(verbatim_modifiers(state), &letter)
    }
}
