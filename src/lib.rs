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

//! Sigil keyboard shortcuts
//!
//! Keyboard shortcut capture, normalisation and conflict detection for
//! the Sigil EPUB editor's preferences.
//!
//! # Features
//!
//! - **Key normalisation:** Raw key presses become portable sequences (`Ctrl+Shift+K`)
//! - **Per-platform translators:** Linux, macOS and Windows quirks kept apart
//! - **Conflict Detection:** Entries sharing a sequence are flagged
//! - **Last-writer-wins assignment:** Committing a sequence unbinds its previous holder
//! - **Atomic Saves:** Store files are replaced atomically after a timestamped backup
//!
//! # Architecture
//!
//! - **`core`:** Business logic (key events, normaliser, conflicts, registry)
//! - **`config`:** Shortcut stores (in-memory and file-backed)
//! - **`ui`:** Assignment controller and display projection
//!
//! # Examples
//!
//! ## Normalising a key press
//!
//! ```
//! use sigil_shortcuts::core::{translator_for, Key, ModifierSet, Platform, RawKeyEvent};
//!
//! let translator = translator_for(Platform::Generic);
//!
//! // Shift+2 typing '@' records the symbol, not Shift
//! let event = RawKeyEvent::new(Key::Char('2'), ModifierSet::SHIFT, "@");
//! assert_eq!(translator.normalize(&event).unwrap().to_string(), "@");
//! ```
//!
//! ## Detecting conflicts
//!
//! ```
//! use sigil_shortcuts::config::MemoryStore;
//! use sigil_shortcuts::core::{detect, Registry};
//!
//! let mut store = MemoryStore::new();
//! store.define("a", "Bold", "", "Ctrl+B".parse()?);
//! store.define("b", "Bookmark", "", "Ctrl+B".parse()?);
//!
//! let registry = Registry::load(&store);
//! let conflicts = detect(registry.entries()).find_conflicts();
//! assert_eq!(conflicts.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Assigning a shortcut
//!
//! ```
//! use sigil_shortcuts::config::MemoryStore;
//! use sigil_shortcuts::core::{Key, ModifierSet, Platform, RawKeyEvent};
//! use sigil_shortcuts::ui::{AssignmentController, KeyResponse};
//!
//! let mut store = MemoryStore::new();
//! store.define("a", "Bold", "", "Ctrl+B".parse()?);
//! store.define("b", "Bookmark", "", "".parse()?);
//!
//! let mut controller = AssignmentController::load(&store, Platform::Generic);
//! controller.select(Some("b"));
//!
//! let event = RawKeyEvent::new(Key::Char('b'), ModifierSet::CTRL, "\u{2}");
//! assert!(matches!(controller.handle_key_event(&event), KeyResponse::Staged(_)));
//!
//! // "Bold" loses Ctrl+B to "Bookmark"
//! assert_eq!(controller.commit(), vec!["a".to_string()]);
//! controller.save(&mut store)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod core;
pub mod ui;

// Re-export commonly used types for convenience
pub use core::{KeySequence, Modifier, ShortcutEntry};
