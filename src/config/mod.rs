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

//! Shortcut stores: where bindings, defaults and action metadata live.
//!
//! The registry never owns its store; it reads from one at load time and
//! writes to one on save. Two implementations are provided:
//!
//! - **`MemoryStore`**: in-memory, for embedding and tests
//! - **`FileStore`**: a text file with atomic writes and timestamped backups
//!
//! # Transactions
//!
//! `set_sequence()` only *stages* a value. Nothing becomes visible until
//! `commit()` succeeds; `discard()` drops everything staged. A failed
//! commit leaves the store exactly as it was.
//!
//! # Example
//!
//! ```
//! use sigil_shortcuts::config::{MemoryStore, ShortcutStore};
//!
//! let mut store = MemoryStore::new();
//! store.define("MainWindow.Save", "Save", "Save the current book", "Ctrl+S".parse()?);
//!
//! store.set_sequence("MainWindow.Save", &"Ctrl+Shift+S".parse()?)?;
//! assert_eq!(store.sequence("MainWindow.Save").unwrap().to_string(), "Ctrl+S");
//!
//! store.commit()?;
//! assert_eq!(store.sequence("MainWindow.Save").unwrap().to_string(), "Ctrl+Shift+S");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::HashMap;

use crate::core::types::{KeySequence, ShortcutMetadata};

pub mod error;
pub mod file_store;
pub mod parser;
pub mod transaction;

pub use error::StoreError;
pub use file_store::FileStore;
pub use transaction::StoreTransaction;

/// External source and sink of shortcut bindings.
pub trait ShortcutStore {
    /// Every id known to the store, in store order
    fn ids(&self) -> Vec<String>;

    /// Committed current sequence of `id`
    fn sequence(&self, id: &str) -> Option<KeySequence>;

    /// Default sequence of `id`
    fn default_sequence(&self, id: &str) -> Option<KeySequence>;

    /// Display metadata; `None` hides the id from the registry
    fn metadata(&self, id: &str) -> Option<ShortcutMetadata>;

    /// Stage a new sequence for `id`
    fn set_sequence(&mut self, id: &str, sequence: &KeySequence) -> Result<(), StoreError>;

    /// Whether AltGr is passed through as a modifier (Windows only)
    fn enable_altgr(&self) -> bool {
        false
    }

    /// Stage the AltGr setting
    fn set_enable_altgr(&mut self, _enabled: bool) -> Result<(), StoreError> {
        Ok(())
    }

    /// Make every staged value visible, or none of them
    fn commit(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Drop every staged value
    fn discard(&mut self) {}
}

#[derive(Clone, Debug)]
struct Action {
    metadata: ShortcutMetadata,
    default: KeySequence,
}

/// In-memory shortcut store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    ids: Vec<String>,
    actions: HashMap<String, Action>,
    sequences: HashMap<String, KeySequence>,
    enable_altgr: bool,
    pending: HashMap<String, KeySequence>,
    pending_altgr: Option<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an action with its metadata and default sequence.
    ///
    /// The current sequence starts out as the default.
    pub fn define(
        &mut self,
        id: &str,
        name: &str,
        description: &str,
        default: KeySequence,
    ) -> &mut Self {
        if !self.ids.iter().any(|known| known == id) {
            self.ids.push(id.to_string());
        }
        self.actions.insert(
            id.to_string(),
            Action {
                metadata: ShortcutMetadata {
                    name: name.to_string(),
                    description: description.to_string(),
                },
                default,
            },
        );
        self
    }

    /// Sets the committed sequence of `id` directly, bypassing staging.
    ///
    /// Unlike `set_sequence()`, ids without metadata are accepted; they
    /// are listed by `ids()` but filtered out by the registry.
    pub fn bind(&mut self, id: &str, sequence: KeySequence) -> &mut Self {
        if !self.ids.iter().any(|known| known == id) {
            self.ids.push(id.to_string());
        }
        self.sequences.insert(id.to_string(), sequence);
        self
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty() || self.pending_altgr.is_some()
    }
}

impl ShortcutStore for MemoryStore {
    fn ids(&self) -> Vec<String> {
        self.ids.clone()
    }

    fn sequence(&self, id: &str) -> Option<KeySequence> {
        self.sequences
            .get(id)
            .cloned()
            .or_else(|| self.default_sequence(id))
    }

    fn default_sequence(&self, id: &str) -> Option<KeySequence> {
        self.actions.get(id).map(|action| action.default.clone())
    }

    fn metadata(&self, id: &str) -> Option<ShortcutMetadata> {
        self.actions.get(id).map(|action| action.metadata.clone())
    }

    fn set_sequence(&mut self, id: &str, sequence: &KeySequence) -> Result<(), StoreError> {
        if !self.ids.iter().any(|known| known == id) {
            return Err(StoreError::UnknownShortcut(id.to_string()));
        }
        self.pending.insert(id.to_string(), sequence.clone());
        Ok(())
    }

    fn enable_altgr(&self) -> bool {
        self.enable_altgr
    }

    fn set_enable_altgr(&mut self, enabled: bool) -> Result<(), StoreError> {
        self.pending_altgr = Some(enabled);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.sequences.extend(self.pending.drain());
        if let Some(enabled) = self.pending_altgr.take() {
            self.enable_altgr = enabled;
        }
        Ok(())
    }

    fn discard(&mut self) {
        self.pending.clear();
        self.pending_altgr = None;
    }
}

#[cfg(test)]
mod tests;
