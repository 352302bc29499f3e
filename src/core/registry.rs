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

//! Shortcut registry
//!
//! The ordered collection of shortcut entries shown to the user, plus the
//! read-only defaults used by the reset operations.
//!
//! Entries are loaded from a `ShortcutStore`, filtered to the ids that
//! have display metadata, and sorted by name. The registry is an owned
//! value: whoever constructs it passes it on explicitly, there is no
//! process-wide instance.

use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use crate::config::{ShortcutStore, StoreError};
use crate::core::key::Platform;
use crate::core::types::{KeySequence, ShortcutEntry};

/// Returns `entry` with its sequence replaced by its default.
///
/// Ids with no default become unbound.
pub fn reset_one(entry: &ShortcutEntry, defaults: &HashMap<String, KeySequence>) -> ShortcutEntry {
    ShortcutEntry {
        sequence: defaults.get(&entry.id).cloned().unwrap_or_default(),
        ..entry.clone()
    }
}

/// Ordered shortcut entries and their defaults.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Registry {
    /// Sorted by name (ordinal compare), ids unique
    entries: Vec<ShortcutEntry>,
    defaults: HashMap<String, KeySequence>,
}

impl Registry {
    /// Builds a registry from explicit entries.
    ///
    /// Later duplicates of an id are dropped.
    pub fn from_entries(
        entries: Vec<ShortcutEntry>,
        defaults: HashMap<String, KeySequence>,
    ) -> Self {
        let mut seen = HashSet::new();
        let mut entries: Vec<ShortcutEntry> = entries
            .into_iter()
            .filter(|entry| seen.insert(entry.id.clone()))
            .collect();

        entries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        Self { entries, defaults }
    }

    /// Reads every displayable shortcut from `store`.
    ///
    /// Ids without metadata are silently skipped: a binding with no
    /// name is not shown, and therefore never saved back either.
    ///
    /// # Example
    ///
    /// ```
    /// use sigil_shortcuts::config::MemoryStore;
    /// use sigil_shortcuts::core::Registry;
    ///
    /// let mut store = MemoryStore::new();
    /// store.define("b", "Save", "", "Ctrl+S".parse()?);
    /// store.define("a", "Open", "", "Ctrl+O".parse()?);
    ///
    /// let registry = Registry::load(&store);
    /// assert_eq!(registry.entries()[0].name, "Open");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<S: ShortcutStore + ?Sized>(store: &S) -> Self {
        let mut entries = Vec::new();
        let mut defaults = HashMap::new();

        for id in store.ids() {
            let Some(metadata) = store.metadata(&id) else {
                debug!(id = %id, "Skipping shortcut without metadata");
                continue;
            };

            if let Some(default) = store.default_sequence(&id) {
                defaults.insert(id.clone(), default);
            }

            entries.push(ShortcutEntry {
                sequence: store.sequence(&id).unwrap_or_default(),
                id,
                name: metadata.name,
                description: metadata.description,
            });
        }

        let registry = Self::from_entries(entries, defaults);
        info!(entries = registry.len(), "Shortcut registry loaded");
        registry
    }

    /// Writes every entry's `(id, sequence)` to `store`.
    ///
    /// All-or-nothing: if staging any entry or the final commit fails,
    /// everything staged is discarded and the error returned. The
    /// registry itself is never modified.
    pub fn save<S: ShortcutStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        for entry in &self.entries {
            if let Err(e) = store.set_sequence(&entry.id, &entry.sequence) {
                store.discard();
                return Err(e);
            }
        }

        if let Err(e) = store.commit() {
            store.discard();
            return Err(e);
        }

        info!(entries = self.len(), "Shortcut registry saved");
        Ok(())
    }

    pub fn entries(&self) -> &[ShortcutEntry] {
        &self.entries
    }

    pub fn defaults(&self) -> &HashMap<String, KeySequence> {
        &self.defaults
    }

    pub fn get(&self, id: &str) -> Option<&ShortcutEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Default sequence of `id`, empty if it has none
    pub fn default_for(&self, id: &str) -> KeySequence {
        self.defaults.get(id).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replaces the sequence of `id`. Returns false for unknown ids.
    pub fn set_sequence(&mut self, id: &str, sequence: KeySequence) -> bool {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.sequence = sequence;
                true
            }
            None => false,
        }
    }

    /// Unbinds every entry other than `keep_id` holding `sequence`.
    ///
    /// Returns the ids that were cleared. The empty sequence is never
    /// "held", so clearing it is a no-op.
    pub fn clear_others(&mut self, keep_id: &str, sequence: &KeySequence) -> Vec<String> {
        if sequence.is_empty() {
            return Vec::new();
        }

        let mut cleared = Vec::new();
        for entry in self
            .entries
            .iter_mut()
            .filter(|entry| entry.id != keep_id && entry.sequence == *sequence)
        {
            entry.sequence = KeySequence::empty();
            cleared.push(entry.id.clone());
        }
        cleared
    }

    /// Restores the default of a single entry.
    pub fn reset_one(&mut self, id: &str) -> Option<&ShortcutEntry> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        self.entries[index] = reset_one(&self.entries[index], &self.defaults);
        Some(&self.entries[index])
    }

    /// Restores every entry to its default in one pass.
    pub fn reset_all(&mut self) {
        for entry in &mut self.entries {
            entry.sequence = self.defaults.get(&entry.id).cloned().unwrap_or_default();
        }
    }

    /// Entries whose name, description or displayed sequence contain
    /// `query`, ignoring case. An empty query matches everything.
    pub fn filter(&self, query: &str, platform: Platform) -> Vec<&ShortcutEntry> {
        if query.is_empty() {
            return self.entries.iter().collect();
        }

        let needle = query.to_uppercase();
        self.entries
            .iter()
            .filter(|entry| matches_query(entry, &needle, platform))
            .collect()
    }
}

/// `needle` must already be uppercased
pub(crate) fn matches_query(entry: &ShortcutEntry, needle: &str, platform: Platform) -> bool {
    entry.name.to_uppercase().contains(needle)
        || entry.description.to_uppercase().contains(needle)
        || entry
            .sequence
            .display_text(platform)
            .to_uppercase()
            .contains(needle)
}
