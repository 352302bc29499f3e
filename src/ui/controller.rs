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

//! Assignment controller - mediates between the registry and the
//! shortcut preferences view
//!
//! # Responsibilities
//!
//! - Track the selected entry and the sequence captured for it
//! - Feed key events through the platform translator
//! - Commit, remove and reset bindings
//! - Rebuild conflict groups after every mutation
//! - Save to and reload from a `ShortcutStore`
//!
//! # State machine
//!
//! ```text
//! NoSelection --select--> Selected(e) --key event--> Editing(e, seq)
//!      ^                      ^   ^                       |
//!      +------select(None)----+   +--commit / Backspace---+
//! ```
//!
//! The controller owns the registry; the view only ever receives
//! projections of it (see `view.rs`).

use tracing::debug;

use crate::config::{ShortcutStore, StoreError};
use crate::core::{
    detect, translator_for, ConflictDetector, KeyEventTranslator, KeySequence, Platform,
    RawKeyEvent, Registry, Rejection, ShortcutEntry,
};

/// Which entry is being edited, if any
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Selection {
    NoSelection,
    Selected { id: String },
    Editing { id: String, captured: KeySequence },
}

/// Where keyboard focus should move after Tab/Backtab
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FocusTarget {
    AssignButton,
    RemoveButton,
    NextInChain,
    PreviousInChain,
}

/// What a key event did
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum KeyResponse {
    /// Sequence captured for the selected entry, awaiting commit
    Staged(KeySequence),
    /// Backspace unbound the selected entry
    Cleared,
    /// Tab/Backtab: move focus instead of recording
    Focus(FocusTarget),
    /// Event swallowed
    Rejected(Rejection),
    /// Nothing selected, nothing to record into
    NoSelection,
}

/// Result of a successful save
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SaveOutcome {
    /// The AltGr setting changed; it only applies after a restart
    pub restart_required: bool,
}

/// Drives shortcut editing for one preferences session.
pub struct AssignmentController {
    registry: Registry,
    detector: ConflictDetector,
    translator: Box<dyn KeyEventTranslator>,
    selection: Selection,
    filter: String,
    enable_altgr: bool,
    /// AltGr setting as last read from or written to the store
    stored_altgr: bool,
}

impl AssignmentController {
    /// Creates a controller over an existing registry.
    pub fn new(registry: Registry, translator: Box<dyn KeyEventTranslator>) -> Self {
        let detector = detect(registry.entries());
        Self {
            registry,
            detector,
            translator,
            selection: Selection::NoSelection,
            filter: String::new(),
            enable_altgr: false,
            stored_altgr: false,
        }
    }

    /// Loads the registry and AltGr setting from `store`.
    ///
    /// # Example
    ///
    /// ```
    /// use sigil_shortcuts::config::MemoryStore;
    /// use sigil_shortcuts::core::Platform;
    /// use sigil_shortcuts::ui::AssignmentController;
    ///
    /// let mut store = MemoryStore::new();
    /// store.define("MainWindow.Save", "Save", "Save the book", "Ctrl+S".parse()?);
    ///
    /// let controller = AssignmentController::load(&store, Platform::Generic);
    /// assert_eq!(controller.registry().len(), 1);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<S: ShortcutStore + ?Sized>(store: &S, platform: Platform) -> Self {
        let mut controller = Self::new(Registry::load(store), translator_for(platform));
        controller.enable_altgr = store.enable_altgr();
        controller.stored_altgr = controller.enable_altgr;
        controller
    }

    /// Re-reads everything from `store`, dropping unsaved edits.
    pub fn reload<S: ShortcutStore + ?Sized>(&mut self, store: &S) {
        self.registry = Registry::load(store);
        self.enable_altgr = store.enable_altgr();
        self.stored_altgr = self.enable_altgr;
        self.selection = Selection::NoSelection;
        self.recompute();
    }

    /// Writes every binding and the AltGr setting to `store`.
    ///
    /// On error nothing is written and the in-memory state is unchanged,
    /// so the save can be retried.
    pub fn save<S: ShortcutStore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> Result<SaveOutcome, StoreError> {
        store.set_enable_altgr(self.enable_altgr)?;
        self.registry.save(store)?;

        let outcome = SaveOutcome {
            restart_required: self.enable_altgr != self.stored_altgr,
        };
        self.stored_altgr = self.enable_altgr;
        Ok(outcome)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn detector(&self) -> &ConflictDetector {
        &self.detector
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn platform(&self) -> Platform {
        self.translator.platform()
    }

    pub fn selected_id(&self) -> Option<&str> {
        match &self.selection {
            Selection::NoSelection => None,
            Selection::Selected { id } | Selection::Editing { id, .. } => Some(id),
        }
    }

    pub fn selected_entry(&self) -> Option<&ShortcutEntry> {
        self.selected_id().and_then(|id| self.registry.get(id))
    }

    /// Sequence captured since the selection, if any
    pub fn captured(&self) -> Option<&KeySequence> {
        match &self.selection {
            Selection::Editing { captured, .. } => Some(captured),
            _ => None,
        }
    }

    /// Sequence currently in the target field: the captured one while
    /// editing, else the selected entry's binding
    pub fn target(&self) -> Option<&KeySequence> {
        self.captured()
            .or_else(|| self.selected_entry().map(|entry| &entry.sequence))
    }

    /// Selects an entry by id, or clears the selection with `None`.
    ///
    /// Selecting drops any captured sequence. Unknown ids clear the
    /// selection and return false.
    pub fn select(&mut self, id: Option<&str>) -> bool {
        match id {
            Some(id) if self.registry.contains(id) => {
                self.selection = Selection::Selected { id: id.to_string() };
                true
            }
            Some(_) => {
                self.selection = Selection::NoSelection;
                false
            }
            None => {
                self.selection = Selection::NoSelection;
                true
            }
        }
    }

    /// Handles a key press in the target field.
    ///
    /// Accepted events stage their sequence (pressing the same
    /// combination again stages the same value). Backspace unbinds the
    /// selected entry right away. Tab/Backtab report a focus move.
    pub fn handle_key_event(&mut self, event: &RawKeyEvent) -> KeyResponse {
        let result = self.translator.normalize(event);

        if let Err(Rejection::FocusNavigation { backwards }) = result {
            return KeyResponse::Focus(self.focus_target(backwards));
        }

        let Some(id) = self.selected_id().map(str::to_string) else {
            return KeyResponse::NoSelection;
        };

        match result {
            Ok(sequence) => {
                debug!(id = %id, sequence = %sequence, "Sequence staged");
                self.selection = Selection::Editing {
                    id,
                    captured: sequence.clone(),
                };
                KeyResponse::Staged(sequence)
            }
            Err(Rejection::Backspace) => {
                self.remove();
                KeyResponse::Cleared
            }
            Err(rejection) => {
                debug!(%rejection, "Key event rejected");
                KeyResponse::Rejected(rejection)
            }
        }
    }

    /// Stages `sequence` as if it had been typed. Needs a selection.
    pub fn stage(&mut self, sequence: KeySequence) -> bool {
        let Some(id) = self.selected_id().map(str::to_string) else {
            return false;
        };
        self.selection = Selection::Editing {
            id,
            captured: sequence,
        };
        true
    }

    fn focus_target(&self, backwards: bool) -> FocusTarget {
        if backwards {
            FocusTarget::PreviousInChain
        } else if self.can_assign() {
            FocusTarget::AssignButton
        } else if self.can_remove() {
            FocusTarget::RemoveButton
        } else {
            FocusTarget::NextInChain
        }
    }

    /// Commits the captured sequence to the selected entry.
    ///
    /// Every other entry holding the same sequence is unbound, so at
    /// most one entry ever holds a given sequence after a commit.
    /// Returns the ids that were unbound; does nothing unless editing.
    pub fn commit(&mut self) -> Vec<String> {
        let Selection::Editing { id, captured } = &self.selection else {
            return Vec::new();
        };
        let (id, captured) = (id.clone(), captured.clone());

        self.registry.set_sequence(&id, captured.clone());
        let cleared = self.registry.clear_others(&id, &captured);
        if !cleared.is_empty() {
            debug!(sequence = %captured, cleared = ?cleared, "Previous holders unbound");
        }

        self.selection = Selection::Selected { id };
        self.recompute();
        cleared
    }

    /// Unbinds the selected entry and drops any captured sequence.
    pub fn remove(&mut self) {
        let Some(id) = self.selected_id().map(str::to_string) else {
            return;
        };

        self.registry.set_sequence(&id, KeySequence::empty());
        self.selection = Selection::Selected { id };
        self.recompute();
    }

    /// Restores the selected entry's default binding.
    pub fn reset_selected(&mut self) {
        let Some(id) = self.selected_id().map(str::to_string) else {
            return;
        };

        self.registry.reset_one(&id);
        self.selection = Selection::Selected { id };
        self.recompute();
    }

    /// Restores every entry's default binding.
    pub fn reset_all(&mut self) {
        self.registry.reset_all();
        if let Some(id) = self.selected_id().map(str::to_string) {
            self.selection = Selection::Selected { id };
        }
        self.recompute();
    }

    /// Assign is possible when the target differs from the binding
    pub fn can_assign(&self) -> bool {
        match (&self.selection, self.selected_entry()) {
            (Selection::Editing { captured, .. }, Some(entry)) => *captured != entry.sequence,
            _ => false,
        }
    }

    /// Remove is possible when the selected entry is bound
    pub fn can_remove(&self) -> bool {
        self.selected_entry()
            .map(|entry| !entry.is_unbound())
            .unwrap_or(false)
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Sets the row filter; hidden rows still count for conflicts and save
    pub fn set_filter(&mut self, query: &str) {
        self.filter = query.to_string();
    }

    pub fn enable_altgr(&self) -> bool {
        self.enable_altgr
    }

    pub fn set_enable_altgr(&mut self, enabled: bool) {
        self.enable_altgr = enabled;
    }

    fn recompute(&mut self) {
        self.detector = detect(self.registry.entries());
    }
}
