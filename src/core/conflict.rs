//! Shortcut conflict detection
//!
//! Groups registry entries by canonical sequence. When more than one
//! entry holds the same sequence, the group is flagged as a conflict.
//! Unbound entries (empty sequence) are never grouped, so any number
//! of them can coexist.
//!
//! The detector is rebuilt from scratch after every registry mutation
//! rather than patched, so it can never go stale.
//!
//! # Performance
//! - Build: O(n) map insertions for n entries
//! - Check conflict: O(log n)
//! - List all conflicts: O(g) where g = number of distinct sequences

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::core::types::{KeySequence, ShortcutEntry};

/// Sequence → ids of every entry bound to it
pub type ConflictGroups = BTreeMap<KeySequence, BTreeSet<String>>;

/// Indexes entries by sequence for conflict lookups.
pub struct ConflictDetector {
    /// Maps each non-empty sequence to the ids bound to it.
    groups: ConflictGroups,
}

/// A sequence held by two or more entries.
#[derive(Clone, Debug, PartialEq)]
pub struct Conflict {
    /// The contested sequence
    pub sequence: KeySequence,

    /// Ids of every entry holding it (always 2 or more)
    pub ids: BTreeSet<String>,
}

/// Builds a detector over the current entries.
pub fn detect(entries: &[ShortcutEntry]) -> ConflictDetector {
    let mut detector = ConflictDetector::new();
    for entry in entries {
        detector.add_entry(entry);
    }
    detector
}

impl ConflictDetector {
    /// Creates a new empty conflict detector.
    pub fn new() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }

    /// Adds an entry to the detector. Unbound entries are skipped.
    pub fn add_entry(&mut self, entry: &ShortcutEntry) {
        if entry.sequence.is_empty() {
            return;
        }

        self.groups
            .entry(entry.sequence.clone())
            .or_default()
            .insert(entry.id.clone());
    }

    /// Every non-empty sequence with its holders, conflicted or not.
    pub fn groups(&self) -> &ConflictGroups {
        &self.groups
    }

    /// Only the groups with more than one member.
    pub fn conflict_groups(&self) -> ConflictGroups {
        self.groups
            .iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(sequence, ids)| (sequence.clone(), ids.clone()))
            .collect()
    }

    /// Finds all conflicts, ordered by sequence.
    pub fn find_conflicts(&self) -> Vec<Conflict> {
        self.groups
            .iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(sequence, ids)| Conflict {
                sequence: sequence.clone(),
                ids: ids.clone(),
            })
            .collect()
    }

    /// Checks if a specific sequence has conflicts.
    ///
    /// Returns true if 2 or more entries hold this sequence.
    pub fn has_conflict(&self, sequence: &KeySequence) -> bool {
        self.groups
            .get(sequence)
            .map(|ids| ids.len() > 1)
            .unwrap_or(false)
    }

    /// Ids of every entry that is part of some conflict.
    pub fn conflicted_ids(&self) -> HashSet<&str> {
        self.groups
            .values()
            .filter(|ids| ids.len() > 1)
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// Ids currently bound to `sequence`.
    pub fn holders(&self, sequence: &KeySequence) -> Option<&BTreeSet<String>> {
        self.groups.get(sequence)
    }

    /// Returns the total number of bound entries tracked.
    pub fn total_entries(&self) -> usize {
        self.groups.values().map(|ids| ids.len()).sum()
    }
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::new()
    }
}
