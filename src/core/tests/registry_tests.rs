//! Registry tests
//!
//! Loading from a store, resets, last-writer-wins clearing, filtering
//! and all-or-nothing saves.

use std::collections::HashMap;

use crate::config::{MemoryStore, ShortcutStore, StoreError};
use crate::core::key::Platform;
use crate::core::registry::{reset_one, Registry};
use crate::core::types::{KeySequence, ShortcutEntry, ShortcutMetadata};

fn seq(text: &str) -> KeySequence {
    text.parse().unwrap()
}

fn sample_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    store
        .define("MainWindow.Save", "Save", "Save the current book", seq("Ctrl+S"))
        .define("MainWindow.Open", "Open", "Open a book", seq("Ctrl+O"))
        .define("MainWindow.Bold", "Bold", "Toggle bold text", seq("Ctrl+B"))
        .define("MainWindow.Split", "Split At Cursor", "", KeySequence::empty());
    store
}

/// Delegates to a `MemoryStore` but refuses to commit
struct FailingStore {
    inner: MemoryStore,
    discarded: bool,
}

impl ShortcutStore for FailingStore {
    fn ids(&self) -> Vec<String> {
        self.inner.ids()
    }

    fn sequence(&self, id: &str) -> Option<KeySequence> {
        self.inner.sequence(id)
    }

    fn default_sequence(&self, id: &str) -> Option<KeySequence> {
        self.inner.default_sequence(id)
    }

    fn metadata(&self, id: &str) -> Option<ShortcutMetadata> {
        self.inner.metadata(id)
    }

    fn set_sequence(&mut self, id: &str, sequence: &KeySequence) -> Result<(), StoreError> {
        self.inner.set_sequence(id, sequence)
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        Err(StoreError::WriteFailed("disk full".to_string()))
    }

    fn discard(&mut self) {
        self.discarded = true;
        self.inner.discard();
    }
}

#[test]
fn test_load_sorts_by_name() {
    let registry = Registry::load(&sample_store());

    let names: Vec<&str> = registry.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Bold", "Open", "Save", "Split At Cursor"]);
}

#[test]
fn test_load_skips_ids_without_metadata() {
    let mut store = sample_store();
    store.bind("Plugin.Orphan", seq("Ctrl+Alt+P"));

    assert!(store.ids().contains(&"Plugin.Orphan".to_string()));

    let registry = Registry::load(&store);
    assert_eq!(registry.len(), 4);
    assert!(!registry.contains("Plugin.Orphan"));
}

#[test]
fn test_load_reads_current_and_default() {
    let mut store = sample_store();
    store.bind("MainWindow.Save", seq("Ctrl+Shift+S"));

    let registry = Registry::load(&store);
    let save = registry.get("MainWindow.Save").unwrap();

    assert_eq!(save.sequence, seq("Ctrl+Shift+S"));
    assert_eq!(registry.default_for("MainWindow.Save"), seq("Ctrl+S"));
    assert!(registry.default_for("Unknown.Id").is_empty());
}

#[test]
fn test_from_entries_drops_duplicate_ids() {
    let entry = |name: &str, sequence: &str| ShortcutEntry {
        id: "dup".to_string(),
        name: name.to_string(),
        description: String::new(),
        sequence: seq(sequence),
    };

    let registry = Registry::from_entries(
        vec![entry("First", "Ctrl+1"), entry("Second", "Ctrl+2")],
        HashMap::new(),
    );

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("dup").unwrap().name, "First");
}

#[test]
fn test_reset_one_function() {
    let entry = ShortcutEntry {
        id: "a".to_string(),
        name: "A".to_string(),
        description: String::new(),
        sequence: seq("Ctrl+Q"),
    };
    let mut defaults = HashMap::new();
    defaults.insert("a".to_string(), seq("Ctrl+A"));

    assert_eq!(reset_one(&entry, &defaults).sequence, seq("Ctrl+A"));
    assert!(reset_one(&entry, &HashMap::new()).sequence.is_empty());

    // Input untouched
    assert_eq!(entry.sequence, seq("Ctrl+Q"));
}

#[test]
fn test_reset_one_entry() {
    let mut store = sample_store();
    store.bind("MainWindow.Open", seq("F3"));

    let mut registry = Registry::load(&store);
    let reset = registry.reset_one("MainWindow.Open").unwrap();
    assert_eq!(reset.sequence, seq("Ctrl+O"));

    assert!(registry.reset_one("Unknown.Id").is_none());
}

#[test]
fn test_reset_all_restores_every_default() {
    let mut registry = Registry::load(&sample_store());
    for entry in registry.entries().to_vec() {
        registry.set_sequence(&entry.id, seq("F12"));
    }

    registry.reset_all();

    for entry in registry.entries() {
        assert_eq!(entry.sequence, registry.default_for(&entry.id));
    }
    assert!(registry.get("MainWindow.Split").unwrap().is_unbound());
}

#[test]
fn test_set_sequence_unknown_id() {
    let mut registry = Registry::load(&sample_store());
    assert!(!registry.set_sequence("Unknown.Id", seq("Ctrl+U")));
    assert!(registry.set_sequence("MainWindow.Bold", seq("Ctrl+U")));
}

#[test]
fn test_clear_others_unbinds_holders() {
    let mut store = sample_store();
    store.bind("MainWindow.Open", seq("Ctrl+S"));

    let mut registry = Registry::load(&store);
    registry.set_sequence("MainWindow.Bold", seq("Ctrl+S"));

    let mut cleared = registry.clear_others("MainWindow.Bold", &seq("Ctrl+S"));
    cleared.sort();

    assert_eq!(cleared, vec!["MainWindow.Open", "MainWindow.Save"]);
    assert_eq!(registry.get("MainWindow.Bold").unwrap().sequence, seq("Ctrl+S"));
    assert!(registry.get("MainWindow.Save").unwrap().is_unbound());
}

#[test]
fn test_clear_others_ignores_empty_sequence() {
    let mut registry = Registry::load(&sample_store());
    registry.set_sequence("MainWindow.Bold", KeySequence::empty());

    let cleared = registry.clear_others("MainWindow.Save", &KeySequence::empty());
    assert!(cleared.is_empty());
    assert!(registry.get("MainWindow.Bold").unwrap().is_unbound());
}

#[test]
fn test_filter_case_insensitive() {
    let registry = Registry::load(&sample_store());

    let names = |query: &str| -> Vec<String> {
        registry
            .filter(query, Platform::Generic)
            .into_iter()
            .map(|e| e.name.clone())
            .collect()
    };

    assert_eq!(names("book"), vec!["Open", "Save"]);
    assert_eq!(names("ctrl+b"), vec!["Bold"]);
    assert_eq!(names("CURSOR"), vec!["Split At Cursor"]);
    assert_eq!(names("").len(), 4);
    assert!(names("nothing matches").is_empty());
}

#[test]
fn test_filter_uses_displayed_sequence() {
    let registry = Registry::load(&sample_store());

    // On macOS Ctrl is shown as ⌘
    let hits = registry.filter("⌘S", Platform::MacOs);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "MainWindow.Save");

    assert!(registry.filter("Ctrl+S", Platform::MacOs).is_empty());
}

#[test]
fn test_save_then_load_round_trip() {
    let mut store = sample_store();
    let mut registry = Registry::load(&store);

    registry.set_sequence("MainWindow.Bold", seq("Ctrl+Shift+B"));
    registry.set_sequence("MainWindow.Split", seq("Alt+Return"));
    registry.set_sequence("MainWindow.Open", KeySequence::empty());

    registry.save(&mut store).unwrap();
    assert!(!store.has_pending());

    let reloaded = Registry::load(&store);
    assert_eq!(reloaded.entries(), registry.entries());
}

#[test]
fn test_failed_save_commits_nothing() {
    let mut store = FailingStore {
        inner: sample_store(),
        discarded: false,
    };
    let mut registry = Registry::load(&store);
    registry.set_sequence("MainWindow.Bold", seq("Ctrl+Shift+B"));

    let result = registry.save(&mut store);

    assert!(matches!(result, Err(StoreError::WriteFailed(_))));
    assert!(store.discarded);
    assert!(!store.inner.has_pending());
    assert_eq!(store.sequence("MainWindow.Bold"), Some(seq("Ctrl+B")));

    // The registry keeps the user's edits
    assert_eq!(registry.get("MainWindow.Bold").unwrap().sequence, seq("Ctrl+Shift+B"));
}
