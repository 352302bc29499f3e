use std::collections::BTreeSet;

use crate::core::{detect, ConflictDetector, KeySequence, ShortcutEntry};

/// Helper to create test entries
fn test_entry(id: &str, sequence: &str) -> ShortcutEntry {
    ShortcutEntry {
        id: id.to_string(),
        name: format!("Action {}", id),
        description: String::new(),
        sequence: sequence.parse().unwrap(),
    }
}

fn seq(text: &str) -> KeySequence {
    text.parse().unwrap()
}

fn ids(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|id| id.to_string()).collect()
}

#[test]
fn test_no_conflicts_when_empty() {
    let detector = ConflictDetector::new();
    assert_eq!(detector.find_conflicts().len(), 0);
    assert_eq!(detector.total_entries(), 0);
}

#[test]
fn test_no_conflicts_with_unique_sequences() {
    let entries = vec![
        test_entry("a", "Ctrl+K"),
        test_entry("b", "Ctrl+J"),
        test_entry("c", "Ctrl+Shift+K"),
    ];
    let detector = detect(&entries);

    assert_eq!(detector.find_conflicts().len(), 0);
    assert_eq!(detector.total_entries(), 3);
}

#[test]
fn test_detects_conflict_and_ignores_unbound() {
    let entries = vec![
        test_entry("a", "Ctrl+K"),
        test_entry("b", "Ctrl+K"),
        test_entry("c", ""),
    ];
    let detector = detect(&entries);

    let groups = detector.conflict_groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups.get(&seq("Ctrl+K")), Some(&ids(&["a", "b"])));

    // The unbound entry appears in no group at all
    assert!(detector.groups().values().all(|group| !group.contains("c")));
    assert_eq!(detector.groups(), &groups);
}

#[test]
fn test_unbound_entries_never_conflict() {
    let entries = vec![test_entry("a", ""), test_entry("b", ""), test_entry("c", "")];
    let detector = detect(&entries);

    assert!(detector.find_conflicts().is_empty());
    assert!(detector.conflicted_ids().is_empty());
    assert!(!detector.has_conflict(&KeySequence::empty()));
}

#[test]
fn test_detects_triple_conflict() {
    let entries = vec![
        test_entry("a", "F5"),
        test_entry("b", "F5"),
        test_entry("c", "F5"),
    ];

    let conflicts = detect(&entries).find_conflicts();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].ids.len(), 3);
    assert_eq!(conflicts[0].sequence, seq("F5"));
}

#[test]
fn test_spelling_independence() {
    // Different spellings of the same sequence conflict
    let entries = vec![
        test_entry("a", "Shift+Ctrl+PageUp"),
        test_entry("b", "ctrl+shift+pgup"),
    ];

    let conflicts = detect(&entries).find_conflicts();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].sequence.to_string(), "Ctrl+Shift+PgUp");
}

#[test]
fn test_has_conflict_method() {
    let mut detector = ConflictDetector::new();
    let combo = seq("Ctrl+K");

    detector.add_entry(&test_entry("a", "Ctrl+K"));
    assert!(!detector.has_conflict(&combo));

    detector.add_entry(&test_entry("b", "Ctrl+K"));
    assert!(detector.has_conflict(&combo));
}

#[test]
fn test_multiple_independent_conflicts() {
    let entries = vec![
        // Conflict 1: Ctrl+K
        test_entry("a", "Ctrl+K"),
        test_entry("b", "Ctrl+K"),
        // Conflict 2: Ctrl+J
        test_entry("c", "Ctrl+J"),
        test_entry("d", "Ctrl+J"),
        // No conflict: Ctrl+L
        test_entry("e", "Ctrl+L"),
    ];
    let detector = detect(&entries);

    assert_eq!(detector.find_conflicts().len(), 2);
    assert_eq!(detector.total_entries(), 5);

    let conflicted = detector.conflicted_ids();
    assert_eq!(conflicted.len(), 4);
    assert!(!conflicted.contains("e"));
}

#[test]
fn test_holders() {
    let entries = vec![test_entry("a", "Ctrl+K"), test_entry("b", "Ctrl+J")];
    let detector = detect(&entries);

    assert_eq!(detector.holders(&seq("Ctrl+K")), Some(&ids(&["a"])));
    assert_eq!(detector.holders(&seq("Ctrl+Q")), None);
}
