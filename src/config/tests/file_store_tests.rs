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

use std::{fs, path::PathBuf};
use tempfile::TempDir;

use crate::config::{FileStore, ShortcutStore, StoreError, StoreTransaction};
use crate::core::registry::Registry;
use crate::core::{translator_for, Key, ModifierSet, Platform, RawKeyEvent};
use crate::core::types::KeySequence;

const SAMPLE: &str = r#"# Sigil keyboard shortcuts
enable_altgr = false
action "MainWindow.Save" "Save" "Ctrl+S" "Save the current book"
action "MainWindow.Open" "Open" "Ctrl+O" "Open a book"
action "MainWindow.Split" "Split At Cursor" "" ""
bind "MainWindow.Open" "F3"
bind "Plugin.Orphan" "Ctrl+Alt+P"
"#;

fn seq(text: &str) -> KeySequence {
    text.parse().unwrap()
}

/// Helper: writes `content` to a fresh store file
fn create_store(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("shortcuts.conf");
    fs::write(&path, content).unwrap();
    (temp_dir, path)
}

// ============================================================================
// FileStore Tests
// ============================================================================

#[test]
fn test_open_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing.conf");

    let result = FileStore::open(path.clone());
    assert!(matches!(result, Err(StoreError::NotFound(p)) if p == path));
}

#[test]
fn test_open_creates_backup_dir() {
    let (temp_dir, path) = create_store(SAMPLE);

    let store = FileStore::open(path).unwrap();

    assert_eq!(store.backup_dir(), temp_dir.path().join("backups"));
    assert!(store.backup_dir().is_dir());
    assert!(store.list_backups().unwrap().is_empty());
}

#[test]
fn test_open_malformed_file() {
    let (_temp_dir, path) = create_store("action \"a\" \"A\"\n");

    let result = FileStore::open(path);
    assert!(matches!(result, Err(StoreError::Parse(_))));
}

#[test]
fn test_reads_actions_and_bindings() {
    let (_temp_dir, path) = create_store(SAMPLE);
    let store = FileStore::open(path).unwrap();

    assert_eq!(
        store.ids(),
        vec![
            "MainWindow.Save",
            "MainWindow.Open",
            "MainWindow.Split",
            "Plugin.Orphan"
        ]
    );

    // No bind line: the default is current
    assert_eq!(store.sequence("MainWindow.Save"), Some(seq("Ctrl+S")));
    assert_eq!(store.sequence("MainWindow.Open"), Some(seq("F3")));
    assert_eq!(store.default_sequence("MainWindow.Open"), Some(seq("Ctrl+O")));

    // Orphan bindings have no metadata and no default
    assert!(store.metadata("Plugin.Orphan").is_none());
    assert!(store.default_sequence("Plugin.Orphan").is_none());
    assert_eq!(store.metadata("MainWindow.Open").unwrap().name, "Open");
    assert!(!store.enable_altgr());
}

#[test]
fn test_set_sequence_is_staged_until_commit() {
    let (_temp_dir, path) = create_store(SAMPLE);
    let mut store = FileStore::open(path.clone()).unwrap();

    store.set_sequence("MainWindow.Save", &seq("Ctrl+Shift+S")).unwrap();

    assert_eq!(store.sequence("MainWindow.Save"), Some(seq("Ctrl+S")));
    assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE);

    store.commit().unwrap();

    assert_eq!(store.sequence("MainWindow.Save"), Some(seq("Ctrl+Shift+S")));
    let reopened = FileStore::open(path).unwrap();
    assert_eq!(reopened.sequence("MainWindow.Save"), Some(seq("Ctrl+Shift+S")));
}

#[test]
fn test_set_sequence_unknown_id() {
    let (_temp_dir, path) = create_store(SAMPLE);
    let mut store = FileStore::open(path).unwrap();

    let result = store.set_sequence("Nope", &seq("Ctrl+N"));
    assert!(matches!(result, Err(StoreError::UnknownShortcut(id)) if id == "Nope"));
}

#[test]
fn test_commit_creates_backup_of_original() {
    let (_temp_dir, path) = create_store(SAMPLE);
    let mut store = FileStore::open(path).unwrap();

    store.set_sequence("MainWindow.Open", &KeySequence::empty()).unwrap();
    store.commit().unwrap();

    let backups = store.list_backups().unwrap();
    assert_eq!(backups.len(), 1, "Should have created one backup");

    let name = backups[0].file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("shortcuts.conf."), "Unexpected backup name {}", name);
    assert_eq!(fs::read_to_string(&backups[0]).unwrap(), SAMPLE);
}

#[test]
fn test_commit_records_last_backup() {
    let (_temp_dir, path) = create_store(SAMPLE);
    let mut store = FileStore::open(path).unwrap();
    assert!(store.last_backup().is_none());

    store.set_sequence("MainWindow.Save", &seq("F2")).unwrap();
    store.commit().unwrap();

    let backup = store.last_backup().unwrap().to_path_buf();
    assert_eq!(store.list_backups().unwrap(), vec![backup.clone()]);
    assert_eq!(fs::read_to_string(&backup).unwrap(), SAMPLE);
}

#[test]
fn test_commit_without_changes_writes_nothing() {
    let (_temp_dir, path) = create_store(SAMPLE);
    let mut store = FileStore::open(path.clone()).unwrap();

    store.commit().unwrap();

    assert!(store.list_backups().unwrap().is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE);
}

#[test]
fn test_unbinding_persists_as_empty_binding() {
    let (_temp_dir, path) = create_store(SAMPLE);
    let mut store = FileStore::open(path.clone()).unwrap();

    store.set_sequence("MainWindow.Save", &KeySequence::empty()).unwrap();
    store.commit().unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("bind \"MainWindow.Save\" \"\""));

    // Explicitly unbound, not "back to default"
    let reopened = FileStore::open(path).unwrap();
    assert_eq!(reopened.sequence("MainWindow.Save"), Some(KeySequence::empty()));
}

#[test]
fn test_commit_keeps_actions_and_orphans() {
    let (_temp_dir, path) = create_store(SAMPLE);
    let mut store = FileStore::open(path.clone()).unwrap();

    store.set_sequence("MainWindow.Split", &seq("Alt+Return")).unwrap();
    store.commit().unwrap();

    let reopened = FileStore::open(path).unwrap();
    assert_eq!(reopened.ids(), store.ids());
    assert_eq!(reopened.sequence("Plugin.Orphan"), Some(seq("Ctrl+Alt+P")));
    assert_eq!(
        reopened.metadata("MainWindow.Save").unwrap().description,
        "Save the current book"
    );
}

#[test]
fn test_discard_drops_staged_values() {
    let (_temp_dir, path) = create_store(SAMPLE);
    let mut store = FileStore::open(path.clone()).unwrap();

    store.set_sequence("MainWindow.Save", &seq("F2")).unwrap();
    store.set_enable_altgr(true).unwrap();
    store.discard();
    store.commit().unwrap();

    assert_eq!(store.sequence("MainWindow.Save"), Some(seq("Ctrl+S")));
    assert!(!store.enable_altgr());
    assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE);
}

#[test]
fn test_enable_altgr_round_trip() {
    let (_temp_dir, path) = create_store(SAMPLE);
    let mut store = FileStore::open(path.clone()).unwrap();

    store.set_enable_altgr(true).unwrap();
    store.commit().unwrap();

    assert!(store.enable_altgr());
    assert!(FileStore::open(path).unwrap().enable_altgr());
}

#[test]
fn test_registry_round_trip_through_file() {
    let (_temp_dir, path) = create_store(SAMPLE);
    let mut store = FileStore::open(path.clone()).unwrap();

    let mut registry = Registry::load(&store);
    assert_eq!(registry.len(), 3);

    registry.set_sequence("MainWindow.Save", seq("Ctrl+,"));
    registry.set_sequence("MainWindow.Split", seq("Ctrl++"));
    registry.save(&mut store).unwrap();

    let reloaded = Registry::load(&FileStore::open(path).unwrap());
    assert_eq!(reloaded.entries(), registry.entries());
}

#[test]
fn test_normalized_sequence_survives_reopen() {
    let (_temp_dir, path) = create_store(SAMPLE);
    let mut store = FileStore::open(path.clone()).unwrap();

    let event = RawKeyEvent::new(Key::Char('ß'), ModifierSet::CTRL, "ß");
    let sequence = translator_for(Platform::Generic).normalize(&event).unwrap();

    let mut registry = Registry::load(&store);
    registry.set_sequence("MainWindow.Open", sequence.clone());
    registry.save(&mut store).unwrap();

    let reopened = FileStore::open(path).unwrap();
    assert_eq!(reopened.sequence("MainWindow.Open"), Some(sequence));
    assert_eq!(Registry::load(&reopened).entries(), registry.entries());
}

#[test]
fn test_failed_commit_leaves_state_untouched() {
    let (_temp_dir, path) = create_store(SAMPLE);
    let mut store = FileStore::open(path.clone()).unwrap();

    // Store file vanishes: the backup step cannot read it
    fs::remove_file(&path).unwrap();

    store.set_sequence("MainWindow.Save", &seq("F2")).unwrap();
    assert!(store.commit().is_err());

    assert_eq!(store.sequence("MainWindow.Save"), Some(seq("Ctrl+S")));
    assert!(store.last_backup().is_none());
    assert!(!path.exists());
}

#[cfg(unix)]
#[test]
fn test_symlinked_store_is_allowed() {
    let (temp_dir, path) = create_store(SAMPLE);
    let link = temp_dir.path().join("link.conf");
    std::os::unix::fs::symlink(&path, &link).unwrap();

    let store = FileStore::open(link).unwrap();
    assert_eq!(store.ids().len(), 4);
}

// ============================================================================
// StoreTransaction Tests
// ============================================================================

#[test]
fn test_transaction_basic_flow() {
    let (temp_dir, path) = create_store(SAMPLE);
    let backup_dir = temp_dir.path().join("backups");
    fs::create_dir_all(&backup_dir).unwrap();

    let tx = StoreTransaction::begin(&path, &backup_dir).unwrap();

    let backup = tx.backup_path().to_path_buf();
    assert!(backup.starts_with(&backup_dir));
    assert_eq!(fs::read_to_string(&backup).unwrap(), SAMPLE);

    let new_content = "enable_altgr = true\n";
    tx.commit(new_content).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), new_content);
    assert!(backup.exists(), "Backup should still exist after commit");
}

#[test]
fn test_transaction_begin_without_backup_dir() {
    let (temp_dir, path) = create_store(SAMPLE);
    let backup_dir = temp_dir.path().join("does-not-exist");

    let result = StoreTransaction::begin(&path, &backup_dir);
    assert!(matches!(result, Err(StoreError::BackupFailed(_))));

    // Original untouched
    assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE);
}
