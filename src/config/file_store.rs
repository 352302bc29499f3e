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

//! File-backed shortcut store.
//!
//! - **Atomic writes**: temp-file-then-rename, the file is never half-written
//! - **Automatic backups**: every commit first copies the file to `backups/`
//! - **Rollback safety**: a failed commit leaves file and memory untouched
//! - **Symlink warnings**: logged, but symlinked stores are allowed

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

use crate::config::{
    parser::{parse_store_file, render_store_file, StoreLine},
    ShortcutStore, StoreError, StoreTransaction,
};
use crate::core::types::{KeySequence, ShortcutMetadata};

#[derive(Clone, Debug)]
struct ActionDef {
    id: String,
    metadata: ShortcutMetadata,
    default: KeySequence,
}

/// Shortcut store backed by a text file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    backup_dir: PathBuf,
    enable_altgr: bool,
    actions: Vec<ActionDef>,
    action_index: HashMap<String, usize>,
    bindings: BTreeMap<String, KeySequence>,
    pending: BTreeMap<String, KeySequence>,
    pending_altgr: Option<bool>,
    last_backup: Option<PathBuf>,
}

impl FileStore {
    /// Opens and parses an existing store file.
    ///
    /// Creates a `backups/` directory next to the file if needed.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the file doesn't exist
    /// - `StoreError::BackupDirNotWritable` if `backups/` can't be created
    /// - `StoreError::Parse` if the file is malformed
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sigil_shortcuts::config::{FileStore, ShortcutStore};
    /// use std::path::PathBuf;
    ///
    /// let store = FileStore::open(PathBuf::from("/home/user/.config/sigil/shortcuts.conf"))?;
    /// println!("{} shortcuts", store.ids().len());
    /// # Ok::<(), sigil_shortcuts::config::StoreError>(())
    /// ```
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        if !path.exists() {
            return Err(StoreError::NotFound(path));
        }

        if path.read_link().is_ok() {
            warn!(path = %path.display(), "Shortcut store is a symlink");
        }

        let backup_dir = path
            .parent()
            .ok_or_else(|| {
                StoreError::BackupDirNotWritable(PathBuf::from("Store file has no parent directory"))
            })?
            .join("backups");

        if !backup_dir.exists() {
            fs::create_dir_all(&backup_dir)
                .map_err(|_| StoreError::BackupDirNotWritable(backup_dir.clone()))?;
        }

        if backup_dir.metadata()?.permissions().readonly() {
            return Err(StoreError::BackupDirNotWritable(backup_dir));
        }

        let content = fs::read_to_string(&path)?;
        let mut store = Self {
            path,
            backup_dir,
            enable_altgr: false,
            actions: Vec::new(),
            action_index: HashMap::new(),
            bindings: BTreeMap::new(),
            pending: BTreeMap::new(),
            pending_altgr: None,
            last_backup: None,
        };
        store.load_lines(parse_store_file(&content)?);

        info!(
            path = %store.path.display(),
            actions = store.actions.len(),
            bindings = store.bindings.len(),
            "Shortcut store opened"
        );
        Ok(store)
    }

    /// Path of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory receiving timestamped backups
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Backup taken by the most recent successful commit
    pub fn last_backup(&self) -> Option<&Path> {
        self.last_backup.as_deref()
    }

    /// Backups of this store, newest first.
    pub fn list_backups(&self) -> Result<Vec<PathBuf>, StoreError> {
        let prefix = match self.path.file_name().and_then(|name| name.to_str()) {
            Some(name) => format!("{}.", name),
            None => return Ok(Vec::new()),
        };

        let mut backups = Vec::new();
        for entry in fs::read_dir(&self.backup_dir)? {
            let path = entry?.path();
            let is_backup = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(&prefix));
            if is_backup && path.is_file() {
                backups.push(path);
            }
        }

        // Timestamps sort lexically
        backups.sort();
        backups.reverse();
        Ok(backups)
    }

    fn load_lines(&mut self, lines: Vec<StoreLine>) {
        for line in lines {
            match line {
                StoreLine::EnableAltGr(enabled) => self.enable_altgr = enabled,
                StoreLine::Action {
                    id,
                    name,
                    default,
                    description,
                } => {
                    let def = ActionDef {
                        id: id.clone(),
                        metadata: ShortcutMetadata { name, description },
                        default,
                    };
                    // A repeated action line replaces the earlier one
                    let existing = self.action_index.get(&id).copied();
                    match existing {
                        Some(index) => self.actions[index] = def,
                        None => {
                            self.action_index.insert(id, self.actions.len());
                            self.actions.push(def);
                        }
                    }
                }
                StoreLine::Bind { id, sequence } => {
                    self.bindings.insert(id, sequence);
                }
            }
        }

        for id in self.bindings.keys() {
            if !self.action_index.contains_key(id) {
                warn!(id = %id, "Binding for undeclared action");
            }
        }
    }

    /// Store file content with `bindings` and `enable_altgr` applied
    fn render(&self, bindings: &BTreeMap<String, KeySequence>, enable_altgr: bool) -> String {
        let mut lines = vec![StoreLine::EnableAltGr(enable_altgr)];

        lines.extend(self.actions.iter().map(|def| StoreLine::Action {
            id: def.id.clone(),
            name: def.metadata.name.clone(),
            default: def.default.clone(),
            description: def.metadata.description.clone(),
        }));

        lines.extend(bindings.iter().map(|(id, sequence)| StoreLine::Bind {
            id: id.clone(),
            sequence: sequence.clone(),
        }));

        render_store_file(&lines)
    }

    fn knows(&self, id: &str) -> bool {
        self.action_index.contains_key(id) || self.bindings.contains_key(id)
    }
}

impl ShortcutStore for FileStore {
    fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.actions.iter().map(|def| def.id.clone()).collect();
        ids.extend(
            self.bindings
                .keys()
                .filter(|id| !self.action_index.contains_key(*id))
                .cloned(),
        );
        ids
    }

    fn sequence(&self, id: &str) -> Option<KeySequence> {
        self.bindings
            .get(id)
            .cloned()
            .or_else(|| self.default_sequence(id))
    }

    fn default_sequence(&self, id: &str) -> Option<KeySequence> {
        self.action_index
            .get(id)
            .map(|&index| self.actions[index].default.clone())
    }

    fn metadata(&self, id: &str) -> Option<ShortcutMetadata> {
        self.action_index
            .get(id)
            .map(|&index| self.actions[index].metadata.clone())
    }

    fn set_sequence(&mut self, id: &str, sequence: &KeySequence) -> Result<(), StoreError> {
        if !self.knows(id) {
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

    /// Writes every staged value in one atomic file replacement.
    ///
    /// Staged values are consumed either way; on error the file and the
    /// in-memory state are as they were before staging.
    fn commit(&mut self) -> Result<(), StoreError> {
        let pending = std::mem::take(&mut self.pending);
        let pending_altgr = self.pending_altgr.take();

        if pending.is_empty() && pending_altgr.is_none() {
            return Ok(());
        }

        let mut bindings = self.bindings.clone();
        bindings.extend(pending);
        let enable_altgr = pending_altgr.unwrap_or(self.enable_altgr);

        let content = self.render(&bindings, enable_altgr);
        let tx = StoreTransaction::begin(&self.path, &self.backup_dir)?;
        let backup = tx.backup_path().to_path_buf();
        if let Err(e) = tx.commit(&content) {
            warn!(
                path = %self.path.display(),
                backup = %backup.display(),
                error = %e,
                "Store write failed, original file kept"
            );
            return Err(e);
        }

        self.bindings = bindings;
        self.enable_altgr = enable_altgr;
        self.last_backup = Some(backup);
        Ok(())
    }

    fn discard(&mut self) {
        self.pending.clear();
        self.pending_altgr = None;
    }
}
