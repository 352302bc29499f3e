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

//! Store file transactions with automatic backups
//!
//! Provides all-or-nothing writes of a shortcut store file.

use atomic_write_file::AtomicWriteFile;
use chrono::Local;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::config::StoreError;

/// Atomic store file write with automatic backup.
///
/// - **Atomic**: the file is replaced by a temp-file rename, never half-written
/// - **Durable**: a timestamped backup exists before any modification
///
/// # Lifecycle
///
/// 1. `begin()` - Creates timestamped backup immediately
/// 2. Caller renders new content (in memory)
/// 3. `commit()` - Writes atomically; on failure the original is untouched
///
/// # Example
///
/// ```no_run
/// use sigil_shortcuts::config::StoreTransaction;
/// use std::path::Path;
///
/// let tx = StoreTransaction::begin(
///     Path::new("shortcuts.conf"),
///     Path::new("backups"),
/// )?;
/// println!("Backup at {}", tx.backup_path().display());
/// tx.commit("bind \"MainWindow.Save\" \"Ctrl+S\"\n")?;
/// # Ok::<(), sigil_shortcuts::config::StoreError>(())
/// ```
pub struct StoreTransaction {
    store_path: PathBuf,
    backup_path: PathBuf,
}

impl StoreTransaction {
    /// Begins a new transaction by creating a timestamped backup.
    ///
    /// # Errors
    ///
    /// Returns an error if the store file cannot be read or the backup
    /// cannot be written. Nothing has been modified in that case.
    pub fn begin(store_path: &Path, backup_dir: &Path) -> Result<Self, StoreError> {
        let backup_path = create_timestamped_backup(store_path, backup_dir)?;
        debug!(backup = %backup_path.display(), "Store backup created");

        Ok(Self {
            store_path: store_path.to_path_buf(),
            backup_path,
        })
    }

    /// Path of the backup taken by `begin()`
    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    /// Atomically replaces the store file with `new_content`.
    ///
    /// Consumes the transaction, preventing accidental double-commits.
    /// On error the original file is untouched and the backup is kept.
    pub fn commit(self, new_content: &str) -> Result<(), StoreError> {
        write_atomically(&self.store_path, new_content)?;
        info!(
            path = %self.store_path.display(),
            backup = %self.backup_path.display(),
            "Shortcut store written"
        );
        Ok(())
    }
}

fn write_atomically(path: &Path, content: &str) -> Result<(), StoreError> {
    let mut file = AtomicWriteFile::options()
        .open(path)
        .map_err(|e| StoreError::WriteFailed(format!("Failed to open for atomic write: {}", e)))?;

    file.write_all(content.as_bytes())
        .map_err(|e| StoreError::WriteFailed(format!("Failed to write content: {}", e)))?;

    file.commit()
        .map_err(|e| StoreError::WriteFailed(format!("Failed to commit atomic write: {}", e)))?;

    Ok(())
}

/// Copies the store file to `<backup_dir>/<name>.<YYYY-mm-dd_HHMMSS>`
fn create_timestamped_backup(store_path: &Path, backup_dir: &Path) -> Result<PathBuf, StoreError> {
    let content = fs::read_to_string(store_path)?;

    let timestamp = Local::now().format("%Y-%m-%d_%H%M%S");

    let original_name = store_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            StoreError::BackupFailed(format!(
                "Store path has no UTF-8 file name: {}",
                store_path.display()
            ))
        })?;

    let backup_path = backup_dir.join(format!("{}.{}", original_name, timestamp));

    fs::write(&backup_path, &content)
        .map_err(|e| StoreError::BackupFailed(format!("{}: {}", backup_path.display(), e)))?;

    Ok(backup_path)
}
