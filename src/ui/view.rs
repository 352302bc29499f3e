//! Display projection of the controller state
//!
//! The view never owns shortcut state. After every mutation the display
//! layer asks for fresh rows and info text and redraws from them.

use serde::Serialize;

use crate::core::registry::matches_query;
use crate::ui::controller::AssignmentController;

/// One visible row of the shortcut list
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ShortcutRow {
    pub id: String,
    pub name: String,
    /// Sequence as shown on this platform
    pub sequence: String,
    pub description: String,
    /// Another entry holds the same sequence; shown highlighted
    pub conflict: bool,
}

/// Rows that pass the controller's filter, in registry order
pub fn rows(controller: &AssignmentController) -> Vec<ShortcutRow> {
    let platform = controller.platform();
    let conflicted = controller.detector().conflicted_ids();
    let needle = controller.filter().to_uppercase();

    controller
        .registry()
        .entries()
        .iter()
        .filter(|entry| needle.is_empty() || matches_query(entry, &needle, platform))
        .map(|entry| ShortcutRow {
            id: entry.id.clone(),
            name: entry.name.clone(),
            sequence: entry.sequence.display_text(platform),
            description: entry.description.clone(),
            conflict: conflicted.contains(entry.id.as_str()),
        })
        .collect()
}

/// Names of the *other* entries already bound to the target sequence
pub fn conflicting_names(controller: &AssignmentController) -> Vec<String> {
    let (Some(target), Some(selected)) = (controller.target(), controller.selected_id()) else {
        return Vec::new();
    };
    if target.is_empty() {
        return Vec::new();
    }

    controller
        .registry()
        .entries()
        .iter()
        .filter(|entry| entry.id != selected && entry.sequence == *target)
        .map(|entry| entry.name.clone())
        .collect()
}

/// Info line under the target field, e.g. `Conflicts with: Save, Save As`
pub fn info_text(controller: &AssignmentController) -> Option<String> {
    let names = conflicting_names(controller);
    if names.is_empty() {
        None
    } else {
        Some(format!("Conflicts with: {}", names.join(", ")))
    }
}

/// Text of the target field
pub fn target_text(controller: &AssignmentController) -> String {
    controller
        .target()
        .map(|sequence| sequence.display_text(controller.platform()))
        .unwrap_or_default()
}
