use crate::config::MemoryStore;
use crate::core::{KeySequence, Platform};
use crate::ui::{view, AssignmentController};

fn seq(text: &str) -> KeySequence {
    text.parse().unwrap()
}

fn controller(platform: Platform) -> AssignmentController {
    let mut store = MemoryStore::new();
    store
        .define("MainWindow.Save", "Save", "Save the current book", seq("Ctrl+S"))
        .define("MainWindow.SaveAs", "Save As", "Save under a new name", seq("Ctrl+Shift+S"))
        .define("MainWindow.Sync", "Sync", "Sync with the server", seq("Ctrl+S"))
        .define("MainWindow.Split", "Split At Cursor", "", KeySequence::empty());
    AssignmentController::load(&store, platform)
}

#[test]
fn test_rows_flag_conflicts() {
    let controller = controller(Platform::Generic);
    let rows = view::rows(&controller);

    let names: Vec<&str> = rows.iter().map(|row| row.name.as_str()).collect();
    assert_eq!(names, vec!["Save", "Save As", "Split At Cursor", "Sync"]);

    let flagged: Vec<&str> = rows
        .iter()
        .filter(|row| row.conflict)
        .map(|row| row.id.as_str())
        .collect();
    assert_eq!(flagged, vec!["MainWindow.Save", "MainWindow.Sync"]);

    assert_eq!(rows[1].sequence, "Ctrl+Shift+S");
    assert_eq!(rows[2].sequence, "");
}

#[test]
fn test_rows_use_platform_display() {
    let controller = controller(Platform::MacOs);
    let rows = view::rows(&controller);

    assert_eq!(rows[0].sequence, "⌘S");
    assert_eq!(rows[1].sequence, "⇧⌘S");
}

#[test]
fn test_rows_apply_filter() {
    let mut controller = controller(Platform::Generic);

    controller.set_filter("save");
    let ids: Vec<String> = view::rows(&controller).into_iter().map(|row| row.id).collect();
    assert_eq!(ids, vec!["MainWindow.Save", "MainWindow.SaveAs"]);

    // Hidden rows still count for conflicts
    controller.set_filter("shift");
    let rows = view::rows(&controller);
    assert_eq!(rows.len(), 1);
    assert!(!rows[0].conflict);
    assert_eq!(controller.detector().find_conflicts().len(), 1);

    controller.set_filter("");
    assert_eq!(view::rows(&controller).len(), 4);
}

#[test]
fn test_info_text_lists_other_holders() {
    let mut controller = controller(Platform::Generic);
    assert!(view::info_text(&controller).is_none());

    controller.select(Some("MainWindow.Save"));
    assert_eq!(view::info_text(&controller).unwrap(), "Conflicts with: Sync");

    controller.select(Some("MainWindow.Split"));
    controller.stage(seq("Ctrl+S"));
    assert_eq!(
        view::info_text(&controller).unwrap(),
        "Conflicts with: Save, Sync"
    );

    controller.stage(seq("F9"));
    assert!(view::info_text(&controller).is_none());
}

#[test]
fn test_info_text_clears_after_commit() {
    let mut controller = controller(Platform::Generic);
    controller.select(Some("MainWindow.Split"));
    controller.stage(seq("Ctrl+S"));
    controller.commit();

    assert!(view::info_text(&controller).is_none());
    assert!(view::rows(&controller).iter().all(|row| !row.conflict));
}

#[test]
fn test_target_text() {
    let mut controller = controller(Platform::MacOs);
    assert_eq!(view::target_text(&controller), "");

    controller.select(Some("MainWindow.SaveAs"));
    assert_eq!(view::target_text(&controller), "⇧⌘S");

    controller.stage(seq("Meta+Alt+Backspace"));
    assert_eq!(view::target_text(&controller), "⌃⌥⌫");

    controller.select(Some("MainWindow.Split"));
    assert_eq!(view::target_text(&controller), "");
}

#[test]
fn test_rows_serialize_to_json() {
    let controller = controller(Platform::Generic);
    let rows = view::rows(&controller);

    let json = serde_json::to_value(&rows[0]).unwrap();
    assert_eq!(json["id"], "MainWindow.Save");
    assert_eq!(json["sequence"], "Ctrl+S");
    assert_eq!(json["conflict"], true);
}
