//! Integration tests for preset lifecycle operations.

use presets::error::PresetError;
use presets::host::{ConfigStore, PluginRegistry};
use presets::preset::Selection;

use crate::common::{combat_host, manager_for};

// ===== Create =====

#[test]
fn test_create_captures_live_state_and_selects() {
    let host = combat_host();
    let tmp = tempfile::tempdir().unwrap();
    let mut manager = manager_for(&host, tmp.path().join("presets"));

    let id = manager.create("Combat", false).unwrap();

    let preset = manager.get(id).unwrap();
    assert_eq!(preset.name, "Combat");
    assert_eq!(preset.enabled_plugins.get("Boosts"), Some(&true));
    assert_eq!(preset.enabled_plugins.get("Prayer"), Some(&false));
    assert_eq!(preset.enabled_plugins.get("Camera"), Some(&true));
    assert_eq!(
        preset.plugin_settings["boosts"]["showIcons"],
        Some("true".to_string())
    );
    assert_eq!(preset.plugin_settings["prayer"]["flickMode"], None);

    // The just-created preset matches live state and is selected.
    assert_eq!(manager.selected().unwrap().id, id);
}

#[test]
fn test_create_never_captures_ignored_plugin() {
    let host = combat_host();
    let tmp = tempfile::tempdir().unwrap();
    let mut manager = manager_for(&host, tmp.path().join("presets"));

    let id = manager.create("Combat", false).unwrap();

    let preset = manager.get(id).unwrap();
    assert!(!preset.enabled_plugins.contains_key("Plugin Presets"));
    assert!(!preset.plugin_settings.contains_key("pluginpresets"));
}

#[test]
fn test_create_from_empty_is_placeholder() {
    let host = combat_host();
    let tmp = tempfile::tempdir().unwrap();
    let mut manager = manager_for(&host, tmp.path().join("presets"));

    let id = manager.create("Placeholder", true).unwrap();

    let preset = manager.get(id).unwrap();
    assert!(preset.enabled_plugins.is_empty());
    assert!(preset.plugin_settings.is_empty());
    assert_eq!(manager.selected().unwrap().id, id);
}

#[test]
fn test_create_blank_name_gets_placeholder() {
    let host = combat_host();
    let tmp = tempfile::tempdir().unwrap();
    let mut manager = manager_for(&host, tmp.path().join("presets"));

    let first = manager.create("", false).unwrap();
    let second = manager.create("   ", false).unwrap();

    assert_eq!(manager.get(first).unwrap().name, "Preset 1");
    assert_eq!(manager.get(second).unwrap().name, "Preset 2");
}

#[test]
fn test_create_rejects_invalid_name() {
    let host = combat_host();
    let tmp = tempfile::tempdir().unwrap();
    let mut manager = manager_for(&host, tmp.path().join("presets"));

    let err = manager.create("bad/name", false).unwrap_err();
    assert!(matches!(err, PresetError::InvalidName { .. }));
    assert!(manager.presets().is_empty());
}

#[test]
fn test_create_assigns_unique_ids() {
    let host = combat_host();
    let tmp = tempfile::tempdir().unwrap();
    let mut manager = manager_for(&host, tmp.path().join("presets"));

    let a = manager.create("A", true).unwrap();
    let b = manager.create("B", true).unwrap();
    let c = manager.create("C", true).unwrap();

    assert_ne!(a, b);
    assert_ne!(b, c);
    assert_ne!(a, c);
}

// ===== Select =====

#[test]
fn test_select_enforces_single_active() {
    let host = combat_host();
    let tmp = tempfile::tempdir().unwrap();
    let mut manager = manager_for(&host, tmp.path().join("presets"));

    let a = manager.create("A", true).unwrap();
    let b = manager.create("B", true).unwrap();

    manager.select(Some(a));
    let active: Vec<_> = manager.presets().iter().filter(|p| p.is_active()).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, a);

    manager.select(Some(b));
    let active: Vec<_> = manager.presets().iter().filter(|p| p.is_active()).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, b);
}

#[test]
fn test_select_none_deselects_all() {
    let host = combat_host();
    let tmp = tempfile::tempdir().unwrap();
    let mut manager = manager_for(&host, tmp.path().join("presets"));

    let a = manager.create("A", true).unwrap();
    manager.select(Some(a));
    manager.select(None);

    assert!(manager.selected().is_none());
    // The previously active preset is stale, not unset.
    assert_eq!(manager.get(a).unwrap().selection, Selection::Stale);
}

#[test]
fn test_select_unknown_id_only_deselects() {
    let host = combat_host();
    let tmp = tempfile::tempdir().unwrap();
    let mut manager = manager_for(&host, tmp.path().join("presets"));

    let a = manager.create("A", true).unwrap();
    manager.select(Some(a));
    manager.select(Some(999));

    assert!(manager.selected().is_none());
}

// ===== Update =====

#[test]
fn test_update_recaptures_into_same_id() {
    let host = combat_host();
    let tmp = tempfile::tempdir().unwrap();
    let mut manager = manager_for(&host, tmp.path().join("presets"));

    let id = manager.create("Combat", true).unwrap();
    assert!(manager.get(id).unwrap().enabled_plugins.is_empty());

    manager.update(id).unwrap();

    let preset = manager.get(id).unwrap();
    assert_eq!(preset.enabled_plugins.get("Boosts"), Some(&true));
    assert_eq!(manager.selected().unwrap().id, id);
}

#[test]
fn test_update_unknown_id_fails() {
    let host = combat_host();
    let tmp = tempfile::tempdir().unwrap();
    let mut manager = manager_for(&host, tmp.path().join("presets"));

    assert!(matches!(
        manager.update(12345),
        Err(PresetError::PresetNotFound { .. })
    ));
}

// ===== Delete =====

#[test]
fn test_delete_removes_from_memory_and_next_refresh() {
    let host = combat_host();
    let tmp = tempfile::tempdir().unwrap();
    let mut manager = manager_for(&host, tmp.path().join("presets"));

    let a = manager.create("A", true).unwrap();
    let b = manager.create("B", true).unwrap();

    manager.delete(a).unwrap();
    assert!(manager.get(a).is_none());

    manager.refresh();
    assert!(manager.get(a).is_none());
    assert!(manager.get(b).is_some());
}

// ===== Load (apply) =====

#[test]
fn test_combat_scenario() {
    // Create preset "Combat" with Boosts enabled and boosts.showIcons="true";
    // disable Boosts live; the preset no longer matches; applying it restores
    // both the enablement and the setting.
    let host = combat_host();
    let tmp = tempfile::tempdir().unwrap();
    let mut manager = manager_for(&host, tmp.path().join("presets"));

    let id = manager.create("Combat", false).unwrap();

    host.set_enabled("Boosts", false);
    host.set_value("boosts", "showIcons", "false");

    let report = manager.load(id).unwrap();

    assert!(report.all_ok());
    assert!(host.is_enabled("Boosts"));
    assert!(host.is_running("Boosts"));
    assert_eq!(host.value("boosts", "showIcons"), Some("true".to_string()));
}

#[test]
fn test_load_with_missing_plugin_completes() {
    let host = combat_host();
    let tmp = tempfile::tempdir().unwrap();
    let mut manager = manager_for(&host, tmp.path().join("presets"));

    let id = manager.create("Combat", false).unwrap();
    host.remove_plugin("Prayer");
    host.set_enabled("Boosts", false);
    let report = manager.load(id).unwrap();

    assert_eq!(report.missing_plugins, vec!["Prayer"]);
    assert!(host.is_enabled("Boosts"));
}

#[test]
fn test_load_survives_per_plugin_start_failure() {
    let host = combat_host();
    let tmp = tempfile::tempdir().unwrap();
    let mut manager = manager_for(&host, tmp.path().join("presets"));

    let id = manager.create("Combat", false).unwrap();
    host.fail_plugin("Boosts");
    host.set_enabled("Boosts", false);
    host.set_enabled("Prayer", true);

    let report = manager.load(id).unwrap();

    assert_eq!(report.error_count(), 1);
    // Prayer was still stopped back to its captured disabled state.
    assert!(!host.is_enabled("Prayer"));
}

// ===== Rename =====

#[test]
fn test_rename_resorts_working_set() {
    let host = combat_host();
    let tmp = tempfile::tempdir().unwrap();
    let mut manager = manager_for(&host, tmp.path().join("presets"));

    let z = manager.create("Zebra", true).unwrap();
    manager.create("Apple", true).unwrap();

    manager.rename(z, "Aardvark").unwrap();

    let names: Vec<_> = manager.presets().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Aardvark", "Apple"]);
}

#[test]
fn test_rename_rejects_invalid_name() {
    let host = combat_host();
    let tmp = tempfile::tempdir().unwrap();
    let mut manager = manager_for(&host, tmp.path().join("presets"));

    let id = manager.create("Good", true).unwrap();
    assert!(matches!(
        manager.rename(id, "no|pipes"),
        Err(PresetError::InvalidName { .. })
    ));
    assert_eq!(manager.get(id).unwrap().name, "Good");
}

// ===== Keybinds =====

#[test]
fn test_keybind_lookup() {
    let host = combat_host();
    let tmp = tempfile::tempdir().unwrap();
    let mut manager = manager_for(&host, tmp.path().join("presets"));

    let id = manager.create("Combat", true).unwrap();
    manager.set_keybind(id, Some("F5".to_string())).unwrap();

    assert_eq!(manager.preset_for_keybind("F5"), Some(id));
    assert_eq!(manager.preset_for_keybind("F6"), None);

    manager.set_keybind(id, None).unwrap();
    assert_eq!(manager.preset_for_keybind("F5"), None);
}

#[test]
fn test_duplicate_keybind_first_by_name_wins() {
    let host = combat_host();
    let tmp = tempfile::tempdir().unwrap();
    let mut manager = manager_for(&host, tmp.path().join("presets"));

    let b = manager.create("Bravo", true).unwrap();
    let a = manager.create("Alpha", true).unwrap();
    manager.set_keybind(b, Some("F5".to_string())).unwrap();
    manager.set_keybind(a, Some("F5".to_string())).unwrap();

    // Working set is name-sorted, so Alpha is encountered first.
    assert_eq!(manager.preset_for_keybind("F5"), Some(a));

    // The binding survives a refresh.
    manager.refresh();
    assert_eq!(manager.preset_for_keybind("F5"), Some(a));
}

// ===== Reports =====

#[test]
fn test_missing_and_unsaved_plugin_reports() {
    let host = combat_host();
    let tmp = tempfile::tempdir().unwrap();
    let mut manager = manager_for(&host, tmp.path().join("presets"));

    let id = manager.create("Combat", false).unwrap();

    host.remove_plugin("Prayer");
    host.add_plugin("Freshly Installed", None, true);

    assert_eq!(manager.missing_plugins(id).unwrap(), vec!["Prayer"]);
    assert_eq!(
        manager.unsaved_plugins(id).unwrap(),
        vec!["Freshly Installed"]
    );
}

// ===== Shutdown =====

#[test]
fn test_shutdown_removes_empty_preset_dir() {
    let host = combat_host();
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("presets");
    let mut manager = manager_for(&host, dir.clone());

    let id = manager.create("Temp", true).unwrap();
    manager.delete(id).unwrap();
    manager.shutdown();

    assert!(!dir.exists());
}
