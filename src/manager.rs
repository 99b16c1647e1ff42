//! Preset manager: owns the working set and orchestrates the engines.
//!
//! All mutating operations are designed for cooperative single-threaded
//! access from the host's event-dispatch context. The manager holds the
//! suppress flag that keeps configuration-change notifications emitted by
//! its own `load` from being mistaken for user-driven drift.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{debug, info, instrument, warn};

use crate::apply::{ApplyEngine, ApplyReport};
use crate::error::{PresetError, Result};
use crate::host::{ConfigChange, SharedRegistry, SharedStore};
use crate::preset::{
    fresh_id, is_valid_name, sort_by_name, IgnoreRules, Preset, PresetId, Selection,
    DEFAULT_PRESET_NAME,
};
use crate::share;
use crate::storage::{PresetStorage, MIRROR_GROUP};
use crate::snapshot::SnapshotEngine;

/// Orchestrates snapshot, apply, persistence and sharing over a single
/// in-memory working set.
pub struct PresetManager {
    snapshot: SnapshotEngine,
    apply: ApplyEngine,
    storage: PresetStorage,
    rules: IgnoreRules,
    presets: Vec<Preset>,
    keybinds: HashMap<String, PresetId>,
    applying: bool,
}

impl PresetManager {
    /// Create a manager over the given host adapters, rules and preset
    /// directory, loading the persisted working set.
    #[must_use]
    pub fn new(
        registry: SharedRegistry,
        store: SharedStore,
        rules: IgnoreRules,
        dir: PathBuf,
    ) -> Self {
        let mut manager = Self {
            snapshot: SnapshotEngine::new(registry.clone(), store.clone(), rules.clone()),
            apply: ApplyEngine::new(registry, store.clone(), rules.clone()),
            storage: PresetStorage::new(dir, store),
            rules,
            presets: Vec::new(),
            keybinds: HashMap::new(),
            applying: false,
        };
        manager.refresh();
        info!(presets = manager.presets.len(), "Preset manager started");
        manager
    }

    // === Accessors ===

    /// The working set, sorted by name.
    #[must_use]
    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    /// The active preset, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&Preset> {
        self.presets.iter().find(|p| p.is_active())
    }

    /// Look up a preset by identifier.
    #[must_use]
    pub fn get(&self, id: PresetId) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }

    /// First preset bound to the given keybind label, by name order.
    #[must_use]
    pub fn preset_for_keybind(&self, label: &str) -> Option<PresetId> {
        self.keybinds.get(label).copied()
    }

    // === Lifecycle operations ===

    /// Create a preset, capturing live state unless `from_empty` is set.
    ///
    /// A blank name becomes `"Preset N"`. The new preset is appended and
    /// selection is forced onto it.
    #[instrument(skip(self))]
    pub fn create(&mut self, name: &str, from_empty: bool) -> Result<PresetId> {
        let name = name.trim();
        let name = if name.is_empty() {
            format!("{} {}", DEFAULT_PRESET_NAME, self.presets.len() + 1)
        } else {
            if !is_valid_name(name) {
                return Err(PresetError::InvalidName {
                    name: name.to_string(),
                });
            }
            name.to_string()
        };

        let id = self.unique_fresh_id();
        let mut preset = Preset::new(id, name);
        if !from_empty {
            preset.enabled_plugins = self.snapshot.capture_enabled_plugins();
            preset.plugin_settings = self.snapshot.capture_plugin_settings();
        }
        info!(id, name = %preset.name, from_empty, "Created preset");
        self.presets.push(preset);
        self.select(Some(id));
        self.refresh();
        Ok(id)
    }

    /// Force selection onto the given preset, or deselect everything.
    ///
    /// The previously active preset is demoted to stale; an unknown
    /// identifier only deselects. Persists the working set.
    pub fn select(&mut self, id: Option<PresetId>) {
        for preset in &mut self.presets {
            if preset.selection == Selection::Active {
                preset.selection = Selection::Stale;
            }
        }
        if let Some(id) = id {
            if let Some(preset) = self.presets.iter_mut().find(|p| p.id == id) {
                preset.selection = Selection::Active;
                debug!(id, name = %preset.name, "Selected preset");
            }
        }
        self.persist();
        self.rebuild_keybinds();
    }

    /// Re-capture live state into an existing preset and reselect it.
    pub fn update(&mut self, id: PresetId) -> Result<()> {
        let enabled = self.snapshot.capture_enabled_plugins();
        let settings = self.snapshot.capture_plugin_settings();
        let preset = self.find_mut(id)?;
        preset.enabled_plugins = enabled;
        preset.plugin_settings = settings;
        info!(id, name = %preset.name, "Updated preset from live state");
        self.select(Some(id));
        Ok(())
    }

    /// Remove a preset from the working set and backing storage.
    pub fn delete(&mut self, id: PresetId) -> Result<()> {
        let index = self
            .presets
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| not_found(id))?;
        let removed = self.presets.remove(index);
        info!(id, name = %removed.name, "Deleted preset");
        self.persist();
        self.rebuild_keybinds();
        Ok(())
    }

    /// Apply a preset to the host.
    ///
    /// Suppresses drift detection for the duration, so applying a preset
    /// never re-triggers it.
    pub fn load(&mut self, id: PresetId) -> Result<ApplyReport> {
        let preset = self.find(id)?.clone();
        info!(id, name = %preset.name, "Loading preset");
        self.applying = true;
        let report = self.apply.apply(&preset);
        self.applying = false;
        Ok(report)
    }

    /// Rename a preset, keeping its identity and captured state.
    pub fn rename(&mut self, id: PresetId, new_name: &str) -> Result<()> {
        let new_name = new_name.trim();
        if !is_valid_name(new_name) {
            return Err(PresetError::InvalidName {
                name: new_name.to_string(),
            });
        }
        let preset = self.find_mut(id)?;
        debug!(id, from = %preset.name, to = %new_name, "Renaming preset");
        preset.name = new_name.to_string();
        sort_by_name(&mut self.presets);
        self.persist();
        self.rebuild_keybinds();
        Ok(())
    }

    /// Bind or unbind a hotkey label.
    pub fn set_keybind(&mut self, id: PresetId, label: Option<String>) -> Result<()> {
        let preset = self.find_mut(id)?;
        preset.keybind = label;
        self.persist();
        self.rebuild_keybinds();
        Ok(())
    }

    /// Mark a preset device-local or mirrored.
    pub fn set_synced(&mut self, id: PresetId, synced: bool) -> Result<()> {
        let preset = self.find_mut(id)?;
        preset.origin = if synced {
            crate::preset::Origin::Synced
        } else {
            crate::preset::Origin::LocalOnly
        };
        self.persist();
        Ok(())
    }

    /// Discard and rebuild the in-memory working set from storage.
    ///
    /// Guarantees storage and memory never diverge: pending writes are
    /// flushed first, then the set is reloaded, re-filtered, re-sorted and
    /// the keybind index rebuilt.
    pub fn refresh(&mut self) {
        self.storage.flush();
        let mut loaded = self.storage.load();

        for preset in &mut loaded {
            preset
                .enabled_plugins
                .retain(|name, _| !self.rules.is_ignored_plugin(name));
            for values in preset.plugin_settings.values_mut() {
                values.retain(|key, _| !self.rules.is_ignored_key(key));
            }
            preset.plugin_settings.retain(|_, values| !values.is_empty());
        }

        // Unique by identifier; first occurrence wins.
        let mut seen = Vec::new();
        loaded.retain(|p| {
            if seen.contains(&p.id) {
                warn!(id = p.id, name = %p.name, "Dropping duplicate preset id");
                false
            } else {
                seen.push(p.id);
                true
            }
        });

        sort_by_name(&mut loaded);
        self.presets = loaded;
        self.rebuild_keybinds();
        debug!(presets = self.presets.len(), "Refreshed working set");
    }

    /// Flush pending writes and clean up an empty preset directory.
    pub fn shutdown(&mut self) {
        self.presets.clear();
        self.keybinds.clear();
        self.storage.shutdown();
        info!("Preset manager stopped");
    }

    // === Sharing ===

    /// Encode a preset to a copy-pasteable text blob.
    pub fn export_share(&self, id: PresetId) -> Result<String> {
        share::export(self.find(id)?)
    }

    /// Decode a text blob and insert the result into the working set.
    pub fn import_share(&mut self, text: &str) -> Result<PresetId> {
        let mut preset = share::import(text)?;
        preset.id = self.unique_fresh_id();
        let id = preset.id;
        info!(id, name = %preset.name, "Imported preset into working set");
        self.presets.push(preset);
        self.persist();
        self.refresh();
        Ok(id)
    }

    // === Drift detection ===

    /// React to a configuration change notification from the host.
    ///
    /// Ignored while a preset is being applied. If exactly one preset's
    /// enablement matches live state it becomes active; otherwise the
    /// previously active preset is demoted to stale.
    pub fn on_config_changed(&mut self, change: &ConfigChange) {
        if self.applying || change.group == MIRROR_GROUP {
            return;
        }

        let matching: Vec<PresetId> = self
            .presets
            .iter()
            .filter(|p| self.snapshot.matches(p))
            .map(|p| p.id)
            .collect();

        match matching.as_slice() {
            [only] => {
                if self.selected().map(|p| p.id) != Some(*only) {
                    debug!(id = only, "Live state matches a preset, auto-selecting");
                    self.select(Some(*only));
                }
            }
            _ => {
                if let Some(active) = self.presets.iter_mut().find(|p| p.is_active()) {
                    debug!(id = active.id, name = %active.name, "Configuration drifted, demoting to stale");
                    active.selection = Selection::Stale;
                    self.persist();
                }
            }
        }
    }

    // === Informational reports ===

    /// Plugins captured in the preset but missing from the live registry.
    pub fn missing_plugins(&self, id: PresetId) -> Result<Vec<String>> {
        Ok(self.apply.missing_plugins(self.find(id)?))
    }

    /// Live plugins never captured in the preset.
    pub fn unsaved_plugins(&self, id: PresetId) -> Result<Vec<String>> {
        Ok(self.apply.unsaved_plugins(self.find(id)?))
    }

    // === Internal helpers ===

    fn find(&self, id: PresetId) -> Result<&Preset> {
        self.presets
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found(id))
    }

    fn find_mut(&mut self, id: PresetId) -> Result<&mut Preset> {
        self.presets
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found(id))
    }

    fn persist(&self) {
        self.storage.save(&self.presets);
    }

    fn unique_fresh_id(&self) -> PresetId {
        let mut candidate = fresh_id();
        while self.presets.iter().any(|p| p.id == candidate) {
            candidate += 1;
        }
        candidate
    }

    fn rebuild_keybinds(&mut self) {
        self.keybinds.clear();
        for preset in &self.presets {
            if let Some(label) = &preset.keybind {
                // First preset per label wins; later duplicates are inert.
                self.keybinds.entry(label.clone()).or_insert(preset.id);
            }
        }
    }
}

fn not_found(id: PresetId) -> PresetError {
    PresetError::PresetNotFound {
        name: id.to_string(),
    }
}
