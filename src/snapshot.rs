//! Snapshot engine: capture live plugin state into preset maps.
//!
//! Captures are filtered through [`IgnoreRules`] so reserved plugins and
//! credential-like setting keys never enter a preset, regardless of what
//! the host adapters report.

use std::collections::BTreeMap;

use tracing::{debug, instrument, trace};

use crate::host::{SharedRegistry, SharedStore};
use crate::preset::{IgnoreRules, Preset, SettingsMap};

/// Reads live state from the host adapters and compares it to presets.
pub struct SnapshotEngine {
    registry: SharedRegistry,
    store: SharedStore,
    rules: IgnoreRules,
}

impl SnapshotEngine {
    /// Create an engine over the given adapters and exclusion rules.
    #[must_use]
    pub fn new(registry: SharedRegistry, store: SharedStore, rules: IgnoreRules) -> Self {
        Self {
            registry,
            store,
            rules,
        }
    }

    /// Record the current enabled flag of every non-ignored plugin.
    #[instrument(skip_all)]
    pub fn capture_enabled_plugins(&self) -> BTreeMap<String, bool> {
        let mut enabled = BTreeMap::new();
        for plugin in self.registry.plugins() {
            if self.rules.is_ignored_plugin(&plugin.name) {
                continue;
            }
            enabled.insert(plugin.name.clone(), self.registry.is_enabled(&plugin.name));
        }
        debug!(plugins = enabled.len(), "Captured plugin enablement");
        enabled
    }

    /// Read every configurable (group, key) value of every non-ignored
    /// plugin.
    ///
    /// Plugins with no configuration group or no declared keys are skipped
    /// silently; that is expected for purely cosmetic or externally
    /// provided plugins. Absent values are captured as `None`, distinct
    /// from an empty string.
    #[instrument(skip_all)]
    pub fn capture_plugin_settings(&self) -> SettingsMap {
        let mut settings = SettingsMap::new();
        for plugin in self.registry.plugins() {
            if self.rules.is_ignored_plugin(&plugin.name) {
                continue;
            }
            let Some(group) = plugin.config_group else {
                trace!(plugin = %plugin.name, "No configuration group, skipping");
                continue;
            };

            let mut values = BTreeMap::new();
            for key in self.store.keys_for(&group) {
                if self.rules.is_ignored_key(&key) {
                    trace!(group = %group, key = %key, "Ignored setting key");
                    continue;
                }
                values.insert(key.clone(), self.store.value(&group, &key));
            }

            if !values.is_empty() {
                settings.insert(group, values);
            }
        }
        debug!(groups = settings.len(), "Captured plugin settings");
        settings
    }

    /// Whether live enablement exactly equals the preset's captured
    /// enablement: same plugin names, same boolean values.
    ///
    /// Setting values are intentionally not part of the comparison; only
    /// enablement decides whether a preset matches live state.
    #[must_use]
    pub fn matches(&self, preset: &Preset) -> bool {
        self.capture_enabled_plugins() == preset.enabled_plugins
    }
}
