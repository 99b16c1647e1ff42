//! Apply engine: push a preset's captured state back into the host.
//!
//! Applying is deliberately best-effort per plugin: starting or stopping a
//! plugin can fail for reasons outside this system's control (missing
//! native resources, disabled dependencies), and partial application is
//! preferable to none. Failures are collected into the report, never
//! propagated.

use serde::Serialize;
use tracing::{debug, instrument, trace, warn};

use crate::error::PresetError;
use crate::host::{SharedRegistry, SharedStore};
use crate::preset::{IgnoreRules, Preset};

/// Outcome of applying one plugin's enablement.
#[derive(Debug, Clone, Serialize)]
pub struct PluginApply {
    /// Plugin name.
    pub name: String,
    /// The enablement state that was applied.
    pub enabled: bool,
    /// Whether the start/stop succeeded.
    pub ok: bool,
    /// Failure reason when `ok` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate result of applying a preset.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplyReport {
    /// Number of setting values written to the configuration store.
    pub settings_written: usize,
    /// Per-plugin enablement outcomes, in registry order.
    pub plugins: Vec<PluginApply>,
    /// Plugins captured in the preset but absent from the live registry.
    pub missing_plugins: Vec<String>,
}

impl ApplyReport {
    /// Number of plugins whose start/stop failed.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.plugins.iter().filter(|p| !p.ok).count()
    }

    /// Whether every applied plugin succeeded.
    #[must_use]
    pub fn all_ok(&self) -> bool {
        self.error_count() == 0
    }
}

/// Writes preset state into the host adapters.
pub struct ApplyEngine {
    registry: SharedRegistry,
    store: SharedStore,
    rules: IgnoreRules,
}

impl ApplyEngine {
    /// Create an engine over the given adapters and exclusion rules.
    #[must_use]
    pub fn new(registry: SharedRegistry, store: SharedStore, rules: IgnoreRules) -> Self {
        Self {
            registry,
            store,
            rules,
        }
    }

    /// Apply a preset's settings and enablement to the host.
    ///
    /// Null setting values are skipped (a captured-but-unset value never
    /// overwrites live state). Plugins present in the registry but unknown
    /// to the preset are left untouched. The caller is responsible for
    /// suppressing configuration-change notifications for the duration.
    #[instrument(skip_all, fields(preset = %preset.name))]
    pub fn apply(&self, preset: &Preset) -> ApplyReport {
        let mut report = ApplyReport {
            settings_written: self.apply_settings(preset),
            plugins: Vec::new(),
            missing_plugins: self.missing_plugins(preset),
        };
        self.apply_enablement(preset, &mut report);

        debug!(
            settings = report.settings_written,
            plugins = report.plugins.len(),
            errors = report.error_count(),
            missing = report.missing_plugins.len(),
            "Preset applied"
        );
        report
    }

    /// Plugins captured in the preset but not installed on the host.
    ///
    /// Informational: these names are skipped during apply, not errors.
    #[must_use]
    pub fn missing_plugins(&self, preset: &Preset) -> Vec<String> {
        let live: Vec<String> = self.registry.plugins().into_iter().map(|p| p.name).collect();
        preset
            .enabled_plugins
            .keys()
            .filter(|name| !self.rules.is_ignored_plugin(name) && !live.contains(name))
            .cloned()
            .collect()
    }

    /// Live plugins never captured in the preset.
    ///
    /// Informational: these stay untouched when the preset is applied.
    #[must_use]
    pub fn unsaved_plugins(&self, preset: &Preset) -> Vec<String> {
        self.registry
            .plugins()
            .into_iter()
            .map(|p| p.name)
            .filter(|name| {
                !self.rules.is_ignored_plugin(name) && !preset.enabled_plugins.contains_key(name)
            })
            .collect()
    }

    fn apply_settings(&self, preset: &Preset) -> usize {
        let mut written = 0;
        for (group, values) in &preset.plugin_settings {
            for (key, value) in values {
                // Presets built by this system never contain ignored keys,
                // but imported blobs are not trusted.
                if self.rules.is_ignored_key(key) {
                    trace!(group = %group, key = %key, "Refusing to apply ignored key");
                    continue;
                }
                if let Some(value) = value {
                    self.store.set_value(group, key, value);
                    written += 1;
                } else {
                    trace!(group = %group, key = %key, "Skipping null value");
                }
            }
        }
        written
    }

    fn apply_enablement(&self, preset: &Preset, report: &mut ApplyReport) {
        for plugin in self.registry.plugins() {
            if self.rules.is_ignored_plugin(&plugin.name) {
                continue;
            }
            // Plugins installed after the preset was captured stay as
            // "ignored": they keep their current state.
            let Some(&enabled) = preset.enabled_plugins.get(&plugin.name) else {
                trace!(plugin = %plugin.name, "Not in preset, leaving untouched");
                continue;
            };

            self.registry.set_enabled(&plugin.name, enabled);
            let result = if enabled {
                self.registry.start(&plugin.name)
            } else {
                self.registry.stop(&plugin.name)
            };

            match result {
                Ok(()) => report.plugins.push(PluginApply {
                    name: plugin.name,
                    enabled,
                    ok: true,
                    error: None,
                }),
                Err(e) => {
                    let failure = PresetError::PluginStartStop {
                        plugin: plugin.name.clone(),
                        action: if enabled { "start" } else { "stop" },
                        reason: e.to_string(),
                    };
                    warn!(error = %failure, "Continuing with remaining plugins");
                    report.plugins.push(PluginApply {
                        name: plugin.name,
                        enabled,
                        ok: false,
                        error: Some(failure.to_string()),
                    });
                }
            }
        }
    }
}
