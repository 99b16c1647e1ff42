//! Preset record types.
//!
//! A preset is a named snapshot of plugin enablement plus plugin settings.
//! Setting values are opaque strings; `None` marks a setting that existed
//! but had no stored value when captured (distinct from an empty string).

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Preset identifier: capture timestamp in milliseconds, unique within the
/// working set.
pub type PresetId = i64;

/// Map of plugin group name to captured settings.
pub type SettingsMap = BTreeMap<String, BTreeMap<String, Option<String>>>;

/// Placeholder stem used when a preset is created without a name.
pub const DEFAULT_PRESET_NAME: &str = "Preset";

/// Selection state of a preset within the working set.
///
/// At most one preset is `Active` at any time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Matches live state and is the active preset.
    Active,
    /// Was once active or was explicitly deselected; configuration has
    /// drifted since.
    Stale,
    /// Never evaluated against live state.
    #[default]
    Unset,
}

/// Where a preset is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Stored only in the device-local preset directory.
    LocalOnly,
    /// Mirrored into the host's remote configuration value.
    Synced,
    /// Not yet classified.
    #[default]
    Unclassified,
}

/// A named snapshot of plugin enablement and settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    /// Unique identifier (capture timestamp in milliseconds).
    pub id: PresetId,
    /// Display name.
    pub name: String,
    /// Persistence origin.
    #[serde(default)]
    pub origin: Origin,
    /// Selection state.
    #[serde(default)]
    pub selection: Selection,
    /// Optional hotkey label bound to this preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keybind: Option<String>,
    /// Plugin name -> enabled flag at capture time.
    #[serde(default)]
    pub enabled_plugins: BTreeMap<String, bool>,
    /// Plugin group -> (setting key -> value). `None` means captured but
    /// not set.
    #[serde(default)]
    pub plugin_settings: SettingsMap,
}

impl Preset {
    /// Create an empty preset with the given identity.
    #[must_use]
    pub fn new(id: PresetId, name: String) -> Self {
        Self {
            id,
            name,
            origin: Origin::Unclassified,
            selection: Selection::Unset,
            keybind: None,
            enabled_plugins: BTreeMap::new(),
            plugin_settings: SettingsMap::new(),
        }
    }

    /// Set the captured enablement map.
    #[must_use]
    pub fn with_enabled_plugins(mut self, enabled: BTreeMap<String, bool>) -> Self {
        self.enabled_plugins = enabled;
        self
    }

    /// Set the captured settings map.
    #[must_use]
    pub fn with_settings(mut self, settings: SettingsMap) -> Self {
        self.plugin_settings = settings;
        self
    }

    /// Whether this preset is the active one.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.selection == Selection::Active
    }

    /// Whether this preset belongs in the remote mirror.
    #[must_use]
    pub fn is_synced(&self) -> bool {
        self.origin == Origin::Synced
    }
}

/// Generate a fresh preset identifier from the current wall clock.
///
/// Callers inserting into a working set are responsible for bumping the id
/// on collision.
#[must_use]
pub fn fresh_id() -> PresetId {
    Utc::now().timestamp_millis()
}

/// Validate a preset display name.
///
/// Allowed: letters (including accented), digits, space, and `-_.,()+`.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphabetic() || c.is_ascii_digit() || " -_.,()+".contains(c))
}

/// Sort a working set for stable display: case-sensitive lexical on name.
pub fn sort_by_name(presets: &mut [Preset]) {
    presets.sort_by(|a, b| a.name.cmp(&b.name));
}
