//! Host abstraction layer for the plugin registry and configuration store.
//!
//! This module provides trait-based abstractions over the host application's
//! plugin manager and configuration bus, enabling testability without a
//! running host.

pub mod mock;

use std::sync::Arc;

use thiserror::Error;

/// A plugin known to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginInfo {
    /// Display name, unique within the host.
    pub name: String,
    /// Configuration group the plugin's settings live under, if it has one.
    ///
    /// Plugins without a configuration descriptor (purely cosmetic or
    /// externally provided ones) report `None` and have nothing to capture.
    pub config_group: Option<String>,
}

impl PluginInfo {
    /// Create a plugin descriptor with a configuration group.
    #[must_use]
    pub fn new(name: impl Into<String>, config_group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config_group: Some(config_group.into()),
        }
    }

    /// Create a plugin descriptor with no configuration group.
    #[must_use]
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config_group: None,
        }
    }
}

/// A configuration change notification from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigChange {
    /// Configuration group of the changed value.
    pub group: String,
    /// Key of the changed value.
    pub key: String,
}

/// Failures raised by the host when toggling a plugin's runtime state.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to start '{plugin}': {reason}")]
    StartFailure { plugin: String, reason: String },

    #[error("failed to stop '{plugin}': {reason}")]
    StopFailure { plugin: String, reason: String },

    #[error("plugin '{0}' has no loadable instance")]
    NoInstance(String),
}

/// Plugin registry operations.
///
/// Abstracts over the host's plugin manager. Implementations must tolerate
/// unknown plugin names by treating them as no-ops: the engines never check
/// existence before calling.
pub trait PluginRegistry: Send + Sync {
    /// Enumerate all plugins currently known to the host.
    fn plugins(&self) -> Vec<PluginInfo>;

    /// Whether the named plugin is currently enabled.
    fn is_enabled(&self, name: &str) -> bool;

    /// Flip the named plugin's enabled switch without touching its runtime.
    fn set_enabled(&self, name: &str, enabled: bool);

    /// Start the named plugin's runtime effects.
    ///
    /// # Errors
    ///
    /// Returns a `HostError` if the plugin instance could not be constructed
    /// or started.
    fn start(&self, name: &str) -> std::result::Result<(), HostError>;

    /// Stop the named plugin's runtime effects.
    ///
    /// # Errors
    ///
    /// Returns a `HostError` if the plugin could not be stopped cleanly.
    fn stop(&self, name: &str) -> std::result::Result<(), HostError>;
}

/// Configuration store operations.
///
/// Abstracts over the host's key-value configuration bus. Values are opaque
/// strings; an absent value is distinct from an empty string.
pub trait ConfigStore: Send + Sync {
    /// Read a single value, or `None` if it was never set.
    fn value(&self, group: &str, key: &str) -> Option<String>;

    /// Write a single value.
    fn set_value(&self, group: &str, key: &str, value: &str);

    /// Remove a value entirely.
    fn unset(&self, group: &str, key: &str);

    /// Enumerate the configurable keys declared for a group.
    ///
    /// An empty vec means the group has no configurable settings and is
    /// skipped during capture.
    fn keys_for(&self, group: &str) -> Vec<String>;
}

/// Shared handle to a plugin registry.
pub type SharedRegistry = Arc<dyn PluginRegistry>;

/// Shared handle to a configuration store.
pub type SharedStore = Arc<dyn ConfigStore>;
