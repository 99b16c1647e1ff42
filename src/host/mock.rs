//! Mock host implementation for unit testing.
//!
//! This module provides a mock plugin registry and configuration store that
//! record all operations and support assertions for testing.
//!
//! # Example
//!
//! ```rust,ignore
//! use presets::host::mock::{MockHost, Operation};
//! use presets::host::{ConfigStore, PluginRegistry};
//!
//! let host = MockHost::new();
//! host.add_plugin("Boosts", Some("boosts"), true);
//! host.declare_key("boosts", "showIcons");
//! host.set_value("boosts", "showIcons", "true");
//!
//! host.assert_contains(&Operation::SetValue {
//!     group: "boosts".to_string(),
//!     key: "showIcons".to_string(),
//!     value: "true".to_string(),
//! });
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use tracing::trace;

use super::{ConfigStore, HostError, PluginInfo, PluginRegistry};

/// Recorded operation for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    SetValue {
        group: String,
        key: String,
        value: String,
    },
    Unset {
        group: String,
        key: String,
    },
    SetEnabled {
        plugin: String,
        enabled: bool,
    },
    Start {
        plugin: String,
    },
    Stop {
        plugin: String,
    },
}

/// A plugin registered on the mock host.
#[derive(Debug, Clone)]
struct MockPlugin {
    info: PluginInfo,
    enabled: bool,
    running: bool,
}

/// Mock host for testing without a live application.
///
/// Implements both [`PluginRegistry`] and [`ConfigStore`], records every
/// mutating operation, and can be configured to fail start/stop for
/// specific plugins.
#[derive(Default)]
pub struct MockHost {
    plugins: Mutex<BTreeMap<String, MockPlugin>>,
    values: Mutex<HashMap<(String, String), String>>,
    declared_keys: Mutex<BTreeMap<String, Vec<String>>>,
    operation_log: Mutex<Vec<Operation>>,
    failing_plugins: Mutex<Vec<String>>,
}

impl MockHost {
    /// Create an empty mock host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Setup ===

    /// Register a plugin, optionally with a configuration group.
    pub fn add_plugin(&self, name: &str, config_group: Option<&str>, enabled: bool) {
        let info = PluginInfo {
            name: name.to_string(),
            config_group: config_group.map(ToString::to_string),
        };
        self.plugins.lock().unwrap().insert(
            name.to_string(),
            MockPlugin {
                info,
                enabled,
                running: enabled,
            },
        );
    }

    /// Remove a plugin, simulating an uninstall.
    pub fn remove_plugin(&self, name: &str) {
        self.plugins.lock().unwrap().remove(name);
    }

    /// Declare a configurable key for a group.
    pub fn declare_key(&self, group: &str, key: &str) {
        self.declared_keys
            .lock()
            .unwrap()
            .entry(group.to_string())
            .or_default()
            .push(key.to_string());
    }

    /// Make start/stop fail for the named plugin.
    pub fn fail_plugin(&self, name: &str) {
        self.failing_plugins.lock().unwrap().push(name.to_string());
    }

    // === Assertions ===

    /// Get all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<Operation> {
        self.operation_log.lock().unwrap().clone()
    }

    /// Assert specific operations were performed, in order.
    ///
    /// # Panics
    ///
    /// Panics if the operations don't match.
    pub fn assert_operations(&self, expected: &[Operation]) {
        let actual = self.operations();
        assert_eq!(
            actual, expected,
            "Operation mismatch.\nExpected: {expected:#?}\nActual: {actual:#?}",
        );
    }

    /// Assert a specific operation was performed at least once.
    ///
    /// # Panics
    ///
    /// Panics if the operation was not found.
    pub fn assert_contains(&self, expected: &Operation) {
        let ops = self.operations();
        assert!(
            ops.contains(expected),
            "Expected operation {expected:?} not found in: {ops:#?}",
        );
    }

    /// Assert no operations were performed.
    ///
    /// # Panics
    ///
    /// Panics if any operations were recorded.
    pub fn assert_no_operations(&self) {
        let ops = self.operations();
        assert!(ops.is_empty(), "Expected no operations, but found: {ops:#?}");
    }

    /// Clear the operation log for fresh assertions.
    pub fn clear_operations(&self) {
        self.operation_log.lock().unwrap().clear();
    }

    /// Whether the named plugin's runtime is currently started.
    #[must_use]
    pub fn is_running(&self, name: &str) -> bool {
        self.plugins
            .lock()
            .unwrap()
            .get(name)
            .is_some_and(|p| p.running)
    }

    // === Internal Helpers ===

    fn record_op(&self, op: Operation) {
        trace!(?op, "Recording operation");
        self.operation_log.lock().unwrap().push(op);
    }

    fn check_plugin(&self, name: &str) -> std::result::Result<(), HostError> {
        if self.failing_plugins.lock().unwrap().iter().any(|p| p == name) {
            return Err(HostError::NoInstance(name.to_string()));
        }
        Ok(())
    }
}

impl PluginRegistry for MockHost {
    fn plugins(&self) -> Vec<PluginInfo> {
        self.plugins
            .lock()
            .unwrap()
            .values()
            .map(|p| p.info.clone())
            .collect()
    }

    fn is_enabled(&self, name: &str) -> bool {
        self.plugins
            .lock()
            .unwrap()
            .get(name)
            .is_some_and(|p| p.enabled)
    }

    fn set_enabled(&self, name: &str, enabled: bool) {
        self.record_op(Operation::SetEnabled {
            plugin: name.to_string(),
            enabled,
        });
        if let Some(plugin) = self.plugins.lock().unwrap().get_mut(name) {
            plugin.enabled = enabled;
        }
    }

    fn start(&self, name: &str) -> std::result::Result<(), HostError> {
        self.check_plugin(name)?;
        self.record_op(Operation::Start {
            plugin: name.to_string(),
        });
        if let Some(plugin) = self.plugins.lock().unwrap().get_mut(name) {
            plugin.running = true;
        }
        Ok(())
    }

    fn stop(&self, name: &str) -> std::result::Result<(), HostError> {
        self.check_plugin(name)?;
        self.record_op(Operation::Stop {
            plugin: name.to_string(),
        });
        if let Some(plugin) = self.plugins.lock().unwrap().get_mut(name) {
            plugin.running = false;
        }
        Ok(())
    }
}

impl ConfigStore for MockHost {
    fn value(&self, group: &str, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap()
            .get(&(group.to_string(), key.to_string()))
            .cloned()
    }

    fn set_value(&self, group: &str, key: &str, value: &str) {
        self.record_op(Operation::SetValue {
            group: group.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        });
        self.values
            .lock()
            .unwrap()
            .insert((group.to_string(), key.to_string()), value.to_string());
    }

    fn unset(&self, group: &str, key: &str) {
        self.record_op(Operation::Unset {
            group: group.to_string(),
            key: key.to_string(),
        });
        self.values
            .lock()
            .unwrap()
            .remove(&(group.to_string(), key.to_string()));
    }

    fn keys_for(&self, group: &str) -> Vec<String> {
        self.declared_keys
            .lock()
            .unwrap()
            .get(group)
            .cloned()
            .unwrap_or_default()
    }
}
