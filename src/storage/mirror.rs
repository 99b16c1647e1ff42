//! Remote mirror for synced presets.
//!
//! Presets marked [`Origin::Synced`] are mirrored into a single small
//! configuration value carried by the host's own settings sync, so they
//! follow the user across devices. The value holds a compact JSON array
//! and is explicitly unset (never stored as `"[]"`) when there are no
//! synced presets.

use tracing::{debug, warn};

use crate::error::Result;
use crate::host::SharedStore;
use crate::preset::Preset;

/// Configuration group owned by the preset system.
pub const MIRROR_GROUP: &str = "pluginpresets";
/// Key holding the mirrored preset array.
pub const MIRROR_KEY: &str = "presets";

/// Store for the remote preset mirror.
pub struct MirrorStore {
    store: SharedStore,
}

impl MirrorStore {
    /// Create a mirror over the given configuration store.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Write the synced presets, or unset the value when none remain.
    pub fn save(&self, synced: &[&Preset]) -> Result<()> {
        if synced.is_empty() {
            self.store.unset(MIRROR_GROUP, MIRROR_KEY);
            debug!("Mirror cleared");
            return Ok(());
        }
        let json = serde_json::to_string(synced)?;
        self.store.set_value(MIRROR_GROUP, MIRROR_KEY, &json);
        debug!(count = synced.len(), bytes = json.len(), "Mirror saved");
        Ok(())
    }

    /// Load the mirrored presets; absent or malformed values yield an
    /// empty set rather than an error.
    #[must_use]
    pub fn load(&self) -> Vec<Preset> {
        let Some(json) = self.store.value(MIRROR_GROUP, MIRROR_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<Preset>>(&json) {
            Ok(presets) => {
                debug!(count = presets.len(), "Loaded mirrored presets");
                presets
            }
            Err(e) => {
                warn!(error = %e, "Mirror value is malformed, ignoring");
                Vec::new()
            }
        }
    }
}
