//! Persistence layer for the preset collection.
//!
//! Local presets live as individual JSON files on disk; synced presets are
//! mirrored into a single host configuration value. Saves snapshot the
//! working set and run on the write lane, so callers never wait for disk
//! and writes never interleave. Loads merge both sources, disk winning on
//! identifier collisions.

mod disk;
mod lane;
mod mirror;

pub use disk::{default_presets_dir, DiskStore};
pub use lane::WriteLane;
pub use mirror::{MirrorStore, MIRROR_GROUP, MIRROR_KEY};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::warn;

use crate::host::SharedStore;
use crate::preset::{Origin, Preset};

/// Combined disk + mirror persistence behind a single write lane.
pub struct PresetStorage {
    disk: Arc<DiskStore>,
    mirror: Arc<MirrorStore>,
    lane: WriteLane,
}

impl PresetStorage {
    /// Create storage over the given preset directory and host store.
    #[must_use]
    pub fn new(dir: PathBuf, store: SharedStore) -> Self {
        Self {
            disk: Arc::new(DiskStore::new(dir)),
            mirror: Arc::new(MirrorStore::new(store)),
            lane: WriteLane::new(),
        }
    }

    /// The local preset directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.disk.dir()
    }

    /// Persist the working set: local presets to disk, synced presets to
    /// the mirror.
    ///
    /// Returns immediately; the write happens on the lane against a full
    /// copy of the data. A failed write is logged and the in-memory set
    /// remains the source of truth until the next save.
    pub fn save(&self, presets: &[Preset]) {
        let (synced, local): (Vec<Preset>, Vec<Preset>) = presets
            .iter()
            .cloned()
            .partition(|p| p.origin == Origin::Synced);

        let disk = self.disk.clone();
        let mirror = self.mirror.clone();
        self.lane.submit(move || {
            if let Err(e) = disk.save_all(&local) {
                warn!(error = %e, "Failed to save local presets");
            }
            let refs: Vec<&Preset> = synced.iter().collect();
            if let Err(e) = mirror.save(&refs) {
                warn!(error = %e, "Failed to save mirrored presets");
            }
        });
    }

    /// Load and merge both sources, disk winning on id collisions.
    #[must_use]
    pub fn load(&self) -> Vec<Preset> {
        let mut presets = self.disk.load_all();
        for mirrored in self.mirror.load() {
            if !presets.iter().any(|p| p.id == mirrored.id) {
                presets.push(mirrored);
            }
        }
        presets
    }

    /// Block until every pending save has completed.
    pub fn flush(&self) {
        self.lane.flush();
    }

    /// Flush pending writes and remove the preset directory if empty.
    pub fn shutdown(&self) {
        self.flush();
        self.disk.remove_if_empty();
    }
}
