//! Local preset files.
//!
//! Each local preset is one JSON file under the presets directory, named
//! `<slug>-<id>.json` and containing a singleton array of preset records.
//! Legacy files holding a bare record or a multi-record array are accepted
//! on read. A file that cannot be parsed is skipped with a warning; one bad
//! file never blocks the rest of the collection.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{PresetError, Result};
use crate::preset::Preset;

/// Default preset directory under the user's data dir.
///
/// Falls back to a relative directory when the platform reports no data
/// dir (e.g., stripped-down containers).
#[must_use]
pub fn default_presets_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("plugin-presets")
        .join("presets")
}

/// File-system store for local presets.
pub struct DiskStore {
    dir: PathBuf,
}

impl DiskStore {
    /// Create a store over the given directory. The directory is created
    /// lazily on first write.
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// The directory this store reads and writes.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the given presets, one file each, and delete files belonging
    /// to presets no longer in the set.
    pub fn save_all(&self, presets: &[Preset]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let mut expected = Vec::with_capacity(presets.len());
        for preset in presets {
            let file_name = file_name_for(preset);
            let path = self.dir.join(&file_name);
            let json = serde_json::to_string_pretty(&vec![preset])?;
            fs::write(&path, json).map_err(|e| PresetError::StorageWrite {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            expected.push(file_name);
        }

        // Files for deleted or renamed presets are stale; remove them.
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name.ends_with(".json") && !expected.iter().any(|e| e == &name) {
                debug!(file = %name, "Removing stale preset file");
                let _ = fs::remove_file(entry.path());
            }
        }

        debug!(count = presets.len(), dir = %self.dir.display(), "Saved presets");
        Ok(())
    }

    /// Load every parseable preset file in the directory.
    #[must_use]
    pub fn load_all(&self) -> Vec<Preset> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            debug!(dir = %self.dir.display(), "No preset directory yet");
            return Vec::new();
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(std::result::Result::ok)
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut presets = Vec::new();
        for path in paths {
            match read_preset_file(&path) {
                Ok(mut loaded) => presets.append(&mut loaded),
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Skipping unreadable preset file");
                }
            }
        }
        debug!(count = presets.len(), "Loaded presets from disk");
        presets
    }

    /// Remove the presets directory if it holds nothing.
    pub fn remove_if_empty(&self) {
        if let Ok(mut entries) = fs::read_dir(&self.dir) {
            if entries.next().is_none() {
                debug!(dir = %self.dir.display(), "Removing empty preset directory");
                let _ = fs::remove_dir(&self.dir);
            }
        }
    }
}

fn read_preset_file(path: &Path) -> Result<Vec<Preset>> {
    let contents = fs::read_to_string(path)?;
    // Current layout is an array; early versions wrote a bare record.
    if let Ok(list) = serde_json::from_str::<Vec<Preset>>(&contents) {
        return Ok(list);
    }
    let single: Preset = serde_json::from_str(&contents)?;
    Ok(vec![single])
}

/// File name for a preset: name slug plus id for uniqueness.
fn file_name_for(preset: &Preset) -> String {
    format!("{}-{}.json", slug(&preset.name), preset.id)
}

fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    let out = out.trim_end_matches('-').to_string();
    if out.is_empty() {
        "preset".to_string()
    } else {
        out
    }
}
