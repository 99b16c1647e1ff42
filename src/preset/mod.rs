//! Preset data model.
//!
//! The [`Preset`] record captures which plugins were enabled and the
//! key-value settings of each plugin's configuration group at a point in
//! time. [`IgnoreRules`] describes what never enters a capture.

mod ignore;
mod schema;

pub use ignore::IgnoreRules;
pub use schema::{
    fresh_id, is_valid_name, sort_by_name, Origin, Preset, PresetId, Selection, SettingsMap,
    DEFAULT_PRESET_NAME,
};
