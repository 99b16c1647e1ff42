//! Error types for preset operations.

use thiserror::Error;

/// Primary error type for preset operations.
#[derive(Error, Debug)]
pub enum PresetError {
    // Sharing codec errors
    #[error("Malformed preset code: {0}")]
    Decode(String),

    // Preset entity errors
    #[error("Invalid preset name '{name}': only letters, digits, space and -_.,()+ are allowed")]
    InvalidName { name: String },

    #[error("Preset not found: {name}")]
    PresetNotFound { name: String },

    // Host errors
    #[error("Failed to {action} plugin '{plugin}': {reason}")]
    PluginStartStop {
        plugin: String,
        action: &'static str,
        reason: String,
    },

    // Persistence errors
    #[error("Failed to write {path}: {reason}")]
    StorageWrite { path: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PresetError {
    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Decode(_)
                | Self::InvalidName { .. }
                | Self::PresetNotFound { .. }
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Decode(_) => Some("Re-copy the preset code and try again"),
            Self::InvalidName { .. } => Some("Rename the preset using letters, digits and -_.,()+"),
            Self::PresetNotFound { .. } => Some("Run: presets list"),
            _ => None,
        }
    }
}

/// Convenience type alias for Results using PresetError.
pub type Result<T> = std::result::Result<T, PresetError>;
