//! Static exclusion rules for capture and apply.
//!
//! Certain plugins are reserved for the preset system itself or integrate
//! with external accounts, and certain setting keys carry credentials or
//! free-text data that must never leave the machine inside a preset.

/// Exclusion rules applied by the snapshot and apply engines.
///
/// Immutable after construction; tests substitute smaller lists.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    plugins: Vec<String>,
    key_fragments: Vec<String>,
}

impl IgnoreRules {
    /// Build rules from explicit lists.
    ///
    /// Key fragments match case-insensitively anywhere in a setting key.
    #[must_use]
    pub fn new<P, K>(plugins: P, key_fragments: K) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        K: IntoIterator,
        K::Item: Into<String>,
    {
        Self {
            plugins: plugins.into_iter().map(Into::into).collect(),
            key_fragments: key_fragments
                .into_iter()
                .map(|f| f.into().to_lowercase())
                .collect(),
        }
    }

    /// The standard host rule set: the preset system's own plugin, the
    /// host configuration panel, and integrations whose state is tied to
    /// external accounts or sessions, plus credential-like key fragments.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(
            [
                "Plugin Presets",
                "Configuration",
                "Xtea",
                "Twitch",
                "Notes",
                "Discord",
            ],
            ["token", "oauth", "username", "password", "notesdata"],
        )
    }

    /// Whether the named plugin is excluded from capture and apply.
    #[must_use]
    pub fn is_ignored_plugin(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p == name)
    }

    /// Whether a setting key is excluded from capture.
    #[must_use]
    pub fn is_ignored_key(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.key_fragments.iter().any(|f| key.contains(f))
    }
}
