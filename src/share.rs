//! Sharing codec: preset to copy-pasteable text blob and back.
//!
//! The wire form is a versioned JSON record, brotli-compressed, then
//! base64-encoded. Decoding tolerates fields added by newer versions
//! (unknown fields are skipped) and fields missing from older versions
//! (serde defaults), so format skew never fails outright; only genuinely
//! malformed input does.
//!
//! Identifier and selection state are intentionally not part of the
//! payload: an imported preset always gets a fresh identity.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{PresetError, Result};
use crate::preset::{fresh_id, Origin, Preset, Selection, SettingsMap};

const B64: base64::engine::GeneralPurpose = base64::engine::general_purpose::STANDARD;

/// Current payload format version.
const SHARE_VERSION: u32 = 1;

/// Decompressed payloads larger than this are rejected as malformed.
const MAX_PAYLOAD_BYTES: u64 = 8 * 1024 * 1024;

const BROTLI_BUFFER: usize = 4096;
const BROTLI_QUALITY: u32 = 5;
const BROTLI_LGWIN: u32 = 22;

fn default_version() -> u32 {
    SHARE_VERSION
}

/// The machine-portable subset of a preset.
#[derive(Debug, Serialize, Deserialize)]
struct SharePayload {
    #[serde(default = "default_version")]
    version: u32,
    name: String,
    #[serde(default)]
    enabled_plugins: BTreeMap<String, bool>,
    #[serde(default)]
    plugin_settings: SettingsMap,
}

/// Encode a preset into a compact text blob.
pub fn export(preset: &Preset) -> Result<String> {
    let payload = SharePayload {
        version: SHARE_VERSION,
        name: preset.name.clone(),
        enabled_plugins: preset.enabled_plugins.clone(),
        plugin_settings: preset.plugin_settings.clone(),
    };
    let json = serde_json::to_vec(&payload)?;

    let mut compressed = Vec::new();
    {
        let mut writer = brotli::CompressorWriter::new(
            &mut compressed,
            BROTLI_BUFFER,
            BROTLI_QUALITY,
            BROTLI_LGWIN,
        );
        writer.write_all(&json)?;
        writer.flush()?;
    }

    let blob = B64.encode(&compressed);
    debug!(
        preset = %preset.name,
        json_bytes = json.len(),
        blob_chars = blob.len(),
        "Exported preset"
    );
    Ok(blob)
}

/// Decode a text blob into a fresh preset.
///
/// The result carries a fresh identifier, `Selection::Stale` and
/// `Origin::Unclassified`; the caller decides whether to insert it into a
/// working set.
///
/// # Errors
///
/// Returns [`PresetError::Decode`] for anything that is not a valid blob:
/// bad base64, truncated or non-brotli data, malformed JSON, or an
/// oversized payload.
pub fn import(text: &str) -> Result<Preset> {
    // Clipboard content routinely picks up line breaks and padding.
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return Err(PresetError::Decode("empty input".to_string()));
    }

    let compressed = B64
        .decode(&cleaned)
        .map_err(|e| PresetError::Decode(format!("invalid base64: {e}")))?;

    let mut json = Vec::new();
    brotli::Decompressor::new(compressed.as_slice(), BROTLI_BUFFER)
        .take(MAX_PAYLOAD_BYTES + 1)
        .read_to_end(&mut json)
        .map_err(|e| PresetError::Decode(format!("decompression failed: {e}")))?;
    if json.len() as u64 > MAX_PAYLOAD_BYTES {
        return Err(PresetError::Decode("payload too large".to_string()));
    }

    let payload: SharePayload = serde_json::from_slice(&json)
        .map_err(|e| PresetError::Decode(format!("malformed record: {e}")))?;

    if payload.version > SHARE_VERSION {
        warn!(
            version = payload.version,
            supported = SHARE_VERSION,
            "Preset code from a newer format version, importing known fields"
        );
    }

    let mut preset = Preset::new(fresh_id(), payload.name)
        .with_enabled_plugins(payload.enabled_plugins)
        .with_settings(payload.plugin_settings);
    preset.selection = Selection::Stale;
    preset.origin = Origin::Unclassified;
    debug!(preset = %preset.name, "Imported preset");
    Ok(preset)
}
