//! Preset file loading.
//!
//! The encoder's preset file is treated as an opaque handle except for two
//! fields read per profile: the profile name and the output container
//! format. Container formats arrive as `av_`-prefixed identifiers
//! (`av_mkv`, `av_mp4`); the output extension is derived by stripping that
//! prefix and prepending a dot.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

/// Prefix on the preset file's container format identifiers.
const FORMAT_PREFIX: &str = "av_";

/// Fallback container when a profile omits its output format.
const DEFAULT_EXTENSION: &str = ".mkv";

/// A named encoder profile selected from the preset file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeProfile {
    /// Profile name as it appears in the preset file
    pub name: String,

    /// Output container extension including the leading dot (e.g. ".mkv")
    pub output_extension: String,

    /// The preset file this profile came from, passed through to the encoder
    pub preset_file: PathBuf,
}

#[derive(Debug, Deserialize)]
struct PresetFile {
    #[serde(rename = "PresetList")]
    preset_list: Vec<PresetEntry>,
}

#[derive(Debug, Deserialize)]
struct PresetEntry {
    #[serde(rename = "PresetName")]
    preset_name: String,

    #[serde(rename = "FileFormat")]
    file_format: Option<String>,
}

/// Derives the output extension from a container format identifier by
/// stripping the `av_` prefix and prepending a dot.
fn extension_for_format(file_format: Option<&str>) -> String {
    match file_format {
        Some(format) => {
            let container = format.strip_prefix(FORMAT_PREFIX).unwrap_or(format);
            format!(".{container}")
        }
        None => {
            log::debug!("Preset has no FileFormat, defaulting to {DEFAULT_EXTENSION}");
            DEFAULT_EXTENSION.to_string()
        }
    }
}

/// Loads the named profiles from a preset file.
///
/// # Returns
///
/// * `Ok(Vec<EncodeProfile>)` - One profile per preset entry, file order
/// * `Err(CoreError::PresetParse)` - Unreadable file, invalid JSON, or an
///   empty preset list
pub fn load_profiles(preset_file: &Path) -> CoreResult<Vec<EncodeProfile>> {
    let contents = fs::read_to_string(preset_file).map_err(|e| {
        CoreError::PresetParse(format!(
            "Failed to read preset file {}: {}",
            preset_file.display(),
            e
        ))
    })?;

    let parsed: PresetFile = serde_json::from_str(&contents).map_err(|e| {
        CoreError::PresetParse(format!(
            "Failed to parse preset file {}: {}",
            preset_file.display(),
            e
        ))
    })?;

    if parsed.preset_list.is_empty() {
        return Err(CoreError::PresetParse(format!(
            "Preset file {} contains no presets",
            preset_file.display()
        )));
    }

    Ok(parsed
        .preset_list
        .into_iter()
        .map(|entry| EncodeProfile {
            output_extension: extension_for_format(entry.file_format.as_deref()),
            name: entry.preset_name,
            preset_file: preset_file.to_path_buf(),
        })
        .collect())
}
