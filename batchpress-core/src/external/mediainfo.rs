//! MediaInfo integration for structural media metadata extraction.
//!
//! This module executes the mediainfo binary with JSON output and turns the
//! track list into a normalized [`VideoDescriptor`]. Any probe failure
//! (unstartable subprocess, non-zero exit, unparsable output) is fatal for
//! the file being probed; missing fields inside a track are not.

use std::path::{Path, PathBuf};
use std::process::Command;

use rayon::prelude::*;
use serde::Deserialize;

use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use crate::media::VideoDescriptor;

/// One entry of the probe's track list. Every field is optional; the track
/// type decides which of them are meaningful.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct MediaInfoTrack {
    #[serde(rename = "@type")]
    pub track_type: String,
    #[serde(rename = "Format")]
    pub format: Option<String>,
    #[serde(rename = "Duration")]
    pub duration: Option<String>,
    #[serde(rename = "OverallBitRate")]
    pub overall_bit_rate: Option<String>,
    #[serde(rename = "BitRate")]
    pub bit_rate: Option<String>,
    #[serde(rename = "Width")]
    pub width: Option<String>,
    #[serde(rename = "Height")]
    pub height: Option<String>,
    #[serde(rename = "ColorSpace")]
    pub color_space: Option<String>,
    #[serde(rename = "Language")]
    pub language: Option<String>,
    #[serde(rename = "Channels")]
    pub channels: Option<String>,
}

/// MediaInfo media container
#[derive(Debug, Clone, Deserialize)]
pub struct MediaInfoMedia {
    #[serde(default)]
    pub track: Vec<MediaInfoTrack>,
}

/// Root MediaInfo response structure
#[derive(Debug, Clone, Deserialize)]
pub struct MediaInfoResponse {
    pub media: Option<MediaInfoMedia>,
}

/// Trait for probing a media file into a descriptor.
///
/// The production implementation shells out to mediainfo; tests substitute
/// canned descriptors.
pub trait MediaProber {
    fn probe(&self, path: &Path) -> CoreResult<VideoDescriptor>;
}

/// Probe implementation backed by the mediainfo binary.
#[derive(Debug, Clone)]
pub struct MediaInfoProber {
    executable: PathBuf,
}

impl MediaInfoProber {
    pub fn new(executable: PathBuf) -> Self {
        Self { executable }
    }

    /// Runs mediainfo with JSON output and deserializes the response.
    fn get_media_info(&self, input_path: &Path) -> CoreResult<MediaInfoResponse> {
        log::debug!("Running mediainfo on: {}", input_path.display());

        let output = Command::new(&self.executable)
            .arg("--Output=JSON")
            .arg(input_path)
            .output()
            .map_err(|e| command_start_error(self.executable.display().to_string(), e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(command_failed_error(
                self.executable.display().to_string(),
                output.status,
                stderr.to_string(),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&stdout).map_err(|e| {
            CoreError::JsonParse(format!(
                "Failed to parse mediainfo JSON output for {}: {}",
                input_path.display(),
                e
            ))
        })
    }
}

impl MediaProber for MediaInfoProber {
    fn probe(&self, path: &Path) -> CoreResult<VideoDescriptor> {
        let response = self.get_media_info(path)?;
        let media = response.media.ok_or_else(|| {
            CoreError::ProbeOutput(format!(
                "mediainfo returned no media node for {}",
                path.display()
            ))
        })?;
        VideoDescriptor::from_tracks(path, &media.track)
    }
}

/// Probes a batch of files, preserving input order.
///
/// Descriptor construction has no cross-file dependency, so the fan-out runs
/// on rayon's pool. The first probe failure fails the whole batch.
pub fn probe_all<P: MediaProber + Sync>(
    prober: &P,
    paths: &[PathBuf],
) -> CoreResult<Vec<VideoDescriptor>> {
    paths
        .par_iter()
        .map(|path| prober.probe(path))
        .collect::<CoreResult<Vec<_>>>()
}
