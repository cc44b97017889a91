//! Normalized per-file media descriptor.
//!
//! A [`VideoDescriptor`] is built fresh from every probe invocation and
//! never mutated afterwards. The base file name is the only join key used
//! when reconciling source and target scans.

use std::path::{Path, PathBuf};

use crate::external::mediainfo::MediaInfoTrack;
use crate::error::CoreResult;
use crate::format::format_bit_rate;

/// Sentinel for an audio-track field the probe did not report.
pub const UNDEFINED_FIELD: &str = "UND";

/// Delimiter used when aggregating per-audio-track values.
const AUDIO_JOIN: &str = ", ";

/// Structural summary of one media file, as reported by the probe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoDescriptor {
    /// Base file name without extension; the join key across source/target
    /// scans. The extension is excluded so a source still matches its
    /// re-containered output. Two files that differ only by directory or
    /// extension share a key (see `comparison::merge`).
    pub file_name: String,

    /// Full path the probe was invoked with
    pub full_path: PathBuf,

    /// Container format identifier from the General track
    pub container_format: String,

    /// Video codec identifier from the Video track
    pub video_codec: String,

    /// Frame width in pixels (0 when the probe omits it)
    pub width: u32,

    /// Frame height in pixels (0 when the probe omits it)
    pub height: u32,

    /// Color space identifier, when the probe reports one
    pub color_space: Option<String>,

    /// Explicit video-stream bitrate in bits/sec, when reported
    pub video_bit_rate_raw: Option<u64>,

    /// Overall container bitrate in bits/sec, when reported
    pub total_bit_rate_raw: Option<u64>,

    /// Whole seconds, floored from the probe's decimal value; the Video
    /// track's duration wins over the General track's
    pub duration_seconds: u64,

    /// Aggregated audio codec names, one entry per audio track
    pub audio_codecs: String,

    /// Aggregated audio track languages
    pub audio_languages: String,

    /// Aggregated audio channel counts
    pub audio_channels: String,

    /// Human-readable overall bitrate; empty when the raw value is absent
    pub total_bit_rate: String,

    /// Human-readable video bitrate; empty when the raw value is absent
    pub video_bit_rate: String,
}

fn parse_u64(value: Option<&str>) -> Option<u64> {
    value.and_then(|v| v.trim().parse::<u64>().ok())
}

fn parse_u32(value: Option<&str>) -> u32 {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(0)
}

/// Floor of the probe's decimal seconds value.
fn parse_duration_seconds(value: Option<&str>) -> Option<u64> {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(|secs| secs.floor() as u64)
}

/// Joins one field's values across all audio tracks, substituting `"UND"`
/// per track when the field is absent.
fn join_audio_values(values: Vec<Option<&str>>) -> String {
    values
        .into_iter()
        .map(|value| value.unwrap_or(UNDEFINED_FIELD))
        .collect::<Vec<_>>()
        .join(AUDIO_JOIN)
}

impl VideoDescriptor {
    /// Builds a descriptor from the probe's track list.
    ///
    /// At most one General and one Video track are consulted (the first of
    /// each); all Audio tracks contribute to the aggregate fields. Missing
    /// fields degrade to defaults, they never fail the probe.
    pub fn from_tracks(path: &Path, tracks: &[MediaInfoTrack]) -> CoreResult<Self> {
        let general = tracks.iter().find(|t| t.track_type == "General");
        let video = tracks.iter().find(|t| t.track_type == "Video");
        let audio: Vec<&MediaInfoTrack> =
            tracks.iter().filter(|t| t.track_type == "Audio").collect();

        if video.is_none() {
            log::warn!("No video track reported for {}", path.display());
        }

        let duration_seconds = parse_duration_seconds(
            video.and_then(|t| t.duration.as_deref()),
        )
        .or_else(|| parse_duration_seconds(general.and_then(|t| t.duration.as_deref())))
        .unwrap_or(0);

        let video_bit_rate_raw = parse_u64(video.and_then(|t| t.bit_rate.as_deref()));
        let total_bit_rate_raw =
            parse_u64(general.and_then(|t| t.overall_bit_rate.as_deref()));

        let file_name = path
            .file_stem()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            file_name,
            full_path: path.to_path_buf(),
            container_format: general
                .and_then(|t| t.format.clone())
                .unwrap_or_default(),
            video_codec: video.and_then(|t| t.format.clone()).unwrap_or_default(),
            width: parse_u32(video.and_then(|t| t.width.as_deref())),
            height: parse_u32(video.and_then(|t| t.height.as_deref())),
            color_space: video.and_then(|t| t.color_space.clone()),
            total_bit_rate: format_bit_rate(total_bit_rate_raw),
            video_bit_rate: format_bit_rate(video_bit_rate_raw),
            video_bit_rate_raw,
            total_bit_rate_raw,
            duration_seconds,
            audio_codecs: join_audio_values(
                audio.iter().map(|t| t.format.as_deref()).collect(),
            ),
            audio_languages: join_audio_values(
                audio.iter().map(|t| t.language.as_deref()).collect(),
            ),
            audio_channels: join_audio_values(
                audio.iter().map(|t| t.channels.as_deref()).collect(),
            ),
        })
    }
}
