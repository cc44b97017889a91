// ============================================================================
// batchpress-core/src/config.rs
// ============================================================================
//
// CONFIGURATION: Core Configuration Structure
//
// This module defines the configuration structure used throughout the
// batchpress-core library. All paths, tool locations, and behavior flags are
// explicit fields; the core never consults ambient environment state.
//
// KEY COMPONENTS:
// - CoreConfig: Main configuration structure for the library
// - Default tool name constants
//
// USAGE:
// Instances of CoreConfig are created by consumers of the library (like
// batchpress-cli) and passed to run_workflow to control processing behavior.

use std::path::PathBuf;

use crate::error::{CoreError, CoreResult};

/// Default executable name for the encoder, resolved via PATH.
pub const DEFAULT_ENCODER_BIN: &str = "HandBrakeCLI";

/// Default executable name for the metadata probe, resolved via PATH.
pub const DEFAULT_PROBE_BIN: &str = "mediainfo";

/// Default clip length (seconds) for test encodes when the caller enables
/// sampling without giving a length.
pub const DEFAULT_TEST_ENCODE_SECONDS: u64 = 120;

/// Main configuration structure for the batchpress-core library.
///
/// Holds all parameters required for a run: directory layout, external tool
/// locations, the preset file handle, and the workflow behavior flags.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    // ---- Path Configuration ----
    /// Directory containing the source media tree
    pub input_dir: PathBuf,

    /// Directory where the mirrored output tree is built
    pub output_dir: PathBuf,

    /// Directory for clipped sample encodes; cleared after every approval
    /// round
    pub sample_dir: PathBuf,

    /// Directory for log files
    pub log_dir: PathBuf,

    // ---- External Tools ----
    /// Encoder executable (full path or bare name resolved via PATH)
    pub encoder_bin: PathBuf,

    /// Metadata probe executable (full path or bare name resolved via PATH)
    pub probe_bin: PathBuf,

    /// Preset file handed through to the encoder; only the profile names and
    /// output container formats are read from it
    pub preset_file: PathBuf,

    // ---- Workflow Options ----
    /// Clip length for test encodes; `None` skips the sampling loop entirely
    /// and the workflow starts in the commit pass
    pub test_encode_seconds: Option<u64>,

    /// Copy non-media files byte-for-byte into the mirrored output tree
    pub copy_non_media: bool,

    /// Abort the whole batch on the first encode failure instead of skipping
    /// the file and continuing
    pub fail_fast: bool,
}

impl CoreConfig {
    /// Creates a configuration with default tool names and behavior flags.
    /// The sample directory defaults to `<output_dir>/samples`.
    pub fn new(input_dir: PathBuf, output_dir: PathBuf, preset_file: PathBuf) -> Self {
        let sample_dir = output_dir.join("samples");
        let log_dir = output_dir.join("logs");
        Self {
            input_dir,
            output_dir,
            sample_dir,
            log_dir,
            encoder_bin: PathBuf::from(DEFAULT_ENCODER_BIN),
            probe_bin: PathBuf::from(DEFAULT_PROBE_BIN),
            preset_file,
            test_encode_seconds: None,
            copy_non_media: false,
            fail_fast: false,
        }
    }

    /// Validates the configuration before a run.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.input_dir.is_dir() {
            return Err(CoreError::PathError(format!(
                "Input directory does not exist: {}",
                self.input_dir.display()
            )));
        }
        if !self.preset_file.is_file() {
            return Err(CoreError::PathError(format!(
                "Preset file does not exist: {}",
                self.preset_file.display()
            )));
        }
        if self.test_encode_seconds == Some(0) {
            return Err(CoreError::PathError(
                "Test encode length must be at least one second".to_string(),
            ));
        }
        Ok(())
    }
}
