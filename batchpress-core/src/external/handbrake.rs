//! HandBrakeCLI invocation.
//!
//! Builds structured argument vectors for full-length and clipped encodes
//! and runs the encoder as a blocking subprocess. Clip bounds follow the
//! encoder's `--start-at seconds:N --stop-at seconds:M` contract, where the
//! stop value is a duration relative to the start, not an absolute
//! timestamp.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::{CoreResult, command_failed_error, command_start_error};
use crate::media::SampleWindow;
use crate::presets::EncodeProfile;

/// One encoder invocation: input, output, and an optional clip window.
#[derive(Debug, Clone)]
pub struct EncodeRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub window: Option<SampleWindow>,
}

/// Trait for running one encode to completion.
///
/// The production implementation spawns HandBrakeCLI; tests substitute an
/// implementation that records requests and fabricates output files.
pub trait Encoder {
    fn encode(&self, profile: &EncodeProfile, request: &EncodeRequest) -> CoreResult<()>;
}

/// Encoder implementation backed by the HandBrakeCLI binary.
#[derive(Debug, Clone)]
pub struct HandBrakeEncoder {
    executable: PathBuf,
}

impl HandBrakeEncoder {
    pub fn new(executable: PathBuf) -> Self {
        Self { executable }
    }
}

/// Builds the argument vector for one invocation. Kept separate from the
/// spawn so the exact command line is unit-testable.
pub fn build_args(profile: &EncodeProfile, request: &EncodeRequest) -> Vec<String> {
    let mut args = vec![
        "--preset-import-file".to_string(),
        profile.preset_file.to_string_lossy().into_owned(),
        "--preset".to_string(),
        profile.name.clone(),
        "-i".to_string(),
        request.input.to_string_lossy().into_owned(),
        "-o".to_string(),
        request.output.to_string_lossy().into_owned(),
    ];

    if let Some(window) = &request.window {
        args.push("--start-at".to_string());
        args.push(format!("seconds:{}", window.start_seconds));
        args.push("--stop-at".to_string());
        args.push(format!("seconds:{}", window.stop_seconds));
    }

    args
}

impl Encoder for HandBrakeEncoder {
    fn encode(&self, profile: &EncodeProfile, request: &EncodeRequest) -> CoreResult<()> {
        let args = build_args(profile, request);
        log::debug!(
            "Running {} {}",
            self.executable.display(),
            args.join(" ")
        );

        let output = Command::new(&self.executable)
            .args(&args)
            .stdout(Stdio::null())
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

        Ok(())
    }
}
