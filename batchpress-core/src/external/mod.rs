// ============================================================================
// batchpress-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with External CLI Tools
//
// This module encapsulates interactions with the two external command-line
// tools batchpress drives: the encoder (HandBrakeCLI) and the metadata probe
// (mediainfo). Both are invoked with structured argument vectors, never
// through a shell.
//
// KEY COMPONENTS:
// - Traits for external tool interactions (MediaProber, Encoder)
// - Concrete implementations spawning the real binaries
// - Dependency checking
//
// DESIGN PHILOSOPHY:
// This module follows the dependency injection pattern, allowing consumers
// to provide their own implementations of the traits for testing or
// specialized behavior.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{CoreError, CoreResult};

/// Contains the metadata probe trait and the mediainfo-backed implementation
pub mod mediainfo;

/// Contains the encoder trait and the HandBrakeCLI-backed implementation
pub mod handbrake;

pub use handbrake::{Encoder, EncodeRequest, HandBrakeEncoder};
pub use mediainfo::{MediaInfoProber, MediaProber};

/// Checks that a required external command is present and runnable.
///
/// Runs the command with a `--version` argument, discarding output. Used at
/// startup so a missing tool fails the run before any file is touched.
///
/// # Returns
///
/// * `Ok(())` - The command started (exit status is not inspected)
/// * `Err(CoreError::CommandStart)` - The command is missing or unrunnable
pub fn check_dependency(executable: &Path) -> CoreResult<()> {
    let result = Command::new(executable)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", executable.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", executable.display());
            Err(CoreError::CommandStart(
                executable.display().to_string(),
                e,
            ))
        }
        Err(e) => {
            log::error!(
                "Failed to start dependency check command '{}': {}",
                executable.display(),
                e
            );
            Err(CoreError::CommandStart(
                executable.display().to_string(),
                e,
            ))
        }
    }
}
