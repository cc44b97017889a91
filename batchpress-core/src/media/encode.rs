// ============================================================================
// batchpress-core/src/media/encode.rs
// ============================================================================
//
// ENCODE INVOKER: Output-Tree Mirroring and Sequential Batch Encoding
//
// This module plans output paths that mirror the source tree, drives the
// encoder one file at a time, and reports per-file progress between
// invocations. Encodes are strictly sequential: the encoder is assumed to
// own the machine's CPU/GPU while it runs.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use log::{error, info, warn};

use crate::error::{CoreError, CoreResult};
use crate::external::{EncodeRequest, Encoder};
use crate::media::SampleWindow;
use crate::presets::EncodeProfile;

/// Receives per-file progress callbacks between encoder invocations.
pub trait ProgressSink {
    fn batch_started(&mut self, total: usize);
    fn file_started(&mut self, index: usize, total: usize, file_name: &str);
    fn file_finished(&mut self, index: usize, total: usize, file_name: &str);
}

/// Progress sink that forwards to the log facade. Used when no interactive
/// display is attached (tests, scripted runs).
#[derive(Debug, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn batch_started(&mut self, total: usize) {
        info!("Encoding {total} file(s)");
    }

    fn file_started(&mut self, index: usize, total: usize, file_name: &str) {
        info!("[{}/{}] Encoding: {}", index + 1, total, file_name);
    }

    fn file_finished(&mut self, index: usize, total: usize, file_name: &str) {
        info!("[{}/{}] Finished: {}", index + 1, total, file_name);
    }
}

/// One planned encoder invocation.
#[derive(Debug, Clone)]
pub struct EncodeJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub window: Option<SampleWindow>,
}

/// Statistics for one completed encode.
#[derive(Debug, Clone)]
pub struct EncodeOutcome {
    pub file_name: String,
    pub output: PathBuf,
    pub elapsed: std::time::Duration,
    pub input_size: u64,
    pub output_size: u64,
}

/// One failed encode, kept for the report when the batch continues past
/// failures.
#[derive(Debug, Clone)]
pub struct EncodeFailure {
    pub input: PathBuf,
    pub error: String,
}

/// Result of a batch: completed outcomes plus recorded failures.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub completed: Vec<EncodeOutcome>,
    pub failed: Vec<EncodeFailure>,
}

/// Plans the output path for `input`: the path mirrors the source's
/// position relative to `input_root` under `output_root`, with the
/// extension rewritten to the profile's output extension.
pub fn plan_output_path(
    input: &Path,
    input_root: &Path,
    output_root: &Path,
    output_extension: &str,
) -> CoreResult<PathBuf> {
    let relative = input.strip_prefix(input_root).map_err(|_| {
        CoreError::PathError(format!(
            "Input file {} is not under the input root {}",
            input.display(),
            input_root.display()
        ))
    })?;

    let mut output = output_root.join(relative);
    output.set_extension(output_extension.trim_start_matches('.'));
    Ok(output)
}

fn file_size(path: &Path) -> u64 {
    fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Encodes one file, creating the mirrored output directory first.
pub fn encode_file<E: Encoder>(
    encoder: &E,
    profile: &EncodeProfile,
    job: &EncodeJob,
) -> CoreResult<EncodeOutcome> {
    if let Some(parent) = job.output.parent() {
        fs::create_dir_all(parent)?;
    }

    let start = Instant::now();
    let request = EncodeRequest {
        input: job.input.clone(),
        output: job.output.clone(),
        window: job.window,
    };
    encoder.encode(profile, &request)?;

    let file_name = job
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(EncodeOutcome {
        file_name,
        output: job.output.clone(),
        elapsed: start.elapsed(),
        input_size: file_size(&job.input),
        output_size: file_size(&job.output),
    })
}

/// Runs a batch of encode jobs strictly sequentially.
///
/// Per-file failures are recorded and skipped unless `fail_fast` is set, in
/// which case the first failure aborts the batch. The interrupt flag is
/// checked between files only, so an in-flight encoder subprocess is never
/// killed mid-file.
pub fn encode_batch<E: Encoder, S: ProgressSink>(
    encoder: &E,
    profile: &EncodeProfile,
    jobs: &[EncodeJob],
    fail_fast: bool,
    interrupt: &AtomicBool,
    progress: &mut S,
) -> CoreResult<BatchOutcome> {
    let total = jobs.len();
    let mut outcome = BatchOutcome::default();
    progress.batch_started(total);

    for (index, job) in jobs.iter().enumerate() {
        if interrupt.load(Ordering::SeqCst) {
            warn!(
                "Interrupt requested, stopping before file {} of {}",
                index + 1,
                total
            );
            return Err(CoreError::Interrupted);
        }

        let file_name = job
            .input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        progress.file_started(index, total, &file_name);

        match encode_file(encoder, profile, job) {
            Ok(result) => {
                progress.file_finished(index, total, &file_name);
                outcome.completed.push(result);
            }
            Err(e) if fail_fast => {
                error!("Encode failed for {}: {}", job.input.display(), e);
                return Err(e);
            }
            Err(e) => {
                warn!(
                    "Encode failed for {}, skipping: {}",
                    job.input.display(),
                    e
                );
                outcome.failed.push(EncodeFailure {
                    input: job.input.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::process::ExitStatus;

    struct FakeEncoder {
        fail_on: Option<String>,
        calls: RefCell<Vec<EncodeRequest>>,
    }

    impl FakeEncoder {
        fn new(fail_on: Option<&str>) -> Self {
            Self {
                fail_on: fail_on.map(str::to_string),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Encoder for FakeEncoder {
        fn encode(&self, _profile: &EncodeProfile, request: &EncodeRequest) -> CoreResult<()> {
            self.calls.borrow_mut().push(request.clone());
            if let Some(needle) = &self.fail_on {
                if request.input.to_string_lossy().contains(needle.as_str()) {
                    #[cfg(unix)]
                    let status = {
                        use std::os::unix::process::ExitStatusExt;
                        ExitStatus::from_raw(256)
                    };
                    #[cfg(not(unix))]
                    let status = {
                        use std::os::windows::process::ExitStatusExt;
                        ExitStatus::from_raw(1)
                    };
                    return Err(crate::error::command_failed_error(
                        "fake-encoder",
                        status,
                        "boom".to_string(),
                    ));
                }
            }
            std::fs::write(&request.output, b"encoded").unwrap();
            Ok(())
        }
    }

    struct NullProgress;

    impl ProgressSink for NullProgress {
        fn batch_started(&mut self, _total: usize) {}
        fn file_started(&mut self, _index: usize, _total: usize, _file_name: &str) {}
        fn file_finished(&mut self, _index: usize, _total: usize, _file_name: &str) {}
    }

    fn profile() -> EncodeProfile {
        EncodeProfile {
            name: "Test".to_string(),
            output_extension: ".mkv".to_string(),
            preset_file: PathBuf::from("preset.json"),
        }
    }

    fn job(dir: &Path, name: &str) -> EncodeJob {
        let input = dir.join("in").join(name);
        std::fs::create_dir_all(input.parent().unwrap()).unwrap();
        std::fs::write(&input, b"source").unwrap();
        EncodeJob {
            output: dir.join("out").join(name),
            input,
            window: None,
        }
    }

    #[test]
    fn test_plan_output_path_mirrors_tree_and_extension() {
        let output = plan_output_path(
            Path::new("/in/season1/e01.mp4"),
            Path::new("/in"),
            Path::new("/out"),
            ".mkv",
        )
        .unwrap();
        assert_eq!(output, PathBuf::from("/out/season1/e01.mkv"));
    }

    #[test]
    fn test_plan_output_path_rejects_foreign_input() {
        assert!(plan_output_path(
            Path::new("/elsewhere/e01.mp4"),
            Path::new("/in"),
            Path::new("/out"),
            ".mkv",
        )
        .is_err());
    }

    #[test]
    fn test_encode_batch_continues_past_failure() {
        let dir = tempfile::tempdir().unwrap();
        let jobs = vec![
            job(dir.path(), "good1.mkv"),
            job(dir.path(), "bad.mkv"),
            job(dir.path(), "good2.mkv"),
        ];
        let encoder = FakeEncoder::new(Some("bad"));
        let interrupt = AtomicBool::new(false);

        let outcome = encode_batch(
            &encoder,
            &profile(),
            &jobs,
            false,
            &interrupt,
            &mut NullProgress,
        )
        .unwrap();

        assert_eq!(outcome.completed.len(), 2);
        assert_eq!(outcome.failed.len(), 1);
        assert!(outcome.failed[0].input.ends_with("bad.mkv"));
        // All three files were attempted
        assert_eq!(encoder.calls.borrow().len(), 3);
    }

    #[test]
    fn test_encode_batch_fail_fast_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let jobs = vec![
            job(dir.path(), "bad.mkv"),
            job(dir.path(), "never-reached.mkv"),
        ];
        let encoder = FakeEncoder::new(Some("bad"));
        let interrupt = AtomicBool::new(false);

        let result = encode_batch(
            &encoder,
            &profile(),
            &jobs,
            true,
            &interrupt,
            &mut NullProgress,
        );

        assert!(matches!(result, Err(CoreError::CommandFailed(..))));
        assert_eq!(encoder.calls.borrow().len(), 1);
    }

    #[test]
    fn test_encode_batch_interrupt_stops_before_next_file() {
        let dir = tempfile::tempdir().unwrap();
        let jobs = vec![job(dir.path(), "a.mkv")];
        let encoder = FakeEncoder::new(None);
        let interrupt = AtomicBool::new(true);

        let result = encode_batch(
            &encoder,
            &profile(),
            &jobs,
            false,
            &interrupt,
            &mut NullProgress,
        );

        assert!(matches!(result, Err(CoreError::Interrupted)));
        assert!(encoder.calls.borrow().is_empty());
    }
}
