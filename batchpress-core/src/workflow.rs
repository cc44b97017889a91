// ============================================================================
// batchpress-core/src/workflow.rs
// ============================================================================
//
// TEST-APPROVE-COMMIT LOOP: Main Workflow Orchestration
//
// This module houses the decision loop tying the rest of the library
// together: sample every source file with a clipped test encode, present
// the source/sample comparison for approval, loop over profile selection on
// rejection, and commit to the full-tree encode once approved.
//
// WORKFLOW:
// 1. Discover and probe every source file
// 2. Sampling (only when a test-encode length is configured):
//    a. Compute each file's sample window
//    b. Run clipped encodes into the sample directory
//    c. Probe the clipped outputs and reconcile against sources
// 3. AwaitingApproval: hand the comparison to the interaction handler
//    - Approve: clear the sample directory, move to Committing
//    - Reject: clear the sample directory, re-select a profile, re-sample
// 4. Committing: full-length encode of every media file, mirroring the
//    source tree; optionally copy non-media files; probe outputs and
//    reconcile for the final report
// 5. Done: exactly one commit pass, never revisited

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use log::{debug, info};

use crate::config::CoreConfig;
use crate::discovery::{find_media_files, is_media_file, walk_all_files};
use crate::error::{CoreError, CoreResult};
use crate::external::Encoder;
use crate::external::mediainfo::{MediaProber, probe_all};
use crate::media::{
    BatchOutcome, ComparisonRecord, EncodeFailure, EncodeJob, EncodeOutcome, ProgressSink,
    SampleWindow, VideoDescriptor, encode_batch, merge, plan_output_path,
};
use crate::presets::EncodeProfile;

/// The workflow's control states. `Committing` and `Done` are entered at
/// most once; `Sampling` and `AwaitingApproval` alternate until approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Sampling,
    AwaitingApproval,
    Committing,
    Done,
}

/// The reviewer's decision on a sample round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approve,
    Reject,
}

/// Human (or scripted) decision points in the workflow.
///
/// The CLI implements this against the terminal; tests drive the loop with
/// scripted responses.
pub trait Interaction {
    /// Present one sampling round's comparison records and ask for a
    /// verdict on the profile that produced them.
    fn review_samples(
        &mut self,
        profile: &EncodeProfile,
        records: &[ComparisonRecord],
    ) -> CoreResult<Verdict>;

    /// Ask for a replacement profile after a rejection. Returns an index
    /// into the profile list.
    fn select_profile(&mut self, profiles: &[EncodeProfile]) -> CoreResult<usize>;
}

/// Final result of a workflow run, consumed by the display layer.
#[derive(Debug)]
pub struct WorkflowReport {
    /// Source/target comparison for everything the commit pass produced
    pub records: Vec<ComparisonRecord>,

    /// Per-file statistics for completed encodes
    pub completed: Vec<EncodeOutcome>,

    /// Encode failures skipped over (empty when `fail_fast` is set)
    pub failed: Vec<EncodeFailure>,

    /// The profile the commit pass ran with
    pub profile: EncodeProfile,
}

/// Removes and forgets the sample directory. Missing directory is fine.
fn clear_sample_dir(sample_dir: &PathBuf) -> CoreResult<()> {
    match fs::remove_dir_all(sample_dir) {
        Ok(()) => {
            debug!("Cleared sample directory {}", sample_dir.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Builds the clipped sample jobs for one sampling round.
fn plan_sample_jobs(
    sources: &[VideoDescriptor],
    profile: &EncodeProfile,
    sample_dir: &PathBuf,
    sample_seconds: u64,
) -> Vec<EncodeJob> {
    sources
        .iter()
        .map(|source| {
            let window = SampleWindow::compute(source.duration_seconds, sample_seconds);
            let mut output = sample_dir.join(&source.file_name);
            output.set_extension(profile.output_extension.trim_start_matches('.'));
            EncodeJob {
                input: source.full_path.clone(),
                output,
                window: Some(window),
            }
        })
        .collect()
}

/// Runs one encode batch and probes whatever it produced, reconciled
/// against the source descriptors.
fn encode_and_reconcile<P: MediaProber + Sync, E: Encoder, S: ProgressSink>(
    prober: &P,
    encoder: &E,
    profile: &EncodeProfile,
    sources: &[VideoDescriptor],
    jobs: &[EncodeJob],
    config: &CoreConfig,
    interrupt: &AtomicBool,
    progress: &mut S,
) -> CoreResult<(BatchOutcome, Vec<ComparisonRecord>)> {
    let batch = encode_batch(
        encoder,
        profile,
        jobs,
        config.fail_fast,
        interrupt,
        progress,
    )?;

    let produced: Vec<PathBuf> = batch
        .completed
        .iter()
        .map(|outcome| outcome.output.clone())
        .collect();
    let targets = probe_all(prober, &produced)?;
    let records = merge(sources, &targets);
    Ok((batch, records))
}

/// Mirrors non-media files into the output tree byte-for-byte.
fn copy_non_media_files(config: &CoreConfig, all_files: &[PathBuf]) -> CoreResult<usize> {
    let mut copied = 0;
    for path in all_files.iter().filter(|p| !is_media_file(p)) {
        let relative = path.strip_prefix(&config.input_dir).map_err(|_| {
            CoreError::PathError(format!(
                "File {} is not under the input root {}",
                path.display(),
                config.input_dir.display()
            ))
        })?;
        let destination = config.output_dir.join(relative);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(path, &destination)?;
        copied += 1;
    }
    Ok(copied)
}

/// Runs the complete test-approve-commit workflow.
///
/// With `test_encode_seconds` configured the machine starts in `Sampling`
/// and loops through approval rounds; otherwise it starts directly in
/// `Committing`. There is exactly one commit pass.
#[allow(clippy::too_many_arguments)]
pub fn run_workflow<P, E, I, S>(
    prober: &P,
    encoder: &E,
    interaction: &mut I,
    progress: &mut S,
    config: &CoreConfig,
    profiles: &[EncodeProfile],
    initial_profile: usize,
    interrupt: &AtomicBool,
) -> CoreResult<WorkflowReport>
where
    P: MediaProber + Sync,
    E: Encoder,
    I: Interaction,
    S: ProgressSink,
{
    let mut profile = profiles
        .get(initial_profile)
        .cloned()
        .ok_or_else(|| {
            CoreError::SelectionInput(format!(
                "Profile index {} out of range ({} available)",
                initial_profile,
                profiles.len()
            ))
        })?;

    let files = find_media_files(&config.input_dir)?;
    info!("Found {} media file(s) to process", files.len());
    let sources = probe_all(prober, &files)?;

    let mut state = if config.test_encode_seconds.is_some() {
        WorkflowState::Sampling
    } else {
        WorkflowState::Committing
    };
    let mut sample_records: Vec<ComparisonRecord> = Vec::new();
    let mut report: Option<WorkflowReport> = None;

    loop {
        match state {
            WorkflowState::Sampling => {
                let sample_seconds = config
                    .test_encode_seconds
                    .unwrap_or(crate::config::DEFAULT_TEST_ENCODE_SECONDS);
                info!(
                    "Sampling {} file(s) with profile '{}' ({}s clips)",
                    sources.len(),
                    profile.name,
                    sample_seconds
                );
                fs::create_dir_all(&config.sample_dir)?;

                let jobs =
                    plan_sample_jobs(&sources, &profile, &config.sample_dir, sample_seconds);
                let (_, records) = encode_and_reconcile(
                    prober, encoder, &profile, &sources, &jobs, config, interrupt, progress,
                )?;
                sample_records = records;
                state = WorkflowState::AwaitingApproval;
            }

            WorkflowState::AwaitingApproval => {
                match interaction.review_samples(&profile, &sample_records)? {
                    Verdict::Approve => {
                        info!("Sample approved with profile '{}'", profile.name);
                        clear_sample_dir(&config.sample_dir)?;
                        state = WorkflowState::Committing;
                    }
                    Verdict::Reject => {
                        info!("Sample rejected, selecting a different profile");
                        clear_sample_dir(&config.sample_dir)?;
                        let index = interaction.select_profile(profiles)?;
                        profile = profiles.get(index).cloned().ok_or_else(|| {
                            CoreError::SelectionInput(format!(
                                "Profile index {} out of range ({} available)",
                                index,
                                profiles.len()
                            ))
                        })?;
                        state = WorkflowState::Sampling;
                    }
                }
            }

            WorkflowState::Committing => {
                info!("Committing full encode with profile '{}'", profile.name);
                let all_files = walk_all_files(&config.input_dir)?;

                let jobs: Vec<EncodeJob> = all_files
                    .iter()
                    .filter(|path| is_media_file(path))
                    .map(|path| {
                        Ok(EncodeJob {
                            input: path.clone(),
                            output: plan_output_path(
                                path,
                                &config.input_dir,
                                &config.output_dir,
                                &profile.output_extension,
                            )?,
                            window: None,
                        })
                    })
                    .collect::<CoreResult<_>>()?;

                let (batch, records) = encode_and_reconcile(
                    prober, encoder, &profile, &sources, &jobs, config, interrupt, progress,
                )?;

                if config.copy_non_media {
                    let copied = copy_non_media_files(config, &all_files)?;
                    info!("Copied {copied} non-media file(s)");
                }

                report = Some(WorkflowReport {
                    records,
                    completed: batch.completed,
                    failed: batch.failed,
                    profile: profile.clone(),
                });
                state = WorkflowState::Done;
            }

            WorkflowState::Done => {
                // report is always set by the commit pass
                return report.ok_or_else(|| {
                    CoreError::OperationFailed(
                        "Workflow reached Done without a commit pass".to_string(),
                    )
                });
            }
        }
    }
}
