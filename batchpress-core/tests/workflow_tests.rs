//! End-to-end workflow tests with scripted interaction and stubbed
//! external tools. No real encoder or probe binaries are involved.

use std::collections::VecDeque;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;

use batchpress_core::external::{EncodeRequest, Encoder};
use batchpress_core::external::mediainfo::MediaProber;
use batchpress_core::media::{ComparisonRecord, ProgressSink, SampleWindow, VideoDescriptor};
use batchpress_core::presets::EncodeProfile;
use batchpress_core::workflow::{Interaction, Verdict, run_workflow};
use batchpress_core::{CoreConfig, CoreError, CoreResult};
use tempfile::{TempDir, tempdir};

/// Probe stub: sources (paths under the input root) report a fixed duration
/// and bitrate; everything else is treated as encoder output.
struct StubProber {
    source_root: PathBuf,
    source_duration: u64,
    source_bitrate: u64,
    target_bitrate: u64,
    probed: Mutex<Vec<PathBuf>>,
}

impl StubProber {
    fn new(source_root: &Path) -> Self {
        Self {
            source_root: source_root.to_path_buf(),
            source_duration: 600,
            source_bitrate: 10_000_000,
            target_bitrate: 7_500_000,
            probed: Mutex::new(Vec::new()),
        }
    }
}

impl MediaProber for StubProber {
    fn probe(&self, path: &Path) -> CoreResult<VideoDescriptor> {
        self.probed.lock().unwrap().push(path.to_path_buf());
        let is_source = path.starts_with(&self.source_root);
        Ok(VideoDescriptor {
            file_name: path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            full_path: path.to_path_buf(),
            container_format: "Matroska".to_string(),
            video_codec: if is_source { "AVC" } else { "AV1" }.to_string(),
            duration_seconds: if is_source { self.source_duration } else { 120 },
            total_bit_rate_raw: Some(if is_source {
                self.source_bitrate
            } else {
                self.target_bitrate
            }),
            ..Default::default()
        })
    }
}

/// Encoder stub: records every request and fabricates the output file.
#[derive(Default)]
struct RecordingEncoder {
    calls: Mutex<Vec<(String, EncodeRequest)>>,
}

impl Encoder for RecordingEncoder {
    fn encode(&self, profile: &EncodeProfile, request: &EncodeRequest) -> CoreResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push((profile.name.clone(), request.clone()));
        fs::write(&request.output, b"encoded").unwrap();
        Ok(())
    }
}

impl RecordingEncoder {
    fn calls(&self) -> Vec<(String, EncodeRequest)> {
        self.calls.lock().unwrap().clone()
    }
}

/// Interaction stub replaying canned verdicts and profile selections.
#[derive(Default)]
struct ScriptedInteraction {
    verdicts: VecDeque<Verdict>,
    selections: VecDeque<usize>,
    reviewed: Vec<(String, usize)>,
    last_records: Vec<ComparisonRecord>,
}

impl ScriptedInteraction {
    fn new(verdicts: &[Verdict], selections: &[usize]) -> Self {
        Self {
            verdicts: verdicts.iter().copied().collect(),
            selections: selections.iter().copied().collect(),
            ..Default::default()
        }
    }
}

impl Interaction for ScriptedInteraction {
    fn review_samples(
        &mut self,
        profile: &EncodeProfile,
        records: &[ComparisonRecord],
    ) -> CoreResult<Verdict> {
        self.reviewed.push((profile.name.clone(), records.len()));
        self.last_records = records.to_vec();
        self.verdicts
            .pop_front()
            .ok_or_else(|| CoreError::SelectionInput("no scripted verdict left".to_string()))
    }

    fn select_profile(&mut self, _profiles: &[EncodeProfile]) -> CoreResult<usize> {
        self.selections
            .pop_front()
            .ok_or_else(|| CoreError::SelectionInput("no scripted selection left".to_string()))
    }
}

struct NullProgress;

impl ProgressSink for NullProgress {
    fn batch_started(&mut self, _total: usize) {}
    fn file_started(&mut self, _index: usize, _total: usize, _file_name: &str) {}
    fn file_finished(&mut self, _index: usize, _total: usize, _file_name: &str) {}
}

fn profile(name: &str) -> EncodeProfile {
    EncodeProfile {
        name: name.to_string(),
        output_extension: ".mkv".to_string(),
        preset_file: PathBuf::from("preset.json"),
    }
}

/// A source tree with one media file and a config pointing at it.
fn setup(test_encode_seconds: Option<u64>) -> (TempDir, CoreConfig) {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in");
    fs::create_dir_all(&input).unwrap();
    File::create(input.join("movie.mkv")).unwrap();

    let preset = dir.path().join("preset.json");
    File::create(&preset).unwrap();

    let mut config = CoreConfig::new(input, dir.path().join("out"), preset);
    config.test_encode_seconds = test_encode_seconds;
    (dir, config)
}

#[test]
fn test_sampling_round_then_commit_on_approval() {
    let (_dir, config) = setup(Some(120));
    let prober = StubProber::new(&config.input_dir);
    let encoder = RecordingEncoder::default();
    let mut interaction = ScriptedInteraction::new(&[Verdict::Approve], &[]);
    let interrupt = AtomicBool::new(false);

    let report = run_workflow(
        &prober,
        &encoder,
        &mut interaction,
        &mut NullProgress,
        &config,
        &[profile("AV1 MKV")],
        0,
        &interrupt,
    )
    .unwrap();

    let calls = encoder.calls();
    assert_eq!(calls.len(), 2);

    // First invocation: the clipped sample, centered on the midpoint
    let (_, sample) = &calls[0];
    assert_eq!(
        sample.window,
        Some(SampleWindow {
            start_seconds: 240,
            stop_seconds: 120,
        })
    );
    assert!(sample.output.starts_with(&config.sample_dir));

    // Second invocation: the full-length commit encode
    let (_, commit) = &calls[1];
    assert_eq!(commit.window, None);
    assert_eq!(commit.output, config.output_dir.join("movie.mkv"));

    // Exactly one review round, with exactly one record carrying the metric
    assert_eq!(interaction.reviewed, vec![("AV1 MKV".to_string(), 1)]);
    assert_eq!(
        interaction.last_records[0].bitrate_reduction_percent,
        Some(-25.0)
    );

    // Sample directory is cleared on approval
    assert!(!config.sample_dir.exists());

    // One probe each for the source scan, the sample scan, and the final scan
    assert_eq!(prober.probed.lock().unwrap().len(), 3);

    assert_eq!(report.completed.len(), 1);
    assert!(report.failed.is_empty());
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].bitrate_reduction_percent, Some(-25.0));
    assert_eq!(report.profile.name, "AV1 MKV");
}

#[test]
fn test_reject_resamples_with_newly_selected_profile() {
    let (_dir, config) = setup(Some(120));
    let prober = StubProber::new(&config.input_dir);
    let encoder = RecordingEncoder::default();
    let mut interaction =
        ScriptedInteraction::new(&[Verdict::Reject, Verdict::Approve], &[1]);
    let interrupt = AtomicBool::new(false);

    let report = run_workflow(
        &prober,
        &encoder,
        &mut interaction,
        &mut NullProgress,
        &config,
        &[profile("Slow"), profile("Fast")],
        0,
        &interrupt,
    )
    .unwrap();

    let calls = encoder.calls();
    // sample with Slow, sample again with Fast, commit with Fast
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].0, "Slow");
    assert!(calls[0].1.window.is_some());
    assert_eq!(calls[1].0, "Fast");
    assert!(calls[1].1.window.is_some());
    assert_eq!(calls[2].0, "Fast");
    assert!(calls[2].1.window.is_none());

    assert_eq!(
        interaction.reviewed,
        vec![("Slow".to_string(), 1), ("Fast".to_string(), 1)]
    );
    assert_eq!(report.profile.name, "Fast");
}

#[test]
fn test_without_sampling_starts_in_commit_pass() {
    let (_dir, config) = setup(None);
    let prober = StubProber::new(&config.input_dir);
    let encoder = RecordingEncoder::default();
    let mut interaction = ScriptedInteraction::new(&[], &[]);
    let interrupt = AtomicBool::new(false);

    let report = run_workflow(
        &prober,
        &encoder,
        &mut interaction,
        &mut NullProgress,
        &config,
        &[profile("Only")],
        0,
        &interrupt,
    )
    .unwrap();

    // No review ever happened, and the single encode was full-length
    assert!(interaction.reviewed.is_empty());
    let calls = encoder.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].1.window.is_none());
    assert_eq!(report.records.len(), 1);
}

#[test]
fn test_commit_pass_mirrors_non_media_files_when_enabled() {
    let (dir, mut config) = setup(None);
    config.copy_non_media = true;
    fs::write(config.input_dir.join("notes.txt"), b"keep me").unwrap();
    fs::create_dir_all(config.input_dir.join("extras")).unwrap();
    fs::write(config.input_dir.join("extras").join("cover.jpg"), b"img").unwrap();

    let prober = StubProber::new(&config.input_dir);
    let encoder = RecordingEncoder::default();
    let mut interaction = ScriptedInteraction::new(&[], &[]);
    let interrupt = AtomicBool::new(false);

    run_workflow(
        &prober,
        &encoder,
        &mut interaction,
        &mut NullProgress,
        &config,
        &[profile("Only")],
        0,
        &interrupt,
    )
    .unwrap();

    assert_eq!(
        fs::read(config.output_dir.join("notes.txt")).unwrap(),
        b"keep me"
    );
    assert_eq!(
        fs::read(config.output_dir.join("extras").join("cover.jpg")).unwrap(),
        b"img"
    );
    drop(dir);
}

#[test]
fn test_commit_pass_skips_non_media_files_by_default() {
    let (_dir, config) = setup(None);
    fs::write(config.input_dir.join("notes.txt"), b"skip me").unwrap();

    let prober = StubProber::new(&config.input_dir);
    let encoder = RecordingEncoder::default();
    let mut interaction = ScriptedInteraction::new(&[], &[]);
    let interrupt = AtomicBool::new(false);

    run_workflow(
        &prober,
        &encoder,
        &mut interaction,
        &mut NullProgress,
        &config,
        &[profile("Only")],
        0,
        &interrupt,
    )
    .unwrap();

    assert!(!config.output_dir.join("notes.txt").exists());
}

#[test]
fn test_probe_failure_is_fatal_to_the_run() {
    struct FailingProber;

    impl MediaProber for FailingProber {
        fn probe(&self, path: &Path) -> CoreResult<VideoDescriptor> {
            Err(CoreError::JsonParse(format!(
                "bad probe output for {}",
                path.display()
            )))
        }
    }

    let (_dir, config) = setup(None);
    let encoder = RecordingEncoder::default();
    let mut interaction = ScriptedInteraction::new(&[], &[]);
    let interrupt = AtomicBool::new(false);

    let result = run_workflow(
        &FailingProber,
        &encoder,
        &mut interaction,
        &mut NullProgress,
        &config,
        &[profile("Only")],
        0,
        &interrupt,
    );

    assert!(matches!(result, Err(CoreError::JsonParse(_))));
    assert!(encoder.calls().is_empty());
}

#[test]
fn test_interrupt_stops_before_first_encode() {
    let (_dir, config) = setup(None);
    let prober = StubProber::new(&config.input_dir);
    let encoder = RecordingEncoder::default();
    let mut interaction = ScriptedInteraction::new(&[], &[]);
    let interrupt = AtomicBool::new(true);

    let result = run_workflow(
        &prober,
        &encoder,
        &mut interaction,
        &mut NullProgress,
        &config,
        &[profile("Only")],
        0,
        &interrupt,
    );

    assert!(matches!(result, Err(CoreError::Interrupted)));
    assert!(encoder.calls().is_empty());
}
