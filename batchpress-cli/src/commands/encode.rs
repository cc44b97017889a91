//! Implementation of the 'encode' subcommand.
//!
//! Wires CLI arguments into a CoreConfig, checks the external tools, runs
//! the test-approve-commit workflow, and renders the final report.

use std::fs;
use std::sync::atomic::AtomicBool;
use std::time::Instant;

use log::{debug, info};

use batchpress_core::external::{HandBrakeEncoder, MediaInfoProber, check_dependency};
use batchpress_core::{CoreConfig, CoreError, CoreResult, WorkflowReport};
use batchpress_core::{format_size, load_profiles, run_workflow};

use crate::cli::EncodeArgs;
use crate::terminal::{self, ConsoleProgress, TerminalInteraction};

/// Builds the core configuration from CLI arguments.
fn create_core_config(args: &EncodeArgs) -> CoreResult<CoreConfig> {
    let input_dir = args.input_dir.canonicalize().map_err(|e| {
        CoreError::PathError(format!(
            "Invalid input path '{}': {}",
            args.input_dir.display(),
            e
        ))
    })?;

    let mut config = CoreConfig::new(
        input_dir,
        args.output_dir.clone(),
        args.preset_file.clone(),
    );

    if let Some(log_dir) = &args.log_dir {
        config.log_dir = log_dir.clone();
    }
    if let Some(encoder_bin) = &args.encoder_bin {
        config.encoder_bin = encoder_bin.clone();
    }
    if let Some(probe_bin) = &args.probe_bin {
        config.probe_bin = probe_bin.clone();
    }
    config.test_encode_seconds = args.test_seconds;
    config.copy_non_media = args.copy_all;
    config.fail_fast = args.fail_fast;

    config.validate()?;
    Ok(config)
}

/// Displays the final comparison report and per-file statistics.
fn handle_workflow_report(report: &WorkflowReport, total_start_time: Instant) {
    terminal::print_section("ENCODING COMPLETE");

    if report.completed.is_empty() {
        terminal::print_error("No files were successfully encoded");
    } else {
        terminal::print_success(&format!(
            "Successfully encoded {} file(s) with profile '{}'",
            report.completed.len(),
            report.profile.name
        ));
    }

    for failure in &report.failed {
        terminal::print_error(&format!(
            "Failed: {}: {}",
            failure.input.display(),
            failure.error
        ));
    }

    terminal::print_section("COMPARISON REPORT");
    terminal::render_comparison(&report.records);

    let input_total: u64 = report.completed.iter().map(|r| r.input_size).sum();
    let output_total: u64 = report.completed.iter().map(|r| r.output_size).sum();
    terminal::print_section("SUMMARY");
    terminal::print_status("Input size", &format_size(input_total));
    terminal::print_status("Output size", &format_size(output_total));
    terminal::print_status(
        "Total time",
        &batchpress_core::format_duration(total_start_time.elapsed().as_secs()),
    );
}

/// Runs the encoding workflow with configured parameters and reports
/// results.
pub fn run_encode(args: EncodeArgs, verbose: bool) -> CoreResult<()> {
    let total_start_time = Instant::now();

    fs::create_dir_all(&args.output_dir)?;
    let config = create_core_config(&args)?;
    fs::create_dir_all(&config.log_dir)?;

    // --- Setup Logging ---
    let log_filename = format!("batchpress_run_{}.log", crate::logging::get_timestamp());
    let log_path = config.log_dir.join(log_filename);
    crate::logging::init(&log_path, verbose)
        .map_err(|e| CoreError::OperationFailed(format!("Failed to initialize logging: {e}")))?;
    debug!("Log file: {}", log_path.display());
    debug!("Run started: {}", chrono::Local::now());

    terminal::print_section("INITIALIZATION");
    terminal::print_status("Input directory", &config.input_dir.display().to_string());
    terminal::print_status("Output directory", &config.output_dir.display().to_string());
    terminal::print_status("Preset file", &config.preset_file.display().to_string());
    match config.test_encode_seconds {
        Some(seconds) => terminal::print_status("Test encode", &format!("{seconds}s per file")),
        None => terminal::print_status("Test encode", "disabled"),
    }

    // --- Check External Tools ---
    check_dependency(&config.encoder_bin)?;
    check_dependency(&config.probe_bin)?;
    info!("External dependency check passed");

    // --- Load Profiles and Pick the Starting One ---
    let profiles = load_profiles(&config.preset_file)?;
    let initial_profile = if profiles.len() == 1 {
        info!("Using the preset file's only profile: {}", profiles[0].name);
        0
    } else {
        let names: Vec<String> = profiles.iter().map(|p| p.name.clone()).collect();
        terminal::prompt_selection("Select an encoding profile:", &names)?
    };

    // --- Execute Core Workflow ---
    let prober = MediaInfoProber::new(config.probe_bin.clone());
    let encoder = HandBrakeEncoder::new(config.encoder_bin.clone());
    let mut interaction = TerminalInteraction;
    let mut progress = ConsoleProgress::default();
    let interrupt = AtomicBool::new(false);

    let report = run_workflow(
        &prober,
        &encoder,
        &mut interaction,
        &mut progress,
        &config,
        &profiles,
        initial_profile,
        &interrupt,
    )?;
    progress.finish();

    handle_workflow_report(&report, total_start_time);
    debug!("Finished at: {}", chrono::Local::now());
    Ok(())
}
