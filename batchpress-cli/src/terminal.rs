// ============================================================================
// batchpress-cli/src/terminal.rs
// ============================================================================
//
// TERMINAL OUTPUT: Styled Printing, Prompts, and the Comparison Report
//
// This module is the CLI's human interaction surface: section headers and
// status lines with consistent styling, the numbered profile menu, the
// yes/no approval prompt, the batch progress bar, and the side-by-side
// comparison report.
//
// Prompt parsing is split into pure functions so the accepted-input rules
// are unit-testable without a terminal attached. Interactive prompts
// reprompt on malformed input, bounded by MAX_PROMPT_ATTEMPTS.

use std::io::{self, BufRead, Write};

use batchpress_core::media::ProgressSink;
use batchpress_core::presets::EncodeProfile;
use batchpress_core::workflow::{Interaction, Verdict};
use batchpress_core::{ComparisonRecord, CoreError, CoreResult, VideoDescriptor, format_duration};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// Re-asks at most this many times before giving up on a prompt.
pub const MAX_PROMPT_ATTEMPTS: usize = 10;

// ---- Styled printing ----

pub fn print_section(title: &str) {
    println!();
    println!("{}", format!("===== {title} =====").cyan().bold());
}

pub fn print_subsection(title: &str) {
    println!("{}", title.bold());
}

pub fn print_status(label: &str, value: &str) {
    println!("  {:<16} {}", label.bold(), value);
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

// ---- Prompt input rules (pure) ----

/// Accepts only y/Y/n/N, surrounding whitespace ignored.
fn parse_yes_no(input: &str) -> Option<bool> {
    match input.trim() {
        "y" | "Y" => Some(true),
        "n" | "N" => Some(false),
        _ => None,
    }
}

/// Accepts a 1-based index into a list of `len` items.
fn parse_selection(input: &str, len: usize) -> Option<usize> {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=len).contains(n))
        .map(|n| n - 1)
}

// ---- Interactive prompts ----

fn read_prompt_line(question: &str) -> CoreResult<Option<String>> {
    print!("{question} ");
    io::stdout().flush()?;

    let mut line = String::new();
    let bytes = io::stdin().lock().read_line(&mut line)?;
    if bytes == 0 {
        // EOF: no more input will ever arrive, stop reprompting
        return Ok(None);
    }
    Ok(Some(line))
}

/// Asks a yes/no question, reprompting on anything but y/Y/n/N.
pub fn prompt_yes_no(question: &str) -> CoreResult<bool> {
    for _ in 0..MAX_PROMPT_ATTEMPTS {
        let Some(line) = read_prompt_line(&format!("{question} [y/n]:"))? else {
            break;
        };
        match parse_yes_no(&line) {
            Some(answer) => return Ok(answer),
            None => println!("{}", "Please answer 'y' or 'n'.".yellow()),
        }
    }
    Err(CoreError::SelectionInput(format!(
        "No valid y/n answer after {MAX_PROMPT_ATTEMPTS} attempts"
    )))
}

/// Presents a numbered menu and asks for an index, reprompting on
/// out-of-range or non-numeric input.
pub fn prompt_selection(title: &str, items: &[String]) -> CoreResult<usize> {
    println!("{}", title.bold());
    for (index, item) in items.iter().enumerate() {
        println!("  {:>2}. {}", index + 1, item);
    }

    for _ in 0..MAX_PROMPT_ATTEMPTS {
        let Some(line) = read_prompt_line(&format!("Enter a number [1-{}]:", items.len()))? else {
            break;
        };
        match parse_selection(&line, items.len()) {
            Some(index) => return Ok(index),
            None => println!(
                "{}",
                format!("Please enter a number between 1 and {}.", items.len()).yellow()
            ),
        }
    }
    Err(CoreError::SelectionInput(format!(
        "No valid selection after {MAX_PROMPT_ATTEMPTS} attempts"
    )))
}

// ---- Comparison report ----

fn describe_side(descriptor: &VideoDescriptor) -> String {
    let mut parts = vec![format!(
        "{} / {}",
        descriptor.container_format, descriptor.video_codec
    )];
    if descriptor.width > 0 && descriptor.height > 0 {
        parts.push(format!("{}x{}", descriptor.width, descriptor.height));
    }
    parts.push(format_duration(descriptor.duration_seconds));
    if !descriptor.total_bit_rate.is_empty() {
        parts.push(descriptor.total_bit_rate.clone());
    }
    if !descriptor.audio_codecs.is_empty() {
        parts.push(format!(
            "audio: {} [{}] ch {}",
            descriptor.audio_codecs, descriptor.audio_languages, descriptor.audio_channels
        ));
    }
    parts.join("  ")
}

/// Renders comparison records as per-file source/target blocks.
pub fn render_comparison(records: &[ComparisonRecord]) {
    for record in records {
        print_subsection(&record.file_name);
        match &record.source {
            Some(source) => print_status("Source", &describe_side(source)),
            None => print_status("Source", "(no matching source)"),
        }
        match &record.target {
            Some(target) => print_status("Target", &describe_side(target)),
            None => print_status("Target", "(no encoded output)"),
        }
        if let Some(percent) = record.bitrate_reduction_percent {
            let formatted = format!("{percent:+.1}%");
            let styled = if percent < 0.0 {
                formatted.green().to_string()
            } else {
                formatted.yellow().to_string()
            };
            print_status("Bitrate change", &styled);
        }
        println!();
    }
}

// ---- Workflow wiring ----

/// Terminal-backed implementation of the workflow's decision points.
#[derive(Debug, Default)]
pub struct TerminalInteraction;

impl Interaction for TerminalInteraction {
    fn review_samples(
        &mut self,
        profile: &EncodeProfile,
        records: &[ComparisonRecord],
    ) -> CoreResult<Verdict> {
        print_section("SAMPLE COMPARISON");
        print_status("Profile", &profile.name);
        println!();
        render_comparison(records);

        if prompt_yes_no("Approve this sample quality and encode the full tree?")? {
            Ok(Verdict::Approve)
        } else {
            Ok(Verdict::Reject)
        }
    }

    fn select_profile(&mut self, profiles: &[EncodeProfile]) -> CoreResult<usize> {
        let names: Vec<String> = profiles.iter().map(|p| p.name.clone()).collect();
        prompt_selection("Select an encoding profile:", &names)
    }
}

/// Progress sink rendering an indicatif bar for each encode batch.
#[derive(Default)]
pub struct ConsoleProgress {
    bar: Option<ProgressBar>,
}

impl ConsoleProgress {
    /// Finishes the current bar, leaving it on screen.
    pub fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish();
        }
    }
}

impl ProgressSink for ConsoleProgress {
    fn batch_started(&mut self, total: usize) {
        self.finish();
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) =
            ProgressStyle::with_template("  [{bar:40}] {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        self.bar = Some(bar);
    }

    fn file_started(&mut self, _index: usize, _total: usize, file_name: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(file_name.to_string());
        }
    }

    fn file_finished(&mut self, _index: usize, _total: usize, _file_name: &str) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }
}
