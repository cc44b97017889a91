// batchpress-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Batchpress: batch transcoding with test-encode approval",
    long_about = "Batch-transcodes a media tree with HandBrakeCLI, optionally validating \
                  bitrate quality via a short sample encode before committing to the full run."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug-level logging.
    #[arg(long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encodes a media tree into a mirrored output directory
    Encode(EncodeArgs),
}

#[derive(Parser, Debug)]
pub struct EncodeArgs {
    /// Directory containing the source media tree
    #[arg(short = 'i', long = "input", required = true, value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Directory where the mirrored output tree is built
    #[arg(short = 'o', long = "output", required = true, value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Encoder preset file containing the selectable profiles
    #[arg(short = 'p', long = "preset-file", required = true, value_name = "PRESET_JSON")]
    pub preset_file: PathBuf,

    /// Run a clipped test encode of this many seconds per file and ask for
    /// approval before the full run
    #[arg(long, value_name = "SECONDS")]
    pub test_seconds: Option<u64>,

    /// Copy non-media files byte-for-byte into the mirrored output tree
    #[arg(long)]
    pub copy_all: bool,

    /// Abort the whole batch on the first encode failure instead of
    /// skipping the file
    #[arg(long)]
    pub fail_fast: bool,

    /// Optional: Directory for log files (defaults to OUTPUT_DIR/logs)
    #[arg(short, long, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Optional: Override the encoder executable
    #[arg(long, value_name = "PATH")]
    pub encoder_bin: Option<PathBuf>,

    /// Optional: Override the metadata probe executable
    #[arg(long, value_name = "PATH")]
    pub probe_bin: Option<PathBuf>,
}
