//! Core library for batch transcoding with a test-encode approval workflow.
//!
//! This crate drives two external tools — an encoder (HandBrakeCLI) and a
//! metadata probe (mediainfo) — to sample, compare, and batch-encode a tree
//! of media files. The probe's structured output becomes normalized
//! [`media::VideoDescriptor`] values; clipped test encodes are reconciled
//! against their sources into [`media::ComparisonRecord`] rows; and the
//! [`workflow::run_workflow`] state machine loops profile selection until a
//! human approves, then commits the full-tree encode.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use batchpress_core::{CoreConfig, load_profiles, run_workflow};
//! use batchpress_core::external::{HandBrakeEncoder, MediaInfoProber};
//! use batchpress_core::media::LogProgress;
//! use std::path::PathBuf;
//! use std::sync::atomic::AtomicBool;
//!
//! # use batchpress_core::workflow::{Interaction, Verdict};
//! # use batchpress_core::media::ComparisonRecord;
//! # use batchpress_core::presets::EncodeProfile;
//! # use batchpress_core::CoreResult;
//! # struct AlwaysApprove;
//! # impl Interaction for AlwaysApprove {
//! #     fn review_samples(&mut self, _: &EncodeProfile, _: &[ComparisonRecord]) -> CoreResult<Verdict> {
//! #         Ok(Verdict::Approve)
//! #     }
//! #     fn select_profile(&mut self, _: &[EncodeProfile]) -> CoreResult<usize> { Ok(0) }
//! # }
//! let mut config = CoreConfig::new(
//!     PathBuf::from("/path/to/input"),
//!     PathBuf::from("/path/to/output"),
//!     PathBuf::from("/path/to/preset.json"),
//! );
//! config.test_encode_seconds = Some(120);
//! config.validate().unwrap();
//!
//! let profiles = load_profiles(&config.preset_file).unwrap();
//! let prober = MediaInfoProber::new(config.probe_bin.clone());
//! let encoder = HandBrakeEncoder::new(config.encoder_bin.clone());
//! let interrupt = AtomicBool::new(false);
//!
//! let report = run_workflow(
//!     &prober,
//!     &encoder,
//!     &mut AlwaysApprove,
//!     &mut LogProgress,
//!     &config,
//!     &profiles,
//!     0,
//!     &interrupt,
//! ).unwrap();
//! println!("Encoded {} file(s)", report.completed.len());
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod format;
pub mod media;
pub mod presets;
pub mod workflow;

// Re-exports for public API
pub use config::CoreConfig;
pub use discovery::{find_media_files, is_media_file};
pub use error::{CoreError, CoreResult};
pub use format::{format_bit_rate, format_duration, format_size};
pub use media::{ComparisonRecord, SampleWindow, VideoDescriptor, merge};
pub use presets::{EncodeProfile, load_profiles};
pub use workflow::{Interaction, Verdict, WorkflowReport, WorkflowState, run_workflow};
