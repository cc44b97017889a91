//! Media data model and encode planning: descriptors, sample windows,
//! comparison records, and the batch encode driver.

pub mod comparison;
pub mod descriptor;
pub mod encode;
pub mod sample;

pub use comparison::{ComparisonRecord, merge};
pub use descriptor::{UNDEFINED_FIELD, VideoDescriptor};
pub use encode::{
    BatchOutcome, EncodeFailure, EncodeJob, EncodeOutcome, LogProgress, ProgressSink,
    encode_batch, encode_file, plan_output_path,
};
pub use sample::SampleWindow;
