//! Source/target descriptor reconciliation.
//!
//! Pairs the source scan against a target scan by base file name and
//! derives the bitrate-reduction metric. Records are rebuilt from scratch
//! on every comparison round and consumed immediately by the display layer.

use crate::media::VideoDescriptor;

/// One reconciled row: a source descriptor plus the matching target, when
/// one exists. Records for targets that matched no source carry only the
/// target side.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRecord {
    /// The join key both sides share
    pub file_name: String,

    /// Source-side descriptor; absent only for unmatched-target records
    pub source: Option<VideoDescriptor>,

    /// Target-side descriptor, when a target with the same file name exists
    pub target: Option<VideoDescriptor>,

    /// Percent change of overall bitrate from source to target; negative
    /// values are reductions. `None` when either side is missing or either
    /// raw rate is unreported.
    pub bitrate_reduction_percent: Option<f64>,
}

/// Derives the bitrate change percentage.
///
/// A zero source rate falls back to `target * 100` rather than dividing by
/// zero; that quirk is part of the report's observable behavior and is
/// pinned by tests.
fn bitrate_reduction_percent(source_raw: u64, target_raw: u64) -> f64 {
    if source_raw == 0 {
        return (target_raw * 100) as f64;
    }
    (target_raw as f64 - source_raw as f64) / source_raw as f64 * 100.0
}

/// Merges a source scan and a target scan into comparison records.
///
/// The join is keyed ONLY on the base file name: two files that differ only
/// by directory are treated as the same logical file, and when several
/// targets share a name the first in target-scan order wins. Output order
/// is a committed contract: all source records in source-scan order, then
/// unmatched targets in target-scan order.
#[must_use]
pub fn merge(sources: &[VideoDescriptor], targets: &[VideoDescriptor]) -> Vec<ComparisonRecord> {
    let mut records: Vec<ComparisonRecord> = Vec::with_capacity(sources.len());
    let mut matched = vec![false; targets.len()];

    for source in sources {
        let found = targets
            .iter()
            .enumerate()
            .find(|(_, target)| target.file_name == source.file_name);

        let (target, reduction) = match found {
            Some((index, target)) => {
                matched[index] = true;
                let reduction = match (source.total_bit_rate_raw, target.total_bit_rate_raw) {
                    (Some(source_raw), Some(target_raw)) => {
                        Some(bitrate_reduction_percent(source_raw, target_raw))
                    }
                    _ => None,
                };
                (Some(target.clone()), reduction)
            }
            None => (None, None),
        };

        records.push(ComparisonRecord {
            file_name: source.file_name.clone(),
            source: Some(source.clone()),
            target,
            bitrate_reduction_percent: reduction,
        });
    }

    for (target, _) in targets
        .iter()
        .zip(matched.iter())
        .filter(|(_, was_matched)| !**was_matched)
    {
        records.push(ComparisonRecord {
            file_name: target.file_name.clone(),
            source: None,
            target: Some(target.clone()),
            bitrate_reduction_percent: None,
        });
    }

    records
}
