//! Sample-window math for test encodes.

/// The clipped time range for a representative test encode.
///
/// `stop_seconds` is a DURATION relative to `start_seconds`, matching the
/// encoder's `--start-at seconds:N --stop-at seconds:M` semantics. It is
/// not an absolute end timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleWindow {
    pub start_seconds: u64,
    pub stop_seconds: u64,
}

impl SampleWindow {
    /// Computes the clip window for a source of `duration_seconds` and a
    /// requested sample length of `sample_seconds`.
    ///
    /// Sources shorter than the requested sample are encoded whole. Longer
    /// sources get a window centered on the midpoint; the start saturates
    /// at zero.
    #[must_use]
    pub fn compute(duration_seconds: u64, sample_seconds: u64) -> Self {
        if duration_seconds <= sample_seconds {
            return Self {
                start_seconds: 0,
                stop_seconds: duration_seconds,
            };
        }

        let midpoint = duration_seconds / 2;
        Self {
            start_seconds: midpoint.saturating_sub(sample_seconds / 2),
            stop_seconds: sample_seconds,
        }
    }
}
