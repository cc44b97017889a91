//! Utility functions for formatting rates, sizes, and durations.
//!
//! Pure and stateless. These feed both the derived fields on
//! [`crate::media::VideoDescriptor`] and the CLI report output.

/// Formats a raw bitrate (bits per second) with decimal-unit scaling.
/// `None` (the probe reported no explicit rate) formats as an empty string.
#[must_use]
pub fn format_bit_rate(bits_per_second: Option<u64>) -> String {
    const MB: f64 = 1_000_000.0;
    const KB: f64 = 1_000.0;

    let Some(rate) = bits_per_second else {
        return String::new();
    };

    let rate_f64 = rate as f64;
    if rate_f64 >= MB {
        format!("{:.2} Mb/s", rate_f64 / MB)
    } else if rate_f64 >= KB {
        format!("{:.2} Kb/s", rate_f64 / KB)
    } else {
        format!("{rate} b/s")
    }
}

/// Formats a byte count with binary-unit scaling through petabytes.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    const TB: f64 = GB * 1024.0;
    const PB: f64 = TB * 1024.0;

    let bytes_f64 = bytes as f64;
    if bytes_f64 >= PB {
        format!("{:.2} PB", bytes_f64 / PB)
    } else if bytes_f64 >= TB {
        format!("{:.2} TB", bytes_f64 / TB)
    } else if bytes_f64 >= GB {
        format!("{:.2} GB", bytes_f64 / GB)
    } else if bytes_f64 >= MB {
        format!("{:.2} MB", bytes_f64 / MB)
    } else if bytes_f64 >= KB {
        format!("{:.2} KB", bytes_f64 / KB)
    } else {
        format!("{bytes} Bytes")
    }
}

/// Formats whole seconds as HH:MM:SS (e.g., 3725 -> "01:02:05").
#[must_use]
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}
