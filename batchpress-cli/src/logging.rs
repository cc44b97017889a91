// ============================================================================
// batchpress-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: fern Dispatch to Console and Log File
//
// The application uses the standard `log` macros throughout; this module
// wires them to stderr and to a timestamped log file under the run's log
// directory. Debug level is enabled with the --verbose flag.

use std::path::Path;

use log::LevelFilter;

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS",
/// used to name the per-run log file.
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Initializes logging to stderr and to `log_file`. Must be called once,
/// before any log macro fires.
pub fn init(log_file: &Path, verbose: bool) -> Result<(), fern::InitError> {
    let console_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    fern::Dispatch::new()
        .chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!("[{}] {}", record.level(), message))
                })
                .level(console_level)
                .chain(std::io::stderr()),
        )
        .chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "[{} {} {}] {}",
                        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                        record.level(),
                        record.target(),
                        message
                    ))
                })
                .level(LevelFilter::Debug)
                .chain(fern::log_file(log_file)?),
        )
        .apply()?;

    Ok(())
}
