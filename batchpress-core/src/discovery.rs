//! File discovery module for finding media files to process.
//!
//! Recursively walks the input tree. Media files are recognized by a fixed
//! extension set (case-insensitive); everything else is only of interest to
//! the commit pass when "copy everything" is enabled.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use walkdir::WalkDir;

use crate::error::{CoreError, CoreResult};

/// Extensions treated as encodable media, lowercase.
static MEDIA_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "avi", "flv", "m2ts", "m4v", "mkv", "mov", "mp4", "mpeg", "mpg", "ts", "webm", "wmv",
    ]
    .into_iter()
    .collect()
});

/// Checks whether the given path has a recognized media extension.
#[must_use]
pub fn is_media_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext_str| MEDIA_EXTENSIONS.contains(ext_str.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Finds media files eligible for encoding under `input_dir`, recursively.
///
/// Entries are returned in a stable sorted order so that batch indices and
/// report rows are deterministic across runs.
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - Paths of the discovered media files
/// * `Err(CoreError::Walkdir)` - If traversal fails
/// * `Err(CoreError::NoFilesFound)` - If no media files are found
pub fn find_media_files(input_dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(input_dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && is_media_file(entry.path()) {
            files.push(entry.path().to_path_buf());
        }
    }

    if files.is_empty() {
        Err(CoreError::NoFilesFound)
    } else {
        Ok(files)
    }
}

/// Walks every regular file under `input_dir`, media or not, in the same
/// stable order as [`find_media_files`]. Used by the commit pass to mirror
/// non-media files.
pub fn walk_all_files(input_dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(input_dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.path().to_path_buf());
        }
    }
    Ok(files)
}
