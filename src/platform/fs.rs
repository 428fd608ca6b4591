// logtools - platform/fs.rs
//
// Filesystem helpers: lossy whole-file reads and log file listing.

use crate::util::constants::LOG_MARKER;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Read the full content of a file as a string.
///
/// For files with invalid UTF-8, uses lossy conversion.
pub fn read_file_lossy(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Files directly inside `dir` whose name carries the `.log` marker,
/// sorted by file name. Subdirectories are not entered.
pub fn list_log_files(dir: &Path) -> Result<Vec<PathBuf>, walkdir::Error> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.file_name().to_string_lossy().contains(LOG_MARKER)
        {
            files.push(entry.into_path());
        }
    }
    tracing::debug!(dir = %dir.display(), count = files.len(), "Listed log files");
    Ok(files)
}
