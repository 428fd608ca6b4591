// logtools - app/ingest.rs
//
// Log-file ingestion: read files, decode every line, and assemble the
// dataset. Per-line problems are carried in the result; only failures to
// reach or read a file abort.

use crate::core::codec::{DecodeWarning, LineCodec};
use crate::core::model::Record;
use crate::core::table::LogTable;
use crate::platform::fs;
use crate::util::constants;
use crate::util::error::IngestError;
use std::path::{Path, PathBuf};

/// A decode problem and the 1-based line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LineWarning {
    pub line_number: usize,
    pub warning: DecodeWarning,
}

/// Records decoded from one source, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestResult {
    pub records: Vec<Record>,
    pub warnings: Vec<LineWarning>,
    /// Non-blank lines fed to the decoder.
    pub lines_processed: usize,
}

/// How to order an ingested dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeOrder {
    pub field: String,
    pub format: String,
}

impl Default for TimeOrder {
    fn default() -> Self {
        Self {
            field: constants::DEFAULT_TIMESTAMP_FIELD.to_string(),
            format: constants::ASCTIME_FORMAT.to_string(),
        }
    }
}

/// Decode text holding one record per line.
///
/// Trailing `\r` is stripped; blank lines are skipped.
pub fn decode_content(content: &str, codec: &LineCodec) -> IngestResult {
    let mut result = IngestResult::default();
    for (idx, line) in content.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            continue;
        }
        result.lines_processed += 1;
        let decoded = codec.decode_line(line);
        result
            .warnings
            .extend(decoded.warnings.into_iter().map(|warning| LineWarning {
                line_number: idx + 1,
                warning,
            }));
        result.records.push(decoded.record);
    }
    result
}

/// Read and decode one log file.
pub fn decode_file(path: &Path, codec: &LineCodec) -> Result<IngestResult, IngestError> {
    if !path.exists() {
        return Err(IngestError::PathNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_file_lossy(path).map_err(|e| IngestError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let result = decode_content(&content, codec);
    tracing::debug!(
        path = %path.display(),
        lines = result.lines_processed,
        warnings = result.warnings.len(),
        "Decoded log file"
    );
    Ok(result)
}

/// Expand directories into their log files; files pass through.
pub fn resolve_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>, IngestError> {
    let mut files = Vec::new();
    for path in paths {
        if !path.exists() {
            return Err(IngestError::PathNotFound { path: path.clone() });
        }
        if path.is_dir() {
            let listed = fs::list_log_files(path).map_err(|e| IngestError::Traversal {
                path: path.clone(),
                source: e,
            })?;
            files.extend(listed);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

/// Ingest every path into one dataset.
///
/// Records are concatenated in argument order, then sorted by `order` when
/// given. A dataset without the timestamp column is returned unsorted with
/// a warning instead of failing.
pub fn load_table(
    paths: &[PathBuf],
    codec: &LineCodec,
    order: Option<&TimeOrder>,
) -> Result<(LogTable, Vec<String>), IngestError> {
    let files = resolve_paths(paths)?;
    let mut records = Vec::new();
    let mut malformed = 0;
    for file in &files {
        let result = decode_file(file, codec)?;
        malformed += result.warnings.len();
        records.extend(result.records);
    }
    let mut table = LogTable::from_records(codec.format().fields(), records);

    let mut warnings = Vec::new();
    if let Some(order) = order {
        if !table.sort_by_time(&order.field, &order.format) {
            tracing::warn!(field = %order.field, "{}", constants::NOT_SORTED_WARNING);
            warnings.push(constants::NOT_SORTED_WARNING.to_string());
        }
    }

    tracing::info!(
        files = files.len(),
        rows = table.len(),
        malformed,
        "Dataset loaded"
    );
    Ok((table, warnings))
}
