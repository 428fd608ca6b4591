// logtools - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Per-line decode problems are NOT errors: they are reported as
// `core::codec::DecodeWarning` values and never abort a batch.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all logtools operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum LogToolsError {
    /// Field declaration and record producer are inconsistent.
    Configuration(ConfigurationError),

    /// Reading log files failed.
    Ingest(IngestError),

    /// Export operation failed.
    Export(ExportError),

    /// Log file renaming failed.
    Rename(RenameError),

    /// config.toml loading failed.
    Config(ConfigError),
}

impl fmt::Display for LogToolsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(e) => write!(f, "Configuration error: {e}"),
            Self::Ingest(e) => write!(f, "Ingest error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Rename(e) => write!(f, "Rename error: {e}"),
            Self::Config(e) => write!(f, "Config error: {e}"),
        }
    }
}

impl std::error::Error for LogToolsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Configuration(e) => Some(e),
            Self::Ingest(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Rename(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors (format registry)
// ---------------------------------------------------------------------------

/// The declared line format cannot be produced.
///
/// Detected at load time and never retried: the caller must fix the
/// declaration before logging or decoding will behave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// No fields were declared.
    EmptyFieldList,

    /// A field name appears more than once.
    DuplicateField { field: String },

    /// A field name is empty or cannot appear in a placeholder.
    InvalidFieldName { field: String },

    /// The delimiter cannot separate fields.
    InvalidDelimiter {
        delimiter: String,
        reason: &'static str,
    },

    /// Extra fields collide with built-in fields, or declared fields have
    /// no producer.
    Inconsistent {
        collisions: Vec<String>,
        uncovered: Vec<String>,
    },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFieldList => write!(f, "no fields declared"),
            Self::DuplicateField { field } => {
                write!(f, "field '{field}' is declared more than once")
            }
            Self::InvalidFieldName { field } => {
                write!(f, "field name '{field}' is not a valid placeholder name")
            }
            Self::InvalidDelimiter { delimiter, reason } => {
                write!(f, "delimiter {delimiter:?} is invalid: {reason}")
            }
            Self::Inconsistent {
                collisions,
                uncovered,
            } => {
                let mut parts = Vec::new();
                if !collisions.is_empty() {
                    parts.push(format!(
                        "extra fields shadow built-in fields: {}",
                        collisions.join(", ")
                    ));
                }
                if !uncovered.is_empty() {
                    parts.push(format!(
                        "declared fields have no producer: {}",
                        uncovered.join(", ")
                    ));
                }
                write!(f, "logger and field declaration are inconsistent ({})", parts.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

impl From<ConfigurationError> for LogToolsError {
    fn from(e: ConfigurationError) -> Self {
        Self::Configuration(e)
    }
}

// ---------------------------------------------------------------------------
// Literal syntax errors
// ---------------------------------------------------------------------------

/// Text is not valid literal syntax.
///
/// Only surfaced inside decode results; the codec turns it into a
/// recoverable warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralError {
    /// Byte offset of the offending input.
    pub position: usize,
    pub reason: String,
}

impl LiteralError {
    pub(crate) fn new(position: usize, reason: impl Into<String>) -> Self {
        Self {
            position,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for LiteralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid literal at offset {}: {}", self.position, self.reason)
    }
}

impl std::error::Error for LiteralError {}

// ---------------------------------------------------------------------------
// Ingest errors
// ---------------------------------------------------------------------------

/// Errors related to reading log files for decoding.
#[derive(Debug)]
pub enum IngestError {
    /// The given path does not exist.
    PathNotFound { path: PathBuf },

    /// I/O error while reading a log file.
    Io { path: PathBuf, source: io::Error },

    /// Directory listing failed.
    Traversal {
        path: PathBuf,
        source: walkdir::Error,
    },
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PathNotFound { path } => {
                write!(f, "Log path '{}' does not exist", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "'{}': I/O error: {source}", path.display())
            }
            Self::Traversal { path, source } => {
                write!(f, "Error listing '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Traversal { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<IngestError> for LogToolsError {
    fn from(e: IngestError) -> Self {
        Self::Ingest(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Export would exceed maximum row count.
    TooManyRows { count: usize, max: usize },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
            Self::TooManyRows { count, max } => write!(
                f,
                "Export of {count} rows exceeds maximum of {max}. \
                 Export fewer files at once."
            ),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ExportError> for LogToolsError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Rename errors
// ---------------------------------------------------------------------------

/// Errors related to normalising rotated log file names.
#[derive(Debug)]
pub enum RenameError {
    /// The target directory does not exist or is not a directory.
    NotADirectory { path: PathBuf },

    /// The file selection pattern is invalid.
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    /// A directory entry could not be read while listing.
    Listing { source: glob::GlobError },

    /// Two source files would be renamed to the same name.
    Collision {
        target: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },

    /// The target name is already taken by a file outside the rename plan.
    TargetExists { target: PathBuf },

    /// The rename itself failed.
    Io {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

impl fmt::Display for RenameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotADirectory { path } => {
                write!(f, "'{}' is not a directory", path.display())
            }
            Self::Pattern { pattern, source } => {
                write!(f, "Invalid file pattern '{pattern}': {source}")
            }
            Self::Listing { source } => write!(f, "Cannot list log files: {source}"),
            Self::Collision {
                target,
                first,
                second,
            } => write!(
                f,
                "'{}' and '{}' would both be renamed to '{}'",
                first.display(),
                second.display(),
                target.display()
            ),
            Self::TargetExists { target } => {
                write!(f, "'{}' already exists", target.display())
            }
            Self::Io { from, to, source } => write!(
                f,
                "Cannot rename '{}' to '{}': {source}",
                from.display(),
                to.display()
            ),
        }
    }
}

impl std::error::Error for RenameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Pattern { source, .. } => Some(source),
            Self::Listing { source } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<RenameError> for LogToolsError {
    fn from(e: RenameError) -> Self {
        Self::Rename(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for LogToolsError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for logtools results.
pub type Result<T> = std::result::Result<T, LogToolsError>;
