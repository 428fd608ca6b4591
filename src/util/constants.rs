// logtools - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "logtools";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "logtools";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Line format
// =============================================================================

/// Default field declaration. Serialisation order and decode arity.
/// The last field always carries the values payload.
pub const DEFAULT_FIELDS: &[&str] = &[
    "asctime",
    "levelname",
    "name",
    "function",
    "action",
    "exception",
    "message",
    "tag",
    "values",
];

/// Default delimiter joining the fields of one line.
pub const DEFAULT_DELIMITER: &str = "___";

/// Separator joining nested key paths inside a flattened values payload.
/// Distinct from the line delimiter.
pub const KEY_JOIN: &str = "-";

/// Name of the field that carries the values payload.
pub const VALUES_FIELD: &str = "values";

/// Fields the backend supplies on its own (the caller never provides them).
pub const BUILTIN_FIELDS: &[&str] = &[
    "asctime",
    "created",
    "filename",
    "levelname",
    "levelno",
    "lineno",
    "message",
    "module",
    "msecs",
    "name",
    "pathname",
    "process",
    "thread",
    "threadName",
];

/// Text rendered for a field that has no value.
pub const NONE_TEXT: &str = "None";

/// chrono format used to render `asctime` (millisecond precision, comma separated).
pub const ASCTIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Dedicated tracing target for record events.
///
/// Diagnostics filtering switches this target off so structured records
/// never leak into stderr output, and the line layer only accepts it.
pub const LINE_TARGET: &str = "logtools::line";

// =============================================================================
// Decode sentinels
// =============================================================================

/// Key under which a degraded record carries its problem tag.
pub const DEFAULT_ERROR_KEY: &str = "error";

/// Tag for a line whose token count does not match the declaration.
pub const TAG_STRANGE_FORMAT: &str = "strange format";

/// Tag for a values payload that is not valid literal syntax.
pub const TAG_VALUES_ERROR: &str = "values error";

/// Tag for a values payload that parses but is not a mapping.
pub const TAG_VALUES_WARNING: &str = "values warning";

// =============================================================================
// Parsing limits
// =============================================================================

/// Maximum nesting depth accepted by the literal parser.
/// Deeper input is reported as a syntax error instead of recursing.
pub const MAX_LITERAL_DEPTH: usize = 64;

/// Maximum length of a line included in debug output.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Dataset
// =============================================================================

/// Field used to order an ingested dataset.
pub const DEFAULT_TIMESTAMP_FIELD: &str = "asctime";

/// Warning emitted when an ingested dataset cannot be ordered.
pub const NOT_SORTED_WARNING: &str = "log data is not sorted.";

// =============================================================================
// File discovery and renaming
// =============================================================================

/// Glob (filename only) selecting log files and their rotation artifacts.
pub const LOG_FILE_GLOB: &str = "*.log*";

/// Marker every log file name carries.
pub const LOG_MARKER: &str = ".log";

// =============================================================================
// Export
// =============================================================================

/// Maximum number of rows that can be exported in a single operation.
pub const MAX_EXPORT_ROWS: usize = 5_000_000;

// =============================================================================
// Logging
// =============================================================================

/// Default diagnostics log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
