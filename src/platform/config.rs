// logtools - platform/config.rs
//
// Data directory resolution and config.toml loading with startup
// validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for logtools configuration and data.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/logtools/)
    pub config_dir: PathBuf,

    /// Data directory for record files.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();
            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );
            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored so an older binary still reads a
/// newer file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[format]` section.
    pub format: FormatSection,
    /// `[decode]` section.
    pub decode: DecodeSection,
    /// `[dataset]` section.
    pub dataset: DatasetSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[format]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct FormatSection {
    /// Ordered field names; the last one carries the values payload.
    pub fields: Option<Vec<String>>,
    /// Text joining the fields of a line.
    pub delimiter: Option<String>,
}

/// `[decode]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DecodeSection {
    /// Key marking degraded records.
    pub error_key: Option<String>,
}

/// `[dataset]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DatasetSection {
    /// Field the dataset is ordered by.
    pub timestamp_field: Option<String>,
    /// chrono format of that field.
    pub timestamp_format: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Diagnostics level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// File receiving record lines (empty = stdout).
    pub record_file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
/// Field coverage is not checked here; building the line format does that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    // -- Format --
    pub fields: Vec<String>,
    pub delimiter: String,

    // -- Decode --
    pub error_key: String,

    // -- Dataset --
    pub timestamp_field: String,
    pub timestamp_format: String,

    // -- Logging --
    /// Diagnostics level string (for init before tracing is available).
    pub log_level: Option<String>,
    pub record_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fields: constants::DEFAULT_FIELDS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            delimiter: constants::DEFAULT_DELIMITER.to_string(),
            error_key: constants::DEFAULT_ERROR_KEY.to_string(),
            timestamp_field: constants::DEFAULT_TIMESTAMP_FIELD.to_string(),
            timestamp_format: constants::ASCTIME_FORMAT.to_string(),
            log_level: None,
            record_file: None,
        }
    }
}

/// Load `config.toml` from `config_path`, never failing.
///
/// A missing file gives defaults with no warnings (first run). An
/// unreadable or unparseable file gives defaults plus a warning, so the
/// tool still starts but the user is told.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }
    match load_config_file(config_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            let msg = format!(
                "{e}. Using defaults. See config.example.toml for the expected format."
            );
            tracing::warn!("{}", msg);
            (AppConfig::default(), vec![msg])
        }
    }
}

/// Load `config.toml` from an explicit path.
///
/// Read and parse failures are errors; invalid values are warnings.
pub fn load_config_file(config_path: &Path) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let content = std::fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
        path: config_path.to_path_buf(),
        source: e,
    })?;
    let raw: RawConfig = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: config_path.to_path_buf(),
        source: e,
    })?;
    tracing::info!(path = %config_path.display(), "Loaded config.toml");
    Ok(validate(raw))
}

/// Validate each field, accumulating all warnings.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let mut config = AppConfig::default();

    // -- Format: fields --
    if let Some(fields) = raw.format.fields {
        if fields.is_empty() {
            warnings.push("[format] fields is empty. Using the default field list.".to_string());
        } else {
            config.fields = fields;
        }
    }

    // -- Format: delimiter --
    if let Some(delimiter) = raw.format.delimiter {
        if delimiter.is_empty() || delimiter.contains(['\n', '\r']) {
            warnings.push(format!(
                "[format] delimiter = {delimiter:?} cannot separate fields. Using default ({:?}).",
                constants::DEFAULT_DELIMITER,
            ));
        } else {
            config.delimiter = delimiter;
        }
    }

    // -- Decode: error_key --
    if let Some(key) = raw.decode.error_key {
        if key.trim().is_empty() {
            warnings.push(format!(
                "[decode] error_key is empty. Using default ({:?}).",
                constants::DEFAULT_ERROR_KEY,
            ));
        } else {
            config.error_key = key;
        }
    }

    // -- Dataset: timestamp_field --
    if let Some(field) = raw.dataset.timestamp_field {
        if field.is_empty() {
            warnings.push(format!(
                "[dataset] timestamp_field is empty. Using default ({:?}).",
                constants::DEFAULT_TIMESTAMP_FIELD,
            ));
        } else {
            config.timestamp_field = field;
        }
    }

    // -- Dataset: timestamp_format --
    if let Some(format) = raw.dataset.timestamp_format {
        let broken = chrono::format::StrftimeItems::new(&format)
            .any(|item| matches!(item, chrono::format::Item::Error));
        if format.is_empty() || broken {
            warnings.push(format!(
                "[dataset] timestamp_format = {format:?} is not a valid chrono format. \
                 Using default ({:?}).",
                constants::ASCTIME_FORMAT,
            ));
        } else {
            config.timestamp_format = format;
        }
    }

    // -- Logging: level --
    if let Some(level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level);
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    // -- Logging: record_file --
    if let Some(file) = raw.logging.record_file {
        if !file.is_empty() {
            config.record_file = Some(PathBuf::from(file));
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}
