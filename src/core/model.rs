// logtools - core/model.rs
//
// Core data model types. Pure data definitions with no I/O.
//
// These types are the shared vocabulary across all layers.

use crate::core::literal::Literal;
use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Decoded record
// =============================================================================

/// A decoded line: field name to typed value, in the order fields were
/// decoded.
///
/// Flattened values keys live next to the declared fields, not nested, and
/// keep the order they had in the payload.
pub type Record = IndexMap<String, Literal>;

// =============================================================================
// Level
// =============================================================================

/// Record levels, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Level {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl Level {
    /// Returns all variants in order.
    pub fn all() -> &'static [Level] {
        &[
            Level::Debug,
            Level::Info,
            Level::Warning,
            Level::Error,
            Level::Critical,
        ]
    }

    /// Name rendered into the `levelname` field.
    pub fn name(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    /// Number rendered into the `levelno` field.
    pub fn number(&self) -> u8 {
        match self {
            Level::Debug => 10,
            Level::Info => 20,
            Level::Warning => 30,
            Level::Error => 40,
            Level::Critical => 50,
        }
    }

    /// tracing has no level above ERROR; CRITICAL rides on ERROR and is
    /// told apart by the `levelname` event field.
    pub fn tracing_level(&self) -> tracing::Level {
        match self {
            Level::Debug => tracing::Level::DEBUG,
            Level::Info => tracing::Level::INFO,
            Level::Warning => tracing::Level::WARN,
            Level::Error | Level::Critical => tracing::Level::ERROR,
        }
    }

    pub fn from_tracing(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::TRACE | tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warning,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = String;

    /// Case-insensitive; accepts `warn` for `warning`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warning),
            "error" => Ok(Level::Error),
            "critical" => Ok(Level::Critical),
            other => Err(format!(
                "unknown level '{other}', expected debug, info, warning, error or critical"
            )),
        }
    }
}

// =============================================================================
// Extra record (producer side)
// =============================================================================

/// The caller-supplied part of one log call.
///
/// Every field defaults to none and renders as `None` on the line.
/// Built per call, rendered immediately, never retained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtraRecord {
    pub action: Option<String>,
    pub exception: Option<String>,
    pub function: Option<String>,
    pub tag: Option<String>,
    pub values: Option<Literal>,
}

impl ExtraRecord {
    /// Names of the fields this producer supplies.
    pub const FIELD_NAMES: &'static [&'static str] =
        &["action", "exception", "function", "tag", "values"];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Anything displayable, typically an error value.
    pub fn exception(mut self, exception: impl fmt::Display) -> Self {
        self.exception = Some(exception.to_string());
        self
    }

    pub fn function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn values(mut self, values: impl Into<Literal>) -> Self {
        self.values = Some(values.into());
        self
    }

    /// Text for `name` as it appears on the line.
    ///
    /// Returns `None` for names this producer does not supply. Supplied but
    /// unset fields render as `None`; `values` renders as literal syntax.
    pub fn render(&self, name: &str) -> Option<String> {
        let none = || crate::util::constants::NONE_TEXT.to_string();
        let text = match name {
            "action" => self.action.clone().unwrap_or_else(none),
            "exception" => self.exception.clone().unwrap_or_else(none),
            "function" => self.function.clone().unwrap_or_else(none),
            "tag" => self.tag.clone().unwrap_or_else(none),
            "values" => self
                .values
                .as_ref()
                .map(Literal::to_string)
                .unwrap_or_else(none),
            _ => return None,
        };
        Some(text)
    }
}
