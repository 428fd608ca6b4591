// logtools - core/codec.rs
//
// Line codec, decode direction: split a delimited line back into typed
// fields and flatten the values payload into path-qualified keys.
// The encode direction is the tracing formatter in app::line_layer.
//
// Per-line problems never fail: each one produces a `DecodeWarning`, a
// `tracing::warn!` event, and a sentinel key in the returned record so a
// batch keeps going and consumers can count malformed lines.

use crate::core::format::LogFormat;
use crate::core::literal::{parse_literal, Literal};
use crate::core::model::Record;
use crate::util::constants;
use crate::util::error::LiteralError;
use std::fmt;

// =============================================================================
// Sentinels and warnings
// =============================================================================

/// Key and tag names marking degraded records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentinels {
    /// Key carrying the problem tag.
    pub error_key: String,
    /// Tag for a token-count mismatch.
    pub strange_format: String,
    /// Tag for a values payload that is not literal syntax.
    pub values_error: String,
    /// Tag for a values payload that is not a mapping.
    pub values_warning: String,
}

impl Default for Sentinels {
    fn default() -> Self {
        Self {
            error_key: constants::DEFAULT_ERROR_KEY.to_string(),
            strange_format: constants::TAG_STRANGE_FORMAT.to_string(),
            values_error: constants::TAG_VALUES_ERROR.to_string(),
            values_warning: constants::TAG_VALUES_WARNING.to_string(),
        }
    }
}

/// A recoverable problem found while decoding one line.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeWarning {
    /// Token count does not match the declared field count.
    StrangeFormat { expected: usize, found: usize },
    /// The values token is not literal syntax.
    ValuesInvalid { error: LiteralError },
    /// The values token is a literal but not a mapping.
    ValuesNotMapping,
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StrangeFormat { .. } => f.write_str("strange format"),
            Self::ValuesInvalid { .. } => f.write_str("values is not valid"),
            Self::ValuesNotMapping => f.write_str("values is not valid but work"),
        }
    }
}

/// Outcome of decoding one line.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedLine {
    pub record: Record,
    pub warnings: Vec<DecodeWarning>,
}

/// Outcome of breaking down one values token.
#[derive(Debug, Clone, PartialEq)]
pub struct Breakdown {
    /// Keys to merge into the record; `None` when the payload is `None`.
    pub values: Option<Record>,
    pub warnings: Vec<DecodeWarning>,
}

// =============================================================================
// Flattening
// =============================================================================

/// `head-key` when a head path is active, otherwise `key`.
pub fn join_key(key: &str, head: Option<&str>) -> String {
    match head {
        Some(head) if !head.is_empty() => format!("{head}{}{key}", constants::KEY_JOIN),
        _ => key.to_string(),
    }
}

/// Split one mapping level into flat entries and still-nested mappings.
///
/// Both buckets are keyed by the path-qualified key. Nested mappings are
/// returned as-is for the caller to expand with their key as the new head.
pub fn expand_dict(
    pairs: &[(Literal, Literal)],
    head: Option<&str>,
) -> (Record, Vec<(String, Literal)>) {
    let mut flat = Record::new();
    let mut pending = Vec::new();
    for (key, value) in pairs {
        let path = join_key(&key.key_text(), head);
        if matches!(value, Literal::Dict(_)) {
            pending.push((path, value.clone()));
        } else {
            flat.insert(path, value.clone());
        }
    }
    (flat, pending)
}

/// Flatten a mapping until no value is itself a mapping.
fn flatten(pairs: &[(Literal, Literal)]) -> Record {
    let (mut flat, mut pending) = expand_dict(pairs, None);
    while let Some((head, nested)) = pending.pop() {
        if let Literal::Dict(inner) = nested {
            let (more_flat, more_pending) = expand_dict(&inner, Some(&head));
            flat.extend(more_flat);
            pending.extend(more_pending);
        }
    }
    flat
}

// =============================================================================
// Decoding
// =============================================================================

/// Break down a values token with the default sentinels.
pub fn breakdown_values(token: &str) -> Breakdown {
    breakdown_values_with(token, &Sentinels::default())
}

/// Break down a values token into flattened keys.
///
/// - not literal syntax: warning, `{values: token, <error_key>: values error}`
/// - `None`: nothing to merge
/// - mapping: flattened keys, nested keys joined with `-`
/// - other literal: warning, `{values: literal, <error_key>: values warning}`
pub fn breakdown_values_with(token: &str, sentinels: &Sentinels) -> Breakdown {
    let literal = match parse_literal(token) {
        Ok(literal) => literal,
        Err(error) => {
            tracing::warn!(
                error = %error,
                values = %preview(token),
                "values is not valid"
            );
            return Breakdown {
                values: Some(sentinel_record(
                    Literal::Str(token.to_string()),
                    sentinels,
                    &sentinels.values_error,
                )),
                warnings: vec![DecodeWarning::ValuesInvalid { error }],
            };
        }
    };

    match literal {
        Literal::None => Breakdown {
            values: None,
            warnings: Vec::new(),
        },
        Literal::Dict(pairs) => Breakdown {
            values: Some(flatten(&pairs)),
            warnings: Vec::new(),
        },
        other => {
            tracing::warn!(values = %preview(token), "values is not valid but work");
            Breakdown {
                values: Some(sentinel_record(other, sentinels, &sentinels.values_warning)),
                warnings: vec![DecodeWarning::ValuesNotMapping],
            }
        }
    }
}

/// Decode a line with the default sentinels.
pub fn decode_line<S: AsRef<str>>(line: &str, fields: &[S], delimiter: &str) -> DecodedLine {
    decode_line_with(line, fields, delimiter, &Sentinels::default())
}

/// Decode one line into a record.
///
/// The split is unbounded: a line with extra delimiters is malformed,
/// not truncated. The last field is the values payload.
pub fn decode_line_with<S: AsRef<str>>(
    line: &str,
    fields: &[S],
    delimiter: &str,
    sentinels: &Sentinels,
) -> DecodedLine {
    let tokens: Vec<&str> = line.split(delimiter).collect();

    if tokens.len() != fields.len() {
        tracing::warn!(
            expected = fields.len(),
            found = tokens.len(),
            line = %preview(line),
            "strange format"
        );
        return DecodedLine {
            record: sentinel_record(
                Literal::Str(line.to_string()),
                sentinels,
                &sentinels.strange_format,
            ),
            warnings: vec![DecodeWarning::StrangeFormat {
                expected: fields.len(),
                found: tokens.len(),
            }],
        };
    }

    let mut record = Record::new();
    let last = tokens.len() - 1;
    for (field, token) in fields[..last].iter().zip(&tokens[..last]) {
        let value = parse_literal(token).unwrap_or_else(|_| Literal::Str((*token).to_string()));
        record.insert(field.as_ref().to_string(), value);
    }

    let breakdown = breakdown_values_with(tokens[last], sentinels);
    if let Some(values) = breakdown.values {
        record.extend(values);
    }

    DecodedLine {
        record,
        warnings: breakdown.warnings,
    }
}

fn sentinel_record(values: Literal, sentinels: &Sentinels, tag: &str) -> Record {
    let mut record = Record::new();
    record.insert(constants::VALUES_FIELD.to_string(), values);
    record.insert(sentinels.error_key.clone(), Literal::Str(tag.to_string()));
    record
}

fn preview(text: &str) -> String {
    if text.chars().count() <= constants::DEBUG_MAX_LINE_PREVIEW {
        text.to_string()
    } else {
        let mut short: String = text.chars().take(constants::DEBUG_MAX_LINE_PREVIEW).collect();
        short.push_str("...");
        short
    }
}

// =============================================================================
// Codec bound to a format
// =============================================================================

/// Decoder for lines written with one [`LogFormat`].
#[derive(Debug, Clone, Default)]
pub struct LineCodec {
    format: LogFormat,
    sentinels: Sentinels,
}

impl LineCodec {
    pub fn new(format: LogFormat) -> Self {
        Self {
            format,
            sentinels: Sentinels::default(),
        }
    }

    pub fn with_sentinels(mut self, sentinels: Sentinels) -> Self {
        self.sentinels = sentinels;
        self
    }

    pub fn format(&self) -> &LogFormat {
        &self.format
    }

    pub fn sentinels(&self) -> &Sentinels {
        &self.sentinels
    }

    pub fn decode_line(&self, line: &str) -> DecodedLine {
        decode_line_with(
            line,
            self.format.fields(),
            self.format.delimiter(),
            &self.sentinels,
        )
    }

    pub fn breakdown_values(&self, token: &str) -> Breakdown {
        breakdown_values_with(token, &self.sentinels)
    }
}
