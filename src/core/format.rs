// logtools - core/format.rs
//
// Format registry: the single source of truth for which fields a line
// carries, in which order, and with which delimiter.
//
// A `LogFormat` is immutable once built. Reconfiguring means building a new
// one and handing it to new loggers/codecs; nothing mutates a format that
// in-flight encode/decode calls are reading.

use crate::core::model::ExtraRecord;
use crate::util::constants;
use crate::util::error::ConfigurationError;
use std::collections::BTreeSet;

/// Build the rendering template for `fields` joined by `delimiter`.
///
/// Each field becomes a `%(<field>)s` placeholder.
pub fn build_format<S: AsRef<str>>(fields: &[S], delimiter: &str) -> String {
    fields
        .iter()
        .map(|f| format!("%({})s", f.as_ref()))
        .collect::<Vec<_>>()
        .join(delimiter)
}

/// True when every declared field has exactly one kind of producer.
///
/// Fails if an extra field shadows a built-in field, or if a declared field
/// is neither extra nor built-in. Extra fields that are not declared are
/// fine: the producer may offer more than the format uses.
pub fn validate_field_coverage(
    declared: &BTreeSet<&str>,
    extra_available: &BTreeSet<&str>,
    builtin: &BTreeSet<&str>,
) -> bool {
    check_field_coverage(declared, extra_available, builtin).is_ok()
}

/// Same rule as [`validate_field_coverage`], reporting the offending names.
pub fn check_field_coverage(
    declared: &BTreeSet<&str>,
    extra_available: &BTreeSet<&str>,
    builtin: &BTreeSet<&str>,
) -> Result<(), ConfigurationError> {
    let collisions: Vec<String> = extra_available
        .intersection(builtin)
        .map(|s| s.to_string())
        .collect();
    let uncovered: Vec<String> = declared
        .iter()
        .filter(|f| !extra_available.contains(*f) && !builtin.contains(*f))
        .map(|s| s.to_string())
        .collect();

    if collisions.is_empty() && uncovered.is_empty() {
        Ok(())
    } else {
        Err(ConfigurationError::Inconsistent {
            collisions,
            uncovered,
        })
    }
}

/// Validated field declaration plus its derived template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFormat {
    fields: Vec<String>,
    delimiter: String,
    template: String,
}

impl LogFormat {
    /// Build a format from an ordered field list and a delimiter.
    ///
    /// Checks the declaration itself (non-empty, unique, usable names and
    /// delimiter) but not who produces the fields; see [`LogFormat::validated`].
    pub fn new<S: AsRef<str>>(fields: &[S], delimiter: &str) -> Result<Self, ConfigurationError> {
        if fields.is_empty() {
            return Err(ConfigurationError::EmptyFieldList);
        }
        if delimiter.is_empty() {
            return Err(ConfigurationError::InvalidDelimiter {
                delimiter: delimiter.to_string(),
                reason: "must not be empty",
            });
        }
        if delimiter.contains(['\n', '\r']) {
            return Err(ConfigurationError::InvalidDelimiter {
                delimiter: delimiter.to_string(),
                reason: "must not contain a line break",
            });
        }

        let mut seen = BTreeSet::new();
        for field in fields {
            let field = field.as_ref();
            if field.is_empty() || field.contains(['(', ')']) || field.contains(delimiter) {
                return Err(ConfigurationError::InvalidFieldName {
                    field: field.to_string(),
                });
            }
            if !seen.insert(field) {
                return Err(ConfigurationError::DuplicateField {
                    field: field.to_string(),
                });
            }
        }

        let fields: Vec<String> = fields.iter().map(|f| f.as_ref().to_string()).collect();
        let template = build_format(&fields, delimiter);
        Ok(Self {
            fields,
            delimiter: delimiter.to_string(),
            template,
        })
    }

    /// Build a format and check it against the record producer.
    ///
    /// The producer is [`ExtraRecord`]; the backend supplies
    /// [`constants::BUILTIN_FIELDS`].
    pub fn validated<S: AsRef<str>>(
        fields: &[S],
        delimiter: &str,
    ) -> Result<Self, ConfigurationError> {
        let format = Self::new(fields, delimiter)?;
        let declared: BTreeSet<&str> = format.fields.iter().map(String::as_str).collect();
        let extra: BTreeSet<&str> = ExtraRecord::FIELD_NAMES.iter().copied().collect();
        let builtin: BTreeSet<&str> = constants::BUILTIN_FIELDS.iter().copied().collect();
        check_field_coverage(&declared, &extra, &builtin)?;

        tracing::debug!(
            fields = format.fields.len(),
            delimiter = %format.delimiter,
            "Log format validated"
        );
        Ok(format)
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Placeholder names read back from the template, in order.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut rest = self.template.as_str();
        while let Some(start) = rest.find("%(") {
            let after = &rest[start + 2..];
            match after.find(")s") {
                Some(end) => {
                    names.push(&after[..end]);
                    rest = &after[end + 2..];
                }
                None => break,
            }
        }
        names
    }
}

impl Default for LogFormat {
    fn default() -> Self {
        let fields: Vec<String> = constants::DEFAULT_FIELDS
            .iter()
            .map(|f| f.to_string())
            .collect();
        let template = build_format(&fields, constants::DEFAULT_DELIMITER);
        Self {
            fields,
            delimiter: constants::DEFAULT_DELIMITER.to_string(),
            template,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set<'a>(names: &[&'a str]) -> BTreeSet<&'a str> {
        names.iter().copied().collect()
    }

    #[test]
    fn test_build_format() {
        assert_eq!(
            build_format(&["A", "BBB", "Car"], "==="),
            "%(A)s===%(BBB)s===%(Car)s"
        );
        assert_eq!(build_format(&["only"], "___"), "%(only)s");
    }

    #[test]
    fn test_placeholder_count_matches_fields() {
        for (fields, delimiter) in [
            (vec!["a"], "|"),
            (vec!["a", "b"], "___"),
            (vec!["asctime", "levelname", "message", "values"], " :: "),
        ] {
            let format = LogFormat::new(&fields, delimiter).unwrap();
            assert_eq!(format.placeholders(), fields);
            assert_eq!(
                format.template().matches(delimiter).count(),
                fields.len() - 1
            );
        }
    }

    #[test]
    fn test_default_format() {
        let format = LogFormat::default();
        assert_eq!(
            format.template(),
            "%(asctime)s___%(levelname)s___%(name)s___%(function)s___%(action)s\
             ___%(exception)s___%(message)s___%(tag)s___%(values)s"
        );
        assert_eq!(
            LogFormat::validated(constants::DEFAULT_FIELDS, constants::DEFAULT_DELIMITER),
            Ok(format)
        );
    }

    #[test]
    fn test_coverage_cases() {
        let builtin = set(constants::BUILTIN_FIELDS);
        let declared = set(constants::DEFAULT_FIELDS);

        let exact = set(&["values", "tag", "function", "exception", "action"]);
        assert!(validate_field_coverage(&declared, &exact, &builtin));

        let missing = set(&["values", "tag", "function", "exception"]);
        assert!(!validate_field_coverage(&declared, &missing, &builtin));

        let excess = set(&["values", "tag", "function", "foo", "exception", "action"]);
        assert!(validate_field_coverage(&declared, &excess, &builtin));
    }

    #[test]
    fn test_collision_fails_regardless_of_declaration() {
        let builtin = set(constants::BUILTIN_FIELDS);
        let colliding = set(&["action", "message"]);
        for declared in [set(&[]), set(&["action"]), set(constants::DEFAULT_FIELDS)] {
            assert!(!validate_field_coverage(&declared, &colliding, &builtin));
        }
        assert_eq!(
            check_field_coverage(&set(&["action"]), &colliding, &builtin),
            Err(ConfigurationError::Inconsistent {
                collisions: vec!["message".to_string()],
                uncovered: vec![],
            })
        );
    }

    #[test]
    fn test_validated_rejects_unproduced_field() {
        let err = LogFormat::validated(&["asctime", "user", "values"], "___").unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::Inconsistent {
                collisions: vec![],
                uncovered: vec!["user".to_string()],
            }
        );
    }

    #[test]
    fn test_new_rejects_bad_declarations() {
        let empty: [&str; 0] = [];
        assert_eq!(
            LogFormat::new(&empty, "___"),
            Err(ConfigurationError::EmptyFieldList)
        );
        assert!(matches!(
            LogFormat::new(&["a", "b", "a"], "___"),
            Err(ConfigurationError::DuplicateField { field }) if field == "a"
        ));
        assert!(matches!(
            LogFormat::new(&["a"], ""),
            Err(ConfigurationError::InvalidDelimiter { .. })
        ));
        assert!(matches!(
            LogFormat::new(&["a"], "\n"),
            Err(ConfigurationError::InvalidDelimiter { .. })
        ));
        assert!(matches!(
            LogFormat::new(&["a___b"], "___"),
            Err(ConfigurationError::InvalidFieldName { .. })
        ));
    }
}
