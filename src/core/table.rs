// logtools - core/table.rs
//
// Tabular view of decoded records: an ordered column list over a row per
// record. Rows keep whatever keys their line produced; a column a row does
// not have is simply missing, never an error.

use crate::core::literal::Literal;
use crate::core::model::Record;
use chrono::NaiveDateTime;

/// Decoded records with a stable column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogTable {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl LogTable {
    /// Build a table from records.
    ///
    /// Columns are the `declared` fields that appear in any row, in declared
    /// order, followed by every other key in first-seen order.
    pub fn from_records<S: AsRef<str>>(declared: &[S], rows: Vec<Record>) -> Self {
        let columns: Vec<String> = declared
            .iter()
            .map(|d| d.as_ref())
            .filter(|d| rows.iter().any(|row| row.contains_key(*d)))
            .map(str::to_string)
            .collect();
        let mut table = Self {
            columns,
            rows: Vec::new(),
        };
        table.extend(rows);
        table
    }

    /// Append rows, adding any keys not yet known as trailing columns in the
    /// order the rows carry them.
    pub fn extend(&mut self, rows: Vec<Record>) {
        for row in &rows {
            for key in row.keys() {
                if !self.columns.iter().any(|c| c == key) {
                    self.columns.push(key.clone());
                }
            }
        }
        self.rows.extend(rows);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Cells of one column, `None` where a row lacks the key.
    pub fn column(&self, name: &str) -> Option<Vec<Option<&Literal>>> {
        if !self.has_column(name) {
            return None;
        }
        Some(self.rows.iter().map(|row| row.get(name)).collect())
    }

    /// Rows carrying the sentinel `error_key`.
    pub fn count_tagged(&self, error_key: &str) -> usize {
        self.rows
            .iter()
            .filter(|row| row.contains_key(error_key))
            .count()
    }

    /// Stable-sort rows by the timestamp in `field`.
    ///
    /// Rows whose timestamp is missing or does not parse go last, in their
    /// original order. Returns `false` without touching the rows when the
    /// column does not exist.
    pub fn sort_by_time(&mut self, field: &str, format: &str) -> bool {
        if !self.has_column(field) {
            return false;
        }
        let mut keyed: Vec<(Option<NaiveDateTime>, Record)> = std::mem::take(&mut self.rows)
            .into_iter()
            .map(|row| {
                let time = row
                    .get(field)
                    .and_then(Literal::as_str)
                    .and_then(|text| parse_timestamp(text, format));
                (time, row)
            })
            .collect();
        keyed.sort_by(|(a, _), (b, _)| match (a, b) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        self.rows = keyed.into_iter().map(|(_, row)| row).collect();
        true
    }
}

/// Parse `text` with `format`, accepting either `,` or `.` before the
/// fractional seconds.
pub fn parse_timestamp(text: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, format)
        .or_else(|_| NaiveDateTime::parse_from_str(text, &format.replace(',', ".")))
        .or_else(|_| NaiveDateTime::parse_from_str(text, &format.replace('.', ",")))
        .ok()
}
