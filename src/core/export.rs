// logtools - core/export.rs
//
// CSV and JSON export of a decoded dataset.
// Core layer: writes to any Write trait object.

use crate::core::table::LogTable;
use crate::util::constants::MAX_EXPORT_ROWS;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

fn check_row_limit(table: &LogTable) -> Result<(), ExportError> {
    if table.len() > MAX_EXPORT_ROWS {
        return Err(ExportError::TooManyRows {
            count: table.len(),
            max: MAX_EXPORT_ROWS,
        });
    }
    Ok(())
}

/// Export a table to CSV.
///
/// Header is the table's columns. Strings are written raw, missing and
/// `None` cells are empty, other values use literal syntax.
pub fn export_csv<W: Write>(
    table: &LogTable,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    check_row_limit(table)?;
    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(table.columns()).map_err(csv_err)?;

    let mut count = 0;
    for row in table.rows() {
        let cells = table
            .columns()
            .iter()
            .map(|column| row.get(column).map(|v| v.cell_text()).unwrap_or_default());
        csv_writer.write_record(cells).map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(rows = count, path = %export_path.display(), "CSV export written");
    Ok(count)
}

/// Export a table to JSON (array of objects, one per row).
pub fn export_json<W: Write>(
    table: &LogTable,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    check_row_limit(table)?;
    serde_json::to_writer_pretty(writer, table.rows()).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(rows = table.len(), path = %export_path.display(), "JSON export written");
    Ok(table.len())
}
