//! Table export.
//!
//! [`extract`] turns what a table currently shows into a string matrix; [`csv`] encodes it
//! and [`download`] saves it. Nothing here is cached: every export reads the table afresh.

pub mod csv;
pub mod download;

pub use download::{CsvDocument, DirectoryDownloader, Downloader, CSV_MIME_TYPE, DEFAULT_FILENAME};

use std::path::PathBuf;

use crate::errors::AppError;
use crate::table::DataTable;

/// Header and body rows of one export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportPayload {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportPayload {
    pub fn to_csv(&self) -> String {
        csv::encode(&self.headers, &self.rows)
    }
}

/// Collect the visible, exportable columns and the effective rows of `table`.
///
/// Effective rows are the selected rows when any row is selected, whether or not the filter
/// shows it, otherwise every filtered row. Both follow the current sort order.
pub fn extract<T>(table: &DataTable<'_, T>) -> ExportPayload {
    let columns: Vec<_> = table
        .visible_columns()
        .into_iter()
        .filter(|c| c.is_exportable())
        .collect();

    let rows = if table.has_selection() {
        table.selected_rows()
    } else {
        table.rows()
    };

    ExportPayload {
        headers: columns.iter().map(|c| c.label()).collect(),
        rows: rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|c| table.cell(row, c).to_text())
                    .collect()
            })
            .collect(),
    }
}

/// Extract and encode into a document named `filename` (default `export.csv`).
pub fn export_csv<T>(table: &DataTable<'_, T>, filename: Option<&str>) -> CsvDocument {
    let payload = extract(table);
    tracing::debug!(
        "Exporting {} column(s), {} row(s)",
        payload.headers.len(),
        payload.rows.len()
    );
    CsvDocument::new(payload.to_csv(), filename)
}

/// Extract, encode and save in one step; the usual body of a table's export hook.
pub fn download_csv<T>(
    table: &DataTable<'_, T>,
    downloader: &dyn Downloader,
    filename: Option<&str>,
) -> Result<PathBuf, AppError> {
    downloader.save(&export_csv(table, filename))
}
