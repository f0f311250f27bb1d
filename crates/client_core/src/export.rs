use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_xlsxwriter::{Workbook, XlsxError};
use shared::domain::MonitoredRow;
use thiserror::Error;
use tracing::{info, warn};

use crate::view::{format_local_timestamp, MISSING_RELATIONSHIP};

pub const EXPORT_SHEET_NAME: &str = "Country Monitored Relationships";
pub const EXPORT_FILE_PREFIX: &str = "country_monitored_relationships";
pub const EXPORT_HEADERS: [&str; 11] = [
    "S.No",
    "Relationship",
    "Column 1",
    "Column 2",
    "Column 3",
    "Column 4",
    "Column 5",
    "Column 6",
    "Column 7",
    "Column 8",
    "Created At",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write workbook: {0}")]
    Workbook(#[from] XlsxError),
    #[error("failed to prepare export directory '{path}': {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One flat worksheet ready to hand to a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    pub sheet_name: String,
    pub filename: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub fn export_filename(date: NaiveDate) -> String {
    format!("{EXPORT_FILE_PREFIX}_{}.xlsx", date.format("%Y%m%d"))
}

/// Flattens loaded rows. Attachments are exported as their raw stored strings.
pub fn build_export_table(rows: &[MonitoredRow], date: NaiveDate) -> ExportTable {
    let rows = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let mut cells = Vec::with_capacity(EXPORT_HEADERS.len());
            cells.push((index + 1).to_string());
            cells.push(
                row.relationship_name()
                    .unwrap_or(MISSING_RELATIONSHIP)
                    .to_string(),
            );
            cells.extend(row.text_columns().iter().map(|c| c.to_string()));
            cells.push(row.column_7.clone().unwrap_or_default());
            cells.push(row.column_8.clone().unwrap_or_default());
            cells.push(format_local_timestamp(&row.created_at));
            cells
        })
        .collect();

    ExportTable {
        sheet_name: EXPORT_SHEET_NAME.to_string(),
        filename: export_filename(date),
        headers: EXPORT_HEADERS.iter().map(|h| h.to_string()).collect(),
        rows,
    }
}

/// Longest string a worksheet cell accepts.
const MAX_CELL_CHARS: usize = 32_767;

/// Embedded attachments can exceed the cell limit; those are cut to fit.
fn clip_cell(value: &str) -> &str {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        Some((byte_index, _)) => {
            warn!(chars = value.chars().count(), "clipping oversized export cell");
            &value[..byte_index]
        }
        None => value,
    }
}

/// Destination for exported tables. Returns where the file was written.
pub trait ExportSink: Send + Sync {
    fn write(&self, table: &ExportTable) -> Result<PathBuf, ExportError>;
}

/// Writes `.xlsx` workbooks into a directory.
pub struct XlsxExportSink {
    out_dir: PathBuf,
}

impl XlsxExportSink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

impl ExportSink for XlsxExportSink {
    fn write(&self, table: &ExportTable) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(&self.out_dir).map_err(|source| ExportError::Directory {
            path: self.out_dir.clone(),
            source,
        })?;

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&table.sheet_name)?;

        for (col, header) in table.headers.iter().enumerate() {
            worksheet.write_string(0, col as u16, header)?;
        }
        for (row_index, row) in table.rows.iter().enumerate() {
            let sheet_row = row_index as u32 + 1;
            for (col, value) in row.iter().enumerate() {
                worksheet.write_string(sheet_row, col as u16, clip_cell(value))?;
            }
        }

        let path = self.out_dir.join(&table.filename);
        workbook.save(&path)?;
        info!(path = %path.display(), rows = table.rows.len(), "exported workbook");
        Ok(path)
    }
}

#[cfg(test)]
#[path = "tests/export_tests.rs"]
mod tests;
