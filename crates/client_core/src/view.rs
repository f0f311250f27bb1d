//! Plain view models for the data grid. Presentation layers consume these
//! without touching the store.

use chrono::{DateTime, Local, Utc};
use shared::domain::{MonitoredRow, RowId};

use crate::pagination::{serial_number, PaginationControls};

pub const MISSING_RELATIONSHIP: &str = "N/A";
pub const NO_DATA: &str = "No data available";
pub const LOAD_ERROR: &str = "Error loading data";
pub const IMAGE_PREVIEW_CAPTION: &str = "Image Preview";
pub const DOCUMENT_LINK_LABEL: &str = "View PDF";

/// Viewer-local rendering of a creation timestamp, e.g. `3/1/2024, 10:00:00 AM`.
pub fn format_local_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%-m/%-d/%Y, %-I:%M:%S %p")
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub src: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLink {
    pub href: String,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub id: RowId,
    pub serial_number: u64,
    pub relationship_name: String,
    pub columns: [String; 6],
    pub image: Option<Thumbnail>,
    pub document: Option<DocumentLink>,
    pub created_at: String,
}

impl DisplayRow {
    pub fn from_row(row: &MonitoredRow, current_page: u32, page_size: u64, index: usize) -> Self {
        Self {
            id: row.id,
            serial_number: serial_number(current_page, page_size, index),
            relationship_name: row
                .relationship_name()
                .unwrap_or(MISSING_RELATIONSHIP)
                .to_string(),
            columns: row.text_columns().map(str::to_string),
            image: row.image().map(|src| Thumbnail {
                src: src.to_string(),
            }),
            document: row.document().map(|href| DocumentLink {
                href: href.to_string(),
                label: DOCUMENT_LINK_LABEL,
            }),
            created_at: format_local_timestamp(&row.created_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    Rows(Vec<DisplayRow>),
    Empty,
    LoadError,
}

impl TableBody {
    pub fn render(rows: &[MonitoredRow], current_page: u32, page_size: u64) -> Self {
        if rows.is_empty() {
            return Self::Empty;
        }
        Self::Rows(
            rows.iter()
                .enumerate()
                .map(|(index, row)| DisplayRow::from_row(row, current_page, page_size, index))
                .collect(),
        )
    }

    /// Text of the single placeholder row, if the body has no data rows.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::Rows(_) => None,
            Self::Empty => Some(NO_DATA),
            Self::LoadError => Some(LOAD_ERROR),
        }
    }

    pub fn rows(&self) -> &[DisplayRow] {
        match self {
            Self::Rows(rows) => rows,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridView {
    pub body: TableBody,
    pub pagination: Option<PaginationControls>,
}

impl Default for GridView {
    fn default() -> Self {
        Self {
            body: TableBody::Empty,
            pagination: None,
        }
    }
}

/// Overlay shown when a thumbnail is clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePreview {
    pub src: String,
    pub caption: &'static str,
}

impl ImagePreview {
    pub fn open(thumbnail: &Thumbnail) -> Self {
        Self {
            src: thumbnail.src.clone(),
            caption: IMAGE_PREVIEW_CAPTION,
        }
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
