use std::path::PathBuf;

use shared::domain::{MonitoredRow, Relationship, RelationshipId, RowId, RowPayload};

pub const CREATE_TITLE: &str = "Add New Row";
pub const EDIT_TITLE: &str = "Edit Row";
pub const CURRENT_DOCUMENT_LABEL: &str = "View Current PDF";

/// State of the create/edit modal. One form serves both modes; `id` decides
/// which write is issued on save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditForm {
    pub id: Option<RowId>,
    pub title: &'static str,
    pub relationship_id: Option<RelationshipId>,
    pub relationship_options: Vec<Relationship>,
    pub columns: [String; 6],
    /// Existing image, shown as a read-only preview next to the picker.
    pub current_image: Option<String>,
    /// Existing document, shown as a read-only link next to the picker.
    pub current_document: Option<String>,
    /// Replacement image chosen in the file picker.
    pub image_file: Option<PathBuf>,
    /// Replacement document chosen in the file picker.
    pub document_file: Option<PathBuf>,
}

impl EditForm {
    pub fn for_create(scope: RelationshipId, relationship_options: Vec<Relationship>) -> Self {
        Self {
            title: CREATE_TITLE,
            relationship_id: Some(scope),
            relationship_options,
            ..Self::default()
        }
    }

    /// Form for editing `id`. When `row` is `None` only the id is set.
    pub fn for_edit(
        id: RowId,
        row: Option<&MonitoredRow>,
        relationship_options: Vec<Relationship>,
    ) -> Self {
        let mut form = Self {
            id: Some(id),
            title: EDIT_TITLE,
            relationship_options,
            ..Self::default()
        };

        if let Some(row) = row {
            form.relationship_id = row.relationship_id;
            form.columns = row.text_columns().map(str::to_string);
            form.current_image = row.image().map(str::to_string);
            form.current_document = row.document().map(str::to_string);
        }

        form
    }

    pub fn is_create(&self) -> bool {
        self.id.is_none()
    }

    /// Sets a text column by its 1-based number. Out-of-range numbers are ignored.
    pub fn set_column(&mut self, number: usize, value: impl Into<String>) {
        if let Some(slot) = number.checked_sub(1).and_then(|i| self.columns.get_mut(i)) {
            *slot = value.into();
        }
    }
}

/// Write payload from the form. Embedded attachments replace the stored ones;
/// `None` leaves them untouched.
pub fn build_payload(
    form: &EditForm,
    image_data: Option<String>,
    document_data: Option<String>,
) -> RowPayload {
    let [column_1, column_2, column_3, column_4, column_5, column_6] = form.columns.clone();
    RowPayload {
        relationship_id: form.relationship_id,
        column_1,
        column_2,
        column_3,
        column_4,
        column_5,
        column_6,
        column_7: image_data,
        column_8: document_data,
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
