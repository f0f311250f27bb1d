use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use chrono::Local;
use shared::domain::{MonitoredRow, Relationship, RelationshipId, RowId};
use storage::{RelationalStore, StoreError};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::{
    attachments::{read_file_as_data_url, AttachmentError},
    dialog::{ConfirmPrompt, DialogService, Notice},
    export::{build_export_table, ExportError, ExportSink},
    form::{build_payload, EditForm},
    pagination::{self, pagination_controls, total_pages, PAGE_SIZE},
    view::{GridView, ImagePreview, TableBody},
};

#[derive(Debug, Error)]
pub enum DataPageError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Attachment(#[from] AttachmentError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response became the displayed page.
    Applied,
    /// A later load was issued before this one resolved; the response was dropped.
    Stale,
    /// Navigation was outside `[1, total_pages]`; nothing was requested.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

/// Collaborators a page view is built from.
#[derive(Clone)]
pub struct DataPageDeps {
    pub store: Arc<dyn RelationalStore>,
    pub export: Arc<dyn ExportSink>,
    pub dialogs: Arc<dyn DialogService>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    pub relationship_id: RelationshipId,
    pub current_page: u32,
    pub total_records: u64,
    pub total_pages: u32,
    pub view: GridView,
}

#[derive(Debug, Default)]
struct PageState {
    current_page: u32,
    total_records: u64,
    total_pages: u32,
    table_data: Vec<MonitoredRow>,
    relationships: Vec<Relationship>,
    view: GridView,
    modal: Option<EditForm>,
}

/// Paginated CRUD grid over the monitored rows of one relationship.
///
/// The scope is fixed at construction. Loads record the requested page before
/// the store answers; when loads overlap, only the most recently issued one is
/// allowed to replace the displayed rows.
pub struct DataPage {
    relationship_id: RelationshipId,
    store: Arc<dyn RelationalStore>,
    export: Arc<dyn ExportSink>,
    dialogs: Arc<dyn DialogService>,
    state: RwLock<PageState>,
    load_seq: AtomicU64,
}

impl DataPage {
    pub fn new(relationship_id: RelationshipId, deps: DataPageDeps) -> Self {
        Self {
            relationship_id,
            store: deps.store,
            export: deps.export,
            dialogs: deps.dialogs,
            state: RwLock::new(PageState {
                current_page: 1,
                ..PageState::default()
            }),
            load_seq: AtomicU64::new(0),
        }
    }

    /// Loads the relationship selector options, then the first page.
    pub async fn init(&self) {
        self.load_relationships().await;
        let _ = self.load_table_data(1).await;
    }

    pub fn relationship_id(&self) -> RelationshipId {
        self.relationship_id
    }

    pub async fn snapshot(&self) -> PageSnapshot {
        let state = self.state.read().await;
        PageSnapshot {
            relationship_id: self.relationship_id,
            current_page: state.current_page,
            total_records: state.total_records,
            total_pages: state.total_pages,
            view: state.view.clone(),
        }
    }

    pub async fn current_page(&self) -> u32 {
        self.state.read().await.current_page
    }

    pub async fn table_data(&self) -> Vec<MonitoredRow> {
        self.state.read().await.table_data.clone()
    }

    pub async fn relationships(&self) -> Vec<Relationship> {
        self.state.read().await.relationships.clone()
    }

    pub async fn load_relationships(&self) {
        match self.store.list_relationships().await {
            Ok(relationships) => {
                debug!(count = relationships.len(), "loaded relationships");
                self.state.write().await.relationships = relationships;
            }
            Err(error) => {
                error!(%error, "error loading relationships");
            }
        }
    }

    /// Counts the scope, fetches the requested slice and renders it.
    ///
    /// Store failures replace the table body with an error row and leave the
    /// pagination controls as they were; they are logged, not shown as a dialog.
    pub async fn load_table_data(&self, page: u32) -> Result<LoadOutcome, StoreError> {
        let token = self.load_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.write().await.current_page = page;

        let result = self.fetch_page(page).await;

        let mut state = self.state.write().await;
        if self.load_seq.load(Ordering::SeqCst) != token {
            debug!(
                relationship_id = %self.relationship_id,
                page,
                "discarding response for superseded page load"
            );
            return result.map(|_| LoadOutcome::Stale);
        }

        match result {
            Ok((total_records, rows)) => {
                let pages = total_pages(total_records, PAGE_SIZE);
                let view = GridView {
                    body: TableBody::render(&rows, page, PAGE_SIZE),
                    pagination: pagination_controls(page, pages),
                };
                state.total_records = total_records;
                state.total_pages = pages;
                state.table_data = rows;
                state.view = view;
                Ok(LoadOutcome::Applied)
            }
            Err(error) => {
                error!(
                    relationship_id = %self.relationship_id,
                    page,
                    %error,
                    "error loading table data"
                );
                state.view.body = TableBody::LoadError;
                Err(error)
            }
        }
    }

    async fn fetch_page(&self, page: u32) -> Result<(u64, Vec<MonitoredRow>), StoreError> {
        let total_records = self.store.count_rows(self.relationship_id).await?;
        let range = pagination::page_range(page, PAGE_SIZE);
        let rows = self.store.fetch_rows(self.relationship_id, range).await?;
        Ok((total_records, rows))
    }

    pub async fn reload_current_page(&self) -> Result<LoadOutcome, StoreError> {
        let page = self.current_page().await;
        self.load_table_data(page).await
    }

    pub async fn go_to_page(&self, page: u32) -> Result<LoadOutcome, StoreError> {
        let total = self.state.read().await.total_pages;
        if page < 1 || page > total {
            return Ok(LoadOutcome::Skipped);
        }
        self.load_table_data(page).await
    }

    pub async fn previous_page(&self) -> Result<LoadOutcome, StoreError> {
        let target = {
            let state = self.state.read().await;
            pagination::previous_page(state.current_page, state.total_pages)
        };
        match target {
            Some(page) => self.load_table_data(page).await,
            None => Ok(LoadOutcome::Skipped),
        }
    }

    pub async fn next_page(&self) -> Result<LoadOutcome, StoreError> {
        let target = {
            let state = self.state.read().await;
            pagination::next_page(state.current_page, state.total_pages)
        };
        match target {
            Some(page) => self.load_table_data(page).await,
            None => Ok(LoadOutcome::Skipped),
        }
    }

    /// Preview overlay for the thumbnail of a displayed row.
    pub async fn open_image_preview(&self, id: RowId) -> Option<ImagePreview> {
        let state = self.state.read().await;
        state
            .view
            .body
            .rows()
            .iter()
            .find(|row| row.id == id)
            .and_then(|row| row.image.as_ref())
            .map(ImagePreview::open)
    }

    /// Opens the modal for creating a row (`None`) or editing one.
    ///
    /// Rows are looked up in the loaded page only; an id that is not on the
    /// current page opens a form carrying just that id.
    pub async fn open_edit_modal(&self, id: Option<RowId>) -> EditForm {
        let mut state = self.state.write().await;
        let options = state.relationships.clone();
        let form = match id {
            Some(id) => {
                let row = state.table_data.iter().find(|row| row.id == id);
                EditForm::for_edit(id, row, options)
            }
            None => EditForm::for_create(self.relationship_id, options),
        };
        state.modal = Some(form.clone());
        form
    }

    pub async fn edit_row(&self, id: RowId) -> EditForm {
        self.open_edit_modal(Some(id)).await
    }

    pub async fn modal(&self) -> Option<EditForm> {
        self.state.read().await.modal.clone()
    }

    pub async fn close_modal(&self) {
        self.state.write().await.modal = None;
    }

    /// Inserts or updates from the form. On success the modal closes and the
    /// current page is reloaded; on failure the modal stays open with the
    /// submitted values and an error dialog is shown.
    pub async fn save_edit(&self, form: EditForm) -> Result<(), DataPageError> {
        self.state.write().await.modal = Some(form.clone());

        if let Err(error) = self.write_form(&form).await {
            error!(
                relationship_id = %self.relationship_id,
                row_id = ?form.id,
                %error,
                "error saving row"
            );
            self.dialogs
                .notify(Notice::error(format!("Error saving data: {error}")))
                .await;
            return Err(error);
        }

        info!(
            relationship_id = %self.relationship_id,
            row_id = ?form.id,
            created = form.is_create(),
            "saved row"
        );
        self.close_modal().await;
        let _ = self.reload_current_page().await;
        Ok(())
    }

    async fn write_form(&self, form: &EditForm) -> Result<(), DataPageError> {
        let image_data = match &form.image_file {
            Some(path) => Some(read_file_as_data_url(path).await?),
            None => None,
        };
        let document_data = match &form.document_file {
            Some(path) => Some(read_file_as_data_url(path).await?),
            None => None,
        };

        let payload = build_payload(form, image_data, document_data);
        match form.id {
            Some(id) => self.store.update_row(id, &payload).await?,
            None => self.store.insert_row(&payload).await?,
        }
        Ok(())
    }

    /// Deletes a row after the user confirms.
    pub async fn delete_row(&self, id: RowId) -> Result<DeleteOutcome, DataPageError> {
        if !self.dialogs.confirm(ConfirmPrompt::delete_row()).await {
            return Ok(DeleteOutcome::Cancelled);
        }

        if let Err(error) = self.store.delete_row(id).await {
            error!(row_id = %id, %error, "error deleting row");
            self.dialogs
                .notify(Notice::error(format!("Error deleting row: {error}")))
                .await;
            return Err(error.into());
        }

        info!(row_id = %id, "deleted row");
        self.dialogs.notify(Notice::row_deleted()).await;
        let _ = self.reload_current_page().await;
        Ok(DeleteOutcome::Deleted)
    }

    /// Exports the rows currently in memory, which is the loaded page only.
    pub async fn export_to_excel(&self) -> Result<Option<PathBuf>, DataPageError> {
        let rows = self.table_data().await;
        if rows.is_empty() {
            self.dialogs.notify(Notice::no_data()).await;
            return Ok(None);
        }

        let table = build_export_table(&rows, Local::now().date_naive());
        match self.export.write(&table) {
            Ok(path) => Ok(Some(path)),
            Err(error) => {
                error!(%error, "error exporting rows");
                self.dialogs
                    .notify(Notice::error(format!("Error exporting data: {error}")))
                    .await;
                Err(error.into())
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/data_page_tests.rs"]
mod tests;
