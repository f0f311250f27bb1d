use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use client_core::{
    ConfirmPrompt, DataPage, DataPageDeps, DeleteOutcome, DialogService, Notice, XlsxExportSink,
};
use shared::domain::RowPayload;
use storage::{RelationalStore, SqliteStore};

#[derive(Default)]
struct AutoConfirm {
    notices: Mutex<Vec<Notice>>,
}

#[async_trait]
impl DialogService for AutoConfirm {
    async fn confirm(&self, _prompt: ConfirmPrompt) -> bool {
        true
    }

    async fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

#[tokio::test]
async fn grid_pages_edits_deletes_and_exports_against_sqlite() {
    let sqlite = SqliteStore::new("sqlite::memory:").await.expect("db");
    let scope = sqlite
        .create_relationship("India \u{2013} China")
        .await
        .expect("scope");
    let other = sqlite.create_relationship("US - EU").await.expect("other");
    let store: Arc<dyn RelationalStore> = Arc::new(sqlite);

    for index in 1..=12 {
        store
            .insert_row(&RowPayload {
                relationship_id: Some(scope),
                column_1: format!("event {index}"),
                ..RowPayload::default()
            })
            .await
            .expect("insert");
    }
    store
        .insert_row(&RowPayload {
            relationship_id: Some(other),
            column_1: "elsewhere".to_string(),
            ..RowPayload::default()
        })
        .await
        .expect("insert other");

    let dir = tempfile::tempdir().expect("tempdir");
    let dialogs = Arc::new(AutoConfirm::default());
    let page = DataPage::new(
        scope,
        DataPageDeps {
            store: store.clone(),
            export: Arc::new(XlsxExportSink::new(dir.path())),
            dialogs: dialogs.clone(),
        },
    );

    page.init().await;
    let first = page.snapshot().await;
    assert_eq!(first.total_records, 12);
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.view.body.rows().len(), 10);
    assert_eq!(first.view.body.rows()[0].relationship_name, "India \u{2013} China");
    assert_eq!(page.relationships().await.len(), 2);

    page.next_page().await.expect("next");
    let second = page.snapshot().await;
    assert_eq!(second.current_page, 2);
    let serials: Vec<u64> = second.view.body.rows().iter().map(|r| r.serial_number).collect();
    assert_eq!(serials, vec![11, 12]);

    let target = page.table_data().await[0].id;
    let mut form = page.edit_row(target).await;
    assert_eq!(form.columns[0], "event 11");
    form.set_column(1, "event 11 (revised)");
    page.save_edit(form).await.expect("save");
    assert_eq!(page.modal().await, None);
    assert_eq!(
        page.table_data().await[0].column_1.as_deref(),
        Some("event 11 (revised)")
    );

    let outcome = page.delete_row(target).await.expect("delete");
    assert_eq!(outcome, DeleteOutcome::Deleted);
    assert_eq!(page.snapshot().await.total_records, 11);
    assert_eq!(page.table_data().await.len(), 1);

    let path = page.export_to_excel().await.expect("export").expect("path");
    assert!(path.starts_with(dir.path()));
    assert!(path.exists());

    let notices = dialogs.notices.lock().unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].title, "Deleted!");
}
