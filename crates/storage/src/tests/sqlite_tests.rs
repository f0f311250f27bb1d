use super::*;

fn payload(relationship_id: RelationshipId, label: &str) -> RowPayload {
    RowPayload {
        relationship_id: Some(relationship_id),
        column_1: label.to_string(),
        column_2: format!("{label}-2"),
        ..RowPayload::default()
    }
}

async fn seeded_store() -> (SqliteStore, RelationshipId, RelationshipId) {
    let store = SqliteStore::new("sqlite::memory:").await.expect("db");
    let primary = store
        .create_relationship("Country A - Country B")
        .await
        .expect("relationship");
    let other = store
        .create_relationship("Country C - Country D")
        .await
        .expect("relationship");
    (store, primary, other)
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let (store, _, _) = seeded_store().await;
    store.health_check().await.expect("health check");
}

#[tokio::test]
async fn counts_only_rows_in_scope() {
    let (store, primary, other) = seeded_store().await;
    for label in ["a", "b", "c"] {
        store.insert_row(&payload(primary, label)).await.expect("insert");
    }
    store.insert_row(&payload(other, "x")).await.expect("insert");

    assert_eq!(store.count_rows(primary).await.expect("count"), 3);
    assert_eq!(store.count_rows(other).await.expect("count"), 1);
}

#[tokio::test]
async fn fetches_inclusive_range_in_creation_order_with_join() {
    let (store, primary, _) = seeded_store().await;
    for index in 0..12 {
        store
            .insert_row(&payload(primary, &format!("row-{index}")))
            .await
            .expect("insert");
    }

    let rows = store
        .fetch_rows(primary, RowRange::new(10, 19))
        .await
        .expect("rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].column_1.as_deref(), Some("row-10"));
    assert_eq!(rows[1].column_1.as_deref(), Some("row-11"));
    assert_eq!(rows[0].relationship_name(), Some("Country A - Country B"));

    let beyond = store
        .fetch_rows(primary, RowRange::new(20, 29))
        .await
        .expect("rows");
    assert!(beyond.is_empty());
}

#[tokio::test]
async fn update_keeps_attachments_when_payload_omits_them() {
    let (store, primary, other) = seeded_store().await;
    let mut initial = payload(primary, "before");
    initial.column_7 = Some("data:image/png;base64,AAAA".to_string());
    initial.column_8 = Some("https://files.example/report.pdf".to_string());
    store.insert_row(&initial).await.expect("insert");
    let id = store
        .fetch_rows(primary, RowRange::new(0, 9))
        .await
        .expect("rows")[0]
        .id;

    store
        .update_row(id, &payload(other, "after"))
        .await
        .expect("update");

    assert_eq!(store.count_rows(primary).await.expect("count"), 0);
    let rows = store
        .fetch_rows(other, RowRange::new(0, 9))
        .await
        .expect("rows");
    assert_eq!(rows[0].column_1.as_deref(), Some("after"));
    assert_eq!(rows[0].image(), Some("data:image/png;base64,AAAA"));
    assert_eq!(rows[0].document(), Some("https://files.example/report.pdf"));
}

#[tokio::test]
async fn rejects_rows_referencing_missing_relationship() {
    let (store, _, _) = seeded_store().await;
    let error = store
        .insert_row(&payload(RelationshipId(999), "orphan"))
        .await
        .expect_err("foreign key violation");
    assert!(matches!(error, StoreError::Database(_)));
}

#[tokio::test]
async fn deletes_row_by_id() {
    let (store, primary, _) = seeded_store().await;
    store.insert_row(&payload(primary, "a")).await.expect("insert");
    store.insert_row(&payload(primary, "b")).await.expect("insert");
    let rows = store
        .fetch_rows(primary, RowRange::new(0, 9))
        .await
        .expect("rows");

    store.delete_row(rows[0].id).await.expect("delete");

    let remaining = store
        .fetch_rows(primary, RowRange::new(0, 9))
        .await
        .expect("rows");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].column_1.as_deref(), Some("b"));
}

#[tokio::test]
async fn lists_relationships_by_name() {
    let (store, _, _) = seeded_store().await;
    store.create_relationship("Alpha - Beta").await.expect("relationship");
    let names: Vec<String> = store
        .list_relationships()
        .await
        .expect("relationships")
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(
        names,
        vec![
            "Alpha - Beta".to_string(),
            "Country A - Country B".to_string(),
            "Country C - Country D".to_string(),
        ]
    );
}
