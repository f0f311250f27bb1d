use super::*;

use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::{HeaderMap, Method as HttpMethod, StatusCode},
    response::{IntoResponse, Response as AxumResponse},
    routing::any,
    Json, Router,
};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone)]
struct Captured {
    method: String,
    table: String,
    query: HashMap<String, String>,
    headers: HeaderMap,
    body: Bytes,
}

#[derive(Clone, Default)]
struct FakeState {
    captured: Arc<Mutex<Vec<Captured>>>,
    fail: bool,
}

async fn record(
    State(state): State<FakeState>,
    Path(table): Path<String>,
    method: HttpMethod,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> AxumResponse {
    let query: HashMap<String, String> =
        url::form_urlencoded::parse(query.unwrap_or_default().as_bytes())
            .into_owned()
            .collect();
    state.captured.lock().await.push(Captured {
        method: method.to_string(),
        table: table.clone(),
        query,
        headers,
        body,
    });

    if state.fail {
        return (
            StatusCode::CONFLICT,
            Json(serde_json::json!({
                "code": "23503",
                "message": "insert or update on table violates foreign key constraint",
            })),
        )
            .into_response();
    }

    match method {
        HttpMethod::HEAD => (StatusCode::OK, [("content-range", "0-9/23")]).into_response(),
        HttpMethod::GET if table == "relationships" => Json(serde_json::json!([
            { "id": 1, "name": "Country A - Country B" }
        ]))
        .into_response(),
        HttpMethod::GET => Json(serde_json::json!([
            {
                "id": 11,
                "relationship_id": 1,
                "column_1": "first",
                "created_at": "2024-03-01T10:00:00+00:00",
                "relationships": { "name": "Country A - Country B" }
            }
        ]))
        .into_response(),
        HttpMethod::POST => StatusCode::CREATED.into_response(),
        _ => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn spawn_fake_store(fail: bool) -> (RestStore, FakeState) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let state = FakeState {
        captured: Arc::new(Mutex::new(Vec::new())),
        fail,
    };
    let app = Router::new()
        .route("/rest/v1/:table", any(record))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (RestStore::new(format!("http://{addr}/"), "anon-key"), state)
}

async fn last_request(state: &FakeState) -> Captured {
    state
        .captured
        .lock()
        .await
        .last()
        .cloned()
        .expect("captured request")
}

#[test]
fn parses_content_range_totals() {
    assert_eq!(parse_content_range_total("0-9/57"), Some(57));
    assert_eq!(parse_content_range_total("*/0"), Some(0));
    assert_eq!(parse_content_range_total("0-9/*"), None);
    assert_eq!(parse_content_range_total("garbage"), None);
}

#[tokio::test]
async fn count_uses_exact_count_preference_and_scope_filter() {
    let (store, state) = spawn_fake_store(false).await;

    let total = store.count_rows(RelationshipId(1)).await.expect("count");
    assert_eq!(total, 23);

    let request = last_request(&state).await;
    assert_eq!(request.method, "HEAD");
    assert_eq!(request.table, "country_monitored_relationships");
    assert_eq!(request.query["relationship_id"], "eq.1");
    assert_eq!(request.headers["prefer"], "count=exact");
    assert_eq!(request.headers["apikey"], "anon-key");
    assert_eq!(request.headers["authorization"], "Bearer anon-key");
}

#[tokio::test]
async fn fetch_requests_ordered_joined_page_slice() {
    let (store, state) = spawn_fake_store(false).await;

    let rows = store
        .fetch_rows(RelationshipId(1), RowRange::new(20, 29))
        .await
        .expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, RowId(11));
    assert_eq!(rows[0].relationship_name(), Some("Country A - Country B"));

    let request = last_request(&state).await;
    assert_eq!(request.method, "GET");
    assert_eq!(request.query["select"], "*,relationships(name)");
    assert_eq!(request.query["order"], "created_at.asc");
    assert_eq!(request.query["offset"], "20");
    assert_eq!(request.query["limit"], "10");
}

#[tokio::test]
async fn insert_posts_single_element_array() {
    let (store, state) = spawn_fake_store(false).await;
    let payload = RowPayload {
        relationship_id: Some(RelationshipId(1)),
        column_1: "new".to_string(),
        ..RowPayload::default()
    };

    store.insert_row(&payload).await.expect("insert");

    let request = last_request(&state).await;
    assert_eq!(request.method, "POST");
    let body: serde_json::Value = serde_json::from_slice(&request.body).expect("json");
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["column_1"], "new");
}

#[tokio::test]
async fn update_and_delete_are_scoped_to_row_id() {
    let (store, state) = spawn_fake_store(false).await;

    store
        .update_row(RowId(7), &RowPayload::default())
        .await
        .expect("update");
    let update = last_request(&state).await;
    assert_eq!(update.method, "PATCH");
    assert_eq!(update.query["id"], "eq.7");

    store.delete_row(RowId(7)).await.expect("delete");
    let delete = last_request(&state).await;
    assert_eq!(delete.method, "DELETE");
    assert_eq!(delete.query["id"], "eq.7");
}

#[tokio::test]
async fn lists_relationships() {
    let (store, state) = spawn_fake_store(false).await;

    let relationships = store.list_relationships().await.expect("relationships");
    assert_eq!(relationships[0].name, "Country A - Country B");

    let request = last_request(&state).await;
    assert_eq!(request.table, "relationships");
    assert_eq!(request.query["select"], "id,name");
}

#[tokio::test]
async fn remote_errors_carry_the_store_message() {
    let (store, _state) = spawn_fake_store(true).await;

    let error = store
        .insert_row(&RowPayload::default())
        .await
        .expect_err("remote error");
    match error {
        StoreError::Remote { status, message } => {
            assert_eq!(status, 409);
            assert_eq!(
                message,
                "insert or update on table violates foreign key constraint"
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}
