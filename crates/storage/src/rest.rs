use async_trait::async_trait;
use reqwest::{header::CONTENT_RANGE, Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use shared::domain::{
    MonitoredRow, Relationship, RelationshipId, RowId, RowPayload, MONITORED_TABLE,
    RELATIONSHIPS_TABLE,
};
use tracing::debug;

use crate::{RelationalStore, RowRange, StoreError};

/// Client for a hosted PostgREST-style store.
#[derive(Clone)]
pub struct RestStore {
    http: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
    message: Option<String>,
}

impl RestStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/rest/v1/{table}", self.base_url))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

async fn check(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<RemoteErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.message)
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.to_string()
            } else {
                body
            }
        });

    Err(StoreError::Remote {
        status: status.as_u16(),
        message,
    })
}

/// Total from a `Content-Range` header such as `0-9/57` or `*/0`.
pub(crate) fn parse_content_range_total(value: &str) -> Option<u64> {
    let (_, total) = value.trim().rsplit_once('/')?;
    total.parse().ok()
}

fn eq_filter(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

#[async_trait]
impl RelationalStore for RestStore {
    async fn count_rows(&self, relationship_id: RelationshipId) -> Result<u64, StoreError> {
        let response = self
            .request(Method::HEAD, MONITORED_TABLE)
            .query(&[
                ("select", "*".to_string()),
                ("relationship_id", eq_filter(relationship_id)),
            ])
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let response = check(response).await?;

        let header = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| StoreError::Protocol("missing Content-Range header".to_string()))?;
        let total = parse_content_range_total(header).ok_or_else(|| {
            StoreError::Protocol(format!("unparseable Content-Range header '{header}'"))
        })?;

        debug!(%relationship_id, total, "counted monitored rows");
        Ok(total)
    }

    async fn fetch_rows(
        &self,
        relationship_id: RelationshipId,
        range: RowRange,
    ) -> Result<Vec<MonitoredRow>, StoreError> {
        let response = self
            .request(Method::GET, MONITORED_TABLE)
            .query(&[
                ("select", "*,relationships(name)".to_string()),
                ("relationship_id", eq_filter(relationship_id)),
                ("order", "created_at.asc".to_string()),
                ("offset", range.start.to_string()),
                ("limit", range.len().to_string()),
            ])
            .send()
            .await?;

        let rows: Option<Vec<MonitoredRow>> = check(response).await?.json().await?;
        Ok(rows.unwrap_or_default())
    }

    async fn insert_row(&self, payload: &RowPayload) -> Result<(), StoreError> {
        let response = self
            .request(Method::POST, MONITORED_TABLE)
            .header("Prefer", "return=minimal")
            .json(&[payload])
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn update_row(&self, id: RowId, payload: &RowPayload) -> Result<(), StoreError> {
        let response = self
            .request(Method::PATCH, MONITORED_TABLE)
            .query(&[("id", eq_filter(id))])
            .header("Prefer", "return=minimal")
            .json(payload)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn delete_row(&self, id: RowId) -> Result<(), StoreError> {
        let response = self
            .request(Method::DELETE, MONITORED_TABLE)
            .query(&[("id", eq_filter(id))])
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn list_relationships(&self) -> Result<Vec<Relationship>, StoreError> {
        let response = self
            .request(Method::GET, RELATIONSHIPS_TABLE)
            .query(&[("select", "id,name"), ("order", "name.asc")])
            .send()
            .await?;
        let relationships: Option<Vec<Relationship>> = check(response).await?.json().await?;
        Ok(relationships.unwrap_or_default())
    }
}

#[cfg(test)]
#[path = "tests/rest_tests.rs"]
mod tests;
