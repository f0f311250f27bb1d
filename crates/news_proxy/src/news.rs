use std::sync::Arc;

use anyhow::{bail, Context};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::IgnoredAny, Deserialize};
use shared::{
    error::ErrorBody,
    news::{NEWS_PAGE_SIZE, NEWS_USER_AGENT},
};
use tracing::{debug, error};

use crate::AppState;

/// Raw query of `GET /api/news`. Both values arrive as strings; missing and
/// empty ones fall back to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct NewsParams {
    page: Option<String>,
    q: Option<String>,
}

impl NewsParams {
    fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|page| page.trim().parse::<u32>().ok())
            .filter(|page| *page >= 1)
            .unwrap_or(1)
    }

    fn query<'a>(&'a self, default_query: &'a str) -> &'a str {
        self.q
            .as_deref()
            .filter(|q| !q.is_empty())
            .unwrap_or(default_query)
    }
}

pub async fn get_news(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NewsParams>,
) -> Response {
    let page = params.page();
    let query = params.query(&state.settings.news_default_query);

    match fetch_everything(&state, query, page).await {
        Ok(body) => {
            debug!(%query, page, bytes = body.len(), "proxied news page");
            ([(header::CONTENT_TYPE, "application/json")], body).into_response()
        }
        Err(error) => {
            error!(%query, page, error = %format!("{error:#}"), "failed to fetch news");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::news_fetch_failed()),
            )
                .into_response()
        }
    }
}

/// Calls the upstream `/v2/everything` search and returns its JSON body untouched.
async fn fetch_everything(state: &AppState, query: &str, page: u32) -> anyhow::Result<Bytes> {
    let url = format!("{}/v2/everything", state.settings.news_api_base_url);
    let response = state
        .http
        .get(&url)
        .header(header::USER_AGENT, NEWS_USER_AGENT)
        .query(&[
            ("q", query.to_string()),
            ("page", page.to_string()),
            ("pageSize", NEWS_PAGE_SIZE.to_string()),
            ("sortBy", "publishedAt".to_string()),
            ("apiKey", state.settings.news_api_key.clone()),
        ])
        .send()
        .await
        .context("news api request failed")?;

    let status = response.status();
    if !status.is_success() {
        bail!("news api responded with {status}");
    }

    let body = response
        .bytes()
        .await
        .context("failed to read news api response")?;
    serde_json::from_slice::<IgnoredAny>(&body).context("news api response is not json")?;
    Ok(body)
}
