use reqwest::Client;
use shared::news::NewsResponse;
use tracing::{debug, error};

/// Dash-like characters stripped from relationship names before searching.
const DASHES: [char; 3] = ['-', '\u{2013}', '\u{2014}'];

/// Query parameters accepted by the news proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    pub q: Option<String>,
    pub page: u32,
}

impl NewsQuery {
    pub fn search(q: impl Into<String>, page: u32) -> Self {
        Self {
            q: Some(q.into()),
            page,
        }
    }

    pub fn default_topic(page: u32) -> Self {
        Self { q: None, page }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(2);
        if let Some(q) = &self.q {
            params.push(("q", q.clone()));
        }
        params.push(("page", self.page.to_string()));
        params
    }
}

/// Turns `"Country A – Country B"` into a plain search phrase.
pub fn relationship_search_phrase(relationship_name: &str) -> String {
    relationship_name.replace(DASHES, " ").trim().to_string()
}

/// Client for the `/api/news` proxy. Never fails: any error yields an empty
/// `"error"` response, so callers only check for emptiness.
#[derive(Clone)]
pub struct NewsService {
    http: Client,
    base_url: String,
}

impl NewsService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn fetch_news(&self, query: &NewsQuery) -> NewsResponse {
        match self.request(query).await {
            Ok(response) => {
                debug!(
                    total_results = response.total_results,
                    articles = response.articles.len(),
                    "fetched news"
                );
                response
            }
            Err(error) => {
                error!(%error, "error fetching news");
                NewsResponse::error()
            }
        }
    }

    async fn request(&self, query: &NewsQuery) -> Result<NewsResponse, reqwest::Error> {
        self.http
            .get(format!("{}/api/news", self.base_url))
            .query(&query.params())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    pub async fn fetch_news_for_relationship(
        &self,
        relationship_name: &str,
        page: u32,
    ) -> NewsResponse {
        let phrase = relationship_search_phrase(relationship_name);
        self.fetch_news(&NewsQuery::search(phrase, page)).await
    }

    pub async fn search_news(&self, search_query: &str, page: u32) -> NewsResponse {
        self.fetch_news(&NewsQuery::search(search_query, page)).await
    }

    pub async fn fetch_default_news(&self, page: u32) -> NewsResponse {
        self.fetch_news(&NewsQuery::default_topic(page)).await
    }
}

#[cfg(test)]
#[path = "tests/news_tests.rs"]
mod tests;
