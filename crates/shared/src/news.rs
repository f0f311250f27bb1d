use serde::{Deserialize, Serialize};

/// Query used when a news request carries no `q` parameter.
pub const DEFAULT_NEWS_QUERY: &str = "international+relations+diplomacy";
/// Articles requested per upstream page.
pub const NEWS_PAGE_SIZE: u32 = 12;
/// Client identification sent to the upstream news API.
pub const NEWS_USER_AGENT: &str = "OsInt-Dashboard/1.0";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default)]
    pub source: Option<ArticleSource>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub url_to_image: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Normalized news listing. Failures are represented as an `"error"` status
/// with no articles rather than as an error value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub status: String,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub articles: Vec<Article>,
}

impl NewsResponse {
    pub fn error() -> Self {
        Self {
            status: "error".to_string(),
            total_results: 0,
            articles: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}
