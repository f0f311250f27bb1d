use serde::{Deserialize, Serialize};

/// Message returned by the news proxy for every upstream failure.
pub const NEWS_FETCH_FAILED: &str = "Failed to fetch news";

/// JSON error body used by HTTP endpoints: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    pub fn news_fetch_failed() -> Self {
        Self::new(NEWS_FETCH_FAILED)
    }
}
