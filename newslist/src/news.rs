use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// A single news article as delivered by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<FixedOffset>>,
}

impl NewsItem {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            body: String::new(),
            url: None,
            published_at: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

/// True for absolute `http`/`https` URLs, the only links a card may carry.
pub fn is_web_url(s: &str) -> bool {
    url::Url::parse(s)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Parse a backend response body into news items.
///
/// The body must be a JSON array; every element must carry an integer `id` and
/// a non-blank `title`, and any `url` must be an absolute http(s) URL. Order
/// is preserved. Any violation is reported as
/// `FetchError::Malformed` naming the offending index.
pub fn parse_news_items(body: &[u8]) -> Result<Vec<NewsItem>, FetchError> {
    let raw: Vec<serde_json::Value> = serde_json::from_slice(body)
        .map_err(|e| FetchError::Malformed(format!("expected a JSON array: {}", e)))?;

    raw.into_iter()
        .enumerate()
        .map(|(index, value)| {
            let item: NewsItem = serde_json::from_value(value)
                .map_err(|e| FetchError::Malformed(format!("item {}: {}", index, e)))?;
            if item.title.trim().is_empty() {
                return Err(FetchError::Malformed(format!("item {}: empty title", index)));
            }
            if let Some(url) = item.url.as_deref() {
                if !is_web_url(url) {
                    return Err(FetchError::Malformed(format!(
                        "item {}: url must be absolute http(s): {}",
                        index, url
                    )));
                }
            }
            Ok(item)
        })
        .collect()
}
