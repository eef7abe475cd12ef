use anyhow::{Context, Result};
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use common::ApiConfig;

use crate::error::FetchError;
use crate::news::{parse_news_items, NewsItem};

/// Source of news items for the list component.
#[async_trait::async_trait]
pub trait NewsSource: Send + Sync {
    /// Retrieve every news item, in backend order.
    async fn get_all(&self) -> Result<Vec<NewsItem>, FetchError>;
}

/// `NewsSource` backed by a plain HTTP GET against the news endpoint.
///
/// One attempt per call: no retry, no caching.
pub struct HttpNewsService {
    news_url: Url,
    client: Client,
}

impl HttpNewsService {
    pub fn new(news_url: Url, timeout_secs: u64, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()
            .context("failed to build reqwest client")?;
        Ok(Self { news_url, client })
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self> {
        let news_url = api.news_url()?;
        let timeout_secs = api.timeout_seconds.unwrap_or(10);
        if timeout_secs == 0 {
            anyhow::bail!("api.timeout_seconds must be at least 1");
        }
        Self::new(
            news_url,
            timeout_secs,
            api.user_agent.as_deref().unwrap_or("newslist/0.1.0"),
        )
    }

    pub fn news_url(&self) -> &Url {
        &self.news_url
    }
}

#[async_trait::async_trait]
impl NewsSource for HttpNewsService {
    async fn get_all(&self) -> Result<Vec<NewsItem>, FetchError> {
        tracing::debug!(url = %self.news_url, "fetching news list");

        let response = self
            .client
            .get(self.news_url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let items = parse_news_items(&bytes)?;
        tracing::debug!(url = %self.news_url, count = items.len(), "news list received");
        Ok(items)
    }
}
