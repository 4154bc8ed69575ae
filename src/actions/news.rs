//! NewsAPI top-headlines client.

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::NewsConfig;

#[derive(Debug, Deserialize)]
struct Article {
    title: String,
}

#[derive(Debug, Deserialize)]
struct HeadlinesResponse {
    articles: Vec<Article>,
}

pub struct NewsClient {
    config: NewsConfig,
    client: Client,
}

impl NewsClient {
    pub fn new(config: NewsConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Top headline titles, bounded by `max_headlines`, in upstream order.
    pub async fn headlines(&self) -> Result<Vec<String>> {
        let url = format!(
            "{}/top-headlines?country={}&apiKey={}",
            self.config.base_url, self.config.country, self.config.api_key
        );
        debug!("Fetching top headlines for {}", self.config.country);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("News request failed")?;
        if !resp.status().is_success() {
            return Err(anyhow!("News API returned status {}", resp.status()));
        }

        let data: HeadlinesResponse = resp
            .json()
            .await
            .context("Failed to parse news response")?;
        Ok(data
            .articles
            .into_iter()
            .take(self.config.max_headlines)
            .map(|a| a.title)
            .collect())
    }
}
