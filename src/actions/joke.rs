//! Dad-joke client (icanhazdadjoke).

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::Deserialize;

use crate::config::JokeConfig;

#[derive(Debug, Deserialize)]
struct JokeResponse {
    joke: String,
}

pub struct JokeClient {
    config: JokeConfig,
    client: Client,
}

impl JokeClient {
    pub fn new(config: JokeConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    pub async fn fetch(&self) -> Result<String> {
        let resp = self
            .client
            .get(&self.config.url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Joke request failed")?;
        if !resp.status().is_success() {
            return Err(anyhow!("Joke API returned status {}", resp.status()));
        }

        let data: JokeResponse = resp.json().await.context("Failed to parse joke response")?;
        Ok(data.joke)
    }
}
