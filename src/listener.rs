//! Utterance capture with a primary and a fallback strategy.
//!
//! The service only ever sees `capture(timeout) -> String`: a recognized
//! command, or an empty string meaning "no command this cycle". A failing or
//! silent primary backend fails over to the fallback once; a timeout is
//! surfaced as silence, not an error.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::config::ListenConfig;

pub enum CaptureBackend {
    /// POSTs to a speech-recognition endpoint returning {"text": "..."}.
    Http { client: Client, url: String },
    /// Reads one line from stdin (text mode).
    Stdin,
}

impl CaptureBackend {
    pub fn http(url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");
        Self::Http {
            client,
            url: url.to_string(),
        }
    }

    async fn capture(&self) -> Result<String> {
        match self {
            Self::Http { client, url } => {
                let resp = client
                    .post(url)
                    .send()
                    .await
                    .with_context(|| format!("ASR request to {url} failed"))?;
                if !resp.status().is_success() {
                    return Err(anyhow!("ASR endpoint returned status {}", resp.status()));
                }
                let data: serde_json::Value = resp
                    .json()
                    .await
                    .context("Failed to parse ASR response")?;
                Ok(data["text"].as_str().unwrap_or("").trim().to_lowercase())
            }
            Self::Stdin => {
                let mut line = String::new();
                let mut reader = BufReader::new(tokio::io::stdin());
                let n = reader
                    .read_line(&mut line)
                    .await
                    .context("Failed to read stdin")?;
                if n == 0 {
                    // EOF behaves like silence.
                    return Ok(String::new());
                }
                Ok(line.trim().to_lowercase())
            }
        }
    }
}

pub struct UtteranceSource {
    primary: CaptureBackend,
    fallback: Option<CaptureBackend>,
}

impl UtteranceSource {
    pub fn new(primary: CaptureBackend, fallback: Option<CaptureBackend>) -> Self {
        Self { primary, fallback }
    }

    /// Voice mode listens on the ASR endpoint with stdin as the fallback;
    /// text mode reads stdin only.
    pub fn from_config(config: &ListenConfig) -> Self {
        if config.mode == "voice" {
            Self::new(
                CaptureBackend::http(&config.asr_url),
                Some(CaptureBackend::Stdin),
            )
        } else {
            Self::new(CaptureBackend::Stdin, None)
        }
    }

    /// Capture one utterance, failing over once, bounded by `timeout`.
    ///
    /// Cancellation-safe: dropping the returned future aborts the in-flight
    /// capture without leaking the backend.
    pub async fn capture(&self, timeout: Duration) -> String {
        match tokio::time::timeout(timeout, self.capture_with_fallback()).await {
            Ok(text) => text,
            Err(_) => {
                debug!("Capture timed out after {timeout:?}");
                String::new()
            }
        }
    }

    async fn capture_with_fallback(&self) -> String {
        match self.primary.capture().await {
            Ok(text) if !text.is_empty() => return text,
            Ok(_) => debug!("Primary capture heard nothing"),
            Err(e) => warn!("Primary capture failed: {e:#}"),
        }

        let Some(fallback) = &self.fallback else {
            return String::new();
        };

        match fallback.capture().await {
            Ok(text) => text,
            Err(e) => {
                warn!("Fallback capture failed: {e:#}");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    async fn spawn_asr_stub(text: &'static str) -> String {
        let app = Router::new().route(
            "/listen",
            post(move || async move { Json(json!({ "text": text })) }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/listen")
    }

    #[tokio::test]
    async fn primary_result_is_used_when_it_hears_something() {
        let url = spawn_asr_stub("Tell Me A Joke").await;
        let source = UtteranceSource::new(CaptureBackend::http(&url), None);

        let text = source.capture(Duration::from_secs(5)).await;
        assert_eq!(text, "tell me a joke");
    }

    #[tokio::test]
    async fn failing_primary_fails_over_to_fallback() {
        // Nothing listens on this port.
        let dead = CaptureBackend::http("http://127.0.0.1:9/listen");
        let url = spawn_asr_stub("open website example.com").await;
        let source = UtteranceSource::new(dead, Some(CaptureBackend::http(&url)));

        let text = source.capture(Duration::from_secs(5)).await;
        assert_eq!(text, "open website example.com");
    }

    #[tokio::test]
    async fn silent_primary_fails_over_to_fallback() {
        let silent = spawn_asr_stub("").await;
        let heard = spawn_asr_stub("hello").await;
        let source = UtteranceSource::new(
            CaptureBackend::http(&silent),
            Some(CaptureBackend::http(&heard)),
        );

        let text = source.capture(Duration::from_secs(5)).await;
        assert_eq!(text, "hello");
    }

    #[tokio::test]
    async fn total_silence_yields_empty_utterance() {
        let silent = spawn_asr_stub("").await;
        let source = UtteranceSource::new(CaptureBackend::http(&silent), None);

        let text = source.capture(Duration::from_secs(5)).await;
        assert!(text.is_empty());
    }
}
