//! Ollama responder for commands no rule matched.
//!
//! Sends the raw utterance to Ollama's /api/generate endpoint and speaks
//! the reply. Disabled deployments fall back to a plain "I don't
//! understand" from the executor.

use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::OllamaConfig;

const PROMPT_TEMPLATE: &str = r#"You are a desktop voice assistant. Answer the user in one or two short spoken sentences. Output ONLY the answer, nothing else.

User said: {text}

Answer:"#;

pub struct FallbackResponder {
    config: OllamaConfig,
    client: Client,
}

impl FallbackResponder {
    pub fn new(config: OllamaConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Ask the model for a reply. Returns None when disabled, unreachable,
    /// or the model produced nothing usable.
    pub async fn respond(&self, utterance: &str) -> Option<String> {
        if !self.config.enabled || utterance.trim().is_empty() {
            return None;
        }

        let prompt = PROMPT_TEMPLATE.replace("{text}", utterance);
        let body = json!({
            "model": self.config.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "temperature": 0.3,
                "num_predict": 200
            }
        });

        let url = format!("{}/api/generate", self.config.host);
        debug!("Routing unresolved command to Ollama model '{}'", self.config.model);

        match self.client.post(&url).json(&body).send().await {
            Ok(resp) => {
                if !resp.status().is_success() {
                    warn!("Ollama returned status {}", resp.status());
                    return None;
                }
                match resp.json::<serde_json::Value>().await {
                    Ok(data) => {
                        let reply = data["response"].as_str().unwrap_or("").trim().to_string();
                        if reply.is_empty() {
                            warn!("Ollama returned empty response");
                            None
                        } else {
                            Some(reply)
                        }
                    }
                    Err(e) => {
                        warn!("Failed to parse Ollama response: {e}");
                        None
                    }
                }
            }
            Err(e) => {
                if e.is_connect() {
                    warn!("Cannot connect to Ollama at {}", self.config.host);
                } else {
                    warn!("Ollama request failed: {e}");
                }
                None
            }
        }
    }
}
