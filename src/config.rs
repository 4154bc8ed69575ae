//! Configuration management for desk-assistant-rs.
//!
//! Loads config from YAML files in standard locations. API keys and SMTP
//! credentials come from the environment (optionally via a .env file) and
//! override anything in the YAML.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenConfig {
    /// "text" reads commands from stdin; "voice" uses the ASR endpoint
    /// with stdin as the fallback strategy.
    pub mode: String,
    /// Speech-recognition HTTP endpoint, expected to return {"text": "..."}.
    pub asr_url: String,
    /// Per-cycle capture timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            mode: "text".into(),
            asr_url: "http://localhost:8901/listen".into(),
            timeout_secs: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub base_url: String,
    pub api_key: String,
    pub forecast_days: u8,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: "http://api.weatherapi.com/v1".into(),
            api_key: String::new(),
            forecast_days: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub base_url: String,
    pub api_key: String,
    pub country: String,
    pub max_headlines: usize,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://newsapi.org/v2".into(),
            api_key: String::new(),
            country: "us".into(),
            max_headlines: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JokeConfig {
    pub url: String,
}

impl Default for JokeConfig {
    fn default() -> Self {
        Self {
            url: "https://icanhazdadjoke.com/".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    /// Recipients are accepted when they contain any of these entries.
    pub allowed_recipients: Vec<String>,
    /// Actual destination address for accepted sends.
    pub recipient_address: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".into(),
            smtp_port: 587,
            username: String::new(),
            password: String::new(),
            allowed_recipients: vec!["john".into()],
            recipient_address: "recipient@example.com".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppsConfig {
    /// Spoken app name → program to launch.
    pub whitelist: HashMap<String, String>,
}

impl Default for AppsConfig {
    fn default() -> Self {
        let mut whitelist = HashMap::new();
        if cfg!(target_os = "windows") {
            whitelist.insert("notepad".to_string(), "notepad".to_string());
            whitelist.insert("calculator".to_string(), "calc".to_string());
        } else {
            whitelist.insert("notepad".to_string(), "gedit".to_string());
            whitelist.insert("calculator".to_string(), "gnome-calculator".to_string());
        }
        Self { whitelist }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Speak responses aloud via spd-say/espeak.
    pub enabled: bool,
    /// Also show desktop notifications.
    pub notifications: bool,
    /// Bounded size of the announcement queue.
    pub queue_size: usize,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            notifications: false,
            queue_size: 64,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// How often the scheduler scans for due reminders, in seconds.
    pub poll_interval_secs: u64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// When enabled, unrecognized commands are answered by the model.
    pub enabled: bool,
    pub model: String,
    pub host: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            model: "llama3.2:3b".into(),
            host: "http://localhost:11434".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen: ListenConfig,
    pub weather: WeatherConfig,
    pub news: NewsConfig,
    pub joke: JokeConfig,
    pub email: EmailConfig,
    pub apps: AppsConfig,
    pub speech: SpeechConfig,
    pub reminders: ReminderConfig,
    pub ollama: OllamaConfig,
}

impl Config {
    /// Load configuration from YAML file.
    ///
    /// Searches standard locations if no path is provided:
    /// 1. ./config.yaml
    /// 2. ~/.config/desk-assistant/config.yaml
    /// 3. /etc/desk-assistant/config.yaml
    pub fn load(path: Option<&Path>) -> Self {
        let resolved = path.map(PathBuf::from).or_else(|| {
            let candidates = [
                std::env::current_dir().ok().map(|d| d.join("config.yaml")),
                dirs::home_dir().map(|h| h.join(".config/desk-assistant/config.yaml")),
                Some(PathBuf::from("/etc/desk-assistant/config.yaml")),
            ];
            candidates.into_iter().flatten().find(|p| p.exists())
        });

        let mut config = match resolved {
            Some(config_path) => match std::fs::read_to_string(&config_path) {
                Ok(contents) => match serde_yml::from_str(&contents) {
                    Ok(config) => {
                        info!("Loaded config from {}", config_path.display());
                        config
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Failed to parse {}: {e}, using defaults",
                            config_path.display()
                        );
                        Self::default()
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        "Failed to read {}: {e}, using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            None => {
                info!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env();
        config
    }

    /// Credentials from the environment win over YAML values.
    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("WEATHER_API_KEY") {
            self.weather.api_key = key;
        }
        if let Ok(key) = std::env::var("NEWS_API_KEY") {
            self.news.api_key = key;
        }
        if let Ok(user) = std::env::var("EMAIL_USER") {
            self.email.username = user;
        }
        if let Ok(pass) = std::env::var("EMAIL_PASS") {
            self.email.password = pass;
        }
    }
}
