//! desk-assistant-rs: voice/text-driven desktop assistant.

mod actions;
mod assistant;
mod command;
mod config;
mod executor;
mod listener;
mod reminders;
mod speaker;

use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "desk-assistant-rs", about = "Voice/text-driven desktop assistant")]
struct Args {
    /// Path to config.yaml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input mode: text (stdin) or voice (ASR endpoint with stdin fallback)
    #[arg(short, long)]
    mode: Option<String>,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug,hyper=info,reqwest=info")
    } else {
        EnvFilter::new("info,hyper=warn,reqwest=warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("desk-assistant-rs starting");

    // Credentials come from the environment; a local .env is honored.
    dotenv::dotenv().ok();

    let mut config = config::Config::load(args.config.as_deref());
    if let Some(mode) = args.mode {
        config.listen.mode = mode;
    }

    if config.weather.api_key.is_empty() {
        tracing::warn!("WEATHER_API_KEY not set, weather requests will fail");
    }
    if config.news.api_key.is_empty() {
        tracing::warn!("NEWS_API_KEY not set, news requests will fail");
    }

    assistant::AssistantService::new(config).run().await
}
