//! Browser opening for websites and Reddit.

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::info;

pub struct WebOpener;

impl WebOpener {
    pub fn website_url(domain: &str) -> String {
        format!("https://www.{domain}")
    }

    pub fn reddit_url(subreddit: Option<&str>) -> String {
        match subreddit {
            Some(sub) if !sub.is_empty() => format!("https://www.reddit.com/r/{sub}"),
            _ => "https://www.reddit.com/".to_string(),
        }
    }

    /// Open a URL in the default browser with the OS launcher command.
    pub async fn open(url: &str) -> Result<()> {
        let mut command = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", "start", url]);
            c
        } else if cfg!(target_os = "macos") {
            let mut c = Command::new("open");
            c.arg(url);
            c
        } else {
            let mut c = Command::new("xdg-open");
            c.arg(url);
            c
        };

        command
            .spawn()
            .with_context(|| format!("Failed to open {url}"))?;
        info!("Opened URL: {url}");
        Ok(())
    }
}
