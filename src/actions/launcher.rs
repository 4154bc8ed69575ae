//! Whitelisted desktop application launcher.

use std::collections::HashMap;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::info;

use crate::config::AppsConfig;

#[derive(Debug, PartialEq, Eq)]
pub enum LaunchOutcome {
    Launched,
    /// Policy rejection, not a failure: the app is not on the whitelist.
    UnknownApp,
}

pub struct AppLauncher {
    whitelist: HashMap<String, String>,
}

impl AppLauncher {
    pub fn new(config: AppsConfig) -> Self {
        Self {
            whitelist: config.whitelist,
        }
    }

    pub async fn launch(&self, app: &str) -> Result<LaunchOutcome> {
        let Some(program) = self.whitelist.get(app) else {
            return Ok(LaunchOutcome::UnknownApp);
        };

        // Spawn and detach; the app outlives the handler.
        Command::new(program)
            .spawn()
            .with_context(|| format!("Failed to launch {program}"))?;
        info!("Opened application: {app} ({program})");
        Ok(LaunchOutcome::Launched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppsConfig;

    #[tokio::test]
    async fn unknown_app_is_a_policy_rejection_not_an_error() {
        let launcher = AppLauncher::new(AppsConfig::default());
        let outcome = launcher.launch("photoshop").await.unwrap();
        assert_eq!(outcome, LaunchOutcome::UnknownApp);
    }

    #[tokio::test]
    async fn missing_program_is_a_recoverable_error() {
        let mut whitelist = HashMap::new();
        whitelist.insert("notepad".to_string(), "definitely-not-a-binary".to_string());
        let launcher = AppLauncher::new(AppsConfig { whitelist });

        assert!(launcher.launch("notepad").await.is_err());
    }
}
