//! SMTP email sending with a configurable recipient allow-list.
//!
//! One SMTP session per send. The allow-list replaces the demo-era
//! "only John" check: a recipient is accepted when it contains any
//! configured entry.

use anyhow::{Context, Result};
use lettre::message::Message;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::info;

use crate::config::EmailConfig;

/// Who the assistant is willing to email.
#[derive(Debug, Clone)]
pub struct RecipientPolicy {
    allowed: Vec<String>,
}

impl RecipientPolicy {
    pub fn new(entries: &[String]) -> Self {
        Self {
            allowed: entries.iter().map(|e| e.to_lowercase()).collect(),
        }
    }

    pub fn allows(&self, recipient: &str) -> bool {
        let recipient = recipient.to_lowercase();
        self.allowed.iter().any(|entry| recipient.contains(entry))
    }

    /// Spoken description of the allow-list for rejection messages.
    pub fn describe(&self) -> String {
        self.allowed.join(" or ")
    }
}

pub struct Mailer {
    config: EmailConfig,
}

impl Mailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    pub async fn send(&self, content: &str) -> Result<()> {
        let message = Message::builder()
            .from(
                self.config
                    .username
                    .parse()
                    .context("Invalid sender address (EMAIL_USER)")?,
            )
            .to(self
                .config
                .recipient_address
                .parse()
                .context("Invalid recipient address")?)
            .subject("Message from your desk assistant")
            .body(content.to_string())
            .context("Failed to build email")?;

        let credentials =
            Credentials::new(self.config.username.clone(), self.config.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)
            .context("Invalid SMTP host")?
            .port(self.config.smtp_port)
            .credentials(credentials)
            .build();

        transport.send(message).await.context("SMTP send failed")?;
        info!("Email sent to {}", self.config.recipient_address);
        Ok(())
    }
}
