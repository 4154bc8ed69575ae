//! Ordered, non-blocking output channel to the user.
//!
//! Producers (action handlers, the reminder scheduler) enqueue messages on a
//! bounded channel; exactly one worker task drains them in order and renders
//! each one as a chat log line, an optional desktop notification, and
//! optional speech via spd-say with an espeak fallback.

use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::SpeechConfig;

/// Message on the announcement queue. `Shutdown` stops the worker after all
/// previously enqueued messages have been rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechMessage {
    Say(String),
    Shutdown,
}

/// Cloneable producer handle.
#[derive(Clone)]
pub struct Speaker {
    tx: mpsc::Sender<SpeechMessage>,
}

impl Speaker {
    /// Create the queue. The receiver must be handed to [`run_worker`].
    pub fn channel(queue_size: usize) -> (Self, mpsc::Receiver<SpeechMessage>) {
        let (tx, rx) = mpsc::channel(queue_size.max(1));
        (Self { tx }, rx)
    }

    /// Enqueue a message. Never blocks the caller; a full queue drops the
    /// message with a warning.
    pub fn announce(&self, text: impl Into<String>) {
        let text = text.into();
        if self.tx.try_send(SpeechMessage::Say(text)).is_err() {
            warn!("Announcement queue full, dropping message");
        }
    }

    /// Enqueue the shutdown marker so the worker drains and stops.
    ///
    /// Unlike `announce`, this waits for queue space: the marker must reach
    /// the worker even when a rendering backlog has filled the queue.
    pub async fn shutdown(&self) {
        let _ = self.tx.send(SpeechMessage::Shutdown).await;
    }
}

/// Spawn the single consumer that renders messages in enqueue order.
pub fn run_worker(mut rx: mpsc::Receiver<SpeechMessage>, config: SpeechConfig) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match msg {
                SpeechMessage::Say(text) => render(&text, &config).await,
                SpeechMessage::Shutdown => {
                    debug!("Speaker worker shutting down");
                    break;
                }
            }
        }
    })
}

async fn render(text: &str, config: &SpeechConfig) {
    info!("Assistant: {text}");

    if config.notifications {
        notify(text);
    }

    if config.enabled {
        speak(text).await;
    }
}

fn notify(text: &str) {
    if let Err(e) = notify_rust::Notification::new()
        .summary("Desk Assistant")
        .body(text)
        .icon("audio-input-microphone")
        .timeout(3000)
        .show()
    {
        warn!("Failed to show notification: {e}");
    }
}

/// Speak via spd-say, falling back to espeak when it is missing.
async fn speak(text: &str) {
    match Command::new("spd-say").arg("--wait").arg(text).status().await {
        Ok(status) if status.success() => return,
        Ok(status) => debug!("spd-say exited with {status}, trying espeak"),
        Err(e) => debug!("spd-say unavailable ({e}), trying espeak"),
    }

    if let Err(e) = Command::new("espeak").arg(text).status().await {
        debug!("espeak unavailable: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silent_config() -> SpeechConfig {
        SpeechConfig {
            enabled: false,
            notifications: false,
            queue_size: 8,
        }
    }

    #[tokio::test]
    async fn messages_are_delivered_in_enqueue_order() {
        let (speaker, mut rx) = Speaker::channel(8);
        speaker.announce("first");
        speaker.announce("second");
        speaker.announce("third");

        assert_eq!(rx.recv().await, Some(SpeechMessage::Say("first".into())));
        assert_eq!(rx.recv().await, Some(SpeechMessage::Say("second".into())));
        assert_eq!(rx.recv().await, Some(SpeechMessage::Say("third".into())));
    }

    #[tokio::test]
    async fn worker_stops_on_shutdown_marker() {
        let (speaker, rx) = Speaker::channel(8);
        let handle = run_worker(rx, silent_config());

        speaker.announce("goodbye");
        speaker.shutdown().await;

        // The worker drains the pending message and then terminates.
        handle.await.expect("worker task panicked");
    }

    #[tokio::test]
    async fn shutdown_marker_survives_a_full_queue() {
        let (speaker, rx) = Speaker::channel(1);
        // Fill the queue before the worker starts draining.
        speaker.announce("backlog");
        let handle = run_worker(rx, silent_config());

        speaker.shutdown().await;

        tokio::time::timeout(std::time::Duration::from_secs(1), handle)
            .await
            .expect("worker never terminated")
            .expect("worker task panicked");
    }

    #[tokio::test]
    async fn full_queue_drops_instead_of_blocking() {
        let (speaker, mut rx) = Speaker::channel(1);
        speaker.announce("kept");
        // Does not block even though the queue is full.
        speaker.announce("dropped");

        assert_eq!(rx.recv().await, Some(SpeechMessage::Say("kept".into())));
        assert!(rx.try_recv().is_err());
    }
}
