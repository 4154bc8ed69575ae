//! Main service orchestration.
//!
//! One cooperative loop drives utterance intake; reminder polling and
//! announcement rendering run as independent tasks sharing the runtime.
//! Capture is awaited with a bounded timeout so the loop periodically
//! yields, and each resolved command executes on its own task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::command::{resolve, ActionKind};
use crate::config::Config;
use crate::executor::ActionExecutor;
use crate::listener::UtteranceSource;
use crate::reminders::{ReminderScheduler, ReminderStore};
use crate::speaker::{self, Speaker};

pub struct AssistantService {
    config: Config,
}

impl AssistantService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let (speaker, speech_rx) = Speaker::channel(self.config.speech.queue_size);
        let speaker_handle = speaker::run_worker(speech_rx, self.config.speech.clone());

        let reminders = ReminderStore::new();
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let scheduler = ReminderScheduler::new(
            reminders.clone(),
            speaker.clone(),
            Duration::from_secs(self.config.reminders.poll_interval_secs),
        );
        let scheduler_handle = scheduler.spawn(shutdown_tx.subscribe());

        let source = Arc::new(UtteranceSource::from_config(&self.config.listen));
        let executor = Arc::new(ActionExecutor::new(
            &self.config,
            reminders,
            speaker.clone(),
            Arc::clone(&source),
            shutdown_tx.clone(),
        ));

        let capture_timeout = Duration::from_secs(self.config.listen.timeout_secs);
        info!("Assistant ready (mode: {})", self.config.listen.mode);
        speaker.announce("I am ready for your command");

        loop {
            tokio::select! {
                // Stopping aborts the in-flight capture by dropping it.
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted, shutting down");
                    let _ = shutdown_tx.send(true);
                    break;
                }
                utterance = source.capture(capture_timeout) => {
                    if utterance.is_empty() {
                        continue;
                    }
                    info!("You said: {utterance}");

                    let cmd = resolve(&utterance);
                    if cmd.kind == ActionKind::Unresolved {
                        continue;
                    }
                    // Never awaited inline: slow actions must not stall intake.
                    let _ = executor.spawn(cmd);
                }
            }
        }

        // Drain in order: scheduler first, then the announcement queue with
        // its explicit shutdown marker. In-flight actions finish on their own.
        if let Err(e) = scheduler_handle.await {
            warn!("Reminder scheduler task failed: {e}");
        }
        speaker.shutdown().await;
        if let Err(e) = speaker_handle.await {
            warn!("Speaker worker task failed: {e}");
        }

        info!("Assistant stopped");
        Ok(())
    }
}
