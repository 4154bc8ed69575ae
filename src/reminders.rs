//! One-shot reminder store and polling scheduler.
//!
//! Reminders live in memory only, keyed by fire time. The executor inserts;
//! the scheduler owns the poll-and-delete cycle. Scan and delete happen
//! under one lock so a concurrent insert can never be lost mid-scan.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::speaker::Speaker;

/// Shared handle to the pending-reminder map.
///
/// Two reminders with an identical fire time collide; last write wins.
#[derive(Clone, Default)]
pub struct ReminderStore {
    inner: Arc<Mutex<BTreeMap<DateTime<Local>, String>>>,
}

impl ReminderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, fire_at: DateTime<Local>, text: String) {
        let mut map = self.inner.lock().unwrap();
        map.insert(fire_at, text);
    }

    /// Remove and return every reminder due at or before `now`, oldest first.
    pub fn take_due(&self, now: DateTime<Local>) -> Vec<(DateTime<Local>, String)> {
        let mut map = self.inner.lock().unwrap();
        let due_keys: Vec<DateTime<Local>> =
            map.range(..=now).map(|(fire_at, _)| *fire_at).collect();
        due_keys
            .into_iter()
            .filter_map(|fire_at| map.remove(&fire_at).map(|text| (fire_at, text)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Polls the store at a fixed interval and announces due reminders.
///
/// Worst-case announcement latency equals the poll interval; that is the
/// accepted trade-off of the polling design.
pub struct ReminderScheduler {
    store: ReminderStore,
    speaker: Speaker,
    poll_interval: Duration,
}

impl ReminderScheduler {
    pub fn new(store: ReminderStore, speaker: Speaker, poll_interval: Duration) -> Self {
        Self {
            store,
            speaker,
            poll_interval,
        }
    }

    /// Run the poll loop in the background until the shutdown flag flips.
    pub fn spawn(self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.poll_interval);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        for (fire_at, text) in self.store.take_due(Local::now()) {
                            info!("Reminder due (set for {}): {text}", fire_at.format("%H:%M"));
                            self.speaker.announce(format!("Reminder: {text}"));
                        }
                    }
                    _ = shutdown.changed() => {
                        if *shutdown.borrow() {
                            debug!("Reminder scheduler stopping");
                            break;
                        }
                    }
                }
            }
        })
    }
}
