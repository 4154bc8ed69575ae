//! Action execution with isolated failure handling.
//!
//! Each resolved command runs on its own tokio task so a slow or failing
//! action never blocks utterance intake or the reminder poll. Every handler
//! validates its own parameters, performs at most one outbound call, and
//! converts any failure into a spoken apology plus a log entry. Nothing a
//! handler does can escape to the intake loop; Exit is the only action
//! allowed to halt it.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::actions::email::{Mailer, RecipientPolicy};
use crate::actions::joke::JokeClient;
use crate::actions::launcher::{AppLauncher, LaunchOutcome};
use crate::actions::news::NewsClient;
use crate::actions::ollama::FallbackResponder;
use crate::actions::weather::WeatherClient;
use crate::actions::web::WebOpener;
use crate::command::{ActionKind, ResolvedCommand};
use crate::config::Config;
use crate::listener::UtteranceSource;
use crate::reminders::ReminderStore;
use crate::speaker::Speaker;

pub struct ActionExecutor {
    weather: WeatherClient,
    news: NewsClient,
    joke: JokeClient,
    mailer: Mailer,
    recipient_policy: RecipientPolicy,
    launcher: AppLauncher,
    fallback: FallbackResponder,
    reminders: ReminderStore,
    speaker: Speaker,
    source: Arc<UtteranceSource>,
    capture_timeout: Duration,
    shutdown: watch::Sender<bool>,
}

impl ActionExecutor {
    pub fn new(
        config: &Config,
        reminders: ReminderStore,
        speaker: Speaker,
        source: Arc<UtteranceSource>,
        shutdown: watch::Sender<bool>,
    ) -> Self {
        Self {
            weather: WeatherClient::new(config.weather.clone()),
            news: NewsClient::new(config.news.clone()),
            joke: JokeClient::new(config.joke.clone()),
            mailer: Mailer::new(config.email.clone()),
            recipient_policy: RecipientPolicy::new(&config.email.allowed_recipients),
            launcher: AppLauncher::new(config.apps.clone()),
            fallback: FallbackResponder::new(config.ollama.clone()),
            reminders,
            speaker,
            source,
            capture_timeout: Duration::from_secs(config.listen.timeout_secs),
            shutdown,
        }
    }

    /// Run one command on its own task. Fire-and-forget from the caller.
    pub fn spawn(self: &Arc<Self>, cmd: ResolvedCommand) -> JoinHandle<()> {
        let executor = Arc::clone(self);
        tokio::spawn(async move {
            executor.execute(cmd).await;
        })
    }

    /// Dispatch a command to its handler. Exhaustive over `ActionKind`.
    pub async fn execute(&self, cmd: ResolvedCommand) {
        match cmd.kind {
            ActionKind::GetWeather => self.get_weather(&cmd).await,
            ActionKind::GetForecast => self.get_forecast(&cmd).await,
            ActionKind::GetNews => self.get_news().await,
            ActionKind::SetReminder => self.set_reminder(&cmd),
            ActionKind::TellJoke => self.tell_joke().await,
            ActionKind::SendEmail => self.send_email().await,
            ActionKind::OpenWebsite => self.open_website(&cmd).await,
            ActionKind::OpenReddit => self.open_reddit(&cmd).await,
            ActionKind::OpenApp => self.open_app(&cmd).await,
            ActionKind::Greeting => self.speaker.announce("Just chilling, ready to assist!"),
            ActionKind::Exit => self.exit(),
            ActionKind::Fallback => self.fall_back(&cmd).await,
            // Empty utterance: no command this cycle.
            ActionKind::Unresolved => {}
        }
    }

    async fn get_weather(&self, cmd: &ResolvedCommand) {
        let Some(city) = cmd.param("city") else {
            self.speaker.announce("Please specify a city for the weather.");
            return;
        };

        match self.weather.current(city).await {
            Ok(summary) => self.speaker.announce(summary),
            Err(e) => {
                error!("Weather fetch error: {e:#}");
                self.speaker
                    .announce(format!("Sorry, I couldn't fetch the weather for {city}."));
            }
        }
    }

    async fn get_forecast(&self, cmd: &ResolvedCommand) {
        let Some(city) = cmd.param("city") else {
            self.speaker.announce("Please specify a city for the forecast.");
            return;
        };

        match self.weather.forecast(city).await {
            Ok(days) => {
                for day in days {
                    self.speaker.announce(day);
                }
            }
            Err(e) => {
                error!("Forecast fetch error: {e:#}");
                self.speaker
                    .announce(format!("Sorry, I couldn't fetch the forecast for {city}."));
            }
        }
    }

    async fn get_news(&self) {
        match self.news.headlines().await {
            Ok(titles) => {
                for (i, title) in titles.iter().enumerate() {
                    self.speaker.announce(format!("News {}: {title}", i + 1));
                }
            }
            Err(e) => {
                error!("News fetch error: {e:#}");
                self.speaker.announce("Sorry, I couldn't fetch the news.");
            }
        }
    }

    async fn tell_joke(&self) {
        match self.joke.fetch().await {
            Ok(joke) => {
                info!("Told joke: {joke}");
                self.speaker.announce(joke);
            }
            Err(e) => {
                error!("Joke fetch error: {e:#}");
                self.speaker.announce("Sorry, I couldn't fetch a joke.");
            }
        }
    }

    fn set_reminder(&self, cmd: &ResolvedCommand) {
        let (Some(text), Some(minutes)) = (cmd.param("reminder_text"), cmd.param("minutes"))
        else {
            self.speaker
                .announce("Please specify a reminder and time in minutes.");
            return;
        };

        // fire_at must be strictly in the future.
        let minutes: i64 = match minutes.parse() {
            Ok(m) if m > 0 => m,
            _ => {
                self.speaker
                    .announce("Please specify a reminder and time in minutes.");
                return;
            }
        };

        // Absurdly large delays overflow the timestamp; treat them like
        // any other invalid input.
        let fire_at = chrono::Duration::try_minutes(minutes)
            .and_then(|delta| Local::now().checked_add_signed(delta));
        let Some(fire_at) = fire_at else {
            self.speaker
                .announce("Please specify a reminder and time in minutes.");
            return;
        };

        self.reminders.insert(fire_at, text.to_string());
        info!("Reminder set: {text} at {fire_at}");
        self.speaker.announce(format!(
            "Reminder set for {text} at {}.",
            fire_at.format("%H:%M")
        ));
    }

    /// Two-turn interaction: ask for a recipient, gate on the allow-list,
    /// then ask for the body and send.
    async fn send_email(&self) {
        self.speaker.announce("Who is the recipient?");
        let recipient = self.source.capture(self.capture_timeout).await;

        if !self.recipient_policy.allows(&recipient) {
            info!("Email recipient rejected by policy: \"{recipient}\"");
            self.speaker.announce(format!(
                "I only know how to send emails to {}.",
                self.recipient_policy.describe()
            ));
            return;
        }

        self.speaker.announce("What should I say?");
        let content = self.source.capture(self.capture_timeout).await;
        if content.is_empty() {
            self.speaker.announce("I didn't catch a message, so nothing was sent.");
            return;
        }

        match self.mailer.send(&content).await {
            Ok(()) => self.speaker.announce("Email sent."),
            Err(e) => {
                error!("Email error: {e:#}");
                self.speaker.announce("Failed to send email.");
            }
        }
    }

    async fn open_website(&self, cmd: &ResolvedCommand) {
        let Some(domain) = cmd.param("domain") else {
            self.speaker.announce("Please specify a website to open.");
            return;
        };

        let url = WebOpener::website_url(domain);
        match WebOpener::open(&url).await {
            Ok(()) => self.speaker.announce(format!("Opening {domain}")),
            Err(e) => {
                error!("Website open error: {e:#}");
                self.speaker.announce(format!("Failed to open {domain}."));
            }
        }
    }

    async fn open_reddit(&self, cmd: &ResolvedCommand) {
        let subreddit = cmd.param("subreddit");
        let url = WebOpener::reddit_url(subreddit);
        match WebOpener::open(&url).await {
            Ok(()) => match subreddit {
                Some(sub) => self.speaker.announce(format!("Opening Reddit subreddit {sub}")),
                None => self.speaker.announce("Opening Reddit"),
            },
            Err(e) => {
                error!("Reddit open error: {e:#}");
                self.speaker.announce("Failed to open Reddit.");
            }
        }
    }

    async fn open_app(&self, cmd: &ResolvedCommand) {
        let Some(app) = cmd.param("app_name") else {
            self.speaker.announce("Please specify an application to open.");
            return;
        };

        match self.launcher.launch(app).await {
            Ok(LaunchOutcome::Launched) => self.speaker.announce(format!("Opening {app}")),
            Ok(LaunchOutcome::UnknownApp) => {
                info!("App not on whitelist: {app}");
                self.speaker
                    .announce(format!("Sorry, I don't know how to open {app}."));
            }
            Err(e) => {
                error!("App open error: {e:#}");
                self.speaker.announce(format!("Failed to open {app}."));
            }
        }
    }

    fn exit(&self) {
        self.speaker.announce("Goodbye!");
        if self.shutdown.send(true).is_err() {
            warn!("Shutdown channel closed before exit");
        }
    }

    async fn fall_back(&self, cmd: &ResolvedCommand) {
        let utterance = cmd.param("utterance").unwrap_or_default();
        if self.fallback.is_enabled() {
            if let Some(reply) = self.fallback.respond(utterance).await {
                self.speaker.announce(reply);
                return;
            }
        }
        self.speaker.announce("I don't understand that command.");
    }
}
