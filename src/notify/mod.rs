mod config;
mod email;
mod teams;
#[cfg(test)]
mod tests;

use async_trait::async_trait;
use log::{error, info, warn};

use crate::error::Result;

pub use {
    config::{EmailConfig, NotifyConfig},
    email::EmailChannel,
    teams::TeamsChannel,
};

pub const SUCCESS_COLOR: &str = "00FF00";
pub const FAILURE_COLOR: &str = "FF0000";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub title: String,
    pub body: String,
    pub color: &'static str,
}

#[async_trait]
pub trait Channel: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, message: &Message) -> Result<()>;
}

/// One outbound channel, as far as the environment allows it.
pub enum Slot {
    Disabled,
    Unconfigured(String),
    Ready(Box<dyn Channel>),
}

impl Slot {
    async fn send(&self, message: &Message) -> bool {
        match self {
            Slot::Disabled => false,
            Slot::Unconfigured(reason) => {
                warn!("Skipping notification - {reason}");
                false
            }
            Slot::Ready(channel) => match channel.send(message).await {
                Ok(()) => {
                    info!("{} notification sent successfully", channel.name());
                    true
                }
                Err(err) => {
                    error!("{} notification failed: {err}", channel.name());
                    false
                }
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub email_sent: bool,
    pub teams_sent: bool,
}

pub struct Dispatcher {
    email: Slot,
    teams: Slot,
}

impl Dispatcher {
    pub fn new(email: Slot, teams: Slot) -> Self {
        Dispatcher { email, teams }
    }

    pub fn from_config(config: &NotifyConfig) -> Self {
        Dispatcher::new(email_slot(config, false), teams_slot(config, false))
    }

    /// Sends the end-of-run report through every enabled channel. A failing
    /// channel never keeps the other one from being tried.
    pub async fn dispatch(&self, report: &str, success: bool) -> DispatchOutcome {
        let title = run_title(success);
        let color = if success { SUCCESS_COLOR } else { FAILURE_COLOR };
        let verdict = if success {
            "succeeded"
        } else {
            "completed with issues"
        };

        let email = Message {
            title: title.clone(),
            body: format!("{report}\n\nOperation {verdict}"),
            color,
        };
        let teams = Message {
            title,
            body: report.replace('\n', "\n\n"),
            color,
        };

        let outcome = DispatchOutcome {
            email_sent: self.email.send(&email).await,
            teams_sent: self.teams.send(&teams).await,
        };

        info!("{}", summary_line(&outcome));
        outcome
    }
}

pub fn summary_line(outcome: &DispatchOutcome) -> String {
    format!(
        "Notifications: Email {}, Teams {}",
        sent(outcome.email_sent),
        sent(outcome.teams_sent)
    )
}

pub fn run_title(success: bool) -> String {
    let status = if success {
        "✅ Succeeded"
    } else {
        "⚠️ Completed with Issues"
    };
    format!("Glacier Restore {status}")
}

/// Slot for the email channel. `force` ignores the enable flag.
pub fn email_slot(config: &NotifyConfig, force: bool) -> Slot {
    if !force && !config.email_enabled {
        return Slot::Disabled;
    }

    match &config.email {
        Ok(email) => Slot::Ready(Box::new(EmailChannel::new(email.clone()))),
        Err(missing) => Slot::Unconfigured(format!(
            "missing environment variables: {}",
            missing.join(", ")
        )),
    }
}

/// Slot for the webhook channel. `force` ignores the enable flag.
pub fn teams_slot(config: &NotifyConfig, force: bool) -> Slot {
    if !force && !config.teams_enabled {
        return Slot::Disabled;
    }

    let Some(url) = &config.teams_webhook else {
        return Slot::Unconfigured(format!("{} not set", config::ENV_TEAMS_WEBHOOK_URL));
    };

    match TeamsChannel::new(url.clone()) {
        Ok(channel) => Slot::Ready(Box::new(channel)),
        Err(err) => Slot::Unconfigured(err.to_string()),
    }
}

/// Sends `message` through a single slot, for the self-test entry points.
pub async fn send_one(slot: &Slot, message: &Message) -> bool {
    slot.send(message).await
}

fn sent(flag: bool) -> &'static str {
    if flag {
        "sent"
    } else {
        "not sent"
    }
}
