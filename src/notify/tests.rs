use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use anyhow::anyhow;
use async_trait::async_trait;

use crate::error::Result;

use super::{
    config::DEFAULT_SMTP_PORT, email_slot, summary_line, teams_slot, Channel, DispatchOutcome,
    Dispatcher, Message, NotifyConfig, Slot, FAILURE_COLOR, SUCCESS_COLOR,
};

#[derive(Clone, Default)]
struct FakeChannel {
    sent: Arc<Mutex<Vec<Message>>>,
    fail: bool,
}

impl FakeChannel {
    fn failing() -> Self {
        FakeChannel {
            fail: true,
            ..FakeChannel::default()
        }
    }

    fn sent(&self) -> Vec<Message> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Channel for FakeChannel {
    fn name(&self) -> &'static str {
        "Fake"
    }

    async fn send(&self, message: &Message) -> Result<()> {
        self.sent.lock().unwrap().push(message.clone());
        if self.fail {
            Err(anyhow!("unreachable").into())
        } else {
            Ok(())
        }
    }
}

fn lookup(vars: &[(&str, &str)]) -> NotifyConfig {
    let vars = vars
        .iter()
        .map(|&(k, v)| (k.to_owned(), v.to_owned()))
        .collect::<HashMap<_, _>>();
    NotifyConfig::from_lookup(|name| vars.get(name).cloned())
}

const EMAIL_VARS: [(&str, &str); 5] = [
    ("EMAIL_FROM", "from@example.com"),
    ("EMAIL_TO", "to@example.com"),
    ("SMTP_SERVER", "smtp.example.com"),
    ("SMTP_USER", "user"),
    ("SMTP_PASSWORD", "secret"),
];

#[tokio::test]
async fn dispatch_both_disabled_sends_nothing() {
    let dispatcher = Dispatcher::from_config(&lookup(&[]));
    let outcome = dispatcher.dispatch("report", true).await;
    assert_eq!(outcome, DispatchOutcome::default());
    assert_eq!(
        summary_line(&outcome),
        "Notifications: Email not sent, Teams not sent"
    );
}

#[test]
fn summary_line_mixed() {
    let outcome = DispatchOutcome {
        email_sent: false,
        teams_sent: true,
    };
    assert_eq!(
        summary_line(&outcome),
        "Notifications: Email not sent, Teams sent"
    );

    let outcome = DispatchOutcome {
        email_sent: true,
        teams_sent: true,
    };
    assert_eq!(summary_line(&outcome), "Notifications: Email sent, Teams sent");
}

#[tokio::test]
async fn dispatch_failure_does_not_suppress_other_channel() {
    let email = FakeChannel::failing();
    let teams = FakeChannel::default();
    let dispatcher = Dispatcher::new(
        Slot::Ready(Box::new(email.clone())),
        Slot::Ready(Box::new(teams.clone())),
    );

    let outcome = dispatcher.dispatch("a\nb", false).await;

    assert!(!outcome.email_sent);
    assert!(outcome.teams_sent);
    assert_eq!(email.sent().len(), 1);

    let sent = teams.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].body, "a\n\nb");
    assert_eq!(sent[0].color, FAILURE_COLOR);
    assert_eq!(sent[0].title, "Glacier Restore ⚠️ Completed with Issues");
}

#[tokio::test]
async fn dispatch_email_body() {
    let email = FakeChannel::default();
    let dispatcher = Dispatcher::new(Slot::Ready(Box::new(email.clone())), Slot::Disabled);

    let outcome = dispatcher.dispatch("report", true).await;

    assert!(outcome.email_sent);
    assert!(!outcome.teams_sent);
    let sent = email.sent();
    assert_eq!(sent[0].title, "Glacier Restore ✅ Succeeded");
    assert_eq!(sent[0].body, "report\n\nOperation succeeded");
    assert_eq!(sent[0].color, SUCCESS_COLOR);
}

#[tokio::test]
async fn dispatch_unconfigured_is_not_sent() {
    let config = lookup(&[
        ("ENABLE_EMAIL_NOTIFICATIONS", "true"),
        ("ENABLE_TEAMS_NOTIFICATIONS", "TRUE"),
    ]);
    assert!(matches!(email_slot(&config, false), Slot::Unconfigured(_)));
    assert!(matches!(teams_slot(&config, false), Slot::Unconfigured(_)));

    let outcome = Dispatcher::from_config(&config).dispatch("report", true).await;
    assert_eq!(outcome, DispatchOutcome::default());
}

#[test]
fn config_defaults() {
    let config = lookup(&[]);
    assert!(!config.email_enabled);
    assert!(!config.teams_enabled);
    assert_eq!(config.teams_webhook, None);
    assert_eq!(
        config.email,
        Err(vec![
            "EMAIL_FROM",
            "EMAIL_TO",
            "SMTP_SERVER",
            "SMTP_USER",
            "SMTP_PASSWORD"
        ])
    );
}

#[test]
fn config_complete_email() {
    let config = lookup(&EMAIL_VARS);
    let email = config.email.unwrap();
    assert_eq!(email.server_port, DEFAULT_SMTP_PORT);
    assert_eq!(email.username, "user");
}

#[test]
fn config_empty_value_is_missing() {
    let mut vars = EMAIL_VARS.to_vec();
    vars[4] = ("SMTP_PASSWORD", "");
    vars.push(("SMTP_PORT", "2525"));
    assert_eq!(lookup(&vars).email, Err(vec!["SMTP_PASSWORD"]));
}

#[test]
fn config_port_and_flags() {
    let mut vars = EMAIL_VARS.to_vec();
    vars.push(("SMTP_PORT", "2525"));
    vars.push(("ENABLE_EMAIL_NOTIFICATIONS", "yes"));
    vars.push(("ENABLE_TEAMS_NOTIFICATIONS", "True"));
    vars.push(("TEAMS_WEBHOOK_URL", "https://example.com/hook"));
    let config = lookup(&vars);

    assert_eq!(config.email.as_ref().unwrap().server_port, 2525);
    assert!(!config.email_enabled);
    assert!(config.teams_enabled);
    assert!(matches!(teams_slot(&config, false), Slot::Ready(_)));
}

#[test]
fn forced_slot_ignores_flag() {
    let config = lookup(&EMAIL_VARS);
    assert!(matches!(email_slot(&config, false), Slot::Disabled));
    assert!(matches!(email_slot(&config, true), Slot::Ready(_)));
}
