use chrono::Local;
use log::{error, info};

use crate::{
    format::format_time,
    notify::{email_slot, send_one, teams_slot, Message, NotifyConfig, Slot, SUCCESS_COLOR},
};

use super::Cli;

const TEST_TITLE: &str = "TEST: Glacier Restore Notification";

/// Sends a synthetic message through each requested channel, bypassing the
/// restore workflow. Succeeds only if every requested channel delivered.
pub async fn main(cli: &Cli) -> bool {
    let config = NotifyConfig::from_env();
    let mut success = true;

    if cli.test_email {
        success &= test_email(&config).await;
    }
    if cli.test_teams {
        success &= test_teams(&config).await;
    }

    success
}

async fn test_email(config: &NotifyConfig) -> bool {
    info!("Testing email notification...");

    let server = match &config.email {
        Ok(email) => format!("{}:{}", email.server_host, email.server_port),
        Err(missing) => {
            error!(
                "Missing required environment variables: {}",
                missing.join(", ")
            );
            return false;
        }
    };

    let message = Message {
        title: TEST_TITLE.to_owned(),
        body: email_body(&server),
        color: SUCCESS_COLOR,
    };

    let sent = send_one(&email_slot(config, true), &message).await;
    if sent {
        info!("Email test succeeded! Please check your inbox.");
    }
    sent
}

async fn test_teams(config: &NotifyConfig) -> bool {
    info!("Testing Teams notification...");

    let slot = teams_slot(config, true);
    if let Slot::Unconfigured(reason) = &slot {
        error!("{reason}");
        return false;
    }

    let message = Message {
        title: TEST_TITLE.to_owned(),
        body: teams_body(),
        color: SUCCESS_COLOR,
    };

    let sent = send_one(&slot, &message).await;
    if sent {
        info!("Teams test succeeded! Please check your Teams channel.");
    }
    sent
}

fn email_body(server: &str) -> String {
    format!(
        "This is a test notification from the Glacier Restore tool.\n\n\
         If you're receiving this email, it means:\n\
         1. The notification system is working correctly\n\
         2. Your SMTP configuration is valid\n\n\
         Server: {server}\n\
         Sent at: {}",
        format_time(&Local::now())
    )
}

fn teams_body() -> String {
    format!(
        "This is a test notification from the Glacier Restore tool.\n\n\
         ✅ If you're seeing this message, it means:\n\
         - The notification system is working correctly\n\
         - Your Teams webhook URL is valid\n\n\
         Sent at: {}",
        format_time(&Local::now())
    )
}
