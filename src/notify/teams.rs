use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use serde::Serialize;

use crate::{
    error::{Error, Result},
    format::format_time,
};

use super::{Channel, Message};

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize, Debug)]
struct MessageCard<'a> {
    #[serde(rename = "@type")]
    kind: &'static str,
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(rename = "themeColor")]
    theme_color: &'a str,
    summary: &'a str,
    sections: Vec<Section<'a>>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Section<'a> {
    activity_title: &'a str,
    activity_subtitle: String,
    text: &'a str,
}

impl<'a> MessageCard<'a> {
    fn new(message: &'a Message, sent_at: &DateTime<Local>) -> Self {
        MessageCard {
            kind: "MessageCard",
            context: "http://schema.org/extensions",
            theme_color: message.color,
            summary: &message.title,
            sections: vec![Section {
                activity_title: &message.title,
                activity_subtitle: format_time(sent_at),
                text: &message.body,
            }],
        }
    }
}

/// Posts a MessageCard to an incoming webhook. Anything but 200 is a failure.
pub struct TeamsChannel {
    client: Client,
    webhook_url: String,
}

impl TeamsChannel {
    pub fn new(webhook_url: String) -> Result<Self> {
        let client = Client::builder().timeout(WEBHOOK_TIMEOUT).build()?;
        Ok(TeamsChannel {
            client,
            webhook_url,
        })
    }
}

#[async_trait]
impl Channel for TeamsChannel {
    fn name(&self) -> &'static str {
        "Teams"
    }

    async fn send(&self, message: &Message) -> Result<()> {
        let card = MessageCard::new(message, &Local::now());
        let body = serde_json::to_vec(&card)?;

        let response = self
            .client
            .post(&self.webhook_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(Error::WebhookStatus {
            status: status.as_u16(),
            body,
        })
    }
}
