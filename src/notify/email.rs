use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
};

use crate::error::Result;

use super::{Channel, EmailConfig, Message};

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Plain-text mail over SMTP with STARTTLS and login.
pub struct EmailChannel {
    config: EmailConfig,
}

impl EmailChannel {
    pub fn new(config: EmailConfig) -> Self {
        EmailChannel { config }
    }

    fn build(&self, message: &Message) -> Result<lettre::Message> {
        let mut builder = lettre::Message::builder()
            .from(self.config.sender.parse::<Mailbox>()?)
            .subject(message.title.as_str())
            .header(ContentType::TEXT_PLAIN);

        for recipient in self.config.recipient.split(',').map(str::trim) {
            if !recipient.is_empty() {
                builder = builder.to(recipient.parse::<Mailbox>()?);
            }
        }

        Ok(builder.body(message.body.clone())?)
    }
}

#[async_trait]
impl Channel for EmailChannel {
    fn name(&self) -> &'static str {
        "Email"
    }

    async fn send(&self, message: &Message) -> Result<()> {
        let email = self.build(message)?;
        let credentials = Credentials::new(self.config.username.clone(), self.config.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.server_host)?
            .port(self.config.server_port)
            .credentials(credentials)
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        transport.send(email).await?;
        Ok(())
    }
}
