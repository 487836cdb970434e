use std::env;

pub const ENV_EMAIL_FROM: &str = "EMAIL_FROM";
pub const ENV_EMAIL_TO: &str = "EMAIL_TO";
pub const ENV_SMTP_SERVER: &str = "SMTP_SERVER";
pub const ENV_SMTP_PORT: &str = "SMTP_PORT";
pub const ENV_SMTP_USER: &str = "SMTP_USER";
pub const ENV_SMTP_PASSWORD: &str = "SMTP_PASSWORD";
pub const ENV_TEAMS_WEBHOOK_URL: &str = "TEAMS_WEBHOOK_URL";
pub const ENV_ENABLE_EMAIL: &str = "ENABLE_EMAIL_NOTIFICATIONS";
pub const ENV_ENABLE_TEAMS: &str = "ENABLE_TEAMS_NOTIFICATIONS";

pub const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailConfig {
    pub sender: String,
    pub recipient: String,
    pub server_host: String,
    pub server_port: u16,
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotifyConfig {
    pub email_enabled: bool,
    pub teams_enabled: bool,
    /// Names of the variables missing for email, or the complete settings.
    pub email: Result<EmailConfig, Vec<&'static str>>,
    pub teams_webhook: Option<String>,
}

impl NotifyConfig {
    pub fn from_env() -> Self {
        NotifyConfig::from_lookup(|name| env::var(name).ok())
    }

    /// Empty values count as unset.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());
        let enabled = |name: &str| {
            get(name).is_some_and(|value| value.trim().eq_ignore_ascii_case("true"))
        };

        NotifyConfig {
            email_enabled: enabled(ENV_ENABLE_EMAIL),
            teams_enabled: enabled(ENV_ENABLE_TEAMS),
            email: email_config(&get),
            teams_webhook: get(ENV_TEAMS_WEBHOOK_URL),
        }
    }
}

fn email_config<F: Fn(&str) -> Option<String>>(
    get: &F,
) -> Result<EmailConfig, Vec<&'static str>> {
    let required = [
        ENV_EMAIL_FROM,
        ENV_EMAIL_TO,
        ENV_SMTP_SERVER,
        ENV_SMTP_USER,
        ENV_SMTP_PASSWORD,
    ];
    let missing = required
        .into_iter()
        .filter(|name| get(*name).is_none())
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(missing);
    }

    let server_port = match get(ENV_SMTP_PORT) {
        None => DEFAULT_SMTP_PORT,
        Some(port) => port.trim().parse().map_err(|_| vec![ENV_SMTP_PORT])?,
    };

    let value = |name| get(name).unwrap_or_default();
    Ok(EmailConfig {
        sender: value(ENV_EMAIL_FROM),
        recipient: value(ENV_EMAIL_TO),
        server_host: value(ENV_SMTP_SERVER),
        server_port,
        username: value(ENV_SMTP_USER),
        password: value(ENV_SMTP_PASSWORD),
    })
}
