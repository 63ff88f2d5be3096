//! SMTP delivery adapter for the forwarding loop.

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::error::{Error, Result};

use super::source::Outbound;

/// SMTP connection settings.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Optional tag prepended to each subject, e.g. `"[Librus]"`.
    pub subject_prefix: Option<String>,
}

impl SmtpConfig {
    /// Read SMTP settings from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: required_env("SMTP_HOST")?,
            username: required_env("SMTP_USER")?,
            password: required_env("SMTP_PASSWORD")?,
            from: required_env("MAIL_FROM")?,
            to: required_env("MAIL_TO")?,
            subject_prefix: std::env::var("MAIL_SUBJECT_PREFIX")
                .ok()
                .filter(|v| !v.is_empty()),
        })
    }
}

fn required_env(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::MissingField(key.to_string()))
}

/// Blocking SMTP [`Outbound`] built on lettre.
pub struct SmtpOutbound {
    transport: SmtpTransport,
    from: Mailbox,
    to: Mailbox,
    subject_prefix: Option<String>,
}

impl SmtpOutbound {
    /// Build a TLS relay transport from the configuration.
    pub fn connect(config: &SmtpConfig) -> Result<Self> {
        let transport = SmtpTransport::relay(&config.host)
            .map_err(|e| Error::Mail(e.to_string()))?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        Ok(Self {
            transport,
            from: parse_mailbox(&config.from)?,
            to: parse_mailbox(&config.to)?,
            subject_prefix: config.subject_prefix.clone(),
        })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .parse::<Mailbox>()
        .map_err(|e| Error::Mail(format!("invalid mailbox {address:?}: {e}")))
}

impl Outbound for SmtpOutbound {
    fn deliver(&mut self, subject: &str, body: &str) -> Result<()> {
        let subject = match &self.subject_prefix {
            Some(prefix) => format!("{prefix} {subject}"),
            None => subject.to_string(),
        };
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| Error::Mail(e.to_string()))?;
        self.transport
            .send(&message)
            .map_err(|e| Error::Mail(e.to_string()))?;
        Ok(())
    }
}
