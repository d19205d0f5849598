use crate::config::Config;
use crate::summary::ProductionReport;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::env;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("missing required mail setting: {0}")]
    MissingConfig(&'static str),

    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP delivery failed: {0}")]
    Delivery(#[from] lettre::transport::smtp::Error),
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub sender: String,
    pub password: String,
    pub recipients: Vec<String>,
}

impl MailConfig {
    /// Credentials and addresses come from the environment (`.env` supported);
    /// the transport endpoint comes from the config file.
    pub fn from_env(config: &Config) -> Result<Self, MailError> {
        Ok(Self {
            smtp_host: config.smtp_host.clone(),
            smtp_port: config.smtp_port,
            sender: require_env("EMAIL_FROM")?,
            password: require_env("EMAIL_PASS")?,
            recipients: parse_recipients(&require_env("EMAIL_TO")?)?,
        })
    }
}

#[derive(Debug)]
pub struct Mailer {
    transport: SmtpTransport,
    sender: Mailbox,
    recipients: Vec<Mailbox>,
}

impl Mailer {
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let sender = parse_mailbox(&config.sender)?;
        let recipients = config
            .recipients
            .iter()
            .map(|address| parse_mailbox(address))
            .collect::<Result<Vec<_>, _>>()?;

        let transport = SmtpTransport::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.sender.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            sender,
            recipients,
        })
    }

    /// One delivery attempt per run; transport faults surface to the caller
    /// and are never retried.
    pub fn send(&self, report: &ProductionReport) -> Result<(), MailError> {
        let mut builder = Message::builder()
            .from(self.sender.clone())
            .subject(report.subject.clone());

        for recipient in &self.recipients {
            builder = builder.to(recipient.clone());
        }

        let message = builder.multipart(MultiPart::alternative_plain_html(
            report.plain_body.clone(),
            report.html_body.clone(),
        ))?;

        self.transport.send(&message)?;
        info!(subject = %report.subject, recipients = self.recipients.len(), "report delivered");

        Ok(())
    }
}

pub fn parse_recipients(raw: &str) -> Result<Vec<String>, MailError> {
    let recipients = raw
        .split(',')
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(ToOwned::to_owned)
        .collect::<Vec<_>>();

    if recipients.is_empty() {
        return Err(MailError::MissingConfig("EMAIL_TO"));
    }

    Ok(recipients)
}

fn require_env(name: &'static str) -> Result<String, MailError> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(MailError::MissingConfig(name))
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse::<Mailbox>()
        .map_err(|_| MailError::InvalidAddress(address.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipients_are_split_and_trimmed() {
        let recipients =
            parse_recipients(" ops@example.com , plant@example.com ,").expect("recipients parsed");

        assert_eq!(recipients, ["ops@example.com", "plant@example.com"]);
    }

    #[test]
    fn empty_recipient_list_is_rejected() {
        let error = parse_recipients(" , ").expect_err("rejected");

        assert!(matches!(error, MailError::MissingConfig("EMAIL_TO")));
    }

    #[test]
    fn invalid_sender_address_is_rejected() {
        let config = MailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            sender: "not an address".to_string(),
            password: "secret".to_string(),
            recipients: vec!["ops@example.com".to_string()],
        };

        let error = Mailer::new(&config).expect_err("rejected");

        assert!(matches!(error, MailError::InvalidAddress(_)));
    }
}
