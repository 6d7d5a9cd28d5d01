use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    config::Config,
    error::MailError,
    models::message::OutgoingEmail,
    services::credentials::Secret,
};

/// Delivers one composed message.
#[allow(async_fn_in_trait)]
pub trait Mailer {
    async fn send(&self, email: &OutgoingEmail, secret: &Secret) -> Result<(), MailError>;
}

/// SMTP over implicit TLS (the connection is encrypted from the first byte,
/// no STARTTLS upgrade). Logs in as the sender.
pub struct SmtpMailer {
    host: String,
    port: u16,
}

impl SmtpMailer {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.smtp_host.clone(), config.smtp_port)
    }
}

impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail, secret: &Secret) -> Result<(), MailError> {
        let message = build_message(email)?;
        // Log in with the bare address even when the sender carries a display name.
        let login = parse_mailbox(&email.sender)?.email.to_string();
        let creds = Credentials::new(login, secret.expose().to_string());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)?
            .port(self.port)
            .credentials(creds)
            .build();

        info!("Connecting to {}:{}", self.host, self.port);
        transport.send(message).await?;
        Ok(())
    }
}

fn parse_mailbox(raw: &str) -> Result<Mailbox, MailError> {
    raw.trim()
        .parse()
        .map_err(|_| MailError::InvalidAddress(raw.to_string()))
}

fn new_message_id(from: &Mailbox) -> String {
    format!("<{}@{}>", Uuid::new_v4(), from.email.domain())
}

/// Single plain-text message with every recipient in one `To` header.
pub fn build_message(email: &OutgoingEmail) -> Result<Message, MailError> {
    let from = parse_mailbox(&email.sender)?;

    let mut builder = Message::builder()
        .message_id(Some(new_message_id(&from)))
        .from(from)
        .subject(email.subject.clone());
    for recipient in &email.recipients {
        builder = builder.to(parse_mailbox(recipient)?);
    }

    Ok(builder
        .header(ContentType::TEXT_PLAIN)
        .body(email.body.clone())?)
}
