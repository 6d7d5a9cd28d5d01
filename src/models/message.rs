/// Subject and plain-text body of the daily mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuMessage {
    pub subject: String,
    pub body: String,
}

/// A fully addressed message, ready for a `Mailer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub sender: String,
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl OutgoingEmail {
    pub fn new(sender: &str, recipients: &[String], message: MenuMessage) -> Self {
        Self {
            sender: sender.to_string(),
            recipients: recipients.to_vec(),
            subject: message.subject,
            body: message.body,
        }
    }
}
