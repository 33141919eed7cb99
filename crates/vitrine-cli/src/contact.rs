//! Contact form submissions: validation and the relayed message.

use crate::mailer::{MailRelay, OutgoingMessage, RelayError};
use lettre::message::Mailbox;
use lettre::Address;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{error, info, warn};

/// Why a submission was not relayed. The display text is what the
/// submitter sees.
#[derive(Debug, Error)]
pub enum ContactError {
    /// A field is absent, empty or not a string, or the body is not JSON.
    #[error("Missing required fields")]
    MissingFields,

    /// The email does not look like `local@domain.tld`.
    #[error("Invalid email format")]
    InvalidEmail,

    /// The relay failed; details stay in the server log.
    #[error("Failed to send email")]
    Relay(#[source] RelayError),
}

impl ContactError {
    /// HTTP status for this error.
    pub fn status(&self) -> u16 {
        match self {
            Self::MissingFields | Self::InvalidEmail => 400,
            Self::Relay(_) => 500,
        }
    }
}

/// A validated submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Sender's name
    pub name: String,
    /// Sender's email
    pub email: String,
    /// Message body
    pub message: String,
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"))
}

/// Whether `email` has the `local@domain.tld` shape.
pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

/// The shape check plus what the relay needs to use `email` as `Reply-To`.
fn is_deliverable(email: &str) -> bool {
    is_valid_email(email) && email.parse::<Address>().is_ok() && email.parse::<Mailbox>().is_ok()
}

/// Escape text for inclusion in HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl Submission {
    /// Parse and validate a JSON body `{name, email, message}`.
    pub fn parse(body: &[u8]) -> Result<Self, ContactError> {
        let value: serde_json::Value =
            serde_json::from_slice(body).map_err(|_| ContactError::MissingFields)?;
        let field = |key: &str| {
            value
                .get(key)
                .and_then(serde_json::Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
                .ok_or(ContactError::MissingFields)
        };
        let submission = Self {
            name: field("name")?,
            email: field("email")?,
            message: field("message")?,
        };
        if !is_deliverable(&submission.email) {
            return Err(ContactError::InvalidEmail);
        }
        Ok(submission)
    }

    /// The message sent to the site owner.
    pub fn to_message(&self) -> OutgoingMessage {
        let html = format!(
            "<h2>New Contact Form Submission</h2>\n\
             <p><strong>Name:</strong> {}</p>\n\
             <p><strong>Email:</strong> {}</p>\n\
             <p><strong>Message:</strong></p>\n\
             <p>{}</p>\n",
            escape_html(&self.name),
            escape_html(&self.email),
            escape_html(&self.message).replace('\n', "<br>"),
        );
        OutgoingMessage {
            from_name: self.name.clone(),
            reply_to: self.email.clone(),
            subject: format!("New Contact Form Message from {}", self.name),
            text: format!("Name: {}\nEmail: {}\n\n{}", self.name, self.email, self.message),
            html,
        }
    }
}

/// Validate a request body and relay it. No retry on failure.
pub fn submit(body: &[u8], relay: &dyn MailRelay) -> Result<Submission, ContactError> {
    let submission = Submission::parse(body).map_err(|err| {
        warn!(%err, "rejected contact submission");
        err
    })?;
    relay.send(&submission.to_message()).map_err(|err| {
        error!(%err, "contact relay failed");
        ContactError::Relay(err)
    })?;
    info!(reply_to = %submission.email, "contact message relayed");
    Ok(submission)
}
