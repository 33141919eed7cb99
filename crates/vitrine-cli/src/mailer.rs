//! Outgoing mail: the message built from a submission and the relays
//! that deliver it.

use crate::config::ContactConfig;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::sync::Mutex;
use thiserror::Error;

/// Relay failures. Never shown to the submitter.
#[derive(Debug, Error)]
pub enum RelayError {
    /// An address did not parse.
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The message could not be assembled.
    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    /// The SMTP exchange failed.
    #[error("smtp transport failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The relay is not usable, e.g. missing credentials.
    #[error("relay unavailable: {0}")]
    Unavailable(String),
}

/// A message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// Display name on the `From` header
    pub from_name: String,
    /// Submitter's address for `Reply-To`
    pub reply_to: String,
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub text: String,
    /// HTML alternative
    pub html: String,
}

/// Something that can deliver an [`OutgoingMessage`].
pub trait MailRelay: Send + Sync {
    /// Deliver one message, without retrying.
    fn send(&self, message: &OutgoingMessage) -> Result<(), RelayError>;
}

/// SMTP relay over STARTTLS.
pub struct SmtpRelay {
    transport: SmtpTransport,
    account: Mailbox,
    recipient: Mailbox,
}

impl SmtpRelay {
    /// Build a relay from contact settings.
    pub fn from_config(config: &ContactConfig) -> Result<Self, RelayError> {
        let (Some(user), Some(password)) = (&config.user, &config.password) else {
            return Err(RelayError::Unavailable(
                "EMAIL_USER and EMAIL_PASSWORD must be set".to_string(),
            ));
        };
        let transport = SmtpTransport::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(Credentials::new(user.clone(), password.clone()))
            .build();
        Ok(Self {
            transport,
            account: user.parse()?,
            recipient: config.recipient.parse()?,
        })
    }
}

/// Assemble the MIME message: `From` carries the submitter's name on the
/// relay account, `Reply-To` the submitter's address.
pub fn compose(
    account: &Mailbox,
    recipient: &Mailbox,
    message: &OutgoingMessage,
) -> Result<Message, RelayError> {
    let from = Mailbox::new(Some(message.from_name.clone()), account.email.clone());
    let email = Message::builder()
        .from(from)
        .reply_to(message.reply_to.parse()?)
        .to(recipient.clone())
        .subject(message.subject.clone())
        .multipart(MultiPart::alternative_plain_html(
            message.text.clone(),
            message.html.clone(),
        ))?;
    Ok(email)
}

impl MailRelay for SmtpRelay {
    fn send(&self, message: &OutgoingMessage) -> Result<(), RelayError> {
        let email = compose(&self.account, &self.recipient, message)?;
        self.transport.send(&email)?;
        Ok(())
    }
}

/// Relay that keeps messages in memory. Used by tests and by `serve
/// --dry-run`.
#[derive(Debug, Default)]
pub struct RecordingRelay {
    sent: Mutex<Vec<OutgoingMessage>>,
    fail: bool,
}

impl RecordingRelay {
    /// Relay that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Relay that rejects everything.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            fail: true,
        }
    }

    /// Messages accepted so far.
    pub fn sent(&self) -> Vec<OutgoingMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl MailRelay for RecordingRelay {
    fn send(&self, message: &OutgoingMessage) -> Result<(), RelayError> {
        if self.fail {
            return Err(RelayError::Unavailable("recording relay set to fail".to_string()));
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> OutgoingMessage {
        OutgoingMessage {
            from_name: "Ada".to_string(),
            reply_to: "ada@example.com".to_string(),
            subject: "New Contact Form Message from Ada".to_string(),
            text: "hi".to_string(),
            html: "<p>hi</p>".to_string(),
        }
    }

    #[test]
    fn test_recording_relay() {
        let relay = RecordingRelay::new();
        relay.send(&message()).unwrap();
        assert_eq!(relay.sent(), vec![message()]);
        assert!(RecordingRelay::failing().send(&message()).is_err());
    }

    #[test]
    fn test_smtp_requires_credentials() {
        let err = SmtpRelay::from_config(&ContactConfig::default()).err().unwrap();
        assert!(matches!(err, RelayError::Unavailable(_)));
    }

    fn mailbox(address: &str) -> Mailbox {
        address.parse().unwrap()
    }

    #[test]
    fn test_compose_headers() {
        let email = compose(
            &mailbox("bot@example.com"),
            &mailbox("owner@example.com"),
            &message(),
        )
        .unwrap();
        let raw = String::from_utf8(email.formatted()).unwrap();
        assert!(raw.contains("From: Ada <bot@example.com>"));
        assert!(raw.contains("Reply-To: ada@example.com"));
        assert!(raw.contains("To: owner@example.com"));
        assert!(raw.contains("Subject: New Contact Form Message from Ada"));
        assert!(raw.contains("text/plain"));
        assert!(raw.contains("text/html"));
    }

    #[test]
    fn test_compose_rejects_bad_reply_to() {
        let bad = OutgoingMessage {
            reply_to: "not an address".to_string(),
            ..message()
        };
        let result = compose(&mailbox("bot@example.com"), &mailbox("owner@example.com"), &bad);
        assert!(matches!(result, Err(RelayError::Address(_))));
    }
}
