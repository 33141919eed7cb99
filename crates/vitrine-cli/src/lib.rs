//! Library side of the `vitrine` binary.
//!
//! - [`server`]: static files plus `POST /api/contact`
//! - [`contact`]: submission validation and the relayed message
//! - [`mailer`]: SMTP and in-memory relays
//! - [`preview`]: headless effect runs
//! - [`config`]: `vitrine.toml` with environment overrides

pub mod config;
pub mod contact;
pub mod logging;
pub mod mailer;
pub mod preview;
pub mod server;

pub use config::{Config, ConfigError};
pub use contact::{ContactError, Submission};
pub use mailer::{MailRelay, OutgoingMessage, RecordingRelay, RelayError, SmtpRelay};
pub use preview::{Format, PreviewOptions, PreviewReport};
pub use server::{HttpResponse, Site};
