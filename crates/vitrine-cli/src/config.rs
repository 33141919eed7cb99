//! `vitrine.toml` loading with environment overrides.
//!
//! Precedence for every setting: CLI flag > environment > file > default.
//! The flag layer is applied by `main`; this module resolves the rest.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "vitrine.toml";

/// Config loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Config file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Config file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: toml::de::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid value {value:?} for {var}")]
    InvalidEnv {
        /// Variable name
        var: &'static str,
        /// Offending value
        value: String,
    },
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen port
    pub port: u16,
    /// Directory of static files
    pub dir: PathBuf,
    /// Largest accepted request body
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            dir: PathBuf::from("www"),
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Contact relay settings.
#[derive(Clone, PartialEq, Eq)]
pub struct ContactConfig {
    /// Where submissions are delivered
    pub recipient: String,
    /// SMTP relay host
    pub smtp_host: String,
    /// SMTP port (STARTTLS)
    pub smtp_port: u16,
    /// SMTP account, also the envelope sender
    pub user: Option<String>,
    /// SMTP password
    pub password: Option<String>,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            recipient: "owner@example.com".to_string(),
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            user: None,
            password: None,
        }
    }
}

impl std::fmt::Debug for ContactConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactConfig")
            .field("recipient", &self.recipient)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Resolved configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// `[server]`
    pub server: ServerConfig,
    /// `[contact]`
    pub contact: ContactConfig,
    /// `[logging]`
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct FileServer {
    port: Option<u16>,
    dir: Option<PathBuf>,
    max_body_bytes: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct FileContact {
    recipient: Option<String>,
    smtp_host: Option<String>,
    smtp_port: Option<u16>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct FileLogging {
    level: Option<String>,
}

/// Config file structure; every section is optional.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    server: Option<FileServer>,
    contact: Option<FileContact>,
    logging: Option<FileLogging>,
}

impl Config {
    /// Load from `path`, or from `vitrine.toml` in the working directory if
    /// it exists, then apply the process environment.
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let text = match path {
            Some(path) => Some((path, read(path)?)),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Some((default, read(default)?))
                } else {
                    None
                }
            }
        };
        let file = match text {
            Some((path, text)) => toml::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?,
            None => FileConfig::default(),
        };
        Self::resolve(file, |var| std::env::var(var).ok())
    }

    /// Parse TOML text and apply overrides from `env`.
    pub fn from_toml(text: &str, env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let file = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        Self::resolve(file, env)
    }

    fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let server = file.server.unwrap_or_default();
        let contact = file.contact.unwrap_or_default();
        let logging = file.logging.unwrap_or_default();

        let port = match env("VITRINE_PORT") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "VITRINE_PORT",
                value,
            })?,
            None => server.port.unwrap_or(defaults.server.port),
        };

        Ok(Self {
            server: ServerConfig {
                port,
                dir: server.dir.unwrap_or(defaults.server.dir),
                max_body_bytes: server.max_body_bytes.unwrap_or(defaults.server.max_body_bytes),
            },
            contact: ContactConfig {
                recipient: env("CONTACT_RECIPIENT")
                    .or(contact.recipient)
                    .unwrap_or(defaults.contact.recipient),
                smtp_host: env("SMTP_HOST")
                    .or(contact.smtp_host)
                    .unwrap_or(defaults.contact.smtp_host),
                smtp_port: contact.smtp_port.unwrap_or(defaults.contact.smtp_port),
                user: env("EMAIL_USER").filter(|v| !v.is_empty()),
                password: env("EMAIL_PASSWORD").filter(|v| !v.is_empty()),
            },
            logging: LoggingConfig {
                level: logging.level.unwrap_or(defaults.logging.level),
            },
        })
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = Config::from_toml("", env(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.server.max_body_bytes, 65536);
        assert_eq!(config.contact.smtp_port, 587);
    }

    #[test]
    fn test_file_values() {
        let config = Config::from_toml(
            r#"
            [server]
            port = 3000
            dir = "public"

            [contact]
            recipient = "me@site.dev"
            smtp_host = "mail.site.dev"
            smtp_port = 2525

            [logging]
            level = "debug"
            "#,
            env(&[]),
        )
        .unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.dir, PathBuf::from("public"));
        assert_eq!(config.contact.recipient, "me@site.dev");
        assert_eq!(config.contact.smtp_port, 2525);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_env_overrides_file() {
        let config = Config::from_toml(
            "[server]\nport = 3000\n[contact]\nrecipient = \"file@site.dev\"\n",
            env(&[
                ("VITRINE_PORT", "9090"),
                ("CONTACT_RECIPIENT", "env@site.dev"),
                ("SMTP_HOST", "smtp.env.dev"),
                ("EMAIL_USER", "bot@site.dev"),
                ("EMAIL_PASSWORD", "hunter2"),
            ]),
        )
        .unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.contact.recipient, "env@site.dev");
        assert_eq!(config.contact.smtp_host, "smtp.env.dev");
        assert_eq!(config.contact.user.as_deref(), Some("bot@site.dev"));
        assert!(!format!("{:?}", config.contact).contains("hunter2"));
    }

    #[test]
    fn test_bad_env_port() {
        let err = Config::from_toml("", env(&[("VITRINE_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: "VITRINE_PORT", .. }));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Config::from_toml("[server]\nprot = 1\n", env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/vitrine.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
