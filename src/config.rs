//! Mailbox connection configuration

use crate::error::{Error, Result};
use serde::Deserialize;
use std::env;

/// Default IMAP port for plain (non-TLS) connections.
pub const PORT: u16 = 143;

/// Default IMAP port for TLS connections.
pub const PORT_SECURE: u16 = 993;

/// Folder selected after login when none is configured.
pub const DEFAULT_FOLDER: &str = "INBOX";

/// Connection settings for a [`MailboxSession`](crate::MailboxSession).
///
/// Deserializable from test-suite configuration; the historical
/// argument spellings are accepted as aliases (`server` for `host`,
/// `user` for `username`, `is_secure` for `secure`) and collapse to
/// the canonical fields here.
#[derive(Debug, Clone, Deserialize)]
pub struct MailboxConfig {
    #[serde(alias = "server")]
    pub host: String,
    #[serde(alias = "user")]
    pub username: String,
    pub password: String,
    /// Explicit port. When unset, falls back to 993 (secure) or 143.
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default = "default_secure", alias = "is_secure")]
    pub secure: bool,
    #[serde(default = "default_folder")]
    pub folder: String,
}

const fn default_secure() -> bool {
    true
}

fn default_folder() -> String {
    DEFAULT_FOLDER.to_string()
}

impl MailboxConfig {
    /// Configuration with default port, TLS on, and INBOX selected.
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            port: None,
            secure: true,
            folder: DEFAULT_FOLDER.to_string(),
        }
    }

    /// The port to connect to: the explicit setting if present,
    /// otherwise the default for the transport.
    #[must_use]
    pub const fn effective_port(&self) -> u16 {
        match self.port {
            Some(port) => port,
            None => {
                if self.secure {
                    PORT_SECURE
                } else {
                    PORT
                }
            }
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads from `.env` file if present. Required variables:
    /// - `IMAP_HOST`
    /// - `IMAP_USERNAME`
    /// - `IMAP_PASSWORD`
    ///
    /// Optional:
    /// - `IMAP_PORT` (default: per transport)
    /// - `IMAP_SECURE` (default: `true`)
    /// - `IMAP_FOLDER` (default: `INBOX`)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a required variable is missing or
    /// an optional one fails to parse.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let port = match env::var("IMAP_PORT") {
            Ok(raw) => Some(
                raw.parse()
                    .map_err(|e| Error::Config(format!("Invalid IMAP_PORT: {e}")))?,
            ),
            Err(_) => None,
        };

        let secure = match env::var("IMAP_SECURE") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| Error::Config(format!("Invalid IMAP_SECURE: {e}")))?,
            Err(_) => true,
        };

        Ok(Self {
            host: env::var("IMAP_HOST").map_err(|_| Error::Config("IMAP_HOST not set".into()))?,
            username: env::var("IMAP_USERNAME")
                .map_err(|_| Error::Config("IMAP_USERNAME not set".into()))?,
            password: env::var("IMAP_PASSWORD")
                .map_err(|_| Error::Config("IMAP_PASSWORD not set".into()))?,
            port,
            secure,
            folder: env::var("IMAP_FOLDER").unwrap_or_else(|_| DEFAULT_FOLDER.to_string()),
        })
    }
}
