//! Error types for mailprobe

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Completion status of an IMAP command, as reported by the server.
///
/// Replaces raw string comparisons on the tagged response: the
/// underlying client surfaces NO and BAD completions as distinct error
/// variants, which are mapped onto this enum for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    /// Tagged OK completion.
    Ok,
    /// Tagged NO completion (operational failure).
    No,
    /// Tagged BAD completion (protocol error).
    Bad,
    /// Anything else: connection loss, parse failure, I/O.
    Other,
}

impl ResponseStatus {
    pub(crate) const fn from_imap_error(err: &async_imap::error::Error) -> Self {
        match err {
            async_imap::error::Error::No(_) => Self::No,
            async_imap::error::Error::Bad(_) => Self::Bad,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::No => "NO",
            Self::Bad => "BAD",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("IMAP error: {0}")]
    Imap(String),

    #[error("no session is open: call open() first")]
    NotConnected,

    #[error("folder selection failed: {status}, {detail}")]
    FolderSelect {
        status: ResponseStatus,
        detail: String,
    },

    #[error("search failed: {status}, {detail}, criteria={criteria:?}")]
    Search {
        status: ResponseStatus,
        detail: String,
        criteria: Vec<String>,
    },

    #[error("no email received within {}s", timeout.as_secs_f64())]
    Timeout { timeout: Duration },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TLS error: {0}")]
    Tls(String),
}

pub type Result<T> = std::result::Result<T, Error>;
