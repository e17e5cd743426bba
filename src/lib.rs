//! IMAP mailbox polling for automated test suites
//!
//! Lets a test suite open a mailbox on an IMAP server, wait for an
//! email matching named filters ([`SearchFilter`]) to arrive, and act
//! on it (mark read, delete). Polling is bounded:
//! [`MailboxSession::wait_for_email`] repeatedly issues a UID SEARCH
//! at a fixed interval until a match appears or the deadline elapses.
//!
//! The IMAP wire protocol itself is delegated to
//! [`async-imap`](https://docs.rs/async-imap); this crate only
//! orchestrates the session lifecycle and the search loop.
//!
//! ```no_run
//! use mailprobe::{MailboxConfig, MailboxSession, PollOptions, SearchFilter};
//!
//! # async fn example() -> mailprobe::Result<()> {
//! let config = MailboxConfig::new("imap.example.com", "qa@example.com", "hunter2");
//! let mut mailbox = MailboxSession::new(config);
//! mailbox.open().await?;
//!
//! let filter = SearchFilter::default().with_sender("noreply@example.com");
//! let uid = mailbox.wait_for_email(&filter, PollOptions::default()).await?;
//!
//! mailbox.mark_email_as_read(uid).await?;
//! mailbox.close().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod connection;
mod error;
mod filter;
mod poll;
mod session;

pub use config::{DEFAULT_FOLDER, MailboxConfig, PORT, PORT_SECURE};
pub use error::{Error, ResponseStatus, Result};
pub use filter::{DEFAULT_STATUS, SearchFilter};
pub use poll::PollOptions;
pub use session::MailboxSession;
