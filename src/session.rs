//! Mailbox session lifecycle and message operations
//!
//! [`MailboxSession`] owns at most one live IMAP connection. `open()`
//! creates it, `close()` tears it down, and every other operation
//! fails with [`Error::NotConnected`] when no connection exists. The
//! session is owned exclusively by the calling test context; it is not
//! meant for concurrent use.

use crate::config::MailboxConfig;
use crate::connection::{self, ImapSession};
use crate::error::{Error, ResponseStatus, Result};
use tracing::{debug, info};

/// Flag update applied when deleting a message. Uppercase atom,
/// matching the historical wire text.
const STORE_DELETED: &str = "+FLAGS (\\DELETED)";

/// Flag update applied when marking a message read. Uppercase atom,
/// matching the historical wire text.
const STORE_SEEN: &str = "+FLAGS \\SEEN";

/// UID set covering every message in the selected folder.
const ALL_MESSAGES: &str = "1:*";

/// A mailbox on an IMAP server, with explicit open/close lifecycle.
pub struct MailboxSession {
    config: MailboxConfig,
    session: Option<ImapSession>,
    selected_folder: String,
}

impl MailboxSession {
    /// Create an unconnected session for the given configuration.
    /// No I/O happens until [`open`](Self::open).
    #[must_use]
    pub fn new(config: MailboxConfig) -> Self {
        let selected_folder = config.folder.clone();
        Self {
            config,
            session: None,
            selected_folder,
        }
    }

    /// The folder most recently selected on the server.
    #[must_use]
    pub fn selected_folder(&self) -> &str {
        &self.selected_folder
    }

    /// Connect, authenticate, and select the configured folder.
    ///
    /// Calling `open` on an already-open session replaces the previous
    /// connection without closing it, matching the historical
    /// contract. The old connection is only dropped, never logged out;
    /// callers that care should `close()` first.
    ///
    /// # Errors
    ///
    /// Connection, TLS, and authentication failures propagate from the
    /// underlying client without retry. A non-OK SELECT yields
    /// [`Error::FolderSelect`].
    pub async fn open(&mut self) -> Result<()> {
        let mut session = connection::connect(&self.config).await?;

        let folder = self.config.folder.clone();
        let mailbox = session.select(&folder).await.map_err(select_error)?;
        debug!(exists = mailbox.exists, "Selected folder {}", folder);

        self.session = Some(session);
        self.selected_folder = folder;
        Ok(())
    }

    /// CLOSE the mailbox and drop the connection.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NotConnected`] if no session is open.
    pub async fn close(&mut self) -> Result<()> {
        let session = self.session_mut()?;
        session
            .close()
            .await
            .map_err(|e| Error::Imap(format!("Close failed: {e}")))?;
        self.session = None;
        info!("Closed mailbox");
        Ok(())
    }

    /// Flag a message for deletion and expunge the folder immediately.
    /// The removal is permanent.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NotConnected`] without an open session, or
    /// [`Error::Imap`] if the server rejects the STORE or EXPUNGE.
    pub async fn delete_email(&mut self, uid: u32) -> Result<()> {
        let session = self.session_mut()?;
        let uid_set = format!("{uid}");
        session
            .uid_store(&uid_set, STORE_DELETED)
            .await
            .map_err(|e| Error::Imap(format!("Store failed: {e}")))?;
        session
            .expunge()
            .await
            .map_err(|e| Error::Imap(format!("Expunge failed: {e}")))?;
        debug!(uid, "Deleted message");
        Ok(())
    }

    /// Delete every message in the selected folder.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`delete_email`](Self::delete_email).
    pub async fn delete_all_emails(&mut self) -> Result<()> {
        let session = self.session_mut()?;
        session
            .uid_store(ALL_MESSAGES, STORE_DELETED)
            .await
            .map_err(|e| Error::Imap(format!("Store failed: {e}")))?;
        session
            .expunge()
            .await
            .map_err(|e| Error::Imap(format!("Expunge failed: {e}")))?;
        debug!("Deleted all messages");
        Ok(())
    }

    /// Set the `\Seen` flag on a message. No expunge.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NotConnected`] without an open session, or
    /// [`Error::Imap`] if the server rejects the STORE.
    pub async fn mark_email_as_read(&mut self, uid: u32) -> Result<()> {
        let session = self.session_mut()?;
        let uid_set = format!("{uid}");
        session
            .uid_store(&uid_set, STORE_SEEN)
            .await
            .map_err(|e| Error::Imap(format!("Store failed: {e}")))?;
        debug!(uid, "Marked message as read");
        Ok(())
    }

    /// Set the `\Seen` flag on every message in the selected folder.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`mark_email_as_read`](Self::mark_email_as_read).
    pub async fn mark_all_emails_as_read(&mut self) -> Result<()> {
        let session = self.session_mut()?;
        session
            .uid_store(ALL_MESSAGES, STORE_SEEN)
            .await
            .map_err(|e| Error::Imap(format!("Store failed: {e}")))?;
        debug!("Marked all messages as read");
        Ok(())
    }

    /// Fetch the raw RFC 2822 message for a UID without touching its
    /// flags (`BODY.PEEK[]`). No MIME parsing is performed.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NotConnected`] without an open session,
    /// or [`Error::Imap`] if the FETCH fails or returns no body.
    pub async fn fetch_email_body(&mut self, uid: u32) -> Result<Vec<u8>> {
        let session = self.session_mut()?;
        let body = session
            .uid_fetch_body(uid)
            .await
            .map_err(|e| Error::Imap(format!("Fetch failed: {e}")))?;
        body.ok_or_else(|| Error::Imap(format!("No body found for UID {uid}")))
    }

    pub(crate) fn session_mut(&mut self) -> Result<&mut ImapSession> {
        self.session.as_mut().ok_or(Error::NotConnected)
    }

    pub(crate) fn set_selected_folder(&mut self, folder: String) {
        self.selected_folder = folder;
    }
}

/// Map a failed SELECT into [`Error::FolderSelect`], preserving the
/// server's completion status and response text.
pub(crate) fn select_error(err: async_imap::error::Error) -> Error {
    Error::FolderSelect {
        status: ResponseStatus::from_imap_error(&err),
        detail: err.to_string(),
    }
}
