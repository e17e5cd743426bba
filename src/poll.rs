//! Bounded polling for a matching email
//!
//! IMAP has no push primitive usable here, so the poller issues a UID
//! SEARCH at a fixed interval until a match appears or the deadline
//! elapses. A NO/BAD completion from the server aborts the loop at
//! once: a protocol-level rejection must not be mistaken for "no
//! match yet".

use crate::error::{Error, ResponseStatus, Result};
use crate::filter::SearchFilter;
use crate::session::{MailboxSession, select_error};
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, trace};

/// Timing knobs for [`MailboxSession::wait_for_email`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    /// Pause between search attempts.
    pub poll_frequency: Duration,
    /// Total time to wait for a match before giving up.
    pub timeout: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            poll_frequency: Duration::from_millis(200),
            timeout: Duration::from_secs(60),
        }
    }
}

impl PollOptions {
    #[must_use]
    pub const fn new(poll_frequency: Duration, timeout: Duration) -> Self {
        Self {
            poll_frequency,
            timeout,
        }
    }
}

impl MailboxSession {
    /// Poll the mailbox until an email matching `filter` appears.
    ///
    /// If the filter carries a folder override, that folder is
    /// re-selected first and the selection persists on the session.
    /// Returns the UID of the matching message; when several match,
    /// the smallest UID (the oldest message) is returned.
    ///
    /// # Errors
    ///
    /// - [`Error::NotConnected`] without an open session.
    /// - [`Error::FolderSelect`] if the folder override cannot be
    ///   selected; no search is attempted.
    /// - [`Error::Search`] the moment the server rejects the search,
    ///   regardless of the remaining timeout.
    /// - [`Error::Timeout`] when the deadline passes with no match.
    pub async fn wait_for_email(
        &mut self,
        filter: &SearchFilter,
        options: PollOptions,
    ) -> Result<u32> {
        let criteria = filter.criteria();
        let query = criteria.join(" ");

        if let Some(folder) = &filter.folder {
            let folder = folder.clone();
            let session = self.session_mut()?;
            let mailbox = session.select(&folder).await.map_err(select_error)?;
            debug!(exists = mailbox.exists, "Selected folder {}", folder);
            self.set_selected_folder(folder);
        }

        let deadline = Instant::now() + options.timeout;
        debug!("Waiting for email matching '{}'", query);

        loop {
            let session = self.session_mut()?;
            match session.uid_search(&query).await {
                Ok(uids) => {
                    if let Some(uid) = uids.iter().min().copied() {
                        debug!(uid, "Found matching message");
                        return Ok(uid);
                    }
                }
                Err(e) => {
                    return Err(Error::Search {
                        status: ResponseStatus::from_imap_error(&e),
                        detail: e.to_string(),
                        criteria,
                    });
                }
            }

            if Instant::now() >= deadline {
                return Err(Error::Timeout {
                    timeout: options.timeout,
                });
            }

            trace!("No match yet, sleeping {:?}", options.poll_frequency);
            sleep(options.poll_frequency).await;
        }
    }
}
