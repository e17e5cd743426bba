//! Named search filters and IMAP criteria building
//!
//! A [`SearchFilter`] holds the optional named filters a test can
//! supply. [`SearchFilter::criteria`] turns them into IMAP search
//! terms in a fixed order; all supplied terms combine conjunctively,
//! since IMAP search keys concatenate with AND semantics.

use serde::Deserialize;

/// Search term emitted when no other filter is supplied.
pub const DEFAULT_STATUS: &str = "UNSEEN";

/// Named filters for [`wait_for_email`](crate::MailboxSession::wait_for_email).
///
/// Every field is optional. The historical spellings of the sender and
/// recipient filters are accepted as deserialization aliases and
/// collapse to the canonical fields:
///
/// - `sender` | `from_email` | `fromEmail`
/// - `recipient` | `to_email` | `toEmail`
///
/// `folder` is not a search term: it re-selects the folder to search
/// in and leaves the criteria untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchFilter {
    /// Matches the From header (`FROM "<value>"`).
    #[serde(alias = "from_email", alias = "fromEmail")]
    pub sender: Option<String>,
    /// Matches the To header (`TO "<value>"`).
    #[serde(alias = "to_email", alias = "toEmail")]
    pub recipient: Option<String>,
    /// Matches the Subject header (`SUBJECT "<value>"`).
    pub subject: Option<String>,
    /// Matches anywhere in the message (`TEXT "<value>"`).
    pub text: Option<String>,
    /// A raw IMAP status keyword such as `UNSEEN`, emitted bare.
    pub status: Option<String>,
    /// Folder to re-select before searching.
    pub folder: Option<String>,
}

impl SearchFilter {
    #[must_use]
    pub fn with_sender(mut self, value: impl Into<String>) -> Self {
        self.sender = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_recipient(mut self, value: impl Into<String>) -> Self {
        self.recipient = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_subject(mut self, value: impl Into<String>) -> Self {
        self.subject = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_text(mut self, value: impl Into<String>) -> Self {
        self.text = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, value: impl Into<String>) -> Self {
        self.status = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_folder(mut self, value: impl Into<String>) -> Self {
        self.folder = Some(value.into());
        self
    }

    /// Build the IMAP search terms for this filter.
    ///
    /// Terms are emitted in a fixed order: sender, recipient, subject,
    /// text, status. Value-bearing terms wrap their value in double
    /// quotes verbatim; the status keyword is emitted bare. With no
    /// filter supplied the single term [`DEFAULT_STATUS`] is produced.
    #[must_use]
    pub fn criteria(&self) -> Vec<String> {
        let mut terms = Vec::new();

        if let Some(sender) = &self.sender {
            terms.push(format!("FROM \"{sender}\""));
        }
        if let Some(recipient) = &self.recipient {
            terms.push(format!("TO \"{recipient}\""));
        }
        if let Some(subject) = &self.subject {
            terms.push(format!("SUBJECT \"{subject}\""));
        }
        if let Some(text) = &self.text {
            terms.push(format!("TEXT \"{text}\""));
        }
        if let Some(status) = &self.status {
            terms.push(status.clone());
        }

        if terms.is_empty() {
            terms.push(DEFAULT_STATUS.to_string());
        }
        terms
    }

    /// The criteria joined into a single UID SEARCH query string.
    #[must_use]
    pub fn query(&self) -> String {
        self.criteria().join(" ")
    }
}
