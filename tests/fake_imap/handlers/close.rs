//! CLOSE command handler.
//!
//! RFC 3501 Section 6.4.2: CLOSE expunges `\Deleted` messages
//! *silently* (no untagged EXPUNGE responses) and returns the session
//! to the unselected state. The caller clears its selected-folder
//! tracking after invoking this handler.

use super::expunge::expunge_folder;
use crate::fake_imap::io::write_line;
use crate::fake_imap::mailbox::Mailbox;
use std::sync::Mutex;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};

/// Handle the CLOSE command.
pub async fn handle_close<S: AsyncRead + AsyncWrite + Unpin>(
    tag: &str,
    mailbox: &Mutex<Mailbox>,
    selected_folder: Option<&str>,
    stream: &mut BufReader<S>,
) {
    let Some(folder_name) = selected_folder else {
        let resp = format!("{tag} BAD No folder selected\r\n");
        let _ = write_line(stream, &resp).await;
        return;
    };

    {
        let mut mb = mailbox.lock().unwrap();
        let _ = expunge_folder(&mut mb, folder_name);
    }

    let resp = format!("{tag} OK CLOSE completed\r\n");
    let _ = write_line(stream, &resp).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_imap::mailbox::MailboxBuilder;
    use tokio::io::BufReader;

    fn make_raw_email() -> Vec<u8> {
        b"From: a@b.com\r\nSubject: Test\r\n\r\nBody".to_vec()
    }

    async fn run_close(tag: &str, mailbox: &Mutex<Mailbox>, selected: Option<&str>) -> String {
        let (client, server) = tokio::io::duplex(4096);
        let mut stream = BufReader::new(server);

        handle_close(tag, mailbox, selected, &mut stream).await;
        drop(stream);

        let mut buf = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut BufReader::new(client), &mut buf)
            .await
            .unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[tokio::test]
    async fn close_expunges_silently() {
        let raw = make_raw_email();
        let mut mb = MailboxBuilder::new()
            .folder("INBOX")
            .email(1, false, &raw)
            .email(2, false, &raw)
            .build();
        mb.get_folder_mut("INBOX").unwrap().emails[1].deleted = true;
        let mb = Mutex::new(mb);

        let output = run_close("A1", &mb, Some("INBOX")).await;

        assert!(!output.contains("EXPUNGE"));
        assert!(output.contains("A1 OK CLOSE completed"));
        assert_eq!(
            mb.lock().unwrap().get_folder("INBOX").unwrap().emails.len(),
            1
        );
    }

    #[tokio::test]
    async fn close_without_selection_answers_bad() {
        let mb = Mutex::new(MailboxBuilder::new().folder("INBOX").build());

        let output = run_close("A1", &mb, None).await;

        assert!(output.contains("A1 BAD No folder selected"));
    }
}
