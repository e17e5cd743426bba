//! IMAP connection establishment and command transport
//!
//! Wraps `async-imap` sessions over either an implicit-TLS stream or a
//! plain TCP stream behind a single [`ImapSession`] type, so the rest
//! of the crate is independent of the transport choice.

use crate::config::MailboxConfig;
use crate::error::{Error, Result};
use async_imap::Session;
use futures::StreamExt;
use rustls::pki_types::ServerName;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};
use tracing::{debug, info};

type ImapResult<T> = std::result::Result<T, async_imap::error::Error>;

type SecureSession = Session<Compat<tokio_rustls::client::TlsStream<TcpStream>>>;
type PlainSession = Session<Compat<TcpStream>>;

/// A live, authenticated IMAP session over either transport.
pub(crate) enum ImapSession {
    Secure(Box<SecureSession>),
    Plain(Box<PlainSession>),
}

macro_rules! with_session {
    ($self:expr, $session:ident => $body:expr) => {
        match $self {
            ImapSession::Secure($session) => $body,
            ImapSession::Plain($session) => $body,
        }
    };
}

impl ImapSession {
    /// SELECT a folder. The underlying client quotes the folder name
    /// verbatim on the wire (`SELECT "<name>"`).
    pub(crate) async fn select(&mut self, folder: &str) -> ImapResult<async_imap::types::Mailbox> {
        with_session!(self, session => session.select(folder).await)
    }

    /// UID SEARCH with a raw query string. An empty set means no
    /// match; a NO/BAD completion surfaces as an error.
    pub(crate) async fn uid_search(&mut self, query: &str) -> ImapResult<HashSet<u32>> {
        with_session!(self, session => session.uid_search(query).await)
    }

    /// UID STORE, draining the untagged FETCH updates.
    pub(crate) async fn uid_store(&mut self, uid_set: &str, query: &str) -> ImapResult<()> {
        with_session!(self, session => {
            let mut updates = session.uid_store(uid_set, query).await?;
            while let Some(update) = updates.next().await {
                update?;
            }
            Ok(())
        })
    }

    /// UID FETCH of the raw message body (`BODY.PEEK[]`, flags
    /// untouched). Returns `None` when the server sent no body.
    pub(crate) async fn uid_fetch_body(&mut self, uid: u32) -> ImapResult<Option<Vec<u8>>> {
        let uid_set = format!("{uid}");
        with_session!(self, session => {
            let mut messages = session.uid_fetch(&uid_set, "(BODY.PEEK[])").await?;
            let mut body = None;
            while let Some(message) = messages.next().await {
                let message = message?;
                if body.is_none() {
                    body = message.body().map(<[u8]>::to_vec);
                }
            }
            Ok(body)
        })
    }

    /// EXPUNGE the selected folder, draining the untagged responses.
    pub(crate) async fn expunge(&mut self) -> ImapResult<()> {
        with_session!(self, session => {
            let mut removed = std::pin::pin!(session.expunge().await?);
            while let Some(seq) = removed.next().await {
                seq?;
            }
            Ok(())
        })
    }

    /// CLOSE the selected folder and end the session's mailbox access.
    pub(crate) async fn close(&mut self) -> ImapResult<()> {
        with_session!(self, session => session.close().await)
    }
}

/// Build a TLS connector that accepts all certificates.
///
/// Test environments routinely run mail servers with self-signed
/// certificates, so verification is skipped entirely.
fn tls_connector() -> TlsConnector {
    let config = rustls::ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(DangerousVerifier))
        .with_no_client_auth();
    TlsConnector::from(Arc::new(config))
}

/// Open a fresh authenticated IMAP session.
///
/// Connects to `config.host` on [`effective_port`](MailboxConfig::effective_port).
/// With `secure` set, the TLS handshake happens before any IMAP
/// traffic (implicit TLS); otherwise the session runs over plain TCP.
/// Reads the server greeting, then logs in.
pub(crate) async fn connect(config: &MailboxConfig) -> Result<ImapSession> {
    let addr = format!("{}:{}", config.host, config.effective_port());
    debug!("Connecting to IMAP server at {}", addr);

    let tcp_stream = TcpStream::connect(&addr).await?;

    if config.secure {
        let connector = tls_connector();
        let server_name = ServerName::try_from(config.host.clone())
            .map_err(|e| Error::Tls(format!("Invalid server name: {e}")))?;

        let tls_stream = connector
            .connect(server_name, tcp_stream)
            .await
            .map_err(|e| Error::Tls(e.to_string()))?;

        let mut client = async_imap::Client::new(tls_stream.compat());
        let _greeting = client
            .read_response()
            .await
            .map_err(|e| Error::Imap(format!("Failed to read greeting: {e}")))?;

        let session = client
            .login(&config.username, &config.password)
            .await
            .map_err(|(e, _)| Error::Imap(format!("Login failed: {e}")))?;

        info!("Connected to IMAP server");
        Ok(ImapSession::Secure(Box::new(session)))
    } else {
        let mut client = async_imap::Client::new(tcp_stream.compat());
        let _greeting = client
            .read_response()
            .await
            .map_err(|e| Error::Imap(format!("Failed to read greeting: {e}")))?;

        let session = client
            .login(&config.username, &config.password)
            .await
            .map_err(|(e, _)| Error::Imap(format!("Login failed: {e}")))?;

        info!("Connected to IMAP server");
        Ok(ImapSession::Plain(Box::new(session)))
    }
}

/// Certificate verifier that accepts all certificates.
#[derive(Debug)]
struct DangerousVerifier;

impl rustls::client::danger::ServerCertVerifier for DangerousVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls::pki_types::CertificateDer<'_>,
        _intermediates: &[rustls::pki_types::CertificateDer<'_>],
        _server_name: &rustls::pki_types::ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> std::result::Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        vec![
            rustls::SignatureScheme::RSA_PKCS1_SHA256,
            rustls::SignatureScheme::RSA_PKCS1_SHA384,
            rustls::SignatureScheme::RSA_PKCS1_SHA512,
            rustls::SignatureScheme::ECDSA_NISTP256_SHA256,
            rustls::SignatureScheme::ECDSA_NISTP384_SHA384,
            rustls::SignatureScheme::ECDSA_NISTP521_SHA512,
            rustls::SignatureScheme::RSA_PSS_SHA256,
            rustls::SignatureScheme::RSA_PSS_SHA384,
            rustls::SignatureScheme::RSA_PSS_SHA512,
            rustls::SignatureScheme::ED25519,
        ]
    }
}
