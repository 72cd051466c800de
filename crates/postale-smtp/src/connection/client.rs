//! The SMTP client: configuration plus the sequential delivery state
//! machine.

use super::session::Session;
use super::stream;
use crate::command::Command;
use crate::error::Result;
use crate::types::{Credentials, ReplyCode, Security};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::time::Duration;

/// Default SMTP port.
const DEFAULT_PORT: u16 = 25;

/// Default connection-establishment timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default per-reply read timeout.
const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);

/// SMTP delivery client.
///
/// Each [`send`](Self::send) call opens its own connection, runs the
/// protocol sequence exactly once, and closes the connection. There is no
/// pooling and nothing is retried. The client retains the wire transcript
/// of the last call for diagnostics.
#[derive(Debug)]
pub struct SmtpClient {
    host: String,
    port: u16,
    connect_timeout: Duration,
    response_timeout: Duration,
    security: Security,
    credentials: Option<Credentials>,
    commands: Vec<String>,
    responses: Vec<String>,
}

impl SmtpClient {
    /// Creates a client for the given server host with the defaults:
    /// port 25, 30 s connect timeout, 10 s response timeout, no
    /// encryption, no authentication.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
            security: Security::None,
            credentials: None,
            commands: Vec::new(),
            responses: Vec::new(),
        }
    }

    /// Sets the server port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the connection-establishment timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the per-reply read timeout.
    #[must_use]
    pub const fn response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Sets the security mode.
    #[must_use]
    pub const fn security(mut self, security: Security) -> Self {
        self.security = security;
        self
    }

    /// Sets AUTH LOGIN credentials. Without credentials the AUTH exchange
    /// is skipped entirely.
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Returns every raw command sent during the last `send` call, in
    /// order. The DATA payload counts as one command.
    #[must_use]
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Returns every raw response line received during the last `send`
    /// call, in order.
    #[must_use]
    pub fn responses(&self) -> &[String] {
        &self.responses
    }

    /// Delivers a message: `from` and `recipients` are bare envelope
    /// addresses, `content` is the wire-ready rendering (headers + CRLF +
    /// body) sent verbatim as the DATA payload with the terminating
    /// CRLF-dot-CRLF appended.
    ///
    /// On success the connection is shut down and the outcome of that
    /// shutdown is the return value, so a close failure reports `false`
    /// even though the protocol itself succeeded. On any error the
    /// connection is closed by drop; the client may be reused for a fresh
    /// attempt afterwards.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error: connection establishment,
    /// an unexpected reply code, a failed STARTTLS negotiation, or a
    /// server that stopped responding.
    pub async fn send(&mut self, from: &str, recipients: &[String], content: &str) -> Result<bool> {
        let host = self.host.clone();
        let port = self.port;
        let security = self.security;
        let credentials = self.credentials.clone();

        self.commands.clear();
        self.responses.clear();

        tracing::debug!(%host, port, recipients = recipients.len(), "delivering message");

        let stream = match security {
            Security::Implicit => stream::connect_tls(&host, port, self.connect_timeout).await?,
            Security::None | Security::StartTls => {
                stream::connect(&host, port, self.connect_timeout).await?
            }
        };

        let mut session = Session::new(
            stream,
            self.response_timeout,
            &mut self.commands,
            &mut self.responses,
        );

        session.read_expect(ReplyCode::SERVICE_READY).await?;

        let ehlo = Command::Ehlo {
            hostname: host.clone(),
        };
        session.exchange(&ehlo, ReplyCode::OK).await?;

        if security == Security::StartTls {
            session
                .exchange(&Command::StartTls, ReplyCode::SERVICE_READY)
                .await?;
            session = session.upgrade_to_tls(&host).await?;
            // Capabilities announced before encryption no longer apply
            session.exchange(&ehlo, ReplyCode::OK).await?;
        }

        if let Some(credentials) = &credentials {
            session
                .exchange(&Command::AuthLogin, ReplyCode::AUTH_CONTINUE)
                .await?;
            session
                .exchange(
                    &Command::AuthResponse {
                        encoded: STANDARD.encode(credentials.username()),
                    },
                    ReplyCode::AUTH_CONTINUE,
                )
                .await?;
            session
                .exchange(
                    &Command::AuthResponse {
                        encoded: STANDARD.encode(credentials.password()),
                    },
                    ReplyCode::AUTH_SUCCESS,
                )
                .await?;
        }

        session
            .exchange(
                &Command::MailFrom {
                    address: from.to_string(),
                },
                ReplyCode::OK,
            )
            .await?;

        for recipient in recipients {
            session
                .exchange(
                    &Command::RcptTo {
                        address: recipient.clone(),
                    },
                    ReplyCode::OK,
                )
                .await?;
        }

        session.exchange(&Command::Data, ReplyCode::START_DATA).await?;

        let mut payload = String::with_capacity(content.len() + 5);
        payload.push_str(content);
        payload.push_str("\r\n.\r\n");
        session.transmit(&payload).await?;
        session.read_expect(ReplyCode::OK).await?;

        session.exchange(&Command::Quit, ReplyCode::CLOSING).await?;

        Ok(session.close().await)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let client = SmtpClient::new("smtp.example.com");
        assert_eq!(client.host, "smtp.example.com");
        assert_eq!(client.port, 25);
        assert_eq!(client.connect_timeout, Duration::from_secs(30));
        assert_eq!(client.response_timeout, Duration::from_secs(10));
        assert_eq!(client.security, Security::None);
        assert!(client.credentials.is_none());
        assert!(client.commands().is_empty());
        assert!(client.responses().is_empty());
    }

    #[test]
    fn builder_overrides() {
        let client = SmtpClient::new("smtp.example.com")
            .port(26)
            .connect_timeout(Duration::from_secs(100))
            .response_timeout(Duration::from_secs(100))
            .security(Security::StartTls)
            .credentials(Credentials::new("foo", "bar"));

        assert_eq!(client.port, 26);
        assert_eq!(client.connect_timeout, Duration::from_secs(100));
        assert_eq!(client.response_timeout, Duration::from_secs(100));
        assert_eq!(client.security, Security::StartTls);
        assert_eq!(client.credentials, Some(Credentials::new("foo", "bar")));
    }
}
