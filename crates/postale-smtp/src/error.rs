//! Error types for SMTP delivery.

use std::io;

/// Result type alias for SMTP operations.
pub type Result<T> = std::result::Result<T, Error>;

/// SMTP error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The connection could not be established.
    #[error("could not establish SMTP connection to {host}:{port}: {reason}")]
    Connection {
        /// Server hostname.
        host: String,
        /// Server port.
        port: u16,
        /// What went wrong (refusal, timeout, handshake failure).
        reason: String,
    },

    /// The server produced no recognizable reply before timeout or EOF.
    #[error("SMTP server did not respond with anything recognized")]
    NoResponse,

    /// A step received a reply code other than the one it mandates.
    #[error("unexpected return code: expected {expected}, got {received} | {reply}")]
    UnexpectedReply {
        /// Code the current protocol step requires.
        expected: u16,
        /// Code actually received.
        received: u16,
        /// Last raw response line, for diagnostics.
        reply: String,
    },

    /// A terminating reply line did not start with a numeric code.
    #[error("malformed reply line: {0}")]
    InvalidReply(String),

    /// STARTTLS was accepted but the cryptographic upgrade failed.
    #[error("STARTTLS failed to negotiate encryption: {0}")]
    Tls(String),

    /// I/O error on an established connection.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Creates a connection error.
    #[must_use]
    pub fn connection(host: impl Into<String>, port: u16, reason: impl Into<String>) -> Self {
        Self::Connection {
            host: host.into(),
            port,
            reason: reason.into(),
        }
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
    fn unexpected_reply_message_carries_codes_and_line() {
        let err = Error::UnexpectedReply {
            expected: 250,
            received: 300,
            reply: "300 NotOK".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("expected 250"));
        assert!(text.contains("got 300"));
        assert!(text.contains("300 NotOK"));
    }

    #[test]
    fn connection_error_names_endpoint() {
        let err = Error::connection("smtp.example.com", 25, "refused");
        assert!(err.to_string().contains("smtp.example.com:25"));
    }
}
