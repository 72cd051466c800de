//! SMTP command serialization.

use std::fmt::Write as _;

/// A single SMTP command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// EHLO - extended greeting.
    Ehlo {
        /// Hostname announced to the server.
        hostname: String,
    },
    /// STARTTLS - upgrade to TLS.
    StartTls,
    /// AUTH LOGIN - begin the login dialogue.
    AuthLogin,
    /// Base64-encoded credential line within the AUTH LOGIN dialogue.
    AuthResponse {
        /// Already base64-encoded username or password.
        encoded: String,
    },
    /// MAIL FROM - start a mail transaction.
    MailFrom {
        /// Sender envelope address.
        address: String,
    },
    /// RCPT TO - add a recipient.
    RcptTo {
        /// Recipient envelope address.
        address: String,
    },
    /// DATA - begin message data.
    Data,
    /// QUIT - close the connection.
    Quit,
}

impl Command {
    /// Serializes the command as a CRLF-terminated line.
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut line = String::new();

        match self {
            Self::Ehlo { hostname } => {
                let _ = write!(line, "EHLO {hostname}");
            }
            Self::StartTls => line.push_str("STARTTLS"),
            Self::AuthLogin => line.push_str("AUTH LOGIN"),
            Self::AuthResponse { encoded } => line.push_str(encoded),
            Self::MailFrom { address } => {
                let _ = write!(line, "MAIL FROM:<{address}>");
            }
            Self::RcptTo { address } => {
                let _ = write!(line, "RCPT TO:<{address}>");
            }
            Self::Data => line.push_str("DATA"),
            Self::Quit => line.push_str("QUIT"),
        }

        line.push_str("\r\n");
        line
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
    fn ehlo() {
        let cmd = Command::Ehlo {
            hostname: "client.example.com".to_string(),
        };
        assert_eq!(cmd.serialize(), "EHLO client.example.com\r\n");
    }

    #[test]
    fn starttls() {
        assert_eq!(Command::StartTls.serialize(), "STARTTLS\r\n");
    }

    #[test]
    fn auth_login() {
        assert_eq!(Command::AuthLogin.serialize(), "AUTH LOGIN\r\n");
    }

    #[test]
    fn auth_response_passes_encoding_through() {
        let cmd = Command::AuthResponse {
            encoded: "Zm9v".to_string(),
        };
        assert_eq!(cmd.serialize(), "Zm9v\r\n");
    }

    #[test]
    fn mail_from_wraps_address() {
        let cmd = Command::MailFrom {
            address: "sender@example.com".to_string(),
        };
        assert_eq!(cmd.serialize(), "MAIL FROM:<sender@example.com>\r\n");
    }

    #[test]
    fn rcpt_to_wraps_address() {
        let cmd = Command::RcptTo {
            address: "recipient@example.com".to_string(),
        };
        assert_eq!(cmd.serialize(), "RCPT TO:<recipient@example.com>\r\n");
    }

    #[test]
    fn data() {
        assert_eq!(Command::Data.serialize(), "DATA\r\n");
    }

    #[test]
    fn quit() {
        assert_eq!(Command::Quit.serialize(), "QUIT\r\n");
    }
}
