//! Delivery transports.
//!
//! A closed set of five transport variants behind one `send` capability.
//! New transports are added as variants, not as trait implementations.

mod file;
mod mail;
mod sendmail;

pub use file::FileTransport;
pub use mail::Mail;
pub use sendmail::Sendmail;

use crate::error::{Error, Result};
use postale_mime::Message;
use postale_smtp::SmtpClient;

/// A message delivery mechanism.
#[derive(Debug)]
pub enum Transport {
    /// Delivery over the SMTP protocol.
    Smtp(SmtpClient),
    /// Delivery by piping to a sendmail-compatible binary.
    Sendmail(Sendmail),
    /// Delivery through the platform mail-submission facility.
    Mail(Mail),
    /// Delivery by dumping the rendered message to a file.
    File(FileTransport),
    /// No delivery at all; always succeeds.
    Null,
}

impl Default for Transport {
    fn default() -> Self {
        Self::Null
    }
}

impl Transport {
    /// Delivers the message.
    ///
    /// # Errors
    ///
    /// Returns the transport's delivery error; nothing is retried.
    pub async fn send(&mut self, message: &Message) -> Result<bool> {
        match self {
            Self::Smtp(client) => {
                let recipients: Vec<String> = message
                    .envelope_recipients()
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                if recipients.is_empty() {
                    return Err(Error::NoRecipients);
                }

                let from = message.from_address().unwrap_or_default().to_string();
                let content = message.to_wire();
                Ok(client.send(&from, &recipients, &content).await?)
            }
            Self::Sendmail(transport) => transport.send(message).await,
            Self::Mail(transport) => transport.send(message).await,
            Self::File(transport) => transport.send(message).await,
            Self::Null => Ok(true),
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

    #[tokio::test]
    async fn null_transport_always_succeeds() {
        let mut transport = Transport::Null;
        let sent = transport.send(&Message::new()).await.unwrap();
        assert!(sent);
    }

    #[tokio::test]
    async fn default_transport_is_null() {
        let mut transport = Transport::default();
        assert!(matches!(transport, Transport::Null));
        assert!(transport.send(&Message::new()).await.unwrap());
    }

    #[tokio::test]
    async fn smtp_transport_rejects_empty_recipient_set() {
        let mut transport = Transport::Smtp(SmtpClient::new("smtp.example.com"));
        let message = Message::new().from("sender@example.com");

        let err = transport.send(&message).await.unwrap_err();
        assert!(matches!(err, Error::NoRecipients));
    }
}
