//! The mailer facade.

use crate::error::Result;
use crate::transport::Transport;
use postale_mime::Message;

/// Facade holding one delivery transport.
///
/// Without an explicit transport the mailer uses [`Transport::Null`],
/// which performs no I/O and always reports success.
#[derive(Debug, Default)]
pub struct Mailer {
    transport: Transport,
}

impl Mailer {
    /// Creates a mailer with the given transport.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Returns the transport.
    #[must_use]
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Returns the transport mutably, e.g. to inspect the SMTP transcript.
    pub fn transport_mut(&mut self) -> &mut Transport {
        &mut self.transport
    }

    /// Replaces the transport.
    pub fn set_transport(&mut self, transport: Transport) {
        self.transport = transport;
    }

    /// Sends the message through the configured transport.
    ///
    /// # Errors
    ///
    /// Returns the transport's delivery error.
    pub async fn send(&mut self, message: &Message) -> Result<bool> {
        self.transport.send(message).await
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
    async fn default_mailer_uses_null_transport() {
        let mut mailer = Mailer::default();
        assert!(matches!(mailer.transport(), Transport::Null));
        assert!(mailer.send(&Message::new()).await.unwrap());
    }

    #[tokio::test]
    async fn set_transport_replaces() {
        let mut mailer = Mailer::default();
        mailer.set_transport(Transport::Null);
        assert!(mailer.send(&Message::new()).await.unwrap());
    }
}
